//! Payment provider discovery and the admin view of webhook events.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use fathom_core::payments::{select_provider, PaymentProvider};
use fathom_db::repositories::PaymentEventRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::query::LimitParams;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_EVENT_LIMIT: i64 = 50;
const MAX_EVENT_LIMIT: i64 = 200;

/// Which provider the checkout should use.
#[derive(Debug, Serialize)]
pub struct ProviderInfo {
    /// `None` when no provider is configured.
    pub provider: Option<PaymentProvider>,
    pub stripe_configured: bool,
    pub revolut_configured: bool,
}

/// GET /api/payments/provider
pub async fn provider(State(state): State<AppState>) -> impl IntoResponse {
    let payments = &state.config.payments;
    let stripe_configured = payments.stripe_secret_key.is_some();
    let revolut_configured = payments.revolut_api_key.is_some();
    let provider = select_provider(payments.preferred, stripe_configured, revolut_configured);

    Json(DataResponse {
        data: ProviderInfo {
            provider,
            stripe_configured,
            revolut_configured,
        },
    })
}

/// GET /api/admin/payment-events?limit=
pub async fn list_events(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<impl IntoResponse> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_EVENT_LIMIT)
        .clamp(1, MAX_EVENT_LIMIT);
    let events = PaymentEventRepo::list_recent(&state.pool, limit).await?;
    Ok(Json(DataResponse { data: events }))
}
