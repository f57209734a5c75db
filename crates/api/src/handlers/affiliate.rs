//! Handlers for affiliates and referral tracking.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fathom_core::affiliate::{
    commission_cents, generate_code, normalize_code, validate_commission_bps,
    validate_referral_kind,
};
use fathom_core::error::{require_non_blank, CoreError};
use fathom_core::types::DbId;
use fathom_db::models::affiliate::{
    Affiliate, AffiliateReferral, CreateAffiliate, NewReferral, TrackReferral, UpdateAffiliate,
};
use fathom_db::repositories::{AffiliateRepo, ReferralRepo};
use fathom_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Attempts at finding an unused generated code before giving up.
const CODE_GENERATION_ATTEMPTS: usize = 5;

async fn ensure_affiliate_exists(pool: &DbPool, id: DbId) -> AppResult<Affiliate> {
    AffiliateRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Affiliate", id }))
}

/// Record a referral against an active affiliate identified by `code`.
///
/// Shared by the public tracking endpoint and the payment webhooks. Returns
/// `None` when the referral's `external_ref` was already recorded.
pub(crate) async fn record_referral(
    pool: &DbPool,
    code: &str,
    kind: &str,
    amount_cents: i64,
    external_ref: Option<&str>,
) -> AppResult<Option<AffiliateReferral>> {
    validate_referral_kind(kind)?;
    if amount_cents < 0 {
        return Err(AppError::Core(CoreError::Validation(
            "amount_cents must not be negative".into(),
        )));
    }
    let code = normalize_code(code)?;
    let affiliate = AffiliateRepo::find_by_code(pool, &code)
        .await?
        .filter(|a| a.is_active)
        .ok_or(AppError::Core(CoreError::NotFoundByKey {
            entity: "Affiliate",
            key: code,
        }))?;

    let referral = NewReferral {
        affiliate_id: affiliate.id,
        kind,
        amount_cents,
        commission_cents: commission_cents(kind, amount_cents, affiliate.commission_rate_bps),
        external_ref,
    };
    match ReferralRepo::create(pool, &referral).await {
        Ok(saved) => {
            tracing::info!(
                affiliate_id = affiliate.id,
                kind,
                amount_cents,
                commission_cents = saved.commission_cents,
                "Referral recorded"
            );
            Ok(Some(saved))
        }
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            tracing::debug!(affiliate_id = affiliate.id, external_ref, "Duplicate referral ignored");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

// ---------------------------------------------------------------------------
// Affiliates
// ---------------------------------------------------------------------------

/// GET /api/affiliates
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let affiliates = AffiliateRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: affiliates }))
}

/// GET /api/affiliates/{id}
pub async fn get(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let affiliate = ensure_affiliate_exists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: affiliate }))
}

/// POST /api/affiliates
///
/// A random code is generated when none is given.
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateAffiliate>,
) -> AppResult<impl IntoResponse> {
    require_non_blank("name", &input.name)?;
    require_non_blank("email", &input.email)?;
    if let Some(bps) = input.commission_rate_bps {
        validate_commission_bps(bps)?;
    }

    let code = match &input.code {
        Some(code) => normalize_code(code)?,
        None => unused_code(&state.pool).await?,
    };
    if AffiliateRepo::find_by_code(&state.pool, &code).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Affiliate code '{code}' is already taken"
        ))));
    }

    let affiliate = AffiliateRepo::create(&state.pool, &input, &code).await?;
    tracing::info!(affiliate_id = affiliate.id, code = %affiliate.code, "Affiliate created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: affiliate })))
}

/// PUT /api/affiliates/{id}
///
/// The code is immutable once links have been handed out.
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAffiliate>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        require_non_blank("name", name)?;
    }
    if let Some(bps) = input.commission_rate_bps {
        validate_commission_bps(bps)?;
    }
    let affiliate = AffiliateRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Affiliate", id }))?;
    Ok(Json(DataResponse { data: affiliate }))
}

/// DELETE /api/affiliates/{id}
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !AffiliateRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Affiliate", id }));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Referrals
// ---------------------------------------------------------------------------

/// POST /api/affiliates/track
///
/// Public. Records a click, signup or conversion for an active affiliate.
/// A repeated `external_ref` is acknowledged without a second record.
pub async fn track(
    State(state): State<AppState>,
    Json(input): Json<TrackReferral>,
) -> AppResult<impl IntoResponse> {
    let recorded = record_referral(
        &state.pool,
        &input.code,
        &input.kind,
        input.amount_cents.unwrap_or(0),
        input.external_ref.as_deref(),
    )
    .await?;

    match recorded {
        Some(referral) => Ok((StatusCode::CREATED, Json(DataResponse { data: Some(referral) }))),
        None => Ok((StatusCode::OK, Json(DataResponse { data: None }))),
    }
}

/// GET /api/affiliates/{id}/referrals?limit=&offset=
pub async fn list_referrals(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    ensure_affiliate_exists(&state.pool, id).await?;
    let (limit, offset) = params.resolve();
    let referrals = ReferralRepo::list_by_affiliate(&state.pool, id, limit, offset).await?;
    Ok(Json(DataResponse { data: referrals }))
}

/// GET /api/affiliates/{id}/summary
pub async fn summary(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_affiliate_exists(&state.pool, id).await?;
    let summary = ReferralRepo::summary(&state.pool, id).await?;
    Ok(Json(DataResponse { data: summary }))
}

async fn unused_code(pool: &DbPool) -> AppResult<String> {
    for _ in 0..CODE_GENERATION_ATTEMPTS {
        let code = generate_code();
        if AffiliateRepo::find_by_code(pool, &code).await?.is_none() {
            return Ok(code);
        }
    }
    Err(AppError::InternalError(
        "Could not generate a unique affiliate code".into(),
    ))
}
