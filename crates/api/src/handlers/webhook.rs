//! Inbound payment-provider webhooks.
//!
//! Every delivery is signature-checked against the raw body before it is
//! parsed. Verified events are stored once per `(provider, external_id)`;
//! completed checkouts carrying an affiliate code also record a conversion.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use fathom_core::affiliate::REFERRAL_CONVERSION;
use fathom_core::error::CoreError;
use fathom_core::webhooks::{self, SignatureError, Verification, WebhookProvider};
use fathom_db::repositories::PaymentEventRepo;
use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::handlers::affiliate::record_referral;
use crate::state::AppState;

/// Acknowledgement returned to the provider.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
    pub duplicate: bool,
}

/// POST /api/webhooks/stripe
pub async fn stripe(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    receive(&state, WebhookProvider::Stripe, &headers, &body).await
}

/// POST /api/webhooks/revolut
pub async fn revolut(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    receive(&state, WebhookProvider::Revolut, &headers, &body).await
}

/// POST /api/webhooks/paypal
pub async fn paypal(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    receive(&state, WebhookProvider::PayPal, &headers, &body).await
}

async fn receive(
    state: &AppState,
    provider: WebhookProvider,
    headers: &HeaderMap,
    body: &[u8],
) -> AppResult<Json<WebhookAck>> {
    let secrets = &state.config.webhooks;
    let secret = match provider {
        WebhookProvider::Stripe => secrets.stripe.as_deref(),
        WebhookProvider::Revolut => secrets.revolut.as_deref(),
        WebhookProvider::PayPal => secrets.paypal.as_deref(),
    };

    let verification = webhooks::verify(
        provider,
        secret,
        state.config.environment.is_development(),
        |name| headers.get(name).and_then(|v| v.to_str().ok()),
        body,
        Utc::now(),
    )
    .map_err(|e| signature_error(provider, e))?;

    if verification == Verification::Bypassed {
        tracing::warn!(
            provider = provider.as_str(),
            "Webhook secret not configured, skipping signature check (development)"
        );
    }

    let payload: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid webhook payload: {e}")))?;
    let event = parse_event(provider, &payload).ok_or_else(|| {
        AppError::BadRequest("Webhook payload is missing an event id or type".into())
    })?;

    let recorded = PaymentEventRepo::record(
        &state.pool,
        provider.as_str(),
        &event.external_id,
        &event.event_type,
        &payload,
    )
    .await?;

    if recorded.is_none() {
        tracing::info!(
            provider = provider.as_str(),
            external_id = %event.external_id,
            "Duplicate webhook delivery ignored"
        );
        return Ok(Json(WebhookAck {
            received: true,
            duplicate: true,
        }));
    }

    tracing::info!(
        provider = provider.as_str(),
        external_id = %event.external_id,
        event_type = %event.event_type,
        "Payment event recorded"
    );

    if let Some(conversion) = &event.conversion {
        // The provider would retry on failure, so attribution problems are
        // logged rather than returned.
        if let Err(e) = record_referral(
            &state.pool,
            &conversion.affiliate_code,
            REFERRAL_CONVERSION,
            conversion.amount_cents,
            Some(&event.external_id),
        )
        .await
        {
            tracing::warn!(
                provider = provider.as_str(),
                external_id = %event.external_id,
                affiliate_code = %conversion.affiliate_code,
                error = %e,
                "Failed to attribute conversion"
            );
        }
    }

    Ok(Json(WebhookAck {
        received: true,
        duplicate: false,
    }))
}

fn signature_error(provider: WebhookProvider, err: SignatureError) -> AppError {
    match err {
        SignatureError::SecretNotConfigured => {
            tracing::error!(provider = provider.as_str(), "Webhook secret not configured");
            AppError::ServiceUnavailable(format!(
                "{} webhooks are not configured",
                provider.as_str()
            ))
        }
        other => {
            tracing::warn!(provider = provider.as_str(), error = %other, "Webhook rejected");
            AppError::Core(CoreError::Unauthorized(other.to_string()))
        }
    }
}

// ---------------------------------------------------------------------------
// Payload parsing
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq)]
struct ParsedEvent {
    external_id: String,
    event_type: String,
    conversion: Option<Conversion>,
}

#[derive(Debug, PartialEq, Eq)]
struct Conversion {
    affiliate_code: String,
    amount_cents: i64,
}

const STRIPE_CHECKOUT_COMPLETED: &str = "checkout.session.completed";
const REVOLUT_ORDER_COMPLETED: &str = "ORDER_COMPLETED";
const PAYPAL_ORDER_COMPLETED: &[&str] = &["CHECKOUT.ORDER.COMPLETED", "PAYMENT.CAPTURE.COMPLETED"];

/// Extract the id, type and any affiliate conversion from a provider payload.
///
/// Returns `None` when the id or type is missing.
fn parse_event(provider: WebhookProvider, payload: &Value) -> Option<ParsedEvent> {
    match provider {
        WebhookProvider::Stripe => {
            let external_id = str_at(payload, &["id"])?;
            let event_type = str_at(payload, &["type"])?;
            let conversion = (event_type == STRIPE_CHECKOUT_COMPLETED)
                .then(|| {
                    let object = payload.pointer("/data/object")?;
                    Some(Conversion {
                        affiliate_code: str_at(object, &["metadata", "affiliate_code"])?,
                        amount_cents: object.get("amount_total").and_then(Value::as_i64).unwrap_or(0),
                    })
                })
                .flatten();
            Some(ParsedEvent {
                external_id,
                event_type,
                conversion,
            })
        }
        WebhookProvider::Revolut => {
            // Revolut sends one event per order state, so the pair is the id.
            let event_type = str_at(payload, &["event"])?;
            let order_id = str_at(payload, &["order_id"])?;
            let conversion = (event_type == REVOLUT_ORDER_COMPLETED)
                .then(|| {
                    Some(Conversion {
                        affiliate_code: str_at(payload, &["metadata", "affiliate_code"])?,
                        amount_cents: payload
                            .get("order_amount")
                            .and_then(|a| a.get("value"))
                            .and_then(Value::as_i64)
                            .unwrap_or(0),
                    })
                })
                .flatten();
            Some(ParsedEvent {
                external_id: format!("{order_id}:{event_type}"),
                event_type,
                conversion,
            })
        }
        WebhookProvider::PayPal => {
            let external_id = str_at(payload, &["id"])?;
            let event_type = str_at(payload, &["event_type"])?;
            let conversion = PAYPAL_ORDER_COMPLETED
                .contains(&event_type.as_str())
                .then(|| {
                    let resource = payload.get("resource")?;
                    Some(Conversion {
                        affiliate_code: str_at(resource, &["custom_id"])?,
                        amount_cents: resource
                            .pointer("/amount/value")
                            .and_then(Value::as_str)
                            .and_then(decimal_to_cents)
                            .unwrap_or(0),
                    })
                })
                .flatten();
            Some(ParsedEvent {
                external_id,
                event_type,
                conversion,
            })
        }
    }
}

/// Non-empty string at a nested object path.
fn str_at(value: &Value, path: &[&str]) -> Option<String> {
    let mut current = value;
    for key in path {
        current = current.get(key)?;
    }
    current
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Parse a non-negative decimal amount such as `"49.90"` into minor units.
fn decimal_to_cents(amount: &str) -> Option<i64> {
    let (whole, frac) = amount.trim().split_once('.').unwrap_or((amount.trim(), ""));
    let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if whole.is_empty() || !digits(whole) || frac.len() > 2 || !digits(frac) {
        return None;
    }
    let whole: i64 = whole.parse().ok()?;
    let frac: i64 = format!("{frac:0<2}").parse().ok()?;
    whole.checked_mul(100)?.checked_add(frac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stripe_checkout_carries_conversion() {
        let payload = json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": { "object": { "amount_total": 4900, "metadata": { "affiliate_code": "DIVE2026" } } }
        });
        let event = parse_event(WebhookProvider::Stripe, &payload).unwrap();
        assert_eq!(event.external_id, "evt_1");
        assert_eq!(
            event.conversion,
            Some(Conversion {
                affiliate_code: "DIVE2026".into(),
                amount_cents: 4900
            })
        );
    }

    #[test]
    fn stripe_other_events_have_no_conversion() {
        let payload = json!({
            "id": "evt_2",
            "type": "invoice.paid",
            "data": { "object": { "metadata": { "affiliate_code": "DIVE2026" } } }
        });
        let event = parse_event(WebhookProvider::Stripe, &payload).unwrap();
        assert!(event.conversion.is_none());
    }

    #[test]
    fn stripe_checkout_without_amount_still_converts() {
        let payload = json!({
            "id": "evt_3",
            "type": "checkout.session.completed",
            "data": { "object": { "metadata": { "affiliate_code": "DIVE2026" } } }
        });
        let event = parse_event(WebhookProvider::Stripe, &payload).unwrap();
        assert_eq!(
            event.conversion,
            Some(Conversion {
                affiliate_code: "DIVE2026".into(),
                amount_cents: 0
            })
        );
    }

    #[test]
    fn revolut_id_combines_order_and_event() {
        let payload = json!({ "event": "ORDER_COMPLETED", "order_id": "ord-9" });
        let event = parse_event(WebhookProvider::Revolut, &payload).unwrap();
        assert_eq!(event.external_id, "ord-9:ORDER_COMPLETED");
        assert!(event.conversion.is_none());
    }

    #[test]
    fn paypal_capture_uses_custom_id() {
        let payload = json!({
            "id": "WH-1",
            "event_type": "PAYMENT.CAPTURE.COMPLETED",
            "resource": { "custom_id": "REEF01", "amount": { "value": "120.5" } }
        });
        let event = parse_event(WebhookProvider::PayPal, &payload).unwrap();
        assert_eq!(event.conversion.unwrap().amount_cents, 12050);
    }

    #[test]
    fn missing_id_is_rejected() {
        assert!(parse_event(WebhookProvider::Stripe, &json!({ "type": "x" })).is_none());
        assert!(parse_event(WebhookProvider::PayPal, &json!({ "id": " ", "event_type": "x" })).is_none());
    }

    #[test]
    fn decimal_amounts() {
        assert_eq!(decimal_to_cents("49.99"), Some(4999));
        assert_eq!(decimal_to_cents("7"), Some(700));
        assert_eq!(decimal_to_cents("1.234"), None);
        assert_eq!(decimal_to_cents("abc"), None);
        assert_eq!(decimal_to_cents("-1.50"), None);
        assert_eq!(decimal_to_cents("+3"), None);
        assert_eq!(decimal_to_cents(".5"), None);
    }
}
