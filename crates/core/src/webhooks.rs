//! Inbound payment webhook signature verification.
//!
//! Each provider signs a provider-specific string built from the raw request
//! body with HMAC-SHA256. Signatures are compared with
//! [`Mac::verify_slice`], which runs in constant time.
//!
//! | Provider | Headers                                                         | Signed payload         |
//! |----------|-----------------------------------------------------------------|------------------------|
//! | Stripe   | `Stripe-Signature: t=<unix>,v1=<hex>`                           | `{t}.{body}`           |
//! | Revolut  | `Revolut-Request-Timestamp: <ms>`, `Revolut-Signature: v1=<hex>` | `v1.{ts}.{body}`       |
//! | PayPal   | `PayPal-Transmission-Id/-Time/-Sig` (hex)                       | `{id}\|{time}\|{body}` |

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::CoreError;
use crate::hashing::{hex_decode, hex_encode};
use crate::types::Timestamp;

type HmacSha256 = Hmac<Sha256>;

/// Maximum allowed clock skew between the signature timestamp and now.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

pub const HEADER_STRIPE_SIGNATURE: &str = "stripe-signature";
pub const HEADER_REVOLUT_SIGNATURE: &str = "revolut-signature";
pub const HEADER_REVOLUT_TIMESTAMP: &str = "revolut-request-timestamp";
pub const HEADER_PAYPAL_TRANSMISSION_ID: &str = "paypal-transmission-id";
pub const HEADER_PAYPAL_TRANSMISSION_TIME: &str = "paypal-transmission-time";
pub const HEADER_PAYPAL_TRANSMISSION_SIG: &str = "paypal-transmission-sig";

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

pub const PROVIDER_STRIPE: &str = "stripe";
pub const PROVIDER_REVOLUT: &str = "revolut";
pub const PROVIDER_PAYPAL: &str = "paypal";

/// All providers that may post webhooks.
pub const VALID_WEBHOOK_PROVIDERS: &[&str] = &[PROVIDER_STRIPE, PROVIDER_REVOLUT, PROVIDER_PAYPAL];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebhookProvider {
    Stripe,
    Revolut,
    #[serde(rename = "paypal")]
    PayPal,
}

impl WebhookProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stripe => PROVIDER_STRIPE,
            Self::Revolut => PROVIDER_REVOLUT,
            Self::PayPal => PROVIDER_PAYPAL,
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            PROVIDER_STRIPE => Ok(Self::Stripe),
            PROVIDER_REVOLUT => Ok(Self::Revolut),
            PROVIDER_PAYPAL => Ok(Self::PayPal),
            other => Err(CoreError::Validation(format!(
                "Unknown webhook provider: '{other}'. Valid providers: {}",
                VALID_WEBHOOK_PROVIDERS.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors / outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("Missing signature header: {0}")]
    MissingHeader(&'static str),

    #[error("Malformed signature header: {0}")]
    Malformed(String),

    #[error("Signature timestamp outside the allowed tolerance")]
    Stale,

    #[error("Signature does not match payload")]
    Mismatch,

    #[error("Webhook secret is not configured")]
    SecretNotConfigured,
}

/// Result of a successful [`verify`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// The signature matched the configured secret.
    Verified,
    /// No secret is configured and the development bypass is enabled.
    Bypassed,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Verify a webhook request for `provider`.
///
/// `header` looks up a request header by its lowercase name. When `secret`
/// is `None` the request is accepted as [`Verification::Bypassed`] only if
/// `allow_bypass` is set (development); otherwise it is rejected.
pub fn verify<'a, F>(
    provider: WebhookProvider,
    secret: Option<&str>,
    allow_bypass: bool,
    header: F,
    body: &[u8],
    now: Timestamp,
) -> Result<Verification, SignatureError>
where
    F: Fn(&'static str) -> Option<&'a str>,
{
    let secret = match secret.filter(|s| !s.is_empty()) {
        Some(s) => s,
        None if allow_bypass => return Ok(Verification::Bypassed),
        None => return Err(SignatureError::SecretNotConfigured),
    };

    match provider {
        WebhookProvider::Stripe => {
            verify_stripe(secret, header(HEADER_STRIPE_SIGNATURE), body, now)?
        }
        WebhookProvider::Revolut => verify_revolut(
            secret,
            header(HEADER_REVOLUT_TIMESTAMP),
            header(HEADER_REVOLUT_SIGNATURE),
            body,
            now,
        )?,
        WebhookProvider::PayPal => verify_paypal(
            secret,
            header(HEADER_PAYPAL_TRANSMISSION_ID),
            header(HEADER_PAYPAL_TRANSMISSION_TIME),
            header(HEADER_PAYPAL_TRANSMISSION_SIG),
            body,
            now,
        )?,
    }
    Ok(Verification::Verified)
}

// ---------------------------------------------------------------------------
// Stripe
// ---------------------------------------------------------------------------

/// Verify a `Stripe-Signature` header (`t=<unix>,v1=<hex>[,v1=<hex>...]`).
pub fn verify_stripe(
    secret: &str,
    signature_header: Option<&str>,
    body: &[u8],
    now: Timestamp,
) -> Result<(), SignatureError> {
    let header = signature_header.ok_or(SignatureError::MissingHeader(HEADER_STRIPE_SIGNATURE))?;

    let mut timestamp: Option<&str> = None;
    let mut candidates = Vec::new();
    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", v)) => timestamp = Some(v),
            Some(("v1", v)) => candidates.push(v),
            _ => {}
        }
    }

    let timestamp =
        timestamp.ok_or_else(|| SignatureError::Malformed("missing t= element".into()))?;
    let signed_at: i64 = timestamp
        .parse()
        .map_err(|_| SignatureError::Malformed(format!("invalid timestamp '{timestamp}'")))?;
    check_tolerance(signed_at, now)?;

    if candidates.is_empty() {
        return Err(SignatureError::Malformed("missing v1= element".into()));
    }

    let prefix = format!("{timestamp}.");
    if candidates
        .iter()
        .any(|c| hmac_matches(secret, &[prefix.as_bytes(), body], c))
    {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}

/// Build a `Stripe-Signature` header value for `body` signed at `timestamp`.
pub fn sign_stripe(secret: &str, timestamp: i64, body: &[u8]) -> String {
    let prefix = format!("{timestamp}.");
    format!("t={timestamp},v1={}", hmac_hex(secret, &[prefix.as_bytes(), body]))
}

// ---------------------------------------------------------------------------
// Revolut
// ---------------------------------------------------------------------------

/// Verify Revolut's `Revolut-Request-Timestamp` (milliseconds) and
/// `Revolut-Signature` (`v1=<hex>[,v1=<hex>...]`) headers.
pub fn verify_revolut(
    secret: &str,
    timestamp_header: Option<&str>,
    signature_header: Option<&str>,
    body: &[u8],
    now: Timestamp,
) -> Result<(), SignatureError> {
    let timestamp =
        timestamp_header.ok_or(SignatureError::MissingHeader(HEADER_REVOLUT_TIMESTAMP))?;
    let signatures =
        signature_header.ok_or(SignatureError::MissingHeader(HEADER_REVOLUT_SIGNATURE))?;

    let millis: i64 = timestamp
        .trim()
        .parse()
        .map_err(|_| SignatureError::Malformed(format!("invalid timestamp '{timestamp}'")))?;
    check_tolerance(millis / 1000, now)?;

    let prefix = format!("v1.{}.", timestamp.trim());
    let matched = signatures
        .split(',')
        .filter_map(|s| s.trim().strip_prefix("v1="))
        .any(|c| hmac_matches(secret, &[prefix.as_bytes(), body], c));

    if matched {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}

/// Build a `Revolut-Signature` header value for `body` at `timestamp_ms`.
pub fn sign_revolut(secret: &str, timestamp_ms: i64, body: &[u8]) -> String {
    let prefix = format!("v1.{timestamp_ms}.");
    format!("v1={}", hmac_hex(secret, &[prefix.as_bytes(), body]))
}

// ---------------------------------------------------------------------------
// PayPal
// ---------------------------------------------------------------------------

/// Verify PayPal transmission headers. The transmission time is RFC 3339.
pub fn verify_paypal(
    secret: &str,
    transmission_id: Option<&str>,
    transmission_time: Option<&str>,
    signature: Option<&str>,
    body: &[u8],
    now: Timestamp,
) -> Result<(), SignatureError> {
    let id = transmission_id.ok_or(SignatureError::MissingHeader(HEADER_PAYPAL_TRANSMISSION_ID))?;
    let time =
        transmission_time.ok_or(SignatureError::MissingHeader(HEADER_PAYPAL_TRANSMISSION_TIME))?;
    let signature = signature.ok_or(SignatureError::MissingHeader(HEADER_PAYPAL_TRANSMISSION_SIG))?;

    let sent_at = DateTime::parse_from_rfc3339(time)
        .map_err(|_| SignatureError::Malformed(format!("invalid transmission time '{time}'")))?;
    check_tolerance(sent_at.with_timezone(&Utc).timestamp(), now)?;

    let prefix = format!("{id}|{time}|");
    if hmac_matches(secret, &[prefix.as_bytes(), body], signature.trim()) {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}

/// Build a `PayPal-Transmission-Sig` header value.
pub fn sign_paypal(secret: &str, transmission_id: &str, transmission_time: &str, body: &[u8]) -> String {
    let prefix = format!("{transmission_id}|{transmission_time}|");
    hmac_hex(secret, &[prefix.as_bytes(), body])
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The timestamp header is unauthenticated; a skew too large to represent
/// counts as stale.
fn check_tolerance(signed_at_secs: i64, now: Timestamp) -> Result<(), SignatureError> {
    let skew = now.timestamp().checked_sub(signed_at_secs).map(i64::unsigned_abs);
    match skew {
        Some(secs) if secs <= SIGNATURE_TOLERANCE_SECS.unsigned_abs() => Ok(()),
        _ => Err(SignatureError::Stale),
    }
}

fn new_mac(secret: &str, parts: &[&[u8]]) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    for part in parts {
        mac.update(part);
    }
    mac
}

fn hmac_hex(secret: &str, parts: &[&[u8]]) -> String {
    hex_encode(new_mac(secret, parts).finalize().into_bytes())
}

fn hmac_matches(secret: &str, parts: &[&[u8]], candidate_hex: &str) -> bool {
    match hex_decode(candidate_hex) {
        Some(expected) => new_mac(secret, parts).verify_slice(&expected).is_ok(),
        None => false,
    }
}
