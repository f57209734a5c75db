//! Payment provider selection.
//!
//! Stripe is the primary provider. Revolut is used when it is explicitly
//! preferred and configured, or as a fallback when Stripe is not configured.

use serde::Serialize;

use crate::error::CoreError;
use crate::webhooks::{PROVIDER_REVOLUT, PROVIDER_STRIPE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentProvider {
    Stripe,
    Revolut,
}

impl PaymentProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stripe => PROVIDER_STRIPE,
            Self::Revolut => PROVIDER_REVOLUT,
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s.trim().to_ascii_lowercase().as_str() {
            PROVIDER_STRIPE => Ok(Self::Stripe),
            PROVIDER_REVOLUT => Ok(Self::Revolut),
            other => Err(CoreError::Validation(format!(
                "Unknown payment provider: '{other}'. Valid providers: stripe, revolut"
            ))),
        }
    }
}

/// Pick the provider used for new payments.
///
/// Returns `None` when neither provider is configured.
pub fn select_provider(
    preferred: Option<PaymentProvider>,
    stripe_configured: bool,
    revolut_configured: bool,
) -> Option<PaymentProvider> {
    match preferred {
        Some(PaymentProvider::Revolut) if revolut_configured => Some(PaymentProvider::Revolut),
        _ if stripe_configured => Some(PaymentProvider::Stripe),
        _ if revolut_configured => Some(PaymentProvider::Revolut),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stripe_is_primary() {
        assert_eq!(select_provider(None, true, true), Some(PaymentProvider::Stripe));
        assert_eq!(
            select_provider(Some(PaymentProvider::Stripe), true, true),
            Some(PaymentProvider::Stripe)
        );
    }

    #[test]
    fn revolut_when_preferred_and_configured() {
        assert_eq!(
            select_provider(Some(PaymentProvider::Revolut), true, true),
            Some(PaymentProvider::Revolut)
        );
        assert_eq!(
            select_provider(Some(PaymentProvider::Revolut), true, false),
            Some(PaymentProvider::Stripe)
        );
    }

    #[test]
    fn revolut_is_the_fallback() {
        assert_eq!(select_provider(None, false, true), Some(PaymentProvider::Revolut));
        assert_eq!(select_provider(None, false, false), None);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(PaymentProvider::parse(" Revolut ").unwrap(), PaymentProvider::Revolut);
        assert!(PaymentProvider::parse("paypal").is_err());
    }
}
