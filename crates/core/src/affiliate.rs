//! Affiliate referral codes, referral kinds and commission calculation.

use rand::Rng;

use crate::error::CoreError;

/// Length of generated referral codes.
pub const GENERATED_CODE_LENGTH: usize = 8;
/// Bounds for caller-chosen codes.
pub const MIN_CODE_LENGTH: usize = 4;
pub const MAX_CODE_LENGTH: usize = 32;

/// Commission rates are stored in basis points (1/100th of a percent).
pub const MAX_COMMISSION_BPS: i64 = 10_000;

/// Characters used in generated codes. Omits 0/O and 1/I.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

pub const REFERRAL_CLICK: &str = "click";
pub const REFERRAL_SIGNUP: &str = "signup";
pub const REFERRAL_CONVERSION: &str = "conversion";

/// All valid referral kinds.
pub const VALID_REFERRAL_KINDS: &[&str] = &[REFERRAL_CLICK, REFERRAL_SIGNUP, REFERRAL_CONVERSION];

/// Generate a random referral code.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..GENERATED_CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Normalize a caller-supplied code (trim, uppercase) and validate it.
pub fn normalize_code(code: &str) -> Result<String, CoreError> {
    let code = code.trim().to_ascii_uppercase();
    if code.len() < MIN_CODE_LENGTH || code.len() > MAX_CODE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Affiliate code must be {MIN_CODE_LENGTH}-{MAX_CODE_LENGTH} characters"
        )));
    }
    if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(CoreError::Validation(
            "Affiliate code may only contain letters, digits and hyphens".into(),
        ));
    }
    Ok(code)
}

pub fn validate_commission_bps(bps: i64) -> Result<(), CoreError> {
    if !(0..=MAX_COMMISSION_BPS).contains(&bps) {
        return Err(CoreError::Validation(format!(
            "commission_rate_bps must be between 0 and {MAX_COMMISSION_BPS}"
        )));
    }
    Ok(())
}

pub fn validate_referral_kind(kind: &str) -> Result<(), CoreError> {
    crate::error::require_one_of("referral kind", kind, VALID_REFERRAL_KINDS)
}

/// Commission earned on a referral, rounded down to whole cents.
///
/// Only conversions earn commission; clicks and signups always return 0.
pub fn commission_cents(kind: &str, amount_cents: i64, rate_bps: i64) -> i64 {
    if kind != REFERRAL_CONVERSION || amount_cents <= 0 {
        return 0;
    }
    amount_cents.saturating_mul(rate_bps) / MAX_COMMISSION_BPS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_normalized_already() {
        for _ in 0..20 {
            let code = generate_code();
            assert_eq!(code.len(), GENERATED_CODE_LENGTH);
            assert_eq!(normalize_code(&code).unwrap(), code);
        }
    }

    #[test]
    fn normalize_uppercases_and_validates() {
        assert_eq!(normalize_code(" dive-pro ").unwrap(), "DIVE-PRO");
        assert!(normalize_code("abc").is_err());
        assert!(normalize_code("bad code").is_err());
        assert!(normalize_code(&"A".repeat(33)).is_err());
    }

    #[test]
    fn commission_only_on_conversions() {
        assert_eq!(commission_cents(REFERRAL_CONVERSION, 49_900, 1_500), 7_485);
        assert_eq!(commission_cents(REFERRAL_CONVERSION, 999, 1_250), 124);
        assert_eq!(commission_cents(REFERRAL_CLICK, 49_900, 1_500), 0);
        assert_eq!(commission_cents(REFERRAL_CONVERSION, -5, 1_500), 0);
    }

    #[test]
    fn commission_rate_bounds() {
        assert!(validate_commission_bps(0).is_ok());
        assert!(validate_commission_bps(10_000).is_ok());
        assert!(validate_commission_bps(10_001).is_err());
        assert!(validate_commission_bps(-1).is_err());
    }
}
