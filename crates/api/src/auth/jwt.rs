//! Access tokens: HS256 JWTs carrying the user id and role.

use chrono::Utc;
use fathom_core::types::DbId;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// `iss` claim stamped on every token and required on the way back in.
pub const TOKEN_ISSUER: &str = "fathom";

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// `users.id`.
    pub sub: DbId,
    pub role: String,
    pub iss: String,
    /// Unix seconds.
    pub iat: i64,
    /// Unix seconds.
    pub exp: i64,
    /// Random per-token id, for log correlation.
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// Read `JWT_SECRET` (required) and `JWT_ACCESS_EXPIRY_MINS` (default 60).
    ///
    /// # Panics
    ///
    /// Panics when the secret is missing or blank, or the expiry is not a
    /// positive number of minutes.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.trim().is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins = match std::env::var("JWT_ACCESS_EXPIRY_MINS") {
            Ok(raw) => raw
                .parse::<i64>()
                .expect("JWT_ACCESS_EXPIRY_MINS must be a whole number of minutes"),
            Err(_) => DEFAULT_ACCESS_EXPIRY_MINS,
        };
        assert!(access_token_expiry_mins > 0, "JWT_ACCESS_EXPIRY_MINS must be positive");

        Self {
            secret,
            access_token_expiry_mins,
        }
    }

    /// Token lifetime in seconds, as reported to clients.
    pub fn expires_in_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation
    }
}

pub fn generate_access_token(
    user_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let iat = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.to_owned(),
        iss: TOKEN_ISSUER.to_owned(),
        iat,
        exp: iat + config.expires_in_secs(),
        jti: uuid::Uuid::new_v4().to_string(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Check signature, issuer and expiry, then return the claims.
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &JwtConfig::validation(),
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "bell-run-secret-long-enough-for-hmac";

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            access_token_expiry_mins: 15,
        }
    }

    fn sign(claims: &Claims) -> String {
        encode(&Header::default(), claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
    }

    #[test]
    fn issued_token_validates() {
        let token = generate_access_token(42, "instructor", &config(SECRET)).unwrap();
        let claims = validate_token(&token, &config(SECRET)).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, "instructor");
        assert_eq!(claims.iss, TOKEN_ISSUER);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn expired_or_foreign_tokens_fail() {
        let now = Utc::now().timestamp();
        let expired = Claims {
            sub: 1,
            role: "student".into(),
            iss: TOKEN_ISSUER.into(),
            iat: now - 600,
            // Past the default 60 s leeway.
            exp: now - 300,
            jti: "x".into(),
        };
        assert!(validate_token(&sign(&expired), &config(SECRET)).is_err());

        let foreign = Claims {
            iss: "someone-else".into(),
            exp: now + 300,
            ..expired
        };
        assert!(validate_token(&sign(&foreign), &config(SECRET)).is_err());
    }

    #[test]
    fn wrong_secret_fails() {
        let token = generate_access_token(1, "student", &config("secret-alpha")).unwrap();
        assert!(validate_token(&token, &config("secret-bravo")).is_err());
    }
}
