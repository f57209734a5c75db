use std::path::PathBuf;
use std::time::Duration;

use fathom_core::payments::PaymentProvider;

use crate::auth::jwt::JwtConfig;

/// Deployment environment. Controls the webhook signature bypass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Read `APP_ENV`, falling back to `NODE_ENV`. Anything other than
    /// `production` counts as development.
    pub fn from_env() -> Self {
        let raw = std::env::var("APP_ENV")
            .or_else(|_| std::env::var("NODE_ENV"))
            .unwrap_or_default();
        if raw.trim().eq_ignore_ascii_case("production") {
            Self::Production
        } else {
            Self::Development
        }
    }

    pub fn is_development(&self) -> bool {
        *self == Self::Development
    }
}

/// Shared secrets for the payment webhook endpoints.
#[derive(Debug, Clone, Default)]
pub struct WebhookSecrets {
    pub stripe: Option<String>,
    pub revolut: Option<String>,
    pub paypal: Option<String>,
}

/// Payment provider credentials and preference.
#[derive(Debug, Clone, Default)]
pub struct PaymentConfig {
    /// `PAYMENT_PROVIDER`, if set to a known provider.
    pub preferred: Option<PaymentProvider>,
    pub stripe_secret_key: Option<String>,
    pub revolut_api_key: Option<String>,
}

/// External media generation service.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// `None` disables lesson media generation.
    pub service_url: Option<String>,
    pub api_key: Option<String>,
    pub poll_interval: Duration,
    pub timeout: Duration,
}

/// Default delay between job status polls.
const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;
/// Default ceiling for one generation job.
const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 600;

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            service_url: None,
            api_key: None,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            timeout: Duration::from_secs(DEFAULT_GENERATION_TIMEOUT_SECS),
        }
    }
}

/// Credentials for the first admin account, created at startup if missing.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub environment: Environment,
    pub database_url: String,
    /// Root directory for generated media, served under `/media`.
    pub media_dir: PathBuf,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    pub webhooks: WebhookSecrets,
    pub payments: PaymentConfig,
    pub generation: GenerationConfig,
    pub admin_bootstrap: Option<AdminBootstrap>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                 |
    /// |-------------------------------|-------------------------|
    /// | `HOST`                        | `0.0.0.0`               |
    /// | `PORT`                        | `3000`                  |
    /// | `CORS_ORIGINS`                | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                    |
    /// | `APP_ENV` / `NODE_ENV`        | `development`           |
    /// | `DATABASE_URL`                | `sqlite://fathom.db`    |
    /// | `MEDIA_DIR`                   | `./media`               |
    /// | `STRIPE_WEBHOOK_SECRET`       | unset                   |
    /// | `REVOLUT_WEBHOOK_SECRET`      | unset                   |
    /// | `PAYPAL_WEBHOOK_SECRET`       | unset                   |
    /// | `PAYMENT_PROVIDER`            | unset (Stripe first)    |
    /// | `STRIPE_SECRET_KEY`           | unset                   |
    /// | `REVOLUT_API_KEY`             | unset                   |
    /// | `GENERATION_SERVICE_URL`      | unset (disabled)        |
    /// | `GENERATION_API_KEY`          | unset                   |
    /// | `GENERATION_POLL_INTERVAL_MS` | `2000`                  |
    /// | `GENERATION_TIMEOUT_SECS`     | `600`                   |
    /// | `ADMIN_EMAIL` + `ADMIN_PASSWORD` | unset                |
    ///
    /// JWT settings are documented on [`JwtConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics on unparsable numbers or an unknown `PAYMENT_PROVIDER`, so
    /// misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://fathom.db".into());

        let media_dir = PathBuf::from(std::env::var("MEDIA_DIR").unwrap_or_else(|_| "./media".into()));

        let webhooks = WebhookSecrets {
            stripe: non_empty_var("STRIPE_WEBHOOK_SECRET"),
            revolut: non_empty_var("REVOLUT_WEBHOOK_SECRET"),
            paypal: non_empty_var("PAYPAL_WEBHOOK_SECRET"),
        };

        let payments = PaymentConfig {
            preferred: non_empty_var("PAYMENT_PROVIDER").map(|p| {
                PaymentProvider::parse(&p)
                    .unwrap_or_else(|e| panic!("PAYMENT_PROVIDER is invalid: {e}"))
            }),
            stripe_secret_key: non_empty_var("STRIPE_SECRET_KEY"),
            revolut_api_key: non_empty_var("REVOLUT_API_KEY"),
        };

        let generation = GenerationConfig {
            service_url: non_empty_var("GENERATION_SERVICE_URL")
                .map(|u| u.trim_end_matches('/').to_string()),
            api_key: non_empty_var("GENERATION_API_KEY"),
            poll_interval: Duration::from_millis(
                std::env::var("GENERATION_POLL_INTERVAL_MS")
                    .unwrap_or_else(|_| DEFAULT_POLL_INTERVAL_MS.to_string())
                    .parse()
                    .expect("GENERATION_POLL_INTERVAL_MS must be a valid u64"),
            ),
            timeout: Duration::from_secs(
                std::env::var("GENERATION_TIMEOUT_SECS")
                    .unwrap_or_else(|_| DEFAULT_GENERATION_TIMEOUT_SECS.to_string())
                    .parse()
                    .expect("GENERATION_TIMEOUT_SECS must be a valid u64"),
            ),
        };

        let admin_bootstrap = match (non_empty_var("ADMIN_EMAIL"), non_empty_var("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminBootstrap { email, password }),
            _ => None,
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            environment: Environment::from_env(),
            database_url,
            media_dir,
            jwt: JwtConfig::from_env(),
            webhooks,
            payments,
            generation,
            admin_bootstrap,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
