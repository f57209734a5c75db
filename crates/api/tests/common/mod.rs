#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tower::ServiceExt;

use fathom_api::auth::jwt::{generate_access_token, JwtConfig};
use fathom_api::auth::password::hash_password;
use fathom_api::config::{
    Environment, GenerationConfig, PaymentConfig, ServerConfig, WebhookSecrets,
};
use fathom_api::generation::{
    ContentGenerator, GenerationError, GenerationRunner, JobRequest, JobStatus,
};
use fathom_api::router::build_app_router;
use fathom_api::state::AppState;
use fathom_api::ws::WsManager;
use fathom_db::models::user::{CreateUser, User};
use fathom_db::repositories::UserRepo;

pub const TEST_JWT_SECRET: &str = "test-secret-for-integration-tests";
pub const TEST_PASSWORD: &str = "surface-supply-42";

/// Build a test `ServerConfig` with safe defaults.
///
/// Development environment, no webhook secrets, no payment keys and no
/// generation service.
pub fn test_config(media_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        environment: Environment::Development,
        database_url: "sqlite::memory:".to_string(),
        media_dir: media_dir.to_path_buf(),
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 60,
        },
        webhooks: WebhookSecrets::default(),
        payments: PaymentConfig::default(),
        generation: GenerationConfig::default(),
        admin_bootstrap: None,
    }
}

/// A router plus the state behind it, for tests that need to reach the
/// WebSocket manager or the media directory directly.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    /// Dropped with the app.
    pub media_dir: tempfile::TempDir,
}

impl TestApp {
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn media_path(&self) -> PathBuf {
        self.media_dir.path().to_path_buf()
    }
}

/// Build the full application router with the default test config.
pub fn build_test_app(pool: SqlitePool) -> TestApp {
    build_test_app_with(pool, |_| {}, None)
}

/// Build the app after letting `customize` adjust the config. When
/// `generator` is given a [`GenerationRunner`] is wired in with fast polling.
pub fn build_test_app_with(
    pool: SqlitePool,
    customize: impl FnOnce(&mut ServerConfig),
    generator: Option<Arc<dyn ContentGenerator>>,
) -> TestApp {
    let media_dir = tempfile::tempdir().expect("temp media dir");
    let mut config = test_config(media_dir.path());
    customize(&mut config);

    let ws_manager = Arc::new(WsManager::new());
    let generation = generator.map(|g| {
        Arc::new(GenerationRunner::new(
            pool.clone(),
            Arc::clone(&ws_manager),
            g,
            config.media_dir.clone(),
            Duration::from_millis(5),
            Duration::from_secs(5),
        ))
    });

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        ws_manager,
        generation,
    };
    TestApp {
        router: build_app_router(state.clone(), &config),
        state,
        media_dir,
    }
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

/// Insert a user with `role` and return it together with a bearer token.
pub async fn create_user(pool: &SqlitePool, email: &str, role: &str) -> (User, String) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            display_name: email.split('@').next().unwrap_or(email).to_string(),
            password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
            role: role.to_string(),
        },
    )
    .await
    .expect("user creation should succeed");
    let token = token_for(&user);
    (user, token)
}

pub fn token_for(user: &User) -> String {
    let jwt = JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
        access_token_expiry_mins: 60,
    };
    generate_access_token(user.id, &user.role, &jwt).expect("token generation should succeed")
}

pub async fn admin(pool: &SqlitePool) -> (User, String) {
    create_user(pool, "admin@fathom.test", "admin").await
}

pub async fn instructor(pool: &SqlitePool) -> (User, String) {
    create_user(pool, "instructor@fathom.test", "instructor").await
}

pub async fn student(pool: &SqlitePool) -> (User, String) {
    create_user(pool, "student@fathom.test", "student").await
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(app: Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Stub generation service
// ---------------------------------------------------------------------------

/// In-process [`ContentGenerator`]: reports `running` for `pending_polls`
/// polls, then finishes with `artifact` (or fails when `fail` is set).
pub struct StubGenerator {
    pub artifact: Vec<u8>,
    pub pending_polls: usize,
    pub fail: bool,
    pub submitted: AtomicUsize,
    polls: AtomicUsize,
}

impl StubGenerator {
    pub fn succeeding() -> Self {
        Self {
            artifact: b"%PDF-1.4 stub".to_vec(),
            pending_polls: 1,
            fail: false,
            submitted: AtomicUsize::new(0),
            polls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::succeeding()
        }
    }
}

#[async_trait]
impl ContentGenerator for StubGenerator {
    async fn submit(&self, _job: &JobRequest) -> Result<String, GenerationError> {
        let n = self.submitted.fetch_add(1, Ordering::SeqCst);
        Ok(format!("job-{n}"))
    }

    async fn poll(&self, _job_id: &str) -> Result<JobStatus, GenerationError> {
        if self.polls.fetch_add(1, Ordering::SeqCst) < self.pending_polls {
            return Ok(JobStatus::Running);
        }
        if self.fail {
            Ok(JobStatus::Failed {
                error: "voice model unavailable".into(),
            })
        } else {
            Ok(JobStatus::Done {
                result_url: "/artifacts/out".into(),
            })
        }
    }

    async fn download(&self, _result_url: &str) -> Result<Vec<u8>, GenerationError> {
        Ok(self.artifact.clone())
    }
}
