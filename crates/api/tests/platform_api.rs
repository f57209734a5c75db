//! Health, middleware, media serving, error shape and payment provider
//! selection.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get, get_auth};
use fathom_api::config::PaymentConfig;
use fathom_core::payments::PaymentProvider;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tower::ServiceExt;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_reports_database_and_connections(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let response = get(app.router(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db_healthy"], true);
    assert_eq!(body["ws_connections"], 0);
    assert!(body["version"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_incoming_request_id_is_propagated(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "dive-log-7")
        .body(Body::empty())
        .unwrap();
    let response = app.router().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "dive-log-7");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cors_preflight_allows_configured_origin_only(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let preflight = |origin: &'static str| {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/tracks")
            .header("origin", origin)
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap()
    };

    let allowed = app.router().oneshot(preflight("http://localhost:5173")).await.unwrap();
    assert_eq!(
        allowed.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );

    let denied = app.router().oneshot(preflight("https://evil.example")).await.unwrap();
    assert!(!denied.headers().contains_key("access-control-allow-origin"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_media_directory_is_served(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let dir = app.media_path().join("lessons/3");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("pdf.pdf"), b"%PDF-1.4").unwrap();

    let response = get(app.router(), "/media/lessons/3/pdf.pdf").await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"%PDF-1.4");

    let missing = get(app.router(), "/media/lessons/3/podcast.mp3").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_error_body_carries_code_and_message(pool: SqlitePool) {
    let (_, token) = common::student(&pool).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app.router(), "/api/tracks/4242", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["code"], "NOT_FOUND");
    assert!(body["error"].as_str().unwrap().contains("4242"));
}

// ---------------------------------------------------------------------------
// Payment provider selection
// ---------------------------------------------------------------------------

async fn provider_with(pool: SqlitePool, payments: PaymentConfig) -> serde_json::Value {
    let app = common::build_test_app_with(pool, move |c| c.payments = payments, None);
    let response = get(app.router(), "/api/payments/provider").await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_no_payment_provider_configured(pool: SqlitePool) {
    let info = provider_with(pool, PaymentConfig::default()).await;
    assert!(info["provider"].is_null());
    assert_eq!(info["stripe_configured"], false);
    assert_eq!(info["revolut_configured"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stripe_wins_unless_revolut_preferred(pool: SqlitePool) {
    let both = PaymentConfig {
        preferred: None,
        stripe_secret_key: Some("sk_test_1".into()),
        revolut_api_key: Some("rv_test_1".into()),
    };
    let info = provider_with(pool.clone(), both.clone()).await;
    assert_eq!(info["provider"], "stripe");

    let prefer_revolut = PaymentConfig {
        preferred: Some(PaymentProvider::Revolut),
        ..both
    };
    let info = provider_with(pool.clone(), prefer_revolut).await;
    assert_eq!(info["provider"], "revolut");

    // A preference for an unconfigured provider falls back.
    let revolut_missing = PaymentConfig {
        preferred: Some(PaymentProvider::Revolut),
        stripe_secret_key: Some("sk_test_1".into()),
        revolut_api_key: None,
    };
    let info = provider_with(pool, revolut_missing).await;
    assert_eq!(info["provider"], "stripe");
    assert_eq!(info["revolut_configured"], false);
}
