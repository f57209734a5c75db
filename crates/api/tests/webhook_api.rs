//! HTTP-level tests for payment webhooks: signature checks, idempotent
//! storage and affiliate conversion attribution.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use chrono::Utc;
use common::{body_json, get_auth, post_json_auth};
use fathom_api::config::Environment;
use fathom_core::webhooks::{sign_paypal, sign_revolut, sign_stripe};
use serde_json::json;
use sqlx::SqlitePool;
use tower::ServiceExt;

const STRIPE_SECRET: &str = "whsec_test_stripe";
const REVOLUT_SECRET: &str = "wsk_test_revolut";
const PAYPAL_SECRET: &str = "paypal_test_secret";

fn signed_app(pool: SqlitePool) -> common::TestApp {
    common::build_test_app_with(
        pool,
        |config| {
            config.environment = Environment::Production;
            config.webhooks.stripe = Some(STRIPE_SECRET.into());
            config.webhooks.revolut = Some(REVOLUT_SECRET.into());
            config.webhooks.paypal = Some(PAYPAL_SECRET.into());
        },
        None,
    )
}

async fn post_raw(app: axum::Router, uri: &str, headers: &[(&str, String)], body: &str) -> Response {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, value);
    }
    app.oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

async fn post_stripe(app: axum::Router, secret: &str, body: &str) -> Response {
    let signature = sign_stripe(secret, Utc::now().timestamp(), body.as_bytes());
    post_raw(app, "/api/webhooks/stripe", &[("stripe-signature", signature)], body).await
}

fn checkout_body(event_id: &str, code: &str, amount: i64) -> String {
    json!({
        "id": event_id,
        "type": "checkout.session.completed",
        "data": { "object": { "amount_total": amount, "metadata": { "affiliate_code": code } } }
    })
    .to_string()
}

// ---------------------------------------------------------------------------
// Signature verification
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_signed_stripe_event_accepted(pool: SqlitePool) {
    let app = signed_app(pool);
    let body = json!({ "id": "evt_ok", "type": "invoice.paid" }).to_string();

    let response = post_stripe(app.router(), STRIPE_SECRET, &body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["received"], true);
    assert_eq!(json["duplicate"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tampered_stripe_payload_rejected(pool: SqlitePool) {
    let app = signed_app(pool);
    let body = json!({ "id": "evt_1", "type": "invoice.paid", "amount": 100 }).to_string();
    let signature = sign_stripe(STRIPE_SECRET, Utc::now().timestamp(), body.as_bytes());
    let tampered = body.replace("100", "999");

    let response = post_raw(app.router(), "/api/webhooks/stripe", &[("stripe-signature", signature)], &tampered).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let wrong_secret = post_stripe(app.router(), "whsec_other", &body).await;
    assert_eq!(wrong_secret.status(), StatusCode::UNAUTHORIZED);

    let unsigned = post_raw(app.router(), "/api/webhooks/stripe", &[], &body).await;
    assert_eq!(unsigned.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stale_stripe_signature_rejected(pool: SqlitePool) {
    let app = signed_app(pool);
    let body = json!({ "id": "evt_old", "type": "invoice.paid" }).to_string();
    let signature = sign_stripe(STRIPE_SECRET, Utc::now().timestamp() - 3600, body.as_bytes());

    let response = post_raw(app.router(), "/api/webhooks/stripe", &[("stripe-signature", signature)], &body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_out_of_range_signature_timestamp_rejected(pool: SqlitePool) {
    let app = signed_app(pool);
    let body = json!({ "id": "evt_extreme", "type": "invoice.paid" }).to_string();

    for t in [i64::MIN, i64::MAX] {
        let header = format!("t={t},v1=00");
        let response = post_raw(app.router(), "/api/webhooks/stripe", &[("stripe-signature", header)], &body).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let revolut = post_raw(
        app.router(),
        "/api/webhooks/revolut",
        &[
            ("revolut-request-timestamp", i64::MIN.to_string()),
            ("revolut-signature", "v1=00".to_string()),
        ],
        &body,
    )
    .await;
    assert_eq!(revolut.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_revolut_and_paypal_signatures(pool: SqlitePool) {
    let app = signed_app(pool);

    let revolut_body = json!({ "event": "ORDER_AUTHORISED", "order_id": "ord-1" }).to_string();
    let ts = Utc::now().timestamp_millis();
    let response = post_raw(
        app.router(),
        "/api/webhooks/revolut",
        &[
            ("revolut-request-timestamp", ts.to_string()),
            ("revolut-signature", sign_revolut(REVOLUT_SECRET, ts, revolut_body.as_bytes())),
        ],
        &revolut_body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let paypal_body = json!({ "id": "WH-1", "event_type": "PAYMENT.CAPTURE.DENIED" }).to_string();
    let time = Utc::now().to_rfc3339();
    let response = post_raw(
        app.router(),
        "/api/webhooks/paypal",
        &[
            ("paypal-transmission-id", "tx-1".to_string()),
            ("paypal-transmission-time", time.clone()),
            ("paypal-transmission-sig", sign_paypal(PAYPAL_SECRET, "tx-1", &time, paypal_body.as_bytes())),
        ],
        &paypal_body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let bad = post_raw(
        app.router(),
        "/api/webhooks/paypal",
        &[
            ("paypal-transmission-id", "tx-2".to_string()),
            ("paypal-transmission-time", time.clone()),
            ("paypal-transmission-sig", sign_paypal(PAYPAL_SECRET, "tx-1", &time, paypal_body.as_bytes())),
        ],
        &paypal_body,
    )
    .await;
    assert_eq!(bad.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_secret_bypassed_only_in_development(pool: SqlitePool) {
    let body = json!({ "id": "evt_dev", "type": "invoice.paid" }).to_string();

    let dev = common::build_test_app(pool.clone());
    let response = post_raw(dev.router(), "/api/webhooks/stripe", &[], &body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let prod = common::build_test_app_with(
        pool,
        |config| config.environment = Environment::Production,
        None,
    );
    let response = post_raw(prod.router(), "/api/webhooks/stripe", &[], &body).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

// ---------------------------------------------------------------------------
// Storage and attribution
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_delivery_is_acknowledged_once(pool: SqlitePool) {
    let (_, admin) = common::admin(&pool).await;
    let app = signed_app(pool);
    let body = json!({ "id": "evt_dup", "type": "invoice.paid" }).to_string();

    let first = body_json(post_stripe(app.router(), STRIPE_SECRET, &body).await).await;
    assert_eq!(first["duplicate"], false);
    let second = post_stripe(app.router(), STRIPE_SECRET, &body).await;
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(body_json(second).await["duplicate"], true);

    let events = body_json(get_auth(app.router(), "/api/admin/payment-events", &admin).await).await;
    let events = events["data"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["provider"], "stripe");
    assert_eq!(events[0]["external_id"], "evt_dup");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_malformed_payload_rejected(pool: SqlitePool) {
    let app = signed_app(pool);

    let not_json = post_stripe(app.router(), STRIPE_SECRET, "not json").await;
    assert_eq!(not_json.status(), StatusCode::BAD_REQUEST);

    let no_id = post_stripe(app.router(), STRIPE_SECRET, &json!({ "type": "invoice.paid" }).to_string()).await;
    assert_eq!(no_id.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_completed_checkout_attributes_conversion(pool: SqlitePool) {
    let (_, admin) = common::admin(&pool).await;
    let app = signed_app(pool);

    let affiliate = post_json_auth(
        app.router(),
        "/api/affiliates",
        &admin,
        json!({ "name": "Dive Shop", "email": "shop@reef.test", "code": "reef2026", "commission_rate_bps": 1500 }),
    )
    .await;
    assert_eq!(affiliate.status(), StatusCode::CREATED);
    let affiliate_id = body_json(affiliate).await["data"]["id"].as_i64().unwrap();

    let body = checkout_body("evt_checkout", "REEF2026", 20_000);
    assert_eq!(post_stripe(app.router(), STRIPE_SECRET, &body).await.status(), StatusCode::OK);
    // Redelivery must not double count.
    post_stripe(app.router(), STRIPE_SECRET, &body).await;

    // Unknown codes are logged, not surfaced to the provider.
    let unknown = checkout_body("evt_unknown", "NOSUCHCODE", 5_000);
    assert_eq!(post_stripe(app.router(), STRIPE_SECRET, &unknown).await.status(), StatusCode::OK);

    let summary = get_auth(app.router(), &format!("/api/affiliates/{affiliate_id}/summary"), &admin).await;
    let summary = body_json(summary).await;
    assert_eq!(summary["data"]["conversions"], 1);
    assert_eq!(summary["data"]["revenue_cents"], 20_000);
    assert_eq!(summary["data"]["commission_cents"], 3_000);
}
