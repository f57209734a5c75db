//! HTTP-level tests for sponsor placements and affiliate tracking.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{body_json, delete_auth, get, get_auth, post_json, post_json_auth, put_json_auth};
use serde_json::{json, Value};
use sqlx::SqlitePool;

async fn create_sponsor(app: &common::TestApp, token: &str, name: &str, active: bool) -> i64 {
    let response = post_json_auth(
        app.router(),
        "/api/sponsors",
        token,
        json!({ "name": name, "website_url": "https://example.com", "is_active": active }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn create_placement(app: &common::TestApp, token: &str, sponsor_id: i64, body: Value) -> axum::response::Response {
    post_json_auth(
        app.router(),
        &format!("/api/sponsors/{sponsor_id}/placements"),
        token,
        body,
    )
    .await
}

// ---------------------------------------------------------------------------
// Sponsors
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_placement_validation(pool: SqlitePool) {
    let (_, token) = common::admin(&pool).await;
    let app = common::build_test_app(pool);
    let sponsor_id = create_sponsor(&app, &token, "Kirby Morgan", true).await;

    let now = Utc::now();
    let backwards = create_placement(
        &app,
        &token,
        sponsor_id,
        json!({
            "slot": "dashboard_banner",
            "cta_text": "Shop helmets",
            "cta_url": "https://example.com/helmets",
            "starts_at": now,
            "ends_at": now - Duration::days(1)
        }),
    )
    .await;
    assert_eq!(backwards.status(), StatusCode::BAD_REQUEST);

    let bad_slot = create_placement(
        &app,
        &token,
        sponsor_id,
        json!({ "slot": "popup", "cta_text": "Shop", "cta_url": "https://example.com" }),
    )
    .await;
    assert_eq!(bad_slot.status(), StatusCode::BAD_REQUEST);

    let bad_url = create_placement(
        &app,
        &token,
        sponsor_id,
        json!({ "slot": "newsletter", "cta_text": "Shop", "cta_url": "javascript:alert(1)" }),
    )
    .await;
    assert_eq!(bad_url.status(), StatusCode::BAD_REQUEST);

    // An update is checked against the merged window.
    let placement = body_json(
        create_placement(
            &app,
            &token,
            sponsor_id,
            json!({ "slot": "newsletter", "cta_text": "Shop", "cta_url": "https://example.com" }),
        )
        .await,
    )
    .await["data"]
        .clone();
    let shrink = put_json_auth(
        app.router(),
        &format!("/api/sponsor-placements/{}", placement["id"]),
        &token,
        json!({ "ends_at": now - Duration::days(30) }),
    )
    .await;
    assert_eq!(shrink.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_active_placements_filter_by_window_and_order_by_priority(pool: SqlitePool) {
    let (_, token) = common::admin(&pool).await;
    let app = common::build_test_app(pool);
    let live = create_sponsor(&app, &token, "Kirby Morgan", true).await;
    let paused = create_sponsor(&app, &token, "Paused Co", false).await;
    let now = Utc::now();

    let placement = |slot: &str, cta: &str, priority: i64| {
        json!({
            "slot": slot,
            "cta_text": cta,
            "cta_url": "https://example.com",
            "starts_at": now - Duration::days(1),
            "priority": priority
        })
    };
    create_placement(&app, &token, live, placement("dashboard_banner", "low", 1)).await;
    create_placement(&app, &token, live, placement("dashboard_banner", "high", 10)).await;
    create_placement(&app, &token, live, placement("lesson_footer", "footer", 5)).await;
    create_placement(&app, &token, paused, placement("dashboard_banner", "paused", 99)).await;
    create_placement(
        &app,
        &token,
        live,
        json!({
            "slot": "dashboard_banner",
            "cta_text": "expired",
            "cta_url": "https://example.com",
            "starts_at": now - Duration::days(10),
            "ends_at": now - Duration::days(1)
        }),
    )
    .await;
    create_placement(
        &app,
        &token,
        live,
        json!({
            "slot": "dashboard_banner",
            "cta_text": "future",
            "cta_url": "https://example.com",
            "starts_at": now + Duration::days(3)
        }),
    )
    .await;

    // Public, no token.
    let response = get(app.router(), "/api/sponsor-placements/active?slot=dashboard_banner").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let ctas: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["cta_text"].as_str().unwrap())
        .collect();
    assert_eq!(ctas, vec!["high", "low"]);
    assert_eq!(body["data"][0]["sponsor_name"], "Kirby Morgan");

    let all = body_json(get(app.router(), "/api/sponsor-placements/active").await).await;
    assert_eq!(all["data"].as_array().unwrap().len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sponsor_management_is_admin_only(pool: SqlitePool) {
    let (_, admin) = common::admin(&pool).await;
    let (_, instructor) = common::instructor(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(app.router(), "/api/sponsors", &instructor, json!({ "name": "Nope" })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = get_auth(app.router(), "/api/sponsors", &instructor).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let id = create_sponsor(&app, &admin, "Kirby Morgan", true).await;
    let response = delete_auth(app.router(), &format!("/api/sponsors/{id}"), &admin).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = get_auth(app.router(), &format!("/api/sponsors/{id}"), &admin).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Affiliates
// ---------------------------------------------------------------------------

async fn create_affiliate(app: &common::TestApp, token: &str, body: Value) -> axum::response::Response {
    post_json_auth(app.router(), "/api/affiliates", token, body).await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_affiliate_codes(pool: SqlitePool) {
    let (_, token) = common::admin(&pool).await;
    let app = common::build_test_app(pool);

    let generated = create_affiliate(&app, &token, json!({ "name": "Dive Shop", "email": "shop@example.com" })).await;
    assert_eq!(generated.status(), StatusCode::CREATED);
    let generated = body_json(generated).await;
    let code = generated["data"]["code"].as_str().unwrap();
    assert_eq!(code.len(), 8);
    assert_eq!(code, code.to_ascii_uppercase());
    assert_eq!(generated["data"]["commission_rate_bps"], 1000);

    let chosen = create_affiliate(
        &app,
        &token,
        json!({ "name": "Reef", "email": "reef@example.com", "code": " reef-2026 " }),
    )
    .await;
    assert_eq!(body_json(chosen).await["data"]["code"], "REEF-2026");

    let taken = create_affiliate(
        &app,
        &token,
        json!({ "name": "Copy", "email": "copy@example.com", "code": "REEF-2026" }),
    )
    .await;
    assert_eq!(taken.status(), StatusCode::CONFLICT);

    let bad_rate = create_affiliate(
        &app,
        &token,
        json!({ "name": "Greedy", "email": "g@example.com", "commission_rate_bps": 10_001 }),
    )
    .await;
    assert_eq!(bad_rate.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tracking_and_summary(pool: SqlitePool) {
    let (_, token) = common::admin(&pool).await;
    let app = common::build_test_app(pool);

    let affiliate = body_json(
        create_affiliate(
            &app,
            &token,
            json!({ "name": "Reef", "email": "reef@example.com", "code": "REEF", "commission_rate_bps": 2000 }),
        )
        .await,
    )
    .await["data"]
        .clone();
    let id = affiliate["id"].as_i64().unwrap();

    for body in [
        json!({ "code": "reef", "kind": "click" }),
        json!({ "code": "reef", "kind": "click" }),
        json!({ "code": "REEF", "kind": "signup" }),
        json!({ "code": "REEF", "kind": "conversion", "amount_cents": 12_345, "external_ref": "order-1" }),
    ] {
        let response = post_json(app.router(), "/api/affiliates/track", body).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    // Same external reference again: acknowledged, not recorded.
    let repeat = post_json(
        app.router(),
        "/api/affiliates/track",
        json!({ "code": "REEF", "kind": "conversion", "amount_cents": 12_345, "external_ref": "order-1" }),
    )
    .await;
    assert_eq!(repeat.status(), StatusCode::OK);
    assert!(body_json(repeat).await["data"].is_null());

    let summary = body_json(get_auth(app.router(), &format!("/api/affiliates/{id}/summary"), &token).await).await;
    assert_eq!(summary["data"]["clicks"], 2);
    assert_eq!(summary["data"]["signups"], 1);
    assert_eq!(summary["data"]["conversions"], 1);
    assert_eq!(summary["data"]["revenue_cents"], 12_345);
    // 20% rounded down to whole cents.
    assert_eq!(summary["data"]["commission_cents"], 2_469);

    let page = body_json(
        get_auth(app.router(), &format!("/api/affiliates/{id}/referrals?limit=2"), &token).await,
    )
    .await;
    let page = page["data"].as_array().unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0]["kind"], "conversion");

    let rest = body_json(
        get_auth(app.router(), &format!("/api/affiliates/{id}/referrals?limit=2&offset=2"), &token).await,
    )
    .await;
    assert_eq!(rest["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tracking_rejects_unknown_inactive_and_invalid(pool: SqlitePool) {
    let (_, token) = common::admin(&pool).await;
    let app = common::build_test_app(pool);

    let affiliate = body_json(
        create_affiliate(&app, &token, json!({ "name": "Reef", "email": "reef@example.com", "code": "REEF" })).await,
    )
    .await["data"]
        .clone();

    let unknown = post_json(app.router(), "/api/affiliates/track", json!({ "code": "NOPE", "kind": "click" })).await;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

    let bad_kind = post_json(app.router(), "/api/affiliates/track", json!({ "code": "REEF", "kind": "purchase" })).await;
    assert_eq!(bad_kind.status(), StatusCode::BAD_REQUEST);

    let negative = post_json(
        app.router(),
        "/api/affiliates/track",
        json!({ "code": "REEF", "kind": "conversion", "amount_cents": -5 }),
    )
    .await;
    assert_eq!(negative.status(), StatusCode::BAD_REQUEST);

    put_json_auth(
        app.router(),
        &format!("/api/affiliates/{}", affiliate["id"]),
        &token,
        json!({ "is_active": false }),
    )
    .await;
    let inactive = post_json(app.router(), "/api/affiliates/track", json!({ "code": "REEF", "kind": "click" })).await;
    assert_eq!(inactive.status(), StatusCode::NOT_FOUND);
}
