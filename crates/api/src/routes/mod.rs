pub mod admin;
pub mod affiliate;
pub mod auth;
pub mod equipment;
pub mod health;
pub mod lesson;
pub mod maintenance;
pub mod payment;
pub mod question;
pub mod quiz;
pub mod sponsor;
pub mod srs;
pub mod track;
pub mod webhook;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
/// /auth/me                                         current user (requires auth)
///
/// /admin/users                                     list (admin only)
/// /admin/users/{id}/role                           change role (PUT)
/// /admin/content-audit                             run audit (POST, ?regenerate=)
/// /admin/payment-events                            recent webhook events
///
/// /tracks                                          list, create
/// /tracks/by-slug/{slug}                           get by slug
/// /tracks/{id}                                     get, update, delete
/// /tracks/{track_id}/lessons                       list, create
///
/// /lessons/{id}                                    get, update, delete
/// /lessons/{id}/generate                           start PDF/podcast generation (POST)
/// /lessons/{lesson_id}/quizzes                     list, create
///
/// /quizzes/{id}                                    get, update, delete
/// /quizzes/{id}/attempts                           submit, list own (requires auth)
/// /quizzes/{quiz_id}/questions                     list, create (instructor)
/// /questions/{id}                                  update, delete (instructor)
///
/// /srs/decks                                       list, create
/// /srs/decks/{id}                                  get, update, delete
/// /srs/decks/{deck_id}/cards                       list, create
/// /srs/decks/{deck_id}/due                         due cards (requires auth)
/// /srs/decks/{deck_id}/stats                       deck stats (requires auth)
/// /srs/cards/{id}                                  update, delete
/// /srs/cards/{id}/history                          review history (requires auth)
/// /srs/review                                      grade a card (POST)
///
/// /equipment                                       list, create
/// /equipment/{id}                                  get, update, delete
/// /equipment/{id}/use-logs                         list, create
/// /equipment/{id}/maintenance-tasks                list, create
/// /maintenance-tasks/due                           upcoming and overdue tasks
/// /maintenance-tasks/{id}/complete                 complete (POST)
/// /maintenance-tasks/{id}/skip                     skip (POST)
///
/// /sponsors                                        list, create (admin only)
/// /sponsors/{id}                                   get, update, delete
/// /sponsors/{id}/placements                        list, create
/// /sponsor-placements/active                       live placements (public)
/// /sponsor-placements/{id}                         update, delete
///
/// /affiliates                                      list, create (admin only)
/// /affiliates/track                                record referral (public)
/// /affiliates/{id}                                 get, update, delete
/// /affiliates/{id}/referrals                       referral history
/// /affiliates/{id}/summary                         referral totals
///
/// /payments/provider                               active payment provider (public)
///
/// /webhooks/stripe                                 Stripe events (signed)
/// /webhooks/revolut                                Revolut events (signed)
/// /webhooks/paypal                                 PayPal events (signed)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/tracks", track::router())
        .nest("/lessons", lesson::router())
        .nest("/quizzes", quiz::router())
        .nest("/questions", question::router())
        .nest("/srs", srs::router())
        .nest("/equipment", equipment::router())
        .nest("/maintenance-tasks", maintenance::router())
        .nest("/sponsors", sponsor::router())
        .nest("/sponsor-placements", sponsor::placement_router())
        .nest("/affiliates", affiliate::router())
        .nest("/payments", payment::router())
        .nest("/webhooks", webhook::router())
}
