//! Route definitions for the `/srs` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::srs;
use crate::state::AppState;

/// Routes mounted at `/srs`.
///
/// ```text
/// GET    /decks                    -> list_decks
/// POST   /decks                    -> create_deck
/// GET    /decks/{id}               -> get_deck
/// PUT    /decks/{id}               -> update_deck
/// DELETE /decks/{id}               -> delete_deck
///
/// GET    /decks/{deck_id}/cards    -> list_cards
/// POST   /decks/{deck_id}/cards    -> create_card
/// GET    /decks/{deck_id}/due      -> due
/// GET    /decks/{deck_id}/stats    -> stats
///
/// PUT    /cards/{id}               -> update_card
/// DELETE /cards/{id}               -> delete_card
/// GET    /cards/{id}/history       -> history
///
/// POST   /review                   -> review
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/decks", get(srs::list_decks).post(srs::create_deck))
        .route(
            "/decks/{id}",
            get(srs::get_deck)
                .put(srs::update_deck)
                .delete(srs::delete_deck),
        )
        .route(
            "/decks/{deck_id}/cards",
            get(srs::list_cards).post(srs::create_card),
        )
        .route("/decks/{deck_id}/due", get(srs::due))
        .route("/decks/{deck_id}/stats", get(srs::stats))
        .route("/cards/{id}", put(srs::update_card).delete(srs::delete_card))
        .route("/cards/{id}/history", get(srs::history))
        .route("/review", post(srs::review))
}
