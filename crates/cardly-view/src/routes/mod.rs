//! Route definitions for the card service.
//!
//! ## Routes
//!
//! - `GET /` - Home page
//! - `GET /health` - Health check (JSON)
//! - `GET /robots.txt` - Crawler instructions
//! - `GET /view/{identifier}` - Card page (or .json for API)
//! - `GET /view/{identifier}/vcard` - vCard download
//! - `GET|POST /api/cards` - List / save cards
//! - `GET /api/card-urls/check` - Vanity URL availability and suggestions
//! - `GET|DELETE /api/cards/{id}` - Fetch / delete a card
//! - `POST|DELETE /api/cards/{id}/share` - Share / unshare a saved card
//! - `GET /api/cards/{id}/stats` - Share statistics
//! - `GET /api/shares` - List shared cards
//! - `POST /api/share` - Share a card body directly
//! - `GET /api/views` - View counts and most-viewed cards
//! - `POST /api/generate` - Generate a card from a text prompt

mod api;
mod health;
mod home;
pub mod json;
mod view;

use axum::Router;
use axum::response::IntoResponse;
use axum::routing::{get, post};

use crate::state::AppState;

/// Build the complete card service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::home_page))
        .route("/health", get(health::health_check))
        .route("/robots.txt", get(robots_txt))
        .route("/view/{identifier}", get(view::view_handler))
        .route("/view/{identifier}/vcard", get(view::vcard_handler))
        .route("/api/cards", get(api::list_cards).post(api::save_card))
        .route("/api/card-urls/check", get(api::check_card_url))
        .route("/api/cards/{id}", get(api::get_card).delete(api::delete_card))
        .route(
            "/api/cards/{id}/share",
            post(api::share_card).delete(api::unshare_card),
        )
        .route("/api/cards/{id}/stats", get(api::card_stats))
        .route("/api/shares", get(api::list_shares))
        .route("/api/share", post(api::share_inline))
        .route("/api/views", get(api::view_counts))
        .route("/api/generate", post(api::generate_card))
        .with_state(state)
}

/// Serve robots.txt: card pages may be crawled for link previews, the API not.
async fn robots_txt() -> impl IntoResponse {
    (
        [("content-type", "text/plain; charset=utf-8")],
        "User-agent: *\nAllow: /view/\nDisallow: /api/\n",
    )
}
