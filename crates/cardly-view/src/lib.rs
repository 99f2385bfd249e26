//! Cardly View - HTTP service for digital business cards.
//!
//! Renders shared cards as HTML pages, serves vCard downloads, and exposes a
//! small JSON API for saving, sharing and generating cards. All protocol
//! logic lives in `cardly-core`; this crate only maps it onto HTTP.
//!
//! # URL Pattern
//!
//! ```text
//! GET /view/{slug-or-id}?data={token}&views={count}
//! GET /view/{slug-or-id}.json
//! GET /view/{slug-or-id}/vcard
//! ```
//!
//! A request carrying a share token is resolved from the token, counted, and
//! registered; the page then rewrites the address bar to `/view/{slug}` so the
//! long token is not passed on by accident.
//!
//! # Security
//!
//! - All dynamic content is HTML-escaped by maud
//! - URLs are validated (HTTPS/HTTP only) before use in attributes
//! - Content-Security-Policy restricts scripts to the inline address-bar rewrite
//! - X-Frame-Options: DENY prevents clickjacking

pub mod config;
pub mod error;
pub mod render;
pub mod routes;
pub mod state;

pub use config::Config;
pub use routes::router;
pub use state::AppState;
