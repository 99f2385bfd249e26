//! JSON endpoint for resolved cards.
//!
//! Serves the resolved card as JSON at `GET /view/{identifier}.json`, with
//! the same resolution and view counting as the HTML page.
//!
//! Format:
//! ```json
//! {
//!   "card": { /* card fields, camelCase */ },
//!   "viewCount": 6,
//!   "slug": "acme-corp",
//!   "source": "embedded_token",
//!   "canonicalUrl": "https://cardly.app/view/acme-corp"
//! }
//! ```

use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use cardly_core::Card;
use cardly_core::resolve::ResolutionSource;

use super::view::ViewParams;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ViewJson<'a> {
    card: &'a Card,
    view_count: u64,
    slug: &'a str,
    source: ResolutionSource,
    canonical_url: String,
}

/// Resolve a card and return it as JSON.
pub fn view_json(
    state: &AppState,
    identifier: &str,
    params: &ViewParams,
) -> Result<Response, ApiError> {
    let resolved = state.resolver.resolve_view(&params.request(identifier))?;

    let body = ViewJson {
        card: &resolved.card,
        view_count: resolved.view_count,
        slug: &resolved.slug,
        source: resolved.source,
        canonical_url: format!("{}{}", state.config.base_url, resolved.canonical_path()),
    };
    let json_string = serde_json::to_string_pretty(&body).map_err(|e| ApiError::Internal(e.into()))?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=utf-8"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );

    Ok((StatusCode::OK, headers, json_string).into_response())
}
