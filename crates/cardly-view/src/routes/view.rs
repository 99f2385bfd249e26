//! Card view route handlers.
//!
//! Handles `GET /view/{identifier}` where `identifier` is a slug or a card
//! id, optionally carrying a share token (`data`) and the sharer's view count
//! (`views`).

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use cardly_core::ViewRequest;

use crate::error::ViewError;
use crate::render;
use crate::state::AppState;

/// Longest identifier accepted in a view path.
const MAX_IDENTIFIER_LEN: usize = 128;

/// Query parameters of a share link.
#[derive(Debug, Default, Deserialize)]
pub struct ViewParams {
    /// Share token.
    pub data: Option<String>,
    /// Sharer's view count. Kept as text so bad values are ignored, not rejected.
    pub views: Option<String>,
}

impl ViewParams {
    pub fn request<'a>(&'a self, identifier: &'a str) -> ViewRequest<'a> {
        ViewRequest {
            identifier,
            data: self.data.as_deref(),
            views: self.views.as_deref(),
        }
    }
}

pub(super) fn check_identifier(identifier: &str) -> Result<&str, ViewError> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(ViewError::InvalidRequest("missing card identifier".to_string()));
    }
    if identifier.len() > MAX_IDENTIFIER_LEN {
        return Err(ViewError::InvalidRequest("card identifier is too long".to_string()));
    }
    Ok(identifier)
}

/// Handle a card view request.
///
/// 1. Detects `.json` suffix for JSON API responses
/// 2. Resolves the card (token, registry, local cards), counting the view
/// 3. Renders the card page, asking the browser to clean up its URL when the
///    resolver moved the card to its slug
pub async fn view_handler(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
    Query(params): Query<ViewParams>,
) -> Result<Response, ViewError> {
    let identifier = check_identifier(&identifier)?;

    if let Some(bare) = identifier.strip_suffix(".json") {
        return Ok(super::json::view_json(&state, bare, &params).into_response());
    }

    let resolved = state.resolver.resolve_view(&params.request(identifier))?;
    tracing::debug!(
        identifier,
        slug = %resolved.slug,
        source = ?resolved.source,
        view_count = resolved.view_count,
        "resolved card view"
    );

    let markup = render::card::render(&resolved, &state.config.base_url, &state.config.site_name);
    Ok(build_response(&markup.into_string()))
}

/// Build an HTTP response with HTML content and security headers.
///
/// Card pages embed a live view count, so they are never cached.
fn build_response(html: &str) -> Response {
    let mut headers = HeaderMap::new();

    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );

    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(render::components::CSP_HEADER),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    headers.insert(header::REFERRER_POLICY, HeaderValue::from_static("no-referrer"));

    // ETag (xxHash of content)
    let hash = xxhash_rust::xxh3::xxh3_64(html.as_bytes());
    let etag = format!("\"{}\"", hex_fmt::HexFmt(&hash.to_be_bytes()));
    if let Ok(val) = HeaderValue::from_str(&etag) {
        headers.insert(header::ETAG, val);
    }

    (StatusCode::OK, headers, html.to_string()).into_response()
}

/// Serve a card as a vCard download. Does not count a view.
pub async fn vcard_handler(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Response, ViewError> {
    let identifier = check_identifier(&identifier)?;
    let card = state
        .resolver
        .find(identifier)
        .ok_or_else(|| ViewError::NotFound(identifier.to_string()))?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        card.vcard_filename().replace(['"', '\\'], "")
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/vcard; charset=utf-8"),
    );
    let disposition = HeaderValue::from_str(&disposition)
        .unwrap_or_else(|_| HeaderValue::from_static("attachment; filename=\"business-card.vcf\""));
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );

    Ok((StatusCode::OK, headers, card.to_vcard()).into_response())
}
