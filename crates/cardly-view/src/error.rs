//! Error types for the card service.
//!
//! Card pages fail with [`ViewError`], rendered as a small HTML page with a
//! link home. API routes fail with [`ApiError`], rendered as JSON.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use maud::{DOCTYPE, html};
use serde::Serialize;

use cardly_core::NotFound;

/// Card page error type.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// The request could not be understood.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No share token, registry record or local card matched.
    #[error("not found: {0}")]
    NotFound(String),

    /// Internal server error (storage, rendering, etc.).
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<NotFound> for ViewError {
    fn from(err: NotFound) -> Self {
        Self::NotFound(err.identifier)
    }
}

impl IntoResponse for ViewError {
    fn into_response(self) -> Response {
        let (status, title, message) = match &self {
            Self::InvalidRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "Invalid Link",
                format!("This card link could not be read: {msg}"),
            ),
            Self::NotFound(_) => (
                StatusCode::NOT_FOUND,
                "Card Not Found",
                "The business card you're looking for doesn't exist or the link is invalid."
                    .to_string(),
            ),
            Self::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Error",
                    "An internal error occurred. Please try again later.".to_string(),
                )
            }
        };

        let markup = html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content="width=device-width, initial-scale=1";
                    title { (title) " | Cardly" }
                    meta name="robots" content="noindex";
                    style { (maud::PreEscaped(crate::render::components::ERROR_CSS)) }
                }
                body {
                    main class="error-page" {
                        h1 { (title) }
                        p { (message) }
                        a href="/" { "Create Your Own Card" }
                    }
                }
            }
        };

        (status, markup).into_response()
    }
}

/// API error type that converts to JSON responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid request parameters or body.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The requested resource is already claimed. `suggestions` lists free
    /// alternatives.
    #[error("conflict: {message}")]
    Conflict {
        message: String,
        suggestions: Vec<String>,
    },

    /// Error surfaced by the core library (storage, slug validation).
    #[error(transparent)]
    Core(#[from] cardly_core::Error),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<NotFound> for ApiError {
    fn from(err: NotFound) -> Self {
        Self::NotFound(format!("card {}", err.identifier))
    }
}

/// JSON error response body.
#[derive(Debug, Clone, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    suggestions: Vec<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let suggestions = match &self {
            Self::Conflict { suggestions, .. } => suggestions.clone(),
            _ => Vec::new(),
        };
        let (status, error, message) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            Self::Conflict { message, .. } => (StatusCode::CONFLICT, "conflict", Some(message.clone())),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone())),
            Self::Core(cardly_core::Error::InvalidSlug { slug, reason }) => (
                StatusCode::BAD_REQUEST,
                "invalid_slug",
                Some(format!("{slug}: {reason}")),
            ),
            Self::Core(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage_error",
                    Some("A storage error occurred".to_string()),
                )
            }
            Self::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    Some("An internal error occurred".to_string()),
                )
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            message,
            suggestions,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_not_found() {
        let err = ViewError::NotFound("acme".to_string());
        assert_eq!(err.to_string(), "not found: acme");
    }

    #[test]
    fn error_from_resolver_not_found() {
        let err: ViewError = NotFound {
            identifier: "unknown-slug".to_string(),
        }
        .into();
        assert!(matches!(err, ViewError::NotFound(ref id) if id == "unknown-slug"));
    }

    #[test]
    fn error_into_response_statuses() {
        assert_eq!(
            ViewError::InvalidRequest("x".to_string()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ViewError::NotFound("x".to_string()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ViewError::Internal(anyhow::anyhow!("boom")).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn api_error_statuses() {
        assert_eq!(
            ApiError::NotFound("card c1".to_string()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::BadRequest("empty prompt".to_string())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Core(cardly_core::Error::Storage("disk full".to_string()))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let invalid_slug = cardly_core::Error::InvalidSlug {
            slug: "ab".to_string(),
            reason: "too short".to_string(),
        };
        assert_eq!(
            ApiError::Core(invalid_slug).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        let conflict = ApiError::Conflict {
            message: "taken".to_string(),
            suggestions: vec!["acme-co".to_string()],
        };
        assert_eq!(conflict.into_response().status(), StatusCode::CONFLICT);
    }
}
