//! JSON API for card authoring, sharing and analytics.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use cardly_core::generate::{self, GenerationRequest};
use cardly_core::registry::ShareStats;
use cardly_core::social::{self, DEFAULT_QR_SIZE, SocialLinks};
use cardly_core::{Card, ShareRecord, slug};

use crate::error::ApiError;
use crate::state::AppState;

/// Result of sharing a card.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareResponse {
    pub record: ShareRecord,
    pub social: SocialLinks,
    pub qr_code_url: String,
}

impl ShareResponse {
    fn new(record: ShareRecord) -> Self {
        let social = social::social_links(&record.card, &record.share_url);
        let qr_code_url = social::qr_code_url(&record.share_url, DEFAULT_QR_SIZE);
        Self {
            record,
            social,
            qr_code_url,
        }
    }
}

/// One entry in the most-viewed list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCard {
    pub id: String,
    pub view_count: u64,
}

/// View analytics across all cards.
#[derive(Debug, Serialize)]
pub struct ViewsResponse {
    pub total: u64,
    pub counts: std::collections::BTreeMap<String, u64>,
    pub top: Vec<TopCard>,
}

#[derive(Debug, Deserialize)]
pub struct ViewsParams {
    pub limit: Option<usize>,
}

/// Query for `GET /api/card-urls/check`.
#[derive(Debug, Deserialize)]
pub struct CardUrlParams {
    pub url: String,
    /// Name used to build suggestions.
    #[serde(default)]
    pub name: String,
    /// Card asking; its own current vanity slug counts as available.
    #[serde(default)]
    pub id: String,
}

/// Availability of a requested vanity slug.
#[derive(Debug, Serialize)]
pub struct CardUrlAvailability {
    pub available: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

/// Free alternatives when `card_url` is claimed by a card other than `card_id`.
fn card_url_conflict(
    state: &AppState,
    card_url: &str,
    card_id: &str,
    name: &str,
) -> Result<Option<Vec<String>>, ApiError> {
    let cards = state.resolver.cards();
    match cards.card_url_owner(card_url)? {
        Some(owner) if owner != card_id => {
            let taken = cards.card_urls()?;
            Ok(Some(slug::suggest_slugs(name, |s| taken.contains(s))))
        }
        _ => Ok(None),
    }
}

fn require_name(card: &Card) -> Result<(), ApiError> {
    if card.name.trim().is_empty() {
        return Err(ApiError::BadRequest("card name is required".to_string()));
    }
    Ok(())
}

/// `GET /api/cards`
pub async fn list_cards(State(state): State<AppState>) -> Result<Json<Vec<Card>>, ApiError> {
    Ok(Json(state.resolver.cards().list()?))
}

/// `POST /api/cards`
pub async fn save_card(
    State(state): State<AppState>,
    Json(card): Json<Card>,
) -> Result<Response, ApiError> {
    require_name(&card)?;
    if let Some(requested) = card.card_url.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        slug::validate_slug(requested)?;
        if let Some(suggestions) = card_url_conflict(&state, requested, &card.id, &card.name)? {
            return Err(ApiError::Conflict {
                message: format!("card URL '{requested}' is already taken"),
                suggestions,
            });
        }
    }

    let card = state.resolver.cards().save(card)?;
    tracing::info!(card_id = %card.id, "card saved");
    Ok((StatusCode::CREATED, Json(card)).into_response())
}

/// `GET /api/card-urls/check?url=&name=&id=`
pub async fn check_card_url(
    State(state): State<AppState>,
    Query(params): Query<CardUrlParams>,
) -> Result<Json<CardUrlAvailability>, ApiError> {
    let url = params.url.trim();
    if let Err(e) = slug::validate_slug(url) {
        return Ok(Json(CardUrlAvailability {
            available: false,
            message: e.to_string(),
            suggestions: Vec::new(),
        }));
    }

    let availability = match card_url_conflict(&state, url, params.id.trim(), &params.name)? {
        Some(suggestions) => CardUrlAvailability {
            available: false,
            message: "this URL is already taken".to_string(),
            suggestions,
        },
        None => CardUrlAvailability {
            available: true,
            message: "this URL is available".to_string(),
            suggestions: Vec::new(),
        },
    };
    Ok(Json(availability))
}

/// `GET /api/cards/{id}`
pub async fn get_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Card>, ApiError> {
    state
        .resolver
        .cards()
        .get(&id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("card {id}")))
}

/// `DELETE /api/cards/{id}`
pub async fn delete_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.resolver.cards().delete(&id)? {
        tracing::info!(card_id = %id, "card deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("card {id}")))
    }
}

/// `POST /api/cards/{id}/share`
pub async fn share_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ShareResponse>, ApiError> {
    let card = state
        .resolver
        .cards()
        .get(&id)?
        .ok_or_else(|| ApiError::NotFound(format!("card {id}")))?;

    let record = state.resolver.registry().share(&card);
    tracing::info!(card_id = %record.id, slug = %record.slug, "card shared");
    Ok(Json(ShareResponse::new(record)))
}

/// `DELETE /api/cards/{id}/share`
pub async fn unshare_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.resolver.registry().unshare(&id) {
        tracing::info!(card_id = %id, "card unshared");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("shared card {id}")))
    }
}

/// `GET /api/cards/{id}/stats`
pub async fn card_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ShareStats>, ApiError> {
    state
        .resolver
        .registry()
        .stats(&id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("shared card {id}")))
}

/// `GET /api/shares`: every shared card, newest first.
pub async fn list_shares(State(state): State<AppState>) -> Json<Vec<ShareRecord>> {
    Json(state.resolver.registry().all())
}

/// `POST /api/share`: share a card that was never saved here.
pub async fn share_inline(
    State(state): State<AppState>,
    Json(card): Json<Card>,
) -> Result<Json<ShareResponse>, ApiError> {
    require_name(&card)?;
    if card.id.trim().is_empty() {
        return Err(ApiError::BadRequest("card id is required".to_string()));
    }

    let record = state.resolver.registry().share(&card);
    tracing::info!(card_id = %record.id, slug = %record.slug, "inline card shared");
    Ok(Json(ShareResponse::new(record)))
}

/// `GET /api/views`
pub async fn view_counts(
    State(state): State<AppState>,
    Query(params): Query<ViewsParams>,
) -> Json<ViewsResponse> {
    let counters = state.resolver.registry().counters();
    let limit = params.limit.unwrap_or(state.config.leaderboard_size);

    let counts = counters.get_all();
    let total = counts.values().fold(0u64, |acc, n| acc.saturating_add(*n));
    let top = counters
        .leaderboard(limit)
        .into_iter()
        .map(|(id, view_count)| TopCard { id, view_count })
        .collect();

    Json(ViewsResponse { total, counts, top })
}

/// `POST /api/generate`
pub async fn generate_card(
    Json(request): Json<GenerationRequest>,
) -> Result<Json<Card>, ApiError> {
    if request.prompt.trim().is_empty() {
        return Err(ApiError::BadRequest("prompt is required".to_string()));
    }
    if request.industry.trim().is_empty() {
        return Err(ApiError::BadRequest("industry is required".to_string()));
    }

    Ok(Json(generate::generate_card(&request)))
}
