//! View resolution.
//!
//! A view request names a card by slug or id and may carry an embedded share
//! token plus the sharer's view count. [`Resolver::resolve_view`] reconciles
//! those with the share registry and the locally-authored cards:
//!
//! 1. A decodable embedded token wins, even over an existing registry record
//!    for the same id. Its count is merged, the visit is counted, and the card
//!    is auto-shared so the clean slug URL works from then on.
//! 2. Otherwise the registry is consulted (slug, then id) and the visit is
//!    counted.
//! 3. Otherwise a locally-authored card with a matching id is auto-shared.
//! 4. Otherwise the card is not found.

use std::sync::Arc;

use serde::Serialize;

use crate::card::Card;
use crate::cards::CardStore;
use crate::codec;
use crate::registry::ShareRegistry;
use crate::store::KvStore;

/// An inbound request to view a card.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewRequest<'a> {
    /// Path identifier: a slug or a card id.
    pub identifier: &'a str,
    /// Embedded share token (`data` query parameter).
    pub data: Option<&'a str>,
    /// Sharer's view count (`views` query parameter), unparsed.
    pub views: Option<&'a str>,
}

/// Which source produced a resolved card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    EmbeddedToken,
    Registry,
    LocalCard,
}

/// The canonical card to display for a view request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedView {
    pub card: Card,
    pub view_count: u64,
    pub slug: String,
    pub source: ResolutionSource,
    /// Path the client should show instead of the one it requested.
    pub rewrite_to: Option<String>,
}

impl ResolvedView {
    /// Clean path for this card, e.g. `/view/acme-corp`.
    pub fn canonical_path(&self) -> String {
        format!("/view/{}", self.slug)
    }
}

/// No source knows the requested card.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("card not found: {identifier}")]
pub struct NotFound {
    pub identifier: String,
}

/// Resolves view requests against the registry and local cards.
pub struct Resolver {
    registry: ShareRegistry,
    cards: CardStore,
}

impl Resolver {
    /// Build a resolver over `store`; share URLs use `origin`.
    pub fn new(store: Arc<dyn KvStore>, origin: impl Into<String>) -> Self {
        Self {
            registry: ShareRegistry::new(store.clone(), origin),
            cards: CardStore::new(store),
        }
    }

    pub fn registry(&self) -> &ShareRegistry {
        &self.registry
    }

    pub fn cards(&self) -> &CardStore {
        &self.cards
    }

    /// Resolve a view, counting it.
    pub fn resolve_view(&self, request: &ViewRequest<'_>) -> Result<ResolvedView, NotFound> {
        if let Some(card) = request.data.and_then(codec::decode) {
            return Ok(self.resolve_embedded(card, request.views));
        }

        if let Some(resolved) = self.resolve_registered(request.identifier) {
            return Ok(resolved);
        }

        if let Some(resolved) = self.resolve_local(request.identifier) {
            return Ok(resolved);
        }

        tracing::debug!(identifier = request.identifier, "card not found");
        Err(NotFound {
            identifier: request.identifier.to_string(),
        })
    }

    fn resolve_embedded(&self, card: Card, views: Option<&str>) -> ResolvedView {
        let counters = self.registry.counters();
        match views.map(|v| v.trim().parse::<u64>()) {
            Some(Ok(carried)) => {
                counters.set_if_higher(&card.id, carried);
            }
            Some(Err(_)) => {
                tracing::debug!(card_id = %card.id, views, "ignoring unparseable view count");
            }
            None => {}
        }

        let view_count = counters.increment(&card.id);
        let (record, persisted) = self.registry.share_persisted(&card);
        tracing::debug!(card_id = %card.id, slug = %record.slug, view_count, persisted, "resolved embedded card");

        // Without a stored record the token URL is the only one that resolves.
        ResolvedView {
            rewrite_to: persisted.then(|| format!("/view/{}", record.slug)),
            slug: record.slug,
            card,
            view_count,
            source: ResolutionSource::EmbeddedToken,
        }
    }

    fn resolve_registered(&self, identifier: &str) -> Option<ResolvedView> {
        let mut record = self.registry.lookup(identifier)?;
        let counters = self.registry.counters();

        counters.set_if_higher(&record.id, record.view_count);
        let view_count = counters.increment(&record.id);
        self.registry.record_view(&mut record, view_count);

        Some(ResolvedView {
            card: record.card,
            view_count,
            slug: record.slug,
            source: ResolutionSource::Registry,
            rewrite_to: None,
        })
    }

    fn resolve_local(&self, identifier: &str) -> Option<ResolvedView> {
        let card = match self.cards.get(identifier) {
            Ok(card) => card?,
            Err(e) => {
                tracing::warn!(identifier, error = %e, "failed to read local card");
                return None;
            }
        };

        let (record, persisted) = self.registry.share_persisted(&card);
        let rewrite_to = (persisted && record.slug != identifier && record.slug != card.id)
            .then(|| format!("/view/{}", record.slug));

        Some(ResolvedView {
            card,
            view_count: record.view_count,
            slug: record.slug,
            source: ResolutionSource::LocalCard,
            rewrite_to,
        })
    }

    /// Look a card up without counting a view or sharing it.
    pub fn find(&self, identifier: &str) -> Option<Card> {
        if let Some(record) = self.registry.lookup(identifier) {
            return Some(record.card);
        }
        self.cards.get(identifier).ok().flatten()
    }
}
