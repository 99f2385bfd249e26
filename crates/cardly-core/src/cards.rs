//! Locally-authored cards.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;

use crate::Result;
use crate::card::{Card, new_card_id};
use crate::store::{KvStore, namespaces};

/// The user's own cards, keyed by id.
#[derive(Clone)]
pub struct CardStore {
    store: Arc<dyn KvStore>,
}

impl CardStore {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Insert or replace a card.
    ///
    /// A card without an id gets a fresh UUID. `updatedAt` is always stamped;
    /// `createdAt` only when missing.
    pub fn save(&self, mut card: Card) -> Result<Card> {
        if card.id.trim().is_empty() {
            card.id = new_card_id();
        }
        let now = Utc::now();
        card.created_at.get_or_insert(now);
        card.updated_at = Some(now);

        self.store
            .set(namespaces::CARDS, &card.id, &serde_json::to_string(&card)?)?;
        tracing::debug!(card_id = %card.id, "saved card");
        Ok(card)
    }

    pub fn get(&self, id: &str) -> Result<Option<Card>> {
        match self.store.get(namespaces::CARDS, id)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// All cards, newest first.
    pub fn list(&self) -> Result<Vec<Card>> {
        let mut cards = Vec::new();
        for (id, json) in self.store.entries(namespaces::CARDS)? {
            match serde_json::from_str::<Card>(&json) {
                Ok(card) => cards.push(card),
                Err(e) => tracing::warn!(card_id = %id, error = %e, "skipping unreadable card"),
            }
        }
        cards.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(cards)
    }

    /// Id of the card that claims `card_url` as its vanity slug, if any.
    pub fn card_url_owner(&self, card_url: &str) -> Result<Option<String>> {
        Ok(self
            .list()?
            .into_iter()
            .find(|card| card.card_url.as_deref().map(str::trim) == Some(card_url))
            .map(|card| card.id))
    }

    /// Every vanity slug claimed by a saved card.
    pub fn card_urls(&self) -> Result<HashSet<String>> {
        Ok(self
            .list()?
            .into_iter()
            .filter_map(|card| card.card_url)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .collect())
    }

    /// Delete a card. Returns whether it existed.
    pub fn delete(&self, id: &str) -> Result<bool> {
        self.store.remove(namespaces::CARDS, id)
    }
}
