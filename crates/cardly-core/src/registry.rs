//! Share registry: one share record per card, addressable by id or slug.
//!
//! Records live in [`namespaces::SHARED_CARDS`] keyed by card id. The slug
//! index in [`namespaces::SHARED_BY_SLUG`] maps each slug back to its card id
//! and is always written in the same batch as the record it points at, so the
//! two views cannot drift apart. Unsharing removes both.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::codec;
use crate::counter::ViewCounterStore;
use crate::slug;
use crate::store::{KvStore, WriteOp, namespaces};
use crate::Result;

/// A shared card snapshot and the link that points at it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRecord {
    /// Card id (primary key).
    pub id: String,
    /// Snapshot of the card at share time.
    pub card: Card,
    /// Stable slug, assigned on first share.
    pub slug: String,
    /// Full share URL including the embedded token.
    pub share_url: String,
    /// When the card was first shared.
    pub created_at: DateTime<Utc>,
    /// View count cached at the last share or visit.
    #[serde(default)]
    pub view_count: u64,
}

/// Summary of a card's sharing state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareStats {
    pub view_count: u64,
    pub shared_at: DateTime<Utc>,
}

/// Registry of shared cards.
pub struct ShareRegistry {
    store: Arc<dyn KvStore>,
    counters: ViewCounterStore,
    origin: String,
    /// Serialises slug allocation with the record write that claims it.
    write_lock: Mutex<()>,
}

impl ShareRegistry {
    /// Create a registry whose share URLs start with `origin`
    /// (e.g. `https://cards.example.com`).
    pub fn new(store: Arc<dyn KvStore>, origin: impl Into<String>) -> Self {
        let origin = origin.into().trim_end_matches('/').to_string();
        Self {
            counters: ViewCounterStore::new(store.clone()),
            store,
            origin,
            write_lock: Mutex::new(()),
        }
    }

    /// View counters sharing this registry's store.
    pub fn counters(&self) -> &ViewCounterStore {
        &self.counters
    }

    /// Origin used to build share URLs, without a trailing slash.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Share (or re-share) a card.
    ///
    /// Re-sharing keeps the slug and first-share time of the existing record,
    /// replaces the snapshot and URL, and never lowers the cached view count.
    /// If the store fails, an unpersisted record using the card id as its
    /// slug is returned instead.
    pub fn share(&self, card: &Card) -> ShareRecord {
        self.share_persisted(card).0
    }

    /// [`share`](Self::share), also reporting whether the record was stored.
    ///
    /// When it was not, the record's clean slug URL does not resolve and only
    /// its token-carrying share URL works.
    pub fn share_persisted(&self, card: &Card) -> (ShareRecord, bool) {
        let _guard = self.write_lock.lock();
        match self.try_share(card) {
            Ok(record) => {
                tracing::debug!(card_id = %record.id, slug = %record.slug, "shared card");
                (record, true)
            }
            Err(e) => {
                tracing::warn!(card_id = %card.id, error = %e, "failed to persist share record");
                let view_count = self.counters.get(&card.id);
                let token = codec::encode(card);
                let record = ShareRecord {
                    id: card.id.clone(),
                    card: card.clone(),
                    slug: card.id.clone(),
                    share_url: self.share_url(&card.id, &token, view_count),
                    created_at: Utc::now(),
                    view_count,
                };
                (record, false)
            }
        }
    }

    fn try_share(&self, card: &Card) -> Result<ShareRecord> {
        // An unreadable record is replaced rather than blocking the share.
        let existing = match self.store.get(namespaces::SHARED_CARDS, &card.id)? {
            Some(json) => serde_json::from_str::<ShareRecord>(&json)
                .map_err(|e| {
                    tracing::warn!(card_id = %card.id, error = %e, "replacing unreadable share record");
                })
                .ok(),
            None => None,
        };

        let (slug, created_at, cached_count) = match existing {
            Some(record) => (record.slug, record.created_at, record.view_count),
            None => {
                let base = slug::generate_slug(&card.name);
                // A slug still indexed to this card is left over from a lost
                // record and can be reclaimed.
                let slug = slug::ensure_unique_slug(&base, |candidate| {
                    self.store
                        .get(namespaces::SHARED_BY_SLUG, candidate)
                        .map(|owner| owner.is_some_and(|owner| owner != card.id))
                })?;
                (slug, Utc::now(), 0)
            }
        };

        let view_count = cached_count.max(self.counters.get(&card.id));
        let token = codec::encode(card);
        let record = ShareRecord {
            id: card.id.clone(),
            card: card.clone(),
            share_url: self.share_url(&slug, &token, view_count),
            slug,
            created_at,
            view_count,
        };

        self.store.write_batch(vec![
            WriteOp::Put {
                namespace: namespaces::SHARED_CARDS,
                key: record.id.clone(),
                value: serde_json::to_string(&record)?,
            },
            WriteOp::Put {
                namespace: namespaces::SHARED_BY_SLUG,
                key: record.slug.clone(),
                value: record.id.clone(),
            },
        ])?;

        Ok(record)
    }

    fn share_url(&self, slug: &str, token: &str, view_count: u64) -> String {
        if token.is_empty() {
            format!("{}/view/{slug}", self.origin)
        } else {
            format!("{}/view/{slug}?data={token}&views={view_count}", self.origin)
        }
    }

    /// Find a record by slug, then by card id.
    pub fn lookup(&self, identifier: &str) -> Option<ShareRecord> {
        match self.try_lookup(identifier) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(identifier, error = %e, "share lookup failed");
                None
            }
        }
    }

    fn try_lookup(&self, identifier: &str) -> Result<Option<ShareRecord>> {
        if let Some(card_id) = self.store.get(namespaces::SHARED_BY_SLUG, identifier)?
            && let Some(record) = self.read_record(&card_id)?
            && record.slug == identifier
        {
            return Ok(Some(record));
        }

        self.read_record(identifier)
    }

    fn read_record(&self, card_id: &str) -> Result<Option<ShareRecord>> {
        match self.store.get(namespaces::SHARED_CARDS, card_id)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Remove a card's share record and its slug. Returns whether it was shared.
    pub fn unshare(&self, card_id: &str) -> bool {
        let _guard = self.write_lock.lock();
        match self.try_unshare(card_id) {
            Ok(removed) => {
                if removed {
                    tracing::debug!(card_id, "unshared card");
                }
                removed
            }
            Err(e) => {
                tracing::warn!(card_id, error = %e, "failed to unshare card");
                false
            }
        }
    }

    fn try_unshare(&self, card_id: &str) -> Result<bool> {
        let Some(json) = self.store.get(namespaces::SHARED_CARDS, card_id)? else {
            return Ok(false);
        };

        let mut ops = vec![WriteOp::Delete {
            namespace: namespaces::SHARED_CARDS,
            key: card_id.to_string(),
        }];
        match serde_json::from_str::<ShareRecord>(&json) {
            Ok(record) => {
                let owner = self.store.get(namespaces::SHARED_BY_SLUG, &record.slug)?;
                if owner.as_deref() == Some(card_id) {
                    ops.push(WriteOp::Delete {
                        namespace: namespaces::SHARED_BY_SLUG,
                        key: record.slug,
                    });
                }
            }
            Err(e) => {
                tracing::warn!(card_id, error = %e, "removing unreadable share record");
            }
        }
        self.store.write_batch(ops)?;
        Ok(true)
    }

    /// Store a new view count on `record` and on its persisted copy.
    ///
    /// The persisted count never goes down. A record that was unshared in the
    /// meantime is not recreated.
    pub fn record_view(&self, record: &mut ShareRecord, view_count: u64) {
        record.view_count = record.view_count.max(view_count);

        let result = self
            .store
            .update(namespaces::SHARED_CARDS, &record.id, &mut |current| {
                let mut stored: ShareRecord = serde_json::from_str(current?).ok()?;
                if stored.view_count >= view_count {
                    return None;
                }
                stored.view_count = view_count;
                serde_json::to_string(&stored).ok()
            });

        if let Err(e) = result {
            tracing::warn!(card_id = %record.id, view_count, error = %e, "failed to record view");
        }
    }

    /// First free slug for `base` given the current slug index.
    pub fn ensure_unique_slug(&self, base: &str) -> String {
        slug::ensure_unique_slug(base, |candidate| {
            self.store
                .get(namespaces::SHARED_BY_SLUG, candidate)
                .map(|hit| hit.is_some())
        })
        .unwrap_or_else(|e| {
            tracing::warn!(base, error = %e, "failed to check slug availability");
            base.to_string()
        })
    }

    /// Whether `card_id` has a share record.
    pub fn is_shared(&self, card_id: &str) -> bool {
        self.read_record(card_id).ok().flatten().is_some()
    }

    /// View count and first-share time for a shared card.
    pub fn stats(&self, card_id: &str) -> Option<ShareStats> {
        let record = match self.read_record(card_id) {
            Ok(record) => record?,
            Err(e) => {
                tracing::warn!(card_id, error = %e, "failed to read share stats");
                return None;
            }
        };
        Some(ShareStats {
            view_count: record.view_count.max(self.counters.get(card_id)),
            shared_at: record.created_at,
        })
    }

    /// Every share record, most recently shared first.
    pub fn all(&self) -> Vec<ShareRecord> {
        let entries = match self.store.entries(namespaces::SHARED_CARDS) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "failed to list share records");
                return Vec::new();
            }
        };

        let mut records: Vec<ShareRecord> = entries
            .into_iter()
            .filter_map(|(id, json)| match serde_json::from_str(&json) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(card_id = %id, error = %e, "skipping unreadable share record");
                    None
                }
            })
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        records
    }
}
