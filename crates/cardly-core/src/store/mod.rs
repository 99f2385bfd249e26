//! Namespaced key-value storage.
//!
//! All persisted card state goes through the [`KvStore`] trait so the sharing
//! protocol does not care whether it is backed by an in-process map or an
//! embedded SQLite file.
//!
//! # Namespaces
//!
//! | Namespace | Key | Value |
//! |-----------|-----|-------|
//! | [`namespaces::CARDS`] | card id | card JSON |
//! | [`namespaces::SHARED_CARDS`] | card id | share record JSON |
//! | [`namespaces::SHARED_BY_SLUG`] | slug | card id |
//! | [`namespaces::VIEW_COUNTS`] | card id | decimal count |

mod memory;
mod schema;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::Result;

/// Namespace names, kept identical to the browser client's storage keys.
pub mod namespaces {
    /// Locally-authored cards.
    pub const CARDS: &str = "businessCards";
    /// Share records keyed by card id.
    pub const SHARED_CARDS: &str = "sharedBusinessCards";
    /// Secondary slug index: slug -> card id.
    pub const SHARED_BY_SLUG: &str = "sharedCardsBySlug";
    /// View counters keyed by card id.
    pub const VIEW_COUNTS: &str = "cardViewCounts";
}

/// A single write in an atomic batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    /// Insert or overwrite a value.
    Put {
        namespace: &'static str,
        key: String,
        value: String,
    },
    /// Remove a key (no-op if absent).
    Delete { namespace: &'static str, key: String },
}

/// Synchronous namespaced key-value store.
///
/// Implementations must make [`KvStore::update`] and [`KvStore::write_batch`]
/// atomic with respect to every other call on the same store.
pub trait KvStore: Send + Sync {
    /// Read a value.
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&self, namespace: &str, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Returns whether it existed.
    fn remove(&self, namespace: &str, key: &str) -> Result<bool>;

    /// All entries in a namespace, ordered by key.
    fn entries(&self, namespace: &str) -> Result<Vec<(String, String)>>;

    /// Apply all writes or none.
    fn write_batch(&self, ops: Vec<WriteOp>) -> Result<()>;

    /// Atomic read-modify-write.
    ///
    /// `f` receives the current value; returning `Some` stores the new value,
    /// `None` leaves the key untouched. Returns the value held afterwards.
    fn update(
        &self,
        namespace: &str,
        key: &str,
        f: &mut dyn FnMut(Option<&str>) -> Option<String>,
    ) -> Result<Option<String>>;
}

#[cfg(test)]
pub(crate) mod testing {
    //! Store doubles shared by unit tests.

    use super::*;
    use crate::Error;

    /// A store whose every operation fails, like a browser with storage
    /// disabled or over quota.
    #[derive(Debug, Default)]
    pub struct FailingStore;

    fn denied<T>() -> Result<T> {
        Err(Error::Storage("quota exceeded".to_string()))
    }

    impl KvStore for FailingStore {
        fn get(&self, _: &str, _: &str) -> Result<Option<String>> {
            denied()
        }

        fn set(&self, _: &str, _: &str, _: &str) -> Result<()> {
            denied()
        }

        fn remove(&self, _: &str, _: &str) -> Result<bool> {
            denied()
        }

        fn entries(&self, _: &str) -> Result<Vec<(String, String)>> {
            denied()
        }

        fn write_batch(&self, _: Vec<WriteOp>) -> Result<()> {
            denied()
        }

        fn update(
            &self,
            _: &str,
            _: &str,
            _: &mut dyn FnMut(Option<&str>) -> Option<String>,
        ) -> Result<Option<String>> {
            denied()
        }
    }

    /// Behaviour every backend must share.
    pub fn exercise_store(store: &dyn KvStore) {
        assert_eq!(store.get("ns", "a").unwrap(), None);

        store.set("ns", "b", "2").unwrap();
        store.set("ns", "a", "1").unwrap();
        store.set("other", "a", "x").unwrap();
        assert_eq!(store.get("ns", "a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("other", "a").unwrap().as_deref(), Some("x"));

        let entries = store.entries("ns").unwrap();
        assert_eq!(
            entries,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string())
            ]
        );

        assert!(store.remove("ns", "a").unwrap());
        assert!(!store.remove("ns", "a").unwrap());
        assert_eq!(store.get("ns", "a").unwrap(), None);

        let after = store
            .update("ns", "counter", &mut |current| {
                let n: u64 = current.and_then(|v| v.parse().ok()).unwrap_or(0);
                Some((n + 5).to_string())
            })
            .unwrap();
        assert_eq!(after.as_deref(), Some("5"));

        let unchanged = store.update("ns", "counter", &mut |_| None).unwrap();
        assert_eq!(unchanged.as_deref(), Some("5"));

        store
            .write_batch(vec![
                WriteOp::Put {
                    namespace: "ns",
                    key: "c".to_string(),
                    value: "3".to_string(),
                },
                WriteOp::Delete {
                    namespace: "ns",
                    key: "b".to_string(),
                },
            ])
            .unwrap();
        assert_eq!(store.get("ns", "c").unwrap().as_deref(), Some("3"));
        assert_eq!(store.get("ns", "b").unwrap(), None);
    }
}
