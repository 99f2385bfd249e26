//! Embedded SQLite store.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension};

use super::schema;
use super::{KvStore, WriteOp};
use crate::Result;

/// File-backed [`KvStore`] using a single `kv` table.
pub struct SqliteStore {
    /// SQLite connection (protected by mutex for thread safety).
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a store at `path`, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        schema::init_schema(&conn)?;

        tracing::info!(path = %path.display(), "opened card store");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn unix_now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }
}

const UPSERT_SQL: &str = "INSERT INTO kv (namespace, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)
     ON CONFLICT(namespace, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";

const SELECT_SQL: &str = "SELECT value FROM kv WHERE namespace = ?1 AND key = ?2";

const DELETE_SQL: &str = "DELETE FROM kv WHERE namespace = ?1 AND key = ?2";

impl KvStore for SqliteStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock();
        let value = conn
            .query_row(SELECT_SQL, rusqlite::params![namespace, key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, namespace: &str, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            UPSERT_SQL,
            rusqlite::params![namespace, key, value, Self::unix_now()],
        )?;
        Ok(())
    }

    fn remove(&self, namespace: &str, key: &str) -> Result<bool> {
        let conn = self.conn.lock();
        let removed = conn.execute(DELETE_SQL, rusqlite::params![namespace, key])?;
        Ok(removed > 0)
    }

    fn entries(&self, namespace: &str) -> Result<Vec<(String, String)>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT key, value FROM kv WHERE namespace = ?1 ORDER BY key")?;
        let rows = stmt
            .query_map(rusqlite::params![namespace], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn write_batch(&self, ops: Vec<WriteOp>) -> Result<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let now = Self::unix_now();
        for op in &ops {
            match op {
                WriteOp::Put {
                    namespace,
                    key,
                    value,
                } => {
                    tx.execute(UPSERT_SQL, rusqlite::params![namespace, key, value, now])?;
                }
                WriteOp::Delete { namespace, key } => {
                    tx.execute(DELETE_SQL, rusqlite::params![namespace, key])?;
                }
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn update(
        &self,
        namespace: &str,
        key: &str,
        f: &mut dyn FnMut(Option<&str>) -> Option<String>,
    ) -> Result<Option<String>> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        let current: Option<String> = tx
            .query_row(SELECT_SQL, rusqlite::params![namespace, key], |row| {
                row.get(0)
            })
            .optional()?;

        let after = match f(current.as_deref()) {
            Some(next) => {
                tx.execute(
                    UPSERT_SQL,
                    rusqlite::params![namespace, key, next, Self::unix_now()],
                )?;
                Some(next)
            }
            None => current,
        };

        tx.commit()?;
        Ok(after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::exercise_store;

    #[test]
    fn test_sqlite_store_contract() {
        let store = SqliteStore::open_in_memory().unwrap();
        exercise_store(&store);
    }

    #[test]
    fn test_sqlite_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cards.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.set("ns", "k", "v").unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.get("ns", "k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_sqlite_update_is_serialized_across_threads() {
        let store = std::sync::Arc::new(SqliteStore::open_in_memory().unwrap());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        store
                            .update("ns", "n", &mut |current| {
                                let n: u64 = current.and_then(|v| v.parse().ok()).unwrap_or(0);
                                Some((n + 1).to_string())
                            })
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.get("ns", "n").unwrap().as_deref(), Some("100"));
    }
}
