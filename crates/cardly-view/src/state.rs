//! Application state shared across all request handlers.

use std::sync::Arc;

use cardly_core::store::{KvStore, MemoryStore, SqliteStore};
use cardly_core::Resolver;

use crate::config::Config;

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<Config>,

    /// Card resolver; also owns the share registry and card store.
    pub resolver: Arc<Resolver>,
}

impl AppState {
    /// Create application state, opening the SQLite store when configured.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let store: Arc<dyn KvStore> = match &config.db_path {
            Some(path) => Arc::new(SqliteStore::open(path)?),
            None => {
                tracing::warn!("CARDLY_DB_PATH not set; cards are kept in memory only");
                Arc::new(MemoryStore::new())
            }
        };
        Ok(Self::with_store(config, store))
    }

    /// Create application state over an existing store.
    pub fn with_store(config: Config, store: Arc<dyn KvStore>) -> Self {
        let resolver = Resolver::new(store, config.base_url.clone());

        tracing::info!(
            base_url = %config.base_url,
            persistent = config.db_path.is_some(),
            "application state initialized"
        );

        Self {
            config: Arc::new(config),
            resolver: Arc::new(resolver),
        }
    }
}

#[cfg(test)]
mod tests {
    use cardly_core::Card;

    use super::*;

    fn config(db_path: Option<std::path::PathBuf>) -> Config {
        Config {
            bind_addr: "127.0.0.1:0".to_string(),
            base_url: "https://cards.test".to_string(),
            site_name: "Cardly".to_string(),
            db_path,
            leaderboard_size: 5,
        }
    }

    #[test]
    fn shares_survive_restart_with_db_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cardly.db");

        {
            let state = AppState::new(config(Some(path.clone()))).unwrap();
            state.resolver.registry().share(&Card::new("c1", "Acme Corp"));
            state.resolver.registry().counters().increment("c1");
        }

        let state = AppState::new(config(Some(path))).unwrap();
        let record = state.resolver.registry().lookup("acme-corp").unwrap();
        assert_eq!(record.id, "c1");
        assert_eq!(state.resolver.registry().counters().get("c1"), 1);
    }

    #[test]
    fn in_memory_without_db_path() {
        let state = AppState::new(config(None)).unwrap();
        assert!(state.resolver.registry().lookup("anything").is_none());
        assert_eq!(state.config.base_url, "https://cards.test");
    }
}
