//! Application configuration loaded from environment variables.

use std::path::PathBuf;

/// Default number of entries in the most-viewed list.
pub const DEFAULT_LEADERBOARD_SIZE: usize = 5;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8080").
    pub bind_addr: String,

    /// Public origin of this service, used to build share URLs.
    /// e.g., "https://cardly.app"
    pub base_url: String,

    /// Site name shown in page titles and OG tags.
    pub site_name: String,

    /// SQLite database file. `None` keeps all state in memory.
    pub db_path: Option<PathBuf>,

    /// Default number of cards in the most-viewed list.
    pub leaderboard_size: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `CARDLY_BIND_ADDR`: Server bind address (default: "0.0.0.0:8080")
    /// - `CARDLY_BASE_URL`: Public origin for share links (default: "http://localhost:8080")
    /// - `CARDLY_SITE_NAME`: Site name (default: "Cardly")
    /// - `CARDLY_DB_PATH`: SQLite file; unset or empty for in-memory storage
    /// - `CARDLY_LEADERBOARD_SIZE`: Most-viewed list size (default: 5)
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("CARDLY_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let base_url = std::env::var("CARDLY_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string())
            .trim_end_matches('/')
            .to_string();

        let site_name = std::env::var("CARDLY_SITE_NAME").unwrap_or_else(|_| "Cardly".to_string());

        let db_path = std::env::var("CARDLY_DB_PATH")
            .ok()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        let leaderboard_size = match std::env::var("CARDLY_LEADERBOARD_SIZE") {
            Ok(raw) => raw.trim().parse::<usize>().map_err(|e| {
                anyhow::anyhow!("CARDLY_LEADERBOARD_SIZE must be an integer: {e}")
            })?,
            Err(_) => DEFAULT_LEADERBOARD_SIZE,
        };

        tracing::info!(
            bind_addr = %bind_addr,
            base_url = %base_url,
            site_name = %site_name,
            db_path = ?db_path,
            leaderboard_size,
            "card server configuration loaded"
        );

        Ok(Self {
            bind_addr,
            base_url,
            site_name,
            db_path,
            leaderboard_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mutex to serialize config tests that manipulate env vars.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_KEYS: &[&str] = &[
        "CARDLY_BIND_ADDR",
        "CARDLY_BASE_URL",
        "CARDLY_SITE_NAME",
        "CARDLY_DB_PATH",
        "CARDLY_LEADERBOARD_SIZE",
    ];

    /// Helper to run config tests with isolated env vars.
    fn with_env_vars<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

        let saved: Vec<_> = ENV_KEYS
            .iter()
            .map(|k| (*k, std::env::var(k).ok()))
            .collect();

        // SAFETY: Serialized by mutex; only test code touches these vars.
        unsafe {
            for k in ENV_KEYS {
                std::env::remove_var(k);
            }
            for (k, v) in vars {
                std::env::set_var(k, v);
            }
        }

        f();

        // SAFETY: Restoring original env state.
        unsafe {
            for (k, v) in &saved {
                match v {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    #[test]
    fn config_defaults() {
        with_env_vars(&[], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.bind_addr, "0.0.0.0:8080");
            assert_eq!(config.base_url, "http://localhost:8080");
            assert_eq!(config.site_name, "Cardly");
            assert_eq!(config.db_path, None);
            assert_eq!(config.leaderboard_size, DEFAULT_LEADERBOARD_SIZE);
        });
    }

    #[test]
    fn config_custom_values() {
        with_env_vars(
            &[
                ("CARDLY_BIND_ADDR", "127.0.0.1:9090"),
                ("CARDLY_BASE_URL", "https://cardly.app"),
                ("CARDLY_SITE_NAME", "My Cards"),
                ("CARDLY_DB_PATH", "/var/lib/cardly/cards.db"),
                ("CARDLY_LEADERBOARD_SIZE", "10"),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.bind_addr, "127.0.0.1:9090");
                assert_eq!(config.base_url, "https://cardly.app");
                assert_eq!(config.site_name, "My Cards");
                assert_eq!(
                    config.db_path,
                    Some(PathBuf::from("/var/lib/cardly/cards.db"))
                );
                assert_eq!(config.leaderboard_size, 10);
            },
        );
    }

    #[test]
    fn config_base_url_trailing_slash_stripped() {
        with_env_vars(&[("CARDLY_BASE_URL", "https://cardly.app/")], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.base_url, "https://cardly.app");
        });
    }

    #[test]
    fn config_empty_db_path_means_memory() {
        with_env_vars(&[("CARDLY_DB_PATH", "  ")], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.db_path, None);
        });
    }

    #[test]
    fn config_invalid_leaderboard_size_rejected() {
        with_env_vars(&[("CARDLY_LEADERBOARD_SIZE", "lots")], || {
            assert!(Config::from_env().is_err());
        });
    }
}
