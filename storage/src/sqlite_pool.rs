//! SQLite connection pool wrapper for the storage crate.

use std::str::FromStr;

use log::info;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Manages a single SQLite pool; creates the DB file if missing.
///
/// `sqlite::memory:` (or `:memory:`) opens a private in-memory database held by one
/// long-lived connection so every query sees the same data.
#[derive(Clone)]
pub struct SqlitePoolManager {
    pool: SqlitePool,
}

impl SqlitePoolManager {
    /// Creates a pool for the given database URL (`sqlite:path`, `file:path`, bare path or in-memory).
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        info!("Initializing SQLite pool: {}", database_url);

        let in_memory = is_in_memory(database_url);
        let options = if in_memory {
            SqliteConnectOptions::from_str("sqlite::memory:")?
        } else {
            SqliteConnectOptions::new()
                .filename(file_path(database_url))
                .create_if_missing(true)
        }
        .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { 5 })
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Returns the underlying pool for running queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn is_in_memory(database_url: &str) -> bool {
    matches!(database_url, ":memory:" | "sqlite::memory:" | "sqlite://:memory:")
}

fn file_path(database_url: &str) -> &str {
    ["sqlite://", "sqlite:", "file:"]
        .iter()
        .find_map(|prefix| database_url.strip_prefix(prefix))
        .unwrap_or(database_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_path_strips_scheme() {
        assert_eq!(file_path("sqlite://data/assist.db"), "data/assist.db");
        assert_eq!(file_path("sqlite:assist.db"), "assist.db");
        assert_eq!(file_path("file:./assist.db"), "./assist.db");
        assert_eq!(file_path("assist.db"), "assist.db");
    }

    #[test]
    fn test_in_memory_urls() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory(":memory:"));
        assert!(!is_in_memory("memory.db"));
    }
}
