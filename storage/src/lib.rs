//! Storage crate: SQLite persistence for sessions, messages and the user stats cache.
//!
//! ## Modules
//!
//! - [`error`] – Mapping from sqlx errors to [`assist_core::StoreError`]
//! - [`models`] – SessionRecord, MessageRecord, UserStatsRecord (row types)
//! - [`sqlite_store`] – SqliteStore, implementing `MessageStore` and `UserStatsStore`
//! - [`sqlite_pool`] – SqlitePoolManager

mod error;
mod models;
mod sqlite_pool;
mod sqlite_store;


pub use models::{MessageRecord, SessionRecord, UserStatsRecord};
pub use sqlite_pool::SqlitePoolManager;
pub use sqlite_store::SqliteStore;
