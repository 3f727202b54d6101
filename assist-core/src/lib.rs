//! # assist-core
//!
//! Core types and traits for the personalization engine: [`Message`], [`Session`],
//! [`Classification`], the [`UserStats`] cache, the [`MessageStore`] / [`UserStatsStore`]
//! seams implemented by `storage` and `store-inmemory`, and tracing initialization.
//!
//! ## Modules
//!
//! - [`types`] - Role, UserCategory, Language, Sentiment, Message, Session, Classification
//! - [`user_stats`] - Bounded per-user cache of recent classifications
//! - [`store`] - MessageStore and UserStatsStore traits
//! - [`text`] - Character-sequence similarity and truncation helpers
//! - [`error`] - StoreError, ParseLabelError
//! - [`logger`] - init_tracing

pub mod error;
pub mod logger;
pub mod store;
pub mod text;
pub mod types;
pub mod user_stats;

pub use error::{ParseLabelError, StoreError, StoreResult};
pub use logger::init_tracing;
pub use store::{MessageNeighbors, MessageStore, UserStatsStore};
pub use text::{round_to, sequence_ratio, truncate_chars};
pub use types::{
    Classification, Language, Message, NewMessage, NewSession, Role, Sentiment, Session,
    UserCategory, GENERAL_QUERY, GUEST_USER_ID, UNKNOWN_INTENT,
};
pub use user_stats::{TurnStats, UserStats, USER_STATS_CAPACITY};

#[cfg(test)]
mod user_stats_test;
