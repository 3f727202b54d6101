//! Row types for the `chat_sessions`, `chat_messages` and `user_stats` tables.

mod message_record;
mod session_record;
mod user_stats_record;

pub use message_record::MessageRecord;
pub use session_record::SessionRecord;
pub use user_stats_record::UserStatsRecord;
