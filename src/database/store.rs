//! Persistence interfaces
//!
//! The lifecycle and sweeper services work against these traits rather than
//! concrete repositories, so tests can substitute in-memory stores. The
//! production implementations live in `database::repositories`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{CreateGroupConfigRequest, GroupConfig, MembershipRecord, TrackMemberRequest};
use crate::utils::errors::Result;

/// Durable per-group settings. A stored config means the bot is activated
/// for that chat; deleting it is the deactivation itself.
#[async_trait]
pub trait GroupConfigStore: Send + Sync {
    /// Insert a config unless the chat already has one. Returns the created
    /// row, or `None` when a config was already present. Concurrent calls
    /// are settled by the unique index on `chat_id`.
    async fn create_if_absent(&self, request: CreateGroupConfigRequest) -> Result<Option<GroupConfig>>;

    async fn find_by_chat_id(&self, chat_id: i64) -> Result<Option<GroupConfig>>;

    /// Set the kick delay, creating the config when absent.
    async fn upsert_kick_delay(&self, chat_id: i64, kick_after_ms: i64) -> Result<GroupConfig>;

    /// Set the departure message and enable it, creating the config when absent.
    async fn upsert_custom_message(&self, chat_id: i64, message: &str) -> Result<GroupConfig>;

    /// Flip the departure-message flag if the config exists; returns the new
    /// value, or `None` when the group is not activated.
    async fn toggle_custom_message(&self, chat_id: i64) -> Result<Option<bool>>;

    /// Delete the config. Returns whether a row was removed.
    async fn delete(&self, chat_id: i64) -> Result<bool>;
}

/// Durable scheduled-eviction records.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Record a tracked admission. Duplicate (user, chat) rows are tolerated.
    async fn track(&self, request: TrackMemberRequest) -> Result<MembershipRecord>;

    /// All records whose deadline has passed, oldest deadline first.
    async fn find_due(&self, now: DateTime<Utc>) -> Result<Vec<MembershipRecord>>;

    async fn delete_by_id(&self, id: i64) -> Result<()>;

    /// Remove every record for one (user, chat) pair; returns how many went.
    async fn delete_for_member(&self, chat_id: i64, user_id: i64) -> Result<u64>;
}
