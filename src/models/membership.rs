//! Membership tracking model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// One scheduled eviction for one user in one group.
///
/// `kick_date` is fixed when the row is created; changing the group's kick
/// delay later never rewrites existing rows. Rows are deleted when the user
/// leaves or when the sweeper evicts them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MembershipRecord {
    pub id: i64,
    pub user_id: i64,
    pub chat_id: i64,
    pub join_date: DateTime<Utc>,
    pub kick_date: DateTime<Utc>,
}

impl MembershipRecord {
    /// Whether the eviction deadline has passed
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.kick_date <= now
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackMemberRequest {
    pub user_id: i64,
    pub chat_id: i64,
    pub kick_date: DateTime<Utc>,
}
