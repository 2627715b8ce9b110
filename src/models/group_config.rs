//! Group configuration model
//!
//! A `GroupConfig` row exists exactly while the bot is activated for a chat:
//! activation inserts it, deactivation deletes it. Lookups therefore return
//! `Option<GroupConfig>` where `None` means "not activated".

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::utils::helpers::days_to_ms;

/// Fallback kick delay for admissions through a join request (7 days)
pub const JOIN_REQUEST_DEFAULT_MS: i64 = days_to_ms(7);

/// Fallback kick delay for direct joins (1 day)
pub const DIRECT_JOIN_DEFAULT_MS: i64 = days_to_ms(1);

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GroupConfig {
    pub id: i64,
    pub chat_id: i64,
    /// Configured kick delay in milliseconds. Bare activation leaves this
    /// unset; the admission paths then fall back to their own defaults,
    /// which intentionally differ (7 days via join request, 1 day direct).
    pub kick_after_ms: Option<i64>,
    pub custom_message: String,
    pub custom_message_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GroupConfig {
    /// Effective delay for a member admitted through an approved join request
    pub fn join_request_delay_ms(&self) -> i64 {
        self.kick_after_ms.unwrap_or(JOIN_REQUEST_DEFAULT_MS)
    }

    /// Effective delay for a member who joined directly
    pub fn direct_join_delay_ms(&self) -> i64 {
        self.kick_after_ms.unwrap_or(DIRECT_JOIN_DEFAULT_MS)
    }

    /// Whether the departure notice should be sent before eviction
    pub fn departure_message(&self) -> Option<&str> {
        if self.custom_message_enabled && !self.custom_message.is_empty() {
            Some(&self.custom_message)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGroupConfigRequest {
    pub chat_id: i64,
    pub kick_after_ms: Option<i64>,
    pub custom_message: Option<String>,
    pub custom_message_enabled: Option<bool>,
}

impl CreateGroupConfigRequest {
    /// A bare activation: no delay configured, no custom message
    pub fn bare(chat_id: i64) -> Self {
        Self {
            chat_id,
            kick_after_ms: None,
            custom_message: None,
            custom_message_enabled: None,
        }
    }
}
