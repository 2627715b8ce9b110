//! Pending prompt storage
//!
//! Force-reply prompts (custom kick days, custom departure message) are
//! remembered in Redis keyed by chat and prompt message id, so an incoming
//! reply can be matched back to what was asked. Entries expire on their own,
//! an abandoned prompt simply stops being recognized.

use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RedisConfig;
use crate::utils::errors::Result;

/// What a pending prompt is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromptKind {
    KickDays,
    CustomMessage,
}

/// A force-reply prompt waiting for admin input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingPrompt {
    pub chat_id: i64,
    pub message_id: i32,
    pub kind: PromptKind,
    pub requested_by: i64,
    pub created_at: DateTime<Utc>,
}

impl PendingPrompt {
    pub fn new(chat_id: i64, message_id: i32, kind: PromptKind, requested_by: i64) -> Self {
        Self {
            chat_id,
            message_id,
            kind,
            requested_by,
            created_at: Utc::now(),
        }
    }
}

/// Redis-backed storage for pending prompts
#[derive(Clone)]
pub struct PromptStorage {
    connection_manager: redis::aio::ConnectionManager,
    config: RedisConfig,
}

impl PromptStorage {
    pub async fn new(config: RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str())?;
        let connection_manager = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            connection_manager,
            config,
        })
    }

    /// Save a prompt under its message key with the configured TTL.
    pub async fn save_prompt(&self, prompt: &PendingPrompt) -> Result<()> {
        let key = prompt_key(&self.config.prefix, prompt.chat_id, prompt.message_id);
        let serialized = serde_json::to_string(prompt)?;

        let mut conn = self.connection_manager.clone();
        conn.set_ex::<_, _, ()>(&key, serialized, self.config.ttl_seconds)
            .await?;

        debug!(
            chat_id = prompt.chat_id,
            message_id = prompt.message_id,
            kind = ?prompt.kind,
            "Prompt saved"
        );
        Ok(())
    }

    /// Look up the prompt a reply is answering, if it is still alive.
    pub async fn load_prompt(&self, chat_id: i64, message_id: i32) -> Result<Option<PendingPrompt>> {
        let key = prompt_key(&self.config.prefix, chat_id, message_id);

        let mut conn = self.connection_manager.clone();
        let serialized: Option<String> = conn.get::<&str, Option<String>>(&key).await?;

        match serialized {
            Some(data) => {
                let prompt: PendingPrompt = serde_json::from_str(&data)?;
                Ok(Some(prompt))
            }
            None => Ok(None),
        }
    }

    pub async fn delete_prompt(&self, chat_id: i64, message_id: i32) -> Result<()> {
        let key = prompt_key(&self.config.prefix, chat_id, message_id);

        let mut conn = self.connection_manager.clone();
        let deleted: u32 = conn.del(&key).await?;

        if deleted > 0 {
            debug!(chat_id = chat_id, message_id = message_id, "Prompt deleted");
        }
        Ok(())
    }
}

fn prompt_key(prefix: &str, chat_id: i64, message_id: i32) -> String {
    format!("{}prompt:{}:{}", prefix, chat_id, message_id)
}
