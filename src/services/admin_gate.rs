//! Admin authorization checks
//!
//! Management commands, callbacks and configuration replies are restricted to
//! group administrators. The gate has two entry points: `check` propagates
//! lookup failures to the caller (the sweeper wants them counted per record),
//! while `is_authorized` denies on failure and is what the handlers use.

use std::sync::Arc;

use tracing::warn;

use crate::services::chat::ChatApi;
use crate::utils::errors::Result;

#[derive(Clone)]
pub struct AdminGate {
    chat: Arc<dyn ChatApi>,
}

impl AdminGate {
    pub fn new(chat: Arc<dyn ChatApi>) -> Self {
        Self { chat }
    }

    /// Whether the user is currently an administrator of the group.
    pub async fn check(&self, chat_id: i64, user_id: i64) -> Result<bool> {
        let admins = self.chat.list_administrators(chat_id).await?;
        Ok(admins.contains(&user_id))
    }

    /// Fail-closed variant: a failed administrator lookup denies access.
    pub async fn is_authorized(&self, chat_id: i64, user_id: i64) -> bool {
        match self.check(chat_id, user_id).await {
            Ok(authorized) => authorized,
            Err(e) => {
                warn!(
                    chat_id = chat_id,
                    user_id = user_id,
                    error = %e,
                    "Failed to fetch administrators, denying access"
                );
                false
            }
        }
    }
}
