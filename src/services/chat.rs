//! Chat platform client
//!
//! `ChatApi` is the boundary between the lifecycle/sweeper services and
//! Telegram. Production code talks to `TelegramChatApi`; tests substitute a
//! recording mock. None of these calls retry on their own, the next event or
//! sweep tick is the retry.

use async_trait::async_trait;
use teloxide::{Bot, prelude::*};
use teloxide::types::{ChatId, UserId};

use crate::utils::errors::Result;

#[async_trait]
pub trait ChatApi: Send + Sync {
    /// User ids of the group's current administrators
    async fn list_administrators(&self, chat_id: i64) -> Result<Vec<i64>>;

    async fn approve_join_request(&self, chat_id: i64, user_id: i64) -> Result<()>;

    async fn ban_member(&self, chat_id: i64, user_id: i64) -> Result<()>;

    /// Message to the user's private chat
    async fn send_direct_message(&self, user_id: i64, text: &str) -> Result<()>;

    async fn send_group_message(&self, chat_id: i64, text: &str) -> Result<()>;
}

/// Telegram Bot API implementation of `ChatApi`
#[derive(Clone)]
pub struct TelegramChatApi {
    bot: Bot,
}

impl TelegramChatApi {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatApi for TelegramChatApi {
    async fn list_administrators(&self, chat_id: i64) -> Result<Vec<i64>> {
        let admins = self.bot.get_chat_administrators(ChatId(chat_id)).await?;
        Ok(admins
            .into_iter()
            .map(|member| member.user.id.0 as i64)
            .collect())
    }

    async fn approve_join_request(&self, chat_id: i64, user_id: i64) -> Result<()> {
        self.bot
            .approve_chat_join_request(ChatId(chat_id), UserId(user_id as u64))
            .await?;
        Ok(())
    }

    async fn ban_member(&self, chat_id: i64, user_id: i64) -> Result<()> {
        self.bot
            .ban_chat_member(ChatId(chat_id), UserId(user_id as u64))
            .await?;
        Ok(())
    }

    async fn send_direct_message(&self, user_id: i64, text: &str) -> Result<()> {
        self.bot.send_message(ChatId(user_id), text).await?;
        Ok(())
    }

    async fn send_group_message(&self, chat_id: i64, text: &str) -> Result<()> {
        self.bot.send_message(ChatId(chat_id), text).await?;
        Ok(())
    }
}
