//! Start command handler
//!
//! Renders the entry menu: the onboarding menu in private chats, the group
//! management hub in groups. Group menus are admin-only, everyone else gets
//! silence.

use teloxide::{Bot, types::{Message, ParseMode}, prelude::*};
use tracing::{debug, error};

use crate::handlers::menu;
use crate::services::{BotIdentity, ServiceFactory};
use crate::state::MenuCache;
use crate::utils::errors::{Result, StayBuddyError};

/// Handle /start command
pub async fn handle_start(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
    menu_cache: MenuCache,
    identity: BotIdentity,
) -> Result<()> {
    let user = msg.from.as_ref().ok_or_else(|| {
        StayBuddyError::InvalidInput("No user in message".to_string())
    })?;

    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id;

    debug!(user_id = user_id, chat_id = ?chat_id, "Processing /start command");

    if chat_id.is_user() {
        let screen = menu::private_start(&identity.username)?;
        menu_cache.store(chat_id, screen.clone()).await;

        bot.send_message(chat_id, screen.text)
            .reply_markup(screen.keyboard)
            .parse_mode(ParseMode::Markdown)
            .await?;
        return Ok(());
    }

    if !msg.chat.is_group() && !msg.chat.is_supergroup() {
        return Ok(());
    }

    if !services.admin_gate.is_authorized(chat_id.0, user_id).await {
        debug!(user_id = user_id, chat_id = chat_id.0, "Non-admin /start in group, ignoring");
        return Ok(());
    }

    let active = match services.lifecycle.group_config(chat_id.0).await {
        Ok(config) => config.is_some(),
        Err(e) => {
            error!(chat_id = chat_id.0, error = %e, "Failed to check group activation status");
            bot.send_message(
                chat_id,
                "An error occurred while checking the bot status. Please try again later.",
            )
            .await?;
            return Ok(());
        }
    };

    let screen = menu::group_start(active);
    menu_cache.store(chat_id, screen.clone()).await;

    bot.send_message(chat_id, screen.text)
        .reply_markup(screen.keyboard)
        .parse_mode(ParseMode::Markdown)
        .await?;

    Ok(())
}
