//! Callback query handlers module
//!
//! This module routes inline keyboard presses. The query is answered first to
//! clear the client's loading state, then the action is parsed and gated:
//! management actions in groups require the presser to be an administrator,
//! private chats only carry navigation.

use teloxide::{
    Bot,
    prelude::*,
    types::{CallbackQuery, ChatId, ForceReply, MessageId, ParseMode},
};
use tracing::{debug, error, warn};

use crate::handlers::menu::{self, MenuAction};
use crate::services::{Activation, Deactivation, ServiceFactory};
use crate::state::menu_cache::MenuScreen;
use crate::state::{MenuCache, PendingPrompt, PromptKind, PromptStorage};
use crate::utils::errors::Result;
use crate::utils::logging;

/// Main callback query dispatcher
pub async fn handle_callback_query(
    bot: Bot,
    query: CallbackQuery,
    services: ServiceFactory,
    menu_cache: MenuCache,
    prompts: PromptStorage,
) -> Result<()> {
    let user_id = query.from.id.0 as i64;
    let chat_id = query.message.as_ref().map(|m| m.chat().id);
    let message_id = query.message.as_ref().map(|m| m.id());

    debug!(
        user_id = user_id,
        chat_id = ?chat_id,
        callback_data = ?query.data,
        "Processing callback query"
    );

    // Answer first to remove the loading state
    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        warn!(error = %e, callback_id = %query.id, "Failed to answer callback query");
    }

    let data = match query.data {
        Some(data) => data,
        None => return Ok(()),
    };

    let action = match MenuAction::parse(&data) {
        Some(action) => action,
        None => {
            warn!(user_id = user_id, data = %data, "Unknown callback data");
            return Ok(());
        }
    };

    let (chat_id, message_id) = match (chat_id, message_id) {
        (Some(chat_id), Some(message_id)) => (chat_id, message_id),
        _ => {
            debug!(user_id = user_id, "Callback without an accessible message, ignoring");
            return Ok(());
        }
    };

    if !chat_id.is_user() && !services.admin_gate.is_authorized(chat_id.0, user_id).await {
        debug!(user_id = user_id, chat_id = chat_id.0, "Non-admin callback in group, ignoring");
        return Ok(());
    }

    match action {
        MenuAction::Help => {
            edit_screen(&bot, chat_id, message_id, menu::help()).await?;
        }
        MenuAction::Back => match menu_cache.last(chat_id).await {
            Some(screen) => edit_screen(&bot, chat_id, message_id, screen).await?,
            None => debug!(chat_id = chat_id.0, "No cached screen for Back, ignoring"),
        },
        MenuAction::Activate => match services.lifecycle.activate(chat_id.0).await {
            Ok(outcome) => {
                let screen = match outcome {
                    Activation::Activated => menu::activated(),
                    Activation::AlreadyActive => menu::already_active(),
                };
                menu_cache.store(chat_id, screen.clone()).await;
                edit_screen(&bot, chat_id, message_id, screen).await?;
                logging::log_admin_action(user_id, chat_id.0, "activate", None);
            }
            Err(e) => {
                error!(chat_id = chat_id.0, error = %e, "Failed to activate the bot");
                bot.send_message(chat_id, "Failed to activate the bot.").await?;
            }
        },
        MenuAction::Deactivate => match services.lifecycle.deactivate(chat_id.0).await {
            Ok(outcome) => {
                let screen = match outcome {
                    Deactivation::Deactivated => menu::deactivated(),
                    Deactivation::NotActive => menu::not_active(),
                };
                menu_cache.store(chat_id, screen.clone()).await;
                edit_screen(&bot, chat_id, message_id, screen).await?;
                logging::log_admin_action(user_id, chat_id.0, "deactivate", None);
            }
            Err(e) => {
                error!(chat_id = chat_id.0, error = %e, "Failed to deactivate the bot");
                bot.send_message(chat_id, "Failed to deactivate the bot.").await?;
            }
        },
        MenuAction::KickTimeMenu => {
            if let Err(e) = edit_screen(&bot, chat_id, message_id, menu::kick_time_picker()).await {
                error!(chat_id = chat_id.0, error = %e, "Failed to load kick time options");
                bot.send_message(chat_id, "Failed to load kick time options.")
                    .await?;
            }
        }
        MenuAction::SetKickDays(days) => {
            // Confirmation message is sent by the service
            match services.lifecycle.set_kick_delay(chat_id.0, days).await {
                Ok(_) => {
                    logging::log_admin_action(
                        user_id,
                        chat_id.0,
                        "set_kick_delay",
                        Some(&format!("{} day(s)", days)),
                    );
                }
                Err(e) => {
                    error!(chat_id = chat_id.0, days = days, error = %e, "Failed to set kick time");
                    bot.send_message(chat_id, "Failed to set kick time.").await?;
                }
            }
        }
        MenuAction::KickCustomPrompt => {
            open_prompt(
                &bot,
                &prompts,
                chat_id,
                message_id,
                user_id,
                PromptKind::KickDays,
                "Please enter the number of custom days:",
            )
            .await?;
        }
        MenuAction::SetMessagePrompt => {
            open_prompt(
                &bot,
                &prompts,
                chat_id,
                message_id,
                user_id,
                PromptKind::CustomMessage,
                "Please enter the custom message:",
            )
            .await?;
        }
        MenuAction::KickMessageMenu => match services.lifecycle.group_config(chat_id.0).await {
            Ok(Some(config)) => {
                let screen = menu::kick_message_menu(config.custom_message_enabled);
                edit_screen(&bot, chat_id, message_id, screen).await?;
            }
            Ok(None) => {
                bot.send_message(chat_id, "The bot is not activated in this group.")
                    .await?;
            }
            Err(e) => {
                error!(chat_id = chat_id.0, error = %e, "Failed to load kick message options");
                bot.send_message(chat_id, "Failed to load kick message options.")
                    .await?;
            }
        },
        MenuAction::ToggleMessage => match services.lifecycle.toggle_custom_message(chat_id.0).await
        {
            Ok(Some(enabled)) => {
                edit_screen(&bot, chat_id, message_id, menu::kick_message_toggled(enabled)).await?;
                logging::log_admin_action(
                    user_id,
                    chat_id.0,
                    "toggle_custom_message",
                    Some(if enabled { "enabled" } else { "disabled" }),
                );
            }
            Ok(None) => {
                bot.send_message(chat_id, "The bot is not activated in this group.")
                    .await?;
            }
            Err(e) => {
                error!(chat_id = chat_id.0, error = %e, "Failed to toggle kick message");
                bot.send_message(chat_id, "Failed to toggle kick message.").await?;
            }
        },
    }

    Ok(())
}

/// Replace the menu message in place.
async fn edit_screen(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    screen: MenuScreen,
) -> Result<()> {
    bot.edit_message_text(chat_id, message_id, screen.text)
        .reply_markup(screen.keyboard)
        .parse_mode(ParseMode::Markdown)
        .await?;
    Ok(())
}

/// Send a force-reply prompt and remember what it waits for. The menu message
/// is removed so the prompt stands alone.
async fn open_prompt(
    bot: &Bot,
    prompts: &PromptStorage,
    chat_id: ChatId,
    menu_message_id: MessageId,
    user_id: i64,
    kind: PromptKind,
    text: &str,
) -> Result<()> {
    let sent = bot
        .send_message(chat_id, text)
        .reply_markup(ForceReply::new())
        .await?;

    if let Err(e) = bot.delete_message(chat_id, menu_message_id).await {
        debug!(chat_id = chat_id.0, error = %e, "Failed to delete menu message");
    }

    prompts
        .save_prompt(&PendingPrompt::new(chat_id.0, sent.id.0, kind, user_id))
        .await?;
    Ok(())
}
