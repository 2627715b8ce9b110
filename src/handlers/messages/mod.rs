//! Message handlers module
//!
//! Handles membership events (join requests, arrivals, departures) and the
//! replies that answer force-reply configuration prompts.

use teloxide::{
    Bot,
    prelude::*,
    types::{ChatId, ChatJoinRequest, Message, MessageId},
};
use tracing::{debug, error, warn};

use crate::services::{JoiningMember, ServiceFactory};
use crate::state::{PromptKind, PromptStorage};
use crate::utils::errors::Result;
use crate::utils::helpers::parse_positive_days;

/// Approve and track a pending join request.
pub async fn handle_chat_join_request(
    request: ChatJoinRequest,
    services: ServiceFactory,
) -> Result<()> {
    let chat_id = request.chat.id.0;
    let user_id = request.from.id.0 as i64;

    debug!(chat_id = chat_id, user_id = user_id, "Processing join request");
    services.lifecycle.handle_join_request(chat_id, user_id).await
}

/// Track members who joined the group directly.
pub async fn handle_new_chat_members(msg: Message, services: ServiceFactory) -> Result<()> {
    let members: Vec<JoiningMember> = match msg.new_chat_members() {
        Some(users) => users
            .iter()
            .map(|user| JoiningMember {
                user_id: user.id.0 as i64,
                is_bot: user.is_bot,
            })
            .collect(),
        None => return Ok(()),
    };

    services
        .lifecycle
        .handle_new_members(msg.chat.id.0, &members)
        .await
}

/// Drop tracking for a member who left on their own.
pub async fn handle_left_chat_member(msg: Message, services: ServiceFactory) -> Result<()> {
    let user = match msg.left_chat_member() {
        Some(user) => user,
        None => return Ok(()),
    };

    services
        .lifecycle
        .handle_member_left(msg.chat.id.0, user.id.0 as i64)
        .await
}

/// Handle replies to force-reply prompts (custom kick days, custom message).
///
/// A reply that does not match a live prompt is ignored, it is ordinary group
/// chatter. Invalid day input keeps the prompt alive for another attempt.
pub async fn handle_reply(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
    prompts: PromptStorage,
) -> Result<()> {
    let replied_to = match msg.reply_to_message() {
        Some(replied) => replied,
        None => return Ok(()),
    };

    let chat_id = msg.chat.id;
    let prompt = match prompts.load_prompt(chat_id.0, replied_to.id.0).await? {
        Some(prompt) => prompt,
        None => return Ok(()),
    };

    let user = match msg.from.as_ref() {
        Some(user) => user,
        None => return Ok(()),
    };
    let user_id = user.id.0 as i64;

    debug!(
        chat_id = chat_id.0,
        kind = ?prompt.kind,
        requested_by = prompt.requested_by,
        replied_by = user_id,
        "Reply matches a pending prompt"
    );

    // Prompts can outlive admin status, re-check before applying
    if !services.admin_gate.is_authorized(chat_id.0, user_id).await {
        return Ok(());
    }

    let input = msg.text().unwrap_or("");

    match prompt.kind {
        PromptKind::KickDays => match parse_positive_days(input) {
            Ok(days) => match services.lifecycle.set_kick_delay(chat_id.0, days).await {
                Ok(_) => {
                    close_prompt(&bot, &prompts, chat_id, replied_to.id).await;
                }
                Err(e) => {
                    error!(chat_id = chat_id.0, days = days, error = %e, "Failed to set kick time");
                    bot.send_message(chat_id, "Failed to set kick time.").await?;
                }
            },
            Err(_) => {
                debug!(chat_id = chat_id.0, input = %input, "Rejected custom days input");
                bot.send_message(chat_id, "Invalid number of days. Please enter a valid number.")
                    .await?;
            }
        },
        PromptKind::CustomMessage => {
            if input.is_empty() {
                debug!(chat_id = chat_id.0, "Ignoring non-text custom message reply");
                return Ok(());
            }

            services.lifecycle.set_custom_message(chat_id.0, input).await?;
            bot.send_message(chat_id, "Custom message has been set.").await?;
            close_prompt(&bot, &prompts, chat_id, replied_to.id).await;
        }
    }

    Ok(())
}

/// Remove a completed prompt: the stored entry and the prompt message itself.
async fn close_prompt(
    bot: &Bot,
    prompts: &PromptStorage,
    chat_id: ChatId,
    prompt_message_id: MessageId,
) {
    if let Err(e) = prompts.delete_prompt(chat_id.0, prompt_message_id.0).await {
        warn!(chat_id = chat_id.0, error = %e, "Failed to delete prompt entry");
    }
    if let Err(e) = bot.delete_message(chat_id, prompt_message_id).await {
        debug!(chat_id = chat_id.0, error = %e, "Failed to delete prompt message");
    }
}
