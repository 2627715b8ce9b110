//! Help command handler

use teloxide::{Bot, types::{Message, ParseMode}, prelude::*};
use crate::handlers::menu;
use crate::utils::errors::Result;

/// Handle /help command. Same text as the Help button, without navigation.
pub async fn handle_help(bot: Bot, msg: Message) -> Result<()> {
    let screen = menu::help();

    bot.send_message(msg.chat.id, screen.text)
        .parse_mode(ParseMode::Markdown)
        .await?;
    Ok(())
}
