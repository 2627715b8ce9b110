//! Command handlers module
//!
//! This module contains handlers for the bot commands

pub mod help;
pub mod start;

use teloxide::{Bot, types::Message, utils::command::BotCommands};

use crate::services::{BotIdentity, ServiceFactory};
use crate::state::MenuCache;
use crate::utils::errors::Result;

/// All available bot commands
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "StayBuddy commands:")]
pub enum Command {
    #[command(description = "Open the management menu")]
    Start,
    #[command(description = "Show help information")]
    Help,
}

/// Main command dispatcher
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    services: ServiceFactory,
    menu_cache: MenuCache,
    identity: BotIdentity,
) -> Result<()> {
    match cmd {
        Command::Start => start::handle_start(bot, msg, services, menu_cache, identity).await,
        Command::Help => help::handle_help(bot, msg).await,
    }
}
