//! Menu screens and callback vocabulary
//!
//! Builders for every inline menu the bot renders, plus the parser for the
//! `namespace:action` strings carried in callback data. Hub screens (start,
//! activation results) are cached for Back navigation by the callers, picker
//! and status screens are transient.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::state::menu_cache::MenuScreen;
use crate::utils::errors::Result;
use crate::utils::helpers::MAX_KICK_DAYS;

/// A recognized callback action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Help,
    Back,
    Activate,
    Deactivate,
    KickTimeMenu,
    SetKickDays(i64),
    KickCustomPrompt,
    KickMessageMenu,
    SetMessagePrompt,
    ToggleMessage,
}

impl MenuAction {
    /// Parses callback data. Unknown or malformed data is `None`.
    pub fn parse(data: &str) -> Option<Self> {
        let parts: Vec<&str> = data.split(':').collect();
        match parts.as_slice() {
            ["nav", "help"] => Some(Self::Help),
            ["nav", "back"] => Some(Self::Back),
            ["cfg", "activate"] => Some(Self::Activate),
            ["cfg", "deactivate"] => Some(Self::Deactivate),
            ["kick", "menu"] => Some(Self::KickTimeMenu),
            ["kick", "custom"] => Some(Self::KickCustomPrompt),
            ["kick", days] => days
                .parse::<i64>()
                .ok()
                .filter(|d| (1..=MAX_KICK_DAYS).contains(d))
                .map(Self::SetKickDays),
            ["msg", "menu"] => Some(Self::KickMessageMenu),
            ["msg", "set"] => Some(Self::SetMessagePrompt),
            ["msg", "toggle"] => Some(Self::ToggleMessage),
            _ => None,
        }
    }
}

/// Start menu for private chats, with the add-to-group deep link.
pub fn private_start(bot_username: &str) -> Result<MenuScreen> {
    let text = "*Welcome to the Auto Approve Bot!*\n\nThis bot helps you manage your group by automatically approving join requests and removing members after a specified time.\n\n🔍 Need help? Press the button below.";

    let invite_url = reqwest::Url::parse(&format!(
        "https://t.me/{}?startgroup=true&admin=ban_users",
        bot_username
    ))?;
    let keyboard = InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback("📋 Help", "nav:help")],
        vec![InlineKeyboardButton::url("➕ Add me to your group", invite_url)],
    ]);

    Ok(MenuScreen::new(text.to_string(), keyboard))
}

/// Start menu for groups. Management options only appear while active.
pub fn group_start(active: bool) -> MenuScreen {
    let text = "*The Auto Approve Bot*\n\nTo manage the bot, use the options below.";

    let keyboard = if active {
        management_keyboard()
    } else {
        InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
            "Activate Bot",
            "cfg:activate",
        )]])
    };

    MenuScreen::new(text.to_string(), keyboard)
}

pub fn help() -> MenuScreen {
    let text = "*Auto Approve Bot Help Menu*\n\nHere’s a brief overview of what this bot can do:\n\n1. **Auto Approve Join Requests**: Automatically approves new join requests to your group.\n2. **Kick Members**: Automatically kicks out members after a specified period.\n3. **Set Kick Time**: Customize how long members stay in the group before being kicked.\n4. **Set Kick Message**: Define a custom message to be sent to the member when kicked.\n\nUse the buttons below to navigate the options.";

    let keyboard = InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "🔙 Back",
        "nav:back",
    )]]);

    MenuScreen::new(text.to_string(), keyboard)
}

pub fn activated() -> MenuScreen {
    let text = "The bot has been activated for this group.\n\nClick the button below to deactivate it.";
    MenuScreen::new(text.to_string(), management_keyboard())
}

pub fn already_active() -> MenuScreen {
    let text =
        "The bot is already activated in this group. Click the button below to deactivate it.";
    let keyboard = InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "Deactivate Bot",
        "cfg:deactivate",
    )]]);
    MenuScreen::new(text.to_string(), keyboard)
}

pub fn deactivated() -> MenuScreen {
    let text =
        "The bot has been deactivated for this group.\n\nClick the button below to activate it.";
    MenuScreen::new(text.to_string(), activate_keyboard())
}

pub fn not_active() -> MenuScreen {
    let text = "The bot is not activated in this group. Click the button below to activate it.";
    MenuScreen::new(text.to_string(), activate_keyboard())
}

/// Kick delay picker. Transient, Back returns to the last hub screen.
pub fn kick_time_picker() -> MenuScreen {
    let text =
        "Please choose how many days a user should remain in the group before being kicked.";

    let keyboard = InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback("1 Day", "kick:1"),
            InlineKeyboardButton::callback("7 Days", "kick:7"),
        ],
        vec![
            InlineKeyboardButton::callback("14 Days", "kick:14"),
            InlineKeyboardButton::callback("30 Days", "kick:30"),
        ],
        vec![
            InlineKeyboardButton::callback("Back", "nav:back"),
            InlineKeyboardButton::callback("Custom Days", "kick:custom"),
        ],
    ]);

    MenuScreen::new(text.to_string(), keyboard)
}

/// Departure message menu with the current flag state.
pub fn kick_message_menu(enabled: bool) -> MenuScreen {
    let keyboard = InlineKeyboardMarkup::new(vec![
        vec![toggle_button(enabled)],
        vec![InlineKeyboardButton::callback(
            "Set Custom Message",
            "msg:set",
        )],
        vec![InlineKeyboardButton::callback("Back", "nav:back")],
    ]);

    MenuScreen::new(status_text(enabled), keyboard)
}

/// Shown right after the flag was flipped.
pub fn kick_message_toggled(enabled: bool) -> MenuScreen {
    let keyboard = InlineKeyboardMarkup::new(vec![
        vec![toggle_button(enabled)],
        vec![InlineKeyboardButton::callback("Back", "nav:back")],
    ]);

    MenuScreen::new(status_text(enabled), keyboard)
}

fn status_text(enabled: bool) -> String {
    format!(
        "Custom message is currently {}.",
        if enabled { "enabled" } else { "disabled" }
    )
}

fn toggle_button(enabled: bool) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(
        if enabled {
            "Disable Message"
        } else {
            "Enable Message"
        },
        "msg:toggle",
    )
}

fn management_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback("Kick Time", "kick:menu")],
        vec![InlineKeyboardButton::callback("Kick Message", "msg:menu")],
        vec![InlineKeyboardButton::callback("Deactivate Bot", "cfg:deactivate")],
    ])
}

fn activate_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "Activate Bot",
        "cfg:activate",
    )]])
}
