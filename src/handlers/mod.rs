//! Bot handlers module
//!
//! This module contains all Telegram bot handlers organized by type:
//! - Command handlers for bot commands
//! - Callback handlers for inline keyboard interactions
//! - Message handlers for membership events and prompt replies
//! - Menu builders shared by commands and callbacks

pub mod commands;
pub mod callbacks;
pub mod menu;
pub mod messages;

// Re-export commonly used handler functions
pub use commands::*;
pub use callbacks::*;
pub use messages::*;
