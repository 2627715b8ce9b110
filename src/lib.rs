//! StayBuddy Telegram Bot
//!
//! A Telegram bot for automatic join approval and scheduled member removal.
//! This library provides modular components for group activation, per-group
//! kick delay configuration, departure messages and the periodic eviction
//! sweep that enforces the deadlines.

#![allow(non_snake_case)]

pub mod config;
pub mod handlers;
pub mod services;
pub mod models;
pub mod database;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{StayBuddyError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use services::ServiceFactory;
pub use state::{MenuCache, PromptStorage};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
