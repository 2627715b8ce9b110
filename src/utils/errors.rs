//! Error handling for StayBuddy
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for StayBuddy application
#[derive(Error, Debug)]
pub enum StayBuddyError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for StayBuddy operations
pub type Result<T> = std::result::Result<T, StayBuddyError>;

impl StayBuddyError {
    /// Check if the error is recoverable
    ///
    /// Recoverable errors are transient I/O failures that the next event or
    /// sweep tick may succeed past; the rest point at bugs or bad deployment.
    pub fn is_recoverable(&self) -> bool {
        match self {
            StayBuddyError::Database(_) => true,
            StayBuddyError::Migration(_) => false,
            StayBuddyError::Telegram(_) => true,
            StayBuddyError::Redis(_) => true,
            StayBuddyError::Serialization(_) => false,
            StayBuddyError::Io(_) => true,
            StayBuddyError::UrlParse(_) => false,
            StayBuddyError::Config(_) => false,
            StayBuddyError::InvalidInput(_) => false,
        }
    }
}
