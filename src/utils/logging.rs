//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the StayBuddy application.

use tracing::{info, warn, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration
///
/// The returned guard owns the background file writer; it must stay alive
/// for the lifetime of the process or file output stops flushing.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    std::fs::create_dir_all(&config.file_path)?;
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "staybuddy.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log group lifecycle events with structured data
pub fn log_group_event(chat_id: i64, event: &str, user_id: Option<i64>, details: Option<&str>) {
    info!(
        chat_id = chat_id,
        event = event,
        user_id = user_id,
        details = details,
        "Group event occurred"
    );
}

/// Log admin configuration actions
pub fn log_admin_action(admin_id: i64, chat_id: i64, action: &str, details: Option<&str>) {
    info!(
        admin_id = admin_id,
        chat_id = chat_id,
        action = action,
        details = details,
        "Admin action performed"
    );
}

/// Log the outcome of one eviction attempt
pub fn log_eviction(chat_id: i64, user_id: i64, evicted: bool, details: Option<&str>) {
    if evicted {
        info!(
            chat_id = chat_id,
            user_id = user_id,
            "Member evicted"
        );
    } else {
        warn!(
            chat_id = chat_id,
            user_id = user_id,
            details = details,
            "Eviction attempt did not complete"
        );
    }
}

/// Log events for groups the bot is not activated in
pub fn log_untracked_group(chat_id: i64, event: &str) {
    debug!(
        chat_id = chat_id,
        event = event,
        "Event for a group without an active config, ignoring"
    );
}
