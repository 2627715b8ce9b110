//! State management module
//!
//! Short-lived UI state: the last menu screen rendered per chat and the
//! pending force-reply prompts waiting for admin input.

pub mod menu_cache;
pub mod prompts;

// Re-export commonly used state components
pub use menu_cache::{MenuCache, MenuScreen};
pub use prompts::{PendingPrompt, PromptKind, PromptStorage};
