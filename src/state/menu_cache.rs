//! Last rendered menu per chat
//!
//! Backs the Back button. The cache is process-wide and in-memory: a restart
//! empties it, and Back does nothing for a chat until a new hub screen has
//! been shown there. Only hub screens are stored, transient screens such as
//! the kick time picker are not, so Back always returns to a hub.

use std::collections::HashMap;
use std::sync::Arc;

use teloxide::types::{ChatId, InlineKeyboardMarkup};
use tokio::sync::RwLock;

/// A rendered menu: message text plus its inline keyboard
#[derive(Debug, Clone, PartialEq)]
pub struct MenuScreen {
    pub text: String,
    pub keyboard: InlineKeyboardMarkup,
}

impl MenuScreen {
    pub fn new(text: String, keyboard: InlineKeyboardMarkup) -> Self {
        Self { text, keyboard }
    }
}

#[derive(Clone, Default)]
pub struct MenuCache {
    screens: Arc<RwLock<HashMap<ChatId, MenuScreen>>>,
}

impl MenuCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remembers the screen Back should restore for this chat.
    pub async fn store(&self, chat_id: ChatId, screen: MenuScreen) {
        self.screens.write().await.insert(chat_id, screen);
    }

    /// Most recently stored screen for this chat, if any.
    pub async fn last(&self, chat_id: ChatId) -> Option<MenuScreen> {
        self.screens.read().await.get(&chat_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButton;

    fn screen(text: &str) -> MenuScreen {
        let keyboard = InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
            "Back", "nav:back",
        )]]);
        MenuScreen::new(text.to_string(), keyboard)
    }

    #[tokio::test]
    async fn test_store_and_last() {
        let cache = MenuCache::new();
        let chat = ChatId(-100);

        assert!(cache.last(chat).await.is_none());

        cache.store(chat, screen("first")).await;
        assert_eq!(cache.last(chat).await.unwrap().text, "first");

        cache.store(chat, screen("second")).await;
        assert_eq!(cache.last(chat).await.unwrap().text, "second");
    }

    #[tokio::test]
    async fn test_chats_are_independent() {
        let cache = MenuCache::new();

        cache.store(ChatId(-1), screen("group one")).await;

        assert!(cache.last(ChatId(-2)).await.is_none());
        assert_eq!(cache.last(ChatId(-1)).await.unwrap().text, "group one");
    }
}
