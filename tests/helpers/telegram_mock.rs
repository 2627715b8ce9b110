//! Mock Telegram API Server for testing
//!
//! This module provides a mock HTTP server that simulates the Telegram Bot API
//! for testing purposes. It uses wiremock to create configurable mock responses.

use serde_json::{json, Value};
use teloxide::Bot;
use wiremock::{matchers::method, Match, Mock, MockServer, Request, ResponseTemplate};

/// Case-insensitive exact path matcher.
///
/// The Telegram Bot API treats method names case-insensitively, and
/// teloxide sends them in PascalCase (e.g. `GetChatAdministrators`), so
/// the mock must not require an exact-case match.
struct PathIgnoreCase(String);

impl Match for PathIgnoreCase {
    fn matches(&self, request: &Request) -> bool {
        request.url.path().eq_ignore_ascii_case(&self.0)
    }
}

/// Mock Telegram API server for testing
pub struct TelegramMockServer {
    pub server: MockServer,
}

impl TelegramMockServer {
    /// Create a new mock Telegram API server
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// A bot wired to this server instead of api.telegram.org
    pub fn bot(&self) -> Bot {
        let api_url = reqwest::Url::parse(&self.server.uri()).unwrap();
        Bot::new(test_bot_token()).set_api_url(api_url)
    }

    fn method_path(method_name: &str) -> String {
        format!("/bot{}/{}", test_bot_token(), method_name)
    }

    /// Mount a `{"ok": true, "result": true}` response for a method
    pub async fn mock_ok(&self, method_name: &str) {
        Mock::given(method("POST"))
            .and(PathIgnoreCase(Self::method_path(method_name)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": true
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount an API error response for a method
    pub async fn mock_error(&self, method_name: &str, code: u16, description: &str) {
        Mock::given(method("POST"))
            .and(PathIgnoreCase(Self::method_path(method_name)))
            .respond_with(ResponseTemplate::new(code).set_body_json(json!({
                "ok": false,
                "error_code": code,
                "description": description
            })))
            .mount(&self.server)
            .await;
    }

    /// Setup mock for the sendMessage endpoint
    pub async fn mock_send_message(&self) {
        Mock::given(method("POST"))
            .and(PathIgnoreCase(Self::method_path("sendMessage")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {
                    "message_id": 123,
                    "from": {
                        "id": 12345,
                        "is_bot": true,
                        "first_name": "TestBot",
                        "username": "test_bot"
                    },
                    "chat": {
                        "id": -1001234567890_i64,
                        "title": "Test Group",
                        "type": "supergroup"
                    },
                    "date": 1640995200,
                    "text": "Test message"
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// Setup mock for the getChatAdministrators endpoint
    pub async fn mock_get_chat_administrators(&self, admin_ids: &[i64]) {
        let members: Vec<Value> = admin_ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                if i == 0 {
                    json!({
                        "status": "creator",
                        "user": {
                            "id": id,
                            "is_bot": false,
                            "first_name": "Owner"
                        },
                        "is_anonymous": false
                    })
                } else {
                    json!({
                        "status": "administrator",
                        "user": {
                            "id": id,
                            "is_bot": false,
                            "first_name": "Admin"
                        },
                        "can_be_edited": false,
                        "is_anonymous": false,
                        "can_manage_chat": true,
                        "can_delete_messages": true,
                        "can_manage_video_chats": true,
                        "can_restrict_members": true,
                        "can_promote_members": false,
                        "can_change_info": true,
                        "can_invite_users": true,
                        "can_post_stories": false,
                        "can_edit_stories": false,
                        "can_delete_stories": false,
                        "can_pin_messages": true,
                        "can_manage_topics": false
                    })
                }
            })
            .collect();

        Mock::given(method("POST"))
            .and(PathIgnoreCase(Self::method_path("getChatAdministrators")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": members
            })))
            .mount(&self.server)
            .await;
    }

    /// Number of calls received by a method
    pub async fn calls_to(&self, method_name: &str) -> usize {
        let needle = Self::method_path(method_name);
        self.server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|req| req.url.path().eq_ignore_ascii_case(&needle))
            .count()
    }
}

/// Helper function to create a test bot token
pub fn test_bot_token() -> String {
    "12345:test_token".to_string()
}

/// Helper function to create a test chat ID
pub fn test_chat_id() -> i64 {
    -1001234567890
}

/// Helper function to create a test user ID
pub fn test_user_id() -> i64 {
    987654321
}
