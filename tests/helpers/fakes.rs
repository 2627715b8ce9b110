//! In-memory fakes for the store and chat API traits
//!
//! The service tests run entirely against these: no database, no Redis, no
//! network. `RecordingChatApi` keeps a log of every outgoing call and can be
//! told to fail specific operations.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use StayBuddy::database::store::{GroupConfigStore, MembershipStore};
use StayBuddy::models::{
    CreateGroupConfigRequest, GroupConfig, MembershipRecord, TrackMemberRequest,
};
use StayBuddy::services::{AdminGate, ChatApi, EvictionSweeper, LifecycleService};
use StayBuddy::utils::errors::{Result, StayBuddyError};

fn simulated_failure(what: &str) -> StayBuddyError {
    StayBuddyError::InvalidInput(format!("simulated {} failure", what))
}

#[derive(Default)]
pub struct InMemoryGroupConfigStore {
    configs: Mutex<HashMap<i64, GroupConfig>>,
    next_id: Mutex<i64>,
}

impl InMemoryGroupConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(
        &self,
        chat_id: i64,
        kick_after_ms: Option<i64>,
        custom_message: String,
        custom_message_enabled: bool,
    ) -> GroupConfig {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let now = Utc::now();
        let config = GroupConfig {
            id: *next_id,
            chat_id,
            kick_after_ms,
            custom_message,
            custom_message_enabled,
            created_at: now,
            updated_at: now,
        };
        self.configs.lock().unwrap().insert(chat_id, config.clone());
        config
    }
}

#[async_trait]
impl GroupConfigStore for InMemoryGroupConfigStore {
    async fn create_if_absent(
        &self,
        request: CreateGroupConfigRequest,
    ) -> Result<Option<GroupConfig>> {
        if self.configs.lock().unwrap().contains_key(&request.chat_id) {
            return Ok(None);
        }
        Ok(Some(self.insert(
            request.chat_id,
            request.kick_after_ms,
            request.custom_message.unwrap_or_default(),
            request.custom_message_enabled.unwrap_or(false),
        )))
    }

    async fn find_by_chat_id(&self, chat_id: i64) -> Result<Option<GroupConfig>> {
        Ok(self.configs.lock().unwrap().get(&chat_id).cloned())
    }

    async fn upsert_kick_delay(&self, chat_id: i64, kick_after_ms: i64) -> Result<GroupConfig> {
        if let Some(config) = self.configs.lock().unwrap().get_mut(&chat_id) {
            config.kick_after_ms = Some(kick_after_ms);
            config.updated_at = Utc::now();
            return Ok(config.clone());
        }
        Ok(self.insert(chat_id, Some(kick_after_ms), String::new(), false))
    }

    async fn upsert_custom_message(&self, chat_id: i64, message: &str) -> Result<GroupConfig> {
        if let Some(config) = self.configs.lock().unwrap().get_mut(&chat_id) {
            config.custom_message = message.to_string();
            config.custom_message_enabled = true;
            config.updated_at = Utc::now();
            return Ok(config.clone());
        }
        Ok(self.insert(chat_id, None, message.to_string(), true))
    }

    async fn toggle_custom_message(&self, chat_id: i64) -> Result<Option<bool>> {
        match self.configs.lock().unwrap().get_mut(&chat_id) {
            Some(config) => {
                config.custom_message_enabled = !config.custom_message_enabled;
                config.updated_at = Utc::now();
                Ok(Some(config.custom_message_enabled))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, chat_id: i64) -> Result<bool> {
        Ok(self.configs.lock().unwrap().remove(&chat_id).is_some())
    }
}

#[derive(Default)]
pub struct InMemoryMembershipStore {
    records: Mutex<Vec<MembershipRecord>>,
    next_id: Mutex<i64>,
}

impl InMemoryMembershipStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<MembershipRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Insert a record with an explicit deadline, as if tracked earlier.
    pub fn seed(&self, user_id: i64, chat_id: i64, kick_date: DateTime<Utc>) -> i64 {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let id = *next_id;
        self.records.lock().unwrap().push(MembershipRecord {
            id,
            user_id,
            chat_id,
            join_date: kick_date - chrono::Duration::days(1),
            kick_date,
        });
        id
    }
}

#[async_trait]
impl MembershipStore for InMemoryMembershipStore {
    async fn track(&self, request: TrackMemberRequest) -> Result<MembershipRecord> {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let record = MembershipRecord {
            id: *next_id,
            user_id: request.user_id,
            chat_id: request.chat_id,
            join_date: Utc::now(),
            kick_date: request.kick_date,
        };
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn find_due(&self, now: DateTime<Utc>) -> Result<Vec<MembershipRecord>> {
        let mut due: Vec<MembershipRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|record| record.is_due(now))
            .cloned()
            .collect();
        due.sort_by_key(|record| record.kick_date);
        Ok(due)
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        self.records.lock().unwrap().retain(|record| record.id != id);
        Ok(())
    }

    async fn delete_for_member(&self, chat_id: i64, user_id: i64) -> Result<u64> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|record| !(record.chat_id == chat_id && record.user_id == user_id));
        Ok((before - records.len()) as u64)
    }
}

/// One outgoing chat API call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    ApproveJoin { chat_id: i64, user_id: i64 },
    Ban { chat_id: i64, user_id: i64 },
    DirectMessage { user_id: i64, text: String },
    GroupMessage { chat_id: i64, text: String },
}

#[derive(Default)]
pub struct RecordingChatApi {
    admins: Mutex<HashMap<i64, Vec<i64>>>,
    failing_admin_lookups: Mutex<HashSet<i64>>,
    failing_bans: Mutex<HashSet<(i64, i64)>>,
    failing_dms: Mutex<HashSet<i64>>,
    cancel_on_ban: Mutex<Option<CancellationToken>>,
    calls: Mutex<Vec<ApiCall>>,
}

impl RecordingChatApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_admins(&self, chat_id: i64, admins: Vec<i64>) {
        self.admins.lock().unwrap().insert(chat_id, admins);
    }

    pub fn fail_admin_lookup(&self, chat_id: i64) {
        self.failing_admin_lookups.lock().unwrap().insert(chat_id);
    }

    pub fn fail_ban(&self, chat_id: i64, user_id: i64) {
        self.failing_bans.lock().unwrap().insert((chat_id, user_id));
    }

    pub fn fail_dm(&self, user_id: i64) {
        self.failing_dms.lock().unwrap().insert(user_id);
    }

    /// Cancel the token right after the next successful ban.
    pub fn cancel_token_on_ban(&self, token: CancellationToken) {
        *self.cancel_on_ban.lock().unwrap() = Some(token);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn bans(&self) -> Vec<(i64, i64)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ApiCall::Ban { chat_id, user_id } => Some((chat_id, user_id)),
                _ => None,
            })
            .collect()
    }

    pub fn approvals(&self) -> Vec<(i64, i64)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ApiCall::ApproveJoin { chat_id, user_id } => Some((chat_id, user_id)),
                _ => None,
            })
            .collect()
    }

    pub fn direct_messages(&self) -> Vec<(i64, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ApiCall::DirectMessage { user_id, text } => Some((user_id, text)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ChatApi for RecordingChatApi {
    async fn list_administrators(&self, chat_id: i64) -> Result<Vec<i64>> {
        if self.failing_admin_lookups.lock().unwrap().contains(&chat_id) {
            return Err(simulated_failure("administrator lookup"));
        }
        Ok(self
            .admins
            .lock()
            .unwrap()
            .get(&chat_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn approve_join_request(&self, chat_id: i64, user_id: i64) -> Result<()> {
        self.record(ApiCall::ApproveJoin { chat_id, user_id });
        Ok(())
    }

    async fn ban_member(&self, chat_id: i64, user_id: i64) -> Result<()> {
        if self.failing_bans.lock().unwrap().contains(&(chat_id, user_id)) {
            return Err(simulated_failure("ban"));
        }
        self.record(ApiCall::Ban { chat_id, user_id });
        if let Some(token) = self.cancel_on_ban.lock().unwrap().take() {
            token.cancel();
        }
        Ok(())
    }

    async fn send_direct_message(&self, user_id: i64, text: &str) -> Result<()> {
        if self.failing_dms.lock().unwrap().contains(&user_id) {
            return Err(simulated_failure("direct message"));
        }
        self.record(ApiCall::DirectMessage {
            user_id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_group_message(&self, chat_id: i64, text: &str) -> Result<()> {
        self.record(ApiCall::GroupMessage {
            chat_id,
            text: text.to_string(),
        });
        Ok(())
    }
}

/// Bundles the fakes with services wired the same way production is.
pub struct TestContext {
    pub chat: Arc<RecordingChatApi>,
    pub groups: Arc<InMemoryGroupConfigStore>,
    pub memberships: Arc<InMemoryMembershipStore>,
    pub lifecycle: LifecycleService,
}

impl TestContext {
    pub fn new() -> Self {
        let chat = Arc::new(RecordingChatApi::new());
        let groups = Arc::new(InMemoryGroupConfigStore::new());
        let memberships = Arc::new(InMemoryMembershipStore::new());
        let lifecycle = LifecycleService::new(
            chat.clone() as Arc<dyn ChatApi>,
            groups.clone() as Arc<dyn GroupConfigStore>,
            memberships.clone() as Arc<dyn MembershipStore>,
        );

        Self {
            chat,
            groups,
            memberships,
            lifecycle,
        }
    }

    pub fn sweeper(&self) -> EvictionSweeper {
        let gate = AdminGate::new(self.chat.clone() as Arc<dyn ChatApi>);
        EvictionSweeper::new(
            self.chat.clone() as Arc<dyn ChatApi>,
            self.groups.clone() as Arc<dyn GroupConfigStore>,
            self.memberships.clone() as Arc<dyn MembershipStore>,
            gate,
            Duration::from_secs(300),
        )
    }
}
