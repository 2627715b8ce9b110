//! Service layer
//!
//! Business logic lives here, behind the `ChatApi` and store traits so the
//! integration tests can run against in-memory fakes. `ServiceFactory` wires
//! the production implementations together once at startup.

pub mod admin_gate;
pub mod chat;
pub mod lifecycle;
pub mod sweeper;

pub use admin_gate::AdminGate;
pub use chat::{ChatApi, TelegramChatApi};
pub use lifecycle::{Activation, Deactivation, JoiningMember, LifecycleService};
pub use sweeper::{EvictionSweeper, SweepStats};

use std::sync::Arc;
use std::time::Duration;

use teloxide::Bot;

use crate::config::SweeperConfig;
use crate::database::service::DatabaseService;
use crate::database::store::{GroupConfigStore, MembershipStore};

/// Identity of the bot account, resolved once at startup
#[derive(Debug, Clone)]
pub struct BotIdentity {
    pub username: String,
}

/// Factory for creating and wiring all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub chat_api: Arc<dyn ChatApi>,
    pub groups: Arc<dyn GroupConfigStore>,
    pub memberships: Arc<dyn MembershipStore>,
    pub admin_gate: AdminGate,
    pub lifecycle: LifecycleService,
}

impl ServiceFactory {
    pub fn new(bot: Bot, database: &DatabaseService) -> Self {
        let chat_api: Arc<dyn ChatApi> = Arc::new(TelegramChatApi::new(bot));
        let groups: Arc<dyn GroupConfigStore> = Arc::new(database.group_configs.clone());
        let memberships: Arc<dyn MembershipStore> = Arc::new(database.memberships.clone());

        let admin_gate = AdminGate::new(Arc::clone(&chat_api));
        let lifecycle = LifecycleService::new(
            Arc::clone(&chat_api),
            Arc::clone(&groups),
            Arc::clone(&memberships),
        );

        Self {
            chat_api,
            groups,
            memberships,
            admin_gate,
            lifecycle,
        }
    }

    pub fn build_sweeper(&self, config: &SweeperConfig) -> EvictionSweeper {
        EvictionSweeper::new(
            Arc::clone(&self.chat_api),
            Arc::clone(&self.groups),
            Arc::clone(&self.memberships),
            self.admin_gate.clone(),
            Duration::from_secs(config.interval_seconds),
        )
    }
}
