//! Group lifecycle operations
//!
//! Everything that reacts to membership events or reconfigures a group goes
//! through here: join request approval, arrival tracking, departure cleanup,
//! activation state and the kick delay / departure message settings. Groups
//! without a stored config are ignored entirely.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::database::store::{GroupConfigStore, MembershipStore};
use crate::models::{CreateGroupConfigRequest, GroupConfig, TrackMemberRequest};
use crate::services::chat::ChatApi;
use crate::utils::errors::{Result, StayBuddyError};
use crate::utils::helpers::{days_to_ms, kick_date_after, MAX_KICK_DAYS};
use crate::utils::logging;

/// Outcome of an activation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Activated,
    AlreadyActive,
}

/// Outcome of a deactivation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deactivation {
    Deactivated,
    NotActive,
}

/// A member observed joining a group directly
#[derive(Debug, Clone, Copy)]
pub struct JoiningMember {
    pub user_id: i64,
    pub is_bot: bool,
}

#[derive(Clone)]
pub struct LifecycleService {
    chat: Arc<dyn ChatApi>,
    groups: Arc<dyn GroupConfigStore>,
    memberships: Arc<dyn MembershipStore>,
}

impl LifecycleService {
    pub fn new(
        chat: Arc<dyn ChatApi>,
        groups: Arc<dyn GroupConfigStore>,
        memberships: Arc<dyn MembershipStore>,
    ) -> Self {
        Self {
            chat,
            groups,
            memberships,
        }
    }

    pub async fn group_config(&self, chat_id: i64) -> Result<Option<GroupConfig>> {
        self.groups.find_by_chat_id(chat_id).await
    }

    /// Approves a pending join request and schedules the eviction deadline.
    ///
    /// Requests fall back to a 7 day delay when no kick delay is configured,
    /// unlike direct joins which fall back to 24 hours.
    pub async fn handle_join_request(&self, chat_id: i64, user_id: i64) -> Result<()> {
        let config = match self.groups.find_by_chat_id(chat_id).await? {
            Some(config) => config,
            None => {
                logging::log_untracked_group(chat_id, "join_request");
                return Ok(());
            }
        };

        self.chat.approve_join_request(chat_id, user_id).await?;

        let kick_date = kick_date_after(Utc::now(), config.join_request_delay_ms());
        self.memberships
            .track(TrackMemberRequest {
                user_id,
                chat_id,
                kick_date,
            })
            .await?;
        logging::log_group_event(
            chat_id,
            "join_request_approved",
            Some(user_id),
            Some(&kick_date.to_rfc3339()),
        );
        Ok(())
    }

    /// Schedules eviction deadlines for members who joined directly.
    ///
    /// Bot accounts are not tracked. The fallback delay here is 24 hours.
    pub async fn handle_new_members(&self, chat_id: i64, members: &[JoiningMember]) -> Result<()> {
        let config = match self.groups.find_by_chat_id(chat_id).await? {
            Some(config) => config,
            None => {
                logging::log_untracked_group(chat_id, "new_members");
                return Ok(());
            }
        };

        let delay_ms = config.direct_join_delay_ms();
        for member in members {
            if member.is_bot {
                debug!(
                    chat_id = chat_id,
                    user_id = member.user_id,
                    "Skipping bot account"
                );
                continue;
            }

            let kick_date = kick_date_after(Utc::now(), delay_ms);
            self.memberships
                .track(TrackMemberRequest {
                    user_id: member.user_id,
                    chat_id,
                    kick_date,
                })
                .await?;
            logging::log_group_event(
                chat_id,
                "member_tracked",
                Some(member.user_id),
                Some(&kick_date.to_rfc3339()),
            );
        }
        Ok(())
    }

    /// Clears all eviction deadlines for a member who left on their own.
    pub async fn handle_member_left(&self, chat_id: i64, user_id: i64) -> Result<()> {
        if self.groups.find_by_chat_id(chat_id).await?.is_none() {
            return Ok(());
        }

        let removed = self.memberships.delete_for_member(chat_id, user_id).await?;
        if removed > 0 {
            logging::log_group_event(chat_id, "tracking_cleared", Some(user_id), None);
        }
        Ok(())
    }

    /// Creates the group's config if it does not exist yet. The fresh config
    /// has no kick delay, so both admission paths use their fallbacks.
    pub async fn activate(&self, chat_id: i64) -> Result<Activation> {
        let created = self
            .groups
            .create_if_absent(CreateGroupConfigRequest::bare(chat_id))
            .await?;
        match created {
            Some(_) => {
                logging::log_group_event(chat_id, "activated", None, None);
                Ok(Activation::Activated)
            }
            None => Ok(Activation::AlreadyActive),
        }
    }

    /// Removes the group's config. Existing membership records are left in
    /// place and still run out on the sweeper.
    pub async fn deactivate(&self, chat_id: i64) -> Result<Deactivation> {
        if self.groups.delete(chat_id).await? {
            logging::log_group_event(chat_id, "deactivated", None, None);
            Ok(Deactivation::Deactivated)
        } else {
            Ok(Deactivation::NotActive)
        }
    }

    /// Stores the kick delay and announces it in the group. Deadlines already
    /// scheduled keep their original dates. Day counts outside 1..=MAX_KICK_DAYS
    /// are rejected.
    pub async fn set_kick_delay(&self, chat_id: i64, days: i64) -> Result<GroupConfig> {
        if days <= 0 || days > MAX_KICK_DAYS {
            return Err(StayBuddyError::InvalidInput(format!(
                "kick delay must be between 1 and {} days, got {}",
                MAX_KICK_DAYS, days
            )));
        }

        let config = self
            .groups
            .upsert_kick_delay(chat_id, days_to_ms(days))
            .await?;
        self.chat
            .send_group_message(
                chat_id,
                &format!("Kick time has been set to {} day(s).", days),
            )
            .await?;
        logging::log_group_event(
            chat_id,
            "kick_delay_set",
            None,
            Some(&format!("{} day(s)", days)),
        );
        Ok(config)
    }

    /// Stores the departure message and enables it in one step.
    pub async fn set_custom_message(&self, chat_id: i64, message: &str) -> Result<GroupConfig> {
        let config = self.groups.upsert_custom_message(chat_id, message).await?;
        logging::log_group_event(chat_id, "custom_message_set", None, None);
        Ok(config)
    }

    /// Flips the departure message flag. `None` means the group has no config.
    pub async fn toggle_custom_message(&self, chat_id: i64) -> Result<Option<bool>> {
        let enabled = self.groups.toggle_custom_message(chat_id).await?;
        if let Some(enabled) = enabled {
            logging::log_group_event(
                chat_id,
                "custom_message_toggled",
                None,
                Some(if enabled { "enabled" } else { "disabled" }),
            );
        }
        Ok(enabled)
    }
}
