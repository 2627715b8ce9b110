//! Periodic eviction sweep
//!
//! A background task wakes on a fixed interval, loads every membership record
//! whose deadline has passed and processes them one at a time. Each record is
//! isolated: a failure is logged, counted and left for the next sweep without
//! touching the rest of the batch. Administrators are never banned, their
//! records stay until they lose the role. A record is deleted only after the
//! ban call succeeded.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::database::store::{GroupConfigStore, MembershipStore};
use crate::models::MembershipRecord;
use crate::services::admin_gate::AdminGate;
use crate::services::chat::ChatApi;
use crate::utils::errors::Result;
use crate::utils::logging;

/// Counters for a single sweep pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub due: usize,
    pub evicted: usize,
    pub skipped_admins: usize,
    pub failed: usize,
}

enum RecordOutcome {
    Evicted,
    SkippedAdmin,
    BanFailed,
}

pub struct EvictionSweeper {
    chat: Arc<dyn ChatApi>,
    groups: Arc<dyn GroupConfigStore>,
    memberships: Arc<dyn MembershipStore>,
    gate: AdminGate,
    interval: Duration,
}

impl EvictionSweeper {
    pub fn new(
        chat: Arc<dyn ChatApi>,
        groups: Arc<dyn GroupConfigStore>,
        memberships: Arc<dyn MembershipStore>,
        gate: AdminGate,
        interval: Duration,
    ) -> Self {
        Self {
            chat,
            groups,
            memberships,
            gate,
            interval,
        }
    }

    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    pub async fn run(self, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(
            interval_seconds = self.interval.as_secs(),
            "Eviction sweeper started"
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    let stats = self.sweep_once(&shutdown).await;
                    if stats.due == 0 {
                        debug!("Sweep found no due members");
                    } else {
                        info!(
                            due = stats.due,
                            evicted = stats.evicted,
                            skipped_admins = stats.skipped_admins,
                            failed = stats.failed,
                            "Sweep completed"
                        );
                    }
                }
            }
        }

        info!("Eviction sweeper stopped");
    }

    /// Runs one sweep pass. Cancellation is honored between records, the
    /// record in flight always finishes.
    pub async fn sweep_once(&self, shutdown: &CancellationToken) -> SweepStats {
        let due = match self.memberships.find_due(Utc::now()).await {
            Ok(due) => due,
            Err(e) => {
                error!(error = %e, "Failed to load due membership records");
                return SweepStats::default();
            }
        };

        let mut stats = SweepStats {
            due: due.len(),
            ..SweepStats::default()
        };

        for record in &due {
            if shutdown.is_cancelled() {
                debug!("Sweep interrupted by shutdown");
                break;
            }

            match self.process_record(record).await {
                Ok(RecordOutcome::Evicted) => stats.evicted += 1,
                Ok(RecordOutcome::SkippedAdmin) => stats.skipped_admins += 1,
                Ok(RecordOutcome::BanFailed) => stats.failed += 1,
                Err(e) => {
                    stats.failed += 1;
                    if e.is_recoverable() {
                        warn!(
                            chat_id = record.chat_id,
                            user_id = record.user_id,
                            error = %e,
                            "Failed to process due member, record kept for the next sweep"
                        );
                    } else {
                        error!(
                            chat_id = record.chat_id,
                            user_id = record.user_id,
                            error = %e,
                            "Failed to process due member"
                        );
                    }
                }
            }
        }

        stats
    }

    async fn process_record(&self, record: &MembershipRecord) -> Result<RecordOutcome> {
        if self.gate.check(record.chat_id, record.user_id).await? {
            debug!(
                chat_id = record.chat_id,
                user_id = record.user_id,
                "Due member is an administrator, skipping"
            );
            return Ok(RecordOutcome::SkippedAdmin);
        }

        // No config (deactivated group) suppresses the message, not the ban.
        let config = self.groups.find_by_chat_id(record.chat_id).await?;
        if let Some(message) = config.as_ref().and_then(|c| c.departure_message()) {
            if let Err(e) = self
                .chat
                .send_direct_message(record.user_id, message)
                .await
            {
                warn!(
                    chat_id = record.chat_id,
                    user_id = record.user_id,
                    error = %e,
                    "Failed to deliver departure message"
                );
            }
        }

        match self.chat.ban_member(record.chat_id, record.user_id).await {
            Ok(()) => {
                self.memberships.delete_by_id(record.id).await?;
                logging::log_eviction(record.chat_id, record.user_id, true, None);
                Ok(RecordOutcome::Evicted)
            }
            Err(e) => {
                logging::log_eviction(record.chat_id, record.user_id, false, Some(&e.to_string()));
                Ok(RecordOutcome::BanFailed)
            }
        }
    }
}
