//! Membership record repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use chrono::{DateTime, Utc};
use crate::database::store::MembershipStore;
use crate::models::membership::{MembershipRecord, TrackMemberRequest};
use crate::utils::errors::StayBuddyError;

#[derive(Clone)]
pub struct MembershipRepository {
    pool: PgPool,
}

impl MembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipStore for MembershipRepository {
    async fn track(&self, request: TrackMemberRequest) -> Result<MembershipRecord, StayBuddyError> {
        let record = sqlx::query_as::<_, MembershipRecord>(
            r#"
            INSERT INTO membership_records (user_id, chat_id, join_date, kick_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, chat_id, join_date, kick_date
            "#
        )
        .bind(request.user_id)
        .bind(request.chat_id)
        .bind(Utc::now())
        .bind(request.kick_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_due(&self, now: DateTime<Utc>) -> Result<Vec<MembershipRecord>, StayBuddyError> {
        let records = sqlx::query_as::<_, MembershipRecord>(
            "SELECT id, user_id, chat_id, join_date, kick_date FROM membership_records WHERE kick_date <= $1 ORDER BY kick_date ASC"
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StayBuddyError> {
        sqlx::query("DELETE FROM membership_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_for_member(&self, chat_id: i64, user_id: i64) -> Result<u64, StayBuddyError> {
        let result = sqlx::query("DELETE FROM membership_records WHERE chat_id = $1 AND user_id = $2")
            .bind(chat_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
