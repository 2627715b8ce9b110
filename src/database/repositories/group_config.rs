//! Group config repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use chrono::Utc;
use crate::database::store::GroupConfigStore;
use crate::models::group_config::{GroupConfig, CreateGroupConfigRequest};
use crate::utils::errors::StayBuddyError;

#[derive(Clone)]
pub struct GroupConfigRepository {
    pool: PgPool,
}

impl GroupConfigRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupConfigStore for GroupConfigRepository {
    async fn create_if_absent(
        &self,
        request: CreateGroupConfigRequest,
    ) -> Result<Option<GroupConfig>, StayBuddyError> {
        let config = sqlx::query_as::<_, GroupConfig>(
            r#"
            INSERT INTO group_configs (chat_id, kick_after_ms, custom_message, custom_message_enabled, created_at, updated_at)
            VALUES ($1, $2, COALESCE($3, ''), COALESCE($4, FALSE), $5, $5)
            ON CONFLICT (chat_id) DO NOTHING
            RETURNING id, chat_id, kick_after_ms, custom_message, custom_message_enabled, created_at, updated_at
            "#
        )
        .bind(request.chat_id)
        .bind(request.kick_after_ms)
        .bind(request.custom_message)
        .bind(request.custom_message_enabled)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(config)
    }

    async fn find_by_chat_id(&self, chat_id: i64) -> Result<Option<GroupConfig>, StayBuddyError> {
        let config = sqlx::query_as::<_, GroupConfig>(
            "SELECT id, chat_id, kick_after_ms, custom_message, custom_message_enabled, created_at, updated_at FROM group_configs WHERE chat_id = $1"
        )
        .bind(chat_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(config)
    }

    async fn upsert_kick_delay(
        &self,
        chat_id: i64,
        kick_after_ms: i64,
    ) -> Result<GroupConfig, StayBuddyError> {
        let config = sqlx::query_as::<_, GroupConfig>(
            r#"
            INSERT INTO group_configs (chat_id, kick_after_ms, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            ON CONFLICT (chat_id) DO UPDATE
            SET kick_after_ms = EXCLUDED.kick_after_ms,
                updated_at = EXCLUDED.updated_at
            RETURNING id, chat_id, kick_after_ms, custom_message, custom_message_enabled, created_at, updated_at
            "#
        )
        .bind(chat_id)
        .bind(kick_after_ms)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(config)
    }

    async fn upsert_custom_message(
        &self,
        chat_id: i64,
        message: &str,
    ) -> Result<GroupConfig, StayBuddyError> {
        let config = sqlx::query_as::<_, GroupConfig>(
            r#"
            INSERT INTO group_configs (chat_id, custom_message, custom_message_enabled, created_at, updated_at)
            VALUES ($1, $2, TRUE, $3, $3)
            ON CONFLICT (chat_id) DO UPDATE
            SET custom_message = EXCLUDED.custom_message,
                custom_message_enabled = TRUE,
                updated_at = EXCLUDED.updated_at
            RETURNING id, chat_id, kick_after_ms, custom_message, custom_message_enabled, created_at, updated_at
            "#
        )
        .bind(chat_id)
        .bind(message)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(config)
    }

    async fn toggle_custom_message(&self, chat_id: i64) -> Result<Option<bool>, StayBuddyError> {
        let enabled: Option<(bool,)> = sqlx::query_as(
            r#"
            UPDATE group_configs
            SET custom_message_enabled = NOT custom_message_enabled,
                updated_at = $2
            WHERE chat_id = $1
            RETURNING custom_message_enabled
            "#
        )
        .bind(chat_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(enabled.map(|row| row.0))
    }

    async fn delete(&self, chat_id: i64) -> Result<bool, StayBuddyError> {
        let result = sqlx::query("DELETE FROM group_configs WHERE chat_id = $1")
            .bind(chat_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
