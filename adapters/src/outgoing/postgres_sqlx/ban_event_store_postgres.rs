use sqlx::{PgPool, types::time::OffsetDateTime};
use tracing::instrument;
use uuid::Uuid;

use domain::{
    ban::{BanEvent, BanEventId, BanType},
    profile::ProfileId,
};
use profile_moderation_application::{
    error::{AppError, AppResult},
    ports::outgoing::ban_event_store::BanEventStorePort,
};

use super::utils::PostgresExecutor;

#[derive(sqlx::FromRow)]
struct BanEventRow {
    id: Uuid,
    user_id: Uuid,
    reason: String,
    admin_id: Uuid,
    admin_name: String,
    end_at: Option<OffsetDateTime>,
    is_active: bool,
    ban_type: String,
    created_at: OffsetDateTime,
}

impl TryFrom<BanEventRow> for BanEvent {
    type Error = AppError;

    fn try_from(row: BanEventRow) -> Result<Self, Self::Error> {
        let ban_type: BanType = row.ban_type.parse().map_err(|e| AppError::DatabaseError {
            message: format!("Corrupt ban event {}: {e}", row.id),
        })?;

        Ok(BanEvent {
            id: BanEventId::from_uuid(row.id),
            user_id: ProfileId::from_uuid(row.user_id),
            reason: row.reason,
            admin_id: ProfileId::from_uuid(row.admin_id),
            admin_name: row.admin_name,
            ends_at: row.end_at,
            is_active: row.is_active,
            ban_type,
            created_at: row.created_at,
        })
    }
}

pub struct PostgresBanEventStoreAdapter {
    pool: PgPool,
    executor: PostgresExecutor,
}

impl PostgresBanEventStoreAdapter {
    pub fn new(pool: PgPool, query_timeout_secs: u64) -> Self {
        Self {
            pool,
            executor: PostgresExecutor::new(query_timeout_secs),
        }
    }
}

#[async_trait::async_trait]
impl BanEventStorePort for PostgresBanEventStoreAdapter {
    #[instrument(skip(self, event), fields(user_id = %event.user_id))]
    async fn insert_ban_event(&self, event: &BanEvent) -> AppResult<()> {
        self.executor
            .execute_with_timeout(
                || {
                    sqlx::query(
                        r"
                        INSERT INTO ban_events
                            (id, user_id, reason, admin_id, admin_name, end_at, is_active, ban_type, created_at)
                        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                        ",
                    )
                    .bind(event.id.0)
                    .bind(event.user_id.0)
                    .bind(&event.reason)
                    .bind(event.admin_id.0)
                    .bind(&event.admin_name)
                    .bind(event.ends_at)
                    .bind(event.is_active)
                    .bind(event.ban_type.as_str())
                    .bind(event.created_at)
                    .execute(&self.pool)
                },
                &format!("Failed to insert ban event for {}", event.user_id),
            )
            .await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn deactivate_active_ban_events(&self, user_id: &ProfileId) -> AppResult<u64> {
        let result = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query(
                        r"
                        UPDATE ban_events
                        SET is_active = FALSE
                        WHERE user_id = $1 AND is_active
                        ",
                    )
                    .bind(user_id.0)
                    .execute(&self.pool)
                },
                &format!("Failed to deactivate ban events for {user_id}"),
            )
            .await?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn find_latest_active_ban_event(
        &self,
        user_id: &ProfileId,
    ) -> AppResult<Option<BanEvent>> {
        let row = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query_as::<_, BanEventRow>(
                        r"
                        SELECT id, user_id, reason, admin_id, admin_name, end_at, is_active, ban_type, created_at
                        FROM ban_events
                        WHERE user_id = $1 AND is_active
                        ORDER BY created_at DESC
                        LIMIT 1
                        ",
                    )
                    .bind(user_id.0)
                    .fetch_optional(&self.pool)
                },
                &format!("Failed to load active ban for {user_id}"),
            )
            .await?;

        row.map(BanEvent::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_ban_events(&self, user_id: &ProfileId, limit: u32) -> AppResult<Vec<BanEvent>> {
        let rows = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query_as::<_, BanEventRow>(
                        r"
                        SELECT id, user_id, reason, admin_id, admin_name, end_at, is_active, ban_type, created_at
                        FROM ban_events
                        WHERE user_id = $1
                        ORDER BY created_at DESC
                        LIMIT $2
                        ",
                    )
                    .bind(user_id.0)
                    .bind(i64::from(limit))
                    .fetch_all(&self.pool)
                },
                &format!("Failed to list ban events for {user_id}"),
            )
            .await?;

        rows.into_iter().map(BanEvent::try_from).collect()
    }
}
