use sqlx::{PgPool, types::time::OffsetDateTime};
use tracing::instrument;
use uuid::Uuid;

use domain::profile::{BanDetails, ModerationState, Profile, ProfileId};
use profile_moderation_application::{
    error::{AppError, AppResult},
    ports::outgoing::profile_store::{ProfileCredentials, ProfileStorePort},
};

use super::utils::PostgresExecutor;

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: Uuid,
    display_name: String,
    email: String,
    perks: Vec<String>,
    active_perk: String,
    avatar_url: Option<String>,
    created_at: OffsetDateTime,
    is_banned: bool,
    ban_reason: Option<String>,
    ban_end_at: Option<OffsetDateTime>,
    ban_admin_name: Option<String>,
    ban_admin_id: Option<Uuid>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        let moderation = if row.is_banned {
            ModerationState::Banned(BanDetails {
                reason: row.ban_reason,
                ends_at: row.ban_end_at,
                admin_name: row.ban_admin_name,
                admin_id: row.ban_admin_id.map(ProfileId::from_uuid),
            })
        } else {
            ModerationState::Active
        };

        Profile {
            id: ProfileId::from_uuid(row.id),
            display_name: row.display_name,
            email: row.email,
            perks: row.perks.into_iter().collect(),
            active_perk: row.active_perk,
            avatar_url: row.avatar_url,
            created_at: row.created_at,
            moderation,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CredentialsRow {
    id: Uuid,
    password_hash: Option<String>,
}

fn profile_not_found(id: &ProfileId) -> AppError {
    AppError::NotFound {
        message: format!("Profile {id} not found"),
    }
}

pub struct PostgresProfileStoreAdapter {
    pool: PgPool,
    executor: PostgresExecutor,
}

impl PostgresProfileStoreAdapter {
    pub fn new(pool: PgPool, query_timeout_secs: u64) -> Self {
        Self {
            pool,
            executor: PostgresExecutor::new(query_timeout_secs),
        }
    }
}

#[async_trait::async_trait]
impl ProfileStorePort for PostgresProfileStoreAdapter {
    #[instrument(skip(self))]
    async fn find_profile_by_id(&self, id: &ProfileId) -> AppResult<Option<Profile>> {
        let row = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query_as::<_, ProfileRow>(
                        r"
                        SELECT id, display_name, email, perks, active_perk, avatar_url, created_at,
                               is_banned, ban_reason, ban_end_at, ban_admin_name, ban_admin_id
                        FROM profiles
                        WHERE id = $1
                        ",
                    )
                    .bind(id.0)
                    .fetch_optional(&self.pool)
                },
                &format!("Failed to load profile {id}"),
            )
            .await?;

        Ok(row.map(Profile::from))
    }

    #[instrument(skip(self))]
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> AppResult<Option<ProfileCredentials>> {
        let row = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query_as::<_, CredentialsRow>(
                        r"
                        SELECT id, password_hash
                        FROM profiles
                        WHERE LOWER(email) = LOWER($1)
                        ",
                    )
                    .bind(email)
                    .fetch_optional(&self.pool)
                },
                "Failed to load credentials",
            )
            .await?;

        Ok(row.map(|row| ProfileCredentials {
            profile_id: ProfileId::from_uuid(row.id),
            password_hash: row.password_hash,
        }))
    }

    #[instrument(skip(self))]
    async fn find_password_hash(&self, id: &ProfileId) -> AppResult<Option<String>> {
        let hash: Option<Option<String>> = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query_scalar::<_, Option<String>>("SELECT password_hash FROM profiles WHERE id = $1")
                        .bind(id.0)
                        .fetch_optional(&self.pool)
                },
                &format!("Failed to load password hash for {id}"),
            )
            .await?;

        Ok(hash.flatten())
    }

    #[instrument(skip(self, moderation), fields(is_banned = moderation.is_banned()))]
    async fn update_moderation(
        &self,
        id: &ProfileId,
        moderation: &ModerationState,
    ) -> AppResult<Profile> {
        let details = moderation.details();

        let row = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query_as::<_, ProfileRow>(
                        r"
                        UPDATE profiles
                        SET is_banned = $2,
                            ban_reason = $3,
                            ban_end_at = $4,
                            ban_admin_name = $5,
                            ban_admin_id = $6
                        WHERE id = $1
                        RETURNING id, display_name, email, perks, active_perk, avatar_url, created_at,
                                  is_banned, ban_reason, ban_end_at, ban_admin_name, ban_admin_id
                        ",
                    )
                    .bind(id.0)
                    .bind(moderation.is_banned())
                    .bind(details.and_then(|d| d.reason.as_deref()))
                    .bind(details.and_then(|d| d.ends_at))
                    .bind(details.and_then(|d| d.admin_name.as_deref()))
                    .bind(details.and_then(|d| d.admin_id).map(|admin_id| admin_id.0))
                    .fetch_optional(&self.pool)
                },
                &format!("Failed to update moderation state for {id}"),
            )
            .await?;

        row.map(Profile::from)
            .ok_or_else(|| profile_not_found(id))
    }

    #[instrument(skip(self))]
    async fn update_display_name(&self, id: &ProfileId, display_name: &str) -> AppResult<Profile> {
        let row = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query_as::<_, ProfileRow>(
                        r"
                        UPDATE profiles
                        SET display_name = $2
                        WHERE id = $1
                        RETURNING id, display_name, email, perks, active_perk, avatar_url, created_at,
                                  is_banned, ban_reason, ban_end_at, ban_admin_name, ban_admin_id
                        ",
                    )
                    .bind(id.0)
                    .bind(display_name)
                    .fetch_optional(&self.pool)
                },
                &format!("Failed to update display name for {id}"),
            )
            .await?;

        row.map(Profile::from)
            .ok_or_else(|| profile_not_found(id))
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password_hash(&self, id: &ProfileId, password_hash: &str) -> AppResult<()> {
        let result = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query("UPDATE profiles SET password_hash = $2 WHERE id = $1")
                        .bind(id.0)
                        .bind(password_hash)
                        .execute(&self.pool)
                },
                &format!("Failed to update password for {id}"),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(profile_not_found(id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_active_perk(&self, id: &ProfileId, perk: &str) -> AppResult<Profile> {
        let row = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query_as::<_, ProfileRow>(
                        r"
                        UPDATE profiles
                        SET active_perk = $2
                        WHERE id = $1
                        RETURNING id, display_name, email, perks, active_perk, avatar_url, created_at,
                                  is_banned, ban_reason, ban_end_at, ban_admin_name, ban_admin_id
                        ",
                    )
                    .bind(id.0)
                    .bind(perk)
                    .fetch_optional(&self.pool)
                },
                &format!("Failed to update active perk for {id}"),
            )
            .await?;

        row.map(Profile::from)
            .ok_or_else(|| profile_not_found(id))
    }

    #[instrument(skip(self))]
    async fn update_avatar(&self, id: &ProfileId, avatar_url: &str) -> AppResult<Profile> {
        let row = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query_as::<_, ProfileRow>(
                        r"
                        UPDATE profiles
                        SET avatar_url = $2
                        WHERE id = $1
                        RETURNING id, display_name, email, perks, active_perk, avatar_url, created_at,
                                  is_banned, ban_reason, ban_end_at, ban_admin_name, ban_admin_id
                        ",
                    )
                    .bind(id.0)
                    .bind(avatar_url)
                    .fetch_optional(&self.pool)
                },
                &format!("Failed to update avatar for {id}"),
            )
            .await?;

        row.map(Profile::from)
            .ok_or_else(|| profile_not_found(id))
    }
}
