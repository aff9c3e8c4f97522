use sqlx::{PgPool, postgres::PgPoolOptions};
use std::sync::Arc;

use profile_moderation_adapters::outgoing::{
    passwords::argon2::Argon2PasswordHasher,
    postgres_sqlx::{
        ban_event_store_postgres::PostgresBanEventStoreAdapter, migrations::run_migrations,
        profile_store_postgres::PostgresProfileStoreAdapter,
    },
};
use profile_moderation_adapters::shared::app_state::AppState as AdaptersAppState;
use profile_moderation_application::error::AppError;
use profile_moderation_application::infrastructure_config::Config;
use profile_moderation_application::ports::incoming::{
    auth::AuthUseCase, moderation::ModerationUseCase, profile::ProfileUseCase,
};
use profile_moderation_application::ports::outgoing::{
    ban_event_store::BanEventStorePort, password_hasher::PasswordHasherPort,
    profile_store::ProfileStorePort,
};
use profile_moderation_application::{
    auth::{password_validator::PasswordValidator, service::AuthService},
    moderation::service::ModerationService,
    profile::service::ProfileService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    db_pool: PgPool,
    pub auth_service: Arc<dyn AuthUseCase>,
    pub profile_service: Arc<dyn ProfileUseCase>,
    pub moderation_service: Arc<dyn ModerationUseCase>,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Self, AppError> {
        let config = Arc::new(config);

        let db_pool = Self::create_database_pool(&config).await?;
        if config.db.run_migrations {
            run_migrations(&db_pool).await?;
        }

        let profile_store: Arc<dyn ProfileStorePort> = Arc::new(PostgresProfileStoreAdapter::new(
            db_pool.clone(),
            config.db.query_timeout_secs,
        ));
        let ban_event_store: Arc<dyn BanEventStorePort> = Arc::new(
            PostgresBanEventStoreAdapter::new(db_pool.clone(), config.db.query_timeout_secs),
        );
        let password_hasher: Arc<dyn PasswordHasherPort> = Arc::new(
            Argon2PasswordHasher::from_config_or_default(&config.auth.argon2),
        );

        let auth_service: Arc<dyn AuthUseCase> = Arc::new(AuthService::new(
            Arc::clone(&profile_store),
            Arc::clone(&password_hasher),
        ));
        let moderation_service: Arc<dyn ModerationUseCase> = Arc::new(ModerationService::new(
            Arc::clone(&profile_store),
            ban_event_store,
        ));
        let profile_service: Arc<dyn ProfileUseCase> = Arc::new(ProfileService::new(
            profile_store,
            Arc::clone(&moderation_service),
            password_hasher,
            PasswordValidator::from_config_score(config.auth.min_password_score),
        ));

        Ok(Self {
            config,
            db_pool,
            auth_service,
            profile_service,
            moderation_service,
        })
    }

    async fn create_database_pool(config: &Config) -> Result<PgPool, AppError> {
        PgPoolOptions::new()
            .max_connections(config.db.pool_size)
            .connect(config.db.database_url())
            .await
            .map_err(|e| AppError::DatabaseError {
                message: format!("Failed to connect to database: {}", e),
            })
    }

    pub fn db_pool(&self) -> &PgPool {
        &self.db_pool
    }

    pub fn to_adapters_state(&self) -> AdaptersAppState {
        AdaptersAppState::new(
            Arc::clone(&self.config),
            Arc::clone(&self.auth_service),
            Arc::clone(&self.profile_service),
            Arc::clone(&self.moderation_service),
        )
    }
}
