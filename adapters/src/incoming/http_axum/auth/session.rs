use time::Duration;
use tower_sessions::{Expiry, SessionManagerLayer, cookie::SameSite};
use tower_sessions_redis_store::{RedisStore, fred::prelude::*};

use profile_moderation_application::error::AppError;
use profile_moderation_application::infrastructure_config::AuthConfig;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub secure: bool,
    pub same_site: SameSite,
    pub ttl: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "profile_session".to_string(),
            secure: false,
            same_site: SameSite::Lax,
            ttl: Duration::days(7),
        }
    }
}

impl From<&AuthConfig> for SessionConfig {
    /// Secure cookies are sent cross-site, which browsers only allow with
    /// `SameSite=None`.
    fn from(config: &AuthConfig) -> Self {
        Self {
            cookie_name: config.cookie_name.clone(),
            secure: config.cookie_secure,
            same_site: if config.cookie_secure {
                SameSite::None
            } else {
                SameSite::Lax
            },
            ttl: Duration::hours(config.session_ttl_hours),
        }
    }
}

pub async fn create_session_layer(
    redis_url: &str,
    session_config: &SessionConfig,
) -> Result<SessionManagerLayer<RedisStore<Client>>, AppError> {
    let redis_config = Config::from_url(redis_url).map_err(|e| AppError::ConfigError {
        message: format!("Invalid redis_url: {e}"),
    })?;

    let redis_client = Client::new(redis_config, None, None, None);
    redis_client.connect();
    redis_client.wait_for_connect().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to connect to session store");
        AppError::InternalServerError
    })?;

    let session_store = RedisStore::new(redis_client);

    let session_layer = SessionManagerLayer::new(session_store)
        .with_name(session_config.cookie_name.clone())
        .with_same_site(session_config.same_site)
        .with_secure(session_config.secure)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(session_config.ttl));

    Ok(session_layer)
}
