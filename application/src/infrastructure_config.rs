use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const DEFAULT_DATABASE_URL: &str = "postgresql://localhost/profile_moderation";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub db: DbConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
    pub environment: EnvironmentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_url: SecretString,
    pub pool_size: u32,
    pub query_timeout_secs: u64,
    pub run_migrations: bool,
}

impl Serialize for DbConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("DbConfig", 4)?;
        state.serialize_field("database_url", "[REDACTED]")?;
        state.serialize_field("pool_size", &self.pool_size)?;
        state.serialize_field("query_timeout_secs", &self.query_timeout_secs)?;
        state.serialize_field("run_migrations", &self.run_migrations)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for DbConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct DbConfigHelper {
            database_url: String,
            pool_size: u32,
            query_timeout_secs: u64,
            run_migrations: bool,
        }

        let helper = DbConfigHelper::deserialize(deserializer)?;
        Ok(DbConfig {
            database_url: SecretString::from(helper.database_url),
            pool_size: helper.pool_size,
            query_timeout_secs: helper.query_timeout_secs,
            run_migrations: helper.run_migrations,
        })
    }
}

impl DbConfig {
    #[must_use]
    pub fn redacted_url(&self) -> String {
        let url_str = self.database_url.expose_secret();
        match url::Url::parse(url_str) {
            Ok(mut url) => {
                if url.password().is_some() {
                    url.set_password(Some("***")).ok();
                }
                url.to_string()
            }
            Err(_) => "[INVALID_URL]".to_string(),
        }
    }

    #[must_use]
    pub fn database_url(&self) -> &str {
        self.database_url.expose_secret()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    pub redis_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub cookie_name: String,
    pub cookie_secure: bool,
    pub session_ttl_hours: i64,
    pub min_password_score: u8,
    pub argon2: Argon2Config,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Argon2Config {
    pub memory_cost: u32,
    pub time_cost: u32,
    pub parallelism: u32,
    pub output_length: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub include_location: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LogFormat {
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "pretty")]
    Pretty,
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            memory_cost: 19456,
            time_cost: 2,
            parallelism: 1,
            output_length: Some(32),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cookie_name: "sid".to_string(),
            cookie_secure: false,
            session_ttl_hours: 24 * 7,
            min_password_score: 3,
            argon2: Argon2Config::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                cors_origin: None,
            },
            db: DbConfig {
                database_url: SecretString::from(DEFAULT_DATABASE_URL),
                pool_size: 10,
                query_timeout_secs: 5,
                run_migrations: true,
            },
            redis: RedisConfig {
                redis_url: "redis://localhost:6379".to_string(),
            },
            auth: AuthConfig::default(),
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: LogFormat::Pretty,
                include_location: false,
            },
            environment: EnvironmentConfig {
                env: "development".to_string(),
            },
        }
    }
}

impl Config {
    pub fn validate(&self) -> AppResult<()> {
        if self.db.database_url.expose_secret().is_empty() {
            return Err(AppError::ConfigError {
                message: "database_url cannot be empty".to_string(),
            });
        }

        if self.db.pool_size == 0 {
            return Err(AppError::ConfigError {
                message: "db pool_size must be greater than 0".to_string(),
            });
        }

        if self.db.query_timeout_secs == 0 {
            return Err(AppError::ConfigError {
                message: "db query_timeout_secs must be greater than 0".to_string(),
            });
        }

        if self.redis.redis_url.is_empty() {
            return Err(AppError::ConfigError {
                message: "redis_url cannot be empty".to_string(),
            });
        }

        if self.auth.cookie_name.trim().is_empty() {
            return Err(AppError::ConfigError {
                message: "auth cookie_name cannot be empty".to_string(),
            });
        }

        if self.auth.session_ttl_hours <= 0 {
            return Err(AppError::ConfigError {
                message: "auth session_ttl_hours must be greater than 0".to_string(),
            });
        }

        if self.auth.min_password_score > 4 {
            return Err(AppError::ConfigError {
                message: "auth min_password_score must be between 0 and 4".to_string(),
            });
        }

        if self.auth.argon2.memory_cost < 1024 {
            return Err(AppError::ConfigError {
                message: "Argon2 memory_cost must be at least 1024 KiB".to_string(),
            });
        }

        if self.auth.argon2.time_cost == 0 {
            return Err(AppError::ConfigError {
                message: "Argon2 time_cost must be greater than 0".to_string(),
            });
        }

        if self.auth.argon2.parallelism == 0 {
            return Err(AppError::ConfigError {
                message: "Argon2 parallelism must be greater than 0".to_string(),
            });
        }

        if let Some(output_len) = self.auth.argon2.output_length {
            if !(16..=512).contains(&output_len) {
                return Err(AppError::ConfigError {
                    message: "Argon2 output_length must be between 16 and 512 bytes".to_string(),
                });
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
