use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml},
};
use profile_moderation_application::error::{AppError, AppResult};
use profile_moderation_application::infrastructure_config::{Config, DEFAULT_DATABASE_URL};
use std::fs;
use std::path::Path;
use tracing::info;

pub fn load_config() -> AppResult<Config> {
    generate_env_template_if_missing()?;
    extract_config(build_figment())
}

fn build_figment() -> Figment {
    let default_config = Config::default();
    // The serialized defaults carry a redacted database url.
    let mut figment = Figment::from(Serialized::defaults(default_config))
        .merge(Serialized::default("db.database_url", DEFAULT_DATABASE_URL));

    if Path::new("config.toml").exists() {
        figment = figment.merge(Toml::file("config.toml"));
    }

    if Path::new("config.json").exists() {
        figment = figment.merge(Json::file("config.json"));
    }

    figment.merge(Env::prefixed("PROFILE_MOD_").split("__"))
}

fn extract_config(figment: Figment) -> AppResult<Config> {
    let config: Config = figment
        .extract()
        .map_err(|e| AppError::ConfigError {
            message: format!("Failed to load configuration: {e}"),
        })?;

    config.validate()?;
    Ok(config)
}

fn generate_env_template_if_missing() -> AppResult<()> {
    let env_file = ".env";
    let template_file = ".env.example";

    if Path::new(env_file).exists() {
        return Ok(());
    }

    if !Path::new(template_file).exists() {
        return Ok(());
    }

    fs::copy(template_file, env_file).map_err(|e| AppError::ConfigError {
        message: format!("Failed to generate .env file from template: {e}"),
    })?;

    info!("Generated .env from template. Please configure your secrets!");
    info!("IMPORTANT: .env contains sensitive data and is gitignored.");

    Ok(())
}
