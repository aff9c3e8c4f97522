use std::{error::Error, io::stdout};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use profile_moderation_application::infrastructure_config::{Config, LogFormat, LoggingConfig};

const SERVICE_NAME: &str = "profile-moderation";

/// `RUST_LOG` wins over the configured level.
fn build_env_filter(logging: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level))
}

pub fn setup_logging(config: &Config) -> Result<(), Box<dyn Error>> {
    let env_filter = build_env_filter(&config.logging);

    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(JsonStorageLayer)
                .with(BunyanFormattingLayer::new(SERVICE_NAME.to_string(), stdout))
                .init();
        }
        LogFormat::Pretty => {
            let format = fmt::format().with_target(true).compact();

            tracing_subscriber::fmt()
                .event_format(format)
                .with_env_filter(env_filter)
                .with_file(config.logging.include_location)
                .with_line_number(config.logging.include_location)
                .init();
        }
    }

    Ok(())
}
