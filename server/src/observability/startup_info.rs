use profile_moderation_application::infrastructure_config::{AuthConfig, Config};
use tracing::info;

pub fn print_api_info(config: &Config) {
    print_api_documentation_info(config);
    print_configuration_info(config);
}

fn print_api_documentation_info(config: &Config) {
    let base_url = format!("http://{}", config.server_address());
    info!("📋 API Documentation:");
    info!("  📖 Swagger UI: {}/docs", base_url);
    info!("  📄 OpenAPI JSON: {}/api-docs/openapi.json", base_url);
}

fn print_configuration_info(config: &Config) {
    info!("⚙️  Configuration:");
    info!("  🌍 Environment: {}", config.environment.env);
    info!(
        "  🗄️  Database: PostgreSQL, pool of {}, query timeout {}s, migrations {}",
        config.db.pool_size,
        config.db.query_timeout_secs,
        if config.db.run_migrations {
            "on startup"
        } else {
            "external"
        }
    );
    print_session_configuration(&config.auth);
}

fn print_session_configuration(auth: &AuthConfig) {
    info!(
        "  🍪 Sessions: Redis, cookie '{}' (secure: {}), idle TTL {}h",
        auth.cookie_name, auth.cookie_secure, auth.session_ttl_hours
    );
    info!(
        "  🔑 Passwords: argon2 (m={}, t={}, p={}), min strength score {}",
        auth.argon2.memory_cost,
        auth.argon2.time_cost,
        auth.argon2.parallelism,
        auth.min_password_score
    );
}
