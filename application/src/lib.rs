#[cfg(any(feature = "adapters", feature = "axum", feature = "sqlx"))]
compile_error!("application must not depend on adapters/framework crates");

pub mod auth;
pub mod error;
pub mod infrastructure_config;
pub mod moderation;
pub mod ports;
pub mod profile;

#[cfg(test)]
pub(crate) mod testing;
