// keep public for OpenAPI docs
pub mod auth;
pub mod health;
pub mod moderation;
pub mod profile;
