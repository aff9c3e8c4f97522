pub mod passwords;
pub mod postgres_sqlx;
