pub mod ban_event_store_postgres;
pub mod migrations;
pub mod profile_store_postgres;

pub(crate) mod utils;
