pub mod ban_event_store;
pub mod password_hasher;
pub mod profile_store;
