pub mod actor;
pub mod ban;
pub mod ban_time;
pub mod error;
pub mod perk;
pub mod profile;
