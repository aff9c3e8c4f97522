pub mod in_flight;
pub mod service;
