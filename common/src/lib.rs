pub mod assignments;
pub mod config;
pub mod constants;
pub mod errors;
pub mod fixtures;
pub mod logger;
pub mod messages;
pub mod roles;
pub mod types;
pub mod utils;
