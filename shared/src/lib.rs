pub mod config;
pub mod database;
pub mod errors;
pub mod forms;
pub mod markdown;
pub mod pagination;
pub mod settings;
pub mod token;
pub mod types;
pub mod utils;
