//! fintrack-config
//!
//! Persistent user preferences: display locale, currency label, data location
//! and logging defaults.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{Config, CONFIG_KEYS, DATA_HOME_ENV};
