//! tally-config
//!
//! Persistent CLI preferences for the expense tracker.
//! Owns the Config data structure, the application home lookup and disk persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::{app_home, ConfigManager, HOME_ENV_VAR};
pub use model::Config;
