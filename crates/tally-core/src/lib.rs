//! tally-core
//!
//! Business logic and services for the expense tracker.
//! Depends on tally-domain. No CLI, no terminal I/O, no direct storage interactions.

pub mod budget_service;
pub mod error;
pub mod expense_store;
pub mod query_service;
pub mod settings_service;
pub mod storage;
pub mod summary_service;
pub mod time;

pub use budget_service::*;
pub use error::CoreError;
pub use expense_store::*;
pub use query_service::*;
pub use settings_service::*;
pub use summary_service::*;
pub use time::*;
