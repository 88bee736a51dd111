//! tally-domain
//!
//! Pure domain models (Expense, CategoryBudget, RollingBudget, Settings).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod budget;
pub mod common;
pub mod expense;
pub mod settings;

pub use budget::*;
pub use common::*;
pub use expense::*;
pub use settings::*;
