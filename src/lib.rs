#![doc(test(attr(deny(warnings))))]

//! Expense Core records expenses and measures them against per-category and
//! rolling budgets. The interactive shell lives in [`cli`].

pub mod cli;
pub mod core;
pub mod utils;

use std::sync::Once;

pub use crate::core::{AppError, CliError, TrackerManager};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Expense Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
