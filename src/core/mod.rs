pub mod errors;
pub mod tracker_manager;

pub use errors::{AppError, CliError};
pub use tracker_manager::TrackerManager;
