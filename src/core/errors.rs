use rustyline::error::ReadlineError;
use tally_config::ConfigError;
use tally_core::CoreError;
use thiserror::Error;

/// Unified error type for the tracker facade and its collaborators.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Expense not found: {0}")]
    ExpenseNotFound(String),
    #[error("No budget for category: {0}")]
    BudgetNotFound(String),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] AppError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(message) => AppError::Validation(message),
            CoreError::ExpenseNotFound(id) => AppError::ExpenseNotFound(id),
            CoreError::BudgetNotFound(category) => AppError::BudgetNotFound(category),
            CoreError::Storage(message) | CoreError::Serde(message) => AppError::Storage(message),
            CoreError::Io(err) => AppError::Storage(err.to_string()),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(io) => AppError::Storage(io.to_string()),
            ConfigError::Serde(message) | ConfigError::Invalid(message) => {
                AppError::Config(message)
            }
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::from(AppError::from(err))
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::from(AppError::from(err))
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<ReadlineError> for CliError {
    fn from(err: ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}
