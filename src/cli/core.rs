//! Command result types shared by the shell and the command handlers.

use std::io;

use crate::core::errors::{AppError, CliError};

pub use crate::cli::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Failure of a single command. The shell reports it and keeps running.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    App(#[from] AppError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl CommandError {
    pub(crate) fn usage(usage: &str) -> Self {
        CommandError::InvalidArguments(format!("usage: {usage}"))
    }
}

impl From<tally_core::CoreError> for CommandError {
    fn from(err: tally_core::CoreError) -> Self {
        CommandError::App(AppError::from(err))
    }
}

impl From<tally_config::ConfigError> for CommandError {
    fn from(err: tally_config::ConfigError) -> Self {
        CommandError::App(AppError::from(err))
    }
}

impl From<CliError> for CommandError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Core(inner) => CommandError::App(inner),
            CliError::Input(message) => CommandError::InvalidArguments(message),
            CliError::Command(message) => CommandError::Message(message),
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}
