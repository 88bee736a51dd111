use std::path::PathBuf;

use dialoguer::theme::ColorfulTheme;
use tally_config::{app_home, Config, ConfigManager};
use tally_storage_json::JsonStateStorage;
use tracing::warn;

use crate::cli::commands;
use crate::cli::core::{CommandError, CommandResult, LoopControl};
use crate::cli::io as cli_io;
use crate::cli::output::{self, OutputPreferences};
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::cli::system_clock::SystemClock;
use crate::core::{CliError, TrackerManager};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub manager: TrackerManager,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub data_dir: PathBuf,
    pub running: bool,
}

impl ShellContext {
    /// Opens the application home, loads configuration and tracker state.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let home = app_home();
        let config_manager = ConfigManager::with_base_dir(home.clone())?;
        let config = match config_manager.load() {
            Ok(config) => config,
            Err(err) => {
                warn!(error = %err, "configuration unreadable, using defaults");
                cli_io::print_warning(format!("Configuration unreadable ({err}); using defaults."));
                Config::default()
            }
        };

        output::set_preferences(OutputPreferences {
            color_enabled: config.ui_color_enabled && mode == CliMode::Interactive,
        });

        let data_dir = config.resolve_data_dir(&home);
        let storage = JsonStateStorage::new(data_dir.clone())?;
        let mut manager = TrackerManager::new(Box::new(storage), Box::new(SystemClock));
        for warning in manager.load()? {
            cli_io::print_warning(warning);
        }

        Ok(Self::with_parts(mode, manager, config_manager, config, data_dir))
    }

    /// Assembles a context around an already-loaded manager.
    pub fn with_parts(
        mode: CliMode,
        manager: TrackerManager,
        config_manager: ConfigManager,
        config: Config,
        data_dir: PathBuf,
    ) -> Self {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let context = Self {
            mode,
            registry,
            manager,
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            data_dir,
            running: true,
        };
        context.apply_output_preferences();
        context
    }

    pub(crate) fn apply_output_preferences(&self) {
        output::set_preferences(OutputPreferences {
            color_enabled: self.config.ui_color_enabled && self.mode == CliMode::Interactive,
        });
    }

    pub(crate) fn theme(&self) -> &ColorfulTheme {
        &self.theme
    }

    /// Prompts are only shown to a person at a terminal.
    pub(crate) fn can_prompt(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    pub(crate) fn prompt(&self) -> String {
        format!("expenses ({})> ", self.manager.expenses().len())
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn recent_count(&self) -> usize {
        self.config.recent_count
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = self.registry.suggest(input) {
            cli_io::print_info(format!("Suggestion: `{}`?", best));
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true)
            .map_err(|err| CliError::Input(err.to_string()))
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(&message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            other => {
                cli_io::print_error(other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }
}
