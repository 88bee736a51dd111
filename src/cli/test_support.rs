use std::sync::Arc;

use chrono::{TimeZone, Utc};
use tally_config::{Config, ConfigManager};
use tally_core::{
    storage::{AppState, InMemoryStorage},
    FixedClock,
};
use tempfile::TempDir;

use crate::cli::core::{CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::shell::handle_line;
use crate::core::TrackerManager;

/// Script-mode shell over in-memory storage with the clock pinned to 2024-07-18 15:00 UTC.
pub(crate) struct TestShell {
    pub context: ShellContext,
    pub storage: Arc<InMemoryStorage>,
    _home: TempDir,
}

impl TestShell {
    pub fn new() -> Self {
        let home = TempDir::new().expect("temp home");
        let storage = Arc::new(InMemoryStorage::new());
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 7, 18, 15, 0, 0).unwrap());
        let mut manager = TrackerManager::new(Box::new(Arc::clone(&storage)), Box::new(clock));
        manager.load().expect("load empty state");

        let config_manager = ConfigManager::with_base_dir(home.path().to_path_buf())
            .expect("config manager");
        let context = ShellContext::with_parts(
            CliMode::Script,
            manager,
            config_manager,
            Config::default(),
            home.path().join("data"),
        );
        Self {
            context,
            storage,
            _home: home,
        }
    }

    pub fn run(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        handle_line(&mut self.context, line)
    }

    /// Runs `line`, panicking if the command fails.
    pub fn ok(&mut self, line: &str) {
        if let Err(err) = self.run(line) {
            panic!("`{line}` failed: {err}");
        }
    }

    pub fn saved(&self) -> AppState {
        self.storage.snapshot().expect("snapshot")
    }
}
