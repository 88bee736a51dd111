//! tally-storage-json
//!
//! Filesystem-backed JSON persistence for the expense tracker. Each key lives in
//! its own document inside a data directory.

use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use tally_core::{
    storage::{state_warnings, AppState, LoadReport, StateStorage},
    CoreError,
};
use tally_domain::{CategoryBudget, Expense, RollingBudget, Settings};
use tracing::{debug, warn};

pub const EXPENSES_FILE: &str = "expenses.json";
pub const BUDGETS_FILE: &str = "budgets.json";
pub const ROLLING_BUDGET_FILE: &str = "rolling_budget.json";
pub const SETTINGS_FILE: &str = "settings.json";
const TMP_SUFFIX: &str = "tmp";
const BAD_SUFFIX: &str = "bad";

/// Stores expenses, budgets, the rolling budget and settings as JSON documents.
#[derive(Debug, Clone)]
pub struct JsonStateStorage {
    data_dir: PathBuf,
}

impl JsonStateStorage {
    pub fn new(data_dir: PathBuf) -> Result<Self, CoreError> {
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    pub fn document_path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    fn read_document<T>(&self, file: &str, warnings: &mut Vec<String>) -> Result<T, CoreError>
    where
        T: DeserializeOwned + Default,
    {
        let path = self.document_path(file);
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(T::default()),
            Err(err) => return Err(err.into()),
        };
        match serde_json::from_str(&data) {
            Ok(value) => Ok(value),
            Err(err) => {
                let backup = backup_path(&path);
                fs::rename(&path, &backup)?;
                warn!(
                    path = %path.display(),
                    backup = %backup.display(),
                    error = %err,
                    "unreadable document moved aside, using defaults"
                );
                warnings.push(format!(
                    "{file} could not be parsed ({err}); moved to {file}.{BAD_SUFFIX}, using defaults"
                ));
                Ok(T::default())
            }
        }
    }

    /// Loads expenses record by record so one bad entry does not discard the rest.
    /// The original document is copied to `expenses.json.bad` when anything is skipped.
    fn read_expenses(&self, warnings: &mut Vec<String>) -> Result<Vec<Expense>, CoreError> {
        let records: Vec<serde_json::Value> = self.read_document(EXPENSES_FILE, warnings)?;
        let mut expenses = Vec::with_capacity(records.len());
        let mut skipped = 0usize;
        for (index, record) in records.into_iter().enumerate() {
            match serde_json::from_value::<Expense>(record) {
                Ok(expense) => expenses.push(expense),
                Err(err) => {
                    skipped += 1;
                    warn!(index, error = %err, "skipping unreadable expense record");
                    warnings.push(format!(
                        "{EXPENSES_FILE} record #{} skipped ({err})",
                        index + 1
                    ));
                }
            }
        }
        if skipped > 0 {
            let path = self.document_path(EXPENSES_FILE);
            fs::copy(&path, backup_path(&path))?;
            warnings.push(format!(
                "{skipped} unreadable expense record(s) kept in {EXPENSES_FILE}.{BAD_SUFFIX}"
            ));
        }
        Ok(expenses)
    }

    fn write_document<T>(&self, file: &str, value: &T) -> Result<(), CoreError>
    where
        T: Serialize + ?Sized,
    {
        let path = self.document_path(file);
        let json = serde_json::to_string_pretty(value)
            .map_err(|err| CoreError::Serde(err.to_string()))?;
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), "document saved");
        Ok(())
    }
}

impl StateStorage for JsonStateStorage {
    fn load(&self) -> Result<LoadReport, CoreError> {
        let mut warnings = Vec::new();
        let expenses = self.read_expenses(&mut warnings)?;
        let budgets: Vec<CategoryBudget> = self.read_document(BUDGETS_FILE, &mut warnings)?;
        let rolling_budget: Option<RollingBudget> =
            self.read_document(ROLLING_BUDGET_FILE, &mut warnings)?;
        let mut settings: Settings = self.read_document(SETTINGS_FILE, &mut warnings)?;
        for note in settings.repair() {
            warn!(note = %note, "settings repaired");
            warnings.push(note);
        }

        let state = AppState {
            expenses,
            budgets,
            rolling_budget,
            settings,
        };
        warnings.extend(state_warnings(&state));
        debug!(
            expenses = state.expenses.len(),
            budgets = state.budgets.len(),
            "state loaded"
        );
        Ok(LoadReport { state, warnings })
    }

    fn save_expenses(&self, expenses: &[Expense]) -> Result<(), CoreError> {
        self.write_document(EXPENSES_FILE, expenses)
    }

    fn save_budgets(&self, budgets: &[CategoryBudget]) -> Result<(), CoreError> {
        self.write_document(BUDGETS_FILE, budgets)
    }

    fn save_rolling_budget(&self, budget: Option<&RollingBudget>) -> Result<(), CoreError> {
        self.write_document(ROLLING_BUDGET_FILE, &budget)
    }

    fn save_settings(&self, settings: &Settings) -> Result<(), CoreError> {
        self.write_document(SETTINGS_FILE, settings)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn backup_path(path: &Path) -> PathBuf {
    let mut backup = path.as_os_str().to_owned();
    backup.push(".");
    backup.push(BAD_SUFFIX);
    PathBuf::from(backup)
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    file.sync_all()?;
    Ok(())
}
