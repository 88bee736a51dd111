use std::sync::{Arc, Mutex};

use tally_domain::{CategoryBudget, Categorized, Expense, RollingBudget, Settings};

use crate::CoreError;

/// Everything the tracker persists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    /// Newest first.
    pub expenses: Vec<Expense>,
    pub budgets: Vec<CategoryBudget>,
    pub rolling_budget: Option<RollingBudget>,
    pub settings: Settings,
}

/// Loaded state plus notes about anything that had to fall back to defaults.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub state: AppState,
    pub warnings: Vec<String>,
}

/// Abstraction over persistence backends. Each key is saved independently.
pub trait StateStorage: Send + Sync {
    fn load(&self) -> Result<LoadReport, CoreError>;
    fn save_expenses(&self, expenses: &[Expense]) -> Result<(), CoreError>;
    fn save_budgets(&self, budgets: &[CategoryBudget]) -> Result<(), CoreError>;
    fn save_rolling_budget(&self, budget: Option<&RollingBudget>) -> Result<(), CoreError>;
    fn save_settings(&self, settings: &Settings) -> Result<(), CoreError>;

    fn save_all(&self, state: &AppState) -> Result<(), CoreError> {
        self.save_expenses(&state.expenses)?;
        self.save_budgets(&state.budgets)?;
        self.save_rolling_budget(state.rolling_budget.as_ref())?;
        self.save_settings(&state.settings)
    }
}

/// Shared handles let a caller keep inspecting a backend it handed to a manager.
impl<S: StateStorage + ?Sized> StateStorage for Arc<S> {
    fn load(&self) -> Result<LoadReport, CoreError> {
        (**self).load()
    }

    fn save_expenses(&self, expenses: &[Expense]) -> Result<(), CoreError> {
        (**self).save_expenses(expenses)
    }

    fn save_budgets(&self, budgets: &[CategoryBudget]) -> Result<(), CoreError> {
        (**self).save_budgets(budgets)
    }

    fn save_rolling_budget(&self, budget: Option<&RollingBudget>) -> Result<(), CoreError> {
        (**self).save_rolling_budget(budget)
    }

    fn save_settings(&self, settings: &Settings) -> Result<(), CoreError> {
        (**self).save_settings(settings)
    }
}

/// Volatile backend used by tests and as a fallback when no data directory is usable.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    state: Mutex<AppState>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of what has been saved so far.
    pub fn snapshot(&self) -> Result<AppState, CoreError> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, AppState>, CoreError> {
        self.state
            .lock()
            .map_err(|_| CoreError::Storage("in-memory state lock poisoned".into()))
    }
}

impl StateStorage for InMemoryStorage {
    fn load(&self) -> Result<LoadReport, CoreError> {
        Ok(LoadReport {
            state: self.lock()?.clone(),
            warnings: Vec::new(),
        })
    }

    fn save_expenses(&self, expenses: &[Expense]) -> Result<(), CoreError> {
        self.lock()?.expenses = expenses.to_vec();
        Ok(())
    }

    fn save_budgets(&self, budgets: &[CategoryBudget]) -> Result<(), CoreError> {
        self.lock()?.budgets = budgets.to_vec();
        Ok(())
    }

    fn save_rolling_budget(&self, budget: Option<&RollingBudget>) -> Result<(), CoreError> {
        self.lock()?.rolling_budget = budget.copied();
        Ok(())
    }

    fn save_settings(&self, settings: &Settings) -> Result<(), CoreError> {
        self.lock()?.settings = settings.clone();
        Ok(())
    }
}

/// Cross-checks a loaded state and describes dangling references.
pub fn state_warnings(state: &AppState) -> Vec<String> {
    let mut warnings = Vec::new();
    for budget in &state.budgets {
        if !state.settings.has_category(budget.category()) {
            warnings.push(format!(
                "budget for `{}` refers to a category that is not in settings",
                budget.category()
            ));
        }
    }
    let mut seen = std::collections::HashSet::new();
    for expense in &state.expenses {
        if !seen.insert(expense.id.as_str()) {
            warnings.push(format!("expense id {} appears more than once", expense.id));
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use tally_domain::BudgetPeriod;

    use super::*;

    #[test]
    fn in_memory_round_trips_every_key() {
        let storage = InMemoryStorage::new();
        let state = AppState {
            budgets: vec![CategoryBudget::new("Medical", 50.0, "USD")],
            rolling_budget: Some(RollingBudget::new(300.0, BudgetPeriod::Weekly)),
            ..AppState::default()
        };
        storage.save_all(&state).unwrap();
        assert_eq!(storage.load().unwrap().state, state);

        storage.save_rolling_budget(None).unwrap();
        assert_eq!(storage.snapshot().unwrap().rolling_budget, None);
    }

    #[test]
    fn warns_about_budgets_for_unknown_categories() {
        let state = AppState {
            budgets: vec![CategoryBudget::new("Scuba", 80.0, "USD")],
            ..AppState::default()
        };
        let warnings = state_warnings(&state);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Scuba"));
    }
}
