use tally_core::{
    storage::{AppState, StateStorage},
    BudgetService, Clock, DashboardSummary, ExpenseQuery, ExpenseStore, FilteredExpenses,
    SummaryService,
};
use tally_domain::{
    BudgetOverview, BudgetPeriod, CategoryBudget, CategoryBudgetReport, Expense, NewExpense,
    RollingBudget, RollingBudgetReport, Settings,
};
use tracing::{info, warn};

use super::errors::{AppError, Result};

/// Facade that owns tracker state and coordinates persistence.
///
/// Mutations only touch memory. Callers persist each change with the matching
/// `save_*` method.
pub struct TrackerManager {
    expenses: ExpenseStore,
    budgets: Vec<CategoryBudget>,
    rolling_budget: Option<RollingBudget>,
    settings: Settings,
    storage: Box<dyn StateStorage>,
    clock: Box<dyn Clock>,
}

impl TrackerManager {
    pub fn new(storage: Box<dyn StateStorage>, clock: Box<dyn Clock>) -> Self {
        Self {
            expenses: ExpenseStore::new(),
            budgets: Vec::new(),
            rolling_budget: None,
            settings: Settings::default(),
            storage,
            clock,
        }
    }

    /// Replaces in-memory state with what storage holds. Returns load warnings.
    pub fn load(&mut self) -> Result<Vec<String>> {
        let report = self.storage.load()?;
        for warning in &report.warnings {
            warn!(%warning, "load warning");
        }
        let AppState {
            expenses,
            budgets,
            rolling_budget,
            settings,
        } = report.state;
        info!(expenses = expenses.len(), budgets = budgets.len(), "tracker state loaded");
        self.expenses = ExpenseStore::from_records(expenses);
        self.budgets = budgets;
        self.rolling_budget = rolling_budget;
        self.settings = settings;
        Ok(report.warnings)
    }

    pub fn expenses(&self) -> &ExpenseStore {
        &self.expenses
    }

    pub fn budgets(&self) -> &[CategoryBudget] {
        &self.budgets
    }

    pub fn rolling_budget(&self) -> Option<&RollingBudget> {
        self.rolling_budget.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn snapshot(&self) -> AppState {
        AppState {
            expenses: self.expenses.as_slice().to_vec(),
            budgets: self.budgets.clone(),
            rolling_budget: self.rolling_budget,
            settings: self.settings.clone(),
        }
    }

    /// Records a new expense after checking it against the current settings.
    ///
    /// A blank currency takes the default currency.
    pub fn add_expense(&mut self, mut input: NewExpense) -> Result<Expense> {
        input.category = input.category.trim().to_string();
        input.currency = input.currency.trim().to_uppercase();
        if input.currency.is_empty() {
            input.currency = self.settings.default_currency.clone();
        }
        if !input.category.is_empty() && !self.settings.has_category(&input.category) {
            return Err(AppError::Validation(format!(
                "unknown category `{}`",
                input.category
            )));
        }
        if !self.settings.has_currency(&input.currency) {
            return Err(AppError::Validation(format!(
                "unknown currency `{}`",
                input.currency
            )));
        }
        let stored = self.expenses.add(input, self.clock.as_ref())?;
        Ok(stored.clone())
    }

    pub fn expense(&self, id: &str) -> Result<&Expense> {
        self.expenses
            .get(id)
            .ok_or_else(|| AppError::ExpenseNotFound(id.to_string()))
    }

    /// Removes an expense. Unknown ids are a no-op that returns `false`.
    pub fn delete_expense(&mut self, id: &str) -> bool {
        self.expenses.delete(id)
    }

    /// Sets the limit for `category`. The currency defaults to the settings default.
    pub fn upsert_budget(
        &mut self,
        category: &str,
        limit: f64,
        currency: Option<&str>,
    ) -> Result<CategoryBudget> {
        let category = category.trim();
        if !self.settings.has_category(category) {
            return Err(AppError::Validation(format!(
                "unknown category `{}`",
                category
            )));
        }
        let currency = currency
            .map(|code| code.trim().to_uppercase())
            .filter(|code| !code.is_empty())
            .unwrap_or_else(|| self.settings.default_currency.clone());
        let budget = CategoryBudget::new(category, limit, currency);
        BudgetService::upsert(&mut self.budgets, budget.clone())?;
        Ok(budget)
    }

    pub fn remove_budget(&mut self, category: &str) -> Result<()> {
        BudgetService::remove(&mut self.budgets, category)?;
        Ok(())
    }

    pub fn set_rolling_budget(&mut self, amount: f64, period: BudgetPeriod) -> Result<RollingBudget> {
        let budget = BudgetService::rolling_budget(amount, period)?;
        self.rolling_budget = Some(budget);
        Ok(budget)
    }

    /// Returns `false` when no rolling budget was set.
    pub fn clear_rolling_budget(&mut self) -> bool {
        self.rolling_budget.take().is_some()
    }

    /// Applies a settings mutator and reports whether anything changed.
    pub fn update_settings<F>(&mut self, update: F) -> bool
    where
        F: FnOnce(&mut Settings) -> bool,
    {
        update(&mut self.settings)
    }

    pub fn save_expenses(&self) -> Result<()> {
        Ok(self.storage.save_expenses(self.expenses.as_slice())?)
    }

    pub fn save_budgets(&self) -> Result<()> {
        Ok(self.storage.save_budgets(&self.budgets)?)
    }

    pub fn save_rolling_budget(&self) -> Result<()> {
        Ok(self.storage.save_rolling_budget(self.rolling_budget.as_ref())?)
    }

    pub fn save_settings(&self) -> Result<()> {
        Ok(self.storage.save_settings(&self.settings)?)
    }

    pub fn save_all(&self) -> Result<()> {
        Ok(self.storage.save_all(&self.snapshot())?)
    }

    pub fn budget_reports(&self) -> Vec<CategoryBudgetReport> {
        BudgetService::category_reports(&self.budgets, self.expenses.as_slice())
    }

    pub fn budget_report(&self, category: &str) -> Option<CategoryBudgetReport> {
        BudgetService::category_report(&self.budgets, self.expenses.as_slice(), category)
    }

    pub fn budget_overview(&self) -> BudgetOverview {
        BudgetService::overview(&self.budget_reports())
    }

    pub fn budget_alerts(&self) -> Vec<CategoryBudgetReport> {
        BudgetService::alerts(&self.budgets, self.expenses.as_slice())
    }

    pub fn rolling_report(&self) -> Option<RollingBudgetReport> {
        self.rolling_budget.as_ref().map(|budget| {
            BudgetService::rolling_report(budget, self.expenses.as_slice(), self.clock.as_ref())
        })
    }

    pub fn dashboard(&self, recent: usize) -> DashboardSummary {
        SummaryService::dashboard(&self.expenses, self.clock.as_ref(), recent)
    }

    pub fn query(&self, query: &ExpenseQuery) -> FilteredExpenses<'_> {
        query.apply(self.expenses.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use tally_core::{storage::InMemoryStorage, FixedClock, SettingsService};
    use tally_domain::{BudgetStatus, FeatureToggle};

    use super::*;

    fn manager() -> (TrackerManager, Arc<InMemoryStorage>) {
        let backing = Arc::new(InMemoryStorage::new());
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 8, 20, 12, 0, 0).unwrap());
        let manager = TrackerManager::new(
            Box::new(Arc::clone(&backing)),
            Box::new(clock),
        );
        (manager, backing)
    }

    fn lunch(amount: f64) -> NewExpense {
        let date = Utc.with_ymd_and_hms(2024, 8, 20, 11, 0, 0).unwrap();
        NewExpense::new(amount, "Food & Dining", "Lunch", date)
    }

    #[test]
    fn blank_currency_takes_default() {
        let (mut manager, _) = manager();
        manager.update_settings(|s| SettingsService::set_default_currency(s, "EUR"));
        let stored = manager.add_expense(lunch(9.0)).unwrap();
        assert_eq!(stored.currency, "EUR");
    }

    #[test]
    fn unknown_category_or_currency_is_rejected() {
        let (mut manager, _) = manager();
        let mut input = lunch(9.0);
        input.category = "Scuba".into();
        assert!(matches!(
            manager.add_expense(input),
            Err(AppError::Validation(_))
        ));
        assert!(manager.add_expense(lunch(9.0).with_currency("XYZ")).is_err());
        assert!(manager.expenses().is_empty());
    }

    #[test]
    fn mutations_persist_only_when_saved() {
        let (mut manager, backing) = manager();
        manager.add_expense(lunch(12.0)).unwrap();
        assert!(backing.snapshot().unwrap().expenses.is_empty());

        manager.save_expenses().unwrap();
        assert_eq!(backing.snapshot().unwrap().expenses.len(), 1);
    }

    #[test]
    fn load_replaces_state() {
        let (mut manager, backing) = manager();
        manager.add_expense(lunch(12.0)).unwrap();
        manager.upsert_budget("Food & Dining", 15.0, None).unwrap();
        manager.update_settings(|s| SettingsService::set_toggle(s, FeatureToggle::OfflineMode, false));
        manager.save_all().unwrap();

        let (mut other, _) = manager_with(backing);
        other.load().unwrap();
        assert_eq!(other.snapshot(), manager.snapshot());
        assert_eq!(
            other.budget_report("Food & Dining").unwrap().status,
            BudgetStatus::NearLimit
        );
    }

    fn manager_with(backing: Arc<InMemoryStorage>) -> (TrackerManager, Arc<InMemoryStorage>) {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 8, 21, 12, 0, 0).unwrap());
        let manager = TrackerManager::new(
            Box::new(Arc::clone(&backing)),
            Box::new(clock),
        );
        (manager, backing)
    }

    #[test]
    fn budgets_require_known_categories_and_default_currency() {
        let (mut manager, _) = manager();
        assert!(manager.upsert_budget("Scuba", 10.0, None).is_err());
        let budget = manager.upsert_budget("Medical", 40.0, Some("gbp")).unwrap();
        assert_eq!(budget.currency, "GBP");
        let budget = manager.upsert_budget("Medical", 60.0, None).unwrap();
        assert_eq!(budget.currency, "USD");
        assert_eq!(manager.budgets().len(), 1);
        assert!(matches!(
            manager.remove_budget("Other"),
            Err(AppError::BudgetNotFound(_))
        ));
    }

    #[test]
    fn rolling_budget_lifecycle() {
        let (mut manager, _) = manager();
        assert!(manager.rolling_report().is_none());
        manager.set_rolling_budget(70.0, BudgetPeriod::Daily).unwrap();
        manager.add_expense(lunch(35.0)).unwrap();
        let report = manager.rolling_report().unwrap();
        assert_eq!(report.percentage_used, 50.0);
        assert!(manager.clear_rolling_budget());
        assert!(!manager.clear_rolling_budget());
        assert!(manager.set_rolling_budget(0.0, BudgetPeriod::Daily).is_err());
    }

    #[test]
    fn delete_missing_expense_is_a_no_op() {
        let (mut manager, _) = manager();
        let kept = manager.add_expense(lunch(3.0)).unwrap();
        assert!(!manager.delete_expense("missing"));
        assert_eq!(manager.expenses().len(), 1);
        assert!(manager.delete_expense(&kept.id));
        assert!(matches!(
            manager.expense(&kept.id),
            Err(AppError::ExpenseNotFound(_))
        ));
    }
}
