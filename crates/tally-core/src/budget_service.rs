//! Budget aggregation: per-category limits and the single rolling budget.
//!
//! Amounts are summed 1:1 regardless of currency. Mixed-currency spending is a
//! known limitation and is not converted.

use std::collections::HashMap;

use tally_domain::{
    utilization_percent, Amounted, BudgetOverview, BudgetPeriod, CategoryBudget, CategoryBudgetReport,
    Categorized, Expense, RollingBudget, RollingBudgetReport, RollingStatus,
};
use tracing::debug;

use crate::{Clock, CoreError};

/// Stateless budgeting utilities that operate over expense snapshots.
pub struct BudgetService;

impl BudgetService {
    /// Sums amounts per category.
    pub fn category_spending<T>(items: &[T]) -> HashMap<&str, f64>
    where
        T: Categorized + Amounted,
    {
        let mut totals: HashMap<&str, f64> = HashMap::new();
        for item in items {
            *totals.entry(item.category()).or_default() += item.amount();
        }
        totals
    }

    /// Builds one report per budget, in budget order.
    pub fn category_reports(
        budgets: &[CategoryBudget],
        expenses: &[Expense],
    ) -> Vec<CategoryBudgetReport> {
        let spending = Self::category_spending(expenses);
        budgets
            .iter()
            .map(|budget| {
                let spent = spending
                    .get(budget.category.as_str())
                    .copied()
                    .unwrap_or(0.0);
                CategoryBudgetReport::from_budget(budget, spent)
            })
            .collect()
    }

    /// Report for the budget attached to `category`, if any.
    pub fn category_report(
        budgets: &[CategoryBudget],
        expenses: &[Expense],
        category: &str,
    ) -> Option<CategoryBudgetReport> {
        let budget = budgets.iter().find(|b| b.category == category)?;
        let spent = expenses
            .iter()
            .filter(|e| e.category == category)
            .map(|e| e.amount)
            .sum();
        Some(CategoryBudgetReport::from_budget(budget, spent))
    }

    pub fn overview(reports: &[CategoryBudgetReport]) -> BudgetOverview {
        let total_budget: f64 = reports.iter().map(|r| r.limit).sum();
        let total_spent: f64 = reports.iter().map(|r| r.spent).sum();
        BudgetOverview {
            total_budget,
            total_spent,
            remaining: total_budget - total_spent,
            over_budget_count: reports.iter().filter(|r| r.spent > r.limit).count(),
        }
    }

    /// Reports for every category currently over its limit.
    pub fn alerts(budgets: &[CategoryBudget], expenses: &[Expense]) -> Vec<CategoryBudgetReport> {
        Self::category_reports(budgets, expenses)
            .into_iter()
            .filter(CategoryBudgetReport::is_over)
            .collect()
    }

    /// Inserts `budget`, replacing any existing budget for the same category in place.
    pub fn upsert(budgets: &mut Vec<CategoryBudget>, budget: CategoryBudget) -> Result<(), CoreError> {
        if budget.category.trim().is_empty() {
            return Err(CoreError::Validation("budget category is required".into()));
        }
        ensure_positive(budget.limit, "budget limit")?;
        match budgets.iter_mut().find(|b| b.category == budget.category) {
            Some(existing) => {
                debug!(category = %budget.category, limit = budget.limit, "updating budget");
                *existing = budget;
            }
            None => {
                debug!(category = %budget.category, limit = budget.limit, "adding budget");
                budgets.push(budget);
            }
        }
        Ok(())
    }

    pub fn remove(budgets: &mut Vec<CategoryBudget>, category: &str) -> Result<(), CoreError> {
        let before = budgets.len();
        budgets.retain(|b| b.category != category);
        if budgets.len() == before {
            return Err(CoreError::BudgetNotFound(category.to_string()));
        }
        Ok(())
    }

    pub fn rolling_budget(amount: f64, period: BudgetPeriod) -> Result<RollingBudget, CoreError> {
        ensure_positive(amount, "rolling budget amount")?;
        Ok(RollingBudget::new(amount, period))
    }

    /// Measures spending since the start of the budget's current period.
    pub fn rolling_report(
        budget: &RollingBudget,
        expenses: &[Expense],
        clock: &dyn Clock,
    ) -> RollingBudgetReport {
        let now = clock.now();
        let today = now.date_naive();
        let period_start = budget.period.start_of(now);

        let in_period: Vec<&Expense> = expenses.iter().filter(|e| e.date >= period_start).collect();
        let total_spent: f64 = in_period.iter().map(|e| e.amount).sum();

        let days_in_period = budget.period.days_in_period(today);
        let days_elapsed = ((today - period_start.date_naive()).num_days() + 1).max(1) as u32;
        let daily_average = total_spent / days_elapsed.min(days_in_period) as f64;
        let percentage_used = utilization_percent(total_spent, budget.amount);

        RollingBudgetReport {
            budget: *budget,
            period_start,
            expense_count: in_period.len(),
            total_spent,
            remaining: budget.amount - total_spent,
            percentage_used,
            days_elapsed,
            days_in_period,
            daily_average,
            projected_spending: daily_average * days_in_period as f64,
            status: RollingStatus::classify(percentage_used),
        }
    }
}

fn ensure_positive(value: f64, label: &str) -> Result<(), CoreError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "{label} must be a positive number"
        )))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use tally_domain::{BudgetStatus, NewExpense};

    use super::*;
    use crate::FixedClock;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn expense(id: &str, amount: f64, category: &str, date: DateTime<Utc>) -> Expense {
        Expense::from_new(
            id,
            NewExpense::new(amount, category, "test", date).with_currency("USD"),
        )
    }

    #[test]
    fn food_budget_near_limit_scenario() {
        let expenses = vec![
            expense("2", 30.0, "Food", at(2024, 5, 2, 12)),
            expense("1", 50.0, "Food", at(2024, 5, 1, 12)),
        ];
        let budgets = vec![CategoryBudget::new("Food", 100.0, "USD")];

        let reports = BudgetService::category_reports(&budgets, &expenses);
        assert_eq!(reports.len(), 1);
        let food = &reports[0];
        assert_eq!(food.spent, 80.0);
        assert_eq!(food.status, BudgetStatus::NearLimit);
        assert_eq!(food.remaining, 20.0);
        assert_eq!(food.percentage, 80.0);
    }

    #[test]
    fn spending_ignores_currency_and_other_categories() {
        let mut eur = expense("3", 10.0, "Medical", at(2024, 5, 1, 8));
        eur.currency = "EUR".into();
        let expenses = vec![
            eur,
            expense("2", 15.0, "Medical", at(2024, 5, 1, 9)),
            expense("1", 99.0, "Activities", at(2024, 5, 1, 10)),
        ];
        let report = BudgetService::category_report(
            &[CategoryBudget::new("Medical", 20.0, "USD")],
            &expenses,
            "Medical",
        )
        .expect("medical report");
        assert_eq!(report.spent, 25.0);
        assert_eq!(report.status, BudgetStatus::OverBudget);
        assert_eq!(report.over_by(), 5.0);
    }

    #[test]
    fn upsert_replaces_in_place_and_validates() {
        let mut budgets = vec![
            CategoryBudget::new("Food", 100.0, "USD"),
            CategoryBudget::new("Medical", 50.0, "USD"),
        ];
        BudgetService::upsert(&mut budgets, CategoryBudget::new("Food", 150.0, "EUR")).unwrap();
        assert_eq!(budgets.len(), 2);
        assert_eq!(budgets[0], CategoryBudget::new("Food", 150.0, "EUR"));

        BudgetService::upsert(&mut budgets, CategoryBudget::new("Other", 5.0, "USD")).unwrap();
        assert_eq!(budgets[2].category, "Other");

        let err = BudgetService::upsert(&mut budgets, CategoryBudget::new("Food", 0.0, "USD"))
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(budgets[0].limit, 150.0);
    }

    #[test]
    fn remove_reports_missing_budgets() {
        let mut budgets = vec![CategoryBudget::new("Food", 100.0, "USD")];
        assert!(matches!(
            BudgetService::remove(&mut budgets, "Medical"),
            Err(CoreError::BudgetNotFound(_))
        ));
        BudgetService::remove(&mut budgets, "Food").unwrap();
        assert!(budgets.is_empty());
    }

    #[test]
    fn overview_counts_only_strictly_over_budgets() {
        let budgets = vec![
            CategoryBudget::new("Food", 100.0, "USD"),
            CategoryBudget::new("Medical", 50.0, "USD"),
            CategoryBudget::new("Other", 10.0, "USD"),
        ];
        let expenses = vec![
            expense("1", 100.0, "Food", at(2024, 5, 1, 8)),
            expense("2", 60.0, "Medical", at(2024, 5, 1, 8)),
        ];
        let reports = BudgetService::category_reports(&budgets, &expenses);
        let overview = BudgetService::overview(&reports);
        assert_eq!(overview.total_budget, 160.0);
        assert_eq!(overview.total_spent, 160.0);
        assert_eq!(overview.remaining, 0.0);
        assert_eq!(overview.over_budget_count, 1);

        let alerts = BudgetService::alerts(&budgets, &expenses);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].category, "Medical");
    }

    #[test]
    fn weekly_rolling_report_projects_period_total() {
        // Wednesday; the week started on Sunday 2024-05-12.
        let clock = FixedClock(at(2024, 5, 15, 18));
        let expenses = vec![
            expense("4", 30.0, "Food", at(2024, 5, 15, 9)),
            expense("3", 30.0, "Transportation", at(2024, 5, 12, 0)),
            expense("2", 500.0, "Accommodation", at(2024, 5, 11, 23)),
        ];
        let budget = RollingBudget::new(200.0, BudgetPeriod::Weekly);

        let report = BudgetService::rolling_report(&budget, &expenses, &clock);
        assert_eq!(report.period_start, at(2024, 5, 12, 0));
        assert_eq!(report.expense_count, 2);
        assert_eq!(report.total_spent, 60.0);
        assert_eq!(report.remaining, 140.0);
        assert_eq!(report.percentage_used, 30.0);
        assert_eq!(report.days_elapsed, 4);
        assert_eq!(report.days_in_period, 7);
        assert_eq!(report.daily_average, 15.0);
        assert_eq!(report.projected_spending, 105.0);
        assert_eq!(report.status, RollingStatus::WellWithin);
        assert!(!report.projected_over());
    }

    #[test]
    fn daily_rolling_report_uses_single_day() {
        let clock = FixedClock(at(2024, 5, 15, 18));
        let expenses = vec![
            expense("2", 45.0, "Food", at(2024, 5, 15, 7)),
            expense("1", 45.0, "Food", at(2024, 5, 14, 7)),
        ];
        let budget = RollingBudget::new(50.0, BudgetPeriod::Daily);
        let report = BudgetService::rolling_report(&budget, &expenses, &clock);
        assert_eq!(report.total_spent, 45.0);
        assert_eq!(report.days_elapsed, 1);
        assert_eq!(report.daily_average, 45.0);
        assert_eq!(report.projected_spending, 45.0);
        assert_eq!(report.status, RollingStatus::Approaching);
    }

    #[test]
    fn monthly_rolling_report_uses_calendar_month() {
        let clock = FixedClock(at(2024, 2, 10, 12));
        let expenses = vec![
            expense("2", 290.0, "Accommodation", at(2024, 2, 1, 0)),
            expense("1", 70.0, "Food", at(2024, 1, 31, 23)),
        ];
        let budget = RollingBudget::new(290.0, BudgetPeriod::Monthly);
        let report = BudgetService::rolling_report(&budget, &expenses, &clock);
        assert_eq!(report.period_start, at(2024, 2, 1, 0));
        assert_eq!(report.days_in_period, 29);
        assert_eq!(report.days_elapsed, 10);
        assert_eq!(report.daily_average, 29.0);
        assert_eq!(report.projected_spending, 841.0);
        assert!(report.is_exceeded());
        assert!(report.projected_over());
    }

    #[test]
    fn rolling_budget_requires_positive_amount() {
        assert!(BudgetService::rolling_budget(0.0, BudgetPeriod::Daily).is_err());
        assert!(BudgetService::rolling_budget(-3.0, BudgetPeriod::Daily).is_err());
        assert_eq!(
            BudgetService::rolling_budget(10.0, BudgetPeriod::Weekly).unwrap(),
            RollingBudget::new(10.0, BudgetPeriod::Weekly)
        );
    }
}
