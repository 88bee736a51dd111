use std::collections::HashMap;

use tally_domain::Expense;

use crate::{Clock, ExpenseStore};

/// Total spent in one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
    pub count: usize,
}

/// Headline numbers for the dashboard view.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub total_spent: f64,
    pub today_spent: f64,
    pub expense_count: usize,
    /// Largest total first; equal totals are ordered by name.
    pub category_totals: Vec<CategoryTotal>,
    pub recent: Vec<Expense>,
}

impl DashboardSummary {
    pub fn top_category(&self) -> Option<&CategoryTotal> {
        self.category_totals.first()
    }
}

pub struct SummaryService;

impl SummaryService {
    pub fn dashboard(store: &ExpenseStore, clock: &dyn Clock, recent: usize) -> DashboardSummary {
        let expenses = store.as_slice();
        let today = clock.today();
        let total_spent = expenses.iter().map(|expense| expense.amount).sum();
        let today_spent = expenses
            .iter()
            .filter(|expense| expense.date.date_naive() == today)
            .map(|expense| expense.amount)
            .sum();

        DashboardSummary {
            total_spent,
            today_spent,
            expense_count: expenses.len(),
            category_totals: Self::category_totals(expenses),
            recent: store.recent(recent).to_vec(),
        }
    }

    pub fn category_totals(expenses: &[Expense]) -> Vec<CategoryTotal> {
        let mut grouped: HashMap<&str, (f64, usize)> = HashMap::new();
        for expense in expenses {
            let entry = grouped.entry(expense.category.as_str()).or_default();
            entry.0 += expense.amount;
            entry.1 += 1;
        }
        let mut totals: Vec<CategoryTotal> = grouped
            .into_iter()
            .map(|(category, (amount, count))| CategoryTotal {
                category: category.to_string(),
                amount,
                count,
            })
            .collect();
        totals.sort_by(|a, b| {
            b.amount
                .total_cmp(&a.amount)
                .then_with(|| a.category.cmp(&b.category))
        });
        totals
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use tally_domain::NewExpense;

    use super::*;
    use crate::FixedClock;

    fn expense(id: &str, amount: f64, category: &str, day: u32, hour: u32) -> Expense {
        let date = Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap();
        Expense::from_new(
            id,
            NewExpense::new(amount, category, "item", date).with_currency("USD"),
        )
    }

    #[test]
    fn dashboard_totals_and_today() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 3, 10, 18, 0, 0).unwrap());
        let store = ExpenseStore::from_records(vec![
            expense("4", 12.0, "Food & Dining", 10, 23),
            expense("3", 30.0, "Transportation", 10, 0),
            expense("2", 18.0, "Food & Dining", 9, 23),
            expense("1", 5.0, "Other", 2, 9),
        ]);
        let summary = SummaryService::dashboard(&store, &clock, 2);

        assert_eq!(summary.total_spent, 65.0);
        assert_eq!(summary.today_spent, 42.0);
        assert_eq!(summary.expense_count, 4);
        assert_eq!(summary.recent.len(), 2);
        assert_eq!(summary.recent[0].id, "4");

        let top = summary.top_category().unwrap();
        assert_eq!(top.category, "Food & Dining");
        assert_eq!(top.amount, 30.0);
        assert_eq!(top.count, 2);
    }

    #[test]
    fn equal_totals_are_ordered_by_name() {
        let expenses = vec![
            expense("2", 10.0, "Medical", 1, 8),
            expense("1", 10.0, "Activities", 1, 9),
        ];
        let totals = SummaryService::category_totals(&expenses);
        let names: Vec<_> = totals.iter().map(|t| t.category.as_str()).collect();
        assert_eq!(names, vec!["Activities", "Medical"]);
    }

    #[test]
    fn empty_dashboard() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap());
        let summary = SummaryService::dashboard(&ExpenseStore::new(), &clock, 5);
        assert_eq!(summary.total_spent, 0.0);
        assert!(summary.top_category().is_none());
        assert!(summary.recent.is_empty());
    }
}
