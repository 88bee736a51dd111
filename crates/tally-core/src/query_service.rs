//! Filtered, sorted projections of the expense list.

use std::{cmp::Ordering, fmt, str::FromStr};

use tally_domain::{Expense, ParseValueError};

/// Restricts a query to one category, or none.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Only the literal `all` (or nothing) selects every category, so a user
    /// category called `All` stays filterable.
    pub fn parse(value: &str) -> Self {
        if value.is_empty() || value == "all" {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(value.to_string())
        }
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => &expense.category == category,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Newest `date` first.
    #[default]
    Date,
    /// Largest amount first.
    Amount,
    /// Category name, ascending.
    Category,
}

impl SortKey {
    fn compare(self, a: &Expense, b: &Expense) -> Ordering {
        match self {
            SortKey::Date => b.date.cmp(&a.date),
            SortKey::Amount => b.amount.total_cmp(&a.amount),
            SortKey::Category => a.category.cmp(&b.category),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SortKey::Date => "date",
            SortKey::Amount => "amount",
            SortKey::Category => "category",
        };
        f.write_str(label)
    }
}

impl FromStr for SortKey {
    type Err = ParseValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "amount" => Ok(SortKey::Amount),
            "category" => Ok(SortKey::Category),
            other => Err(ParseValueError::new("sort key", other)),
        }
    }
}

/// Search term, category filter and sort key applied to an expense list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExpenseQuery {
    pub search: String,
    pub category: CategoryFilter,
    pub sort: SortKey,
}

impl ExpenseQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    pub fn category(mut self, filter: CategoryFilter) -> Self {
        self.category = filter;
        self
    }

    pub fn sort_by(mut self, key: SortKey) -> Self {
        self.sort = key;
        self
    }

    /// Case-insensitive substring match on description or category.
    pub fn matches_search(&self, expense: &Expense) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        expense.description.to_lowercase().contains(&needle)
            || expense.category.to_lowercase().contains(&needle)
    }

    /// Returns matching records in sort order. Ties keep their input order.
    pub fn apply<'a>(&self, expenses: &'a [Expense]) -> FilteredExpenses<'a> {
        let mut items: Vec<&'a Expense> = expenses
            .iter()
            .filter(|expense| self.matches_search(expense) && self.category.matches(expense))
            .collect();
        items.sort_by(|a, b| self.sort.compare(a, b));
        let total = items.iter().map(|expense| expense.amount).sum();
        FilteredExpenses { items, total }
    }
}

/// Result of [`ExpenseQuery::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredExpenses<'a> {
    pub items: Vec<&'a Expense>,
    pub total: f64,
}

impl FilteredExpenses<'_> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::{DateTime, TimeZone, Utc};
    use tally_domain::NewExpense;

    use super::*;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap()
    }

    fn expense(id: &str, amount: f64, category: &str, description: &str, day: u32) -> Expense {
        Expense::from_new(
            id,
            NewExpense::new(amount, category, description, at(day)).with_currency("USD"),
        )
    }

    fn sample() -> Vec<Expense> {
        vec![
            expense("5", 20.0, "Medical", "Altitude pills", 3),
            expense("4", 8.0, "Food & Dining", "Momo lunch", 5),
            expense("3", 20.0, "Transportation", "Bus to Pokhara", 1),
            expense("2", 60.0, "Accommodation", "Guest house", 5),
            expense("1", 4.5, "Food & Dining", "Masala tea", 2),
        ]
    }

    fn ids(result: &FilteredExpenses<'_>) -> Vec<String> {
        result.items.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn only_lowercase_all_means_every_category() {
        assert_eq!(CategoryFilter::parse("all"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse(""), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse("All"),
            CategoryFilter::Only("All".into())
        );

        let mut expenses = sample();
        expenses.push(expense("6", 2.0, "All", "Misc", 4));
        let result = ExpenseQuery::new()
            .category(CategoryFilter::parse("All"))
            .apply(&expenses);
        assert_eq!(ids(&result), vec!["6"]);
    }

    #[test]
    fn all_filter_returns_the_input_set() {
        let expenses = sample();
        let result = ExpenseQuery::new().apply(&expenses);
        let got: HashSet<_> = result.items.iter().map(|e| e.id.as_str()).collect();
        let want: HashSet<_> = expenses.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(got, want);
        assert_eq!(result.total, 112.5);
    }

    #[test]
    fn category_filter_is_exact() {
        let expenses = sample();
        let result = ExpenseQuery::new()
            .category(CategoryFilter::parse("Food & Dining"))
            .apply(&expenses);
        assert_eq!(result.len(), 2);
        assert!(result.items.iter().all(|e| e.category == "Food & Dining"));

        let partial = ExpenseQuery::new()
            .category(CategoryFilter::parse("Food"))
            .apply(&expenses);
        assert!(partial.is_empty());
    }

    #[test]
    fn search_matches_description_or_category_ignoring_case() {
        let expenses = sample();
        let by_description = ExpenseQuery::new().search("MOMO").apply(&expenses);
        assert_eq!(ids(&by_description), vec!["4"]);

        let by_category = ExpenseQuery::new().search("dining").apply(&expenses);
        assert_eq!(by_category.len(), 2);
    }

    #[test]
    fn date_sort_is_newest_first_and_stable() {
        let expenses = sample();
        let result = ExpenseQuery::new().apply(&expenses);
        // "4" and "2" share a date and keep their input order.
        assert_eq!(ids(&result), vec!["4", "2", "5", "1", "3"]);
    }

    #[test]
    fn amount_sort_is_descending_and_stable() {
        let expenses = sample();
        let result = ExpenseQuery::new().sort_by(SortKey::Amount).apply(&expenses);
        assert_eq!(ids(&result), vec!["2", "5", "3", "4", "1"]);
    }

    #[test]
    fn category_sort_is_ascending() {
        let expenses = sample();
        let result = ExpenseQuery::new()
            .sort_by(SortKey::Category)
            .apply(&expenses);
        assert_eq!(ids(&result), vec!["2", "4", "1", "5", "3"]);
    }

    #[test]
    fn sorting_is_idempotent() {
        let expenses = sample();
        for key in [SortKey::Amount, SortKey::Date] {
            let query = ExpenseQuery::new().sort_by(key);
            let once: Vec<Expense> = query.apply(&expenses).items.into_iter().cloned().collect();
            let twice: Vec<Expense> = query.apply(&once).items.into_iter().cloned().collect();
            assert_eq!(once, twice, "sort by {key} is not idempotent");
        }
    }

    #[test]
    fn source_list_is_untouched() {
        let expenses = sample();
        let snapshot = expenses.clone();
        let _ = ExpenseQuery::new().sort_by(SortKey::Amount).apply(&expenses);
        assert_eq!(expenses, snapshot);
    }
}
