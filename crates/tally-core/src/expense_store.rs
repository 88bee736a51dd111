//! Ordered, newest-first collection of recorded expenses.

use tally_domain::{is_image_data_url, Expense, NewExpense};
use tracing::debug;

use crate::{Clock, CoreError};

/// Owns the expense list. Iteration order is reverse insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseStore {
    records: Vec<Expense>,
}

impl ExpenseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps records already in newest-first order, as loaded from storage.
    pub fn from_records(records: Vec<Expense>) -> Self {
        Self { records }
    }

    /// Validates `input`, assigns a fresh id and prepends the new record.
    pub fn add(&mut self, input: NewExpense, clock: &dyn Clock) -> Result<&Expense, CoreError> {
        let input = validate(input)?;
        let id = self.next_id(clock);
        debug!(id = %id, category = %input.category, amount = input.amount, "adding expense");
        self.records.insert(0, Expense::from_new(id, input));
        Ok(&self.records[0])
    }

    /// Removes the record with `id`. Returns `false` when nothing matched.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|expense| expense.id != id);
        let removed = self.records.len() != before;
        if removed {
            debug!(id, "deleted expense");
        }
        removed
    }

    pub fn get(&self, id: &str) -> Option<&Expense> {
        self.records.iter().find(|expense| expense.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Expense> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[Expense] {
        &self.records
    }

    /// The `count` most recently added records.
    pub fn recent(&self, count: usize) -> &[Expense] {
        &self.records[..count.min(self.records.len())]
    }

    /// Ids are epoch milliseconds of creation, bumped past any existing id.
    fn next_id(&self, clock: &dyn Clock) -> String {
        let mut candidate = clock.now().timestamp_millis();
        let newest = self
            .records
            .iter()
            .filter_map(|expense| expense.id.parse::<i64>().ok())
            .max();
        if let Some(newest) = newest {
            if candidate <= newest {
                candidate = newest + 1;
            }
        }
        let mut id = candidate.to_string();
        while self.get(&id).is_some() {
            candidate += 1;
            id = candidate.to_string();
        }
        id
    }
}

fn validate(mut input: NewExpense) -> Result<NewExpense, CoreError> {
    if !input.amount.is_finite() || input.amount <= 0.0 {
        return Err(CoreError::Validation(
            "amount must be a positive number".into(),
        ));
    }
    if input.category.trim().is_empty() {
        return Err(CoreError::Validation("category is required".into()));
    }
    if input.description.trim().is_empty() {
        return Err(CoreError::Validation("description is required".into()));
    }
    if input
        .location
        .as_deref()
        .map(|location| location.trim().is_empty())
        .unwrap_or(false)
    {
        input.location = None;
    }
    if let Some(receipt) = input.receipt.as_deref() {
        if !is_image_data_url(receipt) {
            return Err(CoreError::Validation(
                "receipt must be an image data URL".into(),
            ));
        }
    }
    Ok(input)
}
