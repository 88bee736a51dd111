//! Budget definitions and the reports derived from them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::*;

/// Spending ratio at which a category budget is flagged as near its limit.
pub const NEAR_LIMIT_RATIO: f64 = 0.8;

/// Percentage thresholds used by [`RollingStatus::classify`].
pub const ROLLING_EXCEEDED_PERCENT: f64 = 100.0;
pub const ROLLING_APPROACHING_PERCENT: f64 = 80.0;
pub const ROLLING_ON_TRACK_PERCENT: f64 = 60.0;

/// Spending limit attached to a single category.
///
/// Spending is never stored here; it is derived from the expense list each time
/// a report is built. A `spent` field left over in older documents is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBudget {
    pub category: String,
    pub limit: f64,
    pub currency: String,
}

impl CategoryBudget {
    pub fn new(category: impl Into<String>, limit: f64, currency: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            limit,
            currency: currency.into(),
        }
    }
}

impl Categorized for CategoryBudget {
    fn category(&self) -> &str {
        &self.category
    }
}

/// A single budget applied across every expense inside a rolling period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollingBudget {
    pub amount: f64,
    #[serde(default)]
    pub period: BudgetPeriod,
}

impl RollingBudget {
    pub fn new(amount: f64, period: BudgetPeriod) -> Self {
        Self { amount, period }
    }
}

/// Percentage of `limit` consumed by `spent`, unclamped.
///
/// A non-positive limit reads as fully used once anything is spent.
pub fn utilization_percent(spent: f64, limit: f64) -> f64 {
    if limit > f64::EPSILON {
        spent / limit * 100.0
    } else if spent > f64::EPSILON {
        100.0
    } else {
        0.0
    }
}

/// Health of a per-category budget, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BudgetStatus {
    OnTrack,
    NearLimit,
    OverBudget,
}

impl BudgetStatus {
    pub fn classify(spent: f64, limit: f64) -> Self {
        if spent > limit {
            BudgetStatus::OverBudget
        } else if limit > f64::EPSILON && spent / limit >= NEAR_LIMIT_RATIO {
            BudgetStatus::NearLimit
        } else {
            BudgetStatus::OnTrack
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BudgetStatus::OnTrack => "On Track",
            BudgetStatus::NearLimit => "Near Limit",
            BudgetStatus::OverBudget => "Over Budget",
        };
        f.write_str(label)
    }
}

/// Health of a rolling budget, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RollingStatus {
    WellWithin,
    OnTrack,
    Approaching,
    Exceeded,
}

impl RollingStatus {
    pub fn classify(percentage_used: f64) -> Self {
        if percentage_used >= ROLLING_EXCEEDED_PERCENT {
            RollingStatus::Exceeded
        } else if percentage_used >= ROLLING_APPROACHING_PERCENT {
            RollingStatus::Approaching
        } else if percentage_used >= ROLLING_ON_TRACK_PERCENT {
            RollingStatus::OnTrack
        } else {
            RollingStatus::WellWithin
        }
    }
}

impl fmt::Display for RollingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RollingStatus::WellWithin => "Well Within Budget",
            RollingStatus::OnTrack => "On Track",
            RollingStatus::Approaching => "Approaching Limit",
            RollingStatus::Exceeded => "Budget Exceeded",
        };
        f.write_str(label)
    }
}

/// Spending measured against one category budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBudgetReport {
    pub category: String,
    pub currency: String,
    pub limit: f64,
    pub spent: f64,
    /// `limit - spent`; negative when over budget.
    pub remaining: f64,
    /// Display percentage, clamped to 100.
    pub percentage: f64,
    /// Unclamped utilization percentage.
    pub utilization: f64,
    pub status: BudgetStatus,
}

impl CategoryBudgetReport {
    pub fn from_budget(budget: &CategoryBudget, spent: f64) -> Self {
        let utilization = utilization_percent(spent, budget.limit);
        Self {
            category: budget.category.clone(),
            currency: budget.currency.clone(),
            limit: budget.limit,
            spent,
            remaining: budget.limit - spent,
            percentage: utilization.min(100.0),
            utilization,
            status: BudgetStatus::classify(spent, budget.limit),
        }
    }

    pub fn is_over(&self) -> bool {
        self.status == BudgetStatus::OverBudget
    }

    /// Amount spent beyond the limit, zero when within budget.
    pub fn over_by(&self) -> f64 {
        (self.spent - self.limit).max(0.0)
    }
}

/// Totals across every category budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetOverview {
    pub total_budget: f64,
    pub total_spent: f64,
    pub remaining: f64,
    pub over_budget_count: usize,
}

/// Spending measured against the rolling budget for its current period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingBudgetReport {
    pub budget: RollingBudget,
    pub period_start: DateTime<Utc>,
    pub expense_count: usize,
    pub total_spent: f64,
    pub remaining: f64,
    pub percentage_used: f64,
    pub days_elapsed: u32,
    pub days_in_period: u32,
    pub daily_average: f64,
    pub projected_spending: f64,
    pub status: RollingStatus,
}

impl RollingBudgetReport {
    pub fn is_exceeded(&self) -> bool {
        self.status == RollingStatus::Exceeded
    }

    /// Whether the projected period total overshoots the budget.
    pub fn projected_over(&self) -> bool {
        self.projected_spending > self.budget.amount
    }
}
