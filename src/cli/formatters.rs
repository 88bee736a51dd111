//! Text rendering for amounts, dates and budget health.

use chrono::{DateTime, Utc};
use colored::Colorize;
use tally_domain::{BudgetStatus, RollingStatus};

const BAR_WIDTH: usize = 20;

/// Renders `amount` as `"USD 12.50"`.
pub fn money(amount: f64, currency: &str) -> String {
    if amount < 0.0 {
        format!("-{} {:.2}", currency, amount.abs())
    } else {
        format!("{} {:.2}", currency, amount)
    }
}

pub fn date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d").to_string()
}

pub fn date_time(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M UTC").to_string()
}

pub fn percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Fixed-width bar for a percentage clamped to 0..=100.
pub fn progress_bar(percentage: f64) -> String {
    let clamped = percentage.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}]",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled)
    )
}

pub fn budget_status(status: BudgetStatus) -> String {
    let label = status.to_string();
    match status {
        BudgetStatus::OnTrack => label.green().to_string(),
        BudgetStatus::NearLimit => label.yellow().to_string(),
        BudgetStatus::OverBudget => label.red().bold().to_string(),
    }
}

pub fn rolling_status(status: RollingStatus) -> String {
    let label = status.to_string();
    match status {
        RollingStatus::WellWithin => label.green().to_string(),
        RollingStatus::OnTrack => label.blue().to_string(),
        RollingStatus::Approaching => label.yellow().to_string(),
        RollingStatus::Exceeded => label.red().bold().to_string(),
    }
}

pub fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn money_keeps_sign_in_front() {
        assert_eq!(money(12.5, "USD"), "USD 12.50");
        assert_eq!(money(-20.0, "EUR"), "-EUR 20.00");
    }

    #[test]
    fn progress_bar_is_clamped() {
        assert_eq!(progress_bar(0.0), format!("[{}]", ".".repeat(20)));
        assert_eq!(progress_bar(150.0), format!("[{}]", "#".repeat(20)));
        assert_eq!(progress_bar(50.0), format!("[{}{}]", "#".repeat(10), ".".repeat(10)));
    }

    #[test]
    fn dates_render_in_utc() {
        let ts = Utc.with_ymd_and_hms(2024, 2, 29, 6, 5, 0).unwrap();
        assert_eq!(date(&ts), "2024-02-29");
        assert_eq!(date_time(&ts), "2024-02-29 06:05 UTC");
    }
}
