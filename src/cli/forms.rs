//! Expense entry: `key=value` argument parsing for scripts and a prompt wizard
//! for interactive sessions.

use chrono::{DateTime, Utc};
use dialoguer::{theme::ColorfulTheme, Input};
use tally_domain::{format_coordinates, parse_timestamp, NewExpense, PaymentMethod, Settings};

use crate::cli::core::CommandError;
use crate::cli::io;

pub const EXPENSE_KEYS: &[&str] = &[
    "amount",
    "category",
    "description",
    "currency",
    "date",
    "location",
    "coords",
    "receipt",
    "payment",
];

const PAYMENT_CHOICES: [PaymentMethod; 4] = [
    PaymentMethod::Cash,
    PaymentMethod::Card,
    PaymentMethod::Digital,
    PaymentMethod::Bank,
];

pub fn parse_amount(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("`{}` is not a number", raw.trim()))?;
    if !value.is_finite() || value <= 0.0 {
        return Err("amount must be greater than zero".into());
    }
    Ok(value)
}

pub fn parse_date(raw: &str) -> Result<DateTime<Utc>, CommandError> {
    parse_timestamp(raw.trim()).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "invalid date `{}` (use YYYY-MM-DD or RFC 3339)",
            raw
        ))
    })
}

/// Parses `lat,lon` into the stored location text.
pub fn parse_coordinates(raw: &str) -> Result<String, CommandError> {
    let invalid = || CommandError::InvalidArguments(format!("invalid coordinates `{raw}`"));
    let (lat, lon) = raw.split_once(',').ok_or_else(invalid)?;
    let latitude: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let longitude: f64 = lon.trim().parse().map_err(|_| invalid())?;
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(invalid());
    }
    Ok(format_coordinates(latitude, longitude))
}

/// Builds an expense from `key=value` arguments. `now` fills a missing date.
pub fn expense_from_args(args: &[&str], now: DateTime<Utc>) -> Result<NewExpense, CommandError> {
    let mut amount = None;
    let mut category = String::new();
    let mut description = String::new();
    let mut currency = String::new();
    let mut date = None;
    let mut location = None;
    let mut coords = None;
    let mut receipt = None;
    let mut payment = PaymentMethod::default();

    for arg in args {
        let (key, value) = arg.split_once('=').ok_or_else(|| {
            CommandError::InvalidArguments(format!("expected key=value, got `{arg}`"))
        })?;
        match key.trim().to_ascii_lowercase().as_str() {
            "amount" => amount = Some(parse_amount(value).map_err(CommandError::InvalidArguments)?),
            "category" => category = value.to_string(),
            "description" | "desc" => description = value.to_string(),
            "currency" => currency = value.to_string(),
            "date" => date = Some(parse_date(value)?),
            "location" => location = Some(value.to_string()),
            "coords" => coords = Some(parse_coordinates(value)?),
            "receipt" => receipt = Some(value.to_string()),
            "payment" => payment = PaymentMethod::parse(value),
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown field `{other}` (expected one of: {})",
                    EXPENSE_KEYS.join(", ")
                )))
            }
        }
    }

    let amount =
        amount.ok_or_else(|| CommandError::InvalidArguments("amount is required".into()))?;
    let mut input = NewExpense::new(amount, category, description, date.unwrap_or(now))
        .with_currency(currency)
        .with_payment_method(payment);
    if let Some(location) = coords.or(location) {
        input = input.with_location(location);
    }
    if let Some(receipt) = receipt {
        input = input.with_receipt(receipt);
    }
    Ok(input)
}

/// Asks for each expense field in turn. Returns `None` when the user declines to save.
pub fn run_expense_wizard(
    theme: &ColorfulTheme,
    settings: &Settings,
    now: DateTime<Utc>,
) -> Result<Option<NewExpense>, CommandError> {
    let amount_text: String = Input::with_theme(theme)
        .with_prompt("Amount")
        .validate_with(|value: &String| parse_amount(value).map(|_| ()))
        .interact_text()?;
    let amount = parse_amount(&amount_text).map_err(CommandError::InvalidArguments)?;

    let default_currency = settings
        .currencies
        .iter()
        .position(|code| *code == settings.default_currency)
        .unwrap_or(0);
    let currency_idx = io::prompt_select(theme, "Currency", &settings.currencies, default_currency)?;
    let currency = settings.currencies[currency_idx].clone();

    if settings.categories.is_empty() {
        return Err(CommandError::Message(
            "no categories configured; add one with `settings category add <name>`".into(),
        ));
    }
    let category_idx = io::prompt_select(theme, "Category", &settings.categories, 0)?;
    let category = settings.categories[category_idx].clone();

    let description: String = Input::with_theme(theme)
        .with_prompt("Description")
        .validate_with(|value: &String| {
            if value.trim().is_empty() {
                Err("description is required")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let today = now.format("%Y-%m-%d").to_string();
    let date_text = io::prompt_text(theme, "Date (YYYY-MM-DD)", Some(&today))?;
    let date = if date_text.trim() == today {
        now
    } else {
        parse_date(&date_text)?
    };

    let location = io::prompt_text(theme, "Location (optional)", Some(""))?;

    let labels: Vec<String> = PAYMENT_CHOICES.iter().map(|m| m.to_string()).collect();
    let payment_idx = io::prompt_select(theme, "Payment method", &labels, 0)?;

    let mut input = NewExpense::new(amount, category, description, date)
        .with_currency(currency)
        .with_payment_method(PAYMENT_CHOICES[payment_idx].clone());
    if !location.trim().is_empty() {
        input = input.with_location(location.trim());
    }

    if io::confirm_action(theme, "Save this expense?", true)? {
        Ok(Some(input))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 1, 14, 30, 0).unwrap()
    }

    #[test]
    fn parses_full_argument_set() {
        let input = expense_from_args(
            &[
                "amount=18.75",
                "category=Food & Dining",
                "description=Dal bhat",
                "currency=eur",
                "date=2024-08-30",
                "coords=27.7172,85.324",
                "payment=card",
            ],
            now(),
        )
        .unwrap();

        assert_eq!(input.amount, 18.75);
        assert_eq!(input.category, "Food & Dining");
        assert_eq!(input.currency, "eur");
        assert_eq!(input.date, Utc.with_ymd_and_hms(2024, 8, 30, 0, 0, 0).unwrap());
        assert_eq!(input.location.as_deref(), Some("27.717200, 85.324000"));
        assert_eq!(input.payment_method, PaymentMethod::Card);
    }

    #[test]
    fn missing_date_uses_now_and_currency_stays_blank() {
        let input =
            expense_from_args(&["amount=3", "category=Other", "description=Tip"], now()).unwrap();
        assert_eq!(input.date, now());
        assert!(input.currency.is_empty());
        assert_eq!(input.payment_method, PaymentMethod::Cash);
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(expense_from_args(&["category=Other"], now()).is_err());
        assert!(expense_from_args(&["amount=-4"], now()).is_err());
        assert!(expense_from_args(&["amount=4", "colour=red"], now()).is_err());
        assert!(expense_from_args(&["amount"], now()).is_err());
        assert!(expense_from_args(&["amount=4", "date=yesterday"], now()).is_err());
        assert!(expense_from_args(&["amount=4", "coords=91,10"], now()).is_err());
    }

    #[test]
    fn amount_parsing() {
        assert_eq!(parse_amount(" 12.5 "), Ok(12.5));
        assert!(parse_amount("0").is_err());
        assert!(parse_amount("NaN").is_err());
        assert!(parse_amount("ten").is_err());
    }
}
