//! Domain models for recorded expenses.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{de::Deserializer, Deserialize, Serialize, Serializer};

use crate::common::*;

/// A single recorded spending event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub amount: f64,
    pub currency: String,
    pub category: String,
    pub description: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Receipt image encoded as a `data:image/...` URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<String>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

impl Expense {
    /// Materializes a submitted expense under the given identifier.
    pub fn from_new(id: impl Into<String>, input: NewExpense) -> Self {
        Self {
            id: id.into(),
            amount: input.amount,
            currency: input.currency,
            category: input.category,
            description: input.description,
            date: input.date,
            location: input.location,
            receipt: input.receipt,
            payment_method: input.payment_method,
        }
    }

    pub fn has_receipt(&self) -> bool {
        self.receipt.is_some()
    }
}

impl Amounted for Expense {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Categorized for Expense {
    fn category(&self) -> &str {
        &self.category
    }
}

impl Displayable for Expense {
    fn display_label(&self) -> String {
        format!(
            "{} ({} {:.2}, {})",
            self.description, self.currency, self.amount, self.category
        )
    }
}

/// User-submitted expense data prior to id assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub amount: f64,
    pub currency: String,
    pub category: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    pub receipt: Option<String>,
    pub payment_method: PaymentMethod,
}

impl NewExpense {
    pub fn new(
        amount: f64,
        category: impl Into<String>,
        description: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            amount,
            currency: String::new(),
            category: category.into(),
            description: description.into(),
            date,
            location: None,
            receipt: None,
            payment_method: PaymentMethod::default(),
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_receipt(mut self, receipt: impl Into<String>) -> Self {
        self.receipt = Some(receipt.into());
        self
    }

    pub fn with_payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = method;
        self
    }
}

/// How an expense was paid. Unknown stored values survive as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Digital,
    Bank,
    Other(String),
}

impl PaymentMethod {
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" | "cash" => PaymentMethod::Cash,
            "card" => PaymentMethod::Card,
            "digital" => PaymentMethod::Digital,
            "bank" => PaymentMethod::Bank,
            _ => PaymentMethod::Other(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Digital => "digital",
            PaymentMethod::Bank => "bank",
            PaymentMethod::Other(value) => value,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Credit/Debit Card",
            PaymentMethod::Digital => "Digital Wallet",
            PaymentMethod::Bank => "Bank Transfer",
            PaymentMethod::Other(value) => value,
        };
        f.write_str(label)
    }
}

impl Serialize for PaymentMethod {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PaymentMethod {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value
            .map(|v| PaymentMethod::parse(&v))
            .unwrap_or_default())
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid expense date `{raw}`")))
}

/// Returns `true` for `data:image/<type>[;base64],<payload>` URLs.
pub fn is_image_data_url(value: &str) -> bool {
    value
        .strip_prefix("data:image/")
        .and_then(|rest| rest.split_once(','))
        .map(|(media, _)| !media.is_empty())
        .unwrap_or(false)
}

/// Renders a coordinate pair with six decimal places.
pub fn format_coordinates(latitude: f64, longitude: f64) -> String {
    format!("{latitude:.6}, {longitude:.6}")
}
