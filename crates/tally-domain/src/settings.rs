//! User-facing application settings.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::common::ParseValueError;

pub const DEFAULT_CATEGORIES: [&str; 9] = [
    "Transportation",
    "Accommodation",
    "Food & Dining",
    "Religious Donations",
    "Souvenirs & Gifts",
    "Medical",
    "Communication",
    "Activities",
    "Other",
];

pub const DEFAULT_CURRENCIES: [&str; 10] = [
    "USD", "EUR", "GBP", "JPY", "AUD", "CAD", "CHF", "CNY", "INR", "SGD",
];

pub const DEFAULT_CURRENCY: &str = "USD";

/// Currency, category and feature preferences.
///
/// Invariants: `currencies` is never empty and contains `default_currency`.
/// Missing fields in a stored document fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub default_currency: String,
    pub budget_alerts: bool,
    pub offline_mode: bool,
    pub voice_input: bool,
    pub categories: Vec<String>,
    pub currencies: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_currency: DEFAULT_CURRENCY.into(),
            budget_alerts: true,
            offline_mode: true,
            voice_input: true,
            categories: Self::default_categories(),
            currencies: Self::default_currencies(),
        }
    }
}

impl Settings {
    pub fn default_categories() -> Vec<String> {
        DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
    }

    pub fn default_currencies() -> Vec<String> {
        DEFAULT_CURRENCIES.iter().map(|c| c.to_string()).collect()
    }

    pub fn has_category(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c == name)
    }

    pub fn has_currency(&self, code: &str) -> bool {
        self.currencies.iter().any(|c| c == code)
    }

    pub fn toggle(&self, toggle: FeatureToggle) -> bool {
        match toggle {
            FeatureToggle::BudgetAlerts => self.budget_alerts,
            FeatureToggle::OfflineMode => self.offline_mode,
            FeatureToggle::VoiceInput => self.voice_input,
        }
    }

    /// Restores the currency invariants after loading untrusted data.
    ///
    /// Returns a note for each repair performed.
    pub fn repair(&mut self) -> Vec<String> {
        let mut notes = Vec::new();
        if self.currencies.is_empty() {
            self.currencies = Self::default_currencies();
            notes.push("currency list was empty; restored built-in currencies".to_string());
        }
        if self.default_currency.trim().is_empty() {
            self.default_currency = self.currencies[0].clone();
            notes.push(format!(
                "default currency was blank; using {}",
                self.default_currency
            ));
        }
        if !self.has_currency(&self.default_currency) {
            self.currencies.push(self.default_currency.clone());
            notes.push(format!(
                "default currency {} was missing from the currency list; added it",
                self.default_currency
            ));
        }
        notes
    }
}

/// Boolean feature switches stored in [`Settings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureToggle {
    BudgetAlerts,
    OfflineMode,
    VoiceInput,
}

impl FeatureToggle {
    pub const ALL: [FeatureToggle; 3] = [
        FeatureToggle::BudgetAlerts,
        FeatureToggle::OfflineMode,
        FeatureToggle::VoiceInput,
    ];
}

impl fmt::Display for FeatureToggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FeatureToggle::BudgetAlerts => "Budget alerts",
            FeatureToggle::OfflineMode => "Offline mode",
            FeatureToggle::VoiceInput => "Voice input",
        };
        f.write_str(label)
    }
}

impl FromStr for FeatureToggle {
    type Err = ParseValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "alerts" | "budget-alerts" | "budget_alerts" => Ok(FeatureToggle::BudgetAlerts),
            "offline" | "offline-mode" | "offline_mode" => Ok(FeatureToggle::OfflineMode),
            "voice" | "voice-input" | "voice_input" => Ok(FeatureToggle::VoiceInput),
            other => Err(ParseValueError::new("feature toggle", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_documents_merge_over_defaults() {
        let json = r#"{"defaultCurrency":"EUR","voiceInput":false}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.default_currency, "EUR");
        assert!(!settings.voice_input);
        assert!(settings.budget_alerts);
        assert_eq!(settings.categories.len(), DEFAULT_CATEGORIES.len());
    }

    #[test]
    fn repair_restores_currency_invariants() {
        let mut settings = Settings {
            default_currency: "NPR".into(),
            currencies: Vec::new(),
            ..Settings::default()
        };
        let notes = settings.repair();
        assert_eq!(notes.len(), 2);
        assert!(settings.has_currency("USD"));
        assert!(settings.has_currency("NPR"));
    }

    #[test]
    fn repair_is_silent_for_valid_settings() {
        let mut settings = Settings::default();
        assert!(settings.repair().is_empty());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn toggles_parse_from_short_names() {
        assert_eq!("alerts".parse(), Ok(FeatureToggle::BudgetAlerts));
        assert_eq!("Voice".parse(), Ok(FeatureToggle::VoiceInput));
        assert!("sync".parse::<FeatureToggle>().is_err());
    }
}
