use tally_domain::{FeatureToggle, Settings};
use tracing::debug;

/// Mutators for [`Settings`].
///
/// Every operation reports whether anything changed. Rejected input is a
/// silent no-op rather than an error.
pub struct SettingsService;

impl SettingsService {
    pub fn add_category(settings: &mut Settings, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || settings.has_category(name) {
            return false;
        }
        settings.categories.push(name.to_string());
        debug!(category = name, "category added");
        true
    }

    /// Removes `name` from the category list. Existing expenses keep it.
    pub fn remove_category(settings: &mut Settings, name: &str) -> bool {
        let before = settings.categories.len();
        settings.categories.retain(|category| category != name);
        let removed = settings.categories.len() != before;
        if removed {
            debug!(category = name, "category removed");
        }
        removed
    }

    pub fn add_currency(settings: &mut Settings, code: &str) -> bool {
        let code = normalize_currency(code);
        if code.is_empty() || settings.has_currency(&code) {
            return false;
        }
        debug!(currency = %code, "currency added");
        settings.currencies.push(code);
        true
    }

    /// Refuses to drop the default currency or the last remaining one.
    pub fn remove_currency(settings: &mut Settings, code: &str) -> bool {
        if code == settings.default_currency || settings.currencies.len() <= 1 {
            return false;
        }
        let before = settings.currencies.len();
        settings.currencies.retain(|currency| currency != code);
        let removed = settings.currencies.len() != before;
        if removed {
            debug!(currency = code, "currency removed");
        }
        removed
    }

    pub fn set_default_currency(settings: &mut Settings, code: &str) -> bool {
        let code = normalize_currency(code);
        if !settings.has_currency(&code) || settings.default_currency == code {
            return false;
        }
        debug!(currency = %code, "default currency changed");
        settings.default_currency = code;
        true
    }

    pub fn reset_categories_to_default(settings: &mut Settings) -> bool {
        let defaults = Settings::default_categories();
        if settings.categories == defaults {
            return false;
        }
        settings.categories = defaults;
        debug!("categories reset to built-in list");
        true
    }

    pub fn set_toggle(settings: &mut Settings, toggle: FeatureToggle, enabled: bool) -> bool {
        let slot = match toggle {
            FeatureToggle::BudgetAlerts => &mut settings.budget_alerts,
            FeatureToggle::OfflineMode => &mut settings.offline_mode,
            FeatureToggle::VoiceInput => &mut settings.voice_input,
        };
        if *slot == enabled {
            return false;
        }
        *slot = enabled;
        debug!(toggle = %toggle, enabled, "feature toggled");
        true
    }
}

fn normalize_currency(code: &str) -> String {
    code.trim().to_uppercase()
}
