pub mod budget;
pub mod config;
pub mod expense;
pub mod rolling;
pub mod settings;
pub mod summary;
pub mod system;

use tally_domain::Settings;

use crate::cli::core::{CommandError, CommandResult};
use crate::cli::registry::{closest_match, CommandRegistry};

pub fn register_all(registry: &mut CommandRegistry) {
    for entry in system::definitions()
        .into_iter()
        .chain(expense::definitions())
        .chain(budget::definitions())
        .chain(rolling::definitions())
        .chain(settings::definitions())
        .chain(summary::definitions())
        .chain(config::definitions())
    {
        registry.register(entry);
    }
}

/// Splits `args` into a lowercased subcommand and the remaining arguments.
pub(crate) fn split_subcommand<'a, 'b>(
    args: &'a [&'b str],
    usage: &str,
) -> Result<(String, &'a [&'b str]), CommandError> {
    match args.split_first() {
        Some((sub, rest)) => Ok((sub.to_ascii_lowercase(), rest)),
        None => Err(CommandError::usage(usage)),
    }
}

pub(crate) fn parse_positive(raw: &str, what: &str) -> Result<f64, CommandError> {
    crate::cli::forms::parse_amount(raw)
        .map_err(|err| CommandError::InvalidArguments(format!("invalid {what}: {err}")))
}

pub(crate) fn parse_count(raw: &str) -> Result<usize, CommandError> {
    raw.trim()
        .parse::<usize>()
        .ok()
        .filter(|count| *count > 0)
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!("`{raw}` is not a positive whole number"))
        })
}

/// Rejects a category missing from settings, suggesting the nearest configured name.
pub(crate) fn ensure_category(settings: &Settings, name: &str) -> CommandResult {
    let name = name.trim();
    if settings.has_category(name) {
        return Ok(());
    }
    let mut message = format!("unknown category `{name}`");
    if let Some(best) = closest_match(name, settings.categories.iter().map(String::as_str)) {
        message.push_str(&format!(". Did you mean `{best}`?"));
    }
    Err(CommandError::InvalidArguments(message))
}
