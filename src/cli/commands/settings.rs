use tally_core::SettingsService;
use tally_domain::FeatureToggle;

use crate::cli::commands::split_subcommand;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::formatters::on_off;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;

const USAGE: &str = "settings show
settings category <add|remove> <name>
settings category reset
settings currency <add|remove> <code>
settings currency default <code>
settings toggle <alerts|offline|voice> <on|off>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "settings",
        "Manage categories, currencies and feature toggles",
        USAGE,
        cmd_settings,
    )]
}

fn cmd_settings(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return show(context);
    }
    let (sub, rest) = split_subcommand(args, "settings <show|category|currency|toggle>")?;
    match sub.as_str() {
        "show" => show(context),
        "category" | "categories" => category(context, rest),
        "currency" | "currencies" => currency(context, rest),
        "default-currency" => set_default_currency(context, rest),
        "reset-categories" => reset_categories(context),
        "toggle" => toggle(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown settings subcommand `{other}`. Available: show, category, currency, toggle"
        ))),
    }
}

fn show(context: &mut ShellContext) -> CommandResult {
    let settings = context.manager.settings();
    output_section("Settings");
    io::print_info(format!("  Default currency : {}", settings.default_currency));
    io::print_info(format!("  Currencies       : {}", settings.currencies.join(", ")));
    for toggle in FeatureToggle::ALL {
        io::print_info(format!(
            "  {:<16} : {}",
            toggle.to_string(),
            on_off(settings.toggle(toggle))
        ));
    }
    io::print_info(format!("  Categories ({}):", settings.categories.len()));
    for name in &settings.categories {
        io::print_info(format!("    - {name}"));
    }
    Ok(())
}

fn category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_subcommand(args, "settings category <add|remove|reset> [name]")?;
    if action == "reset" {
        return reset_categories(context);
    }
    let name = rest.join(" ");
    let name = name.trim();
    if name.is_empty() {
        return Err(CommandError::usage("settings category <add|remove> <name>"));
    }

    match action.as_str() {
        "add" => {
            if !context
                .manager
                .update_settings(|settings| SettingsService::add_category(settings, name))
            {
                io::print_warning(format!("Category `{name}` already exists."));
                return Ok(());
            }
            context.manager.save_settings()?;
            io::print_success(format!("Added category {name}."));
        }
        "remove" | "rm" => {
            if !context
                .manager
                .update_settings(|settings| SettingsService::remove_category(settings, name))
            {
                io::print_warning(format!("No category named `{name}`."));
                return Ok(());
            }
            context.manager.save_settings()?;
            io::print_success(format!("Removed category {name}."));
            if context.manager.budgets().iter().any(|b| b.category == name) {
                io::print_hint(format!(
                    "A budget for {name} still exists; remove it with `budget remove \"{name}\"`."
                ));
            }
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown category action `{other}` (expected add, remove or reset)"
            )))
        }
    }
    Ok(())
}

fn reset_categories(context: &mut ShellContext) -> CommandResult {
    if context.can_prompt()
        && !io::confirm_action(
            context.theme(),
            "Replace the category list with the built-in defaults?",
            false,
        )?
    {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    if !context
        .manager
        .update_settings(SettingsService::reset_categories_to_default)
    {
        io::print_info("Categories already match the defaults.");
        return Ok(());
    }
    context.manager.save_settings()?;
    io::print_success("Categories reset to defaults.");
    Ok(())
}

fn currency(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [action, code] = args else {
        return Err(CommandError::usage(
            "settings currency <add|remove|default> <code>",
        ));
    };
    let code = code.trim().to_uppercase();
    match action.to_ascii_lowercase().as_str() {
        "add" => {
            if !context
                .manager
                .update_settings(|settings| SettingsService::add_currency(settings, &code))
            {
                io::print_warning(format!("Currency `{code}` is already available."));
                return Ok(());
            }
            context.manager.save_settings()?;
            io::print_success(format!("Added currency {code}."));
        }
        "remove" | "rm" => {
            let settings = context.manager.settings();
            if code == settings.default_currency {
                return Err(CommandError::InvalidArguments(format!(
                    "{code} is the default currency; choose another default first"
                )));
            }
            if !settings.has_currency(&code) {
                io::print_warning(format!("Currency `{code}` is not configured."));
                return Ok(());
            }
            if !context
                .manager
                .update_settings(|settings| SettingsService::remove_currency(settings, &code))
            {
                return Err(CommandError::InvalidArguments(
                    "at least one currency must remain".into(),
                ));
            }
            context.manager.save_settings()?;
            io::print_success(format!("Removed currency {code}."));
        }
        "default" => return apply_default_currency(context, &code),
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown currency action `{other}` (expected add, remove or default)"
            )))
        }
    }
    Ok(())
}

fn set_default_currency(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let code = args
        .first()
        .ok_or_else(|| CommandError::usage("settings default-currency <code>"))?;
    apply_default_currency(context, &code.trim().to_uppercase())
}

fn apply_default_currency(context: &mut ShellContext, code: &str) -> CommandResult {
    let settings = context.manager.settings();
    if !settings.has_currency(code) {
        return Err(CommandError::InvalidArguments(format!(
            "unknown currency `{code}`; add it with `settings currency add {code}`"
        )));
    }
    if settings.default_currency == code {
        io::print_info(format!("{code} is already the default currency."));
        return Ok(());
    }
    context
        .manager
        .update_settings(|settings| SettingsService::set_default_currency(settings, code));
    context.manager.save_settings()?;
    io::print_success(format!("Default currency set to {code}."));
    Ok(())
}

fn toggle(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [name, state] = args else {
        return Err(CommandError::usage(
            "settings toggle <alerts|offline|voice> <on|off>",
        ));
    };
    let toggle: FeatureToggle = name
        .parse()
        .map_err(|err| CommandError::InvalidArguments(format!("{err}")))?;
    let enabled = parse_switch(state)?;

    if context
        .manager
        .update_settings(|settings| SettingsService::set_toggle(settings, toggle, enabled))
    {
        context.manager.save_settings()?;
    }
    io::print_success(format!("{toggle} {}.", if enabled { "enabled" } else { "disabled" }));
    Ok(())
}

pub(crate) fn parse_switch(raw: &str) -> Result<bool, CommandError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "enable" | "enabled" => Ok(true),
        "off" | "false" | "no" | "disable" | "disabled" => Ok(false),
        other => Err(CommandError::InvalidArguments(format!(
            "expected on or off, got `{other}`"
        ))),
    }
}
