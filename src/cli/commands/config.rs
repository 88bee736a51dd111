use crate::cli::commands::settings::parse_switch;
use crate::cli::commands::{parse_count, split_subcommand};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::formatters::on_off;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;

const USAGE: &str = "config show
config set color <on|off>
config set recent <count>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Show or change shell preferences",
        USAGE,
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return show(context);
    }
    let (sub, rest) = split_subcommand(args, "config <show|set>")?;
    match sub.as_str() {
        "show" => show(context),
        "set" => set(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config subcommand `{other}`. Available: show, set"
        ))),
    }
}

fn show(context: &mut ShellContext) -> CommandResult {
    output_section("Configuration");
    io::print_info(format!(
        "  Config file  : {}",
        context.config_manager.config_path().display()
    ));
    io::print_info(format!("  Data dir     : {}", context.data_dir.display()));
    io::print_info(format!(
        "  Color output : {}",
        on_off(context.config.ui_color_enabled)
    ));
    io::print_info(format!("  Recent count : {}", context.config.recent_count));
    Ok(())
}

fn set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [key, value] = args else {
        return Err(CommandError::usage("config set <color|recent> <value>"));
    };
    match key.to_ascii_lowercase().as_str() {
        "color" | "colour" => {
            context.config.ui_color_enabled = parse_switch(value)?;
            context.persist_config()?;
            context.apply_output_preferences();
            io::print_success(format!(
                "Color output {}.",
                on_off(context.config.ui_color_enabled)
            ));
        }
        "recent" | "recent-count" => {
            let count = parse_count(value)?;
            context.config.set_recent_count(count)?;
            context.persist_config()?;
            io::print_success(format!("Dashboard will show {count} recent expense(s)."));
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown config key `{other}` (expected color or recent)"
            )))
        }
    }
    Ok(())
}
