use crate::cli::commands::{ensure_category, parse_positive, split_subcommand};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::formatters::{budget_status, money, percent, progress_bar};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};

const USAGE: &str = "budget set <category> <limit> [currency]
budget remove <category>
budget list
budget overview
budget alerts";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "budget",
        "Manage per-category spending limits",
        USAGE,
        cmd_budget,
    )]
}

fn cmd_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (sub, rest) = split_subcommand(args, "budget <set|remove|list|overview|alerts>")?;
    match sub.as_str() {
        "set" => set(context, rest),
        "remove" | "rm" | "delete" => remove(context, rest),
        "list" | "ls" => list(context),
        "overview" => overview(context),
        "alerts" => alerts(context),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown budget subcommand `{other}`. Available: set, remove, list, overview, alerts"
        ))),
    }
}

fn set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [category, limit, rest @ ..] = args else {
        return Err(CommandError::usage("budget set <category> <limit> [currency]"));
    };
    if rest.len() > 1 {
        return Err(CommandError::usage("budget set <category> <limit> [currency]"));
    }
    ensure_category(context.manager.settings(), category)?;
    let limit = parse_positive(limit, "limit")?;
    let currency = rest.first().copied();
    if let Some(code) = currency {
        if !context.manager.settings().has_currency(&code.to_uppercase()) {
            return Err(CommandError::InvalidArguments(format!(
                "unknown currency `{code}`; add it with `settings currency add {code}`"
            )));
        }
    }

    let budget = context.manager.upsert_budget(category, limit, currency)?;
    context.manager.save_budgets()?;
    io::print_success(format!(
        "Budget for {} set to {}.",
        budget.category,
        money(budget.limit, &budget.currency)
    ));
    if let Some(report) = context.manager.budget_report(&budget.category) {
        io::print_info(format!(
            "  Spent so far: {} ({})",
            money(report.spent, &report.currency),
            budget_status(report.status)
        ));
    }
    Ok(())
}

fn remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let category = args
        .first()
        .ok_or_else(|| CommandError::usage("budget remove <category>"))?;
    context.manager.remove_budget(category.trim())?;
    context.manager.save_budgets()?;
    io::print_success(format!("Removed budget for {}.", category.trim()));
    Ok(())
}

fn list(context: &mut ShellContext) -> CommandResult {
    let reports = context.manager.budget_reports();
    if reports.is_empty() {
        io::print_info("No budgets set. Add one with `budget set <category> <limit>`.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::new("Category", 20).flex(),
        TableColumn::new("Limit", 14).right(),
        TableColumn::new("Spent", 14).right(),
        TableColumn::new("Remaining", 14).right(),
        TableColumn::new("Used", 22),
        TableColumn::new("Status", 12),
    ]);
    for report in &reports {
        table.add_row(vec![
            report.category.clone(),
            money(report.limit, &report.currency),
            money(report.spent, &report.currency),
            money(report.remaining, &report.currency),
            progress_bar(report.percentage),
            budget_status(report.status),
        ]);
    }
    table.print();
    Ok(())
}

fn overview(context: &mut ShellContext) -> CommandResult {
    let overview = context.manager.budget_overview();
    let currency = context.manager.settings().default_currency.clone();

    output_section("Budget overview");
    io::print_info(format!(
        "  Total budget : {}",
        money(overview.total_budget, &currency)
    ));
    io::print_info(format!(
        "  Total spent  : {}",
        money(overview.total_spent, &currency)
    ));
    io::print_info(format!(
        "  Remaining    : {}",
        money(overview.remaining, &currency)
    ));
    if overview.over_budget_count > 0 {
        io::print_warning(format!(
            "{} categor{} over budget.",
            overview.over_budget_count,
            if overview.over_budget_count == 1 { "y is" } else { "ies are" }
        ));
    } else {
        io::print_success("All categories within budget.");
    }
    Ok(())
}

fn alerts(context: &mut ShellContext) -> CommandResult {
    let alerts = context.manager.budget_alerts();
    if alerts.is_empty() {
        io::print_success("No budget alerts.");
        return Ok(());
    }
    for report in alerts {
        io::print_warning(format!(
            "{}: {} of {} used ({}), over by {}",
            report.category,
            money(report.spent, &report.currency),
            money(report.limit, &report.currency),
            percent(report.utilization),
            money(report.over_by(), &report.currency)
        ));
    }
    Ok(())
}
