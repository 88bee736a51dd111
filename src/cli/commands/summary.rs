use crate::cli::commands::parse_count;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::formatters::{budget_status, date, money, rolling_status};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "summary",
            "Show the spending dashboard",
            "summary [recent-count]",
            cmd_summary,
        ),
        CommandEntry::new(
            "categories",
            "Show spending totals per category",
            "categories",
            cmd_categories,
        ),
    ]
}

fn cmd_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let recent = match args.first() {
        Some(raw) => parse_count(raw)?,
        None => context.recent_count(),
    };
    if args.len() > 1 {
        return Err(CommandError::usage("summary [recent-count]"));
    }

    let summary = context.manager.dashboard(recent);
    let currency = &context.manager.settings().default_currency;

    output_section("Dashboard");
    io::print_info(format!(
        "  Total spent : {}",
        money(summary.total_spent, currency)
    ));
    io::print_info(format!(
        "  Today       : {}",
        money(summary.today_spent, currency)
    ));
    io::print_info(format!("  Expenses    : {}", summary.expense_count));
    match summary.top_category() {
        Some(top) => io::print_info(format!(
            "  Top category: {} ({})",
            top.category,
            money(top.amount, currency)
        )),
        None => io::print_info("  Top category: none"),
    }

    if let Some(report) = context.manager.rolling_report() {
        io::print_info(format!(
            "  {} budget: {} of {} ({})",
            report.budget.period,
            money(report.total_spent, currency),
            money(report.budget.amount, currency),
            rolling_status(report.status)
        ));
    }
    for report in context.manager.budget_alerts() {
        io::print_warning(format!(
            "{} is {} by {}",
            report.category,
            budget_status(report.status),
            money(report.over_by(), &report.currency)
        ));
    }

    if summary.recent.is_empty() {
        io::print_info("No expenses recorded yet.");
        return Ok(());
    }
    output_section("Recent expenses");
    let mut table = Table::new(vec![
        TableColumn::new("Date", 10),
        TableColumn::new("Category", 20).flex(),
        TableColumn::new("Description", 30).flex(),
        TableColumn::new("Amount", 14).right(),
    ]);
    for expense in &summary.recent {
        table.add_row(vec![
            date(&expense.date),
            expense.category.clone(),
            expense.description.clone(),
            money(expense.amount, &expense.currency),
        ]);
    }
    table.print();
    Ok(())
}

fn cmd_categories(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let summary = context.manager.dashboard(0);
    if summary.category_totals.is_empty() {
        io::print_info("No expenses recorded yet.");
        return Ok(());
    }
    let currency = &context.manager.settings().default_currency;
    let mut table = Table::new(vec![
        TableColumn::new("Category", 24).flex(),
        TableColumn::new("Count", 6).right(),
        TableColumn::new("Total", 14).right(),
    ]);
    for total in &summary.category_totals {
        table.add_row(vec![
            total.category.clone(),
            total.count.to_string(),
            money(total.amount, currency),
        ]);
    }
    table.print();
    Ok(())
}
