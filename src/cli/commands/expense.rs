//! `expense` command: record, list, search, inspect and delete expenses.

use tally_core::{CategoryFilter, ExpenseQuery, SortKey};
use tally_domain::{BudgetStatus, Displayable, Expense, NewExpense};

use crate::cli::commands::{ensure_category, split_subcommand};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::formatters::{budget_status, date, date_time, money, percent};
use crate::cli::forms::{expense_from_args, run_expense_wizard};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};

const USAGE: &str = "expense add amount=<n> category=<name> description=<text> [currency=<code>] [date=<YYYY-MM-DD>] [location=<text>|coords=<lat,lon>] [receipt=<data-url>] [payment=<cash|card|digital|bank>]
expense list [search=<text>] [category=<name|all>] [sort=<date|amount|category>]
expense search <text>
expense show <id>
expense delete <id>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "expense",
        "Record, list, search and delete expenses",
        USAGE,
        cmd_expense,
    )]
}

fn cmd_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (sub, rest) = split_subcommand(args, "expense <add|list|search|show|delete>")?;
    match sub.as_str() {
        "add" | "new" => add(context, rest),
        "list" | "ls" => list(context, rest),
        "search" | "find" => search(context, rest),
        "show" => show(context, rest),
        "delete" | "remove" | "rm" => delete(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown expense subcommand `{other}`. Available: add, list, search, show, delete"
        ))),
    }
}

fn add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let now = context.manager.clock().now();
    let input = if args.is_empty() {
        if !context.can_prompt() {
            return Err(CommandError::usage(
                "expense add amount=<n> category=<name> description=<text> [key=value...]",
            ));
        }
        match run_expense_wizard(context.theme(), context.manager.settings(), now)? {
            Some(input) => input,
            None => {
                io::print_info("Expense discarded.");
                return Ok(());
            }
        }
    } else {
        expense_from_args(args, now)?
    };

    check_category(context, &input)?;
    let stored = context.manager.add_expense(input)?;
    context.manager.save_expenses()?;
    io::print_success(format!(
        "Added expense {}: {} ({}, {})",
        stored.id,
        stored.description,
        money(stored.amount, &stored.currency),
        stored.category
    ));

    if context.manager.settings().budget_alerts {
        print_budget_alerts(context, &stored);
    }
    Ok(())
}

/// Blank categories fall through to the manager's validation message.
fn check_category(context: &ShellContext, input: &NewExpense) -> CommandResult {
    if input.category.trim().is_empty() {
        return Ok(());
    }
    ensure_category(context.manager.settings(), &input.category)
}

fn print_budget_alerts(context: &ShellContext, expense: &Expense) {
    if let Some(report) = context.manager.budget_report(&expense.category) {
        match report.status {
            BudgetStatus::OverBudget => io::print_warning(format!(
                "Budget alert: {} is over budget by {}.",
                report.category,
                money(report.over_by(), &report.currency)
            )),
            BudgetStatus::NearLimit => io::print_warning(format!(
                "Budget alert: {} has used {} of its budget.",
                report.category,
                percent(report.utilization)
            )),
            BudgetStatus::OnTrack => {}
        }
    }
    if let Some(report) = context.manager.rolling_report() {
        if report.is_exceeded() {
            io::print_warning(format!(
                "Budget alert: the {} rolling budget is exceeded ({} used).",
                report.budget.period,
                percent(report.percentage_used)
            ));
        }
    }
}

fn list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let mut query = ExpenseQuery::new();
    for arg in args {
        let (key, value) = arg.split_once('=').ok_or_else(|| {
            CommandError::InvalidArguments(format!("expected key=value, got `{arg}`"))
        })?;
        match key.to_ascii_lowercase().as_str() {
            "search" => query = query.search(value),
            "category" => query = query.category(CategoryFilter::parse(value)),
            "sort" => {
                let key: SortKey = value
                    .parse()
                    .map_err(|err| CommandError::InvalidArguments(format!("{err}")))?;
                query = query.sort_by(key);
            }
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown list option `{other}` (expected search, category or sort)"
                )))
            }
        }
    }
    print_expenses(context, &query);
    Ok(())
}

fn search(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(CommandError::usage("expense search <text>"));
    }
    let query = ExpenseQuery::new().search(args.join(" "));
    print_expenses(context, &query);
    Ok(())
}

fn print_expenses(context: &ShellContext, query: &ExpenseQuery) {
    if context.manager.expenses().is_empty() {
        io::print_info("No expenses recorded yet. Add one with `expense add`.");
        return;
    }
    let result = context.manager.query(query);
    if result.is_empty() {
        io::print_info("No expenses match the current filters.");
        return;
    }

    let mut table = Table::new(vec![
        TableColumn::new("ID", 13),
        TableColumn::new("Date", 10),
        TableColumn::new("Category", 20).flex(),
        TableColumn::new("Description", 32).flex(),
        TableColumn::new("Amount", 14).right(),
    ]);
    for expense in &result.items {
        table.add_row(vec![
            expense.id.clone(),
            date(&expense.date),
            expense.category.clone(),
            expense.description.clone(),
            money(expense.amount, &expense.currency),
        ]);
    }
    table.print();

    let currency = &context.manager.settings().default_currency;
    io::print_info(format!(
        "{} expense(s) | sorted by {} | total {}",
        result.len(),
        query.sort,
        money(result.total, currency)
    ));
}

fn show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = args
        .first()
        .ok_or_else(|| CommandError::usage("expense show <id>"))?;
    let expense = context.manager.expense(id)?;

    output_section(format!("Expense {}", expense.id));
    io::print_info(format!("  Description : {}", expense.description));
    io::print_info(format!(
        "  Amount      : {}",
        money(expense.amount, &expense.currency)
    ));
    io::print_info(format!("  Category    : {}", expense.category));
    io::print_info(format!("  Date        : {}", date_time(&expense.date)));
    io::print_info(format!("  Payment     : {}", expense.payment_method));
    if let Some(location) = &expense.location {
        io::print_info(format!("  Location    : {}", location));
    }
    if expense.has_receipt() {
        io::print_info("  Receipt     : attached");
    }
    if let Some(report) = context.manager.budget_report(&expense.category) {
        io::print_info(format!(
            "  Budget      : {} of {} ({})",
            money(report.spent, &report.currency),
            money(report.limit, &report.currency),
            budget_status(report.status)
        ));
    }
    Ok(())
}

fn delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = args
        .first()
        .ok_or_else(|| CommandError::usage("expense delete <id>"))?;
    let Ok(expense) = context.manager.expense(id) else {
        io::print_warning(format!("No expense with id `{id}`; nothing deleted."));
        return Ok(());
    };

    if context.can_prompt() {
        let prompt = format!("Delete {}?", expense.display_label());
        if !io::confirm_action(context.theme(), &prompt, false)? {
            io::print_info("Operation cancelled.");
            return Ok(());
        }
    }

    context.manager.delete_expense(id);
    context.manager.save_expenses()?;
    io::print_success(format!("Deleted expense {id}."));
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::cli::core::CommandError;
    use crate::cli::test_support::TestShell;

    #[test]
    fn add_fills_currency_and_saves() {
        let mut shell = TestShell::new();
        shell.ok(r#"expense add amount=12.5 "category=Food & Dining" "description=Momo plate""#);

        let saved = shell.saved();
        assert_eq!(saved.expenses.len(), 1);
        let expense = &saved.expenses[0];
        assert_eq!(expense.currency, "USD");
        assert_eq!(expense.description, "Momo plate");
        assert_eq!(expense.date.to_rfc3339(), "2024-07-18T15:00:00+00:00");
    }

    #[test]
    fn unknown_category_suggests_the_closest_name() {
        let mut shell = TestShell::new();
        let err = shell
            .run("expense add amount=4 category=Medicl description=Plasters")
            .unwrap_err();
        match err {
            CommandError::InvalidArguments(message) => {
                assert!(message.contains("Did you mean `Medical`?"), "{message}")
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(shell.saved().expenses.is_empty());
    }

    #[test]
    fn add_without_arguments_in_script_mode_is_a_usage_error() {
        let mut shell = TestShell::new();
        assert!(matches!(
            shell.run("expense add"),
            Err(CommandError::InvalidArguments(_))
        ));
    }

    #[test]
    fn delete_removes_by_id_and_ignores_unknown_ids() {
        let mut shell = TestShell::new();
        shell.ok("expense add amount=30 category=Transportation description=Taxi");
        shell.ok("expense add amount=8 category=Communication description=SIM");
        let id = shell.saved().expenses[1].id.clone();

        shell.ok("expense delete does-not-exist");
        assert_eq!(shell.context.manager.expenses().len(), 2);

        shell.ok(&format!("expense delete {id}"));
        let saved = shell.saved();
        assert_eq!(saved.expenses.len(), 1);
        assert_eq!(saved.expenses[0].description, "SIM");
    }

    #[test]
    fn show_reports_missing_ids() {
        let mut shell = TestShell::new();
        assert!(shell.run("expense show nope").is_err());
    }

    #[test]
    fn list_validates_options() {
        let mut shell = TestShell::new();
        shell.ok("expense add amount=30 category=Transportation description=Taxi");
        shell.ok("expense list sort=amount category=all search=taxi");
        assert!(shell.run("expense list sort=price").is_err());
        assert!(shell.run("expense list colour=red").is_err());
        assert!(shell.run("expense list amount").is_err());
    }
}
