use tally_domain::BudgetPeriod;

use crate::cli::commands::{parse_positive, split_subcommand};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::formatters::{date, money, percent, progress_bar, rolling_status};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;

const USAGE: &str = "rolling set <amount> <daily|weekly|monthly>
rolling clear
rolling show";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "rolling",
        "Manage the overall daily, weekly or monthly budget",
        USAGE,
        cmd_rolling,
    )]
}

fn cmd_rolling(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return show(context);
    }
    let (sub, rest) = split_subcommand(args, "rolling <set|clear|show>")?;
    match sub.as_str() {
        "set" => set(context, rest),
        "clear" | "remove" => clear(context),
        "show" | "status" => show(context),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown rolling subcommand `{other}`. Available: set, clear, show"
        ))),
    }
}

fn set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [amount, period] = args else {
        return Err(CommandError::usage("rolling set <amount> <daily|weekly|monthly>"));
    };
    let amount = parse_positive(amount, "amount")?;
    let period: BudgetPeriod = period
        .parse()
        .map_err(|err| CommandError::InvalidArguments(format!("{err}")))?;

    let budget = context.manager.set_rolling_budget(amount, period)?;
    context.manager.save_rolling_budget()?;
    io::print_success(format!(
        "{} budget set to {}.",
        budget.period,
        money(budget.amount, &context.manager.settings().default_currency)
    ));
    Ok(())
}

fn clear(context: &mut ShellContext) -> CommandResult {
    if !context.manager.clear_rolling_budget() {
        io::print_info("No rolling budget is set.");
        return Ok(());
    }
    context.manager.save_rolling_budget()?;
    io::print_success("Rolling budget cleared.");
    Ok(())
}

fn show(context: &mut ShellContext) -> CommandResult {
    let Some(report) = context.manager.rolling_report() else {
        io::print_info("No rolling budget is set. Use `rolling set <amount> <period>`.");
        return Ok(());
    };
    let currency = &context.manager.settings().default_currency;

    output_section(format!("{} budget", report.budget.period));
    io::print_info(format!(
        "  Period       : since {} (day {} of {})",
        date(&report.period_start),
        report.days_elapsed.min(report.days_in_period),
        report.days_in_period
    ));
    io::print_info(format!(
        "  Budget       : {}",
        money(report.budget.amount, currency)
    ));
    io::print_info(format!(
        "  Spent        : {} across {} expense(s)",
        money(report.total_spent, currency),
        report.expense_count
    ));
    io::print_info(format!(
        "  Remaining    : {}",
        money(report.remaining, currency)
    ));
    io::print_info(format!(
        "  Used         : {} {}",
        progress_bar(report.percentage_used),
        percent(report.percentage_used)
    ));
    io::print_info(format!(
        "  Daily avg    : {}",
        money(report.daily_average, currency)
    ));
    io::print_info(format!(
        "  Projected    : {}",
        money(report.projected_spending, currency)
    ));
    io::print_info(format!("  Status       : {}", rolling_status(report.status)));

    if report.is_exceeded() {
        io::print_warning("You have spent more than this period's budget.");
    } else if report.projected_over() {
        io::print_hint("At the current pace you will overshoot this period's budget.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tally_domain::{BudgetPeriod, RollingBudget};

    use crate::cli::test_support::TestShell;

    #[test]
    fn set_show_and_clear() {
        let mut shell = TestShell::new();
        shell.ok("rolling show");
        shell.ok("rolling set 700 weekly");
        assert_eq!(
            shell.saved().rolling_budget,
            Some(RollingBudget::new(700.0, BudgetPeriod::Weekly))
        );

        shell.ok("expense add amount=50 category=Other description=Laundry");
        let report = shell.context.manager.rolling_report().unwrap();
        assert_eq!(report.expense_count, 1);
        shell.ok("rolling");

        shell.ok("rolling clear");
        assert_eq!(shell.saved().rolling_budget, None);
        shell.ok("rolling clear");
    }

    #[test]
    fn set_rejects_bad_input() {
        let mut shell = TestShell::new();
        assert!(shell.run("rolling set 0 weekly").is_err());
        assert!(shell.run("rolling set 100 yearly").is_err());
        assert!(shell.run("rolling set 100").is_err());
        assert_eq!(shell.saved().rolling_budget, None);
    }
}
