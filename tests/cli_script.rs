mod common;

use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::str::contains;
use regex::Regex;

fn script(home: &Path, input: &str) -> assert_cmd::assert::Assert {
    Command::cargo_bin("expense_core_cli")
        .unwrap()
        .env("EXPENSE_CORE_HOME", home)
        .env("EXPENSE_CORE_CLI_SCRIPT", "1")
        .env_remove("RUST_LOG")
        .write_stdin(input.to_string())
        .assert()
}

fn stdout_of(assert: assert_cmd::assert::Assert) -> String {
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

#[test]
fn script_mode_records_expenses_and_budgets() {
    let home = common::temp_home();
    let input = "\
# comments and blank lines are skipped

expense add amount=42.5 \"category=Food & Dining\" \"description=Thakali set\" date=2024-07-01
budget set \"Food & Dining\" 40
expense add amount=1 \"category=Food & Dining\" description=Tea date=2024-07-02
expense list
exit
";

    let stdout = stdout_of(script(&home, input).success());
    let added = Regex::new(r"Added expense \d{13,}: Thakali set \(USD 42\.50, Food & Dining\)").unwrap();
    assert!(added.is_match(&stdout), "{stdout}");
    assert!(stdout.contains("Budget alert: Food & Dining is over budget by USD 3.50"));
    assert!(stdout.contains("2 expense(s) | sorted by date | total USD 43.50"));

    let data = home.join("data");
    let expenses = fs::read_to_string(data.join("expenses.json")).unwrap();
    assert!(expenses.contains("\"Thakali set\""));
    assert!(expenses.contains("\"paymentMethod\": \"cash\""));
    let budgets = fs::read_to_string(data.join("budgets.json")).unwrap();
    assert!(budgets.contains("\"Food & Dining\""));
}

#[test]
fn state_survives_restarts() {
    let home = common::temp_home();
    script(
        &home,
        "expense add amount=12 category=Transportation description=Bus\nrolling set 300 monthly\n",
    )
    .success();

    script(&home, "summary\nrolling show\n")
        .success()
        .stdout(contains("Expenses    : 1"))
        .stdout(contains("Top category: Transportation (USD 12.00)"))
        .stdout(contains("Monthly budget"));
}

#[test]
fn errors_are_reported_and_the_script_continues() {
    let home = common::temp_home();
    script(
        &home,
        "expense add amount=3 category=Snaks description=Chips\nbudgt list\nexpense list\n",
    )
    .success()
    .stdout(contains("unknown category `Snaks`"))
    .stdout(contains("Unknown command `budgt`"))
    .stdout(contains("Suggestion: `budget`?"))
    .stdout(contains("No expenses recorded yet"));
}

#[test]
fn malformed_documents_warn_and_fall_back() {
    let home = common::temp_home();
    let data = home.join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("budgets.json"), "{ not json").unwrap();

    script(&home, "budget list\n")
        .success()
        .stdout(contains("budgets.json could not be parsed"))
        .stdout(contains("No budgets set"));
}

#[test]
fn config_changes_persist_to_home() {
    let home = common::temp_home();
    script(&home, "config set recent 3\nconfig show\n")
        .success()
        .stdout(contains("Recent count : 3"));

    let config = fs::read_to_string(home.join("config.json")).unwrap();
    assert!(config.contains("\"recent_count\": 3"));
}

#[test]
fn version_prints_build_metadata() {
    let home = common::temp_home();
    script(&home, "version\n")
        .success()
        .stdout(contains(format!(
            "Expense Core {}",
            env!("CARGO_PKG_VERSION")
        )));
}
