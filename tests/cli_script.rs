use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use tempfile::tempdir;

fn cli(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("finance_tracker_cli").unwrap();
    cmd.env("FINANCE_TRACKER_HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn script_mode_reports_overspent_budget() {
    let home = tempdir().unwrap();
    let input = "\
add-transaction Salary 1000 2024-03-05 \"\" income
add-transaction Groceries 200 2024-03-10 Food expense
add-budget Food 150 expense 3 2024
budgets 3 2024
dashboard 3 2024
exit
";

    cli(home.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Budgets: March 2024"))
        .stdout(contains("remaining -50.00 USD (100.0%)"))
        .stdout(contains("OVER BUDGET"))
        .stdout(contains("Dashboard: March 2024"))
        .stdout(contains("800.00 USD"));

    let stored = std::fs::read_to_string(home.path().join("default").join("transactions.json")).unwrap();
    assert!(stored.contains("\"Groceries\""));
    assert!(stored.contains("\"type\":\"income\""));
}

#[test]
fn script_mode_keeps_going_after_a_bad_line() {
    let home = tempdir().unwrap();
    cli(home.path())
        .write_stdin("frobnicate\nadd-goal Bike 1200 2030-01-01 --collected 600 --monthly 100\ngoals\n")
        .assert()
        .success()
        .stderr(contains("unknown command `frobnicate`"))
        .stdout(contains("50.0%"));
}

#[test]
fn single_command_failure_sets_exit_code() {
    let home = tempdir().unwrap();
    cli(home.path())
        .args(["delete-goal", "missing"])
        .assert()
        .failure()
        .stderr(contains("Goal not found: missing"));
}

#[test]
fn users_have_separate_data() {
    let home = tempdir().unwrap();
    cli(home.path())
        .args(["--user", "alice", "add-goal", "Bike", "800", "2030-01-01"])
        .assert()
        .success();

    cli(home.path())
        .args(["--user", "alice", "goals"])
        .assert()
        .success()
        .stdout(contains("Bike"));
    cli(home.path())
        .args(["--user", "bob", "goals"])
        .assert()
        .success()
        .stdout(contains("No goals yet."));
}

#[test]
fn recurring_budget_rolls_into_current_month_on_next_run() {
    let home = tempdir().unwrap();
    let data = home.path().join("ledgers");
    cli(home.path())
        .arg("--data-dir")
        .arg(&data)
        .args(["add-budget", "Rent", "900", "expense", "1", "2020", "--recurring"])
        .assert()
        .success();

    cli(home.path())
        .arg("--data-dir")
        .arg(&data)
        .arg("budgets")
        .assert()
        .success()
        .stdout(contains("Rent"));
    assert!(data.join("default").join("budgets.json").exists());
}

#[test]
fn dashboard_json_is_machine_readable() {
    let home = tempdir().unwrap();
    cli(home.path())
        .args(["add-transaction", "Coffee", "4.5", "2024-03-02", "Food", "expense"])
        .assert()
        .success();

    let output = cli(home.path())
        .args(["dashboard", "3", "2024", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["totalExpenses"], serde_json::json!(4.5));
    assert_eq!(value["expenseByCategory"][0]["category"], "Food");
}

#[test]
fn version_prints_package_version() {
    let home = tempdir().unwrap();
    cli(home.path())
        .arg("version")
        .assert()
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn users_lists_scopes_with_data() {
    let home = tempdir().unwrap();
    cli(home.path())
        .args(["--user", "carol", "add-goal", "Car", "5000", "2031-06-01"])
        .assert()
        .success();
    cli(home.path())
        .args(["--user", "carol", "users"])
        .assert()
        .success()
        .stdout(contains("carol (current)"));
}

fn added_id(stdout: &[u8]) -> String {
    let text = String::from_utf8_lossy(stdout);
    let (_, tail) = text.rsplit_once('(').unwrap();
    tail.trim_end().trim_end_matches(')').to_string()
}

#[test]
fn update_budget_moves_it_to_another_period() {
    let home = tempdir().unwrap();
    let added = cli(home.path())
        .args(["add-budget", "Food", "150", "expense", "3", "2024"])
        .output()
        .unwrap();
    assert!(added.status.success());
    let id = added_id(&added.stdout);

    cli(home.path())
        .args(["update-budget", &id, "--category", "Groceries", "--month", "5"])
        .args(["--type", "income", "--amount", "90"])
        .assert()
        .success();

    cli(home.path())
        .args(["budgets", "5", "2024"])
        .assert()
        .success()
        .stdout(contains("Groceries"))
        .stdout(contains("received"))
        .stdout(contains("90.00 USD"));
    cli(home.path())
        .args(["budgets", "3", "2024"])
        .assert()
        .success()
        .stdout(contains("Groceries").not())
        .stdout(contains("Food").not());

    cli(home.path())
        .args(["update-budget", &id, "--month", "13"])
        .assert()
        .failure()
        .stderr(contains("month must be 1-12"));
}

#[test]
fn config_set_is_saved_and_changes_amount_format() {
    let home = tempdir().unwrap();
    cli(home.path())
        .args(["config", "set", "currency", "EUR"])
        .assert()
        .success();
    cli(home.path())
        .args(["config", "set", "locale", "fr-FR"])
        .assert()
        .success();

    let stored = std::fs::read_to_string(home.path().join("config.json")).unwrap();
    assert!(stored.contains("\"currency\": \"EUR\""));
    assert!(stored.contains("\"locale\": \"fr-FR\""));

    cli(home.path())
        .args(["add-transaction", "Coffee", "4.5", "2024-03-02", "Food", "expense"])
        .assert()
        .success();
    cli(home.path())
        .args(["dashboard", "3", "2024"])
        .assert()
        .success()
        .stdout(contains("4,50 EUR"));
    cli(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(contains("fr-FR"))
        .stdout(contains("EUR"));

    cli(home.path())
        .args(["config", "set", "theme", "dark"])
        .assert()
        .failure()
        .stderr(contains("unknown key `theme`"));
}

#[test]
fn config_default_user_selects_scope() {
    let home = tempdir().unwrap();
    cli(home.path())
        .args(["config", "set", "default-user", "dana"])
        .assert()
        .success();
    cli(home.path())
        .args(["add-goal", "Boat", "900", "2032-01-01"])
        .assert()
        .success();
    cli(home.path())
        .args(["--user", "dana", "goals"])
        .assert()
        .success()
        .stdout(contains("Boat"));
}

#[test]
fn read_only_run_leaves_config_home_untouched() {
    let home = tempdir().unwrap();
    let config_home = home.path().join("cfg");
    let data = home.path().join("ledgers");
    cli(&config_home)
        .arg("--data-dir")
        .arg(&data)
        .arg("goals")
        .assert()
        .success();
    assert!(!config_home.exists());
}
