use std::{collections::HashMap, path::PathBuf};

use chrono::NaiveDate;
use fintrack_config::{Config, ConfigManager};
use fintrack_core::{BudgetProgress, Completion, TransactionFilter};
use fintrack_domain::{parse_date, Displayable, FlowKind, Period};
use fintrack_storage_json::JsonFileStore;

use crate::{
    app::{FinanceApp, NewBudget, NewGoal, NewTransaction},
    cli::output::{self, heading, labeled, money, percent, MoneyFormat},
    errors::AppError,
    utils::build_info,
};

/// Whether the command loop keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

const HELP_TEXT: &str = "\
Commands:
  dashboard [month year] [--json]
  budgets [month year] [--json]
  goals [--json]
  transactions [query] [--type income|expense]
  transaction <id>
  add-transaction <description> <amount> <date> <category> <income|expense>
  delete-transaction <id>
  add-budget <category> <amount> <income|expense> <month> <year> [--recurring] [--notes text]
  update-budget <id> [--amount n] [--category c] [--type income|expense] [--month m] [--year y]
                [--notes text] [--recurring yes|no]
  delete-budget <id>
  add-goal <title> <target> <deadline> [--collected n] [--monthly n] [--description text]
  update-goal <id> [--title t] [--target n] [--collected n] [--deadline date] [--monthly n] [--description text]
  delete-goal <id>
  roll
  users
  config [show | set <key> <value>]   keys: locale, currency, default-user, log-filter, data-root
  version
  help
  exit
Months are 1-12. Dates are YYYY-MM-DD.";

/// Session plus display preferences for one CLI run.
pub struct CliContext {
    pub app: FinanceApp,
    pub config: Config,
    pub config_manager: ConfigManager,
    pub money_format: MoneyFormat,
    pub data_root: PathBuf,
}

impl CliContext {
    pub fn new(
        app: FinanceApp,
        config: Config,
        config_manager: ConfigManager,
        data_root: PathBuf,
    ) -> Self {
        let money_format = MoneyFormat::from_config(&config);
        Self {
            app,
            config,
            config_manager,
            money_format,
            data_root,
        }
    }

    pub fn dispatch(&mut self, command: &str, args: &[String]) -> Result<LoopControl, AppError> {
        match command {
            "dashboard" => self.cmd_dashboard(args)?,
            "budgets" => self.cmd_budgets(args)?,
            "goals" => self.cmd_goals(args)?,
            "transactions" => self.cmd_transactions(args)?,
            "transaction" => self.cmd_transaction(args)?,
            "add-transaction" => self.cmd_add_transaction(args)?,
            "delete-transaction" => {
                let id = single_id(args, "delete-transaction")?;
                let removed = self.app.delete_transaction(&id)?;
                output::success(format!("Deleted transaction {}", removed.display_label()));
            }
            "add-budget" => self.cmd_add_budget(args)?,
            "update-budget" => self.cmd_update_budget(args)?,
            "delete-budget" => {
                let id = single_id(args, "delete-budget")?;
                let removed = self.app.delete_budget(&id)?;
                output::success(format!("Deleted budget {}", removed.display_label()));
            }
            "add-goal" => self.cmd_add_goal(args)?,
            "update-goal" => self.cmd_update_goal(args)?,
            "delete-goal" => {
                let id = single_id(args, "delete-goal")?;
                let removed = self.app.delete_goal(&id)?;
                output::success(format!("Deleted goal {}", removed.display_label()));
            }
            "roll" => {
                let created = self.app.roll_if_period_changed();
                if created.is_empty() {
                    output::info(format!(
                        "Recurring budgets already rolled into {}.",
                        self.app.rolled_for()
                    ));
                } else {
                    for budget in created {
                        output::success(format!("Rolled budget {}", budget.display_label()));
                    }
                }
            }
            "users" => {
                let scopes = JsonFileStore::new(self.data_root.clone())?.list_scopes()?;
                output::section("Users");
                for scope in scopes {
                    let marker = if scope == self.app.scope().trim() { " (current)" } else { "" };
                    output::info(format!("  {scope}{marker}"));
                }
            }
            "config" => self.cmd_config(args)?,
            "version" => output::info(build_info::current().describe()),
            "help" => output::info(HELP_TEXT),
            "exit" | "quit" => return Ok(LoopControl::Exit),
            other => {
                return Err(AppError::InvalidInput(format!(
                    "unknown command `{other}`; try `help`"
                )))
            }
        }
        Ok(LoopControl::Continue)
    }

    fn cmd_dashboard(&self, args: &[String]) -> Result<(), AppError> {
        let parsed = ParsedArgs::parse(args, &["json"])?;
        let period = period_or_current(&parsed.positional, self.app.current_period())?;
        let summary = self.app.dashboard(period);
        if parsed.switch("json") {
            return print_json(&summary);
        }

        let fmt = &self.money_format;
        output::section(format!("Dashboard: {}", period.label()));
        output::info(labeled("Total income", money(summary.total_income, fmt)));
        output::info(labeled("Total expenses", money(summary.total_expenses, fmt)));
        output::info(labeled("Balance", money(summary.balance, fmt)));

        heading("Expenses by category");
        if summary.expense_by_category.is_empty() {
            output::info("  No expenses recorded.");
        }
        for entry in &summary.expense_by_category {
            output::info(labeled(&entry.category, money(entry.total, fmt)));
        }

        heading("Budget vs actual");
        for row in &summary.comparison {
            output::info(labeled(
                &row.name,
                format!(
                    "actual {} / expected {}",
                    money(row.actual, fmt),
                    money(row.expected, fmt)
                ),
            ));
        }

        if !summary.goals.is_empty() {
            heading("Goals");
            for goal in &summary.goals {
                output::info(labeled(
                    &goal.title,
                    format!(
                        "{} ({} / {})",
                        percent(goal.progress_percent),
                        money(goal.collected, fmt),
                        money(goal.target, fmt)
                    ),
                ));
            }
        }
        Ok(())
    }

    fn cmd_budgets(&self, args: &[String]) -> Result<(), AppError> {
        let parsed = ParsedArgs::parse(args, &["json"])?;
        let period = period_or_current(&parsed.positional, self.app.current_period())?;
        let overview = self.app.budget_overview(period);
        if parsed.switch("json") {
            return print_json(&overview);
        }

        let fmt = &self.money_format;
        output::section(format!("Budgets: {}", period.label()));
        output::info(labeled(
            "Income",
            format!(
                "budgeted {} / actual {}{}",
                money(overview.budgeted_income, fmt),
                money(overview.actual_income, fmt),
                optional_percent(overview.income_achievement)
            ),
        ));
        output::info(labeled(
            "Expenses",
            format!(
                "budgeted {} / actual {}{}",
                money(overview.budgeted_expense, fmt),
                money(overview.actual_expense, fmt),
                optional_percent(overview.expense_utilization)
            ),
        ));
        output::info(labeled(
            "Net",
            format!(
                "budgeted {} / actual {}",
                money(overview.net_budgeted, fmt),
                money(overview.net_actual, fmt)
            ),
        ));

        heading("Income budgets");
        self.print_progress_rows(&overview.income);
        heading("Expense budgets");
        self.print_progress_rows(&overview.expense);
        Ok(())
    }

    fn print_progress_rows(&self, rows: &[BudgetProgress]) {
        if rows.is_empty() {
            output::info("  None.");
            return;
        }
        for row in rows {
            output::info(format!("  [{}]", row.budget_id));
            output::info(progress_line(row, &self.money_format));
        }
    }

    fn cmd_goals(&self, args: &[String]) -> Result<(), AppError> {
        let parsed = ParsedArgs::parse(args, &["json"])?;
        let projections = self.app.goal_projections();
        if parsed.switch("json") {
            return print_json(&projections);
        }

        let fmt = &self.money_format;
        output::section("Goals");
        if projections.is_empty() {
            output::info("No goals yet.");
            return Ok(());
        }
        for (goal, projection) in self.app.state().goals.iter().zip(&projections) {
            output::info(format!(
                "[{}] {}  {} / {} ({})",
                goal.id,
                goal.title,
                money(goal.collected, fmt),
                money(goal.target, fmt),
                percent(projection.progress_percent)
            ));
            let status = if projection.on_track {
                "on track"
            } else {
                "behind"
            };
            output::info(format!(
                "  due {}, {} months left, needs {}/month, contributing {}/month: {}",
                goal.deadline.format("%Y-%m-%d"),
                projection.months_remaining,
                money(projection.monthly_needed, fmt),
                money(goal.monthly_contribution, fmt),
                status
            ));
            let completion = match (projection.completion, projection.projected_date) {
                (Completion::AlreadyComplete, _) => "goal reached".to_string(),
                (Completion::InMonths(months), Some(date)) => {
                    format!("projected completion {} ({months} months)", date.format("%Y-%m-%d"))
                }
                _ => "never reached at the current contribution".to_string(),
            };
            output::info(format!("  {completion}"));
        }
        Ok(())
    }

    fn cmd_transactions(&self, args: &[String]) -> Result<(), AppError> {
        let parsed = ParsedArgs::parse(args, &[])?;
        let kind = parsed.option("type").map(parse_kind).transpose()?;
        let filter = TransactionFilter {
            query: parsed.positional.join(" "),
            kind,
        };
        let matches = self.app.search_transactions(&filter);
        output::section(format!("Transactions ({})", matches.len()));
        for txn in matches {
            output::info(format!(
                "[{}] {}  {}",
                txn.id,
                txn.display_label(),
                money(txn.amount, &self.money_format)
            ));
        }
        Ok(())
    }

    fn cmd_transaction(&self, args: &[String]) -> Result<(), AppError> {
        let id = single_id(args, "transaction")?;
        let progress = self.app.transaction_budget(&id)?;
        let txn = self
            .app
            .state()
            .transactions
            .iter()
            .find(|txn| txn.id == id)
            .ok_or_else(|| AppError::InvalidInput(format!("unknown transaction `{id}`")))?;
        output::section(format!("Transaction {}", txn.id));
        output::info(labeled("Description", &txn.description));
        output::info(labeled("Amount", money(txn.amount, &self.money_format)));
        output::info(labeled("Date", &txn.date));
        output::info(labeled("Category", txn.effective_category()));
        output::info(labeled("Type", txn.kind));
        match progress {
            Some(progress) => {
                heading("Budget");
                output::info(progress_line(&progress, &self.money_format));
            }
            None => output::info("  No budget covers this transaction."),
        }
        Ok(())
    }

    fn cmd_add_transaction(&mut self, args: &[String]) -> Result<(), AppError> {
        let parsed = ParsedArgs::parse(args, &[])?;
        let [description, amount, date, category, kind] =
            parsed.exact::<5>("add-transaction <description> <amount> <date> <category> <type>")?;
        let txn = self.app.add_transaction(NewTransaction {
            description,
            amount: parse_amount(&amount)?,
            date: parse_day(&date)?,
            category,
            kind: parse_kind(&kind)?,
        })?;
        output::success(format!("Added transaction {} ({})", txn.display_label(), txn.id));
        Ok(())
    }

    fn cmd_add_budget(&mut self, args: &[String]) -> Result<(), AppError> {
        let parsed = ParsedArgs::parse(args, &["recurring"])?;
        let [category, amount, kind, month, year] =
            parsed.exact::<5>("add-budget <category> <amount> <type> <month> <year>")?;
        let budget = self.app.add_budget(NewBudget {
            category,
            amount: parse_amount(&amount)?,
            kind: parse_kind(&kind)?,
            period: parse_period(&month, &year)?,
            notes: parsed.option("notes").map(str::to_string),
            is_recurring: parsed.switch("recurring"),
        })?;
        output::success(format!("Added budget {} ({})", budget.display_label(), budget.id));
        Ok(())
    }

    fn cmd_update_budget(&mut self, args: &[String]) -> Result<(), AppError> {
        let parsed = ParsedArgs::parse(args, &[])?;
        let [id] = parsed.exact::<1>("update-budget <id>")?;
        let mut budget = self
            .app
            .state()
            .budget(&id)
            .cloned()
            .ok_or_else(|| fintrack_core::CoreError::BudgetNotFound(id.clone()))?;
        if let Some(amount) = parsed.option("amount") {
            budget.amount = parse_amount(amount)?;
        }
        if let Some(category) = parsed.option("category") {
            budget.category = category.trim().to_string();
        }
        if let Some(kind) = parsed.option("type") {
            budget.kind = parse_kind(kind)?;
        }
        if parsed.option("month").is_some() || parsed.option("year").is_some() {
            let month = parsed
                .option("month")
                .map(str::to_string)
                .unwrap_or_else(|| (budget.month + 1).to_string());
            let year = parsed
                .option("year")
                .map(str::to_string)
                .unwrap_or_else(|| budget.year.to_string());
            let period = parse_period(&month, &year)?;
            budget.month = period.month;
            budget.year = period.year;
        }
        if let Some(notes) = parsed.option("notes") {
            budget.notes = Some(notes.to_string());
        }
        if let Some(flag) = parsed.option("recurring") {
            budget.is_recurring = parse_yes_no(flag)?;
        }
        let label = budget.display_label();
        self.app.update_budget(budget)?;
        output::success(format!("Updated budget {label}"));
        Ok(())
    }

    fn cmd_config(&mut self, args: &[String]) -> Result<(), AppError> {
        match args {
            [] => self.show_config(),
            [action] if action.eq_ignore_ascii_case("show") => self.show_config(),
            [action, key, value] if action.eq_ignore_ascii_case("set") => {
                let mut updated = self.config.clone();
                updated.set(key, value)?;
                self.config_manager.save(&updated)?;
                self.money_format = MoneyFormat::from_config(&updated);
                self.config = updated;
                output::success(format!(
                    "Saved {key} to {}",
                    self.config_manager.config_path().display()
                ));
            }
            _ => {
                return Err(AppError::InvalidInput(
                    "usage: config [show | set <key> <value>]".into(),
                ))
            }
        }
        Ok(())
    }

    fn show_config(&self) {
        let config = &self.config;
        let unset = || "(unset)".to_string();
        output::section("Configuration");
        output::info(labeled("locale", &config.locale));
        output::info(labeled("currency", &config.currency));
        output::info(labeled(
            "default-user",
            config.default_user.clone().unwrap_or_else(unset),
        ));
        output::info(labeled(
            "log-filter",
            config.log_filter.clone().unwrap_or_else(unset),
        ));
        output::info(labeled(
            "data-root",
            config
                .data_root
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(unset),
        ));
        output::info(labeled("file", self.config_manager.config_path().display()));
    }

    fn cmd_add_goal(&mut self, args: &[String]) -> Result<(), AppError> {
        let parsed = ParsedArgs::parse(args, &[])?;
        let [title, target, deadline] = parsed.exact::<3>("add-goal <title> <target> <deadline>")?;
        let goal = self.app.add_goal(NewGoal {
            title,
            target: parse_amount(&target)?,
            collected: parsed.option("collected").map(parse_amount).transpose()?.unwrap_or(0.0),
            deadline: parse_day(&deadline)?,
            description: parsed.option("description").map(str::to_string),
            monthly_contribution: parsed.option("monthly").map(parse_amount).transpose()?.unwrap_or(0.0),
        })?;
        output::success(format!("Added goal {} ({})", goal.display_label(), goal.id));
        Ok(())
    }

    fn cmd_update_goal(&mut self, args: &[String]) -> Result<(), AppError> {
        let parsed = ParsedArgs::parse(args, &[])?;
        let [id] = parsed.exact::<1>("update-goal <id>")?;
        let mut goal = self
            .app
            .state()
            .goal(&id)
            .cloned()
            .ok_or_else(|| fintrack_core::CoreError::GoalNotFound(id.clone()))?;
        if let Some(title) = parsed.option("title") {
            goal.title = title.to_string();
        }
        if let Some(target) = parsed.option("target") {
            goal.target = parse_amount(target)?;
        }
        if let Some(collected) = parsed.option("collected") {
            goal.collected = parse_amount(collected)?;
        }
        if let Some(deadline) = parsed.option("deadline") {
            goal.deadline = parse_day(deadline)?;
        }
        if let Some(monthly) = parsed.option("monthly") {
            goal.monthly_contribution = parse_amount(monthly)?;
        }
        if let Some(description) = parsed.option("description") {
            goal.description = Some(description.to_string());
        }
        let label = goal.display_label();
        self.app.update_goal(goal)?;
        output::success(format!("Updated goal {label}"));
        Ok(())
    }
}

/// Positional arguments plus `--name value` options and bare `--switch` flags.
#[derive(Debug, Default, PartialEq)]
pub struct ParsedArgs {
    pub positional: Vec<String>,
    options: HashMap<String, String>,
    switches: Vec<String>,
}

impl ParsedArgs {
    /// `switches` lists the flags that take no value.
    pub fn parse(args: &[String], switches: &[&str]) -> Result<Self, AppError> {
        let mut parsed = ParsedArgs::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            let Some(name) = arg.strip_prefix("--") else {
                parsed.positional.push(arg.clone());
                continue;
            };
            if switches.contains(&name) {
                parsed.switches.push(name.to_string());
                continue;
            }
            let value = iter
                .next()
                .ok_or_else(|| AppError::InvalidInput(format!("option `--{name}` needs a value")))?;
            parsed.options.insert(name.to_string(), value.clone());
        }
        Ok(parsed)
    }

    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }

    pub fn switch(&self, name: &str) -> bool {
        self.switches.iter().any(|switch| switch == name)
    }

    fn exact<const N: usize>(&self, usage: &str) -> Result<[String; N], AppError> {
        <[String; N]>::try_from(self.positional.clone())
            .map_err(|_| AppError::InvalidInput(format!("usage: {usage}")))
    }
}

fn single_id(args: &[String], command: &str) -> Result<String, AppError> {
    match args {
        [id] => Ok(id.clone()),
        _ => Err(AppError::InvalidInput(format!("usage: {command} <id>"))),
    }
}

fn progress_line(row: &BudgetProgress, fmt: &MoneyFormat) -> String {
    let verb = match row.kind {
        FlowKind::Income => "received",
        FlowKind::Expense => "spent",
    };
    let flag = match (row.is_over_budget, row.kind) {
        (true, FlowKind::Expense) => "  OVER BUDGET",
        (true, FlowKind::Income) => "  BELOW TARGET",
        (false, _) => "",
    };
    format!(
        "  {:<18} budgeted {}, {verb} {}, remaining {} ({}){flag}",
        row.category,
        money(row.budgeted, fmt),
        money(row.spent, fmt),
        money(row.remaining, fmt),
        percent(row.percent_used)
    )
}

fn optional_percent(value: Option<f64>) -> String {
    value.map(|v| format!(" ({})", percent(v))).unwrap_or_default()
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|err| AppError::InvalidInput(format!("cannot render JSON: {err}")))?;
    println!("{json}");
    Ok(())
}

fn period_or_current(positional: &[String], current: Period) -> Result<Period, AppError> {
    match positional {
        [] => Ok(current),
        [month, year] => parse_period(month, year),
        _ => Err(AppError::InvalidInput("expected `<month> <year>`".into())),
    }
}

/// Parses a one-based month and a year into a [`Period`].
pub fn parse_period(month: &str, year: &str) -> Result<Period, AppError> {
    let month: u32 = month
        .trim()
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("invalid month `{month}`")))?;
    let year: i32 = year
        .trim()
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("invalid year `{year}`")))?;
    month
        .checked_sub(1)
        .and_then(|zero_based| Period::new(zero_based, year))
        .ok_or_else(|| AppError::InvalidInput(format!("month must be 1-12, got {month}")))
}

pub fn parse_amount(raw: &str) -> Result<f64, AppError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| AppError::InvalidInput(format!("invalid amount `{raw}`")))
}

fn parse_day(raw: &str) -> Result<NaiveDate, AppError> {
    parse_date(raw).ok_or_else(|| AppError::InvalidInput(format!("invalid date `{raw}`")))
}

fn parse_kind(raw: &str) -> Result<FlowKind, AppError> {
    raw.parse::<FlowKind>().map_err(AppError::InvalidInput)
}

fn parse_yes_no(raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "yes" | "true" | "1" => Ok(true),
        "no" | "false" | "0" => Ok(false),
        other => Err(AppError::InvalidInput(format!("expected yes or no, got `{other}`"))),
    }
}
