//! Application session: owns the record collections for one user scope,
//! persists them after every mutation and answers the screen queries.

use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::{info, warn};

use fintrack_core::{
    AggregationService, BudgetOverview, BudgetProgress, Clock, CoreError, DashboardSummary,
    FinanceRepository, FinanceState, GoalChartRow, GoalProjection, GoalService, IdGenerator,
    RecurrenceService, SummaryService, TransactionFilter, TransactionService, UuidIdGenerator,
    DEFAULT_SCOPE,
};
use fintrack_domain::{Budget, FlowKind, Goal, Period, Transaction};
use fintrack_storage_json::JsonFileStore;

use crate::{errors::AppError, system_clock::SystemClock};

/// Fields supplied by the user for a new transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub category: String,
    pub kind: FlowKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
    pub category: String,
    pub amount: f64,
    pub kind: FlowKind,
    pub period: Period,
    pub notes: Option<String>,
    pub is_recurring: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewGoal {
    pub title: String,
    pub target: f64,
    pub collected: f64,
    pub deadline: NaiveDate,
    pub description: Option<String>,
    pub monthly_contribution: f64,
}

pub struct FinanceApp {
    state: FinanceState,
    repository: FinanceRepository,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdGenerator>,
    rolled_for: Period,
}

impl FinanceApp {
    /// Loads the scope's collections and rolls recurring budgets into the
    /// clock's current month.
    pub fn open(
        repository: FinanceRepository,
        clock: Box<dyn Clock>,
        ids: Box<dyn IdGenerator>,
    ) -> Self {
        let state = repository.load_state();
        info!(
            scope = repository.scope(),
            transactions = state.transactions.len(),
            budgets = state.budgets.len(),
            goals = state.goals.len(),
            "opened finance session"
        );
        let rolled_for = clock.current_period();
        let mut app = Self {
            state,
            repository,
            clock,
            ids,
            rolled_for,
        };
        app.roll_recurring();
        app
    }

    /// Session backed by JSON documents under `root`, with the system clock
    /// and random identifiers.
    pub fn open_json(root: PathBuf, user: Option<&str>) -> Result<Self, AppError> {
        let store = JsonFileStore::new(root)?;
        let scope = user.unwrap_or(DEFAULT_SCOPE);
        let repository = FinanceRepository::new(Box::new(store), scope);
        Ok(Self::open(
            repository,
            Box::new(SystemClock),
            Box::new(UuidIdGenerator),
        ))
    }

    pub fn scope(&self) -> &str {
        self.repository.scope()
    }

    pub fn state(&self) -> &FinanceState {
        &self.state
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn current_period(&self) -> Period {
        self.clock.current_period()
    }

    /// Period the recurring budgets were last rolled into.
    pub fn rolled_for(&self) -> Period {
        self.rolled_for
    }

    /// Re-runs the rollover when the calendar month moved since the last
    /// roll. Returns the budgets created.
    pub fn roll_if_period_changed(&mut self) -> Vec<Budget> {
        let current = self.clock.current_period();
        if current == self.rolled_for {
            return Vec::new();
        }
        self.rolled_for = current;
        self.roll_recurring()
    }

    fn roll_recurring(&mut self) -> Vec<Budget> {
        let created =
            RecurrenceService::roll_forward(&mut self.state, self.clock.as_ref(), self.ids.as_ref());
        if !created.is_empty() {
            self.persist_budgets();
        }
        created
    }

    pub fn add_transaction(&mut self, input: NewTransaction) -> Result<Transaction, AppError> {
        let transaction = Transaction::new(
            self.ids.next_id(),
            input.description,
            input.amount,
            input.date,
            input.category,
            input.kind,
        );
        self.state.add_transaction(transaction.clone())?;
        self.persist_transactions();
        Ok(transaction)
    }

    pub fn delete_transaction(&mut self, id: &str) -> Result<Transaction, AppError> {
        let removed = self.state.delete_transaction(id)?;
        self.persist_transactions();
        Ok(removed)
    }

    pub fn add_budget(&mut self, input: NewBudget) -> Result<Budget, AppError> {
        let mut budget = Budget::new(
            self.ids.next_id(),
            input.category,
            input.amount,
            input.kind,
            input.period,
        );
        budget.notes = input.notes;
        budget.is_recurring = input.is_recurring;
        self.state.add_budget(budget.clone())?;
        self.persist_budgets();
        Ok(budget)
    }

    pub fn update_budget(&mut self, budget: Budget) -> Result<(), AppError> {
        self.state.update_budget(budget)?;
        self.persist_budgets();
        Ok(())
    }

    pub fn delete_budget(&mut self, id: &str) -> Result<Budget, AppError> {
        let removed = self.state.delete_budget(id)?;
        self.persist_budgets();
        Ok(removed)
    }

    pub fn add_goal(&mut self, input: NewGoal) -> Result<Goal, AppError> {
        let mut goal = Goal::new(
            self.ids.next_id(),
            input.title,
            input.target,
            input.collected,
            input.deadline,
            input.monthly_contribution,
        );
        goal.description = input.description;
        self.state.add_goal(goal.clone())?;
        self.persist_goals();
        Ok(goal)
    }

    pub fn update_goal(&mut self, goal: Goal) -> Result<(), AppError> {
        self.state.update_goal(goal)?;
        self.persist_goals();
        Ok(())
    }

    pub fn delete_goal(&mut self, id: &str) -> Result<Goal, AppError> {
        let removed = self.state.delete_goal(id)?;
        self.persist_goals();
        Ok(removed)
    }

    pub fn dashboard(&self, period: Period) -> DashboardSummary {
        SummaryService::dashboard(
            &self.state.transactions,
            &self.state.budgets,
            &self.state.goals,
            period,
        )
    }

    pub fn budget_overview(&self, period: Period) -> BudgetOverview {
        AggregationService::overview(&self.state.budgets, &self.state.transactions, period)
    }

    pub fn goal_projections(&self) -> Vec<GoalProjection> {
        GoalService::project_all(&self.state.goals, self.clock.today())
    }

    pub fn goal_chart(&self) -> Vec<GoalChartRow> {
        GoalService::chart_rows(&self.state.goals, self.clock.today())
    }

    pub fn search_transactions(&self, filter: &TransactionFilter) -> Vec<&Transaction> {
        TransactionService::search(&self.state.transactions, filter)
    }

    /// Budget progress shown next to a single transaction.
    pub fn transaction_budget(&self, id: &str) -> Result<Option<BudgetProgress>, AppError> {
        let txn = self
            .state
            .transactions
            .iter()
            .find(|txn| txn.id == id)
            .ok_or_else(|| CoreError::TransactionNotFound(id.to_string()))?;
        Ok(AggregationService::transaction_budget(
            &self.state.transactions,
            &self.state.budgets,
            txn,
        ))
    }

    // Persistence failures keep the in-memory change and are only logged.

    fn persist_transactions(&self) {
        if let Err(err) = self.repository.save_transactions(&self.state.transactions) {
            warn!(scope = self.scope(), error = %err, "failed to persist transactions");
        }
    }

    fn persist_budgets(&self) {
        if let Err(err) = self.repository.save_budgets(&self.state.budgets) {
            warn!(scope = self.scope(), error = %err, "failed to persist budgets");
        }
    }

    fn persist_goals(&self) {
        if let Err(err) = self.repository.save_goals(&self.state.goals) {
            warn!(scope = self.scope(), error = %err, "failed to persist goals");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fintrack_core::{FixedClock, KeyValueStore, MemoryStore, SequenceIdGenerator};
    use std::sync::Arc;

    /// Shares one memory store between a session and the assertions.
    struct SharedStore(Arc<MemoryStore>);

    impl KeyValueStore for SharedStore {
        fn get(&self, scope: &str, key: &str) -> Result<Option<String>, CoreError> {
            self.0.get(scope, key)
        }
        fn set(&self, scope: &str, key: &str, value: &str) -> Result<(), CoreError> {
            self.0.set(scope, key, value)
        }
        fn remove(&self, scope: &str, key: &str) -> Result<(), CoreError> {
            self.0.remove(scope, key)
        }
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _scope: &str, _key: &str) -> Result<Option<String>, CoreError> {
            Ok(None)
        }
        fn set(&self, _scope: &str, _key: &str, _value: &str) -> Result<(), CoreError> {
            Err(CoreError::Storage("disk full".into()))
        }
        fn remove(&self, _scope: &str, _key: &str) -> Result<(), CoreError> {
            Ok(())
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn open_with(store: Box<dyn KeyValueStore>, today: NaiveDate) -> FinanceApp {
        FinanceApp::open(
            FinanceRepository::new(store, "alice"),
            Box::new(FixedClock::on(today)),
            Box::new(SequenceIdGenerator::new("id")),
        )
    }

    #[test]
    fn mutations_are_persisted_to_the_scope() {
        let shared = Arc::new(MemoryStore::new());
        let mut app = open_with(Box::new(SharedStore(shared.clone())), date(2024, 3, 15));
        let txn = app
            .add_transaction(NewTransaction {
                description: "Groceries".into(),
                amount: 200.0,
                date: date(2024, 3, 10),
                category: "Food".into(),
                kind: FlowKind::Expense,
            })
            .unwrap();
        assert_eq!(txn.id, "id-1");

        let reopened = FinanceRepository::new(Box::new(SharedStore(shared)), "alice").load_state();
        assert_eq!(reopened.transactions, vec![txn]);
    }

    #[test]
    fn open_rolls_recurring_budgets_once() {
        let shared = Arc::new(MemoryStore::new());
        let seed = FinanceRepository::new(Box::new(SharedStore(shared.clone())), "alice");
        let mut state = FinanceState::default();
        state
            .add_budget(
                Budget::new("rent", "Housing", 900.0, FlowKind::Expense, Period::new(1, 2024).unwrap())
                    .recurring(),
            )
            .unwrap();
        seed.save_state(&state).unwrap();

        let app = open_with(Box::new(SharedStore(shared.clone())), date(2024, 3, 2));
        assert_eq!(app.state().budgets.len(), 2);
        assert_eq!(app.rolled_for(), Period::new(2, 2024).unwrap());

        let app = open_with(Box::new(SharedStore(shared)), date(2024, 3, 20));
        assert_eq!(app.state().budgets.len(), 2);
    }

    #[test]
    fn roll_is_skipped_while_period_is_unchanged() {
        let mut app = open_with(Box::new(MemoryStore::new()), date(2024, 3, 2));
        app.add_budget(NewBudget {
            category: "Food".into(),
            amount: 150.0,
            kind: FlowKind::Expense,
            period: Period::new(1, 2024).unwrap(),
            notes: None,
            is_recurring: true,
        })
        .unwrap();
        // Rollover only runs on open or on a month change.
        assert!(app.roll_if_period_changed().is_empty());
        assert_eq!(app.state().budgets.len(), 1);
    }

    #[test]
    fn failed_persistence_keeps_in_memory_change() {
        let mut app = open_with(Box::new(FailingStore), date(2024, 6, 1));
        let goal = app
            .add_goal(NewGoal {
                title: "Bike".into(),
                target: 800.0,
                collected: 0.0,
                deadline: date(2024, 12, 1),
                description: None,
                monthly_contribution: 100.0,
            })
            .unwrap();
        assert_eq!(app.state().goals, vec![goal]);
        assert_eq!(app.goal_projections()[0].months_remaining, 6);
    }

    #[test]
    fn unknown_ids_are_reported() {
        let mut app = open_with(Box::new(MemoryStore::new()), date(2024, 6, 1));
        assert!(matches!(
            app.delete_goal("missing"),
            Err(AppError::Core(CoreError::GoalNotFound(_)))
        ));
        assert!(app.transaction_budget("missing").is_err());
    }
}
