use chrono::NaiveDate;

use crate::{
    aggregation_service::AggregationService, goal_service::GoalService, ids::SequenceIdGenerator,
    recurrence_service::RecurrenceService, state::FinanceState, storage::FinanceRepository,
    storage::MemoryStore, summary_service::SummaryService, time::FixedClock, Clock,
};
use fintrack_domain::{Budget, FlowKind, Goal, Period, Transaction};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn food_budget_scenario_reports_overspend() {
    let transactions = vec![
        Transaction::new("t1", "Salary", 1000.0, date(2024, 3, 5), "", FlowKind::Income),
        Transaction::new("t2", "Groceries", 200.0, date(2024, 3, 10), "Food", FlowKind::Expense),
    ];
    let march = Period::new(2, 2024).unwrap();
    let budget = Budget::new("b1", "Food", 150.0, FlowKind::Expense, march);

    let totals = AggregationService::category_totals(&transactions, march);
    let progress = AggregationService::progress(&budget, &totals);

    assert_eq!(progress.spent, 200.0);
    assert_eq!(progress.remaining, -50.0);
    assert_eq!(progress.percent_used, 100.0);
    assert!(progress.is_over_budget);
}

#[test]
fn goal_scenario_is_on_track() {
    let goal = Goal::new("g1", "Emergency fund", 1200.0, 600.0, date(2024, 12, 1), 100.0);
    let projection = GoalService::project(&goal, date(2024, 6, 1));

    assert_eq!(projection.months_remaining, 6);
    assert_eq!(projection.remaining_amount, 600.0);
    assert_eq!(projection.monthly_needed, 100.0);
    assert!(projection.on_track);
}

#[test]
fn rolled_budgets_feed_the_current_dashboard() {
    let clock = FixedClock::on(date(2024, 6, 3));
    let ids = SequenceIdGenerator::new("b");
    let mut state = FinanceState::default();
    state
        .add_budget(
            Budget::new("src", "Food", 150.0, FlowKind::Expense, Period::new(4, 2024).unwrap())
                .recurring(),
        )
        .unwrap();
    state
        .add_transaction(Transaction::new(
            "t1",
            "Market",
            90.0,
            date(2024, 6, 2),
            "Food",
            FlowKind::Expense,
        ))
        .unwrap();

    RecurrenceService::roll_forward(&mut state, &clock, &ids);
    let current = clock.current_period();
    let overview = AggregationService::overview(&state.budgets, &state.transactions, current);
    assert_eq!(overview.expense.len(), 1);
    assert_eq!(overview.expense[0].spent, 90.0);
    assert_eq!(overview.expense[0].remaining, 60.0);

    let dashboard = SummaryService::dashboard(&state.transactions, &state.budgets, &state.goals, current);
    assert_eq!(dashboard.comparison[1].expected, 150.0);
}

#[test]
fn engines_do_not_mutate_persisted_state() {
    let repo = FinanceRepository::new(Box::new(MemoryStore::new()), "carol");
    let mut state = FinanceState::default();
    state
        .add_goal(Goal::new("g1", "Bike", 800.0, 100.0, date(2025, 1, 1), 50.0))
        .unwrap();
    repo.save_state(&state).unwrap();

    let loaded = repo.load_state();
    let _ = GoalService::project_all(&loaded.goals, date(2024, 6, 1));
    let _ = SummaryService::dashboard(
        &loaded.transactions,
        &loaded.budgets,
        &loaded.goals,
        Period::new(5, 2024).unwrap(),
    );
    assert_eq!(loaded, state);
}
