//! Dashboard totals and chart-ready series for a period.

use serde::Serialize;
use tracing::debug;

use fintrack_domain::{Budget, FlowKind, Goal, Period, Transaction};

use crate::{
    aggregation_service::{CategoryTotal, CategoryTotals},
    goal_service::{GoalHighlight, GoalService},
    period_filter::{budgets_in, transactions_in},
};

/// Number of goals surfaced on the dashboard.
pub const DASHBOARD_GOAL_LIMIT: usize = 3;

/// Named value for pie-style charts.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartSlice {
    pub name: String,
    pub value: f64,
}

/// Actual figure next to the amount the period's budgets expected.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComparisonRow {
    pub name: String,
    pub actual: f64,
    pub expected: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub period: Period,
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
    pub expense_by_category: Vec<CategoryTotal>,
    pub overview: Vec<ChartSlice>,
    pub category_slices: Vec<ChartSlice>,
    pub comparison: Vec<ComparisonRow>,
    pub goals: Vec<GoalHighlight>,
}

pub struct SummaryService;

impl SummaryService {
    pub fn totals(transactions: &[Transaction], period: Period) -> CategoryTotals {
        CategoryTotals::from_transactions(transactions_in(transactions, period))
    }

    pub fn dashboard(
        transactions: &[Transaction],
        budgets: &[Budget],
        goals: &[Goal],
        period: Period,
    ) -> DashboardSummary {
        let totals = Self::totals(transactions, period);
        let total_income = totals.total(FlowKind::Income);
        let total_expenses = totals.total(FlowKind::Expense);
        debug!(period = %period, total_income, total_expenses, "recomputing dashboard");

        let period_budgets = budgets_in(budgets, period);
        let budgeted = |kind: FlowKind| -> f64 {
            period_budgets
                .iter()
                .filter(|budget| budget.kind == kind)
                .map(|budget| budget.amount)
                .sum()
        };
        let expense_by_category = totals.expense.clone();
        let category_slices = expense_by_category
            .iter()
            .map(|entry| ChartSlice {
                name: entry.category.clone(),
                value: entry.total,
            })
            .collect();

        DashboardSummary {
            period,
            total_income,
            total_expenses,
            balance: total_income - total_expenses,
            expense_by_category,
            overview: vec![
                ChartSlice {
                    name: "Income".into(),
                    value: total_income,
                },
                ChartSlice {
                    name: "Expenses".into(),
                    value: total_expenses,
                },
            ],
            category_slices,
            comparison: vec![
                ComparisonRow {
                    name: "Income".into(),
                    actual: total_income,
                    expected: budgeted(FlowKind::Income),
                },
                ComparisonRow {
                    name: "Expenses".into(),
                    actual: total_expenses,
                    expected: budgeted(FlowKind::Expense),
                },
            ],
            goals: GoalService::highlights(goals, DASHBOARD_GOAL_LIMIT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn dashboard_totals_balance_and_series() {
        let march = Period::new(2, 2024).unwrap();
        let transactions = vec![
            Transaction::new("t1", "Paycheck", 1000.0, date(5), "Salary", FlowKind::Income),
            Transaction::new("t2", "Dinner", 200.0, date(10), "Food", FlowKind::Expense),
            Transaction::new("t3", "Bus", 40.0, date(12), "Transportation", FlowKind::Expense),
            Transaction::new("t4", "Snacks", 10.0, date(13), "Food", FlowKind::Expense),
        ];
        let budgets = vec![
            Budget::new("b1", "Food", 150.0, FlowKind::Expense, march),
            Budget::new("b2", "Salary", 1200.0, FlowKind::Income, march),
        ];
        let goals: Vec<Goal> = (1..=4)
            .map(|n| Goal::new(format!("g{n}"), "Save", 100.0, 10.0, date(1), 5.0))
            .collect();

        let summary = SummaryService::dashboard(&transactions, &budgets, &goals, march);
        assert_eq!(summary.total_income, 1000.0);
        assert_eq!(summary.total_expenses, 250.0);
        assert_eq!(summary.balance, 750.0);
        assert_eq!(summary.expense_by_category.len(), 2);
        assert_eq!(summary.expense_by_category[0].category, "Food");
        assert_eq!(summary.expense_by_category[0].total, 210.0);
        assert_eq!(summary.category_slices[1].name, "Transportation");
        assert_eq!(summary.overview[0].value, 1000.0);
        assert_eq!(summary.comparison[0].expected, 1200.0);
        assert_eq!(summary.comparison[1].expected, 150.0);
        assert_eq!(summary.goals.len(), DASHBOARD_GOAL_LIMIT);
    }

    #[test]
    fn empty_period_yields_zeroes() {
        let summary = SummaryService::dashboard(&[], &[], &[], Period::new(0, 2020).unwrap());
        assert_eq!(summary.balance, 0.0);
        assert!(summary.expense_by_category.is_empty());
        assert!(summary.goals.is_empty());
    }
}
