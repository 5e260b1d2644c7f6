//! Category totals and budget-versus-actual computations.

use serde::Serialize;
use tracing::debug;

use fintrack_domain::{Amounted, Budget, FlowKind, Period, Transaction};

use crate::period_filter::{budgets_in, transactions_in};

/// Sum of transaction amounts for one category.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// `type -> category -> sum(amount)` for a set of transactions.
///
/// Categories keep the order in which they were first seen.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CategoryTotals {
    pub income: Vec<CategoryTotal>,
    pub expense: Vec<CategoryTotal>,
}

impl CategoryTotals {
    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut totals = Self::default();
        for txn in transactions {
            totals.add(txn.kind, txn.effective_category(), txn.amount());
        }
        totals
    }

    pub fn add(&mut self, kind: FlowKind, category: &str, amount: f64) {
        let bucket = self.bucket_mut(kind);
        match bucket.iter_mut().find(|entry| entry.category == category) {
            Some(entry) => entry.total += amount,
            None => bucket.push(CategoryTotal {
                category: category.to_string(),
                total: amount,
            }),
        }
    }

    pub fn get(&self, kind: FlowKind, category: &str) -> Option<f64> {
        self.categories(kind)
            .iter()
            .find(|entry| entry.category == category)
            .map(|entry| entry.total)
    }

    pub fn total(&self, kind: FlowKind) -> f64 {
        self.categories(kind).iter().map(|entry| entry.total).sum()
    }

    pub fn categories(&self, kind: FlowKind) -> &[CategoryTotal] {
        match kind {
            FlowKind::Income => &self.income,
            FlowKind::Expense => &self.expense,
        }
    }

    fn bucket_mut(&mut self, kind: FlowKind) -> &mut Vec<CategoryTotal> {
        match kind {
            FlowKind::Income => &mut self.income,
            FlowKind::Expense => &mut self.expense,
        }
    }
}

/// Derived figures for one budget against the actuals of its period.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetProgress {
    pub budget_id: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: FlowKind,
    pub budgeted: f64,
    pub spent: f64,
    pub remaining: f64,
    pub percent_used: f64,
    pub is_over_budget: bool,
}

/// Chart-ready row pairing a budget with its actual amount.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetChartRow {
    pub name: String,
    pub budgeted: f64,
    pub actual: f64,
    #[serde(rename = "type")]
    pub kind: FlowKind,
}

/// Budget screen figures for one period.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetOverview {
    pub period: Period,
    pub budgeted_income: f64,
    pub budgeted_expense: f64,
    pub actual_income: f64,
    pub actual_expense: f64,
    pub net_budgeted: f64,
    pub net_actual: f64,
    /// Actual income as a percent of budgeted income, uncapped.
    pub income_achievement: Option<f64>,
    /// Actual expenses as a percent of budgeted expenses, uncapped.
    pub expense_utilization: Option<f64>,
    pub income: Vec<BudgetProgress>,
    pub expense: Vec<BudgetProgress>,
    pub chart: Vec<BudgetChartRow>,
}

/// Share of `budgeted` consumed by `spent`, capped at 100.
///
/// A zero budget reads as 0% while nothing is spent and 100% afterwards.
pub fn percent_used(spent: f64, budgeted: f64) -> f64 {
    if budgeted <= 0.0 {
        return if spent > 0.0 { 100.0 } else { 0.0 };
    }
    ((spent / budgeted) * 100.0).clamp(0.0, 100.0)
}

fn ratio_percent(actual: f64, budgeted: f64) -> Option<f64> {
    (budgeted > 0.0).then(|| (actual / budgeted) * 100.0)
}

pub struct AggregationService;

impl AggregationService {
    pub fn category_totals(transactions: &[Transaction], period: Period) -> CategoryTotals {
        CategoryTotals::from_transactions(transactions_in(transactions, period))
    }

    /// Spent, remaining, percent used and over-budget flag for `budget`.
    ///
    /// `totals` must come from the same period as the budget.
    pub fn progress(budget: &Budget, totals: &CategoryTotals) -> BudgetProgress {
        let spent = totals
            .get(budget.kind, &budget.category)
            .unwrap_or(0.0);
        let budgeted = budget.amount;
        let (remaining, is_over_budget) = match budget.kind {
            FlowKind::Expense => (budgeted - spent, spent > budgeted),
            FlowKind::Income => (spent - budgeted, spent < budgeted),
        };
        BudgetProgress {
            budget_id: budget.id.clone(),
            category: budget.category.clone(),
            kind: budget.kind,
            budgeted,
            spent,
            remaining,
            percent_used: percent_used(spent, budgeted),
            is_over_budget,
        }
    }

    pub fn overview(
        budgets: &[Budget],
        transactions: &[Transaction],
        period: Period,
    ) -> BudgetOverview {
        let period_budgets = budgets_in(budgets, period);
        let totals = Self::category_totals(transactions, period);
        debug!(
            period = %period,
            budgets = period_budgets.len(),
            "recomputing budget overview"
        );

        let mut income = Vec::new();
        let mut expense = Vec::new();
        let mut chart = Vec::with_capacity(period_budgets.len());
        for budget in &period_budgets {
            let progress = Self::progress(budget, &totals);
            chart.push(BudgetChartRow {
                name: budget.category.clone(),
                budgeted: budget.amount,
                actual: progress.spent,
                kind: budget.kind,
            });
            match budget.kind {
                FlowKind::Income => income.push(progress),
                FlowKind::Expense => expense.push(progress),
            }
        }

        let budgeted_income: f64 = income.iter().map(|p| p.budgeted).sum();
        let budgeted_expense: f64 = expense.iter().map(|p| p.budgeted).sum();
        let actual_income = totals.total(FlowKind::Income);
        let actual_expense = totals.total(FlowKind::Expense);

        BudgetOverview {
            period,
            budgeted_income,
            budgeted_expense,
            actual_income,
            actual_expense,
            net_budgeted: budgeted_income - budgeted_expense,
            net_actual: actual_income - actual_expense,
            income_achievement: ratio_percent(actual_income, budgeted_income),
            expense_utilization: ratio_percent(actual_expense, budgeted_expense),
            income,
            expense,
            chart,
        }
    }

    /// Progress of the budget covering `txn`'s own category, type and month.
    ///
    /// Returns `None` when no such budget exists or the date is unreadable.
    pub fn transaction_budget(
        transactions: &[Transaction],
        budgets: &[Budget],
        txn: &Transaction,
    ) -> Option<BudgetProgress> {
        let period = txn.period()?;
        let category = txn.effective_category();
        let budget = budgets
            .iter()
            .find(|b| b.kind == txn.kind && b.period() == period && b.category == category)?;
        let related = transactions_in(transactions, period)
            .into_iter()
            .filter(|t| t.kind == txn.kind && t.effective_category() == category);
        let totals = CategoryTotals::from_transactions(related);
        Some(Self::progress(budget, &totals))
    }
}
