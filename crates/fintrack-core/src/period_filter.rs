//! Selects the records belonging to one calendar month.

use fintrack_domain::{Budget, Period, Periodic, Transaction};

/// Stable filter: keeps input order and never re-sorts.
pub fn filter_period<T: Periodic>(items: &[T], period: Period) -> Vec<&T> {
    items.iter().filter(|item| item.falls_in(period)).collect()
}

/// Transactions dated inside `period`. Unparseable dates are excluded.
pub fn transactions_in(transactions: &[Transaction], period: Period) -> Vec<&Transaction> {
    filter_period(transactions, period)
}

pub fn budgets_in(budgets: &[Budget], period: Period) -> Vec<&Budget> {
    filter_period(budgets, period)
}
