#![doc(test(attr(deny(warnings))))]

//! Finance Tracker: personal transactions, monthly budgets and savings goals
//! for one user scope, with a scriptable CLI on top.

pub mod app;
pub mod cli;
pub mod errors;
pub mod system_clock;
pub mod utils;

pub use app::{FinanceApp, NewBudget, NewGoal, NewTransaction};
pub use errors::AppError;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing with the default filter.
pub fn init() {
    init_with_filter(None);
}

/// Initializes global tracing, preferring `RUST_LOG`, then `filter`.
pub fn init_with_filter(filter: Option<&str>) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(filter);
        tracing::debug!("finance tracker tracing initialized");
    });
}
