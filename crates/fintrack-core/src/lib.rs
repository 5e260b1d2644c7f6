//! fintrack-core
//!
//! Aggregation, projection and rollover engines plus the state they read.
//! Depends on fintrack-domain. No CLI, no terminal I/O, no filesystem access.

pub mod aggregation_service;
pub mod error;
pub mod goal_service;
pub mod ids;
pub mod period_filter;
pub mod recurrence_service;
pub mod state;
pub mod storage;
pub mod summary_service;
pub mod time;
pub mod transaction_service;

#[cfg(test)]
mod tests;

pub use aggregation_service::*;
pub use error::CoreError;
pub use goal_service::*;
pub use ids::*;
pub use period_filter::*;
pub use recurrence_service::*;
pub use state::*;
pub use storage::*;
pub use summary_service::*;
pub use time::*;
pub use transaction_service::*;
