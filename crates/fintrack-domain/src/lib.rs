//! fintrack-domain
//!
//! Pure domain models (Transaction, Budget, Goal, Period).
//! No I/O, no CLI, no storage. Only data types, core enums and parsing helpers.

pub mod budget;
pub mod common;
pub mod goal;
pub mod period;
pub mod transaction;

pub use budget::*;
pub use common::*;
pub use goal::*;
pub use period::*;
pub use transaction::*;
