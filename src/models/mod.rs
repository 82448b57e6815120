//! Core data models for the expense tracker
//!
//! The expense record is the only stored entity; categories are a closed
//! enumeration and category totals are derived values.

pub mod category;
pub mod expense;
pub mod ids;

pub use category::{ExpenseCategory, UnknownCategory};
pub use expense::{CategoryTotal, Expense, NOTES_MAX_LEN};
pub use ids::ExpenseId;
