//! Service layer for the expense tracker
//!
//! The service layer provides the entry workflow on top of the storage
//! layer: input validation, normalization, filtered listing and the live
//! overview fed by store subscriptions.

pub mod expense;
pub mod overview;
pub mod validation;

pub use expense::{
    check_report_days, ExpenseFilter, ExpenseService, ExpenseUpdate, NewExpense, SortOrder,
};
pub use overview::{Overview, OverviewState};
pub use validation::{parse_amount, validate_expense_input, ValidationResult};
