//! Display formatting for terminal output
//!
//! Provides utilities for formatting expenses, category breakdowns and
//! overview figures for terminal display.

pub mod category;
pub mod expense;

pub use category::{category_label, category_style, format_category_totals, CategoryStyle};
pub use expense::{format_expense_details, format_expense_list};
