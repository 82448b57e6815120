//! Entry validation
//!
//! Checks the raw form input for a new or edited expense. Every rule runs;
//! the result lists all violations in a fixed order.

use crate::models::ExpenseCategory;

pub const TITLE_EMPTY: &str = "Title cannot be empty";
pub const AMOUNT_EMPTY: &str = "Amount cannot be empty";
pub const AMOUNT_INVALID: &str = "Invalid amount format";
pub const AMOUNT_NOT_POSITIVE: &str = "Amount must be greater than 0";
pub const CATEGORY_MISSING: &str = "Please select a category";

/// Outcome of validating entry input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Validate title, amount text and category selection
pub fn validate_expense_input(
    title: &str,
    amount_text: &str,
    category: Option<ExpenseCategory>,
) -> ValidationResult {
    let mut errors = Vec::new();

    if title.trim().is_empty() {
        errors.push(TITLE_EMPTY.to_string());
    }

    if amount_text.trim().is_empty() {
        errors.push(AMOUNT_EMPTY.to_string());
    } else {
        match parse_amount(amount_text) {
            Some(amount) if amount <= 0.0 => errors.push(AMOUNT_NOT_POSITIVE.to_string()),
            Some(_) => {}
            None => errors.push(AMOUNT_INVALID.to_string()),
        }
    }

    if category.is_none() {
        errors.push(CATEGORY_MISSING.to_string());
    }

    ValidationResult::from_errors(errors)
}

/// Parse amount text as a decimal number
pub fn parse_amount(amount_text: &str) -> Option<f64> {
    amount_text.trim().parse::<f64>().ok()
}
