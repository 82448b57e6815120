//! Expense model
//!
//! An expense is one user-entered spending transaction. The category is kept
//! as the raw stored text so that unknown values survive a round trip through
//! the store; [`Expense::category`] resolves it for presentation.

use chrono::{NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::ExpenseCategory;
use super::ids::ExpenseId;

/// Maximum length of the notes field accepted at entry time
pub const NOTES_MAX_LEN: usize = 100;

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Store-assigned identifier (`0` until inserted)
    #[serde(default)]
    pub id: ExpenseId,

    /// Short description
    pub title: String,

    /// Amount spent
    pub amount: f64,

    /// Category token as stored (e.g. "FOOD")
    pub category: String,

    /// Optional free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// When the expense happened, in local time
    pub date: NaiveDateTime,

    /// Path to a receipt image, if one was attached
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_image_path: Option<String>,
}

impl Expense {
    /// Create an unsaved expense
    ///
    /// The date is truncated to millisecond precision so that day boundaries
    /// (`23:59:59.999`) are exact.
    pub fn new(
        title: impl Into<String>,
        amount: f64,
        category: ExpenseCategory,
        date: NaiveDateTime,
    ) -> Self {
        Self {
            id: ExpenseId::UNASSIGNED,
            title: title.into(),
            amount,
            category: category.as_str().to_string(),
            notes: None,
            date: date.trunc_subsecs(3),
            receipt_image_path: None,
        }
    }

    /// Builder-style notes setter
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Builder-style receipt setter
    pub fn with_receipt(mut self, path: impl Into<String>) -> Self {
        self.receipt_image_path = Some(path.into());
        self
    }

    /// Resolve the stored category text (unknown values map to `Staff`)
    pub fn category(&self) -> ExpenseCategory {
        ExpenseCategory::from_str_lossy(&self.category)
    }

    /// Whether the store has assigned an id
    pub fn is_stored(&self) -> bool {
        self.id.is_assigned()
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {:.2} ({})",
            self.date.format("%Y-%m-%d"),
            self.title,
            self.amount,
            self.category().display_name()
        )
    }
}

/// Sum of amounts for one category within a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// Raw category text as stored
    pub category: String,
    /// Sum of amounts in the window
    pub total_amount: f64,
}

impl CategoryTotal {
    pub fn new(category: impl Into<String>, total_amount: f64) -> Self {
        Self {
            category: category.into(),
            total_amount,
        }
    }

    /// Resolve the category text
    pub fn category(&self) -> ExpenseCategory {
        ExpenseCategory::from_str_lossy(&self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32, nanos: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_nano_opt(h, m, s, nanos)
            .unwrap()
    }

    #[test]
    fn test_new_expense_is_unsaved() {
        let expense = Expense::new("Lunch", 12.5, ExpenseCategory::Food, at(12, 0, 0, 0));
        assert!(!expense.is_stored());
        assert_eq!(expense.category, "FOOD");
        assert_eq!(expense.category(), ExpenseCategory::Food);
        assert!(expense.notes.is_none());
    }

    #[test]
    fn test_date_truncated_to_millis() {
        let expense = Expense::new("Taxi", 3.0, ExpenseCategory::Travel, at(23, 59, 59, 999_999_999));
        assert_eq!(expense.date, at(23, 59, 59, 999_000_000));
    }

    #[test]
    fn test_unknown_category_resolves_to_staff() {
        let mut expense = Expense::new("Misc", 1.0, ExpenseCategory::Food, at(8, 0, 0, 0));
        expense.category = "RENT".into();
        assert_eq!(expense.category(), ExpenseCategory::Staff);
    }

    #[test]
    fn test_serialization_round_trip() {
        let expense = Expense::new("Lunch", 12.5, ExpenseCategory::Food, at(12, 30, 0, 0))
            .with_notes("a,b")
            .with_receipt("/tmp/receipt.jpg");

        let json = serde_json::to_string(&expense).unwrap();
        assert!(json.contains("\"category\":\"FOOD\""));
        assert!(json.contains("\"amount\":12.5"));

        let back: Expense = serde_json::from_str(&json).unwrap();
        assert_eq!(back, expense);
    }

    #[test]
    fn test_deserialize_without_optional_fields() {
        let json = r#"{
            "title": "Coffee",
            "amount": 5.5,
            "category": "FOOD",
            "date": "2024-01-15T08:15:00"
        }"#;
        let expense: Expense = serde_json::from_str(json).unwrap();
        assert_eq!(expense.id, ExpenseId::UNASSIGNED);
        assert!(expense.notes.is_none());
        assert!(expense.receipt_image_path.is_none());
    }
}
