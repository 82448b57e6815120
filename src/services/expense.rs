//! Expense service
//!
//! Provides the entry workflow on top of the store: validate raw input, trim
//! text fields, parse the amount, then write. Also offers filtered listing
//! and the report helpers used by the CLI.

use chrono::{NaiveDateTime, SubsecRound};
use tracing::warn;

use super::validation::{parse_amount, validate_expense_input, AMOUNT_INVALID};
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{CategoryTotal, Expense, ExpenseCategory, ExpenseId, NOTES_MAX_LEN};
use crate::reports::{aggregation, WeeklyReport, MAX_REPORT_DAYS};
use crate::storage::Storage;

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

/// Ordering applied by [`ExpenseService::list`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Newest first
    #[default]
    Date,
    /// Grouped by stored category text, newest first within a category
    Category,
}

/// Options for filtering expenses
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub category: Option<ExpenseCategory>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub sort: SortOrder,
    pub limit: Option<usize>,
}

impl ExpenseFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by category
    pub fn category(mut self, category: ExpenseCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Filter by date range
    pub fn date_range(mut self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Set the ordering
    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Limit results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Raw input for a new expense, as typed by the user
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub title: String,
    pub amount: String,
    pub category: Option<ExpenseCategory>,
    pub notes: Option<String>,
    pub date: NaiveDateTime,
    pub receipt_image_path: Option<String>,
}

/// Partial changes to an existing expense
///
/// `notes: Some("")` clears the notes.
#[derive(Debug, Clone, Default)]
pub struct ExpenseUpdate {
    pub title: Option<String>,
    pub amount: Option<String>,
    pub category: Option<ExpenseCategory>,
    pub notes: Option<String>,
    pub date: Option<NaiveDateTime>,
    pub receipt_image_path: Option<String>,
}

impl<'a> ExpenseService<'a> {
    /// Create a new expense service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Validate and store a new expense
    pub fn create(&self, input: NewExpense) -> ExpenseResult<Expense> {
        let amount = check_input(&input.title, &input.amount, input.category)?;
        let notes = clean_notes(input.notes)?;
        let category = input.category.unwrap_or_default();

        let mut expense = Expense::new(input.title.trim(), amount, category, input.date);
        expense.notes = notes;
        expense.receipt_image_path = input.receipt_image_path;

        self.storage.expenses.insert(expense)
    }

    /// Get an expense by ID
    pub fn get(&self, id: ExpenseId) -> ExpenseResult<Expense> {
        self.storage
            .expenses
            .get(id)?
            .ok_or_else(|| ExpenseError::expense_not_found(id.to_string()))
    }

    /// Apply changes to a stored expense
    ///
    /// The merged title/amount/category go through the same validation as a
    /// new entry.
    pub fn update(&self, id: ExpenseId, changes: ExpenseUpdate) -> ExpenseResult<Expense> {
        let mut expense = self.get(id)?;

        let title = changes.title.unwrap_or_else(|| expense.title.clone());
        let amount_text = changes
            .amount
            .unwrap_or_else(|| expense.amount.to_string());
        let category = changes.category.unwrap_or_else(|| expense.category());

        let amount = check_input(&title, &amount_text, Some(category))?;

        expense.title = title.trim().to_string();
        expense.amount = amount;
        if let Some(new_category) = changes.category {
            expense.category = new_category.as_str().to_string();
        }
        if let Some(notes) = changes.notes {
            expense.notes = clean_notes(Some(notes))?;
        }
        if let Some(date) = changes.date {
            expense.date = date.trunc_subsecs(3);
        }
        if let Some(path) = changes.receipt_image_path {
            expense.receipt_image_path = Some(path).filter(|p| !p.trim().is_empty());
        }

        self.storage.expenses.update(expense.clone())?;
        Ok(expense)
    }

    /// Delete an expense
    pub fn delete(&self, id: ExpenseId) -> ExpenseResult<()> {
        if self.storage.expenses.delete(id)? {
            Ok(())
        } else {
            Err(ExpenseError::expense_not_found(id.to_string()))
        }
    }

    /// Delete every expense, returning how many were removed
    pub fn delete_all(&self) -> ExpenseResult<usize> {
        self.storage.expenses.delete_all()
    }

    /// List expenses with optional filtering
    pub fn list(&self, filter: ExpenseFilter) -> ExpenseResult<Vec<Expense>> {
        let mut expenses = if let Some(category) = filter.category {
            self.storage.expenses.list_by_category(category.as_str())?
        } else if let (Some(start), Some(end)) = (filter.start, filter.end) {
            self.storage.expenses.list_by_date_range(start, end)?
        } else {
            self.storage.expenses.list()?
        };

        if let Some(start) = filter.start {
            expenses.retain(|e| e.date >= start);
        }
        if let Some(end) = filter.end {
            expenses.retain(|e| e.date <= end);
        }

        if filter.sort == SortOrder::Category {
            // Stable sort keeps the newest-first order inside each category
            expenses.sort_by(|a, b| a.category.cmp(&b.category));
        }

        if let Some(limit) = filter.limit {
            expenses.truncate(limit);
        }

        Ok(expenses)
    }

    /// Total spent on the calendar day of `now`
    pub fn today_total(&self, now: NaiveDateTime) -> ExpenseResult<f64> {
        let snapshot = self.storage.expenses.list()?;
        Ok(aggregation::total_for_today(&snapshot, now))
    }

    /// Per-category sums for a window
    pub fn category_totals(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> ExpenseResult<Vec<CategoryTotal>> {
        self.storage.expenses.category_sums(start, end)
    }

    /// Rolling report over the last `days` days ending at `reference`
    pub fn weekly_report(&self, reference: NaiveDateTime, days: u32) -> ExpenseResult<WeeklyReport> {
        let days = check_report_days(days)?;
        let snapshot = self.storage.expenses.list()?;
        Ok(WeeklyReport::generate(&snapshot, reference, days))
    }
}

/// Reject report windows outside `1..=MAX_REPORT_DAYS`
pub fn check_report_days(days: u32) -> ExpenseResult<u32> {
    if (1..=MAX_REPORT_DAYS).contains(&days) {
        Ok(days)
    } else {
        Err(ExpenseError::Validation(format!(
            "Report must cover between 1 and {} days (got {})",
            MAX_REPORT_DAYS, days
        )))
    }
}

/// Run entry validation and return the parsed amount
fn check_input(
    title: &str,
    amount_text: &str,
    category: Option<ExpenseCategory>,
) -> ExpenseResult<f64> {
    let result = validate_expense_input(title, amount_text, category);
    if !result.is_valid {
        warn!(errors = ?result.errors, "expense input rejected");
        return Err(ExpenseError::InvalidInput(result.errors));
    }

    parse_amount(amount_text)
        .ok_or_else(|| ExpenseError::InvalidInput(vec![AMOUNT_INVALID.to_string()]))
}

/// Trim notes, map blank to `None`, enforce the length limit
fn clean_notes(notes: Option<String>) -> ExpenseResult<Option<String>> {
    let Some(notes) = notes else {
        return Ok(None);
    };

    let trimmed = notes.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let len = trimmed.chars().count();
    if len > NOTES_MAX_LEN {
        return Err(ExpenseError::Validation(format!(
            "Notes must be at most {} characters (got {})",
            NOTES_MAX_LEN, len
        )));
    }

    Ok(Some(trimmed.to_string()))
}
