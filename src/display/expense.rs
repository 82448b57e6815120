//! Expense display formatting
//!
//! List views render through `tabled`; the detail view is plain aligned
//! text like the rest of the CLI output.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::category::category_label;
use crate::models::Expense;

/// Longest title shown in a list row
const LIST_TITLE_WIDTH: usize = 24;

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Format a list of expenses as a table
pub fn format_expense_list(expenses: &[Expense], currency: &str) -> String {
    if expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let rows = expenses.iter().map(|e| ExpenseRow {
        id: e.id.to_string(),
        date: e.date.format("%Y-%m-%d %H:%M").to_string(),
        title: truncate(&e.title, LIST_TITLE_WIDTH),
        category: e.category().display_name().to_string(),
        amount: format!("{}{:.2}", currency, e.amount),
    });

    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    let mut table = Table::new(rows);
    table.with(Style::modern());

    format!(
        "{}\n{} expense(s), total {}{:.2}\n",
        table,
        expenses.len(),
        currency,
        total
    )
}

/// Format expense details for display
pub fn format_expense_details(expense: &Expense, currency: &str, color: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!("Expense:   #{}\n", expense.id));
    output.push_str(&format!("Title:     {}\n", expense.title));
    output.push_str(&format!("Amount:    {}{:.2}\n", currency, expense.amount));
    output.push_str(&format!(
        "Category:  {}\n",
        category_label(expense.category(), color)
    ));
    output.push_str(&format!(
        "Date:      {}\n",
        expense.date.format("%Y-%m-%d %H:%M:%S")
    ));

    if let Some(notes) = &expense.notes {
        output.push_str(&format!("Notes:     {}\n", notes));
    }
    if let Some(receipt) = &expense.receipt_image_path {
        output.push_str(&format!("Receipt:   {}\n", receipt));
    }

    output
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
