//! Rolling expense report
//!
//! Summarizes the last N calendar days (7 by default) ending at a reference
//! instant: per-day totals, the window total, the average per day and a
//! category breakdown with each category's share of the total.

use chrono::NaiveDateTime;

use super::aggregation::{
    category_breakdown, daily_totals, end_of_day, in_window, percentage_of, total_for_range,
    window_start, DailyTotal,
};
use crate::models::{Expense, ExpenseCategory};

/// Default length of the rolling window
pub const DEFAULT_REPORT_DAYS: u32 = 7;

/// Longest window accepted from user input (about ten years)
pub const MAX_REPORT_DAYS: u32 = 3660;

/// One category line of the report
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    /// Raw category text as stored
    pub category: String,
    pub total: f64,
    /// Share of the window total, 0-100
    pub percentage: f64,
}

impl CategoryShare {
    pub fn category(&self) -> ExpenseCategory {
        ExpenseCategory::from_str_lossy(&self.category)
    }
}

/// Report over the trailing `days` calendar days
#[derive(Debug, Clone)]
pub struct WeeklyReport {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub days: u32,
    /// Oldest day first
    pub daily: Vec<DailyTotal>,
    pub total: f64,
    pub average_daily: f64,
    pub categories: Vec<CategoryShare>,
    pub expense_count: usize,
}

impl WeeklyReport {
    /// Build the report from a snapshot of expenses
    pub fn generate(records: &[Expense], reference: NaiveDateTime, days: u32) -> Self {
        let end = end_of_day(reference.date());
        let start = window_start(reference.date(), days);

        let total = if days == 0 {
            0.0
        } else {
            total_for_range(records, start, end)
        };
        let average_daily = if days == 0 { 0.0 } else { total / f64::from(days) };

        let categories = if days == 0 {
            Vec::new()
        } else {
            category_breakdown(records, start, end)
                .into_iter()
                .map(|c| CategoryShare {
                    percentage: percentage_of(c.total_amount, total),
                    category: c.category,
                    total: c.total_amount,
                })
                .collect()
        };

        let expense_count = if days == 0 {
            0
        } else {
            records
                .iter()
                .filter(|e| in_window(e.date, start, end))
                .count()
        };

        Self {
            start,
            end,
            days,
            daily: daily_totals(records, days, reference),
            total,
            average_daily,
            categories,
            expense_count,
        }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Expense Report: {} to {}\n",
            self.start.format("%d/%m/%Y"),
            self.end.format("%d/%m/%Y")
        ));
        output.push_str(&"=".repeat(50));
        output.push('\n');
        output.push_str(&format!(
            "Total ({} days):  {}{:.2}\n",
            self.days, currency, self.total
        ));
        output.push_str(&format!(
            "Daily average:    {}{:.2}\n",
            currency, self.average_daily
        ));
        output.push_str(&format!("Expenses:         {}\n\n", self.expense_count));

        output.push_str("Daily Totals\n");
        output.push_str(&"-".repeat(50));
        output.push('\n');
        for day in &self.daily {
            output.push_str(&format!(
                "  {:<10} {:>14}\n",
                day.label,
                format!("{}{:.2}", currency, day.total)
            ));
        }

        output.push_str("\nBy Category\n");
        output.push_str(&"-".repeat(50));
        output.push('\n');
        if self.categories.is_empty() {
            output.push_str("  No expenses to display\n");
        } else {
            for share in &self.categories {
                output.push_str(&format!(
                    "  {:<10} {:>14} {:>7.1}%\n",
                    share.category().display_name(),
                    format!("{}{:.2}", currency, share.total),
                    share.percentage
                ));
            }
        }

        output
    }
}
