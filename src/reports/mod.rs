//! Reports module for the expense tracker
//!
//! `aggregation` holds the pure totals/breakdown functions; `weekly` builds
//! the rolling report shown by `expense report week`.

pub mod aggregation;
pub mod weekly;

pub use aggregation::{
    category_breakdown, daily_totals, end_of_day, expense_count, percentage_of, start_of_day,
    total_for_range, total_for_today, window_start, DailyTotal,
};
pub use weekly::{CategoryShare, WeeklyReport, DEFAULT_REPORT_DAYS, MAX_REPORT_DAYS};
