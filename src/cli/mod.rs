//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod expense;
pub mod export;
pub mod report;

pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export_command, ExportArgs};
pub use report::{handle_report_command, ReportCommands};

use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::error::{ExpenseError, ExpenseResult, UNKNOWN_ERROR_MESSAGE};
use crate::models::ExpenseCategory;
use crate::reports::aggregation::{end_of_day, start_of_day};

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Current local time
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Parse `YYYY-MM-DD` or `YYYY-MM-DD HH:MM[:SS]`
///
/// A bare date resolves to `time_of_day` on that date.
pub fn parse_datetime(
    input: &str,
    time_of_day: impl FnOnce(NaiveDate) -> NaiveDateTime,
) -> ExpenseResult<NaiveDateTime> {
    let input = input.trim();

    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(parsed);
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map(time_of_day)
        .map_err(|_| {
            ExpenseError::Validation(format!(
                "Invalid date format: '{}'. Use YYYY-MM-DD or YYYY-MM-DD HH:MM",
                input
            ))
        })
}

/// Parse the start of a `--from` range (a bare date means midnight)
pub fn parse_range_start(input: &str) -> ExpenseResult<NaiveDateTime> {
    parse_datetime(input, start_of_day)
}

/// Parse the end of a `--to` range (a bare date means the last instant)
pub fn parse_range_end(input: &str) -> ExpenseResult<NaiveDateTime> {
    parse_datetime(input, end_of_day)
}

/// Parse a category named on the command line
pub fn parse_category(input: &str) -> ExpenseResult<ExpenseCategory> {
    input
        .parse()
        .map_err(|e: crate::models::UnknownCategory| ExpenseError::Validation(e.to_string()))
}

/// Message shown to the user for an error that reached `main`
pub fn error_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ExpenseError>() {
        Some(expense_err) => expense_err.user_message(),
        None => UNKNOWN_ERROR_MESSAGE.to_string(),
    }
}
