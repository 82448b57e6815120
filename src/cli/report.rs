//! CLI commands for reports
//!
//! Today's total, the rolling report and per-category totals.

use clap::Subcommand;

use super::{now, parse_range_end, parse_range_start};
use crate::config::settings::Settings;
use crate::display::format_category_totals;
use crate::error::ExpenseResult;
use crate::reports::aggregation::{end_of_day, window_start};
use crate::services::{check_report_days, ExpenseService};
use crate::storage::Storage;

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Total spent today
    Today,
    /// Rolling report over the last N days
    Week {
        /// Days covered, ending today (defaults to the configured report_days)
        #[arg(short, long)]
        days: Option<u32>,
    },
    /// Totals per category
    Categories {
        /// Start date (defaults to the start of the rolling window)
        #[arg(long)]
        from: Option<String>,
        /// End date (defaults to the end of today)
        #[arg(long)]
        to: Option<String>,
    },
}

/// Handle a report command
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> ExpenseResult<()> {
    let service = ExpenseService::new(storage);
    let currency = settings.currency_symbol.as_str();
    let now = now();

    match cmd {
        ReportCommands::Today => {
            let total = service.today_total(now)?;
            println!(
                "Today ({}): {}{:.2}",
                now.format("%d/%m/%Y"),
                currency,
                total
            );
        }

        ReportCommands::Week { days } => {
            let days = days.unwrap_or(settings.report_days);
            let report = service.weekly_report(now, days)?;
            print!("{}", report.format_terminal(currency));
        }

        ReportCommands::Categories { from, to } => {
            let start = match from {
                Some(from_str) => parse_range_start(&from_str)?,
                None => window_start(now.date(), check_report_days(settings.report_days)?),
            };
            let end = match to {
                Some(to_str) => parse_range_end(&to_str)?,
                None => end_of_day(now.date()),
            };

            println!(
                "Category totals: {} to {}",
                start.format("%d/%m/%Y"),
                end.format("%d/%m/%Y")
            );
            let totals = service.category_totals(start, end)?;
            print!(
                "{}",
                format_category_totals(&totals, currency, settings.color_output)
            );
        }
    }

    Ok(())
}
