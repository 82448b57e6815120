//! CLI command for data export
//!
//! Writes the stored expenses, newest first, to a timestamped CSV or PDF
//! file and prints where it landed.

use std::path::PathBuf;

use clap::Args;

use super::{now, parse_category};
use crate::config::settings::Settings;
use crate::error::ExpenseResult;
use crate::export::{export_to_dir, ExportFormat};
use crate::services::{ExpenseFilter, ExpenseService};
use crate::storage::Storage;

/// Arguments for `expense export`
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output format
    #[arg(value_enum)]
    pub format: ExportFormat,

    /// Output directory (defaults to the configured export directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only export one category
    #[arg(short, long)]
    pub category: Option<String>,
}

/// Handle the export command
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    args: ExportArgs,
) -> ExpenseResult<()> {
    let service = ExpenseService::new(storage);

    let mut filter = ExpenseFilter::new();
    if let Some(cat_name) = &args.category {
        filter = filter.category(parse_category(cat_name)?);
    }
    let expenses = service.list(filter)?;

    let dir = args
        .output
        .unwrap_or_else(|| settings.export_dir(storage.paths()));
    let path = export_to_dir(
        &dir,
        args.format,
        &expenses,
        now(),
        &settings.currency_symbol,
    )?;

    println!(
        "Exported {} expense(s) to: {}",
        expenses.len(),
        path.display()
    );
    println!("Type: {}", args.format.mime_type());

    Ok(())
}
