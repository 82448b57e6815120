//! Expense CLI commands
//!
//! Implements the record management commands: add, list, show, edit, delete
//! and clear.

use clap::Subcommand;

use super::{now, parse_category, parse_datetime, parse_range_end, parse_range_start};
use crate::config::settings::Settings;
use crate::display::{format_expense_details, format_expense_list};
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::ExpenseId;
use crate::services::{ExpenseFilter, ExpenseService, ExpenseUpdate, NewExpense, SortOrder};
use crate::storage::Storage;

/// Expense subcommands
#[derive(Subcommand, Debug)]
pub enum ExpenseCommands {
    /// Record a new expense
    Add {
        /// Short description
        title: String,
        /// Amount spent (e.g. "12.50")
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Category: staff, travel, food or utility
        #[arg(short, long)]
        category: Option<String>,
        /// Notes (up to 100 characters)
        #[arg(short, long)]
        notes: Option<String>,
        /// When it happened (YYYY-MM-DD [HH:MM[:SS]]), defaults to now
        #[arg(short, long)]
        date: Option<String>,
        /// Path to a receipt image
        #[arg(short, long)]
        receipt: Option<String>,
    },
    /// List expenses, newest first
    List {
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,
        /// Start date (YYYY-MM-DD [HH:MM[:SS]])
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD [HH:MM[:SS]])
        #[arg(long)]
        to: Option<String>,
        /// Group rows by category
        #[arg(long)]
        by_category: bool,
        /// Number of expenses to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show expense details
    Show {
        /// Expense ID
        id: String,
    },
    /// Edit an expense
    Edit {
        /// Expense ID
        id: String,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New amount
        #[arg(short, long, allow_hyphen_values = true)]
        amount: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
        /// New notes (empty string clears them)
        #[arg(short, long)]
        notes: Option<String>,
        /// New date
        #[arg(short, long)]
        date: Option<String>,
        /// New receipt path (empty string clears it)
        #[arg(short, long)]
        receipt: Option<String>,
    },
    /// Delete an expense
    Delete {
        /// Expense ID
        id: String,
    },
    /// Delete every expense
    Clear {
        /// Required to confirm
        #[arg(long)]
        force: bool,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> ExpenseResult<()> {
    let service = ExpenseService::new(storage);
    let currency = settings.currency_symbol.as_str();

    match cmd {
        ExpenseCommands::Add {
            title,
            amount,
            category,
            notes,
            date,
            receipt,
        } => {
            let category = category.as_deref().map(parse_category).transpose()?;
            let date = match date {
                Some(date_str) => parse_datetime(&date_str, |d| d.and_time(now().time()))?,
                None => now(),
            };

            let expense = service.create(NewExpense {
                title,
                amount,
                category,
                notes,
                date,
                receipt_image_path: receipt,
            })?;

            println!("Added expense #{}", expense.id);
            print!(
                "{}",
                format_expense_details(&expense, currency, settings.color_output)
            );
        }

        ExpenseCommands::List {
            category,
            from,
            to,
            by_category,
            limit,
        } => {
            let mut filter = ExpenseFilter::new();

            if let Some(cat_name) = &category {
                filter = filter.category(parse_category(cat_name)?);
            }
            if let Some(from_str) = from {
                filter.start = Some(parse_range_start(&from_str)?);
            }
            if let Some(to_str) = to {
                filter.end = Some(parse_range_end(&to_str)?);
            }
            if by_category {
                filter = filter.sort(SortOrder::Category);
            }
            if let Some(limit) = limit {
                filter = filter.limit(limit);
            }

            let expenses = service.list(filter)?;
            print!("{}", format_expense_list(&expenses, currency));
        }

        ExpenseCommands::Show { id } => {
            let expense = service.get(parse_id(&id)?)?;
            print!(
                "{}",
                format_expense_details(&expense, currency, settings.color_output)
            );
        }

        ExpenseCommands::Edit {
            id,
            title,
            amount,
            category,
            notes,
            date,
            receipt,
        } => {
            let id = parse_id(&id)?;
            let category = category.as_deref().map(parse_category).transpose()?;
            let date = date
                .map(|date_str| parse_datetime(&date_str, |d| d.and_time(now().time())))
                .transpose()?;

            let expense = service.update(
                id,
                ExpenseUpdate {
                    title,
                    amount,
                    category,
                    notes,
                    date,
                    receipt_image_path: receipt,
                },
            )?;

            println!("Updated expense #{}", expense.id);
            print!(
                "{}",
                format_expense_details(&expense, currency, settings.color_output)
            );
        }

        ExpenseCommands::Delete { id } => {
            let id = parse_id(&id)?;
            service.delete(id)?;
            println!("Deleted expense #{}", id);
        }

        ExpenseCommands::Clear { force } => {
            if !force {
                return Err(ExpenseError::Validation(
                    "Refusing to delete all expenses without --force".into(),
                ));
            }
            let removed = service.delete_all()?;
            println!("Deleted {} expense(s)", removed);
        }
    }

    Ok(())
}

fn parse_id(input: &str) -> ExpenseResult<ExpenseId> {
    input
        .parse()
        .map_err(|_| ExpenseError::Validation(format!("Invalid expense ID: '{}'", input)))
}
