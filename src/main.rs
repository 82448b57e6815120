use anyhow::Result;
use clap::{Parser, Subcommand};

use expense_tracker::cli::{
    error_message, handle_expense_command, handle_export_command, handle_report_command, now,
    ExpenseCommands, ExportArgs, ReportCommands,
};
use expense_tracker::config::{paths::ExpensePaths, settings::Settings};
use expense_tracker::display::format_category_totals;
use expense_tracker::logging::init_tracing;
use expense_tracker::services::Overview;
use expense_tracker::storage::Storage;

#[derive(Parser)]
#[command(
    name = "expense",
    version,
    about = "Record expenses, review totals and export reports",
    long_about = "Record day-to-day business expenses by category, review today's \
                  total and rolling weekly reports, and export records to CSV or PDF."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Expense(ExpenseCommands),

    /// Totals and rolling reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Today's total, record count and this week's categories
    Summary,

    /// Export expenses to CSV or PDF
    Export(ExportArgs),

    /// Create the data directory, store and settings file
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() {
    if let Err(err) = run() {
        tracing::error!("{:#}", err);
        eprintln!("{}", error_message(&err));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = ExpensePaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    init_tracing(&settings.log_filter);

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Expense(cmd)) => {
            handle_expense_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Report(cmd)) => {
            handle_report_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Export(args)) => {
            handle_export_command(&storage, &settings, args)?;
        }
        Some(Commands::Summary) => {
            let overview = Overview::attach(&storage.expenses, now)?;
            let state = overview.state()?;
            let currency = &settings.currency_symbol;

            println!("Today:     {}{:.2}", currency, state.today_total);
            println!("Expenses:  {}", state.expense_count);
            println!();
            println!("This week by category");
            print!(
                "{}",
                format_category_totals(&state.week_categories, currency, settings.color_output)
            );
        }
        Some(Commands::Init) => {
            println!("Initializing expense tracker at: {}", paths.base_dir().display());
            if storage.initialize()? {
                println!("Created {}", paths.expenses_file().display());
            } else {
                println!("Expense store already exists");
            }
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Run 'expense add <title> <amount> -c <category>' to record an expense.");
        }
        Some(Commands::Config) => {
            println!("Expense Tracker Configuration");
            println!("=============================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data file:        {}", paths.expenses_file().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Export directory: {}", settings.export_dir(&paths).display());
            println!();
            println!("Settings:");
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Report days:     {}", settings.report_days);
            println!("  Colour output:   {}", settings.color_output);
            println!("  Log filter:      {}", settings.log_filter);
        }
        None => {
            println!("Expense Tracker - record and report business expenses");
            println!();
            println!("Run 'expense --help' for usage information.");
        }
    }

    Ok(())
}
