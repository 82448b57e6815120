//! Expense Tracker - single-device expense recording and reporting
//!
//! This library provides the core functionality for the `expense` command:
//! recording expenses, aggregating them into daily/weekly/category reports
//! and exporting them to CSV or PDF.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (expenses, categories, totals)
//! - `storage`: JSON file storage with snapshot subscriptions
//! - `reports`: Aggregation engine and the rolling report
//! - `services`: Validation, the entry workflow and the live overview
//! - `export`: CSV and PDF export
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//! - `logging`: tracing setup
//!
//! # Example
//!
//! ```rust,ignore
//! use expense_tracker::config::{paths::ExpensePaths, settings::Settings};
//! use expense_tracker::storage::Storage;
//!
//! let paths = ExpensePaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut storage = Storage::new(paths)?;
//! storage.load_all()?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{ExpenseError, ExpenseResult};
