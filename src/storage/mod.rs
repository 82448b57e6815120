//! Storage layer for the expense tracker
//!
//! Provides JSON file storage with atomic writes, automatic directory
//! creation and snapshot subscriptions.

pub mod expenses;
pub mod file_io;

pub use expenses::{ExpenseRepository, SubscriptionId};
pub use file_io::{read_json, write_bytes_atomic, write_json_atomic};

use crate::config::paths::ExpensePaths;
use crate::error::ExpenseError;

/// Storage coordinator that owns the repositories
pub struct Storage {
    paths: ExpensePaths,
    pub expenses: ExpenseRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: ExpensePaths) -> Result<Self, ExpenseError> {
        paths.ensure_directories()?;

        Ok(Self {
            expenses: ExpenseRepository::new(paths.expenses_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &ExpensePaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), ExpenseError> {
        self.expenses.load()
    }

    /// Write an empty store file if none exists yet
    pub fn initialize(&self) -> Result<bool, ExpenseError> {
        if self.paths.expenses_file().exists() {
            return Ok(false);
        }
        self.expenses.save()?;
        Ok(true)
    }
}
