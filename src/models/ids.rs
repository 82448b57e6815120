//! Strongly-typed ID wrapper for expense records
//!
//! Expense ids are integers assigned by the store on insert. `0` marks a
//! record that has not been stored yet.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a stored expense
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ExpenseId(i64);

impl ExpenseId {
    /// The placeholder id carried by records before insertion
    pub const UNASSIGNED: ExpenseId = ExpenseId(0);

    /// Wrap a raw id
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Get the raw integer
    pub const fn get(&self) -> i64 {
        self.0
    }

    /// Whether the store has assigned this id
    pub const fn is_assigned(&self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ExpenseId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl FromStr for ExpenseId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        Ok(Self(s.parse()?))
    }
}
