//! Expense categories
//!
//! The category set is closed. Records store the category as its upper-case
//! token (`"FOOD"`); stored text that matches no token resolves to
//! [`ExpenseCategory::Staff`] instead of failing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed classification of an expense
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExpenseCategory {
    #[default]
    Staff,
    Travel,
    Food,
    Utility,
}

impl ExpenseCategory {
    /// Every category, in declaration order
    pub fn all() -> &'static [ExpenseCategory] {
        &[Self::Staff, Self::Travel, Self::Food, Self::Utility]
    }

    /// Token written to the store and to CSV exports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Staff => "STAFF",
            Self::Travel => "TRAVEL",
            Self::Food => "FOOD",
            Self::Utility => "UTILITY",
        }
    }

    /// Human-readable name used in reports and PDF exports
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Staff => "Staff",
            Self::Travel => "Travel",
            Self::Food => "Food",
            Self::Utility => "Utility",
        }
    }

    /// Resolve stored category text, falling back to `Staff`
    ///
    /// Matching is exact against the stored token.
    pub fn from_str_lossy(value: &str) -> Self {
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == value)
            .unwrap_or(Self::Staff)
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Error returned when user input names no known category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown category '{}'. Expected one of: staff, travel, food, utility",
            self.0
        )
    }
}

impl std::error::Error for UnknownCategory {}

/// Strict, case-insensitive parsing for command-line input
impl FromStr for ExpenseCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lossy_parse_known_tokens() {
        for category in ExpenseCategory::all() {
            assert_eq!(ExpenseCategory::from_str_lossy(category.as_str()), *category);
        }
    }

    #[test]
    fn test_lossy_parse_falls_back_to_staff() {
        assert_eq!(ExpenseCategory::from_str_lossy("GROCERIES"), ExpenseCategory::Staff);
        assert_eq!(ExpenseCategory::from_str_lossy(""), ExpenseCategory::Staff);
        // Stored tokens are case-sensitive
        assert_eq!(ExpenseCategory::from_str_lossy("food"), ExpenseCategory::Staff);
    }

    #[test]
    fn test_strict_parse_is_case_insensitive() {
        assert_eq!("travel".parse::<ExpenseCategory>().unwrap(), ExpenseCategory::Travel);
        assert_eq!(" Utility ".parse::<ExpenseCategory>().unwrap(), ExpenseCategory::Utility);
        assert!("rent".parse::<ExpenseCategory>().is_err());
    }

    #[test]
    fn test_display_name_and_token_differ() {
        assert_eq!(ExpenseCategory::Food.as_str(), "FOOD");
        assert_eq!(ExpenseCategory::Food.to_string(), "Food");
    }

    #[test]
    fn test_serde_uses_token() {
        let json = serde_json::to_string(&ExpenseCategory::Travel).unwrap();
        assert_eq!(json, "\"TRAVEL\"");
    }
}
