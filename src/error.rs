//! Custom error types for the expense tracker
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. Every variant can be downgraded to a
//! user-facing message with [`ExpenseError::user_message`].

use thiserror::Error;

/// Message shown when a failure cannot be attributed to a known error kind
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error occurred";

/// The main error type for expense tracker operations
#[derive(Error, Debug)]
pub enum ExpenseError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Entry input rejected by the validation rules
    #[error("Invalid expense: {}", .0.join("; "))]
    InvalidInput(Vec<String>),

    /// Other entry-time rule violations (notes length, malformed dates)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Export construction or write failures
    #[error("Failed to export {format}: {reason}")]
    Export {
        format: &'static str,
        reason: String,
    },
}

impl ExpenseError {
    /// Create a "not found" error for expenses
    pub fn expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: identifier.into(),
        }
    }

    /// Create an export error for the given format label ("CSV" or "PDF")
    pub fn export(format: &'static str, reason: impl Into<String>) -> Self {
        Self::Export {
            format,
            reason: reason.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidInput(_))
    }

    /// Downgrade the error to the message shown to the user
    ///
    /// Validation messages are listed one per line, export failures collapse
    /// to a fixed "Failed to export CSV/PDF" line, everything else keeps its
    /// display text.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput(errors) if errors.is_empty() => UNKNOWN_ERROR_MESSAGE.to_string(),
            Self::InvalidInput(errors) => errors.join("\n"),
            Self::Validation(msg) => msg.clone(),
            Self::Export { format, .. } => format!("Failed to export {}", format),
            other => other.to_string(),
        }
    }
}

impl From<std::io::Error> for ExpenseError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ExpenseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for expense tracker operations
pub type ExpenseResult<T> = Result<T, ExpenseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExpenseError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = ExpenseError::expense_not_found("42");
        assert_eq!(err.to_string(), "Expense not found: 42");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_export_user_message_hides_reason() {
        let err = ExpenseError::export("CSV", "permission denied");
        assert_eq!(err.to_string(), "Failed to export CSV: permission denied");
        assert_eq!(err.user_message(), "Failed to export CSV");
    }

    #[test]
    fn test_invalid_input_lists_every_message() {
        let err = ExpenseError::InvalidInput(vec![
            "Title cannot be empty".into(),
            "Please select a category".into(),
        ]);
        assert!(err.is_validation());
        assert_eq!(
            err.user_message(),
            "Title cannot be empty\nPlease select a category"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ExpenseError = io_err.into();
        assert!(matches!(err, ExpenseError::Io(_)));
    }
    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: ExpenseError = json_err.into();
        assert!(matches!(err, ExpenseError::Json(_)));
        assert!(err.user_message().starts_with("JSON error: "));
    }
}
