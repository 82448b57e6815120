//! CSV export
//!
//! Writes one line per expense under a fixed header. Fields are written
//! verbatim; the only substitution is comma to semicolon inside notes, so a
//! comma in the title or category shifts the columns of that line.

use std::io::Write;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::Expense;

/// Header line of every CSV export
pub const CSV_HEADER: [&str; 5] = ["Date", "Title", "Category", "Amount", "Notes"];

/// Date format used in exported rows
pub const CSV_DATE_FORMAT: &str = "%d/%m/%Y";

/// Write `records` as CSV, in input order
pub fn write_csv<W: Write>(records: &[Expense], writer: W) -> ExpenseResult<()> {
    let mut csv_writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer.write_record(CSV_HEADER).map_err(csv_error)?;

    for expense in records {
        let notes = expense
            .notes
            .as_deref()
            .map(|n| n.replace(',', ";"))
            .unwrap_or_default();

        csv_writer
            .write_record([
                expense.date.format(CSV_DATE_FORMAT).to_string(),
                expense.title.clone(),
                expense.category.clone(),
                format_amount(expense.amount),
                notes,
            ])
            .map_err(csv_error)?;
    }

    csv_writer
        .flush()
        .map_err(|e| ExpenseError::export("CSV", e.to_string()))
}

/// Render `records` as a CSV string
pub fn expenses_to_csv(records: &[Expense]) -> ExpenseResult<String> {
    let mut buffer = Vec::new();
    write_csv(records, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| ExpenseError::export("CSV", e.to_string()))
}

/// Shortest decimal form, always with a fractional part ("12.5", "100.0")
pub fn format_amount(amount: f64) -> String {
    let text = amount.to_string();
    if amount.is_finite() && !text.contains('.') {
        format!("{}.0", text)
    } else {
        text
    }
}

fn csv_error(e: csv::Error) -> ExpenseError {
    ExpenseError::export("CSV", e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExpenseCategory;
    use chrono::NaiveDate;

    fn expense(title: &str, amount: f64, category: ExpenseCategory) -> Expense {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(13, 5, 0)
            .unwrap();
        Expense::new(title, amount, category, date)
    }

    #[test]
    fn test_row_format() {
        let records = vec![expense("Lunch", 12.5, ExpenseCategory::Food).with_notes("a,b")];
        let csv = expenses_to_csv(&records).unwrap();

        assert_eq!(
            csv,
            "Date,Title,Category,Amount,Notes\n15/01/2024,Lunch,FOOD,12.5,a;b\n"
        );
    }

    #[test]
    fn test_empty_list_has_header_only() {
        let csv = expenses_to_csv(&[]).unwrap();
        assert_eq!(csv, "Date,Title,Category,Amount,Notes\n");
    }

    #[test]
    fn test_missing_notes_is_empty_field() {
        let records = vec![expense("Bus", 100.0, ExpenseCategory::Travel)];
        let csv = expenses_to_csv(&records).unwrap();
        assert!(csv.ends_with("15/01/2024,Bus,TRAVEL,100.0,\n"));
    }

    #[test]
    fn test_rows_keep_input_order() {
        let records = vec![
            expense("B", 1.0, ExpenseCategory::Staff),
            expense("A", 2.0, ExpenseCategory::Utility),
        ];
        let csv = expenses_to_csv(&records).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert!(lines[1].contains(",B,STAFF,"));
        assert!(lines[2].contains(",A,UTILITY,"));
    }

    #[test]
    fn test_comma_in_title_is_not_escaped() {
        let records = vec![expense("Tea, cake", 3.0, ExpenseCategory::Food)];
        let csv = expenses_to_csv(&records).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, "15/01/2024,Tea, cake,FOOD,3.0,");
        assert_eq!(row.split(',').count(), 6);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(12.5), "12.5");
        assert_eq!(format_amount(100.0), "100.0");
        assert_eq!(format_amount(0.1), "0.1");
    }
}
