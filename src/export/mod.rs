//! Export module for the expense tracker
//!
//! Renders expense lists for sharing:
//! - CSV: one line per expense, spreadsheet-compatible
//! - PDF: paginated table with a total line

pub mod csv;
pub mod file;
pub mod pdf;

pub use self::csv::{expenses_to_csv, write_csv};
pub use self::file::{export_file_name, export_to_dir, export_to_path, ExportFormat};
pub use self::pdf::{expenses_to_pdf, PdfPage, PdfReport};
