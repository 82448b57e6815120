//! Category presentation
//!
//! Symbols and colours for each category. These are presentation-only; the
//! model enum carries just the stored token and display name.

use crossterm::style::{Color, Stylize};

use crate::models::{CategoryTotal, ExpenseCategory};
use crate::reports::percentage_of;

/// How a category is drawn in the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryStyle {
    pub symbol: &'static str,
    pub color: Color,
}

/// Look up the presentation attributes for a category
pub fn category_style(category: ExpenseCategory) -> CategoryStyle {
    match category {
        ExpenseCategory::Staff => CategoryStyle {
            symbol: "👤",
            color: Color::Rgb { r: 0x4C, g: 0xAF, b: 0x50 },
        },
        ExpenseCategory::Travel => CategoryStyle {
            symbol: "🚗",
            color: Color::Rgb { r: 0x21, g: 0x96, b: 0xF3 },
        },
        ExpenseCategory::Food => CategoryStyle {
            symbol: "🍽",
            color: Color::Rgb { r: 0xFF, g: 0x98, b: 0x00 },
        },
        ExpenseCategory::Utility => CategoryStyle {
            symbol: "⚡",
            color: Color::Rgb { r: 0x9C, g: 0x27, b: 0xB0 },
        },
    }
}

/// Display name, coloured when `color` is set
pub fn category_label(category: ExpenseCategory, color: bool) -> String {
    let name = category.display_name();
    if color {
        name.with(category_style(category).color).to_string()
    } else {
        name.to_string()
    }
}

/// Format per-category totals with their share of the overall total
pub fn format_category_totals(totals: &[CategoryTotal], currency: &str, color: bool) -> String {
    if totals.is_empty() {
        return "No expenses to display\n".to_string();
    }

    let overall: f64 = totals.iter().map(|t| t.total_amount).sum();
    let mut output = String::new();

    for total in totals {
        let category = total.category();
        let style = category_style(category);
        // Pad before colouring so escape codes don't skew the column
        let name = format!("{:<10}", category.display_name());
        let name = if color {
            name.with(style.color).to_string()
        } else {
            name
        };

        output.push_str(&format!(
            "{} {} {:>14} {:>6.1}%\n",
            style.symbol,
            name,
            format!("{}{:.2}", currency, total.total_amount),
            percentage_of(total.total_amount, overall)
        ));
    }

    output.push_str(&"-".repeat(40));
    output.push('\n');
    output.push_str(&format!(
        "   {:<10} {:>14}\n",
        "Total",
        format!("{}{:.2}", currency, overall)
    ));

    output
}
