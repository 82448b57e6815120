//! PDF export
//!
//! Lays out an expense table on A4 pages and serializes it as a minimal
//! PDF 1.4 file using the built-in Helvetica fonts. Layout coordinates are
//! measured from the top of the page; they are flipped when serialized.
//!
//! Page 1 carries the title, the generation date and the column header.
//! Continuation pages start at the top margin with rows only. The bold
//! total line follows the last row.

use std::io::Write;

use chrono::NaiveDate;

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::Expense;

pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;

/// Vertical cursor position of the first line on every page
pub const TOP_MARGIN: f32 = 50.0;
/// A row is never started below this cursor position
pub const PAGE_BREAK_Y: f32 = 800.0;
pub const ROW_SPACING: f32 = 15.0;

pub const TITLE_MAX_CHARS: usize = 15;
pub const NOTES_MAX_CHARS: usize = 20;

const LEFT_MARGIN: f32 = 50.0;
const COLUMN_X: [f32; 5] = [50.0, 130.0, 250.0, 350.0, 430.0];
const COLUMN_HEADERS: [&str; 5] = ["Date", "Title", "Category", "Amount", "Notes"];

const TITLE_SIZE: f32 = 18.0;
const SUBTITLE_SIZE: f32 = 12.0;
const HEADER_SIZE: f32 = 10.0;
const ROW_SIZE: f32 = 9.0;

const DATE_FORMAT: &str = "%d/%m/%Y";

/// One positioned line of text
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub x: f32,
    /// Baseline, measured from the top of the page
    pub y: f32,
    pub text: String,
    pub size: f32,
    pub bold: bool,
}

/// Text placed on one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfPage {
    pub items: Vec<TextItem>,
}

impl PdfPage {
    fn text(&mut self, x: f32, y: f32, text: impl Into<String>, size: f32, bold: bool) {
        self.items.push(TextItem {
            x,
            y,
            text: text.into(),
            size,
            bold,
        });
    }

    /// Whether any item on the page has exactly this text
    pub fn contains_text(&self, text: &str) -> bool {
        self.items.iter().any(|item| item.text == text)
    }
}

/// Laid-out expense report
#[derive(Debug, Clone, PartialEq)]
pub struct PdfReport {
    pub pages: Vec<PdfPage>,
    /// Sum of all amounts in the report
    pub total: f64,
}

impl PdfReport {
    /// Lay out `records` in input order
    pub fn build(records: &[Expense], generated_on: NaiveDate, currency: &str) -> Self {
        let mut pages = Vec::new();
        let mut page = PdfPage::default();
        let mut y = TOP_MARGIN;

        page.text(LEFT_MARGIN, y, "Expense Report", TITLE_SIZE, true);
        y += 30.0;
        page.text(
            LEFT_MARGIN,
            y,
            format!("Generated on: {}", generated_on.format(DATE_FORMAT)),
            SUBTITLE_SIZE,
            false,
        );
        y += 40.0;

        for (x, header) in COLUMN_X.iter().zip(COLUMN_HEADERS) {
            page.text(*x, y, header, HEADER_SIZE, true);
        }
        y += 20.0;

        let mut total = 0.0;
        for expense in records {
            if y > PAGE_BREAK_Y {
                pages.push(std::mem::take(&mut page));
                y = TOP_MARGIN;
            }

            let cells = [
                expense.date.format(DATE_FORMAT).to_string(),
                truncate_chars(&expense.title, TITLE_MAX_CHARS),
                expense.category().display_name().to_string(),
                format!("{}{:.2}", currency, expense.amount),
                expense
                    .notes
                    .as_deref()
                    .map(|n| truncate_chars(n, NOTES_MAX_CHARS))
                    .unwrap_or_default(),
            ];
            for (x, cell) in COLUMN_X.iter().zip(cells) {
                page.text(*x, y, cell, ROW_SIZE, false);
            }

            total += expense.amount;
            y += ROW_SPACING;
        }

        y += 20.0;
        page.text(
            COLUMN_X[3],
            y,
            format!("Total: {}{:.2}", currency, total),
            TITLE_SIZE,
            true,
        );
        pages.push(page);

        Self { pages, total }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Serialize the report as PDF bytes
    pub fn to_bytes(&self) -> ExpenseResult<Vec<u8>> {
        let mut out: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = Vec::new();

        // Fixed objects: 1 catalog, 2 page tree, 3 regular font, 4 bold font.
        // Each page then takes two objects: the page and its content stream.
        let page_ids: Vec<usize> = (0..self.pages.len()).map(|i| 5 + i * 2).collect();

        out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

        begin_object(&mut out, &mut offsets, 1)?;
        write_pdf(&mut out, format_args!("<< /Type /Catalog /Pages 2 0 R >>\nendobj\n"))?;

        begin_object(&mut out, &mut offsets, 2)?;
        let kids: Vec<String> = page_ids.iter().map(|id| format!("{} 0 R", id)).collect();
        write_pdf(
            &mut out,
            format_args!(
                "<< /Type /Pages /Kids [{}] /Count {} >>\nendobj\n",
                kids.join(" "),
                page_ids.len()
            ),
        )?;

        for (id, base_font) in [(3, "Helvetica"), (4, "Helvetica-Bold")] {
            begin_object(&mut out, &mut offsets, id)?;
            write_pdf(
                &mut out,
                format_args!(
                    "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>\nendobj\n",
                    base_font
                ),
            )?;
        }

        for (page, page_id) in self.pages.iter().zip(&page_ids) {
            let content_id = page_id + 1;

            begin_object(&mut out, &mut offsets, *page_id)?;
            write_pdf(
                &mut out,
                format_args!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                     /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> \
                     /Contents {} 0 R >>\nendobj\n",
                    PAGE_WIDTH, PAGE_HEIGHT, content_id
                ),
            )?;

            let stream = content_stream(page);
            begin_object(&mut out, &mut offsets, content_id)?;
            write_pdf(&mut out, format_args!("<< /Length {} >>\nstream\n", stream.len()))?;
            out.extend_from_slice(&stream);
            write_pdf(&mut out, format_args!("\nendstream\nendobj\n"))?;
        }

        let xref_offset = out.len();
        write_pdf(
            &mut out,
            format_args!("xref\n0 {}\n0000000000 65535 f \n", offsets.len() + 1),
        )?;
        for offset in &offsets {
            write_pdf(&mut out, format_args!("{:010} 00000 n \n", offset))?;
        }
        write_pdf(
            &mut out,
            format_args!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                offsets.len() + 1,
                xref_offset
            ),
        )?;

        Ok(out)
    }
}

/// Lay out and serialize in one step
pub fn expenses_to_pdf(
    records: &[Expense],
    generated_on: NaiveDate,
    currency: &str,
) -> ExpenseResult<Vec<u8>> {
    PdfReport::build(records, generated_on, currency).to_bytes()
}

/// First `max` characters of `text`
fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn content_stream(page: &PdfPage) -> Vec<u8> {
    let mut stream = Vec::new();
    for item in &page.items {
        let font = if item.bold { "F2" } else { "F1" };
        stream.extend_from_slice(
            format!(
                "BT /{} {} Tf {} {} Td (",
                font,
                item.size,
                item.x,
                PAGE_HEIGHT - item.y
            )
            .as_bytes(),
        );
        stream.extend_from_slice(&encode_text(&item.text));
        stream.extend_from_slice(b") Tj ET\n");
    }
    stream
}

/// Encode text as a PDF literal string body in WinAnsi
///
/// Characters outside Latin-1 become `?`.
fn encode_text(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                bytes.push(b'\\');
                bytes.push(c as u8);
            }
            ' '..='~' => bytes.push(c as u8),
            '\u{a0}'..='\u{ff}' => bytes.extend_from_slice(format!("\\{:03o}", c as u32).as_bytes()),
            _ => bytes.push(b'?'),
        }
    }
    bytes
}

fn begin_object(out: &mut Vec<u8>, offsets: &mut Vec<usize>, id: usize) -> ExpenseResult<()> {
    offsets.push(out.len());
    write_pdf(out, format_args!("{} 0 obj\n", id))
}

fn write_pdf(out: &mut Vec<u8>, args: std::fmt::Arguments<'_>) -> ExpenseResult<()> {
    out.write_fmt(args)
        .map_err(|e| ExpenseError::export("PDF", e.to_string()))
}
