//! Cell-to-field coercion.
//!
//! Spreadsheet cells arrive as untyped strings entered by humans. The rules
//! here are deliberately lenient: currency symbols and thousands separators
//! are stripped from numbers, dates accept RFC 3339 with a date-only
//! fallback, and an empty cell is "absent" rather than an error.

use chrono::{DateTime, NaiveDate, Utc};

/// View over a single spreadsheet row that yields typed cells by position.
pub struct Row<'a> {
    cells: &'a [String],
}

impl<'a> Row<'a> {
    pub fn new(cells: &'a [String]) -> Self {
        Self { cells }
    }

    /// Raw cell content, trimmed; `None` when the cell is missing or empty.
    pub fn text(&self, idx: usize) -> Option<&'a str> {
        let cell = self.cells.get(idx)?.trim();
        if cell.is_empty() {
            None
        } else {
            Some(cell)
        }
    }

    /// Cell content or empty string when absent.
    pub fn text_or_empty(&self, idx: usize) -> String {
        self.text(idx).unwrap_or_default().to_string()
    }

    /// Parse a monetary/numeric cell, tolerating "GHS 1,250.50" style input.
    pub fn number(&self, idx: usize) -> Option<f64> {
        parse_number(self.text(idx)?)
    }

    /// Parse a timestamp cell. Accepts RFC 3339 and bare `YYYY-MM-DD`.
    pub fn timestamp(&self, idx: usize) -> Option<DateTime<Utc>> {
        parse_timestamp(self.text(idx)?)
    }
}

/// Parse a numeric cell, ignoring everything that is not part of a number.
pub fn parse_number(cell: &str) -> Option<f64> {
    let cleaned: String = cell
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse().ok()
}

/// Parse a timestamp cell.
pub fn parse_timestamp(cell: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(cell) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(cell, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
