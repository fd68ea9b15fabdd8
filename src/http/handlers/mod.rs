//! Request handlers.
//!
//! Handlers are thin: validate the payload, call the adapter or auth flow,
//! shape a `{"success": true, ...}` JSON body. All failure paths go through
//! `ApiError`.

pub mod auth;
pub mod dashboard;
pub mod invoices;
pub mod records;

use crate::http::error::ApiResult;
use crate::sheets::{range, SheetsClient};

/// Read every data row of a sheet and parse it with `parse`.
///
/// Rows the parser rejects are skipped with a warning; a human-edited sheet
/// routinely contains half-filled rows and they must not break reads.
pub async fn load_all<T>(
    sheets: &SheetsClient,
    sheet: &str,
    columns: usize,
    parse: impl Fn(&[String]) -> Option<T>,
) -> ApiResult<Vec<T>> {
    let rows = sheets.get_values(&range::body_range(sheet, columns)).await?;
    let mut parsed = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        match parse(row) {
            Some(record) => parsed.push(record),
            None => {
                // Blank padding rows at the bottom of a sheet are expected
                if row.iter().any(|c| !c.trim().is_empty()) {
                    tracing::warn!(sheet = %sheet, row = index + 2, "Skipping malformed row");
                }
            }
        }
    }
    Ok(parsed)
}

/// Like [`load_all`], but degrades to an empty list when the spreadsheet
/// call fails. Used by listing endpoints where an empty page beats a 500.
pub async fn load_all_or_empty<T>(
    sheets: &SheetsClient,
    sheet: &str,
    columns: usize,
    parse: impl Fn(&[String]) -> Option<T>,
) -> Vec<T> {
    match load_all(sheets, sheet, columns, parse).await {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(sheet = %sheet, error = %e, "Sheet read failed, returning empty list");
            Vec::new()
        }
    }
}
