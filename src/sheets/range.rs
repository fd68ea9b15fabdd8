//! A1-notation range helpers.
//!
//! Sheets are addressed as `SheetName!A2:H` style ranges. Sheet names
//! containing spaces or quotes must be single-quoted per the A1 grammar.

/// Quote a sheet name for use in an A1 range if it needs quoting.
pub fn quote_sheet(name: &str) -> String {
    let needs_quoting = name
        .chars()
        .any(|c| !(c.is_ascii_alphanumeric() || c == '_'));
    if needs_quoting {
        format!("'{}'", name.replace('\'', "''"))
    } else {
        name.to_string()
    }
}

/// Build a full A1 range for a sheet, e.g. `data_range("My Sheet", "A2:H")`
/// yields `'My Sheet'!A2:H`.
pub fn data_range(sheet: &str, cells: &str) -> String {
    format!("{}!{}", quote_sheet(sheet), cells)
}

/// Range covering all data rows of a sheet (row 1 is the header).
pub fn body_range(sheet: &str, column_count: usize) -> String {
    data_range(sheet, &format!("A2:{}", column_letter(column_count)))
}

/// Range addressing a single data row. `row_index` is zero-based over data
/// rows, so row 0 maps to spreadsheet row 2.
pub fn row_range(sheet: &str, row_index: usize, column_count: usize) -> String {
    let sheet_row = row_index + 2;
    data_range(
        sheet,
        &format!("A{}:{}{}", sheet_row, column_letter(column_count), sheet_row),
    )
}

/// Convert a 1-based column count to its letter, e.g. 1 → A, 26 → Z, 27 → AA.
pub fn column_letter(mut n: usize) -> String {
    debug_assert!(n > 0);
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}
