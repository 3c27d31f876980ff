//! A1-notation helpers.

/// Spreadsheet column letter for a 1-based column index (1 → A, 27 → AA).
pub fn column_letter(index: u32) -> String {
    let mut n = index;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Sheet names containing anything but ASCII alphanumerics must be quoted.
pub fn quote_sheet_name(name: &str) -> String {
    if name.chars().all(|c| c.is_ascii_alphanumeric()) {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', "''"))
    }
}

/// `Sheet!A{first_row}:{last_col}{last_row}` spanning `columns` columns.
pub fn a1_range(sheet: &str, columns: u32, first_row: u32, last_row: u32) -> String {
    format!(
        "{}!A{}:{}{}",
        quote_sheet_name(sheet),
        first_row,
        column_letter(columns),
        last_row
    )
}
