//! The `"Month Year"` display key that groups records by calendar month.

use crate::Result;
use anyhow::Context;
use chrono::NaiveDate;

/// The storage format for date cells.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Formats a date as its month key, e.g. `2024-03-09` becomes `March 2024`.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

/// Parses a stored `YYYY-MM-DD` date cell and returns its month key.
pub fn month_key_of(date_cell: &str) -> Result<String> {
    let date = NaiveDate::parse_from_str(date_cell.trim(), DATE_FORMAT)
        .with_context(|| format!("'{date_cell}' is not a YYYY-MM-DD date"))?;
    Ok(month_key(date))
}

/// Whether the date cell falls inside the month named by `month`. A cell that cannot be parsed
/// does not match any month.
pub fn matches_month(date_cell: &str, month: &str) -> bool {
    month_key_of(date_cell).map(|key| key == month).unwrap_or(false)
}
