//! Export of the record collections to a single downloadable book file.
//!
//! The export file is a pretty-printed JSON rendering of [`BookData`]: each collection appears
//! as a named sheet with its header row and every current record, no styling.

use crate::model::BookData;
use crate::{utils, Config, Result};
use anyhow::Context;
use chrono::Local;
use std::path::PathBuf;

/// Prefix for rotated export files.
pub const EXPORT_PREFIX: &str = "paisa-book";

/// Manages export file creation and rotation.
///
/// The `Export` struct is immutable and owns copies of the paths and settings it needs. Create a
/// new instance via `Config::export()` or `Export::new()`.
#[derive(Debug, Clone)]
pub struct Export {
    exports_dir: PathBuf,
    export_copies: u32,
}

impl Export {
    /// Creates a new `Export` instance from a `Config`.
    pub fn new(config: &Config) -> Self {
        Self {
            exports_dir: config.exports().to_path_buf(),
            export_copies: config.export_copies(),
        }
    }

    /// Saves `BookData` as a pretty-printed JSON export file.
    ///
    /// The filename format is `paisa-book.YYYY-MM-DD-NNN.json` where NNN is a sequence number.
    /// Automatically rotates old exports, keeping only `export_copies` files.
    ///
    /// Returns the path to the created export file.
    pub async fn save_json(&self, data: &BookData) -> Result<PathBuf> {
        let date = today();
        let seq = self.next_sequence_number(&date).await?;
        let filename = format!("{EXPORT_PREFIX}.{date}-{seq:03}.json");
        let path = self.exports_dir.join(&filename);

        let json =
            serde_json::to_string_pretty(data).context("Failed to serialize BookData to JSON")?;
        utils::write(&path, json).await?;

        self.rotate().await?;

        Ok(path)
    }

    /// Scans the exports directory for existing files with today's date and returns the next
    /// sequence number.
    async fn next_sequence_number(&self, date: &str) -> Result<u32> {
        let mut max_seq: u32 = 0;

        let mut dir = utils::read_dir(&self.exports_dir).await?;
        while let Some(entry) = dir
            .next_entry()
            .await
            .context("Failed to read directory entry")?
        {
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            if let Some(seq) = parse_sequence_number(&name, date) {
                max_seq = max_seq.max(seq);
            }
        }

        Ok(max_seq + 1)
    }

    /// Rotates old export files, keeping only `export_copies` of them.
    async fn rotate(&self) -> Result<()> {
        let mut files: Vec<(PathBuf, String)> = Vec::new();

        let mut dir = utils::read_dir(&self.exports_dir).await?;
        while let Some(entry) = dir
            .next_entry()
            .await
            .context("Failed to read directory entry")?
        {
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy().to_string();
            if is_export_file(&name) {
                files.push((entry.path(), name));
            }
        }

        // Sorting by filename sorts by date and sequence number due to the format.
        files.sort_by(|a, b| a.1.cmp(&b.1));

        let to_delete = files.len().saturating_sub(self.export_copies as usize);
        for (path, _) in files.into_iter().take(to_delete) {
            utils::remove(&path).await?;
        }

        Ok(())
    }
}

/// Returns today's date in YYYY-MM-DD format.
fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Parses the sequence number from an export filename with the given date. Returns None if the
/// filename doesn't match the expected pattern.
fn parse_sequence_number(filename: &str, date: &str) -> Option<u32> {
    let expected_start = format!("{EXPORT_PREFIX}.{date}-");
    let remainder = filename.strip_prefix(&expected_start)?;
    let seq_str = remainder.strip_suffix(".json")?;
    seq_str.parse().ok()
}

/// Checks if a filename is an export file.
fn is_export_file(filename: &str) -> bool {
    filename.starts_with(&format!("{EXPORT_PREFIX}.")) && filename.ends_with(".json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sequence_number() {
        assert_eq!(
            parse_sequence_number("paisa-book.2025-12-14-001.json", "2025-12-14"),
            Some(1)
        );
        assert_eq!(
            parse_sequence_number("paisa-book.2025-12-14-042.json", "2025-12-14"),
            Some(42)
        );
        // Wrong date
        assert_eq!(
            parse_sequence_number("paisa-book.2025-12-13-001.json", "2025-12-14"),
            None
        );
        // Wrong prefix
        assert_eq!(
            parse_sequence_number("backup.2025-12-14-001.json", "2025-12-14"),
            None
        );
        // Not a json file
        assert_eq!(
            parse_sequence_number("paisa-book.2025-12-14-001.csv", "2025-12-14"),
            None
        );
    }

    #[test]
    fn test_is_export_file() {
        assert!(is_export_file("paisa-book.2025-12-14-001.json"));
        assert!(!is_export_file("config.json"));
        assert!(!is_export_file("paisa-book.2025-12-14-001.csv"));
    }
}
