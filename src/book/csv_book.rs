//! Implements the `Book` trait over a directory of CSV files, one file per sheet.

use crate::book::Book;
use crate::{utils, Result};
use anyhow::{bail, Context};
use std::io::Cursor;
use std::path::PathBuf;

/// A local book: a directory containing one `<Sheet>.csv` file per collection.
pub(crate) struct CsvBook {
    dir: PathBuf,
}

impl CsvBook {
    pub(crate) fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn sheet_path(&self, sheet_name: &str) -> PathBuf {
        self.dir.join(format!("{sheet_name}.csv"))
    }
}

#[async_trait::async_trait]
impl Book for CsvBook {
    async fn get(&mut self, sheet_name: &str) -> Result<Option<Vec<Vec<String>>>> {
        let path = self.sheet_path(sheet_name);
        if !path.is_file() {
            return Ok(None);
        }
        let contents = utils::read(&path).await?;
        let rows = parse_csv(&contents)
            .with_context(|| format!("Failed to parse sheet file {}", path.display()))?;
        Ok(Some(rows))
    }

    async fn put(&mut self, sheet_name: &str, rows: &[Vec<String>]) -> Result<()> {
        let path = self.sheet_path(sheet_name);
        let data = write_csv(rows)
            .with_context(|| format!("Failed to serialize sheet '{sheet_name}'"))?;
        utils::write(&path, data).await
    }

    async fn append(&mut self, sheet_name: &str, row: &[String]) -> Result<()> {
        let path = self.sheet_path(sheet_name);
        if !path.is_file() {
            bail!("Sheet '{sheet_name}' not found");
        }
        let file = std::fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .with_context(|| format!("Unable to open {} for append", path.display()))?;
        let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(file);
        writer
            .write_record(row)
            .with_context(|| format!("Unable to append to sheet '{sheet_name}'"))?;
        writer
            .flush()
            .with_context(|| format!("Unable to flush sheet '{sheet_name}'"))?;
        Ok(())
    }

    async fn create_sheet(&mut self, sheet_name: &str) -> Result<()> {
        utils::make_dir(&self.dir).await?;
        let path = self.sheet_path(sheet_name);
        if !path.is_file() {
            utils::write(&path, "").await?;
        }
        Ok(())
    }
}

/// Loads rows from a CSV-formatted string. The header row is treated as part of the data.
fn parse_csv(csv_data: &str) -> Result<Vec<Vec<String>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(Cursor::new(csv_data.as_bytes()));

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(|field| field.to_string()).collect());
    }
    Ok(rows)
}

/// Serializes rows to CSV bytes, header row included.
fn write_csv(rows: &[Vec<String>]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(vec![]);
    for row in rows {
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Unable to finish the CSV writer: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_get_missing_sheet_is_none() {
        let dir = TempDir::new().unwrap();
        let mut book = CsvBook::new(dir.path());
        assert!(book.get("Expenses").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_put_get_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut book = CsvBook::new(dir.path().join("book"));
        book.create_sheet("Expenses").await.unwrap();
        assert_eq!(book.get("Expenses").await.unwrap().unwrap(), Vec::<Vec<String>>::new());

        let rows = vec![
            vec!["Date", "Amount", "Category", "Notes", "Month"],
            vec!["2024-06-01", "120", "Food", "lunch, with tea", "June 2024"],
        ]
        .into_iter()
        .map(|r| r.into_iter().map(String::from).collect::<Vec<String>>())
        .collect::<Vec<Vec<String>>>();
        book.put("Expenses", &rows).await.unwrap();
        assert_eq!(book.get("Expenses").await.unwrap().unwrap(), rows);
    }

    #[tokio::test]
    async fn test_append() {
        let dir = TempDir::new().unwrap();
        let mut book = CsvBook::new(dir.path());
        book.create_sheet("ExpenseCategories").await.unwrap();
        book.put(
            "ExpenseCategories",
            &[vec!["Category".to_string()], vec!["Food".to_string()]],
        )
        .await
        .unwrap();
        book.append("ExpenseCategories", &[String::from("Travel")])
            .await
            .unwrap();
        let rows = book.get("ExpenseCategories").await.unwrap().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2], vec!["Travel".to_string()]);
    }

    #[tokio::test]
    async fn test_append_requires_sheet() {
        let dir = TempDir::new().unwrap();
        let mut book = CsvBook::new(dir.path());
        let row = vec!["Travel".to_string()];
        assert!(book.append("ExpenseCategories", &row).await.is_err());
    }
}
