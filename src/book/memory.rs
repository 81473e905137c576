//! Implements the `Book` trait using in-memory data.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the
//! whole app, top-to-bottom, without using Google Sheets or the filesystem.

use crate::book::Book;
use crate::Result;
use anyhow::bail;
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

type SheetMap = HashMap<String, Vec<Vec<String>>>;

/// Process-wide state for in-memory books, keyed by book id. Keeping the state global lets
/// separately opened stores in the same process (as happens in tests and in test-mode command
/// runs) observe each other's writes.
fn registry() -> &'static Mutex<HashMap<String, SheetMap>> {
    static REGISTRY: OnceLock<Mutex<HashMap<String, SheetMap>>> = OnceLock::new();
    REGISTRY.get_or_init(Default::default)
}

/// An implementation of the `Book` trait that holds its sheets in memory.
pub(crate) struct MemoryBook {
    id: String,
}

impl MemoryBook {
    /// Creates a handle onto the in-memory book identified by `id`. The underlying state is
    /// created empty on first use and shared by every handle with the same id.
    pub(crate) fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let mut registry = registry().lock().expect("memory book registry poisoned");
        registry.entry(id.clone()).or_default();
        Self { id }
    }

    /// Returns a copy of the book's current sheets.
    #[cfg(test)]
    pub(crate) fn get_state(&self) -> SheetMap {
        let registry = registry().lock().expect("memory book registry poisoned");
        registry.get(&self.id).cloned().unwrap_or_default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut SheetMap) -> T) -> T {
        let mut registry = registry().lock().expect("memory book registry poisoned");
        f(registry.entry(self.id.clone()).or_default())
    }
}

#[async_trait::async_trait]
impl Book for MemoryBook {
    async fn get(&mut self, sheet_name: &str) -> Result<Option<Vec<Vec<String>>>> {
        Ok(self.with_state(|sheets| sheets.get(sheet_name).cloned()))
    }

    async fn put(&mut self, sheet_name: &str, rows: &[Vec<String>]) -> Result<()> {
        self.with_state(|sheets| {
            sheets.insert(sheet_name.to_string(), rows.to_vec());
        });
        Ok(())
    }

    async fn append(&mut self, sheet_name: &str, row: &[String]) -> Result<()> {
        self.with_state(|sheets| match sheets.get_mut(sheet_name) {
            Some(rows) => {
                rows.push(row.to_vec());
                Ok(())
            }
            None => bail!("Sheet '{sheet_name}' not found"),
        })
    }

    async fn create_sheet(&mut self, sheet_name: &str) -> Result<()> {
        self.with_state(|sheets| {
            sheets.entry(sheet_name.to_string()).or_default();
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_sheet_is_none() {
        let mut book = MemoryBook::new("test_get_missing_sheet_is_none");
        assert!(book.get("Expenses").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let mut book = MemoryBook::new("test_put_then_get");
        let rows = vec![vec!["Category".to_string()], vec!["Food".to_string()]];
        book.put("ExpenseCategories", &rows).await.unwrap();
        assert_eq!(
            book.get("ExpenseCategories").await.unwrap().unwrap(),
            rows
        );
        assert!(book.get_state().contains_key("ExpenseCategories"));
    }

    #[tokio::test]
    async fn test_append_requires_sheet() {
        let mut book = MemoryBook::new("test_append_requires_sheet");
        let row = vec!["Food".to_string()];
        assert!(book.append("ExpenseCategories", &row).await.is_err());
        book.create_sheet("ExpenseCategories").await.unwrap();
        book.append("ExpenseCategories", &row).await.unwrap();
        assert_eq!(
            book.get("ExpenseCategories").await.unwrap().unwrap(),
            vec![row]
        );
    }

    #[tokio::test]
    async fn test_handles_share_state_by_id() {
        let mut a = MemoryBook::new("test_handles_share_state_by_id");
        a.create_sheet("Medicines").await.unwrap();
        let mut b = MemoryBook::new("test_handles_share_state_by_id");
        assert!(b.get("Medicines").await.unwrap().is_some());
    }
}
