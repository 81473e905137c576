//! The record store: named collections of flat records with a header-plus-rows layout,
//! persisted through a [`Book`] backend.
//!
//! Records have no stable identity; a row's position is its only handle. Edits and deletions are
//! therefore rewrite-on-write: the caller reads the full collection, mutates its in-memory copy
//! and rewrites every data row. Two sessions mutating the same collection race, and the last
//! rewrite wins.

use crate::book::{Book, Mode};
use crate::error::StoreError;
use crate::model::month_key_of;
use crate::model::{expense, investment, medicine};
use crate::{book, Config, Result};
use anyhow::bail;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The named collections of a paisa book.
#[derive(
    Debug, Default, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
pub enum Collection {
    #[default]
    Expenses,
    Medicines,
    Investments,
    ExpenseCategories,
    InvestmentCategories,
}

serde_plain::derive_display_from_serialize!(Collection);
serde_plain::derive_fromstr_from_deserialize!(Collection);

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Expenses,
        Collection::Medicines,
        Collection::Investments,
        Collection::ExpenseCategories,
        Collection::InvestmentCategories,
    ];

    /// The sheet name of this collection in the backing book.
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Expenses => "Expenses",
            Collection::Medicines => "Medicines",
            Collection::Investments => "Investments",
            Collection::ExpenseCategories => "ExpenseCategories",
            Collection::InvestmentCategories => "InvestmentCategories",
        }
    }

    /// The declared header row.
    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            Collection::Expenses => &expense::HEADERS,
            Collection::Medicines => &medicine::HEADERS,
            Collection::Investments => &investment::HEADERS,
            Collection::ExpenseCategories => &["Category"],
            Collection::InvestmentCategories => &["Type"],
        }
    }

    /// Whether the first column of this collection holds record dates.
    pub fn has_dates(&self) -> bool {
        matches!(
            self,
            Collection::Expenses | Collection::Medicines | Collection::Investments
        )
    }

    fn header_row(&self) -> Vec<String> {
        self.headers().iter().map(|h| h.to_string()).collect()
    }
}

/// A collection's contents as read from the backing book.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Table {
    /// The stored header row.
    pub headers: Vec<String>,
    /// The data rows, in storage order.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// An empty table carrying the collection's declared headers.
    pub fn empty(collection: Collection) -> Self {
        Self {
            headers: collection.header_row(),
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Durable storage of the named record collections.
pub struct RecordStore {
    book: Box<dyn Book>,
    strict_duplicate_check: bool,
}

impl RecordStore {
    pub(crate) fn new(book: Box<dyn Book>, strict_duplicate_check: bool) -> Self {
        Self {
            book,
            strict_duplicate_check,
        }
    }

    /// Opens the configured backend and wraps it in a store.
    pub async fn open(config: &Config, mode: Mode) -> Result<Self> {
        let book = book::open(config, mode).await?;
        Ok(Self::new(book, config.strict_duplicate_check()))
    }

    /// Creates the collection with its declared header if absent, otherwise does nothing.
    pub async fn ensure_collection(&mut self, collection: Collection) -> Result<()> {
        match self.book.get(collection.name()).await? {
            None => {
                self.book.create_sheet(collection.name()).await?;
                self.book
                    .put(collection.name(), &[collection.header_row()])
                    .await
            }
            Some(rows) if rows.is_empty() => {
                self.book
                    .put(collection.name(), &[collection.header_row()])
                    .await
            }
            Some(_) => Ok(()),
        }
    }

    /// Returns every record currently stored, in storage order. An initialized collection with no
    /// data rows yields an empty table that still carries the declared headers. Reading a
    /// collection that was never initialized fails with [`StoreError::CollectionNotFound`]; any
    /// other read failure degrades to an empty default-shaped table with a warning, favoring
    /// availability over error visibility.
    pub async fn read_all(&mut self, collection: Collection) -> Result<Table> {
        let rows = match self.book.get(collection.name()).await {
            Ok(Some(rows)) => rows,
            Ok(None) => {
                return Err(StoreError::CollectionNotFound(collection.to_string()).into());
            }
            Err(e) => {
                warn!("Could not read '{collection}', treating it as empty: {e}");
                return Ok(Table::empty(collection));
            }
        };
        let mut rows = rows.into_iter();
        let headers = match rows.next() {
            Some(headers) => headers,
            None => return Ok(Table::empty(collection)),
        };
        let rows = rows
            .filter(|row| !row.iter().all(|cell| cell.trim().is_empty()))
            .collect();
        Ok(Table { headers, rows })
    }

    /// Adds one record at the end of the collection and persists it immediately.
    ///
    /// For the Expenses collection the derived `Month` cell is overwritten from the `Date` cell
    /// first, and, when the `strict_duplicate_check` policy is active, a row whose
    /// (Date, Amount, Category, Notes) cells exactly match an existing row is rejected with
    /// [`StoreError::DuplicateRecord`], leaving the collection unchanged.
    pub async fn append(&mut self, collection: Collection, mut row: Vec<String>) -> Result<()> {
        let existing = self.read_all(collection).await?;
        derive_fields(collection, &mut row)?;
        if self.strict_duplicate_check
            && collection == Collection::Expenses
            && existing.rows.iter().any(|r| is_same_expense(r, &row))
        {
            return Err(StoreError::DuplicateRecord(collection.to_string()).into());
        }
        self.book.append(collection.name(), &row).await
    }

    /// Replaces the entire collection's data rows, never the header. Used for edit-in-place and
    /// delete-by-position, because no stable row identifier exists.
    pub async fn rewrite_all(
        &mut self,
        collection: Collection,
        rows: Vec<Vec<String>>,
    ) -> Result<()> {
        // Errors with CollectionNotFound when uninitialized, and keeps the stored header.
        let existing = self.read_all(collection).await?;
        let mut all = Vec::with_capacity(rows.len() + 1);
        all.push(existing.headers);
        for mut row in rows {
            derive_fields(collection, &mut row)?;
            all.push(row);
        }
        self.book.put(collection.name(), &all).await
    }

    /// Removes the record at zero-based position `index`, preserving the relative order of the
    /// remaining records.
    pub async fn delete_at(&mut self, collection: Collection, index: usize) -> Result<()> {
        let table = self.read_all(collection).await?;
        if index >= table.rows.len() {
            bail!(
                "Row index {index} is out of range; '{collection}' has {} rows",
                table.rows.len()
            );
        }
        let mut rows = table.rows;
        rows.remove(index);
        self.rewrite_all(collection, rows).await
    }
}

/// Overwrites the derived `Month` cell of an expense row from its `Date` cell. Rows of other
/// collections pass through untouched.
fn derive_fields(collection: Collection, row: &mut Vec<String>) -> Result<()> {
    if collection != Collection::Expenses {
        return Ok(());
    }
    let date = row.get(expense::DATE_IDX).cloned().unwrap_or_default();
    let month = month_key_of(&date)?;
    while row.len() <= expense::MONTH_IDX {
        row.push(String::new());
    }
    row[expense::MONTH_IDX] = month;
    Ok(())
}

/// Exact, case-sensitive equality over the (Date, Amount, Category, Notes) cells.
fn is_same_expense(existing: &[String], candidate: &[String]) -> bool {
    (0..expense::DUPLICATE_KEY_LEN).all(|ix| {
        existing.get(ix).map(String::as_str).unwrap_or("")
            == candidate.get(ix).map(String::as_str).unwrap_or("")
    })
}
