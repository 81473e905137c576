//! The two user-editable vocabularies: expense categories and investment types.
//!
//! Each vocabulary lives in its own single-column collection. The first load of an empty
//! vocabulary seeds it with a fixed default list and writes the defaults back, so later loads
//! read user-visible history rather than baked-in values.

use crate::store::{Collection, RecordStore};
use crate::Result;
use serde::{Deserialize, Serialize};

/// The default expense categories, seeded on first use.
pub const EXPENSE_CATEGORY_DEFAULTS: [&str; 6] =
    ["Food", "Transport", "Shopping", "Donation", "Bills", "Other"];

/// The default investment types, seeded on first use.
pub const INVESTMENT_TYPE_DEFAULTS: [&str; 6] =
    ["Salary", "SIP", "FD", "Stocks", "Chit Fund", "Other"];

/// Which of the two vocabularies is being addressed.
#[derive(
    Debug, Default, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    #[default]
    Expense,
    Investment,
}

serde_plain::derive_display_from_serialize!(CategoryKind);
serde_plain::derive_fromstr_from_deserialize!(CategoryKind);

impl CategoryKind {
    /// The collection that backs this vocabulary.
    pub fn collection(&self) -> Collection {
        match self {
            CategoryKind::Expense => Collection::ExpenseCategories,
            CategoryKind::Investment => Collection::InvestmentCategories,
        }
    }

    /// The fixed default list for this vocabulary.
    pub fn defaults(&self) -> &'static [&'static str] {
        match self {
            CategoryKind::Expense => &EXPENSE_CATEGORY_DEFAULTS,
            CategoryKind::Investment => &INVESTMENT_TYPE_DEFAULTS,
        }
    }
}

/// Returns the current entries in storage order, seeding the defaults into storage first when the
/// vocabulary is empty.
pub async fn load(store: &mut RecordStore, kind: CategoryKind) -> Result<Vec<String>> {
    store.ensure_collection(kind.collection()).await?;
    let table = store.read_all(kind.collection()).await?;
    if table.is_empty() {
        let defaults: Vec<Vec<String>> = kind
            .defaults()
            .iter()
            .map(|value| vec![value.to_string()])
            .collect();
        store.rewrite_all(kind.collection(), defaults).await?;
        return Ok(kind.defaults().iter().map(|value| value.to_string()).collect());
    }
    Ok(table
        .rows
        .into_iter()
        .map(|row| row.into_iter().next().unwrap_or_default())
        .collect())
}

/// Appends `value` when it is non-blank after trimming and not already present (exact string
/// match). Returns whether the value was added; a blank or duplicate value is a no-op, not an
/// error.
pub async fn add(store: &mut RecordStore, kind: CategoryKind, value: &str) -> Result<bool> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(false);
    }
    let current = load(store, kind).await?;
    if current.iter().any(|entry| entry == value) {
        return Ok(false);
    }
    store
        .append(kind.collection(), vec![value.to_string()])
        .await?;
    Ok(true)
}
