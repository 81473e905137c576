use crate::model::month::month_key;
use crate::model::{Amount, Record};
use crate::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Represents a single row from the Expenses collection.
///
/// The `month` field is derived from `date` by the record store on every write; it is carried
/// here so that a read round-trips, but setting it has no lasting effect.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Expense {
    pub date: String,
    pub amount: Amount,
    pub category: String,
    pub notes: String,
    pub month: String,
    /// Cells under headers this program does not know about. Kept so that a rewrite does not
    /// drop columns a user added to the sheet by hand.
    pub other_fields: BTreeMap<String, String>,
}

impl Expense {
    pub fn new(
        date: NaiveDate,
        amount: Amount,
        category: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            date: date.to_string(),
            amount,
            category: category.into(),
            notes: notes.into(),
            month: month_key(date),
            other_fields: BTreeMap::new(),
        }
    }
}

impl Record for Expense {
    fn set_field<S1, S2>(&mut self, header: S1, value: S2) -> Result<()>
    where
        S1: AsRef<str>,
        S2: Into<String>,
    {
        let value = value.into();
        match header.as_ref() {
            DATE_STR => self.date = value,
            AMOUNT_STR => self.amount = Amount::from_str(&value)?,
            CATEGORY_STR => self.category = value,
            NOTES_STR => self.notes = value,
            MONTH_STR => self.month = value,
            other => {
                let _ = self.other_fields.insert(other.to_string(), value);
            }
        }
        Ok(())
    }

    fn get_field(&self, header: &str) -> String {
        match header {
            DATE_STR => self.date.clone(),
            AMOUNT_STR => self.amount.to_string(),
            CATEGORY_STR => self.category.clone(),
            NOTES_STR => self.notes.clone(),
            MONTH_STR => self.month.clone(),
            other => self.other_fields.get(other).cloned().unwrap_or_default(),
        }
    }
}

pub(crate) const DATE_STR: &str = "Date";
pub(crate) const AMOUNT_STR: &str = "Amount";
pub(crate) const CATEGORY_STR: &str = "Category";
pub(crate) const NOTES_STR: &str = "Notes";
pub(crate) const MONTH_STR: &str = "Month";

/// The declared header row of the Expenses collection.
pub(crate) const HEADERS: [&str; 5] = [DATE_STR, AMOUNT_STR, CATEGORY_STR, NOTES_STR, MONTH_STR];

/// Column position of the date cell within [`HEADERS`].
pub(crate) const DATE_IDX: usize = 0;

/// Column position of the derived month cell within [`HEADERS`].
pub(crate) const MONTH_IDX: usize = 4;

/// The number of leading columns that participate in the duplicate check: (Date, Amount,
/// Category, Notes).
pub(crate) const DUPLICATE_KEY_LEN: usize = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_month() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        let expense = Expense::new(date, Amount::from_str("120").unwrap(), "Food", "");
        assert_eq!(expense.date, "2024-06-05");
        assert_eq!(expense.month, "June 2024");
    }

    #[test]
    fn test_to_row_follows_header_order() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        let expense = Expense::new(date, Amount::from_str("120").unwrap(), "Food", "lunch");
        let row = expense.to_row(&HEADERS);
        assert_eq!(row, vec!["2024-06-05", "120", "Food", "lunch", "June 2024"]);
    }

    #[test]
    fn test_unknown_header_round_trips() {
        let mut expense = Expense::default();
        expense.set_field("Paid By", "cash").unwrap();
        assert_eq!(expense.get_field("Paid By"), "cash");
        assert_eq!(expense.get_field("Something Else"), "");
    }
}
