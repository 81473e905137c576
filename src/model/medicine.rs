use crate::model::{Amount, Record};
use crate::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Represents a single row from the Medicines collection.
///
/// The quantity cell is kept as a string for storage fidelity; it is validated as a positive
/// integer at submission, not at read time.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Medicine {
    pub date: String,
    pub medicine: String,
    pub quantity: String,
    pub cost: Amount,
    pub notes: String,
    pub other_fields: BTreeMap<String, String>,
}

impl Medicine {
    pub fn new(
        date: NaiveDate,
        medicine: impl Into<String>,
        quantity: u32,
        cost: Amount,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            date: date.to_string(),
            medicine: medicine.into(),
            quantity: quantity.to_string(),
            cost,
            notes: notes.into(),
            other_fields: BTreeMap::new(),
        }
    }
}

impl Record for Medicine {
    fn set_field<S1, S2>(&mut self, header: S1, value: S2) -> Result<()>
    where
        S1: AsRef<str>,
        S2: Into<String>,
    {
        let value = value.into();
        match header.as_ref() {
            DATE_STR => self.date = value,
            MEDICINE_STR => self.medicine = value,
            QUANTITY_STR => self.quantity = value,
            COST_STR => self.cost = Amount::from_str(&value)?,
            NOTES_STR => self.notes = value,
            other => {
                let _ = self.other_fields.insert(other.to_string(), value);
            }
        }
        Ok(())
    }

    fn get_field(&self, header: &str) -> String {
        match header {
            DATE_STR => self.date.clone(),
            MEDICINE_STR => self.medicine.clone(),
            QUANTITY_STR => self.quantity.clone(),
            COST_STR => self.cost.to_string(),
            NOTES_STR => self.notes.clone(),
            other => self.other_fields.get(other).cloned().unwrap_or_default(),
        }
    }
}

pub(crate) const DATE_STR: &str = "Date";
pub(crate) const MEDICINE_STR: &str = "Medicine";
pub(crate) const QUANTITY_STR: &str = "Quantity";
pub(crate) const COST_STR: &str = "Cost";
pub(crate) const NOTES_STR: &str = "Notes";

/// The declared header row of the Medicines collection.
pub(crate) const HEADERS: [&str; 5] = [DATE_STR, MEDICINE_STR, QUANTITY_STR, COST_STR, NOTES_STR];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_row() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 11).unwrap();
        let medicine = Medicine::new(date, "Paracetamol", 2, Amount::from_str("45").unwrap(), "");
        assert_eq!(
            medicine.to_row(&HEADERS),
            vec!["2024-02-11", "Paracetamol", "2", "45", ""]
        );
    }

    #[test]
    fn test_junk_quantity_survives_a_read() {
        let mut medicine = Medicine::default();
        medicine.set_field(QUANTITY_STR, "a few").unwrap();
        assert_eq!(medicine.quantity, "a few");
    }
}
