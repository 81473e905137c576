use crate::model::{Amount, Record};
use crate::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// How often an investment recurs.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
pub enum Frequency {
    #[default]
    #[serde(rename = "One-time")]
    OneTime,
    #[serde(rename = "Monthly")]
    Monthly,
    #[serde(rename = "Quarterly")]
    Quarterly,
}

serde_plain::derive_display_from_serialize!(Frequency);
serde_plain::derive_fromstr_from_deserialize!(Frequency);

/// Represents a single row from the Investments collection.
///
/// The frequency cell is stored as its display string (`One-time`, `Monthly`, `Quarterly`) so
/// that a hand-edited sheet still reads; [`Frequency`] constrains CLI input only.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Investment {
    pub date: String,
    #[serde(rename = "type")]
    pub investment_type: String,
    pub amount: Amount,
    pub frequency: String,
    pub notes: String,
    pub other_fields: BTreeMap<String, String>,
}

impl Investment {
    pub fn new(
        date: NaiveDate,
        investment_type: impl Into<String>,
        amount: Amount,
        frequency: Frequency,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            date: date.to_string(),
            investment_type: investment_type.into(),
            amount,
            frequency: frequency.to_string(),
            notes: notes.into(),
            other_fields: BTreeMap::new(),
        }
    }
}

impl Record for Investment {
    fn set_field<S1, S2>(&mut self, header: S1, value: S2) -> Result<()>
    where
        S1: AsRef<str>,
        S2: Into<String>,
    {
        let value = value.into();
        match header.as_ref() {
            DATE_STR => self.date = value,
            TYPE_STR => self.investment_type = value,
            AMOUNT_STR => self.amount = Amount::from_str(&value)?,
            FREQUENCY_STR => self.frequency = value,
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
            TYPE_STR => self.investment_type.clone(),
            AMOUNT_STR => self.amount.to_string(),
            FREQUENCY_STR => self.frequency.clone(),
            NOTES_STR => self.notes.clone(),
            other => self.other_fields.get(other).cloned().unwrap_or_default(),
        }
    }
}

pub(crate) const DATE_STR: &str = "Date";
pub(crate) const TYPE_STR: &str = "Type";
pub(crate) const AMOUNT_STR: &str = "Amount";
pub(crate) const FREQUENCY_STR: &str = "Frequency";
pub(crate) const NOTES_STR: &str = "Notes";

/// The declared header row of the Investments collection.
pub(crate) const HEADERS: [&str; 5] = [DATE_STR, TYPE_STR, AMOUNT_STR, FREQUENCY_STR, NOTES_STR];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_display() {
        assert_eq!(Frequency::OneTime.to_string(), "One-time");
        assert_eq!(Frequency::Monthly.to_string(), "Monthly");
        assert_eq!(Frequency::Quarterly.to_string(), "Quarterly");
    }

    #[test]
    fn test_frequency_from_str() {
        assert_eq!(Frequency::from_str("One-time").unwrap(), Frequency::OneTime);
        assert!(Frequency::from_str("weekly").is_err());
    }

    #[test]
    fn test_to_row() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let investment = Investment::new(
            date,
            "SIP",
            Amount::from_str("5000").unwrap(),
            Frequency::Monthly,
            "index fund",
        );
        assert_eq!(
            investment.to_row(&HEADERS),
            vec!["2024-06-01", "SIP", "5000", "Monthly", "index fund"]
        );
    }
}
