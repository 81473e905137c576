use crate::store::Table;
use crate::Result;
use anyhow::bail;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A record type that can be read from and written to a collection row by header name.
pub trait Record {
    /// Given the `header` name and the `value`, set the appropriate struct field.
    fn set_field<S1, S2>(&mut self, header: S1, value: S2) -> Result<()>
    where
        S1: AsRef<str>,
        S2: Into<String>;

    /// Given the `header` name, retrieve the appropriate struct field value.
    fn get_field(&self, header: &str) -> String;

    /// Given the order of the `headers`, convert the struct field values to a `Vec<String>` where
    /// the values appear in the right order according to the `headers` order.
    fn to_row<S: AsRef<str>>(&self, headers: &[S]) -> Vec<String> {
        headers.iter().map(|h| self.get_field(h.as_ref())).collect()
    }
}

/// The rows of one collection parsed into typed records, along with the header row they came from.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[serde(bound(deserialize = "I: DeserializeOwned"))]
pub struct Items<I>
where
    I: Default + Debug + Clone + Eq + PartialEq + Serialize + DeserializeOwned + Record,
{
    headers: Vec<String>,
    data: Vec<I>,
}

impl<I> Items<I>
where
    I: Default + Debug + Clone + Eq + PartialEq + Serialize + DeserializeOwned + Record,
{
    /// Parses a collection's rows, where the first row is the header row. Rows whose cells are
    /// all blank are skipped; a row longer than the header row is an error.
    pub fn parse<S, R>(rows: impl IntoIterator<Item = R>) -> Result<Self>
    where
        S: Into<String>,
        R: IntoIterator<Item = S>,
    {
        let mut rows = rows.into_iter();
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row.into_iter().map(|s| s.into()).collect(),
            None => bail!("An empty data set cannot be parsed into an Items object"),
        };

        let mut data = Vec::new();
        for (row_ix, row) in rows.enumerate() {
            let values: Vec<String> = row.into_iter().map(|s| s.into()).collect();
            if values.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            if values.len() > headers.len() {
                bail!(
                    "A row longer than the headers list was encountered at row {}",
                    row_ix + 2
                );
            }
            let mut item = I::default();
            for (ix, value) in values.into_iter().enumerate() {
                item.set_field(&headers[ix], value)?;
            }
            data.push(item);
        }
        Ok(Self { headers, data })
    }

    /// Parses a [`Table`] as returned by the record store.
    pub fn from_table(table: &Table) -> Result<Self> {
        let mut rows = vec![table.headers.clone()];
        rows.extend(table.rows.iter().cloned());
        Self::parse(rows)
    }

    /// Converts the records back to rows suitable for writing to a collection. The first returned
    /// row is the header row.
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        let mut rows = vec![self.headers.clone()];
        rows.extend(self.data.iter().map(|item| item.to_row(&self.headers)));
        rows
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn data(&self) -> &[I] {
        &self.data
    }
}
