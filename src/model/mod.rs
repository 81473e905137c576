//! Types that represent the core data model, such as `Expense` and `Investment`.
pub(crate) mod expense;
pub(crate) mod investment;
pub(crate) mod medicine;
pub(crate) mod month;

mod amount;
mod items;

pub use amount::{Amount, AmountError};
pub use expense::Expense;
pub use investment::{Frequency, Investment};
pub use items::{Items, Record};
pub use medicine::Medicine;
pub use month::{matches_month, month_key, month_key_of, DATE_FORMAT};

use serde::{Deserialize, Serialize};

/// Represents the three record collections of a paisa book, as used by the export file.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BookData {
    /// Rows of data from the Expenses collection.
    pub expenses: Items<Expense>,
    /// Rows of data from the Medicines collection.
    pub medicines: Items<Medicine>,
    /// Rows of data from the Investments collection.
    pub investments: Items<Investment>,
}
