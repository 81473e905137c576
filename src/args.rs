//! These structs provide the CLI interface for the paisa CLI.

use crate::categories::CategoryKind;
use crate::config::Backend;
use crate::model::{Amount, Frequency};
use crate::store::Collection;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// paisa: A command-line tracker for household finances.
///
/// The purpose of this program is to keep three kinds of records (expenses, medicine purchases,
/// investments) in a spreadsheet you can also open by hand: either a Google sheet (one tab per
/// collection) or a local book of CSV files (one file per collection). Each collection has a
/// fixed header row; rows are addressed by the position shown in `paisa query`, and edits and
/// deletions rewrite the full collection.
///
/// Run `paisa init` once to create the data directory, then use insert, query, update, delete,
/// summary and export.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and initialize the configuration and collections.
    ///
    /// This is the first command you should run. Choose a storage backend:
    ///
    /// - csv (the default): records are kept in a local book of CSV files, by default at
    ///   $PAISA_HOME/book.
    ///
    /// - google: records are kept in a Google sheet. Pass the sheet URL as --sheet-url and make
    ///   an OAuth access token available, either in the PAISA_ACCESS_TOKEN environment variable
    ///   or in $PAISA_HOME/.secrets/access_token.
    Init(InitArgs),
    /// Insert a new expense, medicine purchase, investment, or category value.
    Insert(InsertArgs),
    /// Print a collection as a table, with the row numbers used by update and delete.
    Query(QueryArgs),
    /// Update one row of a collection in place.
    Update(UpdateArgs),
    /// Delete one row of a collection by its row number.
    Delete(DeleteArgs),
    /// Print the summary for one month: salary, investments, expenses and savings.
    Summary(SummaryArgs),
    /// Write the record collections to a single book file.
    Export(ExportArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber crate for instructions.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where paisa data and configuration is held. Defaults to ~/paisa
    #[arg(long, env = "PAISA_HOME", default_value_t = default_paisa_home())]
    home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf) -> Self {
        Self {
            log_level,
            home: home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// Args for the `paisa init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The storage backend holding the record collections.
    #[arg(long, value_enum, default_value_t = Backend::Csv)]
    pub backend: Backend,

    /// The URL of your Google sheet, required for the google backend. It looks like this:
    /// https://docs.google.com/spreadsheets/d/1a7Km9FxQwRbPt82JvN4LzYpH5OcGnWsT6iDuE3VhMjX
    #[arg(long)]
    pub sheet_url: Option<String>,

    /// The directory holding the CSV book. Defaults to $PAISA_HOME/book.
    #[arg(long)]
    pub book_dir: Option<PathBuf>,

    /// Overrides the duplicate-expense rejection policy, which is otherwise on for the csv
    /// backend and off for google.
    #[arg(long)]
    pub strict_duplicate_check: Option<bool>,
}

/// Args for the `paisa insert` command.
#[derive(Debug, Parser, Clone)]
pub struct InsertArgs {
    #[command(subcommand)]
    entity: InsertSubcommand,
}

impl InsertArgs {
    pub fn entity(&self) -> &InsertSubcommand {
        &self.entity
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum InsertSubcommand {
    /// Record an expense.
    Expense(InsertExpenseArgs),
    /// Record a medicine purchase.
    Medicine(InsertMedicineArgs),
    /// Record an investment.
    Investment(InsertInvestmentArgs),
    /// Add an entry to one of the category lists.
    Category(InsertCategoryArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct InsertExpenseArgs {
    /// The date of the expense, YYYY-MM-DD.
    #[arg(long)]
    pub date: NaiveDate,

    /// The amount spent, in rupees. Must be greater than zero.
    #[arg(long)]
    pub amount: Amount,

    /// The expense category. New categories can be added with `paisa insert category`.
    #[arg(long)]
    pub category: String,

    /// Free-form notes (optional).
    #[arg(long, default_value = "")]
    pub notes: String,
}

#[derive(Debug, Parser, Clone)]
pub struct InsertMedicineArgs {
    /// The date of purchase, YYYY-MM-DD.
    #[arg(long)]
    pub date: NaiveDate,

    /// The medicine name.
    #[arg(long)]
    pub medicine: String,

    /// How many units were purchased. Must be at least 1.
    #[arg(long)]
    pub quantity: u32,

    /// The cost, in rupees.
    #[arg(long)]
    pub cost: Amount,

    /// Free-form notes (optional).
    #[arg(long, default_value = "")]
    pub notes: String,
}

#[derive(Debug, Parser, Clone)]
pub struct InsertInvestmentArgs {
    /// The date of the investment, YYYY-MM-DD.
    #[arg(long)]
    pub date: NaiveDate,

    /// The investment type. New types can be added with `paisa insert category`.
    #[arg(long = "type")]
    pub investment_type: String,

    /// The amount invested, in rupees. Must be greater than zero.
    #[arg(long)]
    pub amount: Amount,

    /// How often the investment recurs.
    #[arg(long, value_enum, default_value = "one-time")]
    pub frequency: Frequency,

    /// Free-form notes (optional).
    #[arg(long, default_value = "")]
    pub notes: String,
}

#[derive(Debug, Parser, Clone)]
pub struct InsertCategoryArgs {
    /// Which category list to add to.
    #[arg(long, value_enum)]
    pub kind: CategoryKind,

    /// The value to add. Leading and trailing whitespace is trimmed; a blank or already-present
    /// value is silently ignored.
    pub value: String,
}

/// The collections that `paisa query` can display.
#[derive(
    Debug, Default, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum QueryEntity {
    #[default]
    Expenses,
    Medicines,
    Investments,
    ExpenseCategories,
    InvestmentTypes,
}

serde_plain::derive_display_from_serialize!(QueryEntity);
serde_plain::derive_fromstr_from_deserialize!(QueryEntity);

impl QueryEntity {
    pub fn collection(&self) -> Collection {
        match self {
            QueryEntity::Expenses => Collection::Expenses,
            QueryEntity::Medicines => Collection::Medicines,
            QueryEntity::Investments => Collection::Investments,
            QueryEntity::ExpenseCategories => Collection::ExpenseCategories,
            QueryEntity::InvestmentTypes => Collection::InvestmentCategories,
        }
    }
}

/// Args for the `paisa query` command.
#[derive(Debug, Parser, Clone)]
pub struct QueryArgs {
    /// The collection to display.
    #[arg(value_enum)]
    pub entity: QueryEntity,

    /// Only show records whose date falls in this month, e.g. "June 2024". Ignored for the
    /// category lists.
    #[arg(long)]
    pub month: Option<String>,
}

/// Args for the `paisa update` command.
#[derive(Debug, Parser, Clone)]
pub struct UpdateArgs {
    #[command(subcommand)]
    entity: UpdateSubcommand,
}

impl UpdateArgs {
    pub fn entity(&self) -> &UpdateSubcommand {
        &self.entity
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum UpdateSubcommand {
    /// Update one expense row.
    Expense(UpdateExpenseArgs),
    /// Update one medicine row.
    Medicine(UpdateMedicineArgs),
    /// Update one investment row.
    Investment(UpdateInvestmentArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct UpdateExpenseArgs {
    /// The row number, as shown by `paisa query expenses`.
    #[arg(long)]
    pub row: usize,

    /// A new date, YYYY-MM-DD. The Month column is recomputed from it.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// A new amount, in rupees. Must be greater than zero.
    #[arg(long)]
    pub amount: Option<Amount>,

    /// A new category.
    #[arg(long)]
    pub category: Option<String>,

    /// New notes.
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Debug, Parser, Clone)]
pub struct UpdateMedicineArgs {
    /// The row number, as shown by `paisa query medicines`.
    #[arg(long)]
    pub row: usize,

    /// A new date, YYYY-MM-DD.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// A new medicine name.
    #[arg(long)]
    pub medicine: Option<String>,

    /// A new quantity. Must be at least 1.
    #[arg(long)]
    pub quantity: Option<u32>,

    /// A new cost, in rupees.
    #[arg(long)]
    pub cost: Option<Amount>,

    /// New notes.
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Debug, Parser, Clone)]
pub struct UpdateInvestmentArgs {
    /// The row number, as shown by `paisa query investments`.
    #[arg(long)]
    pub row: usize,

    /// A new date, YYYY-MM-DD.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// A new investment type.
    #[arg(long = "type")]
    pub investment_type: Option<String>,

    /// A new amount, in rupees. Must be greater than zero.
    #[arg(long)]
    pub amount: Option<Amount>,

    /// A new frequency.
    #[arg(long, value_enum)]
    pub frequency: Option<Frequency>,

    /// New notes.
    #[arg(long)]
    pub notes: Option<String>,
}

/// The record types that `paisa delete` can remove rows from.
#[derive(
    Debug, Default, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum RecordEntity {
    #[default]
    Expense,
    Medicine,
    Investment,
}

serde_plain::derive_display_from_serialize!(RecordEntity);
serde_plain::derive_fromstr_from_deserialize!(RecordEntity);

impl RecordEntity {
    pub fn collection(&self) -> Collection {
        match self {
            RecordEntity::Expense => Collection::Expenses,
            RecordEntity::Medicine => Collection::Medicines,
            RecordEntity::Investment => Collection::Investments,
        }
    }
}

/// Args for the `paisa delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The record type to delete from.
    #[arg(value_enum)]
    pub entity: RecordEntity,

    /// The row number, as shown by `paisa query`.
    #[arg(long)]
    pub row: usize,
}

/// Args for the `paisa summary` command.
#[derive(Debug, Parser, Clone)]
pub struct SummaryArgs {
    /// The month to summarize, e.g. "June 2024".
    #[arg(long)]
    pub month: String,
}

/// Args for the `paisa export` command.
#[derive(Debug, Parser, Clone)]
pub struct ExportArgs {
    /// Write to this file instead of a rotated file under $PAISA_HOME/exports.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

fn default_paisa_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("paisa"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or PAISA_HOME instead of relying on the default paisa \
                home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("paisa")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
