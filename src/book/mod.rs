//! Storage backends for the book that holds the record collections.
//!
//! A "book" is a set of named sheets, each holding a header row plus data rows. The production
//! backends are a Google spreadsheet (one tab per collection) and a local CSV book (one file per
//! collection); an in-memory backend exists so the whole app can run without touching disk or
//! the Google APIs.

mod csv_book;
mod google;
mod memory;

pub use google::ACCESS_TOKEN_ENV;

pub(crate) use csv_book::CsvBook;
pub(crate) use google::GoogleBook;
pub(crate) use memory::MemoryBook;

use crate::config::Backend;
use crate::{Config, Result};

/// The environment variable that switches the program into in-memory test mode.
pub const PAISA_IN_TEST_MODE: &str = "PAISA_IN_TEST_MODE";

/// Selects between the configured backend and the in-memory test backend.
#[derive(Default, Debug, Copy, Clone, Eq, PartialEq)]
pub enum Mode {
    #[default]
    Live,
    Test,
}

impl Mode {
    /// When `PAISA_IN_TEST_MODE` is set and non-zero in length, the mode is `Test`, otherwise it
    /// is `Live`.
    pub fn from_env() -> Self {
        match std::env::var(PAISA_IN_TEST_MODE) {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Live,
        }
    }
}

/// A book of named sheets. Implementations persist sheets however they like; the record store
/// only ever sees rows of strings.
#[async_trait::async_trait]
pub(crate) trait Book: Send {
    /// Returns every row of the named sheet, header row included, or `None` when the sheet does
    /// not exist in the book.
    async fn get(&mut self, sheet_name: &str) -> Result<Option<Vec<Vec<String>>>>;

    /// Replaces the entire contents of the named sheet, header row included, with `rows`.
    async fn put(&mut self, sheet_name: &str, rows: &[Vec<String>]) -> Result<()>;

    /// Adds `row` after the last row of the named sheet. The sheet must exist.
    async fn append(&mut self, sheet_name: &str, row: &[String]) -> Result<()>;

    /// Creates the named sheet, empty. A no-op when it already exists.
    async fn create_sheet(&mut self, sheet_name: &str) -> Result<()>;
}

/// Opens the configured backend, or the in-memory book when test mode is active.
pub(crate) async fn open(config: &Config, mode: Mode) -> Result<Box<dyn Book>> {
    if mode == Mode::Test {
        return Ok(Box::new(MemoryBook::new(config.book_id())));
    }
    match config.backend() {
        Backend::Google => Ok(Box::new(GoogleBook::new(config.clone()).await?)),
        Backend::Csv => Ok(Box::new(CsvBook::new(config.book_dir()))),
    }
}
