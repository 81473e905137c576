//! Configuration file handling for paisa.
//!
//! The configuration file is stored at `$PAISA_HOME/config.json` and contains the storage
//! backend choice along with its settings: the Google Sheet URL for the cloud backend, or the
//! book directory for the local CSV backend.

use crate::export::Export;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "paisa";
const CONFIG_VERSION: u8 = 1;
const EXPORT_COPIES: u32 = 5;
const SECRETS: &str = ".secrets";
const EXPORTS: &str = "exports";
const BOOK: &str = "book";
const ACCESS_TOKEN: &str = "access_token";
const CONFIG_JSON: &str = "config.json";

/// The storage backend that holds the record collections.
#[derive(
    Debug, Default, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// A Google spreadsheet, one tab per collection.
    Google,
    /// A local directory of CSV files, one file per collection.
    #[default]
    Csv,
}

serde_plain::derive_display_from_serialize!(Backend);
serde_plain::derive_fromstr_from_deserialize!(Backend);

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$PAISA_HOME` and from there it loads `$PAISA_HOME/config.json`. It provides
/// paths to other items that are either configurable or are expected in a certain location
/// within the paisa home directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    exports: PathBuf,
    secrets: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    spreadsheet_id: String,
}

impl Config {
    /// Creates the data directory and its subdirectories, and writes an initial `config.json`
    /// using the given backend settings.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of the data directory, e.g. `$HOME/paisa`
    /// - `backend` - Which storage backend holds the collections.
    /// - `sheet_url` - The URL of the Google Sheet, required when `backend` is `google`.
    ///   e.g. https://docs.google.com/spreadsheets/d/1a7Km9FxQwRbPt82JvN4LzYpH5OcGnWsT6iDuE3VhMjX
    /// - `book_dir` - Where the CSV book lives; defaults to `<dir>/book`.
    /// - `strict_duplicate_check` - Overrides the duplicate-expense rejection policy. When
    ///   absent, the policy is on for the csv backend and off for google.
    ///
    /// # Errors
    /// - Returns an error if any file operations fail, or if the google backend is chosen
    ///   without a sheet URL.
    pub async fn create(
        dir: impl Into<PathBuf>,
        backend: Backend,
        sheet_url: Option<&str>,
        book_dir: Option<PathBuf>,
        strict_duplicate_check: Option<bool>,
    ) -> Result<Self> {
        let sheet_url = sheet_url.unwrap_or_default();
        if backend == Backend::Google && sheet_url.is_empty() {
            bail!("The google backend requires --sheet-url");
        }

        // Create the directory if it does not exist
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the paisa home directory")?;

        // Canonicalize the directory path
        let root = utils::canonicalize(&maybe_relative).await?;

        // Create the subdirectories
        let exports_dir = root.join(EXPORTS);
        utils::make_dir(&exports_dir).await?;
        let secrets_dir = root.join(SECRETS);
        utils::make_dir(&secrets_dir).await?;

        // Create and save an initial ConfigFile in the data directory
        let config_file = ConfigFile {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            backend,
            sheet_url: sheet_url.to_string(),
            book_dir,
            strict_duplicate_check,
            export_copies: EXPORT_COPIES,
            token_path: None,
        };
        let config_path = root.join(CONFIG_JSON);
        config_file.save(&config_path).await?;

        // Extract the spreadsheet ID from the URL
        let spreadsheet_id = extract_spreadsheet_id(&config_file.sheet_url)
            .context("Failed to extract spreadsheet ID from sheet URL")?
            .to_string();

        let config = Self {
            root,
            exports: exports_dir,
            secrets: secrets_dir,
            config_path,
            config_file,
            spreadsheet_id,
        };

        // Create the book directory for the local backend
        if backend == Backend::Csv {
            utils::make_dir(config.book_dir()).await?;
        }

        Ok(config)
    }

    /// This will
    /// - validate that the `paisa_home` exists and that the config file exists
    /// - load the config file
    /// - validate that the exports and secrets directories exist
    /// - return the loaded configuration object
    pub async fn load(paisa_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = paisa_home.into();
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!(
                "The config file is missing '{}', run 'paisa init' first",
                config_path.display()
            )
        }
        let config_file = ConfigFile::load(&config_path).await?;

        // Extract the spreadsheet ID from the URL
        let spreadsheet_id = extract_spreadsheet_id(&config_file.sheet_url)
            .context("Failed to extract spreadsheet ID from sheet URL")?
            .to_string();

        let config = Self {
            root: root.clone(),
            exports: root.join(EXPORTS),
            secrets: root.join(SECRETS),
            config_path,
            config_file,
            spreadsheet_id,
        };
        if !config.exports.is_dir() {
            bail!(
                "The exports directory is missing '{}'",
                config.exports.display()
            )
        }
        if !config.secrets.is_dir() {
            bail!(
                "The secrets directory is missing '{}'",
                config.secrets.display()
            )
        }
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backend(&self) -> Backend {
        self.config_file.backend
    }

    pub fn exports(&self) -> &Path {
        &self.exports
    }

    pub fn secrets(&self) -> &Path {
        &self.secrets
    }

    pub fn sheet_url(&self) -> &str {
        &self.config_file.sheet_url
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// The directory holding the CSV book. Relative paths resolve against the root.
    pub fn book_dir(&self) -> PathBuf {
        match &self.config_file.book_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => self.root.join(dir),
            None => self.root.join(BOOK),
        }
    }

    /// Whether duplicate expenses are rejected on append. Defaults to on for the csv backend and
    /// off for google unless the config file says otherwise.
    pub fn strict_duplicate_check(&self) -> bool {
        self.config_file
            .strict_duplicate_check
            .unwrap_or(self.backend() == Backend::Csv)
    }

    pub fn export_copies(&self) -> u32 {
        self.config_file.export_copies
    }

    /// Creates a new `Export` instance for writing export files.
    pub fn export(&self) -> Export {
        Export::new(self)
    }

    /// Returns the stored `token_path` if it is absolute, otherwise resolves it against the root.
    pub fn token_path(&self) -> PathBuf {
        let p = self.config_file.token_path();
        if p.is_absolute() {
            return p;
        }
        self.root.join(p)
    }

    /// An identifier for this config's book, used to key in-memory test-mode state.
    pub fn book_id(&self) -> String {
        self.root.display().to_string()
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "paisa",
///   "config_version": 1,
///   "backend": "google",
///   "sheet_url": "https://docs.google.com/spreadsheets/d/7KpXm2RfZwNJgs84QhVYno5DU6iM9Wlr3bCzAv1txRpL",
///   "export_copies": 5
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "paisa"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// The storage backend holding the collections
    backend: Backend,

    /// URL to the Google Sheet, empty for the csv backend
    #[serde(default)]
    sheet_url: String,

    /// Directory of the CSV book (optional, relative to the home directory or absolute).
    /// Defaults to $PAISA_HOME/book if not specified
    #[serde(skip_serializing_if = "Option::is_none")]
    book_dir: Option<PathBuf>,

    /// Overrides the duplicate-expense rejection policy (optional). When absent the policy
    /// follows the backend: on for csv, off for google
    #[serde(skip_serializing_if = "Option::is_none")]
    strict_duplicate_check: Option<bool>,

    /// Number of rotated export files to keep
    export_copies: u32,

    /// Path to the Google OAuth access token file (optional, relative to the home directory or
    /// absolute). Defaults to $PAISA_HOME/.secrets/access_token if not specified
    #[serde(skip_serializing_if = "Option::is_none")]
    token_path: Option<PathBuf>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            backend: Backend::default(),
            sheet_url: String::new(),
            book_dir: None,
            strict_duplicate_check: None,
            export_copies: EXPORT_COPIES,
            token_path: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = utils::read(path).await?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        // Validate app_name
        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }

    /// Gets the token path.
    ///
    /// If the path is relative, it should be interpreted as relative to the home directory.
    /// If None, defaults to $PAISA_HOME/.secrets/access_token
    pub fn token_path(&self) -> PathBuf {
        self.token_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(SECRETS).join(ACCESS_TOKEN))
    }
}

/// Extracts the spreadsheet ID from a Google Sheets URL
///
/// # Arguments
/// * `url` - The Google Sheets URL (e.g., "https://docs.google.com/spreadsheets/d/SPREADSHEET_ID/...")
///
/// # Returns
/// The spreadsheet ID or an error if the URL format is invalid. Returns an empty string if the
/// URL is empty (the csv backend has no sheet URL).
fn extract_spreadsheet_id(url: &str) -> Result<&str> {
    // Handle empty URL case
    if url.is_empty() {
        return Ok(url);
    }

    // URL format: https://docs.google.com/spreadsheets/d/SPREADSHEET_ID/...
    // or: https://docs.google.com/spreadsheets/d/SPREADSHEET_ID?foo=bar
    let parts: Vec<&str> = url.split('/').collect();
    for (i, part) in parts.iter().enumerate() {
        if *part == "d" && i + 1 < parts.len() {
            // Extract the ID and remove any query parameters or fragments
            let id_part = parts[i + 1];
            let id = id_part
                .split('?')
                .next()
                .unwrap_or(id_part)
                .split('#')
                .next()
                .unwrap_or(id_part);
            return Ok(id);
        }
    }
    Err(anyhow::anyhow!(
        "Invalid Google Sheets URL format. Expected: https://docs.google.com/spreadsheets/d/SPREADSHEET_ID"
    ))
}
