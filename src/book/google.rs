//! Implements the `Book` trait using the `sheets::Client` to interact with a Google spreadsheet.

use crate::book::Book;
use crate::{utils, Config, Result};
use anyhow::Context;
use sheets::types::{
    BatchClearValuesRequest, BatchUpdateSpreadsheetRequest, BatchUpdateValuesRequest,
    DateTimeRenderOption, Dimension, InsertDataOption, ValueInputOption, ValueRange,
    ValueRenderOption,
};
use sheets::ClientError;
use tracing::trace;

/// The environment variable that can supply the Google OAuth access token directly, taking
/// precedence over the token file in the secrets directory.
pub const ACCESS_TOKEN_ENV: &str = "PAISA_ACCESS_TOKEN";

/// Implements the `Book` trait using the `sheets::Client` to interact with a Google spreadsheet,
/// one tab per collection. Obtaining and refreshing the OAuth token is outside this program; the
/// token is taken from the environment or from a file and used as-is.
pub(crate) struct GoogleBook {
    config: Config,
    client: sheets::Client,
}

impl GoogleBook {
    pub(crate) async fn new(config: Config) -> Result<Self> {
        let token = access_token(&config).await?;
        // The sheets crate wants client_id, client_secret and redirect_uri, but plain API calls
        // only need the access token.
        let client = sheets::Client::new(
            String::new(),
            String::new(),
            String::new(),
            token,
            String::new(),
        );
        Ok(Self { config, client })
    }

    /// Lists the titles of the tabs currently in the spreadsheet.
    async fn sheet_titles(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .spreadsheets()
            .get(self.config.spreadsheet_id(), false, &[])
            .await
            .map_err(map_client_error)
            .context("Failed to fetch the spreadsheet metadata")?;
        Ok(response
            .body
            .sheets
            .iter()
            .filter_map(|sheet| sheet.properties.as_ref())
            .map(|properties| properties.title.clone())
            .collect())
    }
}

#[async_trait::async_trait]
impl Book for GoogleBook {
    async fn get(&mut self, sheet_name: &str) -> Result<Option<Vec<Vec<String>>>> {
        trace!("get for {sheet_name}");
        let range = format!("{sheet_name}!A:ZZ"); // Get all columns
        let response = match self
            .client
            .spreadsheets()
            .values_get(
                self.config.spreadsheet_id(),
                &range,
                DateTimeRenderOption::FormattedString,
                Dimension::Rows,
                ValueRenderOption::FormattedValue,
            )
            .await
        {
            Ok(response) => response,
            // The API reports a missing tab as a range parse failure.
            Err(e) if e.to_string().contains("Unable to parse range") => return Ok(None),
            Err(e) => {
                return Err(map_client_error(e))
                    .with_context(|| format!("Failed to fetch {sheet_name} sheet data"))
            }
        };
        Ok(Some(response.body.values))
    }

    async fn put(&mut self, sheet_name: &str, rows: &[Vec<String>]) -> Result<()> {
        trace!("put for {sheet_name}");
        let clear = BatchClearValuesRequest {
            ranges: vec![format!("{sheet_name}!A:ZZ")],
        };
        self.client
            .spreadsheets()
            .values_batch_clear(self.config.spreadsheet_id(), &clear)
            .await
            .map_err(map_client_error)
            .with_context(|| format!("Failed to clear the {sheet_name} sheet"))?;

        if rows.is_empty() {
            return Ok(());
        }

        let request = BatchUpdateValuesRequest {
            data: vec![ValueRange {
                major_dimension: Some(Dimension::Rows),
                range: format!("{sheet_name}!A1"),
                values: rows.to_vec(),
            }],
            include_values_in_response: Some(false),
            response_date_time_render_option: None,
            response_value_render_option: None,
            value_input_option: Some(ValueInputOption::UserEntered),
        };
        self.client
            .spreadsheets()
            .values_batch_update(self.config.spreadsheet_id(), &request)
            .await
            .map_err(map_client_error)
            .with_context(|| format!("Failed to write the {sheet_name} sheet"))?;
        Ok(())
    }

    async fn append(&mut self, sheet_name: &str, row: &[String]) -> Result<()> {
        trace!("append for {sheet_name}");
        let range = format!("{sheet_name}!A:ZZ");
        let body = ValueRange {
            major_dimension: Some(Dimension::Rows),
            range: range.clone(),
            values: vec![row.to_vec()],
        };
        self.client
            .spreadsheets()
            .values_append(
                self.config.spreadsheet_id(),
                &range,
                false,
                InsertDataOption::InsertRows,
                DateTimeRenderOption::FormattedString,
                ValueRenderOption::FormattedValue,
                ValueInputOption::UserEntered,
                &body,
            )
            .await
            .map_err(map_client_error)
            .with_context(|| format!("Failed to append to the {sheet_name} sheet"))?;
        Ok(())
    }

    async fn create_sheet(&mut self, sheet_name: &str) -> Result<()> {
        if self.sheet_titles().await?.iter().any(|t| t == sheet_name) {
            return Ok(());
        }
        // The generated `Request` type has dozens of optional fields and no `Default`, so the
        // addSheet request is built from JSON.
        let request: BatchUpdateSpreadsheetRequest = serde_json::from_value(serde_json::json!({
            "requests": [{ "addSheet": { "properties": { "title": sheet_name } } }]
        }))
        .context("Failed to build the addSheet request")?;
        self.client
            .spreadsheets()
            .batch_update(self.config.spreadsheet_id(), &request)
            .await
            .map_err(map_client_error)
            .with_context(|| format!("Failed to create the {sheet_name} sheet"))?;
        Ok(())
    }
}

/// Resolves the OAuth access token: the environment variable wins, otherwise the token file
/// under the secrets directory is read.
async fn access_token(config: &Config) -> Result<String> {
    if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV) {
        if !token.is_empty() {
            return Ok(token);
        }
    }
    let path = config.token_path();
    let token = utils::read(&path).await.with_context(|| {
        format!(
            "No Google access token found. Set {ACCESS_TOKEN_ENV} or place a token at {}",
            path.display()
        )
    })?;
    Ok(token.trim().to_string())
}

fn map_client_error(e: ClientError) -> anyhow::Error {
    let error_name = match &e {
        ClientError::EmptyRefreshToken => "EmptyRefreshToken".to_string(),
        ClientError::FromUtf8Error(inner) => format!("FromUtf8Error {inner}"),
        ClientError::UrlParserError(inner) => format!("UrlParserError {inner}"),
        ClientError::SerdeJsonError(inner) => format!("SerdeJsonError {inner}"),
        ClientError::ReqwestError(inner) => format!("ReqwestError {inner}"),
        ClientError::InvalidHeaderValue(inner) => format!("InvalidHeaderValue {inner}"),
        ClientError::ReqwestMiddleWareError(inner) => format!("ReqwestMiddleWareError {inner}"),
        ClientError::HttpError { .. } => "HttpError".to_string(),
        ClientError::Other(_) => "Other".to_string(),
    };
    anyhow::Error::new(e).context(error_name)
}
