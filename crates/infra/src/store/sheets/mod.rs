//! Google Sheets backend.
//!
//! The sheet is the inventory: its first row holds the column headers, every
//! other row is one product. Reads go through `values.get`, appends through
//! `values.append` with `INSERT_ROWS` so a new row always lands after the
//! last one.

pub mod auth;

use async_trait::async_trait;
use reqwest::{Response, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tokio::sync::OnceCell;

use super::rows::rows_from_table;
use super::{InventoryStore, StoreError, StoreRow};

pub use auth::{ServiceAccountKey, TokenSource};

pub const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Extract the spreadsheet id from a share URL
/// (`https://docs.google.com/spreadsheets/d/<id>/edit?...`) or accept a bare id.
pub fn spreadsheet_id(input: &str) -> Result<String, StoreError> {
    let input = input.trim();
    let candidate = match input.split_once("/spreadsheets/d/") {
        Some((_, rest)) => rest
            .split(|c: char| c == '/' || c == '?' || c == '#')
            .next()
            .unwrap_or(""),
        None => input,
    };

    let valid = !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(candidate.to_string())
    } else {
        Err(StoreError::Config(format!(
            "not a spreadsheet URL or id: '{input}'"
        )))
    }
}

/// A1 range covering a whole worksheet: `'Title'` with quotes doubled.
pub fn worksheet_range(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

fn cell_text(value: JsonValue) -> String {
    match value {
        JsonValue::String(s) => s,
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<JsonValue>>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Debug, Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

/// Spreadsheet-backed store.
///
/// Constructed once and shared; the worksheet title is resolved on first use
/// and the access token is cached inside [`TokenSource`].
#[derive(Debug)]
pub struct SheetsStore {
    http: reqwest::Client,
    api_base: String,
    spreadsheet_id: String,
    worksheet: OnceCell<String>,
    tokens: TokenSource,
}

impl SheetsStore {
    /// `spreadsheet` is a share URL or an id. `worksheet` defaults to the first sheet.
    pub fn new(
        spreadsheet: &str,
        worksheet: Option<String>,
        key: ServiceAccountKey,
    ) -> Result<Self, StoreError> {
        let worksheet = match worksheet.filter(|w| !w.trim().is_empty()) {
            Some(title) => OnceCell::new_with(Some(title)),
            None => OnceCell::new(),
        };
        Ok(Self {
            http: reqwest::Client::new(),
            api_base: SHEETS_API_BASE.to_string(),
            spreadsheet_id: spreadsheet_id(spreadsheet)?,
            worksheet,
            tokens: TokenSource::new(key)?,
        })
    }

    /// Point at a different API root (used against a local stand-in in tests).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    fn url(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| StoreError::Config(format!("invalid API base '{}': {e}", self.api_base)))?;
        url.path_segments_mut()
            .map_err(|_| StoreError::Config(format!("API base '{}' cannot take a path", self.api_base)))?
            .push(&self.spreadsheet_id)
            .extend(segments);
        Ok(url)
    }

    async fn checked<T: DeserializeOwned>(resp: Response) -> Result<T, StoreError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json().await?);
        }
        let body = resp.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            Err(StoreError::Auth(format!("{status}: {body}")))
        } else {
            Err(StoreError::Api {
                status: status.as_u16(),
                body,
            })
        }
    }

    async fn worksheet_title(&self) -> Result<&str, StoreError> {
        let title = self
            .worksheet
            .get_or_try_init(|| async {
                let mut url = self.url(&[])?;
                url.query_pairs_mut().append_pair("fields", "sheets.properties.title");

                let token = self.tokens.bearer(&self.http).await?;
                let resp = self.http.get(url).bearer_auth(token).send().await?;
                let meta: SpreadsheetMeta = Self::checked(resp).await?;

                let first = meta
                    .sheets
                    .into_iter()
                    .next()
                    .ok_or_else(|| StoreError::malformed("spreadsheet has no worksheets"))?;
                tracing::info!(spreadsheet = %self.spreadsheet_id, worksheet = %first.properties.title, "resolved worksheet");
                Ok::<_, StoreError>(first.properties.title)
            })
            .await?;
        Ok(title.as_str())
    }
}

#[async_trait]
impl InventoryStore for SheetsStore {
    async fn read_all(&self) -> Result<Vec<StoreRow>, StoreError> {
        let range = worksheet_range(self.worksheet_title().await?);
        let mut url = self.url(&["values", &range])?;
        url.query_pairs_mut()
            .append_pair("valueRenderOption", "FORMATTED_VALUE")
            .append_pair("majorDimension", "ROWS");

        let token = self.tokens.bearer(&self.http).await?;
        let resp = self.http.get(url).bearer_auth(token).send().await?;
        let range: ValueRange = Self::checked(resp).await?;

        let table = range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect();
        let rows = rows_from_table(table);
        tracing::debug!(spreadsheet = %self.spreadsheet_id, rows = rows.len(), "read sheet");
        Ok(rows)
    }

    async fn append(&self, values: Vec<String>) -> Result<(), StoreError> {
        let range = worksheet_range(self.worksheet_title().await?);
        let mut url = self.url(&["values", &format!("{range}:append")])?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");

        let token = self.tokens.bearer(&self.http).await?;
        let resp = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&serde_json::json!({ "values": [values] }))
            .send()
            .await?;
        let _: JsonValue = Self::checked(resp).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "sheets"
    }
}
