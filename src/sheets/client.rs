//! Spreadsheet REST client with timeout and error handling.
//!
//! # Responsibilities
//! - Read named ranges into rows of cell strings
//! - Append and overwrite rows via the `values` endpoints
//! - Locate-and-patch a row by key column
//! - Surface upstream failures as typed errors, single round trip, no retry

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::config::SheetsConfig;
use crate::sheets::range;

/// Errors that can occur while talking to the spreadsheet backend.
#[derive(Debug, thiserror::Error)]
pub enum SheetsError {
    /// Transport-level failure (connect, TLS, read).
    #[error("sheets transport error: {0}")]
    Http(String),

    /// Request exceeded the configured timeout.
    #[error("sheets request timed out after {0} seconds")]
    Timeout(u64),

    /// Upstream answered with a non-success status.
    #[error("sheets API returned {code}: {body}")]
    Status { code: u16, body: String },

    /// Response body did not match the expected shape.
    #[error("sheets response decode error: {0}")]
    Decode(String),

    /// Client misconfiguration (bad base URL).
    #[error("sheets configuration error: {0}")]
    Config(String),
}

/// Result type for spreadsheet operations.
pub type SheetsResult<T> = Result<T, SheetsError>;

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Option<Vec<Vec<Value>>>,
}

#[derive(Debug, Serialize)]
struct ValueRangeBody<'a> {
    values: &'a [Vec<String>],
}

/// Typed client over the spreadsheet `values` REST endpoints.
#[derive(Clone)]
pub struct SheetsClient {
    http: reqwest::Client,
    config: SheetsConfig,
}

impl SheetsClient {
    /// Create a new client for the configured spreadsheet.
    pub fn new(config: SheetsConfig) -> SheetsResult<Self> {
        Url::parse(&config.api_base)
            .map_err(|e| SheetsError::Config(format!("invalid api_base '{}': {}", config.api_base, e)))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SheetsError::Config(e.to_string()))?;
        Ok(Self { http, config })
    }

    fn values_url(&self, range: &str, suffix: Option<&str>) -> SheetsResult<Url> {
        let mut url = Url::parse(&self.config.api_base)
            .map_err(|e| SheetsError::Config(e.to_string()))?;
        let last = match suffix {
            Some(s) => format!("{}:{}", range, s),
            None => range.to_string(),
        };
        url.path_segments_mut()
            .map_err(|_| SheetsError::Config("api_base cannot be a base URL".to_string()))?
            .push("spreadsheets")
            .push(&self.config.spreadsheet_id)
            .push("values")
            .push(&last);
        if !self.config.api_key.is_empty() {
            url.query_pairs_mut().append_pair("key", &self.config.api_key);
        }
        Ok(url)
    }

    fn map_send_error(&self, e: reqwest::Error) -> SheetsError {
        if e.is_timeout() {
            SheetsError::Timeout(self.config.timeout_secs)
        } else {
            SheetsError::Http(e.to_string())
        }
    }

    async fn check_status(response: reqwest::Response) -> SheetsResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(SheetsError::Status {
            code: status.as_u16(),
            body,
        })
    }

    /// Read a named range into rows of cell strings.
    ///
    /// A response without a `values` field means the range is empty, which
    /// is reported as zero rows, not as an error.
    pub async fn get_values(&self, range: &str) -> SheetsResult<Vec<Vec<String>>> {
        let url = self.values_url(range, None)?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let response = Self::check_status(response).await?;
        let body: ValueRange = response
            .json()
            .await
            .map_err(|e| SheetsError::Decode(e.to_string()))?;

        let rows = body
            .values
            .unwrap_or_default()
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect();
        Ok(rows)
    }

    /// Append rows after the last data row of a range.
    pub async fn append(&self, range: &str, rows: &[Vec<String>]) -> SheetsResult<()> {
        let mut url = self.values_url(range, Some("append"))?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED");
        let response = self
            .http
            .post(url)
            .json(&ValueRangeBody { values: rows })
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        Self::check_status(response).await?;
        tracing::debug!(range = %range, rows = rows.len(), "Appended rows");
        Ok(())
    }

    /// Overwrite the cells of a range.
    pub async fn update(&self, range: &str, rows: &[Vec<String>]) -> SheetsResult<()> {
        let mut url = self.values_url(range, None)?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED");
        let response = self
            .http
            .put(url)
            .json(&ValueRangeBody { values: rows })
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        Self::check_status(response).await?;
        tracing::debug!(range = %range, "Updated range");
        Ok(())
    }

    /// Locate the row whose `key_column` cell equals `key` and overwrite the
    /// given cells in it. Returns `false` when no row matches.
    ///
    /// Read-then-write with no locking; concurrent writers can lose updates.
    /// The spreadsheet offers no transactional primitive to prevent this.
    pub async fn update_by_key(
        &self,
        sheet: &str,
        column_count: usize,
        key_column: usize,
        key: &str,
        patch: &[(usize, String)],
    ) -> SheetsResult<bool> {
        let rows = self.get_values(&range::body_range(sheet, column_count)).await?;
        let found = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.get(key_column).map(|c| c.trim()) == Some(key));

        let (row_index, row) = match found {
            Some(hit) => hit,
            None => return Ok(false),
        };

        let mut updated: Vec<String> = (0..column_count)
            .map(|i| row.get(i).cloned().unwrap_or_default())
            .collect();
        for (column, value) in patch {
            if *column < updated.len() {
                updated[*column] = value.clone();
            }
        }

        self.update(
            &range::row_range(sheet, row_index, column_count),
            &[updated],
        )
        .await?;
        Ok(true)
    }

    /// Get the configuration.
    pub fn config(&self) -> &SheetsConfig {
        &self.config
    }
}

fn cell_to_string(cell: Value) -> String {
    match cell {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl std::fmt::Debug for SheetsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsClient")
            .field("api_base", &self.config.api_base)
            .field("spreadsheet_id", &self.config.spreadsheet_id)
            .field("timeout_secs", &self.config.timeout_secs)
            .finish()
    }
}
