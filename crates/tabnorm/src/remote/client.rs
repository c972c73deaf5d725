//! Blocking HTTP client for the table service.

use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::{Client, Response};
use tracing::{debug, warn};

use crate::error::{NormalizeError, Result};
use crate::export::UploadRequest;
use crate::input::RowSet;

use super::service::{RemoteTable, TableService};

/// Base URL used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:4000";

/// Environment variable holding the service base URL.
pub const API_URL_ENV: &str = "TABNORM_API_URL";

/// Client for `/api/tablas`, `/api/tabla/{name}` and `/api/upload`.
pub struct RemoteClient {
    client: Client,
    base_url: Url,
}

impl RemoteClient {
    /// Create a client for the service at `base_url`.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| NormalizeError::Config(format!("Invalid API URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(NormalizeError::Config(format!(
                "API URL '{}' cannot be used as a base",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| NormalizeError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Create a client from `TABNORM_API_URL`, falling back to localhost.
    pub fn from_env() -> Result<Self> {
        let url = std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(&url)
    }

    /// The service base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `<base>/<segments...>` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn check(operation: &str, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        warn!(operation, %status, "Remote service returned an error");
        Err(NormalizeError::Remote(format!(
            "{} failed ({}): {}",
            operation, status, body
        )))
    }
}

impl TableService for RemoteClient {
    fn list_tables(&self) -> Result<Vec<RemoteTable>> {
        let url = self.endpoint(&["api", "tablas"]);
        debug!(%url, "Listing remote tables");

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| NormalizeError::Remote(format!("list tables request failed: {}", e)))?;

        Self::check("list tables", response)?
            .json()
            .map_err(|e| NormalizeError::Remote(format!("Failed to parse table list: {}", e)))
    }

    fn fetch_table(&self, name: &str, top: usize) -> Result<RowSet> {
        let mut url = self.endpoint(&["api", "tabla", name]);
        url.query_pairs_mut().append_pair("top", &top.to_string());
        debug!(%url, "Fetching remote table");

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| NormalizeError::Remote(format!("fetch '{}' request failed: {}", name, e)))?;

        let body: serde_json::Value = Self::check("fetch table", response)?
            .json()
            .map_err(|e| NormalizeError::Remote(format!("Failed to parse rows of '{}': {}", name, e)))?;

        Ok(RowSet::from_json(rows_payload(&body))?.without_empty_rows())
    }

    fn upload(&self, request: &UploadRequest) -> Result<serde_json::Value> {
        let url = self.endpoint(&["api", "upload"]);
        debug!(%url, tables = request.tables.len(), "Uploading normalized tables");

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .map_err(|e| NormalizeError::Remote(format!("upload request failed: {}", e)))?;

        Self::check("upload", response)?
            .json()
            .map_err(|e| NormalizeError::Remote(format!("Failed to parse upload report: {}", e)))
    }

    fn location(&self) -> String {
        self.base_url.to_string()
    }
}

/// The row array of a fetch response: either the body itself or its
/// `rows`/`recordset` member.
fn rows_payload(body: &serde_json::Value) -> &serde_json::Value {
    ["rows", "recordset"]
        .iter()
        .find_map(|key| body.get(key).filter(|v| v.is_array()))
        .unwrap_or(body)
}
