//! Export endpoint transport.
//!
//! One blocking GET per request, no retries. Non-2xx statuses and bodies that
//! do not parse as the nine-column export format are both reported as
//! [`FetchError`]s; the caller decides whether that is fatal.

use super::provider::{DataError, FetchError, Transport};
use super::request::RequestDescriptor;
use super::tabular::parse_export;
use crate::config::FetchConfig;
use crate::domain::Dataset;
use std::time::Duration;
use tracing::debug;

/// HTTP transport for the export endpoint.
pub struct ExportClient {
    client: reqwest::blocking::Client,
}

impl ExportClient {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| DataError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    pub fn from_config(config: &FetchConfig) -> Result<Self, DataError> {
        Self::new(Duration::from_secs(config.timeout_secs), &config.user_agent)
    }
}

impl Transport for ExportClient {
    fn name(&self) -> &str {
        "finam_export"
    }

    fn fetch(&self, request: &RequestDescriptor) -> Result<Dataset, FetchError> {
        debug!(symbol = request.symbol(), range = %request.range(), "GET export");

        let resp = self
            .client
            .get(request.url().as_str())
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = resp
            .text()
            .map_err(|e| FetchError::Network(format!("reading body: {e}")))?;
        parse_export(&body, request.include_headers())
    }
}
