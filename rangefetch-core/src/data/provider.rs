//! Transport trait and structured error types.
//!
//! The Transport trait abstracts over how an export request is fetched and
//! parsed, so the probing and consolidation logic can run against a scripted
//! source in tests.

use super::request::RequestDescriptor;
use crate::domain::Dataset;
use thiserror::Error;

/// Failure of a single fetch+parse attempt for one sub-range.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status}")]
    Status { status: u16 },

    #[error("unparseable response: {0}")]
    Parse(String),
}

/// Structured error types for data operations.
///
/// These are displayable as-is in the CLI's per-symbol report.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("unknown symbol: {symbol}")]
    UnknownSymbol { symbol: String },

    #[error("fetch failed for {symbol} (sub-range {index}): {source}")]
    Fetch {
        symbol: String,
        index: usize,
        #[source]
        source: FetchError,
    },

    #[error("invalid date range: {0}")]
    InvalidRange(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Fetches one export request and parses it into rows.
///
/// Implementations make a single attempt; retry policy, if any, belongs to the
/// caller.
pub trait Transport: Send + Sync {
    /// Human-readable name of this transport.
    fn name(&self) -> &str;

    /// Fetch and parse the rows for one sub-range.
    fn fetch(&self, request: &RequestDescriptor) -> Result<Dataset, FetchError>;
}
