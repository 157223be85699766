//! First-viable-range search.
//!
//! Older sub-ranges may predate a listing and come back empty or unparseable.
//! Each attempt is classified into an [`Attempt`]; the search stops at the
//! first one that carries rows and never touches later ranges.

use super::provider::{FetchError, Transport};
use super::request::RequestDescriptor;
use crate::domain::Dataset;
use tracing::debug;

/// Outcome of one fetch+parse attempt.
#[derive(Debug)]
pub enum Attempt {
    /// Parsed, with at least one row.
    Rows(Dataset),
    /// Parsed, but the remote had nothing for this range.
    Empty,
    /// Transport or parse failure.
    Failed(FetchError),
}

impl Attempt {
    /// Fetch `request` once and classify the result.
    pub fn run(transport: &dyn Transport, request: &RequestDescriptor) -> Self {
        match transport.fetch(request) {
            Ok(dataset) if dataset.is_empty() => Attempt::Empty,
            Ok(dataset) => Attempt::Rows(dataset),
            Err(e) => Attempt::Failed(e),
        }
    }

    pub fn into_rows(self) -> Option<Dataset> {
        match self {
            Attempt::Rows(dataset) => Some(dataset),
            Attempt::Empty | Attempt::Failed(_) => None,
        }
    }
}

/// The earliest viable sub-range and the rows it returned.
///
/// The rows are handed on to consolidation so the range is not fetched twice.
#[derive(Debug)]
pub struct ProbeHit {
    pub index: usize,
    pub dataset: Dataset,
}

/// Probe `requests` in order and return the first that yields rows.
///
/// `requests` must be oldest first. `on_attempt` sees every attempt, viable or
/// not, before the search decides whether to continue. `None` means no range
/// had data, which is a normal outcome rather than an error.
pub fn find_first_viable(
    transport: &dyn Transport,
    requests: &[RequestDescriptor],
    mut on_attempt: impl FnMut(usize, &Attempt),
) -> Option<ProbeHit> {
    requests.iter().enumerate().find_map(|(index, request)| {
        let attempt = Attempt::run(transport, request);
        match &attempt {
            Attempt::Rows(ds) => debug!(
                symbol = request.symbol(),
                index,
                rows = ds.len(),
                range = %request.range(),
                "viable range found"
            ),
            Attempt::Empty => debug!(symbol = request.symbol(), index, "range is empty"),
            Attempt::Failed(e) => {
                debug!(symbol = request.symbol(), index, error = %e, "range not usable")
            }
        }
        on_attempt(index, &attempt);
        attempt.into_rows().map(|dataset| ProbeHit { index, dataset })
    })
}
