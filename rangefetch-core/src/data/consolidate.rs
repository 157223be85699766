//! Consolidation of the viable sub-ranges into output artifacts.
//!
//! - Minute: every range from the first viable one is fetched, concatenated
//!   oldest to newest, and written once as `{SYMBOL}_min.csv`. A failure
//!   anywhere writes nothing.
//! - Tick: each range becomes `{SYMBOL}_tick_{k}.csv`, `k` counting from 0 at
//!   the first viable range. A failure stops the remaining ranges; files
//!   already written are complete and stay.

use super::probe::ProbeHit;
use super::provider::{DataError, Transport};
use super::request::RequestDescriptor;
use super::store::ArtifactStore;
use crate::domain::{Dataset, Granularity};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A file written into a symbol directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    pub rows: usize,
    /// blake3 of the bytes on disk.
    pub hash: String,
}

/// Consolidation stopped before the last range.
#[derive(Debug)]
pub struct Aborted {
    /// Artifacts persisted before the failure (tick mode only).
    pub written: Vec<Artifact>,
    pub error: DataError,
}

impl Aborted {
    fn nothing_written(error: DataError) -> Self {
        Self {
            written: Vec::new(),
            error,
        }
    }
}

/// Fetch every range from `hit.index` on and persist the result.
///
/// `requests` must be oldest first. The rows in `hit` stand in for
/// `requests[hit.index]`, which is not fetched again. `on_step` is called
/// with each range index as it is consolidated.
pub fn consolidate(
    transport: &dyn Transport,
    store: &dyn ArtifactStore,
    symbol: &str,
    requests: &[RequestDescriptor],
    hit: ProbeHit,
    granularity: Granularity,
    on_step: impl FnMut(usize),
) -> Result<Vec<Artifact>, Aborted> {
    match granularity {
        Granularity::Minute => {
            merge_into_one(transport, store, symbol, requests, hit, on_step).map(|a| vec![a])
        }
        Granularity::Tick => one_per_range(transport, store, symbol, requests, hit, on_step),
    }
}

fn merge_into_one(
    transport: &dyn Transport,
    store: &dyn ArtifactStore,
    symbol: &str,
    requests: &[RequestDescriptor],
    hit: ProbeHit,
    mut on_step: impl FnMut(usize),
) -> Result<Artifact, Aborted> {
    on_step(hit.index);
    let mut merged = hit.dataset;

    for (index, request) in requests.iter().enumerate().skip(hit.index + 1) {
        on_step(index);
        let dataset = fetch(transport, symbol, index, request).map_err(Aborted::nothing_written)?;
        debug!(symbol, index, rows = dataset.len(), "appending range");
        merged.append(dataset);
    }

    let name = Granularity::Minute.artifact_name(symbol, 0);
    let artifact = store
        .write_dataset(symbol, &name, &merged)
        .map_err(Aborted::nothing_written)?;
    info!(symbol, artifact = %artifact.name, rows = artifact.rows, "wrote merged artifact");
    Ok(artifact)
}

fn one_per_range(
    transport: &dyn Transport,
    store: &dyn ArtifactStore,
    symbol: &str,
    requests: &[RequestDescriptor],
    hit: ProbeHit,
    mut on_step: impl FnMut(usize),
) -> Result<Vec<Artifact>, Aborted> {
    let mut written = Vec::new();
    let mut probed = Some(hit.dataset);

    for (counter, (index, request)) in requests.iter().enumerate().skip(hit.index).enumerate() {
        on_step(index);
        let dataset = match probed.take() {
            Some(dataset) => dataset,
            None => match fetch(transport, symbol, index, request) {
                Ok(dataset) => dataset,
                Err(error) => return Err(Aborted { written, error }),
            },
        };

        let name = Granularity::Tick.artifact_name(symbol, counter);
        match store.write_dataset(symbol, &name, &dataset) {
            Ok(artifact) => {
                debug!(
                    symbol,
                    index,
                    artifact = %artifact.name,
                    rows = artifact.rows,
                    "wrote range"
                );
                written.push(artifact);
            }
            Err(error) => return Err(Aborted { written, error }),
        }
    }

    info!(symbol, artifacts = written.len(), "wrote tick artifacts");
    Ok(written)
}

fn fetch(
    transport: &dyn Transport,
    symbol: &str,
    index: usize,
    request: &RequestDescriptor,
) -> Result<Dataset, DataError> {
    transport
        .fetch(request)
        .map_err(|source| DataError::Fetch {
            symbol: symbol.to_string(),
            index,
            source,
        })
}
