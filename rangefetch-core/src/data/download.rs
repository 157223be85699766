//! Download orchestrator: walks the symbol universe one symbol at a time.
//!
//! Per symbol: resolve -> skip if its directory exists -> create directory ->
//! probe for the first viable range -> consolidate -> write manifest. One
//! symbol's failure is recorded and the run moves on.

use super::consolidate::{consolidate, Aborted, Artifact};
use super::manifest::{ManifestStatus, SymbolManifest};
use super::probe::find_first_viable;
use super::progress::RunProgress;
use super::provider::{DataError, Transport};
use super::request::{build_requests, RequestDescriptor};
use super::store::ArtifactStore;
use crate::domain::{DateRange, Granularity, SymbolTable};
use reqwest::Url;
use tracing::{info, warn};

/// Everything shared, read-only, across the symbols of one run.
pub struct FetchContext<'a> {
    pub transport: &'a dyn Transport,
    pub store: &'a dyn ArtifactStore,
    pub table: &'a SymbolTable,
    pub base_url: &'a Url,
    pub granularity: Granularity,
    pub include_headers: bool,
    /// Sub-ranges as partitioned, newest first.
    pub ranges: &'a [DateRange],
}

/// Terminal state of one symbol.
#[derive(Debug)]
pub enum SymbolOutcome {
    /// Output directory already existed; nothing was fetched.
    Skipped,
    /// No sub-range returned rows.
    NoData,
    Done { artifacts: Vec<Artifact> },
    Failed(DataError),
}

impl SymbolOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, SymbolOutcome::Failed(_))
    }
}

/// Fetch every symbol in `symbols`, in order.
pub fn fetch_symbols(
    ctx: &FetchContext<'_>,
    symbols: &[&str],
    progress: &dyn RunProgress,
) -> RunSummary {
    let total = symbols.len();
    let mut outcomes = Vec::with_capacity(total);

    for (i, symbol) in symbols.iter().enumerate() {
        progress.on_start(symbol, i, total);
        let outcome = fetch_single(ctx, symbol, progress);
        progress.on_complete(symbol, i, total, &outcome);
        outcomes.push((symbol.to_string(), outcome));
    }

    let summary = RunSummary { outcomes };
    progress.on_batch_complete(&summary);
    summary
}

/// Run one symbol through probe and consolidation.
pub fn fetch_single(
    ctx: &FetchContext<'_>,
    symbol: &str,
    progress: &dyn RunProgress,
) -> SymbolOutcome {
    let requests = match build_requests(
        ctx.table,
        ctx.base_url,
        symbol,
        ctx.ranges,
        ctx.granularity,
        ctx.include_headers,
    ) {
        Ok(requests) => requests,
        Err(e) => return SymbolOutcome::Failed(e),
    };

    if ctx.store.exists(symbol) {
        info!(symbol, "output directory exists, skipping");
        return SymbolOutcome::Skipped;
    }
    if let Err(e) = ctx.store.create_symbol_dir(symbol) {
        return SymbolOutcome::Failed(e);
    }

    let total = requests.len();
    let hit = find_first_viable(ctx.transport, &requests, |index, attempt| {
        progress.on_probe(symbol, index, total, attempt)
    });

    let Some(hit) = hit else {
        info!(symbol, ranges = total, "no viable data");
        record(ctx, symbol, &requests, ManifestStatus::NoData, None, None, vec![], None);
        return SymbolOutcome::NoData;
    };

    let first_viable = Some(requests[hit.index].range());
    let start = hit.index;
    let result = consolidate(
        ctx.transport,
        ctx.store,
        symbol,
        &requests,
        hit,
        ctx.granularity,
        |index| progress.on_consolidate(symbol, index, total),
    );

    match result {
        Ok(artifacts) => {
            record(
                ctx,
                symbol,
                &requests,
                ManifestStatus::Done,
                first_viable,
                total.checked_sub(1),
                artifacts.clone(),
                None,
            );
            SymbolOutcome::Done { artifacts }
        }
        Err(Aborted { written, error }) => {
            let (status, last_completed) = if written.is_empty() {
                (ManifestStatus::Failed, None)
            } else {
                (ManifestStatus::Partial, Some(start + written.len() - 1))
            };
            warn!(symbol, error = %error, written = written.len(), "consolidation aborted");
            record(
                ctx,
                symbol,
                &requests,
                status,
                first_viable,
                last_completed,
                written,
                Some(error.to_string()),
            );
            SymbolOutcome::Failed(error)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn record(
    ctx: &FetchContext<'_>,
    symbol: &str,
    requests: &[RequestDescriptor],
    status: ManifestStatus,
    first_viable: Option<DateRange>,
    last_completed: Option<usize>,
    artifacts: Vec<Artifact>,
    error: Option<String>,
) {
    let manifest = SymbolManifest {
        symbol: symbol.to_string(),
        granularity: ctx.granularity,
        status,
        range_count: requests.len(),
        first_viable,
        last_completed,
        artifacts,
        error,
        written_at: chrono::Local::now().naive_local(),
    };
    // The manifest is informational; the artifacts are already on disk.
    if let Err(e) = ctx.store.write_manifest(&manifest) {
        warn!(symbol, error = %e, "failed to write manifest");
    }
}

/// Summary of a run.
#[derive(Debug)]
pub struct RunSummary {
    pub outcomes: Vec<(String, SymbolOutcome)>,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn done(&self) -> usize {
        self.count(|o| matches!(o, SymbolOutcome::Done { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, SymbolOutcome::Skipped))
    }

    pub fn no_data(&self) -> usize {
        self.count(|o| matches!(o, SymbolOutcome::NoData))
    }

    pub fn failed(&self) -> usize {
        self.count(SymbolOutcome::is_failure)
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &DataError)> {
        self.outcomes.iter().filter_map(|(s, o)| match o {
            SymbolOutcome::Failed(e) => Some((s.as_str(), e)),
            _ => None,
        })
    }

    pub fn outcome(&self, symbol: &str) -> Option<&SymbolOutcome> {
        self.outcomes
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, o)| o)
    }

    fn count(&self, pred: impl Fn(&SymbolOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}

