//! End-to-end runs of the per-symbol orchestrator with a scripted transport.

mod common;

use common::{bars, d, RecordingProgress, ScriptedTransport};
use rangefetch_core::data::{
    fetch_symbols, parse_base_url, partition, ArtifactStore, CsvStore, DataError, FetchContext,
    FetchError, ManifestStatus, SymbolOutcome, DEFAULT_BASE_URL,
};
use rangefetch_core::domain::{DateRange, Granularity, SymbolTable};
use reqwest::Url;

struct Run {
    table: SymbolTable,
    base: Url,
    ranges: Vec<DateRange>,
    granularity: Granularity,
}

impl Run {
    fn new(granularity: Granularity, units: u32) -> Self {
        let today = match granularity {
            Granularity::Minute => d(2021, 1, 1),
            Granularity::Tick => d(2024, 2, 15),
        };
        Self {
            table: SymbolTable::default_us(),
            base: parse_base_url(DEFAULT_BASE_URL).unwrap(),
            ranges: partition(today, units, granularity).unwrap(),
            granularity,
        }
    }

    /// The i-th range counting oldest first, the order requests are made in.
    fn oldest(&self, i: usize) -> DateRange {
        self.ranges[self.ranges.len() - 1 - i]
    }

    fn ctx<'a>(
        &'a self,
        transport: &'a ScriptedTransport,
        store: &'a CsvStore,
    ) -> FetchContext<'a> {
        FetchContext {
            transport,
            store,
            table: &self.table,
            base_url: &self.base,
            granularity: self.granularity,
            include_headers: true,
            ranges: &self.ranges,
        }
    }
}

#[test]
fn existing_directory_is_skipped_without_fetching() {
    let run = Run::new(Granularity::Minute, 3);
    let transport = ScriptedTransport::new().rows("AAPL", run.oldest(0), bars("AAPL", "A", 1));
    let tmp = tempfile::tempdir().unwrap();
    let store = CsvStore::new(tmp.path());
    store.create_symbol_dir("AAPL").unwrap();

    let progress = RecordingProgress::default();
    let summary = fetch_symbols(&run.ctx(&transport, &store), &["AAPL"], &progress);

    assert!(matches!(summary.outcome("AAPL"), Some(SymbolOutcome::Skipped)));
    assert!(transport.calls().is_empty());
    assert!(store.read_manifest("AAPL").is_none());
    assert_eq!(
        progress.events(),
        vec!["start AAPL", "complete AAPL skipped", "batch 1"]
    );
}

#[test]
fn unknown_symbol_fails_before_any_fetch() {
    let run = Run::new(Granularity::Minute, 3);
    let transport = ScriptedTransport::new();
    let tmp = tempfile::tempdir().unwrap();
    let store = CsvStore::new(tmp.path());

    let summary = fetch_symbols(
        &run.ctx(&transport, &store),
        &["ZZZZ"],
        &RecordingProgress::default(),
    );

    match summary.outcome("ZZZZ") {
        Some(SymbolOutcome::Failed(DataError::UnknownSymbol { symbol })) => {
            assert_eq!(symbol, "ZZZZ")
        }
        other => panic!("expected UnknownSymbol, got {other:?}"),
    }
    assert!(transport.calls().is_empty());
    assert!(!store.exists("ZZZZ"));
    assert!(!summary.all_succeeded());
}

#[test]
fn minute_run_probes_then_merges() {
    let run = Run::new(Granularity::Minute, 4);
    let transport = ScriptedTransport::new()
        .fail("AAPL", run.oldest(1), FetchError::Parse("html".into()))
        .rows("AAPL", run.oldest(2), bars("AAPL", "C", 2))
        .rows("AAPL", run.oldest(3), bars("AAPL", "D", 3));
    let tmp = tempfile::tempdir().unwrap();
    let store = CsvStore::new(tmp.path());

    let progress = RecordingProgress::default();
    let summary = fetch_symbols(&run.ctx(&transport, &store), &["AAPL"], &progress);

    let Some(SymbolOutcome::Done { artifacts }) = summary.outcome("AAPL") else {
        panic!("expected Done, got {:?}", summary.outcome("AAPL"));
    };
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].name, "AAPL_min.csv");
    assert_eq!(artifacts[0].rows, 5);

    // 0 and 1 fail in the probe, 2 is viable, 3 is fetched once while merging
    assert_eq!(
        transport.calls_for("AAPL"),
        vec![run.oldest(0), run.oldest(1), run.oldest(2), run.oldest(3)]
    );
    assert_eq!(
        progress.events(),
        vec![
            "start AAPL",
            "probe AAPL 0 failed",
            "probe AAPL 1 failed",
            "probe AAPL 2 rows",
            "fetch AAPL 2",
            "fetch AAPL 3",
            "complete AAPL done",
            "batch 1",
        ]
    );

    let manifest = store.read_manifest("AAPL").unwrap();
    assert_eq!(manifest.status, ManifestStatus::Done);
    assert_eq!(manifest.granularity, Granularity::Minute);
    assert_eq!(manifest.range_count, 4);
    assert_eq!(manifest.first_viable, Some(run.oldest(2)));
    assert_eq!(manifest.last_completed, Some(3));
    assert_eq!(manifest.total_rows(), 5);
    assert_eq!(&manifest.artifacts, artifacts);
}

#[test]
fn no_viable_range_is_reported_not_failed() {
    let run = Run::new(Granularity::Minute, 3);
    let transport = ScriptedTransport::new();
    let tmp = tempfile::tempdir().unwrap();
    let store = CsvStore::new(tmp.path());

    let summary = fetch_symbols(
        &run.ctx(&transport, &store),
        &["YHOO"],
        &RecordingProgress::default(),
    );

    assert!(matches!(summary.outcome("YHOO"), Some(SymbolOutcome::NoData)));
    assert!(summary.all_succeeded());
    assert_eq!(summary.no_data(), 1);
    assert_eq!(transport.calls_for("YHOO").len(), 3);

    // the directory still marks the symbol as handled
    assert!(store.exists("YHOO"));
    let manifest = store.read_manifest("YHOO").unwrap();
    assert_eq!(manifest.status, ManifestStatus::NoData);
    assert!(manifest.artifacts.is_empty());
    assert_eq!(manifest.first_viable, None);
}

#[test]
fn one_failing_symbol_does_not_block_the_next() {
    let run = Run::new(Granularity::Minute, 2);
    let transport = ScriptedTransport::new()
        .rows("GE", run.oldest(0), bars("GE", "A", 1))
        .fail("GE", run.oldest(1), FetchError::Status { status: 502 })
        .rows("IBM", run.oldest(0), bars("IBM", "A", 1))
        .rows("IBM", run.oldest(1), bars("IBM", "B", 1));
    let tmp = tempfile::tempdir().unwrap();
    let store = CsvStore::new(tmp.path());

    let summary = fetch_symbols(
        &run.ctx(&transport, &store),
        &["GE", "IBM"],
        &RecordingProgress::default(),
    );

    assert!(matches!(
        summary.outcome("GE"),
        Some(SymbolOutcome::Failed(DataError::Fetch { index: 1, .. }))
    ));
    assert!(matches!(summary.outcome("IBM"), Some(SymbolOutcome::Done { .. })));
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.done(), 1);
    assert_eq!(summary.failures().map(|(s, _)| s).collect::<Vec<_>>(), vec!["GE"]);

    assert!(!store.artifact_path("GE", "GE_min.csv").exists());
    let manifest = store.read_manifest("GE").unwrap();
    assert_eq!(manifest.status, ManifestStatus::Failed);
    assert_eq!(manifest.last_completed, None);
    assert!(manifest.error.unwrap().contains("HTTP 502"));
}

#[test]
fn tick_run_partial_failure_is_recorded() {
    let run = Run::new(Granularity::Tick, 4);
    let transport = ScriptedTransport::new()
        .rows("HPQ", run.oldest(1), bars("HPQ", "B", 2))
        .rows("HPQ", run.oldest(2), bars("HPQ", "C", 2))
        .fail("HPQ", run.oldest(3), FetchError::Network("timeout".into()));
    let tmp = tempfile::tempdir().unwrap();
    let store = CsvStore::new(tmp.path());

    let summary = fetch_symbols(
        &run.ctx(&transport, &store),
        &["HPQ"],
        &RecordingProgress::default(),
    );
    assert!(summary.outcome("HPQ").unwrap().is_failure());

    assert!(store.artifact_path("HPQ", "HPQ_tick_0.csv").exists());
    assert!(store.artifact_path("HPQ", "HPQ_tick_1.csv").exists());
    assert!(!store.artifact_path("HPQ", "HPQ_tick_2.csv").exists());

    let manifest = store.read_manifest("HPQ").unwrap();
    assert_eq!(manifest.status, ManifestStatus::Partial);
    assert_eq!(manifest.first_viable, Some(run.oldest(1)));
    assert_eq!(manifest.last_completed, Some(2));
    assert_eq!(manifest.artifacts.len(), 2);
}

#[test]
fn rerun_skips_everything_already_handled() {
    let run = Run::new(Granularity::Minute, 2);
    let transport = ScriptedTransport::new()
        .rows("IBM", run.oldest(0), bars("IBM", "A", 1))
        .rows("IBM", run.oldest(1), bars("IBM", "B", 1));
    let tmp = tempfile::tempdir().unwrap();
    let store = CsvStore::new(tmp.path());
    let ctx = run.ctx(&transport, &store);

    let first = fetch_symbols(&ctx, &["IBM", "YHOO"], &RecordingProgress::default());
    assert_eq!(first.done(), 1);
    assert_eq!(first.no_data(), 1);
    let calls_after_first = transport.calls().len();

    let second = fetch_symbols(&ctx, &["IBM", "YHOO"], &RecordingProgress::default());
    assert_eq!(second.skipped(), 2);
    assert_eq!(transport.calls().len(), calls_after_first);
}
