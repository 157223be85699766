//! Shared fixtures: a scripted transport and a recording progress observer.

#![allow(dead_code)]

use chrono::NaiveDate;
use rangefetch_core::data::{
    Attempt, FetchError, RequestDescriptor, RunProgress, RunSummary, SymbolOutcome, Transport,
};
use rangefetch_core::domain::{Bar, Dataset, DateRange};
use std::collections::HashMap;
use std::sync::Mutex;

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// `n` bars for `symbol`, tagged with `tag` in the TIME column so tests can
/// tell which range a row came from.
pub fn bars(symbol: &str, tag: &str, n: usize) -> Vec<Bar> {
    (0..n)
        .map(|i| Bar {
            ticker: symbol.to_string(),
            period: "1".into(),
            date: "01/02/20".into(),
            time: format!("{tag}-{i}"),
            open: 10.0 + i as f64,
            high: 11.0 + i as f64,
            low: 9.0 + i as f64,
            close: 10.5 + i as f64,
            volume: 100 * (i as u64 + 1),
        })
        .collect()
}

#[derive(Clone)]
pub enum Reply {
    Rows(Vec<Bar>),
    Fail(FetchError),
}

/// Answers by (symbol, range start). Unscripted requests fail with HTTP 404.
/// Every call is recorded.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: HashMap<(String, NaiveDate), Reply>,
    calls: Mutex<Vec<(String, DateRange)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(mut self, symbol: &str, range: DateRange, rows: Vec<Bar>) -> Self {
        self.replies
            .insert((symbol.to_string(), range.start()), Reply::Rows(rows));
        self
    }

    pub fn fail(mut self, symbol: &str, range: DateRange, err: FetchError) -> Self {
        self.replies
            .insert((symbol.to_string(), range.start()), Reply::Fail(err));
        self
    }

    pub fn calls(&self) -> Vec<(String, DateRange)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, symbol: &str) -> Vec<DateRange> {
        self.calls()
            .into_iter()
            .filter(|(s, _)| s == symbol)
            .map(|(_, r)| r)
            .collect()
    }
}

impl Transport for ScriptedTransport {
    fn name(&self) -> &str {
        "scripted"
    }

    fn fetch(&self, request: &RequestDescriptor) -> Result<Dataset, FetchError> {
        self.calls
            .lock()
            .unwrap()
            .push((request.symbol().to_string(), request.range()));
        match self
            .replies
            .get(&(request.symbol().to_string(), request.range().start()))
        {
            Some(Reply::Rows(rows)) => Ok(Dataset::new(rows.clone())),
            Some(Reply::Fail(e)) => Err(e.clone()),
            None => Err(FetchError::Status { status: 404 }),
        }
    }
}

/// Records progress events as strings.
#[derive(Default)]
pub struct RecordingProgress {
    pub events: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, e: String) {
        self.events.lock().unwrap().push(e);
    }
}

impl RunProgress for RecordingProgress {
    fn on_start(&self, symbol: &str, _index: usize, _total: usize) {
        self.push(format!("start {symbol}"));
    }

    fn on_probe(&self, symbol: &str, position: usize, _ranges: usize, attempt: &Attempt) {
        let kind = match attempt {
            Attempt::Rows(_) => "rows",
            Attempt::Empty => "empty",
            Attempt::Failed(_) => "failed",
        };
        self.push(format!("probe {symbol} {position} {kind}"));
    }

    fn on_consolidate(&self, symbol: &str, position: usize, _ranges: usize) {
        self.push(format!("fetch {symbol} {position}"));
    }

    fn on_complete(&self, symbol: &str, _index: usize, _total: usize, outcome: &SymbolOutcome) {
        let kind = match outcome {
            SymbolOutcome::Skipped => "skipped",
            SymbolOutcome::NoData => "no_data",
            SymbolOutcome::Done { .. } => "done",
            SymbolOutcome::Failed(_) => "failed",
        };
        self.push(format!("complete {symbol} {kind}"));
    }

    fn on_batch_complete(&self, summary: &RunSummary) {
        self.push(format!("batch {}", summary.total()));
    }
}
