//! Progress reporting for multi-symbol runs.

use super::download::{RunSummary, SymbolOutcome};
use super::probe::Attempt;

/// Progress callback for a run over the symbol universe.
pub trait RunProgress: Send {
    /// Called when starting a symbol.
    fn on_start(&self, symbol: &str, index: usize, total: usize);

    /// Called after each probe attempt. `position` counts oldest first.
    fn on_probe(&self, symbol: &str, position: usize, ranges: usize, attempt: &Attempt);

    /// Called as each range is consolidated.
    fn on_consolidate(&self, symbol: &str, position: usize, ranges: usize);

    /// Called when a symbol reaches its terminal state.
    fn on_complete(&self, symbol: &str, index: usize, total: usize, outcome: &SymbolOutcome);

    /// Called when the whole run is done.
    fn on_batch_complete(&self, summary: &RunSummary);
}

/// Simple progress reporter that prints to stdout.
pub struct StdoutProgress;

impl RunProgress for StdoutProgress {
    fn on_start(&self, symbol: &str, index: usize, total: usize) {
        println!("[{}/{}] {symbol}", index + 1, total);
    }

    fn on_probe(&self, _symbol: &str, position: usize, ranges: usize, attempt: &Attempt) {
        match attempt {
            Attempt::Rows(ds) => println!(
                "  probe {}/{ranges}: viable ({} rows)",
                position + 1,
                ds.len()
            ),
            Attempt::Empty => println!("  probe {}/{ranges}: empty", position + 1),
            Attempt::Failed(e) => println!("  probe {}/{ranges}: {e}", position + 1),
        }
    }

    fn on_consolidate(&self, _symbol: &str, position: usize, ranges: usize) {
        println!("  fetch {}/{ranges}", position + 1);
    }

    fn on_complete(&self, symbol: &str, _index: usize, _total: usize, outcome: &SymbolOutcome) {
        match outcome {
            SymbolOutcome::Skipped => {
                println!("  SKIP: {symbol} (directory exists; delete it to refetch)")
            }
            SymbolOutcome::NoData => println!("  NO DATA: {symbol}"),
            SymbolOutcome::Done { artifacts } => {
                let rows: usize = artifacts.iter().map(|a| a.rows).sum();
                println!("  OK: {symbol} ({} files, {rows} rows)", artifacts.len());
            }
            SymbolOutcome::Failed(e) => println!("  FAIL: {symbol}: {e}"),
        }
    }

    fn on_batch_complete(&self, summary: &RunSummary) {
        println!(
            "\nRun complete: {} done, {} skipped, {} no data, {} failed (of {})",
            summary.done(),
            summary.skipped(),
            summary.no_data(),
            summary.failed(),
            summary.total()
        );
    }
}
