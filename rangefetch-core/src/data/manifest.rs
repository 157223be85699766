//! Per-symbol manifest sidecar (`manifest.json`).
//!
//! Records how a symbol's run ended. Rerun decisions still key off the
//! symbol directory alone; the manifest is what `rangefetch status` reads.

use super::consolidate::Artifact;
use crate::domain::{DateRange, Granularity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a symbol's run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestStatus {
    /// Every sub-range from the first viable one was persisted.
    Done,
    /// No sub-range returned rows.
    NoData,
    /// Consolidation stopped early but some tick artifacts were written.
    Partial,
    /// Consolidation stopped early and nothing was written.
    Failed,
}

impl ManifestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ManifestStatus::Done => "done",
            ManifestStatus::NoData => "no_data",
            ManifestStatus::Partial => "partial",
            ManifestStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ManifestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Manifest sidecar for a symbol directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolManifest {
    pub symbol: String,
    pub granularity: Granularity,
    pub status: ManifestStatus,
    /// Number of sub-ranges the run was planned with.
    pub range_count: usize,
    /// Oldest sub-range that returned rows.
    pub first_viable: Option<DateRange>,
    /// Index (oldest first) of the last sub-range persisted to disk.
    pub last_completed: Option<usize>,
    pub artifacts: Vec<Artifact>,
    pub error: Option<String>,
    pub written_at: chrono::NaiveDateTime,
}

impl SymbolManifest {
    pub fn total_rows(&self) -> usize {
        self.artifacts.iter().map(|a| a.rows).sum()
    }
}
