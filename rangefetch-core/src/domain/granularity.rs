//! Sampling resolution requested from the export endpoint.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Requested resolution. Also decides how sub-ranges are sized and how many
/// artifacts a symbol produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Tick data. The remote caps a tick file at 1,000,000 lines, so windows
    /// are one month wide and each window becomes its own artifact.
    #[serde(alias = "fine")]
    Tick,
    /// One-minute candles. Windows are one year wide and merged into a single
    /// artifact per symbol.
    #[serde(alias = "coarse")]
    Minute,
}

impl Granularity {
    /// The remote `p=` selector.
    pub fn period_code(self) -> u8 {
        match self {
            Granularity::Tick => 1,
            Granularity::Minute => 2,
        }
    }

    /// Width of one sub-range, in calendar months.
    pub fn months_per_window(self) -> u32 {
        match self {
            Granularity::Tick => 1,
            Granularity::Minute => 12,
        }
    }

    /// Number of sub-ranges needed to cover `lookback_years`, or `None` if
    /// the month count does not fit in a `u32`.
    pub fn windows_for(self, lookback_years: u32) -> Option<u32> {
        lookback_years
            .checked_mul(12)
            .map(|months| months / self.months_per_window())
    }

    /// Output file name for a symbol. `counter` only matters for tick data,
    /// where it numbers the artifacts from the first viable window.
    pub fn artifact_name(self, symbol: &str, counter: usize) -> String {
        match self {
            Granularity::Tick => format!("{symbol}_tick_{counter}.csv"),
            Granularity::Minute => format!("{symbol}_min.csv"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Tick => "tick",
            Granularity::Minute => "minute",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tick" | "fine" => Ok(Granularity::Tick),
            "minute" | "min" | "coarse" => Ok(Granularity::Minute),
            other => Err(format!(
                "unknown granularity '{other}'. Valid: tick (fine), minute (coarse)"
            )),
        }
    }
}
