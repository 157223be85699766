//! Bar: one row of an export response.

use serde::{Deserialize, Serialize};

/// One row of the remote export, in the fixed `datf=1` column order.
///
/// DATE and TIME are kept exactly as the remote formats them (`MM/DD/YY` and
/// `hh:mm:ss`); the only check applied to a row is that it parses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub ticker: String,
    pub period: String,
    pub date: String,
    pub time: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Column header row, as the remote emits it when headers are requested.
    pub const HEADER: [&'static str; 9] = [
        "<TICKER>", "<PER>", "<DATE>", "<TIME>", "<OPEN>", "<HIGH>", "<LOW>", "<CLOSE>", "<VOL>",
    ];
}

/// An ordered sequence of bars sharing the [`Bar::HEADER`] schema.
///
/// This is the unit exchanged with a transport and the unit merged during
/// consolidation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    bars: Vec<Bar>,
}

impl Dataset {
    pub fn new(bars: Vec<Bar>) -> Self {
        Self { bars }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Append every row of `other` after the rows already held.
    pub fn append(&mut self, other: Dataset) {
        self.bars.extend(other.bars);
    }

    pub fn into_bars(self) -> Vec<Bar> {
        self.bars
    }
}

impl From<Vec<Bar>> for Dataset {
    fn from(bars: Vec<Bar>) -> Self {
        Self::new(bars)
    }
}
