//! Symbol table: ticker to remote export identifier (`em=` value).
//!
//! Stored as a TOML file with a single `[symbols]` table. A built-in table
//! covering the supported US large caps is available via
//! [`SymbolTable::default_us`].

use crate::data::provider::DataError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Read-only mapping from ticker symbol to remote identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolTable {
    symbols: BTreeMap<String, String>,
}

impl SymbolTable {
    pub fn new(symbols: BTreeMap<String, String>) -> Self {
        Self { symbols }
    }

    /// Load a symbol table from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, DataError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DataError::Config(format!("read symbol table {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parse a symbol table from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, DataError> {
        toml::from_str(content).map_err(|e| DataError::Config(format!("parse symbol table: {e}")))
    }

    pub fn to_toml(&self) -> Result<String, DataError> {
        toml::to_string_pretty(self)
            .map_err(|e| DataError::Config(format!("serialize symbol table: {e}")))
    }

    /// Remote identifier for `symbol`, or `UnknownSymbol`.
    pub fn resolve(&self, symbol: &str) -> Result<&str, DataError> {
        self.symbols
            .get(symbol)
            .map(|id| id.as_str())
            .ok_or_else(|| DataError::UnknownSymbol {
                symbol: symbol.to_string(),
            })
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains_key(symbol)
    }

    /// All tickers, in sorted order.
    pub fn tickers(&self) -> Vec<&str> {
        self.symbols.keys().map(|s| s.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.symbols.iter().map(|(s, id)| (s.as_str(), id.as_str()))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Built-in table of US equities supported by the export endpoint.
    pub fn default_us() -> Self {
        let pairs = [
            ("MMM", "18090"),
            ("T", "19067"),
            ("ADBE", "20563"),
            ("AA", "17997"),
            ("GOOG", "20590"),
            ("AXP", "18009"),
            ("AIG", "19070"),
            ("AMT", "20568"),
            ("AAPL", "20569"),
            ("AMAT", "20570"),
            ("BAC", "18011"),
            ("BA", "18010"),
            ("CA", "20576"),
            ("CAT", "18026"),
            ("CVX", "18037"),
            ("CSCO", "20580"),
            ("C", "18023"),
            ("KO", "18076"),
            ("GLW", "20582"),
            ("DD", "18039"),
            ("EMC", "20585"),
            ("XOM", "18149"),
            ("FSLR", "20586"),
            ("GE", "18055"),
            ("GS", "47256"),
            ("HPQ", "18068"),
            ("HD", "18063"),
            ("IBM", "18069"),
            ("IP", "22141"),
            ("INTC", "19069"),
            ("JPM", "18074"),
            ("JNJ", "18073"),
            ("MCD", "18080"),
            ("MRK", "18094"),
            ("MSFT", "19068"),
            ("PFE", "18106"),
            ("PG", "18107"),
            ("TRV", "22139"),
            ("UTX", "18134"),
            ("VZ", "18137"),
            ("WMT", "18146"),
            ("DIS", "18041"),
            ("WFC", "22138"),
            ("YHOO", "19075"),
        ];

        Self {
            symbols: pairs
                .into_iter()
                .map(|(s, id)| (s.to_string(), id.to_string()))
                .collect(),
        }
    }
}
