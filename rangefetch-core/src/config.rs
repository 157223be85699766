//! Serializable run configuration.
//!
//! Read once at startup from an optional TOML file; every field has a
//! default, so an empty file (or no file) reproduces the stock run: ten years
//! of minute data for the built-in symbol table into `finam_data/`.

use crate::data::partition::units_for;
use crate::data::provider::DataError;
use crate::data::request::{parse_base_url, DEFAULT_BASE_URL};
use crate::domain::{Granularity, SymbolTable};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Run configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FetchConfig {
    /// Years of history to attempt.
    pub lookback_years: u32,

    pub granularity: Granularity,

    /// Root directory; one subdirectory per symbol.
    pub data_dir: PathBuf,

    /// Export endpoint, without query string.
    pub base_url: String,

    /// Ask the remote for a header row.
    pub include_headers: bool,

    /// Per-request timeout.
    pub timeout_secs: u64,

    pub user_agent: String,

    /// Restrict the run to these symbols. `None` means the whole table.
    pub symbols: Option<Vec<String>>,

    /// TOML symbol table to use instead of the built-in one.
    pub symbol_table: Option<PathBuf>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            lookback_years: 10,
            granularity: Granularity::Minute,
            data_dir: PathBuf::from("finam_data"),
            base_url: DEFAULT_BASE_URL.to_string(),
            include_headers: true,
            timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            symbols: None,
            symbol_table: None,
        }
    }
}

impl FetchConfig {
    /// Load a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, DataError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DataError::Config(format!("read config {}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    /// Parse a configuration from a TOML string and validate it.
    pub fn from_toml(content: &str) -> Result<Self, DataError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| DataError::Config(format!("parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DataError> {
        if self.lookback_years == 0 {
            return Err(DataError::Config("lookback_years must be at least 1".into()));
        }
        units_for(self.lookback_years, self.granularity)?;
        if self.timeout_secs == 0 {
            return Err(DataError::Config("timeout_secs must be at least 1".into()));
        }
        parse_base_url(&self.base_url)?;
        Ok(())
    }

    pub fn base_url(&self) -> Result<Url, DataError> {
        parse_base_url(&self.base_url)
    }

    /// The configured symbol table, or the built-in one.
    pub fn load_symbol_table(&self) -> Result<SymbolTable, DataError> {
        match &self.symbol_table {
            Some(path) => SymbolTable::from_file(path),
            None => Ok(SymbolTable::default_us()),
        }
    }

    /// Symbols to process: the configured subset, or every ticker in `table`.
    ///
    /// Subset entries missing from the table are kept so the run reports
    /// them as unknown.
    pub fn universe(&self, table: &SymbolTable) -> Vec<String> {
        match &self.symbols {
            Some(subset) => subset.clone(),
            None => table.tickers().into_iter().map(String::from).collect(),
        }
    }
}
