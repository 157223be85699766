//! Artifact store: one directory per symbol under a data root.
//!
//! Layout: `{data_dir}/{SYMBOL}/{artifact}.csv` plus `manifest.json`.
//!
//! Every file is written atomically (write to `.tmp`, rename into place), so
//! a crash never leaves a truncated artifact behind.

use super::consolidate::Artifact;
use super::manifest::SymbolManifest;
use super::provider::DataError;
use super::tabular::write_csv;
use crate::domain::Dataset;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

const MANIFEST_FILE: &str = "manifest.json";

/// Where consolidated datasets land.
pub trait ArtifactStore: Send + Sync {
    /// Whether the symbol's directory already exists. This is the only
    /// completion marker consulted before a symbol is processed.
    fn exists(&self, symbol: &str) -> bool;

    fn create_symbol_dir(&self, symbol: &str) -> Result<(), DataError>;

    /// Persist one dataset under `name` in the symbol directory.
    fn write_dataset(&self, symbol: &str, name: &str, dataset: &Dataset)
        -> Result<Artifact, DataError>;

    fn write_manifest(&self, manifest: &SymbolManifest) -> Result<(), DataError>;

    fn read_manifest(&self, symbol: &str) -> Option<SymbolManifest>;
}

/// CSV files on the local filesystem.
pub struct CsvStore {
    data_dir: PathBuf,
}

impl CsvStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Directory for a specific symbol: `{data_dir}/{SYMBOL}/`
    pub fn symbol_dir(&self, symbol: &str) -> PathBuf {
        self.data_dir.join(symbol)
    }

    pub fn artifact_path(&self, symbol: &str, name: &str) -> PathBuf {
        self.symbol_dir(symbol).join(name)
    }

    fn manifest_path(&self, symbol: &str) -> PathBuf {
        self.symbol_dir(symbol).join(MANIFEST_FILE)
    }

    /// Symbols that have a directory under the data root, sorted.
    pub fn list_symbols(&self) -> Result<Vec<String>, DataError> {
        if !self.data_dir.exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&self.data_dir)
            .map_err(|e| DataError::Storage(format!("read dir: {e}")))?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| DataError::Storage(format!("dir entry: {e}")))?;
            if entry.path().is_dir() {
                symbols.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        symbols.sort();
        Ok(symbols)
    }
}

impl ArtifactStore for CsvStore {
    fn exists(&self, symbol: &str) -> bool {
        self.symbol_dir(symbol).exists()
    }

    fn create_symbol_dir(&self, symbol: &str) -> Result<(), DataError> {
        let dir = self.symbol_dir(symbol);
        fs::create_dir_all(&dir)
            .map_err(|e| DataError::Storage(format!("failed to create {}: {e}", dir.display())))
    }

    fn write_dataset(
        &self,
        symbol: &str,
        name: &str,
        dataset: &Dataset,
    ) -> Result<Artifact, DataError> {
        let bytes = write_csv(dataset)?;
        write_atomic(&self.artifact_path(symbol, name), &bytes)?;
        Ok(Artifact {
            name: name.to_string(),
            rows: dataset.len(),
            hash: blake3::hash(&bytes).to_hex().to_string(),
        })
    }

    fn write_manifest(&self, manifest: &SymbolManifest) -> Result<(), DataError> {
        let json = serde_json::to_vec_pretty(manifest)
            .map_err(|e| DataError::Storage(format!("manifest serialization: {e}")))?;
        write_atomic(&self.manifest_path(&manifest.symbol), &json)
    }

    fn read_manifest(&self, symbol: &str) -> Option<SymbolManifest> {
        let content = fs::read_to_string(self.manifest_path(symbol)).ok()?;
        match serde_json::from_str(&content) {
            Ok(manifest) => Some(manifest),
            Err(e) => {
                warn!(symbol, error = %e, "ignoring unreadable manifest");
                None
            }
        }
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), DataError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp_path = PathBuf::from(tmp);

    fs::write(&tmp_path, bytes)
        .map_err(|e| DataError::Storage(format!("write {}: {e}", tmp_path.display())))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        // Clean up temp file on rename failure
        let _ = fs::remove_file(&tmp_path);
        DataError::Storage(format!("atomic rename failed: {e}"))
    })
}
