//! rangefetch core: planning, probing and consolidating historical export
//! downloads.
//!
//! This crate contains:
//! - Domain types (bars, datasets, date ranges, granularity, symbol table)
//! - Range partitioning sized to the remote row cap
//! - Export request encoding
//! - First-viable-range probing and per-granularity consolidation
//! - The per-symbol orchestrator, artifact store and manifest
//! - The blocking HTTP transport for the export endpoint

pub mod config;
pub mod data;
pub mod domain;

pub use config::FetchConfig;
