//! Sub-range planning, fetching and consolidation.

pub mod consolidate;
pub mod download;
pub mod export;
pub mod manifest;
pub mod partition;
pub mod probe;
pub mod progress;
pub mod provider;
pub mod request;
pub mod store;
pub mod tabular;

pub use consolidate::{consolidate, Aborted, Artifact};
pub use download::{fetch_single, fetch_symbols, FetchContext, RunSummary, SymbolOutcome};
pub use export::ExportClient;
pub use manifest::{ManifestStatus, SymbolManifest};
pub use partition::{partition, units_for};
pub use probe::{find_first_viable, Attempt, ProbeHit};
pub use progress::{RunProgress, StdoutProgress};
pub use provider::{DataError, FetchError, Transport};
pub use request::{build_requests, parse_base_url, RequestDescriptor, DEFAULT_BASE_URL};
pub use store::{ArtifactStore, CsvStore};
