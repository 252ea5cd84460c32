//! The fatal-request error taxonomy and the orchestrator's event stream.

use thiserror::Error;

use super::data::PackageEntry;

/// Fatal, whole-request failures. Per-entry failures (`TimeoutError`,
/// `BundleError`) live on `PackageEntry::error` instead — they never abort
/// the request.
#[derive(Debug, Error, Clone)]
pub enum ImportCostError {
    #[error("failed to parse {file}: {reason}")]
    ParseError { file: String, reason: String },

    #[error("superseded by a newer request for {file}")]
    DebounceError { file: String },
}

/// One of the four events an `Emitter` produces, in strict order:
/// `Start` precedes any `Calculated`; `Calculated` fires once per entry in
/// `Done`; `Done`/`Error` is terminal.
#[derive(Debug, Clone)]
pub enum Event {
    Start(Vec<PackageEntry>),
    Calculated(PackageEntry),
    Done(Vec<PackageEntry>),
    Error(ImportCostError),
}
