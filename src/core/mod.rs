//! Core analysis engine: the import-cost pipeline.
//!
//! ## Module Structure
//!
//! - `data`: shared data model (`ImportDeclaration`, `PackageInfo`, `SizeResult`, ...)
//! - `error`: the fatal-request error taxonomy and the `Event` lifecycle
//! - `extract`: Import Extractor (JS/TS/Vue/Svelte)
//! - `resolve`: Package Resolver (`node_modules` walk)
//! - `cache`: Size Cache (two-tier, version-aware invalidation)
//! - `sizer`: Bundle Sizer (subprocess bundling + gzip measurement)
//! - `debounce`: Fingerprint & Debounce Registry
//! - `process_registry`: tracks in-flight bundler subprocesses for `cleanup()`
//! - `orchestrator`: the public `import_cost` entry point

pub mod cache;
pub mod data;
pub mod debounce;
pub mod error;
pub mod extract;
mod orchestrator;
mod process_registry;
pub mod resolve;
pub mod sizer;

pub use data::{EntryErrorKind, Fingerprint, ImportDeclaration, Language, PackageEntry, PackageInfo, SizeResult};
pub use error::{Event, ImportCostError};
pub use orchestrator::{import_cost, Emitter, Engine};

/// Synchronously terminate any in-flight sizer subprocesses and flush
/// ephemeral directories. Ephemeral directories are already removed as
/// soon as each sizer call's `TempDir` drops; this additionally kills any
/// bundler process that is still running when a host wants to tear down.
pub fn cleanup() {
    process_registry::cleanup();
}
