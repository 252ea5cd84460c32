//! Shared data model for the import-cost pipeline: the types that flow
//! between the extractor, resolver, cache, sizer and orchestrator.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Source dialect understood by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Language {
    Javascript,
    Typescript,
    Vue,
    Svelte,
    #[default]
    Unknown,
}

/// A single import/require declaration as produced by the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDeclaration {
    /// The module specifier as written, e.g. `chai`, `@scope/pkg`, `chai/abc`.
    pub name: String,
    /// 1-based line number in the original source.
    pub line: usize,
    /// Canonical re-materialized import statement fed to the bundler.
    pub string: String,
    /// Absolute path of the containing source file.
    pub file_name: PathBuf,
}

/// What the resolver found for a declaration's top-level package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    pub directory: PathBuf,
    pub version: String,
    pub peer_dependencies: Vec<String>,
    pub main_externals: Vec<String>,
}

pub const UNKNOWN_VERSION: &str = "unknown";

/// Result of bundling+measuring a single import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeResult {
    pub size: u64,
    pub gzip: u64,
}

impl SizeResult {
    pub const ZERO: SizeResult = SizeResult { size: 0, gzip: 0 };
}

/// The externally visible record: present in `start`, `calculated` and `done`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageEntry {
    pub name: String,
    pub line: usize,
    pub string: String,
    pub size: u64,
    pub gzip: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<EntryErrorKind>,
}

impl PackageEntry {
    /// The unsized shell emitted in `start`: zero bytes, no error yet.
    pub fn unsized_from(decl: &ImportDeclaration) -> Self {
        PackageEntry {
            name: decl.name.clone(),
            line: decl.line,
            string: decl.string.clone(),
            size: 0,
            gzip: 0,
            error: None,
        }
    }

    pub fn with_result(mut self, result: SizeResult) -> Self {
        self.size = result.size;
        self.gzip = result.gzip;
        self
    }

    pub fn with_error(mut self, kind: EntryErrorKind) -> Self {
        self.size = 0;
        self.gzip = 0;
        self.error = Some(kind);
        self
    }
}

/// The per-entry error kinds that can ride along in a `PackageEntry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EntryErrorKind {
    TimeoutError,
    BundleError,
}

/// Order-independent summary of a source buffer's canonical import strings,
/// used to key the debounce registry. Content-derived, never identity-derived.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(pub String);

impl Fingerprint {
    pub fn of(declarations: &[ImportDeclaration]) -> Self {
        let mut strings: Vec<&str> = declarations.iter().map(|d| d.string.as_str()).collect();
        strings.sort_unstable();
        strings.dedup();
        Fingerprint(strings.join("\u{1}"))
    }
}
