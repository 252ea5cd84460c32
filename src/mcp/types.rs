//! Request and response DTOs for the `import_cost` MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::core::{EntryErrorKind, PackageEntry};

/// Parameters accepted by the `import_cost` tool.
///
/// Mirrors the `cost` CLI command: a file is read from disk unless `source`
/// is supplied directly, in which case `file_path` is used only to resolve
/// the nearest config file and `node_modules` tree.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportCostParams {
    /// Absolute or workspace-relative path to the source file.
    pub file_path: String,
    /// Source text to analyze. When omitted, the file at `file_path` is read.
    #[serde(default)]
    pub source: Option<String>,
    /// Overrides language inference from the file extension.
    #[serde(default)]
    pub language: Option<String>,
    /// Overrides `config.concurrent`.
    #[serde(default)]
    pub concurrent: Option<bool>,
    /// Overrides `config.maxCallTime`, in milliseconds. `0` means no timeout.
    #[serde(default)]
    pub max_call_time_ms: Option<u64>,
}

/// Result of an `import_cost` tool call.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportCostResult {
    pub entries: Vec<PackageEntryDto>,
    pub total_size: u64,
    pub total_gzip: u64,
}

impl ImportCostResult {
    pub fn from_entries(entries: Vec<PackageEntry>) -> Self {
        let total_size = entries.iter().map(|e| e.size).sum();
        let total_gzip = entries.iter().map(|e| e.gzip).sum();
        Self {
            entries: entries.into_iter().map(PackageEntryDto::from).collect(),
            total_size,
            total_gzip,
        }
    }
}

/// One resolved import's bundle weight, or the reason it could not be sized.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PackageEntryDto {
    pub name: String,
    pub line: usize,
    pub size: u64,
    pub gzip: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<PackageEntry> for PackageEntryDto {
    fn from(entry: PackageEntry) -> Self {
        Self {
            name: entry.name,
            line: entry.line,
            size: entry.size,
            gzip: entry.gzip,
            error: entry.error.map(|kind| match kind {
                EntryErrorKind::TimeoutError => "timeout".to_string(),
                EntryErrorKind::BundleError => "bundle_error".to_string(),
            }),
        }
    }
}
