//! Size Cache — two-tier mapping from `(package-name, version, canonical
//! import string)` to a measured `SizeResult`, with version-aware
//! invalidation of the on-disk tier.

use std::fs;
use std::path::{Path, PathBuf};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::core::data::SizeResult;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub package_name: String,
    pub version: String,
    pub canonical_string: String,
}

impl CacheKey {
    pub fn new(package_name: &str, version: &str, canonical_string: &str) -> Self {
        CacheKey {
            package_name: package_name.to_string(),
            version: version.to_string(),
            canonical_string: canonical_string.to_string(),
        }
    }

    fn flat(&self) -> String {
        format!(
            "{}\u{1}{}\u{1}{}",
            self.package_name, self.version, self.canonical_string
        )
    }
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct DiskHeader {
    schema: u32,
    runtime_version: String,
    bundler_version: String,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct DiskFile {
    header: DiskHeader,
    entries: Vec<(String, SizeResult)>,
}

pub struct SizeCache {
    memory: DashMap<String, SizeResult>,
    disk_path: PathBuf,
    header: DiskHeader,
}

impl SizeCache {
    pub fn new(config: &Config) -> Self {
        SizeCache {
            memory: DashMap::new(),
            disk_path: config.cache_file(),
            header: DiskHeader {
                schema: crate::config::SCHEMA_VERSION,
                runtime_version: crate::config::RUNTIME_VERSION.to_string(),
                bundler_version: config.bundler_version.clone(),
            },
        }
    }

    /// Concurrent `get` is safe: the in-memory tier is checked first; a miss
    /// rehydrates from disk (self-healing if the file was deleted, renamed,
    /// or corrupted — a bad disk cache is simply treated as empty).
    pub fn get(&self, key: &CacheKey) -> Option<SizeResult> {
        let flat = key.flat();
        if let Some(hit) = self.memory.get(&flat) {
            return Some(*hit);
        }
        let rehydrated = self.read_disk();
        if let Some(result) = rehydrated.get(&flat) {
            self.memory.insert(flat, *result);
            return Some(*result);
        }
        None
    }

    /// Concurrent `set` for the same key is idempotent: last writer wins,
    /// and both writers are expected to store equivalent values.
    pub fn set(&self, key: &CacheKey, result: SizeResult) {
        let flat = key.flat();
        self.memory.insert(flat.clone(), result);
        self.append_disk(&flat, result);
    }

    /// Empties in-memory state only; the disk tier survives.
    pub fn clear_in_memory(&self) {
        self.memory.clear();
    }

    fn read_disk(&self) -> std::collections::HashMap<String, SizeResult> {
        let Ok(contents) = fs::read_to_string(&self.disk_path) else {
            return Default::default();
        };
        let Ok(file) = serde_json::from_str::<DiskFile>(&contents) else {
            return Default::default();
        };
        if file.header.schema != self.header.schema
            || file.header.runtime_version != self.header.runtime_version
            || file.header.bundler_version != self.header.bundler_version
        {
            // Any header mismatch discards the whole disk cache.
            return Default::default();
        }
        file.entries.into_iter().collect()
    }

    fn append_disk(&self, flat_key: &str, result: SizeResult) {
        let mut entries = self.read_disk();
        entries.insert(flat_key.to_string(), result);

        let file = DiskFile {
            header: DiskHeader {
                schema: self.header.schema,
                runtime_version: self.header.runtime_version.clone(),
                bundler_version: self.header.bundler_version.clone(),
            },
            entries: entries.into_iter().collect(),
        };

        if let Some(parent) = self.disk_path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let Ok(serialized) = serde_json::to_string(&file) else {
            return;
        };
        // Rewrite through a sibling temp file so a reader that races this
        // write sees either the old or the new file, never a half-written
        // one, and tolerates the file being renamed away mid-process.
        let tmp_path = tmp_sibling(&self.disk_path);
        if fs::write(&tmp_path, serialized).is_ok() {
            let _ = fs::rename(&tmp_path, &self.disk_path);
        }
    }
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}
