use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = ".import-cost.json";

pub const SCHEMA_VERSION: u32 = 1;
pub const RUNTIME_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Per-call timeout. `Infinity` disables the deadline entirely.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaxCallTime {
    Millis(u64),
    Infinity,
}

impl MaxCallTime {
    pub fn as_duration(self) -> Option<std::time::Duration> {
        match self {
            MaxCallTime::Millis(ms) => Some(std::time::Duration::from_millis(ms)),
            MaxCallTime::Infinity => None,
        }
    }
}

impl Default for MaxCallTime {
    fn default() -> Self {
        MaxCallTime::Millis(default_max_call_time_ms())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Parallelize per-import sizer invocations when true.
    #[serde(default = "default_concurrent")]
    pub concurrent: bool,
    /// Per-sizer deadline.
    #[serde(default)]
    pub max_call_time: MaxCallTime,
    /// Command used to invoke the bundler, e.g. `["esbuild"]`. Additional
    /// flags (`--bundle`, `--minify`, externals) are appended by the sizer.
    #[serde(default = "default_bundler_command")]
    pub bundler_command: Vec<String>,
    /// Directory holding the on-disk size cache file.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    /// Bumped whenever the bundler invocation strategy changes in a way
    /// that could change measured sizes; embedded in the disk cache header.
    #[serde(default = "default_bundler_version")]
    pub bundler_version: String,
}

fn default_concurrent() -> bool {
    true
}

fn default_max_call_time_ms() -> u64 {
    30_000
}

fn default_bundler_command() -> Vec<String> {
    vec!["esbuild".to_string()]
}

fn default_cache_dir() -> PathBuf {
    std::env::temp_dir().join("import-cost-cache")
}

fn default_bundler_version() -> String {
    "1".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            concurrent: default_concurrent(),
            max_call_time: MaxCallTime::default(),
            bundler_command: default_bundler_command(),
            cache_dir: default_cache_dir(),
            bundler_version: default_bundler_version(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.bundler_command.is_empty() {
            anyhow::bail!("'bundlerCommand' must not be empty");
        }
        if let MaxCallTime::Millis(ms) = self.max_call_time
            && ms == 0
        {
            anyhow::bail!("'maxCallTime' must be positive or Infinity");
        }
        Ok(())
    }

    pub fn cache_file(&self) -> PathBuf {
        self.cache_dir.join("sizes.json")
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
