use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

mod import_cost;

/// Test fixture for MCP integration tests.
///
/// Manages a temporary project directory that can be populated with source
/// files and an ephemeral `node_modules` layout.
pub struct McpTestFixture {
    _temp_dir: TempDir,
    project_root: PathBuf,
}

impl McpTestFixture {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_root = temp_dir.path().canonicalize()?;
        Ok(Self {
            _temp_dir: temp_dir,
            project_root,
        })
    }

    /// Write a source file at a project-relative path.
    pub fn write_file(&self, relative_path: &str, content: &str) -> Result<PathBuf> {
        let path = self.project_root.join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        Ok(path)
    }

    /// Install a fake package under `node_modules/<name>` with the given
    /// `package.json` body (merged with `name`/`version` defaults).
    pub fn install_package(&self, name: &str, peer_dependencies: &[&str]) -> Result<()> {
        let pkg_dir = self.project_root.join("node_modules").join(name);
        fs::create_dir_all(&pkg_dir)?;

        let peer_deps: serde_json::Map<String, serde_json::Value> = peer_dependencies
            .iter()
            .map(|dep| (dep.to_string(), serde_json::json!("*")))
            .collect();

        let manifest = serde_json::json!({
            "name": name,
            "version": "1.0.0",
            "main": "index.js",
            "peerDependencies": peer_deps,
        });
        fs::write(
            pkg_dir.join("package.json"),
            serde_json::to_string_pretty(&manifest)?,
        )?;
        fs::write(pkg_dir.join("index.js"), "module.exports = {};\n")?;
        Ok(())
    }

    pub fn root(&self) -> String {
        self.project_root.to_string_lossy().to_string()
    }
}

/// Extract JSON value from a successful `CallToolResult`.
///
/// Panics if the result indicates an error or cannot be parsed.
pub fn extract_tool_result_json(result: &rmcp::model::CallToolResult) -> serde_json::Value {
    if let Some(true) = result.is_error {
        panic!("Tool call returned an error: {:?}", result);
    }

    assert!(
        !result.content.is_empty(),
        "Tool result should have content"
    );

    let content_item = &result.content[0];
    let text_content = content_item
        .as_text()
        .expect("Tool result content should be text");

    serde_json::from_str(&text_content.text).expect("Tool result should be valid JSON")
}
