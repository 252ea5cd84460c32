//! Package Resolver — locates the on-disk package behind an import
//! declaration by walking `node_modules` upward from the importing file.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::data::{ImportDeclaration, PackageInfo, UNKNOWN_VERSION};
use crate::core::extract::package_name;

/// Node built-ins are always external: their bytes never count against a
/// measurement because the bundler never inlines them.
const NODE_BUILTINS: &[&str] = &[
    "assert", "buffer", "child_process", "cluster", "crypto", "dgram", "dns", "domain", "events",
    "fs", "http", "https", "net", "os", "path", "punycode", "querystring", "readline", "stream",
    "string_decoder", "timers", "tls", "tty", "url", "util", "v8", "vm", "zlib", "module",
    "process", "worker_threads",
];

#[derive(Debug, Deserialize, Default)]
struct PackageManifest {
    version: Option<String>,
    #[serde(default, rename = "peerDependencies")]
    peer_dependencies: HashMap<String, String>,
}

#[derive(Debug, Deserialize, Default)]
struct ProjectManifest {
    #[serde(default)]
    externals: HashMap<String, String>,
}

/// `resolve(declaration) -> PackageInfo | None`. `None` means "not
/// installed": the declaration must be dropped from every later stage.
pub fn resolve(declaration: &ImportDeclaration) -> Option<PackageInfo> {
    let pkg_name = package_name(&declaration.name);
    let start_dir = declaration.file_name.parent()?;

    let directory = find_package_dir(start_dir, pkg_name)?;
    let manifest = read_manifest(&directory.join("package.json"))?;

    let peer_dependencies = manifest.peer_dependencies.into_keys().collect();
    let main_externals = nearest_project_externals(start_dir);

    Some(PackageInfo {
        directory,
        version: manifest
            .version
            .unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
        peer_dependencies,
        main_externals,
    })
}

/// Node built-ins, alongside an import's peer/declared externals, make up
/// the full external set the sizer marks on the bundler invocation.
pub fn node_builtins() -> impl Iterator<Item = &'static str> {
    NODE_BUILTINS.iter().copied()
}

fn find_package_dir(start_dir: &Path, pkg_name: &str) -> Option<PathBuf> {
    for dir in start_dir.ancestors() {
        let candidate = dir.join("node_modules").join(pkg_name);
        if candidate.join("package.json").is_file() {
            return Some(candidate);
        }
    }
    None
}

fn read_manifest(path: &Path) -> Option<PackageManifest> {
    let contents = fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
}

/// Walk upward from `start_dir` looking for the nearest `package.json` that
/// is not itself inside a `node_modules` directory, and read its declared
/// `externals` map (webpack-style externals colocated with the project
/// manifest, not the dependency's own manifest).
fn nearest_project_externals(start_dir: &Path) -> Vec<String> {
    for dir in start_dir.ancestors() {
        if dir.components().any(|c| c.as_os_str() == "node_modules") {
            continue;
        }
        let manifest_path = dir.join("package.json");
        if manifest_path.is_file() {
            return fs::read_to_string(&manifest_path)
                .ok()
                .and_then(|s| serde_json::from_str::<ProjectManifest>(&s).ok())
                .map(|m| m.externals.into_keys().collect())
                .unwrap_or_default();
        }
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn decl(file_name: PathBuf, name: &str) -> ImportDeclaration {
        ImportDeclaration {
            name: name.to_string(),
            line: 1,
            string: format!("import \"{name}\";"),
            file_name,
        }
    }

    #[test]
    fn resolves_installed_package() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write(
            &root.join("node_modules/chai/package.json"),
            r#"{"version": "4.3.7", "peerDependencies": {}}"#,
        );
        write(&root.join("package.json"), r#"{}"#);
        let file = root.join("src/index.js");
        fs::create_dir_all(file.parent().unwrap()).unwrap();

        let info = resolve(&decl(file, "chai")).unwrap();
        assert_eq!(info.version, "4.3.7");
    }

    #[test]
    fn scoped_package_subpath_resolves_to_package_root() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write(
            &root.join("node_modules/@scope/pkg/package.json"),
            r#"{"version": "1.0.0"}"#,
        );
        let file = root.join("src/index.js");
        fs::create_dir_all(file.parent().unwrap()).unwrap();

        let info = resolve(&decl(file, "@scope/pkg/sub/file")).unwrap();
        assert_eq!(info.directory, root.join("node_modules/@scope/pkg"));
    }

    #[test]
    fn missing_package_resolves_to_none() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("src/index.js");
        fs::create_dir_all(file.parent().unwrap()).unwrap();

        assert!(resolve(&decl(file, "sinon")).is_none());
    }

    #[test]
    fn peer_dependencies_are_collected() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write(
            &root.join("node_modules/react-dom/package.json"),
            r#"{"version": "18.2.0", "peerDependencies": {"react": "^18.0.0"}}"#,
        );
        let file = root.join("src/index.js");
        fs::create_dir_all(file.parent().unwrap()).unwrap();

        let info = resolve(&decl(file, "react-dom")).unwrap();
        assert_eq!(info.peer_dependencies, vec!["react".to_string()]);
    }
}
