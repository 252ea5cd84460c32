//! Bundle Sizer — synthesizes a minimal entry file for a single import
//! declaration, bundles it in production mode via an external subprocess
//! with peer/external dependencies marked external, and measures the
//! resulting bundle's raw and gzipped byte length.

use std::collections::HashSet;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use flate2::write::GzEncoder;
use flate2::Compression;
use tokio::process::Command;

use crate::config::Config;
use crate::core::data::{ImportDeclaration, PackageInfo, SizeResult};
use crate::core::debounce::Ticket;
use crate::core::process_registry::Guard;
use crate::core::resolve::node_builtins;

pub enum SizerOutcome {
    Sized(SizeResult),
    Timeout,
    BundleFailed,
    /// A newer request for the same file superseded this one while its
    /// subprocess was still running.
    Cancelled,
}

/// `size(declaration, packageInfo, deadline) -> SizeResult | Timeout | BundleError`.
pub async fn size(
    declaration: &ImportDeclaration,
    package_info: &PackageInfo,
    config: &Config,
    ticket: &Ticket,
) -> SizerOutcome {
    let deadline = config.max_call_time.as_duration();

    let work = run(declaration, package_info, config, ticket);
    match deadline {
        Some(d) => match tokio::time::timeout(d, work).await {
            Ok(outcome) => outcome,
            Err(_) => SizerOutcome::Timeout,
        },
        None => work.await,
    }
}

async fn run(
    declaration: &ImportDeclaration,
    package_info: &PackageInfo,
    config: &Config,
    ticket: &Ticket,
) -> SizerOutcome {
    let Ok(dir) = tempfile::tempdir() else {
        return SizerOutcome::BundleFailed;
    };

    let entry_path = dir.path().join("entry.js");
    if std::fs::write(&entry_path, &declaration.string).is_err() {
        return SizerOutcome::BundleFailed;
    }
    let out_path = dir.path().join("out.js");

    let externals = external_flags(package_info);

    let Some((program, args)) = config.bundler_command.split_first() else {
        return SizerOutcome::BundleFailed;
    };

    let mut cmd = Command::new(program);
    cmd.args(args)
        .arg("--bundle")
        .arg("--minify")
        .arg("--format=esm")
        .arg(format!("--outfile={}", out_path.display()))
        .args(externals)
        .arg(&entry_path)
        .env("NODE_ENV", "production")
        .current_dir(dir.path())
        .kill_on_drop(true)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null());

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(_) => return SizerOutcome::BundleFailed,
    };
    let guard = child.id().map(Guard::register);

    let status = tokio::select! {
        result = child.wait() => match result {
            Ok(status) => status,
            Err(_) => return SizerOutcome::BundleFailed,
        },
        _ = ticket.cancelled() => {
            let _ = child.start_kill();
            let _ = child.wait().await;
            return SizerOutcome::Cancelled;
        }
    };
    drop(guard);

    if !status.success() {
        return SizerOutcome::BundleFailed;
    }

    match measure(&out_path) {
        Some(result) => SizerOutcome::Sized(result),
        None => SizerOutcome::BundleFailed,
    }
    // `dir` is dropped here regardless of the exit path above, removing the
    // ephemeral working directory.
}

fn external_flags(package_info: &PackageInfo) -> Vec<String> {
    let mut names: HashSet<&str> = HashSet::new();
    for name in &package_info.peer_dependencies {
        names.insert(name.as_str());
    }
    for name in &package_info.main_externals {
        names.insert(name.as_str());
    }
    for name in node_builtins() {
        names.insert(name);
    }
    let mut names: Vec<&str> = names.into_iter().collect();
    names.sort_unstable();
    names
        .into_iter()
        .map(|name| format!("--external:{name}"))
        .collect()
}

fn measure(bundle_path: &PathBuf) -> Option<SizeResult> {
    let bytes = std::fs::read(bundle_path).ok()?;
    let size = bytes.len() as u64;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&bytes).ok()?;
    let compressed = encoder.finish().ok()?;

    Some(SizeResult {
        size,
        gzip: compressed.len() as u64,
    })
}

/// Exposed so the orchestrator can map `maxCallTime = 0`-style
/// already-expired deadlines without spawning a subprocess at all.
pub fn is_already_expired(deadline: Option<Duration>) -> bool {
    matches!(deadline, Some(d) if d.is_zero())
}
