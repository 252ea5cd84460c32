//! Report formatting and printing utilities.
//!
//! Renders the `done` event's `PackageEntry` list as a cargo-style table.
//! Separate from the orchestration core so `import_cost` can be used as a
//! library without pulling in terminal formatting.

use std::io::{self, Write};

use colored::Colorize;

use crate::core::{EntryErrorKind, PackageEntry};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print a table of sized entries to stdout.
pub fn report(entries: &[PackageEntry]) {
    report_to(entries, &mut io::stdout().lock());
}

/// Print a table of sized entries to a custom writer.
pub fn report_to<W: Write>(entries: &[PackageEntry], writer: &mut W) {
    if entries.is_empty() {
        let _ = writeln!(writer, "No external imports found.");
        return;
    }

    let mut sorted = entries.to_vec();
    sorted.sort_by_key(|e| e.line);

    let name_width = sorted
        .iter()
        .map(|e| e.name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    for entry in &sorted {
        print_entry(entry, writer, name_width);
    }

    print_summary(&sorted, writer);
}

fn print_entry<W: Write>(entry: &PackageEntry, writer: &mut W, name_width: usize) {
    match entry.error {
        None => {
            let _ = writeln!(
                writer,
                "{} {:<width$}  {:>10}  {:>10} gzip   line {}",
                SUCCESS_MARK.green(),
                entry.name,
                format_bytes(entry.size),
                format_bytes(entry.gzip),
                entry.line,
                width = name_width,
            );
        }
        Some(EntryErrorKind::TimeoutError) => {
            let _ = writeln!(
                writer,
                "{} {:<width$}  {}   line {}",
                FAILURE_MARK.red(),
                entry.name,
                "timed out".yellow(),
                entry.line,
                width = name_width,
            );
        }
        Some(EntryErrorKind::BundleError) => {
            let _ = writeln!(
                writer,
                "{} {:<width$}  {}   line {}",
                FAILURE_MARK.red(),
                entry.name,
                "bundle failed".red(),
                entry.line,
                width = name_width,
            );
        }
    }
}

fn print_summary<W: Write>(entries: &[PackageEntry], writer: &mut W) {
    let failed = entries.iter().filter(|e| e.error.is_some()).count();
    let total_size: u64 = entries
        .iter()
        .filter(|e| e.error.is_none())
        .map(|e| e.size)
        .sum();
    let total_gzip: u64 = entries
        .iter()
        .filter(|e| e.error.is_none())
        .map(|e| e.gzip)
        .sum();

    let _ = writeln!(writer);
    if failed == 0 {
        let _ = writeln!(
            writer,
            "{} {} import(s), {} raw / {} gzip total",
            SUCCESS_MARK.green(),
            entries.len(),
            format_bytes(total_size),
            format_bytes(total_gzip),
        );
    } else {
        let _ = writeln!(
            writer,
            "{} {} of {} import(s) could not be sized",
            FAILURE_MARK.red(),
            failed,
            entries.len(),
        );
    }
}

fn format_bytes(bytes: u64) -> String {
    if bytes >= 1024 {
        format!("{:.1}kB", bytes as f64 / 1024.0)
    } else {
        format!("{bytes}B")
    }
}
