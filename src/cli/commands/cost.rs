//! `cost` command — runs a single source file through the orchestrator and
//! prints a table of per-import bundle sizes.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::args::CostCommand;
use crate::cli::report;
use crate::cli::ExitStatus;
use crate::config::{self, Config, MaxCallTime};
use crate::core::{import_cost, EntryErrorKind, Engine, Event, Language};

pub fn cost(cmd: CostCommand) -> Result<ExitStatus> {
    let file_name = cmd
        .file
        .canonicalize()
        .with_context(|| format!("Failed to read {}", cmd.file.display()))?;
    let source = fs::read_to_string(&file_name)
        .with_context(|| format!("Failed to read {}", file_name.display()))?;

    let language = cmd
        .common
        .language
        .map(Into::into)
        .unwrap_or_else(|| infer_language(&file_name));

    let mut config = config::load_config(
        file_name
            .parent()
            .context("source file has no parent directory")?,
    )?
    .config;
    apply_overrides(&mut config, &cmd.common)?;
    config.validate()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let events = runtime.block_on(async move {
        let engine = Arc::new(Engine::new(&config));
        import_cost(engine, file_name, source, language, config)
            .collect()
            .await
    });

    match events.into_iter().last() {
        Some(Event::Done(entries)) => {
            report::report(&entries);
            let has_entry_errors = entries.iter().any(|e| {
                matches!(
                    e.error,
                    Some(EntryErrorKind::TimeoutError) | Some(EntryErrorKind::BundleError)
                )
            });
            Ok(if has_entry_errors {
                ExitStatus::Failure
            } else {
                ExitStatus::Success
            })
        }
        Some(Event::Error(err)) => {
            eprintln!("Error: {err}");
            Ok(ExitStatus::Error)
        }
        _ => {
            eprintln!("Error: orchestrator produced no terminal event");
            Ok(ExitStatus::Error)
        }
    }
}

fn apply_overrides(
    config: &mut Config,
    common: &crate::cli::args::CommonArgs,
) -> Result<()> {
    if common.concurrent {
        config.concurrent = true;
    }
    if common.no_concurrent {
        config.concurrent = false;
    }
    if let Some(raw) = &common.max_call_time {
        config.max_call_time = parse_max_call_time(raw)?;
    }
    Ok(())
}

fn parse_max_call_time(raw: &str) -> Result<MaxCallTime> {
    if raw.eq_ignore_ascii_case("infinity") {
        return Ok(MaxCallTime::Infinity);
    }
    let ms: u64 = raw
        .parse()
        .with_context(|| format!("'{raw}' is not a valid --max-call-time value"))?;
    Ok(MaxCallTime::Millis(ms))
}

fn infer_language(file_name: &Path) -> Language {
    match file_name.extension().and_then(|e| e.to_str()) {
        Some("ts") | Some("tsx") | Some("mts") | Some("cts") => Language::Typescript,
        Some("js") | Some("jsx") | Some("mjs") | Some("cjs") => Language::Javascript,
        Some("vue") => Language::Vue,
        Some("svelte") => Language::Svelte,
        _ => Language::Unknown,
    }
}
