//! Orchestrator — the public entry point. Sequences extractor → resolver →
//! cache lookup → sizer → cache store, emits the four-event lifecycle, and
//! enforces concurrency/timeout configuration and debounce interlocking.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::config::Config;
use crate::core::cache::{CacheKey, SizeCache};
use crate::core::data::{EntryErrorKind, Fingerprint, Language, PackageEntry};
use crate::core::debounce::{self, Ticket};
use crate::core::error::{Event, ImportCostError};
use crate::core::extract::{self, package_name};
use crate::core::resolve;
use crate::core::sizer::{self, SizerOutcome};

/// Receives the four-event lifecycle produced by a single `import_cost`
/// call. Deliberately not a `Future<Output = Vec<PackageEntry>>`: callers
/// observe `calculated` mid-flight.
pub struct Emitter {
    receiver: UnboundedReceiver<Event>,
}

impl Emitter {
    pub async fn recv(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Drain the emitter to its terminal event, collecting every event
    /// along the way. Convenience for callers (tests, the CLI) that don't
    /// need to react mid-flight.
    pub async fn collect(mut self) -> Vec<Event> {
        let mut events = Vec::new();
        while let Some(event) = self.recv().await {
            let terminal = matches!(event, Event::Done(_) | Event::Error(_));
            events.push(event);
            if terminal {
                break;
            }
        }
        events
    }
}

/// Shared engine state: the size cache. The debounce registry is itself a
/// process-wide singleton (see `core::debounce`) since it must coordinate
/// across every call, not just calls sharing one `Engine`.
pub struct Engine {
    cache: SizeCache,
}

impl Engine {
    pub fn new(config: &Config) -> Self {
        Engine {
            cache: SizeCache::new(config),
        }
    }

    pub fn clear_size_cache(&self) {
        self.cache.clear_in_memory();
    }
}

/// `importCost(fileName, source, language, config) -> Emitter`.
pub fn import_cost(
    engine: Arc<Engine>,
    file_name: PathBuf,
    source: String,
    language: Language,
    config: Config,
) -> Emitter {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        run_request(engine, file_name, source, language, config, tx).await;
    });

    Emitter { receiver: rx }
}

async fn run_request(
    engine: Arc<Engine>,
    file_name: PathBuf,
    source: String,
    language: Language,
    config: Config,
    tx: mpsc::UnboundedSender<Event>,
) {
    if language == Language::Unknown {
        let _ = tx.send(Event::Done(Vec::new()));
        return;
    }

    let declarations = match extract::extract(&file_name, &source, language) {
        Ok(decls) => decls,
        Err(ImportCostError::ParseError { file, reason }) => {
            let _ = tx.send(Event::Error(ImportCostError::ParseError { file, reason }));
            return;
        }
        Err(other) => {
            let _ = tx.send(Event::Error(other));
            return;
        }
    };

    let fingerprint = Fingerprint::of(&declarations);
    let (ticket, _reattached) = debounce::admit(&file_name, fingerprint);

    // Resolve against the filesystem; unresolved imports are silently
    // dropped from every subsequent stage. Run off the executor thread:
    // `resolve` walks `node_modules` synchronously and would otherwise
    // monopolize a current-thread runtime for the duration of the walk.
    let resolved = tokio::task::spawn_blocking(move || {
        let mut resolved = Vec::new();
        for decl in declarations {
            if let Some(info) = resolve::resolve(&decl) {
                resolved.push((decl, info));
            }
        }
        resolved
    })
    .await
    .unwrap_or_default();

    if !ticket.still_current() {
        let _ = tx.send(Event::Error(ImportCostError::DebounceError {
            file: file_name.display().to_string(),
        }));
        ticket.retire();
        return;
    }

    let start_entries: Vec<PackageEntry> = resolved
        .iter()
        .map(|(decl, _)| PackageEntry::unsized_from(decl))
        .collect();
    let _ = tx.send(Event::Start(start_entries.clone()));

    let done_entries = if config.concurrent {
        size_concurrently(&engine, &ticket, &file_name, resolved, &config, &tx).await
    } else {
        size_serially(&engine, &ticket, &file_name, resolved, &config, &tx).await
    };

    match done_entries {
        Some(entries) => {
            let _ = tx.send(Event::Done(entries));
        }
        None => {
            let _ = tx.send(Event::Error(ImportCostError::DebounceError {
                file: file_name.display().to_string(),
            }));
        }
    }

    ticket.retire();
}

async fn size_serially(
    engine: &Arc<Engine>,
    ticket: &Ticket,
    file_name: &Path,
    resolved: Vec<(
        crate::core::data::ImportDeclaration,
        crate::core::data::PackageInfo,
    )>,
    config: &Config,
    tx: &mpsc::UnboundedSender<Event>,
) -> Option<Vec<PackageEntry>> {
    let mut done = Vec::with_capacity(resolved.len());
    for (decl, info) in resolved {
        if !ticket.still_current() {
            return None;
        }
        let entry = match size_one(engine, &decl, &info, config, ticket).await {
            SizeOneOutcome::Entry(entry) => entry,
            SizeOneOutcome::Cancelled => return None,
        };
        if !ticket.still_current() {
            return None;
        }
        let _ = tx.send(Event::Calculated(entry.clone()));
        done.push(entry);
    }
    let _ = file_name; // kept for symmetry with the concurrent path's signature
    Some(done)
}

async fn size_concurrently(
    engine: &Arc<Engine>,
    ticket: &Ticket,
    file_name: &Path,
    resolved: Vec<(
        crate::core::data::ImportDeclaration,
        crate::core::data::PackageInfo,
    )>,
    config: &Config,
    tx: &mpsc::UnboundedSender<Event>,
) -> Option<Vec<PackageEntry>> {
    let futures = resolved
        .into_iter()
        .map(|(decl, info)| {
            let engine = Arc::clone(engine);
            let config = config.clone();
            let tx = tx.clone();
            let ticket = ticket.clone();
            async move {
                match size_one(&engine, &decl, &info, &config, &ticket).await {
                    SizeOneOutcome::Entry(entry) => {
                        let _ = tx.send(Event::Calculated(entry.clone()));
                        Some(entry)
                    }
                    SizeOneOutcome::Cancelled => None,
                }
            }
        })
        .collect::<Vec<_>>();

    let done = futures::future::join_all(futures).await;
    if !ticket.still_current() {
        return None;
    }
    let _ = file_name;
    done.into_iter().collect()
}

/// Outcome of sizing a single resolved import: either a finished entry, or
/// a signal that a newer request for the same file arrived mid-flight and
/// this entry's computation was abandoned.
enum SizeOneOutcome {
    Entry(PackageEntry),
    Cancelled,
}

async fn size_one(
    engine: &Arc<Engine>,
    decl: &crate::core::data::ImportDeclaration,
    info: &crate::core::data::PackageInfo,
    config: &Config,
    ticket: &Ticket,
) -> SizeOneOutcome {
    let key = CacheKey::new(package_name(&decl.name), &info.version, &decl.string);

    let cached = {
        let engine = Arc::clone(engine);
        let key = key.clone();
        tokio::task::spawn_blocking(move || engine.cache.get(&key))
            .await
            .unwrap_or(None)
    };
    if let Some(cached) = cached {
        return SizeOneOutcome::Entry(PackageEntry::unsized_from(decl).with_result(cached));
    }

    let entry = match sizer::size(decl, info, config, ticket).await {
        SizerOutcome::Sized(result) => {
            let engine = Arc::clone(engine);
            let key = key.clone();
            tokio::task::spawn_blocking(move || engine.cache.set(&key, result))
                .await
                .ok();
            PackageEntry::unsized_from(decl).with_result(result)
        }
        SizerOutcome::Timeout => {
            PackageEntry::unsized_from(decl).with_error(EntryErrorKind::TimeoutError)
        }
        SizerOutcome::BundleFailed => {
            PackageEntry::unsized_from(decl).with_error(EntryErrorKind::BundleError)
        }
        SizerOutcome::Cancelled => return SizeOneOutcome::Cancelled,
    };
    SizeOneOutcome::Entry(entry)
}
