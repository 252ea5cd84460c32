//! Fingerprint & Debounce Registry — a process-wide mapping from `fileName`
//! to the generation of the most recently dispatched request, so an older
//! in-flight request for the same file can recognize it has been
//! superseded and cancel itself.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use dashmap::DashMap;
use tokio::sync::watch;

use crate::core::data::Fingerprint;

static REGISTRY: OnceLock<DashMap<PathBuf, Entry>> = OnceLock::new();

struct Entry {
    generation: u64,
    fingerprint: Fingerprint,
    cancel_tx: watch::Sender<bool>,
}

fn registry() -> &'static DashMap<PathBuf, Entry> {
    REGISTRY.get_or_init(DashMap::new)
}

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// A token captured when a request is admitted. `still_current` tells a
/// sizer task whether a newer call for the same file has since arrived;
/// `cancelled` additionally lets an in-flight subprocess wake up and kill
/// itself the instant that happens, rather than waiting to be polled.
#[derive(Debug, Clone)]
pub struct Ticket {
    file_name: PathBuf,
    generation: u64,
    cancelled: watch::Receiver<bool>,
}

impl Ticket {
    pub fn still_current(&self) -> bool {
        registry()
            .get(&self.file_name)
            .is_some_and(|entry| entry.generation == self.generation)
    }

    /// Resolves once a newer request for this ticket's file has superseded
    /// it. Meant to be raced against a sizer subprocess's `child.wait()` so
    /// supersession kills the subprocess instead of merely out-voting it
    /// after the fact.
    pub async fn cancelled(&self) {
        let mut rx = self.cancelled.clone();
        if *rx.borrow() {
            return;
        }
        let _ = rx.changed().await;
    }

    /// Remove this request from the registry if it is still the current
    /// entry. Called on terminal emission (`done` or `error`).
    pub fn retire(&self) {
        if let Some(entry) = registry().get(&self.file_name)
            && entry.generation == self.generation
        {
            drop(entry);
            registry().remove(&self.file_name);
        }
    }
}

/// Register a new request for `file_name` with the given fingerprint.
/// Returns this request's ticket, and, if a different fingerprint was
/// already in flight for the same file, that superseded request's
/// generation (the orchestrator uses it only to know a prior call existed;
/// the prior call detects its own supersession via `still_current`). Any
/// previously admitted, still-in-flight request for the same file is
/// signalled to cancel here, regardless of whether its fingerprint matches.
pub fn admit(file_name: &Path, fingerprint: Fingerprint) -> (Ticket, bool) {
    let generation = NEXT_GENERATION.fetch_add(1, Ordering::SeqCst);
    let reg = registry();

    let mut superseded_a_match = false;
    if let Some(previous) = reg.get(file_name) {
        superseded_a_match = previous.fingerprint == fingerprint;
        let _ = previous.cancel_tx.send(true);
    }

    let (cancel_tx, cancel_rx) = watch::channel(false);
    reg.insert(
        file_name.to_path_buf(),
        Entry {
            generation,
            fingerprint,
            cancel_tx,
        },
    );

    (
        Ticket {
            file_name: file_name.to_path_buf(),
            generation,
            cancelled: cancel_rx,
        },
        superseded_a_match,
    )
}
