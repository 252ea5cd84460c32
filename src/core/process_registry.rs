//! Tracks the OS pid of every in-flight bundler subprocess so `cleanup()`
//! can terminate them on demand (host editor shutdown, process-wide
//! teardown). Process-wide by design, like the debounce registry: any
//! sizer call anywhere may be outstanding when `cleanup()` is called.

use std::sync::OnceLock;

use dashmap::DashSet;

static RUNNING: OnceLock<DashSet<u32>> = OnceLock::new();

fn running() -> &'static DashSet<u32> {
    RUNNING.get_or_init(DashSet::new)
}

pub struct Guard(u32);

impl Guard {
    pub fn register(pid: u32) -> Self {
        running().insert(pid);
        Guard(pid)
    }
}

impl Drop for Guard {
    fn drop(&mut self) {
        running().remove(&self.0);
    }
}

/// Terminate every tracked in-flight subprocess. Best-effort: a process
/// that has already exited is simply not found by `kill` and ignored.
pub fn cleanup() {
    for pid in running().iter() {
        let _ = std::process::Command::new("kill")
            .arg("-TERM")
            .arg(pid.to_string())
            .status();
    }
    running().clear();
}
