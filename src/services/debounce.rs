// src/services/debounce.rs
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Collapses rapid repeated triggers into a single delayed run. One pending
/// slot, not a queue: each call aborts whatever is still waiting and
/// schedules the new action `wait` from now, so only the last call within
/// any window actually runs, with the arguments it captured.
#[derive(Debug)]
pub struct Debouncer {
    wait: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            pending: Mutex::new(None),
        }
    }

    /// Fire-and-forget: nothing is returned to the caller and an aborted
    /// action simply never runs.
    pub fn call<F>(&self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let wait = self.wait;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            action.await;
        });
        let mut slot = self.pending.lock().expect("pending slot lock");
        if let Some(previous) = slot.replace(handle) {
            previous.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.pending.lock() {
            if let Some(pending) = slot.take() {
                pending.abort();
            }
        }
    }
}
