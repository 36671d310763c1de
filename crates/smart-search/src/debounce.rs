//! Cancelable deferred execution (debounce and delayed-close timers)

use std::time::Duration;

use log::debug;
use tokio::task::JoinHandle;

/// A single-slot timer: scheduling a new effect cancels the pending one
///
/// Effects always run on a spawned tokio task, so even a zero delay defers
/// execution until the caller yields. Dropping the debouncer cancels the
/// pending effect. Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct Debouncer {
    name: &'static str,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            pending: None,
        }
    }

    /// Run `effect` once `delay` has passed without another `schedule` call
    pub fn schedule<F>(&mut self, delay: Duration, effect: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.cancel() {
            debug!("{}: superseded pending effect", self.name);
        }

        let name = self.name;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!("{}: fired after {}ms", name, delay.as_millis());
            effect();
        }));
    }

    /// Cancel the pending effect; returns true if one was still waiting
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
