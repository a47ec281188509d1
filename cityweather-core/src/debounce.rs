//! Delays an operation until input has been quiet for a fixed interval.
//!
//! Each [`Debouncer::schedule`] call replaces whatever is still waiting, so
//! only the last call of a burst runs. Once the interval has elapsed the
//! operation is detached: a later `schedule` or [`Debouncer::cancel`] no
//! longer affects it.

use std::future::Future;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;

#[derive(Debug)]
pub struct Debouncer {
    interval: Duration,
    runtime: Handle,
    pending: Option<AbortHandle>,
}

impl Debouncer {
    /// Must be called from within a tokio runtime; the debouncer spawns onto
    /// that runtime even when later used from a blocking thread.
    pub fn new(interval: Duration) -> Self {
        Self::with_handle(interval, Handle::current())
    }

    pub fn with_handle(interval: Duration, runtime: Handle) -> Self {
        Self { interval, runtime, pending: None }
    }

    /// Run `op` once the interval passes without another `schedule` call.
    pub fn schedule<F>(&mut self, op: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        let interval = self.interval;
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(interval).await;
            // Detach so cancelling the timer cannot abort a started operation.
            tokio::spawn(op);
        });

        self.pending = Some(handle.abort_handle());
    }

    /// Drop the pending operation, if it has not started yet.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// True while an operation is waiting out the interval.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
