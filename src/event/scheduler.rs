//! # Timeout Scheduler
//!
//! One-shot timers that run independently of the dispatch path. The
//! [`WaitRegistry`](super::waiter::WaitRegistry) schedules exactly one timer per
//! registration that has a deadline; the timer callback then races dispatch to remove
//! that entry.
//!
//! [`TokioScheduler`] spawns one task per timer. Every task also listens to a broadcast
//! shutdown signal, so timers still pending at shutdown are abandoned without firing.

use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use tokio::{runtime::Handle, sync::broadcast};
use tracing::{debug, trace};

use super::waiter::{WaitError, WaitResult};

pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// Fires a callback once after a delay.
pub trait TimeoutScheduler: Send + Sync {
    fn schedule_once(&self, delay: Duration, callback: TimerCallback);

    /// Abandons every pending timer. Idempotent.
    fn shutdown(&self);
}

pub struct TokioScheduler {
    handle: Handle,
    shutdown_tx: broadcast::Sender<()>,
    closed: AtomicBool,
}

impl TokioScheduler {
    /// Creates a scheduler bound to the given runtime.
    pub fn new(handle: Handle) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            handle,
            shutdown_tx,
            closed: AtomicBool::new(false),
        }
    }

    /// Creates a scheduler bound to the runtime of the calling task.
    ///
    /// # Errors
    ///
    /// Returns `WaitError::NoRuntime` when called outside of a tokio runtime.
    pub fn current() -> WaitResult<Self> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| WaitError::NoRuntime(e.to_string()))
    }
}

impl TimeoutScheduler for TokioScheduler {
    fn schedule_once(&self, delay: Duration, callback: TimerCallback) {
        if self.closed.load(Ordering::SeqCst) {
            trace!("Scheduler closed, dropping timer");
            return;
        }
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        self.handle.spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => callback(),
                _ = shutdown_rx.recv() => trace!("Timer abandoned on shutdown"),
            }
        });
    }

    fn shutdown(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            debug!("Shutting down timeout scheduler");
            // No receivers simply means no timers are pending.
            let _ = self.shutdown_tx.send(());
        }
    }
}
