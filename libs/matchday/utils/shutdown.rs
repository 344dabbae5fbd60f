//! Cooperative cancellation for the polling loop.

use std::pin::pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::info;

/// Shared stop signal.
///
/// Clones share the underlying flag, so a handle kept by the control
/// surface can stop a loop that is mid-sleep. Triggering is one-way and
/// idempotent.
#[derive(Clone)]
pub struct Shutdown {
    inner: Arc<Inner>,
}

struct Inner {
    triggered: AtomicBool,
    notify: Notify,
}

impl Shutdown {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                triggered: AtomicBool::new(false),
                notify: Notify::new(),
            }),
        }
    }

    /// Request shutdown and wake every pending [`Shutdown::sleep`].
    pub fn trigger(&self) {
        if !self.inner.triggered.swap(true, Ordering::AcqRel) {
            self.inner.notify.notify_waiters();
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.inner.triggered.load(Ordering::Acquire)
    }

    /// Spawn a Ctrl+C handler that triggers this shutdown.
    pub fn spawn_signal_handler(&self) {
        let shutdown = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received shutdown signal (Ctrl+C)");
                shutdown.trigger();
            }
        });
    }

    /// Sleep for `duration`, returning early the moment shutdown triggers.
    pub async fn sleep(&self, duration: Duration) {
        let mut notified = pin!(self.inner.notify.notified());
        // Register interest before the flag check so a trigger racing this
        // call cannot slip between check and wait.
        notified.as_mut().enable();
        if self.is_triggered() {
            return;
        }
        tokio::select! {
            _ = notified => {}
            _ = tokio::time::sleep(duration) => {}
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
