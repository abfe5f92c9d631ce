use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

/// Cooperative stop signal shared between the poll loop and signal handlers.
#[derive(Debug, Clone)]
pub struct RunFlag {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    running: AtomicBool,
    notify: Notify,
}

impl RunFlag {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                running: AtomicBool::new(true),
                notify: Notify::new(),
            }),
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    pub fn stop(&self) {
        self.inner.running.store(false, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// Resolves once `stop` has been called.
    pub async fn stopped(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if !self.is_running() {
                return;
            }
            notified.await;
        }
    }
}

impl Default for RunFlag {
    fn default() -> Self {
        Self::new()
    }
}
