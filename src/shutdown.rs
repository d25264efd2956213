//! Graceful shutdown coordination utilities.
//!
//! Provides a lightweight [`ShutdownCoordinator`] shared across the run so a
//! Ctrl+C can stop collection between steps without corrupting output. Every
//! pacing and backoff wait in the collector goes through
//! [`ShutdownCoordinator::sleep_interruptible`], so a shutdown request takes
//! effect at the next wait boundary and each already-written page stays on
//! disk.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Shared handle to a shutdown coordinator.
pub type SharedShutdown = Arc<ShutdownCoordinator>;

/// Coordinates graceful shutdown across async tasks.
#[derive(Debug, Default)]
pub struct ShutdownCoordinator {
    is_shutdown: AtomicBool,
    notify: Notify,
}

impl ShutdownCoordinator {
    /// Create a new coordinator.
    pub fn new() -> Self {
        Self {
            is_shutdown: AtomicBool::new(false),
            notify: Notify::new(),
        }
    }

    /// Create a new shared coordinator wrapped in [`Arc`].
    pub fn shared() -> SharedShutdown {
        Arc::new(Self::new())
    }

    /// Request shutdown. Notifies all registered waiters exactly once.
    pub fn request_shutdown(&self) {
        if !self.is_shutdown.swap(true, Ordering::SeqCst) {
            self.notify.notify_waiters();
        }
    }

    /// Whether shutdown has been requested.
    pub fn is_shutdown_requested(&self) -> bool {
        self.is_shutdown.load(Ordering::SeqCst)
    }

    /// Wait until shutdown is requested. Returns immediately if already set.
    pub async fn wait_for_shutdown(&self) {
        if self.is_shutdown_requested() {
            return;
        }
        self.notify.notified().await;
    }

    /// Sleep for `wait`, waking early if shutdown is requested.
    ///
    /// Returns `true` when the sleep was interrupted by a shutdown request.
    pub async fn sleep_interruptible(&self, wait: Duration) -> bool {
        if self.is_shutdown_requested() {
            return true;
        }
        tokio::select! {
            _ = tokio::time::sleep(wait) => false,
            _ = self.wait_for_shutdown() => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn sleep_runs_to_completion_without_shutdown() {
        let shutdown = ShutdownCoordinator::new();
        let interrupted = shutdown.sleep_interruptible(Duration::from_secs(5)).await;
        assert!(!interrupted);
    }

    #[tokio::test(start_paused = true)]
    async fn sleep_returns_immediately_after_shutdown() {
        let shutdown = ShutdownCoordinator::new();
        shutdown.request_shutdown();
        let interrupted = shutdown.sleep_interruptible(Duration::from_secs(3600)).await;
        assert!(interrupted);
    }

    #[tokio::test(start_paused = true)]
    async fn sleep_wakes_on_concurrent_shutdown() {
        let shutdown = ShutdownCoordinator::shared();
        let waiter = {
            let shutdown = shutdown.clone();
            tokio::spawn(async move { shutdown.sleep_interruptible(Duration::from_secs(3600)).await })
        };
        tokio::task::yield_now().await;
        shutdown.request_shutdown();
        assert!(waiter.await.unwrap());
    }
}
