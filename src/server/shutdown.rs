use std::sync::atomic::{AtomicBool, Ordering};

use tokio::signal;
use tokio::sync::Notify;

/// Coordinates graceful shutdown between the signal handlers and the server
/// loop.
pub struct ShutdownManager {
    shutdown: AtomicBool,
    notify: Notify,
}

impl ShutdownManager {
    pub fn new() -> Self {
        Self {
            shutdown: AtomicBool::new(false),
            notify: Notify::new(),
        }
    }

    pub async fn wait_for_shutdown(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.is_shutting_down() {
            return Ok(());
        }

        #[cfg(unix)]
        {
            let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;
            tokio::select! {
                _ = signal::ctrl_c() => {},
                _ = sigterm.recv() => {},
                _ = self.notify.notified() => {},
            }
        }

        #[cfg(not(unix))]
        {
            tokio::select! {
                _ = signal::ctrl_c() => {},
                _ = self.notify.notified() => {},
            }
        }

        self.shutdown.store(true, Ordering::SeqCst);
        tracing::info!("shutting down gracefully");
        Ok(())
    }

    pub fn signal_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn signal_releases_waiter() {
        let manager = Arc::new(ShutdownManager::new());
        let waiter = manager.clone();

        let handle = tokio::spawn(async move { waiter.wait_for_shutdown().await.is_ok() });

        // Give the waiter time to register interest before signaling.
        tokio::time::sleep(Duration::from_millis(20)).await;
        manager.signal_shutdown();

        let released = tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("waiter did not release")
            .unwrap();
        assert!(released);
        assert!(manager.is_shutting_down());
    }

    #[tokio::test]
    async fn wait_returns_immediately_once_shut_down() {
        let manager = ShutdownManager::new();
        manager.signal_shutdown();
        assert!(manager.wait_for_shutdown().await.is_ok());
    }
}
