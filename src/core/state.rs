//! Serve state tracking.
//!
//! Two orthogonal flags:
//! - `SERVING`: Is the listener bound? (before that, Ctrl+C just exits)
//! - `SHUTDOWN`: Has shutdown been requested? (Ctrl+C received)

use std::sync::LazyLock;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

/// Listener is bound and the request loop is running
static SERVING: AtomicBool = AtomicBool::new(false);

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Wakes the server's graceful-shutdown future
static SHUTDOWN_NOTIFY: LazyLock<Notify> = LazyLock::new(Notify::new);

// =============================================================================
// SERVING state
// =============================================================================

pub fn is_serving() -> bool {
    SERVING.load(Ordering::SeqCst)
}

/// Mark the listener as bound (call right before entering the request loop)
pub fn set_serving() {
    SERVING.store(true, Ordering::SeqCst);
}

// =============================================================================
// SHUTDOWN state
// =============================================================================

/// Setup the global Ctrl+C handler. Call once at program start
///
/// - Before `set_serving()`: exits immediately, nothing to drain
/// - After `set_serving()`: wakes `shutdown_signal()` for a graceful stop
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);

        if is_serving() {
            crate::log!("serve"; "shutting down...");
            // notify_one keeps a permit if nobody is waiting yet
            SHUTDOWN_NOTIFY.notify_one();
        } else {
            std::process::exit(0);
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Check if shutdown has been requested
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

/// Resolves once shutdown has been requested.
pub async fn shutdown_signal() {
    if is_shutdown() {
        return;
    }
    SHUTDOWN_NOTIFY.notified().await;
}

/// Request shutdown without a signal (tests, fatal errors).
#[cfg(test)]
pub fn request_shutdown() {
    SHUTDOWN.store(true, Ordering::SeqCst);
    SHUTDOWN_NOTIFY.notify_one();
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serving() {
        set_serving();
        assert!(is_serving());
    }

    #[tokio::test]
    async fn test_shutdown_signal_resolves() {
        request_shutdown();
        assert!(is_shutdown());
        tokio::time::timeout(std::time::Duration::from_secs(1), shutdown_signal())
            .await
            .unwrap();
    }
}
