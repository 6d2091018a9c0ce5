//! Background cleanup sweeps for the cache
//!
//! The cache expires entries lazily; a long-running process that stops
//! touching old keys would still hold their memory. The janitor sweeps
//! expired entries on a fixed interval from a background thread. Starting
//! one is optional: without it, lazy expiry plus explicit `cleanup()`
//! calls give the same semantics.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::manager::CacheManager;

/// Default sweep interval (1 hour)
const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

/// Message types for janitor communication
#[derive(Debug)]
enum JanitorMessage {
    /// Run a sweep immediately
    SweepNow,
    /// Shutdown the janitor thread
    Shutdown,
}

/// Periodic cache sweeper running on a background thread
pub struct CacheJanitor {
    sender: mpsc::Sender<JanitorMessage>,
    handle: Option<JoinHandle<()>>,
}

impl CacheJanitor {
    /// Start sweeping with the default (hourly) interval
    pub fn start(cache: Arc<CacheManager>) -> Self {
        Self::with_interval(cache, DEFAULT_SWEEP_INTERVAL)
    }

    /// Start sweeping every `interval`
    pub fn with_interval(cache: Arc<CacheManager>, interval: Duration) -> Self {
        let (sender, receiver) = mpsc::channel();
        let handle = thread::spawn(move || janitor_loop(cache, interval, receiver));
        Self {
            sender,
            handle: Some(handle),
        }
    }

    /// Request an immediate sweep
    pub fn sweep_now(&self) {
        let _ = self.sender.send(JanitorMessage::SweepNow);
    }

    /// Stop the janitor thread and wait for it to exit
    pub fn shutdown(&mut self) {
        let _ = self.sender.send(JanitorMessage::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for CacheJanitor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Main janitor loop: wait out the interval, sweep, repeat
fn janitor_loop(
    cache: Arc<CacheManager>,
    interval: Duration,
    receiver: mpsc::Receiver<JanitorMessage>,
) {
    loop {
        match receiver.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) | Ok(JanitorMessage::SweepNow) => {
                let removed = cache.cleanup();
                if removed > 0 {
                    log::info!("Cache janitor: swept {} expired entries", removed);
                }
            }
            Ok(JanitorMessage::Shutdown) | Err(RecvTimeoutError::Disconnected) => {
                log::info!("Cache janitor: shutting down");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::models::CacheMetadata;

    #[test]
    fn test_sweep_now_removes_expired() {
        let cache = Arc::new(CacheManager::new());
        cache.set(
            "stale",
            &"v",
            Some(Duration::from_millis(10)),
            CacheMetadata::default(),
        );

        // Long interval so only the explicit sweep can fire
        let janitor = CacheJanitor::with_interval(Arc::clone(&cache), Duration::from_secs(600));

        thread::sleep(Duration::from_millis(40));
        janitor.sweep_now();

        // Give the thread a moment to process the message
        for _ in 0..50 {
            if cache.is_empty() {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        assert!(cache.is_empty());
    }

    #[test]
    fn test_periodic_sweep() {
        let cache = Arc::new(CacheManager::new());
        cache.set(
            "stale",
            &"v",
            Some(Duration::from_millis(10)),
            CacheMetadata::default(),
        );

        let _janitor = CacheJanitor::with_interval(Arc::clone(&cache), Duration::from_millis(25));

        for _ in 0..50 {
            if cache.is_empty() {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        assert!(cache.is_empty());
    }

    #[test]
    fn test_shutdown_joins_thread() {
        let cache = Arc::new(CacheManager::new());
        let mut janitor = CacheJanitor::with_interval(cache, Duration::from_millis(20));

        janitor.shutdown();
        assert!(janitor.handle.is_none());

        // Second shutdown is a no-op
        janitor.shutdown();
    }
}
