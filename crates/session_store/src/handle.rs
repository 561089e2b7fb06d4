//! StoreHandle - manages a store with isolated queue and worker task

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument, warn};

use contracts::{Session, SessionStore};

use crate::metrics::StoreMetrics;

/// Handle to a running store worker
pub struct StoreHandle {
    /// Store name
    name: String,
    /// Channel to send sessions to worker
    tx: mpsc::Sender<Session>,
    /// Shared metrics
    metrics: Arc<StoreMetrics>,
    /// Worker task handle
    worker_handle: JoinHandle<()>,
}

impl StoreHandle {
    /// Create a new StoreHandle and spawn the worker task
    pub fn spawn<S: SessionStore + Send + 'static>(store: S, queue_capacity: usize) -> Self {
        let name = store.name().to_string();
        let (tx, rx) = mpsc::channel(queue_capacity);
        let metrics = Arc::new(StoreMetrics::new());

        let worker_metrics = Arc::clone(&metrics);
        let worker_name = name.clone();

        let worker_handle = tokio::spawn(async move {
            store_worker(store, rx, worker_metrics, worker_name).await;
        });

        Self {
            name,
            tx,
            metrics,
            worker_handle,
        }
    }

    /// Get store name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get current metrics
    pub fn metrics(&self) -> &Arc<StoreMetrics> {
        &self.metrics
    }

    /// Send a session to the store (non-blocking)
    ///
    /// Returns true if sent, false if queue full (session dropped)
    pub fn try_send(&self, session: Session) -> bool {
        match self.tx.try_send(session) {
            Ok(()) => {
                self.metrics.set_queue_len(self.tx.capacity());
                true
            }
            Err(mpsc::error::TrySendError::Full(s)) => {
                self.metrics.inc_dropped_count();
                warn!(
                    store = %self.name,
                    session_id = %s.id,
                    "Queue full, session dropped"
                );
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                error!(store = %self.name, "Store worker closed unexpectedly");
                false
            }
        }
    }

    /// Shutdown the store worker gracefully
    #[instrument(name = "store_handle_shutdown", skip(self))]
    pub async fn shutdown(self) {
        // Drop sender to signal worker to stop
        drop(self.tx);
        // Wait for worker to finish
        if let Err(e) = self.worker_handle.await {
            error!(store = %self.name, error = ?e, "Worker task panicked");
        }
        debug!(store = %self.name, "StoreHandle shutdown complete");
    }
}

/// Worker task that consumes sessions and persists them
#[instrument(
    name = "store_worker_loop",
    skip(store, rx, metrics),
    fields(store = %name)
)]
async fn store_worker<S: SessionStore>(
    mut store: S,
    mut rx: mpsc::Receiver<Session>,
    metrics: Arc<StoreMetrics>,
    name: String,
) {
    debug!(store = %name, "Store worker started");

    while let Some(session) = rx.recv().await {
        metrics.set_queue_len(rx.len());

        match store.store(&session).await {
            Ok(()) => {
                metrics.inc_persist_count();
            }
            Err(e) => {
                metrics.inc_failure_count();
                error!(
                    store = %name,
                    session_id = %session.id,
                    error = %e,
                    "Persist failed"
                );
                // Continue processing, one bad session must not kill the worker
            }
        }
    }

    // Cleanup
    if let Err(e) = store.flush().await {
        error!(store = %name, error = %e, "Flush failed on shutdown");
    }
    if let Err(e) = store.close().await {
        error!(store = %name, error = %e, "Close failed on shutdown");
    }

    debug!(store = %name, "Store worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{EngineError, SessionSummary, Vector3};
    use std::sync::atomic::{AtomicU64, Ordering};
    use tokio::time::{sleep, Duration};

    fn make_session(n: u64) -> Session {
        Session {
            id: format!("session-{n:05}"),
            start_time: n as f64,
            end_time: n as f64 + 0.5,
            sample_count: 50,
            max_speed_mps: 1.2,
            avg_speed_mps: 0.6,
            max_rpm: 200.0,
            avg_rpm: 90.0,
            dominant_axis: Vector3::new(0.0, 0.0, 1.0),
            speed_series: vec![],
            spin_series: vec![],
        }
    }

    /// Mock store for testing
    struct MockStore {
        name: String,
        persist_count: Arc<AtomicU64>,
        should_fail: bool,
        delay_ms: u64,
    }

    impl SessionStore for MockStore {
        fn name(&self) -> &str {
            &self.name
        }

        async fn store(&mut self, _session: &Session) -> Result<(), EngineError> {
            if self.delay_ms > 0 {
                sleep(Duration::from_millis(self.delay_ms)).await;
            }
            if self.should_fail {
                return Err(EngineError::store_write(&self.name, "mock failure"));
            }
            self.persist_count.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }

        async fn list(&mut self) -> Result<Vec<SessionSummary>, EngineError> {
            Ok(vec![])
        }

        async fn load(&mut self, id: &str) -> Result<Session, EngineError> {
            Err(EngineError::SessionNotFound {
                store_name: self.name.clone(),
                session_id: id.to_string(),
            })
        }

        async fn flush(&mut self) -> Result<(), EngineError> {
            Ok(())
        }

        async fn close(&mut self) -> Result<(), EngineError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_store_handle_basic() {
        let persist_count = Arc::new(AtomicU64::new(0));
        let store = MockStore {
            name: "test".to_string(),
            persist_count: Arc::clone(&persist_count),
            should_fail: false,
            delay_ms: 0,
        };

        let handle = StoreHandle::spawn(store, 10);

        for i in 0..5 {
            assert!(handle.try_send(make_session(i)));
        }

        handle.shutdown().await;
        assert_eq!(persist_count.load(Ordering::Relaxed), 5);
    }

    #[tokio::test]
    async fn test_store_handle_queue_full() {
        let persist_count = Arc::new(AtomicU64::new(0));
        let store = MockStore {
            name: "slow".to_string(),
            persist_count: Arc::clone(&persist_count),
            should_fail: false,
            delay_ms: 100, // Slow store
        };

        // Small queue capacity
        let handle = StoreHandle::spawn(store, 2);

        for i in 0..10 {
            handle.try_send(make_session(i));
        }

        // Some should have been dropped
        assert!(handle.metrics().dropped_count() > 0);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_store_handle_failure_isolation() {
        let store = MockStore {
            name: "failing".to_string(),
            persist_count: Arc::new(AtomicU64::new(0)),
            should_fail: true,
            delay_ms: 0,
        };

        let handle = StoreHandle::spawn(store, 10);

        for i in 0..3 {
            handle.try_send(make_session(i));
        }

        // Give worker time to process
        sleep(Duration::from_millis(50)).await;

        assert!(handle.metrics().failure_count() > 0);

        handle.shutdown().await;
    }
}
