//! Generic feed adapter
//!
//! Adapts any `SampleSource` to the `FeedAdapter` interface so the
//! `IngestionPipeline` handles mock, replay, and device feeds uniformly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_channel::Sender;
use contracts::{ImuSample, SampleCallback, SampleSource};
use tracing::{debug, trace};

use crate::adapter::FeedAdapter;
use crate::common::send_sample;
use crate::config::{BackpressureConfig, IngestionMetrics};

/// Generic feed adapter
///
/// Bridges a `SampleSource` callback into the pipeline channel.
pub struct GenericFeedAdapter {
    feed_id: String,
    source: Box<dyn SampleSource>,
    config: BackpressureConfig,
    listening: Arc<AtomicBool>,
}

impl GenericFeedAdapter {
    /// Create a new generic adapter
    pub fn new(feed_id: String, source: Box<dyn SampleSource>, config: BackpressureConfig) -> Self {
        Self {
            feed_id,
            source,
            config,
            listening: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl FeedAdapter for GenericFeedAdapter {
    fn feed_id(&self) -> &str {
        &self.feed_id
    }

    fn start(&self, tx: Sender<ImuSample>, metrics: Arc<IngestionMetrics>) {
        if self.listening.swap(true, Ordering::SeqCst) {
            return;
        }

        let feed_id = self.feed_id.clone();
        let drop_policy = self.config.drop_policy;
        let listening = self.listening.clone();

        debug!(feed_id = %feed_id, "starting generic adapter");

        let callback: SampleCallback = Arc::new(move |sample| {
            if !listening.load(Ordering::Relaxed) {
                return;
            }

            metrics.record_received();
            trace!(feed_id = %feed_id, ts = sample.timestamp, "adapter received sample");
            send_sample(&tx, sample, &metrics, &feed_id, drop_policy);
        });

        self.source.listen(callback);
    }

    fn stop(&self) {
        if self.listening.swap(false, Ordering::SeqCst) {
            debug!(feed_id = %self.feed_id, "stopping generic adapter");
            self.source.stop();
        }
    }

    fn is_listening(&self) -> bool {
        self.listening.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::DropPolicy;
    use async_channel::bounded;
    use std::time::Duration;

    /// Thread-backed source for testing
    struct TestFeedSource {
        feed_id: String,
        listening: Arc<AtomicBool>,
    }

    impl TestFeedSource {
        fn new(feed_id: &str) -> Self {
            Self {
                feed_id: feed_id.to_string(),
                listening: Arc::new(AtomicBool::new(false)),
            }
        }
    }

    impl SampleSource for TestFeedSource {
        fn feed_id(&self) -> &str {
            &self.feed_id
        }

        fn listen(&self, callback: SampleCallback) {
            if self.listening.swap(true, Ordering::SeqCst) {
                return;
            }

            let feed_id = self.feed_id.clone();
            let listening = self.listening.clone();

            std::thread::spawn(move || {
                let mut n = 0u64;
                while listening.load(Ordering::Relaxed) {
                    n += 1;
                    let ts = n as f64 * 0.01;
                    callback(ImuSample::accel(feed_id.as_str(), ts, 0.0, 0.0, 1.0));
                    std::thread::sleep(Duration::from_millis(10));
                }
            });
        }

        fn stop(&self) {
            self.listening.store(false, Ordering::SeqCst);
        }

        fn is_listening(&self) -> bool {
            self.listening.load(Ordering::Relaxed)
        }
    }

    #[test]
    fn test_generic_adapter_forwards_samples() {
        let source = TestFeedSource::new("test");
        let adapter = GenericFeedAdapter::new(
            "test".to_string(),
            Box::new(source),
            BackpressureConfig {
                channel_capacity: 64,
                drop_policy: DropPolicy::DropNewest,
            },
        );

        let (tx, rx) = bounded(64);
        let metrics = Arc::new(IngestionMetrics::new());

        adapter.start(tx, metrics.clone());
        assert!(adapter.is_listening());

        std::thread::sleep(Duration::from_millis(100));

        adapter.stop();
        assert!(!adapter.is_listening());

        let mut count = 0;
        while rx.try_recv().is_ok() {
            count += 1;
        }
        assert!(count > 0);
        assert!(metrics.snapshot().samples_received > 0);
    }

    #[test]
    fn test_start_is_idempotent() {
        let source = TestFeedSource::new("test");
        let adapter = GenericFeedAdapter::new(
            "test".to_string(),
            Box::new(source),
            BackpressureConfig::default(),
        );

        let (tx, _rx) = bounded(8);
        let metrics = Arc::new(IngestionMetrics::new());

        adapter.start(tx.clone(), metrics.clone());
        adapter.start(tx, metrics);
        assert!(adapter.is_listening());
        adapter.stop();
    }
}
