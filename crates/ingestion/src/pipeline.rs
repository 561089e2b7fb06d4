//! Ingestion pipeline main entry

use std::collections::HashMap;
use std::sync::Arc;

use async_channel::{bounded, Receiver, Sender};
use contracts::{ImuSample, SampleSource};
use tracing::{debug, info, instrument};

use crate::adapter::FeedAdapter;
use crate::config::{BackpressureConfig, IngestionMetrics};
use crate::generic_adapter::GenericFeedAdapter;

/// Ingestion pipeline
///
/// Manages feed adapters and merges their samples into one output stream.
/// Mock, replay, and device feeds register through the same interface.
pub struct IngestionPipeline {
    /// Registered adapters
    adapters: HashMap<String, Box<dyn FeedAdapter>>,

    /// Shared metrics
    metrics: Arc<IngestionMetrics>,

    /// Sample sender (shared by all adapters)
    tx: Sender<ImuSample>,

    /// Sample receiver
    rx: Option<Receiver<ImuSample>>,

    /// Default backpressure configuration
    default_config: BackpressureConfig,
}

impl IngestionPipeline {
    /// Create a new pipeline
    ///
    /// # Arguments
    /// * `channel_capacity` - Merged channel capacity
    pub fn new(channel_capacity: usize) -> Self {
        let (tx, rx) = bounded(channel_capacity);

        Self {
            adapters: HashMap::new(),
            metrics: Arc::new(IngestionMetrics::new()),
            tx,
            rx: Some(rx),
            default_config: BackpressureConfig {
                channel_capacity,
                ..Default::default()
            },
        }
    }

    /// Create with custom backpressure configuration
    pub fn with_config(config: BackpressureConfig) -> Self {
        let (tx, rx) = bounded(config.channel_capacity);

        Self {
            adapters: HashMap::new(),
            metrics: Arc::new(IngestionMetrics::new()),
            tx,
            rx: Some(rx),
            default_config: config,
        }
    }

    /// Register a sample feed
    ///
    /// # Arguments
    /// * `feed_id` - Feed configuration ID
    /// * `source` - Feed implementing the `SampleSource` trait
    /// * `config` - Optional backpressure override
    #[instrument(
        name = "ingestion_register_feed",
        skip(self, source, config),
        fields(feed_id = %feed_id)
    )]
    pub fn register_feed(
        &mut self,
        feed_id: String,
        source: Box<dyn SampleSource>,
        config: Option<BackpressureConfig>,
    ) {
        let adapter = GenericFeedAdapter::new(
            feed_id.clone(),
            source,
            config.unwrap_or_else(|| self.default_config.clone()),
        );
        debug!(feed_id = %feed_id, "registered feed");
        self.adapters.insert(feed_id, Box::new(adapter));
    }

    /// Start all registered feeds
    #[instrument(name = "ingestion_start_all", skip(self))]
    pub fn start_all(&self) {
        info!(count = self.adapters.len(), "starting all feed adapters");
        for (feed_id, adapter) in &self.adapters {
            if !adapter.is_listening() {
                debug!(feed_id = %feed_id, "starting adapter");
                adapter.start(self.tx.clone(), self.metrics.clone());
            }
        }
    }

    /// Stop all feeds
    #[instrument(name = "ingestion_stop_all", skip(self))]
    pub fn stop_all(&self) {
        info!(count = self.adapters.len(), "stopping all feed adapters");
        for (feed_id, adapter) in &self.adapters {
            if adapter.is_listening() {
                debug!(feed_id = %feed_id, "stopping adapter");
                adapter.stop();
            }
        }
    }

    /// Take the merged sample stream receiver
    ///
    /// Can only be called once, subsequent calls return None.
    pub fn take_receiver(&mut self) -> Option<Receiver<ImuSample>> {
        self.rx.take()
    }

    /// Get metrics reference
    pub fn metrics(&self) -> Arc<IngestionMetrics> {
        self.metrics.clone()
    }

    /// Registered feed count
    pub fn feed_count(&self) -> usize {
        self.adapters.len()
    }

    /// Check if a specific feed is listening
    pub fn is_feed_listening(&self, feed_id: &str) -> bool {
        self.adapters
            .get(feed_id)
            .map(|a| a.is_listening())
            .unwrap_or(false)
    }
}

impl Drop for IngestionPipeline {
    fn drop(&mut self) {
        self.stop_all();
    }
}
