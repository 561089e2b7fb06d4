//! Feed adapter trait

use std::sync::Arc;

use async_channel::Sender;
use contracts::ImuSample;

use crate::config::IngestionMetrics;

/// Feed adapter trait
///
/// Implemented per feed kind. Responsibilities:
/// 1. Register the feed callback
/// 2. Wrap readings as `ImuSample`
/// 3. Send to the channel, applying the drop policy
pub trait FeedAdapter: Send + Sync {
    /// Get feed ID
    fn feed_id(&self) -> &str;

    /// Start sample capture
    ///
    /// # Arguments
    /// * `tx` - Sample sender channel
    /// * `metrics` - Shared ingestion metrics
    fn start(&self, tx: Sender<ImuSample>, metrics: Arc<IngestionMetrics>);

    /// Stop sample capture
    fn stop(&self);

    /// Check whether the adapter is listening
    fn is_listening(&self) -> bool;
}
