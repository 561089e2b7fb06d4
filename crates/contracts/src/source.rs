//! SampleSource trait - Sample feed abstraction
//!
//! Defines a unified interface for inertial sample feeds, decoupling
//! adapters from concrete feed implementations. Mock generators, replay
//! files, and real device feeds are handled uniformly.

use std::sync::Arc;

use crate::ImuSample;

/// Sample callback type
///
/// When a feed produces data, it sends `ImuSample` through this callback.
/// Uses `Arc` to allow callback sharing across multiple contexts.
pub type SampleCallback = Arc<dyn Fn(ImuSample) + Send + Sync>;

/// Sample feed trait
///
/// Abstracts the common behavior of mock, replay, and device feeds.
/// All feeds implement this trait for use by the ingestion pipeline.
///
/// # Example
///
/// ```ignore
/// let feed: Box<dyn SampleSource> = get_feed();
/// feed.listen(Arc::new(|sample| {
///     println!("sample at {}", sample.timestamp);
/// }));
/// // ... consume ...
/// feed.stop();
/// ```
pub trait SampleSource: Send + Sync {
    /// Get feed ID
    fn feed_id(&self) -> &str;

    /// Register data callback
    ///
    /// When the feed produces data, it calls the callback with each
    /// `ImuSample`. If already listening, repeated calls are idempotent
    /// (a second callback is not registered).
    fn listen(&self, callback: SampleCallback);

    /// Stop the feed
    ///
    /// For mock feeds this stops the background thread; for device feeds
    /// it unsubscribes the channel.
    fn stop(&self);

    /// Check if currently listening
    fn is_listening(&self) -> bool;
}
