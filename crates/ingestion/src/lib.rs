//! # Ingestion Pipeline
//!
//! Sample feed ingestion module.
//!
//! Responsibilities:
//! - Register sample feeds (mock, replay, device)
//! - Merge feeds into one `ImuSample` stream
//! - Backpressure management and drop policy
//! - Send to downstream via async-channel
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::{IngestionPipeline, ThrowProfileSource};
//!
//! let mut pipeline = IngestionPipeline::new(1024);
//! pipeline.register_feed(
//!     "wrist_imu".to_string(),
//!     Box::new(ThrowProfileSource::with_feed_id("wrist_imu")),
//!     None,
//! );
//!
//! pipeline.start_all();
//! let rx = pipeline.take_receiver().unwrap();
//! while let Ok(sample) = rx.recv().await {
//!     // feed the engine
//! }
//! ```

mod adapter;
mod common;
mod config;
mod error;
mod generic_adapter;
mod mock;
mod pipeline;
mod replay;

// Re-exports
pub use adapter::FeedAdapter;
pub use config::{BackpressureConfig, DropPolicy, IngestionMetrics, MetricsSnapshot};
pub use contracts::ImuSample;
pub use error::{IngestionError, Result};
pub use generic_adapter::GenericFeedAdapter;
pub use mock::{MockFeedConfig, ThrowProfileSource};
pub use pipeline::IngestionPipeline;
pub use replay::{load_samples, ReplayFeedSource};
