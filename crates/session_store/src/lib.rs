//! # Session Store
//!
//! Session persistence module.
//!
//! Responsibilities:
//! - Consume finalized `Session`s
//! - Fan-out to multiple stores
//! - Isolate slow stores so they never block the capture loop

pub mod dispatcher;
pub mod error;
pub mod handle;
pub mod metrics;
pub mod stores;

pub use contracts::{Session, SessionStore};
pub use dispatcher::{create_dispatcher, StoreDispatcher, StoreDispatcherBuilder, StoreDispatcherConfig};
pub use error::StoreDispatchError;
pub use handle::StoreHandle;
pub use metrics::{MetricsSnapshot, StoreMetrics};
pub use stores::{FileStore, FileStoreConfig, LogStore};
