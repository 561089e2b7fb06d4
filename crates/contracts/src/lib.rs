//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Uses the sample feed's monotonic timestamp (seconds, f64) as primary clock
//! - All engine timers (debounce, settle delay, ZUPT) are driven by this clock,
//!   never by wall time

mod blueprint;
mod engine_config;
mod error;
mod feed_id;
mod sample;
mod session;
mod snapshot;
mod source;
mod state;
mod store;

pub use blueprint::*;
pub use engine_config::*;
pub use error::*;
pub use feed_id::FeedId;
pub use sample::*;
pub use session::*;
pub use snapshot::*;
pub use source::{SampleCallback, SampleSource};
pub use state::*;
pub use store::*;
