//! SessionStore trait - persistence interface
//!
//! Defines the abstract interface for session stores.

use crate::{EngineError, Session, SessionSummary};

/// Session persistence trait
///
/// All store implementations must implement this trait.
#[trait_variant::make(SessionStore: Send)]
pub trait LocalSessionStore {
    /// Store name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Persist a finalized session
    ///
    /// # Errors
    /// Returns a store write error (should include context)
    async fn store(&mut self, session: &Session) -> Result<(), EngineError>;

    /// Enumerate summaries of previously stored sessions
    async fn list(&mut self) -> Result<Vec<SessionSummary>, EngineError>;

    /// Load a full session by ID
    async fn load(&mut self, id: &str) -> Result<Session, EngineError>;

    /// Flush buffered writes (if any)
    async fn flush(&mut self) -> Result<(), EngineError>;

    /// Close the store
    async fn close(&mut self) -> Result<(), EngineError>;
}
