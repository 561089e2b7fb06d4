//! LogStore - logs session summaries via tracing

use contracts::{EngineError, Session, SessionStore, SessionSummary};
use tracing::{info, instrument};

/// Store that logs session summaries for debugging
pub struct LogStore {
    name: String,
}

impl LogStore {
    /// Create a new LogStore with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn log_session_summary(&self, session: &Session) {
        info!(
            store = %self.name,
            session_id = %session.id,
            duration_s = session.duration(),
            samples = session.sample_count,
            max_speed_mps = session.max_speed_mps,
            max_rpm = session.max_rpm,
            "Session finalized"
        );
    }
}

impl SessionStore for LogStore {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_store_write",
        skip(self, session),
        fields(store = %self.name, session_id = %session.id)
    )]
    async fn store(&mut self, session: &Session) -> Result<(), EngineError> {
        self.log_session_summary(session);
        Ok(())
    }

    async fn list(&mut self) -> Result<Vec<SessionSummary>, EngineError> {
        // Log store keeps nothing
        Ok(vec![])
    }

    async fn load(&mut self, id: &str) -> Result<Session, EngineError> {
        Err(EngineError::SessionNotFound {
            store_name: self.name.clone(),
            session_id: id.to_string(),
        })
    }

    #[instrument(name = "log_store_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), EngineError> {
        Ok(())
    }

    #[instrument(name = "log_store_close", skip(self))]
    async fn close(&mut self) -> Result<(), EngineError> {
        info!(store = %self.name, "LogStore closed");
        Ok(())
    }
}
