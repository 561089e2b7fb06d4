//! Store dispatcher error types

use thiserror::Error;

/// Store dispatcher errors
#[derive(Debug, Error)]
pub enum StoreDispatchError {
    /// Store creation error
    #[error("failed to create store '{name}': {message}")]
    StoreCreation { name: String, message: String },

    /// Queue full, session dropped
    #[error("queue full for store '{store_name}', session {session_id} dropped")]
    QueueFull {
        store_name: String,
        session_id: String,
    },

    /// Store error (from contract)
    #[error("store error: {0}")]
    Engine(#[from] contracts::EngineError),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreDispatchError {
    /// Create a store creation error
    pub fn store_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StoreCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}
