//! Layered error definitions
//!
//! Categorized by source: config / feed / calibration / engine / store

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum EngineError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Feed Errors =====
    /// Feed disconnected mid-session
    #[error("feed '{feed_id}' disconnected: {message}")]
    FeedDisconnected { feed_id: String, message: String },

    /// Replay source parse error
    #[error("replay parse error at line {line}: {message}")]
    ReplayParse { line: usize, message: String },

    // ===== Calibration Errors =====
    /// Calibration failed after retry
    #[error("calibration failed: {message}")]
    Calibration { message: String },

    // ===== Engine Errors =====
    /// Command rejected in the current phase
    #[error("invalid command in phase '{phase}': {message}")]
    InvalidCommand { phase: String, message: String },

    // ===== Store Errors =====
    /// Store write error
    #[error("store '{store_name}' write error: {message}")]
    StoreWrite {
        store_name: String,
        message: String,
    },

    /// Session not found
    #[error("store '{store_name}': session not found: {session_id}")]
    SessionNotFound {
        store_name: String,
        session_id: String,
    },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl EngineError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create calibration error
    pub fn calibration(message: impl Into<String>) -> Self {
        Self::Calibration {
            message: message.into(),
        }
    }

    /// Create feed disconnect error
    pub fn feed_disconnected(feed_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FeedDisconnected {
            feed_id: feed_id.into(),
            message: message.into(),
        }
    }

    /// Create store write error
    pub fn store_write(store_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StoreWrite {
            store_name: store_name.into(),
            message: message.into(),
        }
    }
}
