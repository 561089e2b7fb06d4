//! Ingestion error types

use thiserror::Error;

/// Ingestion error
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Replay line could not be parsed
    #[error("failed to parse replay line {line}: {message}")]
    ReplayParse {
        /// 1-based line number in the replay file
        line: usize,
        /// Error message
        message: String,
    },

    /// Replay file could not be opened or read
    #[error("replay io error: {0}")]
    ReplayIo(#[from] std::io::Error),

    /// Channel closed
    #[error("channel closed for feed {feed_id}")]
    ChannelClosed {
        /// Feed ID
        feed_id: String,
    },

    /// Feed is not listening
    #[error("feed {feed_id} is not listening")]
    FeedNotListening {
        /// Feed ID
        feed_id: String,
    },

    /// Feed is already listening
    #[error("feed {feed_id} is already listening")]
    AlreadyListening {
        /// Feed ID
        feed_id: String,
    },
}

/// Ingestion Result alias
pub type Result<T> = std::result::Result<T, IngestionError>;
