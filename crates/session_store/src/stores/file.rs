//! FileStore - persists sessions as JSON files

use std::collections::HashMap;
use std::fs::{self, File};
use std::path::PathBuf;

use chrono::Utc;
use contracts::{EngineError, Session, SessionStore, SessionSummary};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Configuration for FileStore
#[derive(Debug, Clone)]
pub struct FileStoreConfig {
    /// Base output directory
    pub base_path: PathBuf,
}

impl FileStoreConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let base_path = params
            .get("base_path")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./sessions"));

        Self { base_path }
    }
}

/// Run manifest, written next to the session files.
#[derive(Debug, Serialize, Deserialize)]
struct Manifest {
    store: String,
    created_at: String,
    session_count: u64,
}

/// Store that writes each session to `<base_path>/<session_id>.json`
pub struct FileStore {
    name: String,
    config: FileStoreConfig,
    session_count: u64,
}

impl FileStore {
    /// Create a new FileStore
    pub fn new(name: impl Into<String>, config: FileStoreConfig) -> std::io::Result<Self> {
        fs::create_dir_all(&config.base_path)?;

        Ok(Self {
            name: name.into(),
            config,
            session_count: 0,
        })
    }

    /// Create from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> std::io::Result<Self> {
        let config = FileStoreConfig::from_params(params);
        Self::new(name, config)
    }

    fn session_path(&self, id: &str) -> PathBuf {
        self.config.base_path.join(format!("{id}.json"))
    }

    fn write_error(&self, message: impl std::fmt::Display) -> EngineError {
        EngineError::store_write(&self.name, message.to_string())
    }

    fn write_manifest(&self) -> Result<(), EngineError> {
        let manifest = Manifest {
            store: self.name.clone(),
            created_at: Utc::now().to_rfc3339(),
            session_count: self.session_count,
        };
        let path = self.config.base_path.join("manifest.json");
        let file = File::create(path).map_err(|e| self.write_error(e))?;
        serde_json::to_writer_pretty(file, &manifest).map_err(|e| self.write_error(e))
    }
}

impl SessionStore for FileStore {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "file_store_write",
        skip(self, session),
        fields(store = %self.name, session_id = %session.id)
    )]
    async fn store(&mut self, session: &Session) -> Result<(), EngineError> {
        let path = self.session_path(&session.id);
        let file = File::create(&path).map_err(|e| self.write_error(e))?;
        serde_json::to_writer_pretty(file, session).map_err(|e| self.write_error(e))?;

        self.session_count += 1;
        debug!(store = %self.name, path = %path.display(), "Session written");
        Ok(())
    }

    async fn list(&mut self) -> Result<Vec<SessionSummary>, EngineError> {
        let mut summaries = Vec::new();

        for entry in fs::read_dir(&self.config.base_path)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if path.file_name().and_then(|n| n.to_str()) == Some("manifest.json") {
                continue;
            }

            let file = File::open(&path)?;
            match serde_json::from_reader::<_, Session>(file) {
                Ok(session) => summaries.push(session.summary()),
                Err(e) => {
                    // Foreign file in the session directory, skip it
                    debug!(store = %self.name, path = %path.display(), error = %e, "Skipping unreadable file");
                }
            }
        }

        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(summaries)
    }

    async fn load(&mut self, id: &str) -> Result<Session, EngineError> {
        let path = self.session_path(id);
        if !path.exists() {
            return Err(EngineError::SessionNotFound {
                store_name: self.name.clone(),
                session_id: id.to_string(),
            });
        }

        let file = File::open(&path)?;
        serde_json::from_reader(file).map_err(|e| self.write_error(e))
    }

    #[instrument(name = "file_store_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), EngineError> {
        self.write_manifest()
    }

    #[instrument(name = "file_store_close", skip(self))]
    async fn close(&mut self) -> Result<(), EngineError> {
        self.write_manifest()
    }
}
