//! StoreDispatcher - main loop for fan-out to stores

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use contracts::{Session, StoreConfig, StoreType};

use crate::error::StoreDispatchError;
use crate::handle::StoreHandle;
use crate::metrics::MetricsSnapshot;
use crate::stores::{FileStore, LogStore};

/// Store dispatcher configuration
#[derive(Debug, Clone)]
pub struct StoreDispatcherConfig {
    /// Store configurations
    pub stores: Vec<StoreConfig>,
}

/// Builder for creating a StoreDispatcher
pub struct StoreDispatcherBuilder {
    config: StoreDispatcherConfig,
    input_rx: mpsc::Receiver<Session>,
}

impl StoreDispatcherBuilder {
    /// Create a new StoreDispatcherBuilder
    pub fn new(config: StoreDispatcherConfig, input_rx: mpsc::Receiver<Session>) -> Self {
        Self { config, input_rx }
    }

    /// Build and start the dispatcher
    #[instrument(name = "store_dispatcher_build", skip(self))]
    pub fn build(self) -> Result<StoreDispatcher, StoreDispatchError> {
        let handles = Self::initialize_handles(&self.config)?;

        Ok(StoreDispatcher {
            handles,
            input_rx: self.input_rx,
        })
    }

    #[instrument(
        name = "store_dispatcher_initialize_handles",
        skip(config),
        fields(store_count = config.stores.len())
    )]
    fn initialize_handles(
        config: &StoreDispatcherConfig,
    ) -> Result<Vec<StoreHandle>, StoreDispatchError> {
        let mut handles = Vec::with_capacity(config.stores.len());
        for store_config in &config.stores {
            handles.push(create_store_handle(store_config)?);
        }
        Ok(handles)
    }
}

/// Create a StoreHandle from configuration
#[instrument(
    name = "store_dispatcher_create_handle",
    skip(config),
    fields(store = %config.name, store_type = ?config.store_type)
)]
fn create_store_handle(config: &StoreConfig) -> Result<StoreHandle, StoreDispatchError> {
    match config.store_type {
        StoreType::Log => {
            let store = LogStore::new(&config.name);
            Ok(StoreHandle::spawn(store, config.queue_capacity))
        }
        StoreType::File => {
            let store = FileStore::from_params(&config.name, &config.params)
                .map_err(|e| StoreDispatchError::store_creation(&config.name, e.to_string()))?;
            Ok(StoreHandle::spawn(store, config.queue_capacity))
        }
    }
}

/// The main dispatcher that fans out sessions to stores
pub struct StoreDispatcher {
    handles: Vec<StoreHandle>,
    input_rx: mpsc::Receiver<Session>,
}

impl StoreDispatcher {
    /// Create a dispatcher with custom store handles (for testing)
    pub fn with_handles(handles: Vec<StoreHandle>, input_rx: mpsc::Receiver<Session>) -> Self {
        Self { handles, input_rx }
    }

    /// Get metrics for all stores
    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        self.handles
            .iter()
            .map(|h| (h.name().to_string(), h.metrics().snapshot()))
            .collect()
    }

    /// Run the dispatcher main loop
    ///
    /// Consumes sessions from input and fans out to all stores.
    /// Returns when the input channel is closed.
    #[instrument(name = "store_dispatcher_run", skip(self))]
    pub async fn run(mut self) {
        info!(stores = self.handles.len(), "Store dispatcher started");

        let mut session_count: u64 = 0;

        while let Some(session) = self.input_rx.recv().await {
            session_count += 1;
            debug!(session_id = %session.id, "Dispatching session");
            for handle in &self.handles {
                handle.try_send(session.clone());
            }
        }

        info!(
            sessions = session_count,
            "Store dispatcher input closed, shutting down"
        );

        for handle in self.handles {
            handle.shutdown().await;
        }

        info!("Store dispatcher shutdown complete");
    }

    /// Spawn the dispatcher as a background task
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }
}

/// Convenience function to create a dispatcher from store configs
#[instrument(name = "store_dispatcher_create", skip(store_configs, input_rx))]
pub fn create_dispatcher(
    store_configs: Vec<StoreConfig>,
    input_rx: mpsc::Receiver<Session>,
) -> Result<StoreDispatcher, StoreDispatchError> {
    let config = StoreDispatcherConfig {
        stores: store_configs,
    };
    StoreDispatcherBuilder::new(config, input_rx).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::Vector3;
    use std::collections::HashMap;

    fn make_session(n: u64) -> Session {
        Session {
            id: format!("session-{n:05}"),
            start_time: n as f64,
            end_time: n as f64 + 0.5,
            sample_count: 50,
            max_speed_mps: 1.2,
            avg_speed_mps: 0.6,
            max_rpm: 200.0,
            avg_rpm: 90.0,
            dominant_axis: Vector3::new(0.0, 0.0, 1.0),
            speed_series: vec![],
            spin_series: vec![],
        }
    }

    #[tokio::test]
    async fn test_dispatcher_fanout() {
        let (input_tx, input_rx) = mpsc::channel(10);

        let handles = vec![
            StoreHandle::spawn(LogStore::new("store1"), 10),
            StoreHandle::spawn(LogStore::new("store2"), 10),
        ];

        let dispatcher = StoreDispatcher::with_handles(handles, input_rx);
        let handle = dispatcher.spawn();

        for i in 0..5 {
            input_tx.send(make_session(i)).await.unwrap();
        }

        drop(input_tx);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_create_dispatcher_from_config() {
        let (input_tx, input_rx) = mpsc::channel(10);

        let configs = vec![StoreConfig {
            name: "test_log".to_string(),
            store_type: StoreType::Log,
            queue_capacity: 50,
            params: HashMap::new(),
        }];

        let dispatcher = create_dispatcher(configs, input_rx).unwrap();
        let handle = dispatcher.spawn();

        input_tx.send(make_session(1)).await.unwrap();

        drop(input_tx);
        handle.await.unwrap();
    }
}
