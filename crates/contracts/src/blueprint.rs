//! CaptureBlueprint - Config Loader output
//!
//! Describes a complete capture setup: feed, engine tuning, output stores.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{
    CalibrationConfig, DetectorConfig, EngineConfig, FeedId, IntegratorConfig, OrchestratorConfig,
    SpinConfig,
};

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete capture configuration blueprint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureBlueprint {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Sample feed settings
    pub feed: FeedConfig,

    /// Engine tuning overrides
    #[serde(default)]
    pub engine: EngineOverrides,

    /// Output store configuration
    #[serde(default)]
    pub stores: Vec<StoreConfig>,
}

/// Sample feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Feed identifier
    pub id: FeedId,

    /// Accelerometer channel rate (Hz), must be > 0
    #[serde(default = "default_accel_rate")]
    pub accel_rate_hz: f64,

    /// Gyroscope channel rate (Hz), must be > 0
    #[serde(default = "default_gyro_rate")]
    pub gyro_rate_hz: f64,

    /// Ingestion queue capacity
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Backpressure policy when the queue is full
    #[serde(default)]
    pub drop_policy: DropPolicy,
}

fn default_accel_rate() -> f64 {
    100.0
}

fn default_gyro_rate() -> f64 {
    200.0
}

fn default_queue_capacity() -> usize {
    1024
}

/// Backpressure policy (queue full)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropPolicy {
    /// Drop the newest sample
    #[default]
    DropNewest,
    /// Drop the oldest sample
    DropOldest,
}

/// Optional overrides for the motion engine
///
/// Any section left out falls back to the engine defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineOverrides {
    #[serde(default)]
    pub detector: Option<DetectorConfig>,

    #[serde(default)]
    pub integrator: Option<IntegratorConfig>,

    #[serde(default)]
    pub spin: Option<SpinConfig>,

    #[serde(default)]
    pub calibration: Option<CalibrationConfig>,

    #[serde(default)]
    pub orchestrator: Option<OrchestratorConfig>,
}

/// Store output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store name
    pub name: String,

    /// Store type
    pub store_type: StoreType,

    /// Queue capacity
    #[serde(default = "default_store_queue_capacity")]
    pub queue_capacity: usize,

    /// Type-specific parameters
    #[serde(default)]
    pub params: HashMap<String, String>,
}

fn default_store_queue_capacity() -> usize {
    100
}

/// Store type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreType {
    /// Log output
    Log,
    /// JSON file per session
    File,
}

impl CaptureBlueprint {
    /// Build an EngineConfig from defaults plus blueprint overrides.
    ///
    /// Margins are reordered if the override inverted them, so the engine
    /// always sees `stop_margin < start_margin`.
    pub fn to_engine_config(&self) -> EngineConfig {
        let overrides = &self.engine;

        let mut detector = overrides.detector.clone().unwrap_or_default();
        if detector.stop_margin > detector.start_margin {
            std::mem::swap(&mut detector.stop_margin, &mut detector.start_margin);
        }

        EngineConfig {
            detector,
            integrator: overrides.integrator.clone().unwrap_or_default(),
            spin: overrides.spin.clone().unwrap_or_default(),
            calibration: overrides.calibration.clone().unwrap_or_default(),
            orchestrator: overrides.orchestrator.clone().unwrap_or_default(),
        }
    }
}
