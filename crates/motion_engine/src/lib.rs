//! # Motion Engine
//!
//! Online motion detection and dead-reckoning speed/rotation estimation.
//!
//! Responsibilities:
//! - Windowed RMS energy motion detection with hysteresis and debounce
//! - Dead-reckoning velocity integration with bias correction, exponential
//!   decay, and zero-velocity updates (ZUPT)
//! - Low-pass spin-rate (RPM) estimation with dominant-axis tracking
//! - The two-tier recording state machine producing `Session` records
//!
//! ## Usage
//!
//! ```ignore
//! use contracts::{EngineConfig, ImuSample};
//! use motion_engine::MotionEngine;
//!
//! let mut engine = MotionEngine::new(EngineConfig::default(), 100.0);
//! engine.start()?;
//!
//! // Push samples as they arrive
//! let outcome = engine.push(&sample);
//! if let Some(session) = outcome.completed_session {
//!     // Hand off to the session store
//! }
//! ```

mod calibrator;
mod detector;
mod energy_window;
mod engine;
mod integrator;
mod spin;

pub use calibrator::Calibrator;
pub use detector::{DetectorVerdict, MotionStateDetector};
pub use energy_window::EnergyWindow;
pub use engine::{MotionEngine, PushOutcome};
pub use integrator::VelocityIntegrator;
pub use spin::{SpinEstimator, SpinReading};

// Re-export contracts types
pub use contracts::{
    CalibrationConfig, DetectorConfig, EngineConfig, EngineSnapshot, ImuSample, IntegratorConfig,
    MotionState, OrchestratorConfig, RecordingPhase, SamplePayload, Session, SpinConfig,
};
