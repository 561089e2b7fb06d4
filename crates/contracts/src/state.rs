//! Engine state enums
//!
//! MotionState is owned by the detector, RecordingPhase by the
//! orchestrator. No other component mutates either.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse motion state emitted by the detector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionState {
    /// Engine not started
    #[default]
    Idle,

    /// Baseline warm-up in progress, detection not yet armed
    Calibrating,

    /// Armed and watching for motion onset
    Monitoring,

    /// Above start threshold for the debounce duration
    Moving,
}

impl MotionState {
    pub fn is_moving(&self) -> bool {
        matches!(self, MotionState::Moving)
    }
}

impl fmt::Display for MotionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MotionState::Idle => "idle",
            MotionState::Calibrating => "calibrating",
            MotionState::Monitoring => "monitoring",
            MotionState::Moving => "moving",
        };
        write!(f, "{s}")
    }
}

/// Recording phase of one capture cycle.
///
/// Strictly one active phase at a time:
/// `Idle → Calibrating → Monitoring ⇄ Logging → Processing → Ready`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordingPhase {
    #[default]
    Idle,

    /// Calibrator running on the warm-up window
    Calibrating,

    /// Low-rate monitoring, detection armed
    Monitoring,

    /// High-rate capture while motion is active
    Logging,

    /// Motion ended, session statistics being computed
    Processing,

    /// Session finalized and handed to the store
    Ready,
}

impl RecordingPhase {
    /// True while the integrator and spin estimator consume samples.
    pub fn is_logging(&self) -> bool {
        matches!(self, RecordingPhase::Logging)
    }
}

impl fmt::Display for RecordingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RecordingPhase::Idle => "idle",
            RecordingPhase::Calibrating => "calibrating",
            RecordingPhase::Monitoring => "monitoring",
            RecordingPhase::Logging => "logging",
            RecordingPhase::Processing => "processing",
            RecordingPhase::Ready => "ready",
        };
        write!(f, "{s}")
    }
}
