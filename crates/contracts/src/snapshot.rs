//! EngineSnapshot - Observer-facing engine state
//!
//! Pushed to observers after every processed event. Observers never hold a
//! live reference into engine state.

use serde::{Deserialize, Serialize};

use crate::{RecordingPhase, SessionSummary, Vector3};

/// Immutable snapshot of engine state after one processed event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// Current recording phase
    pub phase: RecordingPhase,

    /// Detector verdict (true while Moving)
    pub motion_detected: bool,

    /// Current speed estimate (m/s), 0 outside Logging
    pub speed_mps: f64,

    /// Current smoothed spin rate (RPM)
    pub rpm: f64,

    /// Dominant rotation axis at last update
    pub dominant_axis: Vector3,

    /// Summary of the most recently finalized session, if any
    pub last_session: Option<SessionSummary>,
}
