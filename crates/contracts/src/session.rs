//! Session - Motion engine output
//!
//! One finalized capture burst. The serde schema is stable: field names,
//! SI units (m/s, RPM), and f64-seconds timestamps are fixed so that
//! historical sessions stay loadable across engine versions.

use serde::{Deserialize, Serialize};

use crate::Vector3;

/// One point of a per-sample time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Feed timestamp (seconds)
    pub timestamp: f64,

    /// Sampled value (m/s for speed, RPM for spin)
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(timestamp: f64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Finalized capture session.
///
/// Created once per completed motion event, immutable once persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique session ID
    pub id: String,

    /// Feed timestamp at motion onset (seconds)
    pub start_time: f64,

    /// Feed timestamp at finalization (seconds)
    pub end_time: f64,

    /// Number of accelerometer samples consumed during Logging
    pub sample_count: u64,

    /// Peak speed over the burst (m/s)
    pub max_speed_mps: f64,

    /// Mean speed over the burst (m/s)
    pub avg_speed_mps: f64,

    /// Peak spin rate over the burst (RPM)
    pub max_rpm: f64,

    /// Mean spin rate over the burst (RPM)
    pub avg_rpm: f64,

    /// Dominant rotation axis, snapped to a signed principal axis
    pub dominant_axis: Vector3,

    /// Per-sample speed time series (timestamp, m/s)
    pub speed_series: Vec<SeriesPoint>,

    /// Per-sample spin time series (timestamp, RPM)
    pub spin_series: Vec<SeriesPoint>,
}

impl Session {
    /// Burst duration in seconds.
    pub fn duration(&self) -> f64 {
        (self.end_time - self.start_time).max(0.0)
    }

    /// Condensed form for snapshots and listings.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id.clone(),
            start_time: self.start_time,
            duration: self.duration(),
            sample_count: self.sample_count,
            max_speed_mps: self.max_speed_mps,
            avg_speed_mps: self.avg_speed_mps,
            max_rpm: self.max_rpm,
            avg_rpm: self.avg_rpm,
        }
    }
}

/// Session summary without the time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub start_time: f64,
    pub duration: f64,
    pub sample_count: u64,
    pub max_speed_mps: f64,
    pub avg_speed_mps: f64,
    pub max_rpm: f64,
    pub avg_rpm: f64,
}
