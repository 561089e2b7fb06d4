//! ImuSample - Sample feed output
//!
//! Raw inertial sample structure as delivered by a sample feed.

use serde::{Deserialize, Serialize};

use crate::FeedId;

/// Standard gravity, used to convert accelerometer readings from g to m/s².
pub const STANDARD_GRAVITY: f64 = 9.80665;

/// Degrees-per-second per revolution-per-minute (360 / 60).
pub const DEG_PER_SEC_PER_RPM: f64 = 6.0;

/// Inertial sample
///
/// One timestamped reading from the accelerometer or gyroscope channel.
/// Samples are transient: consumed per tick, never stored by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImuSample {
    /// Originating feed ID
    pub feed_id: FeedId,

    /// Monotonic feed timestamp (seconds, f64) - primary clock
    pub timestamp: f64,

    /// Sample payload
    pub payload: SamplePayload,
}

/// Sample payload, tagged by channel
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplePayload {
    /// Accelerometer reading in g
    Accel(Vector3),

    /// Gyroscope reading in deg/s
    Gyro(Vector3),
}

impl ImuSample {
    /// Create an accelerometer sample (units: g).
    pub fn accel(feed_id: impl Into<FeedId>, timestamp: f64, x: f64, y: f64, z: f64) -> Self {
        Self {
            feed_id: feed_id.into(),
            timestamp,
            payload: SamplePayload::Accel(Vector3 { x, y, z }),
        }
    }

    /// Create a gyroscope sample (units: deg/s).
    pub fn gyro(feed_id: impl Into<FeedId>, timestamp: f64, x: f64, y: f64, z: f64) -> Self {
        Self {
            feed_id: feed_id.into(),
            timestamp,
            payload: SamplePayload::Gyro(Vector3 { x, y, z }),
        }
    }

    /// True if every component of the payload vector is finite.
    pub fn is_finite(&self) -> bool {
        self.timestamp.is_finite()
            && match self.payload {
                SamplePayload::Accel(v) | SamplePayload::Gyro(v) => v.is_finite(),
            }
    }
}

/// 3D vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean norm of all three components.
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Norm of the x/y plane only. The vertical axis is excluded so that
    /// gravity residual does not leak into motion energy.
    pub fn horizontal_magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Scale every component by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            z: self.z * factor,
        }
    }
}
