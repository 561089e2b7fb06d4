//! Spin-rate estimator
//!
//! Low-pass filters the angular-rate stream into a smoothed RPM value and a
//! dominant rotation axis snapped to the nearest signed principal axis.

use std::collections::VecDeque;

use contracts::{SpinConfig, Vector3, DEG_PER_SEC_PER_RPM};
use nalgebra::Vector3 as NaVector3;

/// Per-sample spin estimate.
#[derive(Debug, Clone, Copy)]
pub struct SpinReading {
    /// Smoothed spin rate (RPM)
    pub rpm: f64,

    /// Dominant rotation axis (signed unit principal axis)
    pub dominant_axis: Vector3,
}

/// Angular-rate filter and RPM converter.
pub struct SpinEstimator {
    config: SpinConfig,
    filtered: NaVector3<f64>,
    seeded: bool,
    rpm_window: VecDeque<f64>,
    dominant_axis: Vector3,
}

impl SpinEstimator {
    pub fn new(config: SpinConfig) -> Self {
        Self {
            config,
            filtered: NaVector3::zeros(),
            seeded: false,
            rpm_window: VecDeque::new(),
            dominant_axis: Vector3::ZERO,
        }
    }

    /// Process one gyroscope sample (deg/s).
    pub fn on_sample(&mut self, angular_rate: Vector3) -> SpinReading {
        let raw = NaVector3::new(angular_rate.x, angular_rate.y, angular_rate.z);

        if !self.seeded {
            self.filtered = raw;
            self.seeded = true;
        } else {
            let a = self.config.lp_alpha;
            self.filtered = self.filtered * (1.0 - a) + raw * a;
        }

        let magnitude_dps = self.filtered.norm();
        let instantaneous_rpm = magnitude_dps / DEG_PER_SEC_PER_RPM;

        if self.rpm_window.len() >= self.config.smoothing_samples.max(1) {
            self.rpm_window.pop_front();
        }
        self.rpm_window.push_back(instantaneous_rpm);

        // Axis only updates above the significance threshold, so a slowly
        // tumbling sensor at rest does not flicker between axes
        if magnitude_dps > self.config.axis_significance_dps {
            self.dominant_axis = snap_to_principal_axis(&self.filtered);
        }

        SpinReading {
            rpm: self.rpm(),
            dominant_axis: self.dominant_axis,
        }
    }

    /// Moving-average RPM over the smoothing window.
    pub fn rpm(&self) -> f64 {
        if self.rpm_window.is_empty() {
            return 0.0;
        }
        self.rpm_window.iter().sum::<f64>() / self.rpm_window.len() as f64
    }

    pub fn dominant_axis(&self) -> Vector3 {
        self.dominant_axis
    }

    pub fn reset(&mut self) {
        self.filtered = NaVector3::zeros();
        self.seeded = false;
        self.rpm_window.clear();
        self.dominant_axis = Vector3::ZERO;
    }
}

/// Snap a rotation vector to the signed principal axis of its largest
/// component.
fn snap_to_principal_axis(v: &NaVector3<f64>) -> Vector3 {
    let ax = v.x.abs();
    let ay = v.y.abs();
    let az = v.z.abs();

    if ax >= ay && ax >= az {
        Vector3::new(v.x.signum(), 0.0, 0.0)
    } else if ay >= az {
        Vector3::new(0.0, v.y.signum(), 0.0)
    } else {
        Vector3::new(0.0, 0.0, v.z.signum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_estimator() -> SpinEstimator {
        SpinEstimator::new(SpinConfig {
            lp_alpha: 1.0,
            smoothing_samples: 10,
            axis_significance_dps: 30.0,
        })
    }

    #[test]
    fn test_rpm_conversion() {
        let mut spin = make_estimator();
        // 360 deg/s = one revolution per second = 60 RPM
        let mut reading = spin.on_sample(Vector3::new(0.0, 0.0, 360.0));
        for _ in 0..20 {
            reading = spin.on_sample(Vector3::new(0.0, 0.0, 360.0));
        }
        assert!((reading.rpm - 60.0).abs() < 1e-9, "got {}", reading.rpm);
    }

    #[test]
    fn test_axis_snaps_to_largest_component() {
        let mut spin = make_estimator();
        let reading = spin.on_sample(Vector3::new(-50.0, 20.0, 10.0));
        assert_eq!(reading.dominant_axis, Vector3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_axis_held_below_significance() {
        let mut spin = make_estimator();
        spin.on_sample(Vector3::new(0.0, 200.0, 0.0));
        assert_eq!(spin.dominant_axis(), Vector3::new(0.0, 1.0, 0.0));

        // Weak rotation on another axis must not steal the dominant axis
        spin.on_sample(Vector3::new(10.0, 0.0, 0.0));
        assert_eq!(spin.dominant_axis(), Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_moving_average_smooths_spikes() {
        let mut spin = make_estimator();
        for _ in 0..9 {
            spin.on_sample(Vector3::new(0.0, 0.0, 60.0));
        }
        let reading = spin.on_sample(Vector3::new(0.0, 0.0, 600.0));
        // One 100 RPM spike among nine 10 RPM samples
        assert!((reading.rpm - 19.0).abs() < 1e-9, "got {}", reading.rpm);
    }

    #[test]
    fn test_reset_zeroes_everything() {
        let mut spin = make_estimator();
        spin.on_sample(Vector3::new(0.0, 0.0, 600.0));
        spin.reset();
        assert_eq!(spin.rpm(), 0.0);
        assert_eq!(spin.dominant_axis(), Vector3::ZERO);
    }
}
