//! Baseline calibrator
//!
//! Consumes a fixed warm-up window of Monitoring-phase acceleration and
//! stores the terminal value of the runtime RMS energy metric as the
//! stationary baseline. Runs once per detection cycle, before motion
//! detection is armed.

use contracts::{CalibrationConfig, EngineError, Vector3};

use crate::energy_window::EnergyWindow;

/// Warm-up baseline estimator.
///
/// Feeds through the same low-pass + horizontal-magnitude + windowed-RMS
/// pipeline the detector uses at runtime, so the baseline and the live
/// metric are directly comparable.
pub struct Calibrator {
    config: CalibrationConfig,
    lp_alpha: f64,
    window: EnergyWindow,
    filtered: Vector3,
    first_timestamp: Option<f64>,
    sample_count: usize,
    seeded: bool,
}

impl Calibrator {
    /// `lp_alpha` and `window_sec` come from the detector configuration so
    /// the metric matches runtime detection; `sample_rate_hz` sizes the
    /// window.
    pub fn new(
        config: CalibrationConfig,
        lp_alpha: f64,
        window_sec: f64,
        sample_rate_hz: f64,
    ) -> Self {
        Self {
            config,
            lp_alpha,
            window: EnergyWindow::for_rate(window_sec, sample_rate_hz),
            filtered: Vector3::ZERO,
            first_timestamp: None,
            sample_count: 0,
            seeded: false,
        }
    }

    /// Feed one acceleration sample (m/s²).
    ///
    /// Returns `Some(baseline)` once the warm-up window has elapsed. An
    /// elapsed window without enough samples is a calibration failure; the
    /// orchestrator resets and retries once.
    pub fn push(&mut self, accel: Vector3, timestamp: f64) -> Option<Result<f64, EngineError>> {
        let first = *self.first_timestamp.get_or_insert(timestamp);

        if !self.seeded {
            self.filtered = accel;
            self.seeded = true;
        } else {
            let a = self.lp_alpha;
            self.filtered = Vector3::new(
                self.filtered.x * (1.0 - a) + accel.x * a,
                self.filtered.y * (1.0 - a) + accel.y * a,
                self.filtered.z * (1.0 - a) + accel.z * a,
            );
        }

        let horizontal = self.filtered.horizontal_magnitude();
        self.window.push(horizontal * horizontal);
        self.sample_count += 1;

        if timestamp - first < self.config.warmup_sec {
            return None;
        }

        if self.sample_count < self.config.min_samples {
            return Some(Err(EngineError::calibration(format!(
                "insufficient samples: got {}, need {}",
                self.sample_count, self.config.min_samples
            ))));
        }

        Some(Ok(self.window.rms()))
    }

    /// Discard progress for a fresh warm-up window.
    pub fn reset(&mut self) {
        self.window.clear();
        self.filtered = Vector3::ZERO;
        self.first_timestamp = None;
        self.sample_count = 0;
        self.seeded = false;
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }
}
