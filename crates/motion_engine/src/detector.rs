//! Motion state detector
//!
//! Windowed RMS energy detector with hysteresis and debounce. Also runs the
//! independent stationary timer that triggers ZUPT events for the velocity
//! integrator.

use contracts::{clamp_dt, DetectorConfig, MotionState, Vector3};
use tracing::debug;

use crate::energy_window::EnergyWindow;

/// Per-sample detector output.
#[derive(Debug, Clone, Copy)]
pub struct DetectorVerdict {
    /// Coarse state after this sample
    pub state: MotionState,

    /// Windowed RMS energy (m/s²)
    pub rms: f64,

    /// Stationary timer expired: the integrator must zero velocity and
    /// update its bias, even if the coarse state has not flagged a stop
    pub zupt: bool,

    /// Monitoring→Moving transition happened on this sample
    pub started: bool,

    /// Moving→Monitoring transition happened on this sample
    pub stopped: bool,
}

/// Hysteretic RMS energy detector.
///
/// Thresholds float on an adaptive baseline: `start = baseline +
/// start_margin`, `stop = baseline + stop_margin` with `stop_margin <
/// start_margin`. The baseline tracks slow drift of the noise floor
/// (temperature, mount looseness) but only adapts while not moving.
pub struct MotionStateDetector {
    config: DetectorConfig,
    window: EnergyWindow,
    filtered: Vector3,
    seeded: bool,
    baseline_rms: f64,
    baseline_set: bool,
    state: MotionState,
    above_accum: f64,
    below_accum: f64,
    stationary_accum: f64,
}

impl MotionStateDetector {
    pub fn new(config: DetectorConfig, sample_rate_hz: f64) -> Self {
        let window = EnergyWindow::for_rate(config.window_sec, sample_rate_hz);
        Self {
            config,
            window,
            filtered: Vector3::ZERO,
            seeded: false,
            baseline_rms: 0.0,
            baseline_set: false,
            state: MotionState::Idle,
            above_accum: 0.0,
            below_accum: 0.0,
            stationary_accum: 0.0,
        }
    }

    /// Arm detection with a calibrated baseline. Clears all per-cycle state.
    pub fn arm(&mut self, baseline_rms: f64) {
        self.window.clear();
        self.filtered = Vector3::ZERO;
        self.seeded = false;
        self.baseline_rms = baseline_rms;
        self.baseline_set = true;
        self.state = MotionState::Monitoring;
        self.above_accum = 0.0;
        self.below_accum = 0.0;
        self.stationary_accum = 0.0;
    }

    /// Process one acceleration sample (m/s²). `dt` is clamped internally.
    pub fn on_sample(&mut self, accel: Vector3, dt: f64) -> DetectorVerdict {
        let dt = clamp_dt(dt);

        if !self.seeded {
            self.filtered = accel;
            self.seeded = true;
        } else {
            let a = self.config.lp_alpha;
            self.filtered = Vector3::new(
                self.filtered.x * (1.0 - a) + accel.x * a,
                self.filtered.y * (1.0 - a) + accel.y * a,
                self.filtered.z * (1.0 - a) + accel.z * a,
            );
        }

        let horizontal = self.filtered.horizontal_magnitude();
        self.window.push(horizontal * horizontal);
        let rms = self.window.rms();

        // First sample with no calibrated prior: seed the baseline
        if !self.baseline_set {
            self.baseline_rms = rms;
            self.baseline_set = true;
        }

        if self.state != MotionState::Moving {
            let g = self.config.baseline_gain;
            self.baseline_rms = self.baseline_rms * (1.0 - g) + rms * g;
        }

        let start_threshold = self.baseline_rms + self.config.start_margin;
        let stop_threshold = self.baseline_rms + self.config.stop_margin;

        let mut started = false;
        let mut stopped = false;

        match self.state {
            MotionState::Monitoring => {
                if rms > start_threshold {
                    self.above_accum += dt;
                    if self.above_accum >= self.config.start_min_duration {
                        self.state = MotionState::Moving;
                        self.above_accum = 0.0;
                        self.below_accum = 0.0;
                        started = true;
                        debug!(rms, start_threshold, "motion start");
                    }
                } else {
                    self.above_accum = 0.0;
                }
            }
            MotionState::Moving => {
                if rms < stop_threshold {
                    self.below_accum += dt;
                    if self.below_accum >= self.config.stop_min_duration {
                        self.state = MotionState::Monitoring;
                        self.below_accum = 0.0;
                        self.above_accum = 0.0;
                        stopped = true;
                        debug!(rms, stop_threshold, "motion stop");
                    }
                } else {
                    self.below_accum = 0.0;
                }
            }
            MotionState::Idle | MotionState::Calibrating => {}
        }

        // Stationary timer, independent of the coarse state machine. Refires
        // every threshold interval while the feed stays quiet so the bias
        // keeps updating during long rests.
        let mut zupt = false;
        if rms < stop_threshold {
            self.stationary_accum += dt;
            if self.stationary_accum >= self.config.stationary_time_threshold {
                self.stationary_accum = 0.0;
                zupt = true;
            }
        } else {
            self.stationary_accum = 0.0;
        }

        DetectorVerdict {
            state: self.state,
            rms,
            zupt,
            started,
            stopped,
        }
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    pub fn baseline_rms(&self) -> f64 {
        self.baseline_rms
    }

    /// Live-tune the start margin. The stop margin is pulled down if the
    /// new value would invert the hysteresis band.
    pub fn set_start_margin(&mut self, margin: f64) {
        self.config.start_margin = margin.max(f64::EPSILON);
        if self.config.stop_margin >= self.config.start_margin {
            self.config.stop_margin = self.config.start_margin * 0.5;
        }
    }

    /// Return to Idle and drop all per-cycle state. Baseline is kept so a
    /// continuous-capture re-arm can skip recalibration.
    pub fn reset(&mut self) {
        self.window.clear();
        self.filtered = Vector3::ZERO;
        self.seeded = false;
        self.state = MotionState::Idle;
        self.above_accum = 0.0;
        self.below_accum = 0.0;
        self.stationary_accum = 0.0;
    }
}
