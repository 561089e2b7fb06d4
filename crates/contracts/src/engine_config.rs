//! Motion engine configuration contracts that can be shared across crates.

use serde::{Deserialize, Serialize};

/// Motion engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Detector configuration
    #[serde(default)]
    pub detector: DetectorConfig,

    /// Velocity integrator configuration
    #[serde(default)]
    pub integrator: IntegratorConfig,

    /// Spin estimator configuration
    #[serde(default)]
    pub spin: SpinConfig,

    /// Calibration configuration
    #[serde(default)]
    pub calibration: CalibrationConfig,

    /// Orchestrator configuration
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
}

/// Motion state detector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Trailing energy window length in seconds
    pub window_sec: f64,

    /// Low-pass gain applied to raw acceleration before the energy metric
    pub lp_alpha: f64,

    /// EMA gain for baseline adaptation while not moving
    pub baseline_gain: f64,

    /// Start threshold margin above baseline RMS (m/s²)
    pub start_margin: f64,

    /// Stop threshold margin above baseline RMS (m/s²), must be below
    /// start_margin for hysteresis
    pub stop_margin: f64,

    /// RMS must exceed the start threshold continuously for this long
    /// before Monitoring→Moving (seconds)
    pub start_min_duration: f64,

    /// RMS must stay below the stop threshold continuously for this long
    /// before Moving→Monitoring (seconds)
    pub stop_min_duration: f64,

    /// RMS below the stop threshold for this long forces a ZUPT event,
    /// independent of the coarse state machine (seconds)
    pub stationary_time_threshold: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            window_sec: 0.25,
            lp_alpha: 0.1,
            baseline_gain: 0.02,
            start_margin: 0.6,
            stop_margin: 0.25,
            start_min_duration: 0.1,
            stop_min_duration: 0.3,
            stationary_time_threshold: 0.4,
        }
    }
}

/// Velocity integrator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegratorConfig {
    /// Low-pass gain for raw acceleration
    pub lp_alpha: f64,

    /// Velocity decay time constant in seconds; applied as
    /// `v *= exp(-dt / tau)` so decay is rate-independent
    pub decay_tau_sec: f64,

    /// Bias EMA retain factor at ZUPT: `bias = bias*retain + filtered*(1-retain)`
    pub bias_retain: f64,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            lp_alpha: 0.1,
            decay_tau_sec: 0.5,
            bias_retain: 0.95,
        }
    }
}

/// Spin estimator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinConfig {
    /// Low-pass gain for the angular-rate vector
    pub lp_alpha: f64,

    /// Moving-average length for display smoothing (samples)
    pub smoothing_samples: usize,

    /// Filtered magnitude (deg/s) below which the dominant axis is not
    /// recomputed, to avoid axis flicker at low rates
    pub axis_significance_dps: f64,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            lp_alpha: 0.2,
            smoothing_samples: 10,
            axis_significance_dps: 30.0,
        }
    }
}

/// Calibration configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Warm-up window length in seconds
    pub warmup_sec: f64,

    /// Minimum accepted sample count for a valid baseline
    pub min_samples: usize,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            warmup_sec: 2.0,
            min_samples: 20,
        }
    }
}

/// Recording orchestrator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Settle delay after the detector reports motion end; renewed motion
    /// within this window cancels the stop (seconds)
    pub settle_delay_sec: f64,

    /// Logging bursts shorter than this are discarded on `stop()` (seconds)
    pub min_logging_sec: f64,

    /// Continuous capture: Ready re-arms Monitoring after the hold window
    pub continuous: bool,

    /// How long Ready is held before re-arming in continuous mode (seconds)
    pub ready_hold_sec: f64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            settle_delay_sec: 1.0,
            min_logging_sec: 0.2,
            continuous: true,
            ready_hold_sec: 1.5,
        }
    }
}

/// Clamp bounds for per-sample time deltas (seconds).
pub const MIN_SAMPLE_DT: f64 = 0.002;
pub const MAX_SAMPLE_DT: f64 = 0.100;

/// Clamp a raw time delta into the accepted integration range.
///
/// Keeps division and integration bounded for stalled or bursty feeds.
#[inline]
pub fn clamp_dt(dt: f64) -> f64 {
    dt.clamp(MIN_SAMPLE_DT, MAX_SAMPLE_DT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_hysteretic() {
        let cfg = DetectorConfig::default();
        assert!(cfg.stop_margin < cfg.start_margin);
        assert!(cfg.start_min_duration > 0.0);
        assert!(cfg.stop_min_duration > 0.0);
    }

    #[test]
    fn test_clamp_dt_bounds() {
        assert_eq!(clamp_dt(0.0), MIN_SAMPLE_DT);
        assert_eq!(clamp_dt(10.0), MAX_SAMPLE_DT);
        assert_eq!(clamp_dt(0.01), 0.01);
    }
}
