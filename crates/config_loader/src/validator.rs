//! Configuration validation
//!
//! Validation rules:
//! - feed id non-empty, channel rates within sensor limits
//! - queue capacities > 0
//! - detector margins hysteretic, durations positive
//! - integrator/spin/calibration parameters in range
//! - store names unique and non-empty
//!
//! Returns the first error encountered, or Ok(()).

use std::collections::HashSet;

use contracts::{CaptureBlueprint, EngineError};

/// Accelerometer channel upper limit (Hz)
const MAX_ACCEL_RATE_HZ: f64 = 800.0;

/// Gyroscope channel upper limit (Hz)
const MAX_GYRO_RATE_HZ: f64 = 3200.0;

/// Validate a CaptureBlueprint
pub fn validate(blueprint: &CaptureBlueprint) -> Result<(), EngineError> {
    validate_feed(blueprint)?;
    validate_detector(blueprint)?;
    validate_integrator(blueprint)?;
    validate_spin(blueprint)?;
    validate_calibration(blueprint)?;
    validate_orchestrator(blueprint)?;
    validate_stores(blueprint)?;
    Ok(())
}

fn validate_feed(blueprint: &CaptureBlueprint) -> Result<(), EngineError> {
    let feed = &blueprint.feed;

    if feed.id.is_empty() {
        return Err(EngineError::config_validation(
            "feed.id",
            "feed id cannot be empty",
        ));
    }

    if feed.accel_rate_hz <= 0.0 || feed.accel_rate_hz > MAX_ACCEL_RATE_HZ {
        return Err(EngineError::config_validation(
            "feed.accel_rate_hz",
            format!(
                "must be in (0, {MAX_ACCEL_RATE_HZ}], got {}",
                feed.accel_rate_hz
            ),
        ));
    }

    if feed.gyro_rate_hz <= 0.0 || feed.gyro_rate_hz > MAX_GYRO_RATE_HZ {
        return Err(EngineError::config_validation(
            "feed.gyro_rate_hz",
            format!(
                "must be in (0, {MAX_GYRO_RATE_HZ}], got {}",
                feed.gyro_rate_hz
            ),
        ));
    }

    if feed.queue_capacity == 0 {
        return Err(EngineError::config_validation(
            "feed.queue_capacity",
            "queue capacity must be > 0",
        ));
    }

    Ok(())
}

fn validate_detector(blueprint: &CaptureBlueprint) -> Result<(), EngineError> {
    let Some(detector) = &blueprint.engine.detector else {
        return Ok(());
    };

    if detector.window_sec <= 0.0 {
        return Err(EngineError::config_validation(
            "engine.detector.window_sec",
            format!("must be > 0, got {}", detector.window_sec),
        ));
    }

    if !(0.0..=1.0).contains(&detector.lp_alpha) || detector.lp_alpha == 0.0 {
        return Err(EngineError::config_validation(
            "engine.detector.lp_alpha",
            format!("must be in (0, 1], got {}", detector.lp_alpha),
        ));
    }

    if !(0.0..1.0).contains(&detector.baseline_gain) {
        return Err(EngineError::config_validation(
            "engine.detector.baseline_gain",
            format!("must be in [0, 1), got {}", detector.baseline_gain),
        ));
    }

    if detector.start_margin <= 0.0 || detector.stop_margin <= 0.0 {
        return Err(EngineError::config_validation(
            "engine.detector",
            "start_margin and stop_margin must be > 0",
        ));
    }

    if detector.stop_margin >= detector.start_margin {
        return Err(EngineError::config_validation(
            "engine.detector.stop_margin",
            format!(
                "must be below start_margin for hysteresis ({} >= {})",
                detector.stop_margin, detector.start_margin
            ),
        ));
    }

    if detector.start_min_duration <= 0.0
        || detector.stop_min_duration <= 0.0
        || detector.stationary_time_threshold <= 0.0
    {
        return Err(EngineError::config_validation(
            "engine.detector",
            "debounce and stationary durations must be > 0",
        ));
    }

    Ok(())
}

fn validate_integrator(blueprint: &CaptureBlueprint) -> Result<(), EngineError> {
    let Some(integrator) = &blueprint.engine.integrator else {
        return Ok(());
    };

    if !(0.0..=1.0).contains(&integrator.lp_alpha) || integrator.lp_alpha == 0.0 {
        return Err(EngineError::config_validation(
            "engine.integrator.lp_alpha",
            format!("must be in (0, 1], got {}", integrator.lp_alpha),
        ));
    }

    if integrator.decay_tau_sec <= 0.0 {
        return Err(EngineError::config_validation(
            "engine.integrator.decay_tau_sec",
            format!("must be > 0, got {}", integrator.decay_tau_sec),
        ));
    }

    if !(0.0..1.0).contains(&integrator.bias_retain) {
        return Err(EngineError::config_validation(
            "engine.integrator.bias_retain",
            format!("must be in [0, 1), got {}", integrator.bias_retain),
        ));
    }

    Ok(())
}

fn validate_spin(blueprint: &CaptureBlueprint) -> Result<(), EngineError> {
    let Some(spin) = &blueprint.engine.spin else {
        return Ok(());
    };

    if !(0.0..=1.0).contains(&spin.lp_alpha) || spin.lp_alpha == 0.0 {
        return Err(EngineError::config_validation(
            "engine.spin.lp_alpha",
            format!("must be in (0, 1], got {}", spin.lp_alpha),
        ));
    }

    if spin.smoothing_samples == 0 {
        return Err(EngineError::config_validation(
            "engine.spin.smoothing_samples",
            "must be >= 1",
        ));
    }

    if spin.axis_significance_dps < 0.0 {
        return Err(EngineError::config_validation(
            "engine.spin.axis_significance_dps",
            format!("must be >= 0, got {}", spin.axis_significance_dps),
        ));
    }

    Ok(())
}

fn validate_calibration(blueprint: &CaptureBlueprint) -> Result<(), EngineError> {
    let Some(calibration) = &blueprint.engine.calibration else {
        return Ok(());
    };

    if calibration.warmup_sec <= 0.0 {
        return Err(EngineError::config_validation(
            "engine.calibration.warmup_sec",
            format!("must be > 0, got {}", calibration.warmup_sec),
        ));
    }

    if calibration.min_samples == 0 {
        return Err(EngineError::config_validation(
            "engine.calibration.min_samples",
            "must be >= 1",
        ));
    }

    Ok(())
}

fn validate_orchestrator(blueprint: &CaptureBlueprint) -> Result<(), EngineError> {
    let Some(orchestrator) = &blueprint.engine.orchestrator else {
        return Ok(());
    };

    if orchestrator.settle_delay_sec < 0.0 {
        return Err(EngineError::config_validation(
            "engine.orchestrator.settle_delay_sec",
            format!("must be >= 0, got {}", orchestrator.settle_delay_sec),
        ));
    }

    if orchestrator.min_logging_sec < 0.0 {
        return Err(EngineError::config_validation(
            "engine.orchestrator.min_logging_sec",
            format!("must be >= 0, got {}", orchestrator.min_logging_sec),
        ));
    }

    if orchestrator.ready_hold_sec < 0.0 {
        return Err(EngineError::config_validation(
            "engine.orchestrator.ready_hold_sec",
            format!("must be >= 0, got {}", orchestrator.ready_hold_sec),
        ));
    }

    Ok(())
}

fn validate_stores(blueprint: &CaptureBlueprint) -> Result<(), EngineError> {
    let mut seen = HashSet::new();
    for store in &blueprint.stores {
        if store.name.is_empty() {
            return Err(EngineError::config_validation(
                "stores[].name",
                "store name cannot be empty",
            ));
        }
        if !seen.insert(&store.name) {
            return Err(EngineError::config_validation(
                format!("stores[name={}]", store.name),
                "duplicate store name",
            ));
        }
        if store.queue_capacity == 0 {
            return Err(EngineError::config_validation(
                format!("stores[{}].queue_capacity", store.name),
                "queue capacity must be > 0",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{
        ConfigVersion, DetectorConfig, DropPolicy, EngineOverrides, FeedConfig, StoreConfig,
        StoreType,
    };
    use std::collections::HashMap;

    fn minimal_blueprint() -> CaptureBlueprint {
        CaptureBlueprint {
            version: ConfigVersion::V1,
            feed: FeedConfig {
                id: "wrist_imu".into(),
                accel_rate_hz: 100.0,
                gyro_rate_hz: 200.0,
                queue_capacity: 1024,
                drop_policy: DropPolicy::DropNewest,
            },
            engine: EngineOverrides::default(),
            stores: vec![StoreConfig {
                name: "log_store".into(),
                store_type: StoreType::Log,
                queue_capacity: 100,
                params: HashMap::new(),
            }],
        }
    }

    #[test]
    fn test_minimal_blueprint_is_valid() {
        assert!(validate(&minimal_blueprint()).is_ok());
    }

    #[test]
    fn test_accel_rate_out_of_range() {
        let mut bp = minimal_blueprint();
        bp.feed.accel_rate_hz = 1000.0;
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("accel_rate_hz"), "got: {err}");
    }

    #[test]
    fn test_gyro_rate_zero() {
        let mut bp = minimal_blueprint();
        bp.feed.gyro_rate_hz = 0.0;
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("gyro_rate_hz"), "got: {err}");
    }

    #[test]
    fn test_empty_feed_id() {
        let mut bp = minimal_blueprint();
        bp.feed.id = "".into();
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("cannot be empty"), "got: {err}");
    }

    #[test]
    fn test_inverted_margins_rejected() {
        let mut bp = minimal_blueprint();
        bp.engine.detector = Some(DetectorConfig {
            start_margin: 0.2,
            stop_margin: 0.5,
            ..Default::default()
        });
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("stop_margin"), "got: {err}");
    }

    #[test]
    fn test_lp_alpha_out_of_range() {
        let mut bp = minimal_blueprint();
        bp.engine.detector = Some(DetectorConfig {
            lp_alpha: 1.5,
            ..Default::default()
        });
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("lp_alpha"), "got: {err}");
    }

    #[test]
    fn test_duplicate_store_name() {
        let mut bp = minimal_blueprint();
        bp.stores.push(StoreConfig {
            name: "log_store".into(),
            store_type: StoreType::File,
            queue_capacity: 100,
            params: HashMap::new(),
        });
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("duplicate"), "got: {err}");
    }

    #[test]
    fn test_empty_store_name() {
        let mut bp = minimal_blueprint();
        bp.stores[0].name = String::new();
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("cannot be empty"), "got: {err}");
    }
}
