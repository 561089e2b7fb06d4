//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Validate configuration legality
//! - Generate `CaptureBlueprint`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let blueprint = ConfigLoader::load_from_path(Path::new("capture.toml")).unwrap();
//! println!("Feed: {}", blueprint.feed.id);
//! ```

mod parser;
mod validator;

pub use contracts::CaptureBlueprint;
pub use parser::ConfigFormat;

use contracts::EngineError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<CaptureBlueprint, EngineError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<CaptureBlueprint, EngineError> {
        Self::parse_and_validate(content, format)
    }

    /// Serialize CaptureBlueprint to TOML string
    pub fn to_toml(blueprint: &CaptureBlueprint) -> Result<String, EngineError> {
        toml::to_string_pretty(blueprint)
            .map_err(|e| EngineError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize CaptureBlueprint to JSON string
    pub fn to_json(blueprint: &CaptureBlueprint) -> Result<String, EngineError> {
        serde_json::to_string_pretty(blueprint)
            .map_err(|e| EngineError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, EngineError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            EngineError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext)
            .ok_or_else(|| EngineError::config_parse(format!("unsupported config format: .{ext}")))
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, EngineError> {
        Ok(std::fs::read_to_string(path)?)
    }

    /// Parse and validate configuration content
    fn parse_and_validate(
        content: &str,
        format: ConfigFormat,
    ) -> Result<CaptureBlueprint, EngineError> {
        let blueprint = parser::parse(content, format)?;
        validator::validate(&blueprint)?;
        Ok(blueprint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_TOML: &str = r#"
[feed]
id = "wrist_imu"
accel_rate_hz = 100.0
gyro_rate_hz = 200.0

[[stores]]
name = "log_store"
store_type = "log"
"#;

    #[test]
    fn test_load_from_str_toml() {
        let result = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let bp = result.unwrap();
        assert_eq!(bp.feed.id, "wrist_imu");
        assert_eq!(bp.stores.len(), 1);
    }

    #[test]
    fn test_round_trip_toml() {
        let bp = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let serialized = ConfigLoader::to_toml(&bp).unwrap();
        let bp2 = ConfigLoader::load_from_str(&serialized, ConfigFormat::Toml).unwrap();
        assert_eq!(bp.feed.id, bp2.feed.id);
        assert_eq!(bp.feed.accel_rate_hz, bp2.feed.accel_rate_hz);
        assert_eq!(bp.stores[0].name, bp2.stores[0].name);
    }

    #[test]
    fn test_round_trip_json() {
        let bp = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let json = ConfigLoader::to_json(&bp).unwrap();
        let bp2 = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(bp.feed.id, bp2.feed.id);
    }

    #[test]
    fn test_validation_runs_after_parse() {
        // Duplicate store name should fail validation
        let content = r#"
[feed]
id = "wrist_imu"

[[stores]]
name = "out"
store_type = "log"

[[stores]]
name = "out"
store_type = "file"
"#;
        let result = ConfigLoader::load_from_str(content, ConfigFormat::Toml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("duplicate"));
    }

    #[test]
    fn test_engine_overrides_parse() {
        let content = r#"
[feed]
id = "wrist_imu"

[engine.detector]
window_sec = 0.3
lp_alpha = 0.15
baseline_gain = 0.02
start_margin = 0.8
stop_margin = 0.3
start_min_duration = 0.1
stop_min_duration = 0.3
stationary_time_threshold = 0.5

[[stores]]
name = "log_store"
store_type = "log"
"#;
        let bp = ConfigLoader::load_from_str(content, ConfigFormat::Toml).unwrap();
        let detector = bp.engine.detector.as_ref().unwrap();
        assert_eq!(detector.window_sec, 0.3);
        assert_eq!(bp.to_engine_config().detector.start_margin, 0.8);
    }
}
