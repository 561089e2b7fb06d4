//! Configuration parsing
//!
//! Supports TOML (primary) and JSON (optional) formats.

use contracts::{CaptureBlueprint, EngineError};

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML format (recommended)
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    /// Infer format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse TOML configuration
pub fn parse_toml(content: &str) -> Result<CaptureBlueprint, EngineError> {
    toml::from_str(content).map_err(|e| EngineError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse JSON configuration
pub fn parse_json(content: &str) -> Result<CaptureBlueprint, EngineError> {
    serde_json::from_str(content).map_err(|e| EngineError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse configuration by format
pub fn parse(content: &str, format: ConfigFormat) -> Result<CaptureBlueprint, EngineError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toml_minimal() {
        let content = r#"
[feed]
id = "wrist_imu"
accel_rate_hz = 100.0
gyro_rate_hz = 200.0

[[stores]]
name = "log_store"
store_type = "log"
"#;
        let result = parse_toml(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let bp = result.unwrap();
        assert_eq!(bp.feed.id, "wrist_imu");
        assert_eq!(bp.feed.accel_rate_hz, 100.0);
        assert_eq!(bp.stores.len(), 1);
    }

    #[test]
    fn test_parse_defaults_applied() {
        let content = r#"
[feed]
id = "wrist_imu"
"#;
        let bp = parse_toml(content).unwrap();
        assert_eq!(bp.feed.accel_rate_hz, 100.0);
        assert_eq!(bp.feed.gyro_rate_hz, 200.0);
        assert_eq!(bp.feed.queue_capacity, 1024);
        assert!(bp.stores.is_empty());
    }

    #[test]
    fn test_parse_json_minimal() {
        let content = r#"{
            "feed": {
                "id": "wrist_imu",
                "accel_rate_hz": 200.0,
                "gyro_rate_hz": 400.0
            },
            "stores": [{ "name": "files", "store_type": "file",
                         "params": { "dir": "./sessions" } }]
        }"#;
        let result = parse_json(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let bp = result.unwrap();
        assert_eq!(bp.feed.accel_rate_hz, 200.0);
        assert_eq!(bp.stores[0].params.get("dir").unwrap(), "./sessions");
    }

    #[test]
    fn test_parse_toml_syntax_error() {
        let content = "invalid toml [[[";
        let result = parse_toml(content);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, EngineError::ConfigParse { .. }));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_extension("toml"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("TOML"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("json"),
            Some(ConfigFormat::Json)
        );
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }
}
