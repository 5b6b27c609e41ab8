//! Tunable pipeline settings.
//!
//! Everything here has a default; a JSON file only needs to name what it changes.
//! Extraction rules and reference ranges are static tables and are not configurable.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::intelligence::RiskPolicy;

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {}: {}", .0.display(), .1)]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Invalid config {}: {}", .0.display(), .1)]
    Parse(PathBuf, #[source] serde_json::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Thresholds for the overall risk level and the attention flag.
    pub risk: RiskPolicy,
    /// Characters kept in the raw/cleaned text previews of a report.
    pub text_sample_chars: usize,
    /// Pick up images and PDFs in directory scans (needs an OCR engine).
    pub include_scans: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            risk: RiskPolicy::default(),
            text_sample_chars: 500,
            include_scans: false,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Loading
// ═══════════════════════════════════════════════════════════

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        let config: Self =
            serde_json::from_str(&json).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// `load` when a path is given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.risk.high_risk_factor_count == 0 {
            return Err(ConfigError::Invalid(
                "risk.high_risk_factor_count must be at least 1".into(),
            ));
        }
        if self.risk.attention_min_systems == 0 {
            return Err(ConfigError::Invalid(
                "risk.attention_min_systems must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;

    #[test]
    fn defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.text_sample_chars, 500);
        assert_eq!(config.risk.high_risk_factor_count, 3);
        assert_eq!(config.risk.attention_min_systems, 2);
        assert_eq!(config.risk.attention_min_severity, Severity::Stage1);
        assert!(!config.include_scans);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vitalscan.json");
        std::fs::write(
            &path,
            r#"{"text_sample_chars": 120, "risk": {"attention_min_severity": "borderline"}}"#,
        )
        .unwrap();

        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.text_sample_chars, 120);
        assert_eq!(config.risk.attention_min_severity, Severity::Borderline);
        assert_eq!(config.risk.attention_min_systems, 2);
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = PipelineConfig::load(Path::new("/nonexistent/vitalscan.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read(..)));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ text_sample_chars: ").unwrap();
        assert!(matches!(
            PipelineConfig::load(&path).unwrap_err(),
            ConfigError::Parse(..)
        ));
    }

    #[test]
    fn zero_thresholds_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zero.json");
        std::fs::write(&path, r#"{"risk": {"attention_min_systems": 0}}"#).unwrap();
        assert!(matches!(
            PipelineConfig::load(&path).unwrap_err(),
            ConfigError::Invalid(_)
        ));
    }

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(
            PipelineConfig::load_or_default(None).unwrap(),
            PipelineConfig::default()
        );
    }
}
