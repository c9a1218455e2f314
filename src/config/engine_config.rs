//! Engine configuration - deployment tunables as TOML values
//!
//! Every struct implements `Default` with the built-in constants, so a
//! missing or partial config file changes nothing it does not mention.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::types::{capture, ClassifierThresholds};

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for an engine deployment.
///
/// Load with `EngineConfig::load()` which searches:
/// 1. `$DCRM_CONFIG` env var
/// 2. `./dcrm_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Waveform analysis tunables
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Diagnostic-service client configuration
    #[serde(default)]
    pub ai: AiConfig,
}

impl EngineConfig {
    /// Load configuration using the standard search order:
    /// 1. `$DCRM_CONFIG` environment variable
    /// 2. `./dcrm_config.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("DCRM_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded engine config from DCRM_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from DCRM_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "DCRM_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from("dcrm_config.toml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded engine config from ./dcrm_config.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./dcrm_config.toml, using defaults");
                }
            }
        }

        info!("No dcrm_config.toml found — using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate tunables for internal consistency.
    ///
    /// Rules:
    /// - Sampling interval and sentinel must be positive
    /// - Critical classifier bounds must be >= maintenance bounds
    /// - Healthy bands must be ordered (min <= max)
    /// - AI timeout must be nonzero when the client is enabled
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        if self.analysis.sample_interval_ms <= 0.0 {
            errors.push(format!(
                "analysis.sample_interval_ms must be positive (got {})",
                self.analysis.sample_interval_ms
            ));
        }
        if self.analysis.sentinel <= 0.0 {
            errors.push(format!(
                "analysis.sentinel must be positive (got {})",
                self.analysis.sentinel
            ));
        }

        let t = &self.analysis.thresholds;
        Self::check_escalation(
            t.trimmed_std_dev_maintenance,
            t.trimmed_std_dev_critical,
            "analysis.thresholds.trimmed_std_dev",
            &mut errors,
        );
        Self::check_escalation(
            t.robust_max_maintenance,
            t.robust_max_critical,
            "analysis.thresholds.robust_max",
            &mut errors,
        );
        Self::check_band(
            t.coil_current_avg_min,
            t.coil_current_avg_max,
            "analysis.thresholds.coil_current_avg",
            &mut errors,
        );
        Self::check_band(
            t.travel_max_min,
            t.travel_max_max,
            "analysis.thresholds.travel_max",
            &mut errors,
        );

        if self.ai.enabled && self.ai.timeout_secs == 0 {
            errors.push("ai.timeout_secs must be nonzero when ai.enabled".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_escalation(maintenance: f64, critical: f64, name: &str, errors: &mut Vec<String>) {
        if critical < maintenance {
            errors.push(format!(
                "{name}: critical bound ({critical}) must be >= maintenance bound ({maintenance})"
            ));
        }
    }

    fn check_band(min: f64, max: f64, name: &str, errors: &mut Vec<String>) {
        if min > max {
            errors.push(format!("{name}: min ({min}) must be <= max ({max})"));
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server bind address.
    ///
    /// Can be overridden by `DCRM_SERVER_ADDR` env var or `--addr` CLI flag.
    #[serde(default = "default_server_addr")]
    pub addr: String,
}

fn default_server_addr() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
        }
    }
}

/// Waveform analysis tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Time step between consecutive samples (ms)
    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: f64,

    /// Hardware invalid-reading sentinel (µΩ)
    #[serde(default = "default_sentinel")]
    pub sentinel: f64,

    /// Health classifier decision bounds
    #[serde(default)]
    pub thresholds: ClassifierThresholds,
}

fn default_sample_interval_ms() -> f64 {
    capture::SAMPLE_INTERVAL_MS
}

fn default_sentinel() -> f64 {
    capture::SENTINEL_INVALID
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: default_sample_interval_ms(),
            sentinel: default_sentinel(),
            thresholds: ClassifierThresholds::default(),
        }
    }
}

/// Diagnostic-service client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Whether analyses request an AI assessment unless the caller says
    /// otherwise
    #[serde(default)]
    pub enabled: bool,

    /// Diagnostic service endpoint receiving the assessment request
    #[serde(default = "default_ai_endpoint")]
    pub endpoint: String,

    /// Model identifier forwarded to the service
    #[serde(default = "default_ai_model")]
    pub model: String,

    /// Request timeout (seconds)
    #[serde(default = "default_ai_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_ai_endpoint() -> String {
    "http://127.0.0.1:8089/api/v1/diagnose".to_string()
}

fn default_ai_model() -> String {
    "glm-4-flash".to_string()
}

fn default_ai_timeout_secs() -> u64 {
    60
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_ai_endpoint(),
            model: default_ai_model(),
            timeout_secs: default_ai_timeout_secs(),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, std::io::Error),

    #[error("config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, toml::de::Error),

    #[error("config validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_toml_matches_defaults() {
        let config: EngineConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.addr, "0.0.0.0:8080");
        assert_eq!(config.analysis.sample_interval_ms, 0.1);
        assert_eq!(config.analysis.sentinel, 8000.0);
        assert!(!config.ai.enabled);
        assert_eq!(config.ai.timeout_secs, 60);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            [analysis]
            sentinel = 9000.0

            [analysis.thresholds]
            robust_max_critical = 1500.0
            "#,
        )
        .unwrap();

        assert_eq!(config.analysis.sentinel, 9000.0);
        assert_eq!(config.analysis.sample_interval_ms, 0.1);
        assert_eq!(config.analysis.thresholds.robust_max_critical, 1500.0);
        assert_eq!(config.analysis.thresholds.robust_max_maintenance, 500.0);
        assert_eq!(config.server.addr, "0.0.0.0:8080");
    }

    #[test]
    fn test_inverted_escalation_rejected() {
        let config: EngineConfig = toml::from_str(
            r#"
            [analysis.thresholds]
            trimmed_std_dev_maintenance = 60.0
            trimmed_std_dev_critical = 50.0
            "#,
        )
        .unwrap();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("trimmed_std_dev"));
    }

    #[test]
    fn test_non_positive_interval_rejected() {
        let config: EngineConfig = toml::from_str(
            r#"
            [analysis]
            sample_interval_ms = 0.0
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_only_rejected_when_enabled() {
        let config: EngineConfig = toml::from_str(
            r#"
            [ai]
            timeout_secs = 0
            "#,
        )
        .unwrap();
        assert!(config.validate().is_ok());

        let config: EngineConfig = toml::from_str(
            r#"
            [ai]
            enabled = true
            timeout_secs = 0
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }
}
