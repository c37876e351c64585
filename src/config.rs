// Configuration for the built-in rules
//
// Every threshold the built-in rules use lives here, with the compiled-in
// values as `Default`. A TOML file may override any subset; missing keys
// keep their defaults.

use crate::cache_policy::MS_IN_A_MONTH;
use crate::rules::BUILTIN_RULE_IDS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Defaults shipped with the crate, kept in sync with `Default`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../hintlet-default.toml");

/// Errors raised while loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Unknown rule '{0}' (known rules: {known})", known = BUILTIN_RULE_IDS.join(", "))]
    UnknownRule(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for the built-in rule set
///
/// # Example
/// ```
/// use hintlet::config::HintletConfig;
///
/// let config = HintletConfig::from_toml_str(
///     r#"
///     enabled_rules = ["long_duration"]
///
///     [long_duration]
///     info_threshold_ms = 50.0
///     "#,
/// )?;
/// assert!(config.is_enabled("long_duration"));
/// assert!(!config.is_enabled("total_bytes"));
/// assert_eq!(config.long_duration.info_threshold_ms, 50.0);
/// assert_eq!(config.long_duration.warning_threshold_ms, 2000.0);
/// # Ok::<(), hintlet::config::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HintletConfig {
    /// Rule identifiers to register; `None` registers every built-in rule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_rules: Option<Vec<String>>,
    pub long_duration: LongDurationConfig,
    pub frequent_layout: FrequentLayoutConfig,
    pub total_bytes: TotalBytesConfig,
    pub uncompressed: UncompressedConfig,
    pub cache_control: CacheControlConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LongDurationConfig {
    /// Threshold of human perception
    pub info_threshold_ms: f64,
    pub warning_threshold_ms: f64,
}

impl Default for LongDurationConfig {
    fn default() -> Self {
        Self {
            info_threshold_ms: 100.0,
            warning_threshold_ms: 2000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrequentLayoutConfig {
    pub min_layouts: usize,
    /// Total layout self time, in milliseconds
    pub min_layout_time_ms: f64,
}

impl Default for FrequentLayoutConfig {
    fn default() -> Self {
        Self {
            min_layouts: 3,
            min_layout_time_ms: 70.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TotalBytesConfig {
    pub info_bytes: u64,
    pub warning_bytes: u64,
    pub critical_bytes: u64,
}

impl Default for TotalBytesConfig {
    fn default() -> Self {
        Self {
            info_bytes: 500_000,
            warning_bytes: 2_000_000,
            critical_bytes: 10_000_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UncompressedConfig {
    /// Break-even size for compression
    pub min_size_bytes: i64,
}

impl Default for UncompressedConfig {
    fn default() -> Self {
        Self {
            min_size_bytes: 150,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheControlConfig {
    /// Freshness below this raises a warning
    pub min_freshness_ms: f64,
    /// Freshness below this raises an info hint
    pub preferred_freshness_ms: f64,
}

impl Default for CacheControlConfig {
    fn default() -> Self {
        // Eleven months rather than a year: RFC 2616 caps Expires at one year
        Self {
            min_freshness_ms: MS_IN_A_MONTH,
            preferred_freshness_ms: MS_IN_A_MONTH * 11.0,
        }
    }
}

impl HintletConfig {
    /// Lower thresholds, for pages that are expected to be lean
    pub fn strict() -> Self {
        Self {
            long_duration: LongDurationConfig {
                info_threshold_ms: 50.0,
                warning_threshold_ms: 1000.0,
            },
            frequent_layout: FrequentLayoutConfig {
                min_layouts: 2,
                min_layout_time_ms: 35.0,
            },
            total_bytes: TotalBytesConfig {
                info_bytes: 250_000,
                warning_bytes: 1_000_000,
                critical_bytes: 5_000_000,
            },
            ..Self::default()
        }
    }

    /// Higher thresholds, for heavy single-page applications
    pub fn relaxed() -> Self {
        Self {
            long_duration: LongDurationConfig {
                info_threshold_ms: 250.0,
                warning_threshold_ms: 5000.0,
            },
            frequent_layout: FrequentLayoutConfig {
                min_layouts: 5,
                min_layout_time_ms: 150.0,
            },
            total_bytes: TotalBytesConfig {
                info_bytes: 2_000_000,
                warning_bytes: 10_000_000,
                critical_bytes: 50_000_000,
            },
            ..Self::default()
        }
    }

    /// Load and validate a TOML configuration file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a TOML configuration
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: HintletConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn is_enabled(&self, rule_id: &str) -> bool {
        match &self.enabled_rules {
            Some(ids) => ids.iter().any(|id| id == rule_id),
            None => true,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ids) = &self.enabled_rules {
            if let Some(unknown) = ids.iter().find(|id| !BUILTIN_RULE_IDS.contains(&id.as_str())) {
                return Err(ConfigError::UnknownRule(unknown.clone()));
            }
        }

        let ld = &self.long_duration;
        if ld.info_threshold_ms < 0.0 || ld.info_threshold_ms > ld.warning_threshold_ms {
            return Err(ConfigError::Invalid(format!(
                "long_duration thresholds must satisfy 0 <= info <= warning, got {} and {}",
                ld.info_threshold_ms, ld.warning_threshold_ms
            )));
        }

        if self.frequent_layout.min_layouts == 0 {
            return Err(ConfigError::Invalid(
                "frequent_layout.min_layouts must be >= 1".to_string(),
            ));
        }

        let tb = &self.total_bytes;
        if !(tb.info_bytes <= tb.warning_bytes && tb.warning_bytes <= tb.critical_bytes) {
            return Err(ConfigError::Invalid(format!(
                "total_bytes thresholds must be ascending, got {} / {} / {}",
                tb.info_bytes, tb.warning_bytes, tb.critical_bytes
            )));
        }

        if self.uncompressed.min_size_bytes < 0 {
            return Err(ConfigError::Invalid(format!(
                "uncompressed.min_size_bytes must be non-negative, got {}",
                self.uncompressed.min_size_bytes
            )));
        }

        let cc = &self.cache_control;
        if cc.min_freshness_ms < 0.0 || cc.min_freshness_ms > cc.preferred_freshness_ms {
            return Err(ConfigError::Invalid(format!(
                "cache_control freshness must satisfy 0 <= min <= preferred, got {} and {}",
                cc.min_freshness_ms, cc.preferred_freshness_ms
            )));
        }

        Ok(())
    }
}
