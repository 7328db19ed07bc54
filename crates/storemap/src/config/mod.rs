//! Provider configuration.
//!
//! Tuning knobs for the built-in SQL provider, loadable from YAML. Every
//! field has a sensible default so an empty document is a valid config.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, StoremapError};

/// Tuning knobs for store-type selection and literal rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Whether string properties default to unicode store types.
    #[serde(default = "default_true")]
    pub unicode_by_default: bool,

    /// Largest inline string size; anything above maps to the unbounded
    /// store type.
    #[serde(default = "default_max_string_size")]
    pub max_string_size: i32,

    /// Default size for unicode string columns used in keys or indexes.
    #[serde(default = "default_key_size_unicode")]
    pub key_string_size_unicode: i32,

    /// Default size for ANSI string columns used in keys or indexes.
    #[serde(default = "default_key_size_ansi")]
    pub key_string_size_ansi: i32,

    /// Decimal precision when the request carries no precision facet.
    #[serde(default = "default_decimal_precision")]
    pub default_decimal_precision: i32,

    /// Decimal scale when the request carries no scale facet.
    #[serde(default = "default_decimal_scale")]
    pub default_decimal_scale: i32,

    /// Fractional-second digits in rendered timestamp literals.
    #[serde(default = "default_timestamp_digits")]
    pub timestamp_literal_digits: u8,
}

fn default_true() -> bool {
    true
}

fn default_max_string_size() -> i32 {
    4000
}

fn default_key_size_unicode() -> i32 {
    450
}

fn default_key_size_ansi() -> i32 {
    900
}

fn default_decimal_precision() -> i32 {
    18
}

fn default_decimal_scale() -> i32 {
    2
}

fn default_timestamp_digits() -> u8 {
    7
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            unicode_by_default: default_true(),
            max_string_size: default_max_string_size(),
            key_string_size_unicode: default_key_size_unicode(),
            key_string_size_ansi: default_key_size_ansi(),
            default_decimal_precision: default_decimal_precision(),
            default_decimal_scale: default_decimal_scale(),
            timestamp_literal_digits: default_timestamp_digits(),
        }
    }
}

impl ProviderConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&raw)?;
        info!("Loaded provider config from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from a YAML string and validate it.
    pub fn from_yaml(raw: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate knob ranges.
    pub fn validate(&self) -> Result<()> {
        if self.max_string_size < 1 {
            return Err(StoremapError::Config(
                "max_string_size must be at least 1".into(),
            ));
        }
        if self.key_string_size_unicode < 1 || self.key_string_size_ansi < 1 {
            return Err(StoremapError::Config(
                "key string sizes must be at least 1".into(),
            ));
        }
        if self.default_decimal_precision < 1 {
            return Err(StoremapError::Config(
                "default_decimal_precision must be at least 1".into(),
            ));
        }
        if self.default_decimal_scale > self.default_decimal_precision {
            return Err(StoremapError::Config(format!(
                "default_decimal_scale ({}) cannot exceed default_decimal_precision ({})",
                self.default_decimal_scale, self.default_decimal_precision
            )));
        }
        if self.timestamp_literal_digits > 9 {
            return Err(StoremapError::Config(
                "timestamp_literal_digits cannot exceed 9".into(),
            ));
        }
        Ok(())
    }
}
