use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Maximum raw lat/lon distance (degrees) at which a map click still counts as
/// a click on a marker.
pub const DEFAULT_CLICK_THRESHOLD: f64 = 0.01;

pub const CLICK_THRESHOLD_ENV: &str = "CARPARK_CLICK_THRESHOLD";

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub click_threshold: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            click_threshold: DEFAULT_CLICK_THRESHOLD,
        }
    }
}

impl SelectionConfig {
    pub fn new(click_threshold: f64) -> Result<Self, ConfigError> {
        let config = Self { click_threshold };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = self.click_threshold;
        if t.is_finite() && t > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidThreshold(t.to_string()))
        }
    }

    /// Reads [`CLICK_THRESHOLD_ENV`]; unset means the default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(CLICK_THRESHOLD_ENV) {
            None => Ok(Self::default()),
            Some(raw) => {
                let t = raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| ConfigError::InvalidThreshold(raw.clone()))?;
                Self::new(t)
            }
        }
    }
}
