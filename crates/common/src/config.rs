//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{PtzError, PtzResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default movement parameters.
    pub motion: MotionParameters,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Pan/tilt deltas and the timing used to pace them.
///
/// Built once at startup and passed by reference afterwards; nothing
/// mutates it during a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionParameters {
    /// Relative pan in degrees (negative = counter-clockwise seen from the top).
    pub pan_delta: i32,

    /// Relative tilt in degrees (negative = upwards).
    pub tilt_delta: i32,

    /// Fixed wait after every command, independent of the angle.
    pub settle_base_ms: u32,

    /// Additional wait per commanded degree.
    pub per_degree_wait_ms: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "ptzcam_motion=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for MotionParameters {
    fn default() -> Self {
        Self {
            pan_delta: 180,
            tilt_delta: 180,
            settle_base_ms: 100,
            per_degree_wait_ms: 9,
        }
    }
}

impl MotionParameters {
    pub fn new(
        pan_delta: i32,
        tilt_delta: i32,
        settle_base_ms: u32,
        per_degree_wait_ms: u32,
    ) -> Self {
        Self {
            pan_delta,
            tilt_delta,
            settle_base_ms,
            per_degree_wait_ms,
        }
    }

    /// The angle-independent acknowledgment wait.
    pub fn settle_base(&self) -> Duration {
        Duration::from_millis(u64::from(self.settle_base_ms))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from an explicit JSON file.
    ///
    /// There is no implicit config location: callers only get here when the
    /// user named a file, so a missing or malformed file is an error rather
    /// than a silent fallback to defaults.
    pub fn load_from(path: &Path) -> PtzResult<Self> {
        if !path.exists() {
            return Err(PtzError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| PtzError::config(format!("failed to parse {}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }
}
