// src/config.rs

//! Defines the configuration structures for the native activity shell.
//!
//! The structs deserialize from a JSON file named by the
//! `NATIVE_ACTIVITY_CONFIG` environment variable. Every section carries
//! defaults, so a partial file (or no file at all) yields a usable config.

use log::{info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the JSON configuration file.
pub const CONFIG_PATH_ENV: &str = "NATIVE_ACTIVITY_CONFIG";

/// Process-wide configuration, loaded on first access.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::load_or_default);

// --- Top-Level Configuration Structure ---

/// Represents the complete configuration for the shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)] // Apply default values for the entire struct if a field is missing.
pub struct Config {
    /// Pixel format requested when acquiring a surface.
    pub surface: SurfaceConfig,
    /// Motion sensor sampling settings.
    pub sensor: SensorConfig,
    /// Per-frame animation settings.
    pub animation: AnimationConfig,
    /// Logger defaults used when `RUST_LOG` is unset.
    pub logging: LoggingConfig,
    /// Settings for the demo host that drives the binary.
    pub host: HostConfig,
}

impl Config {
    /// Loads the config named by [`CONFIG_PATH_ENV`], falling back to defaults.
    ///
    /// A missing variable, an unreadable file or malformed JSON are all
    /// reported as warnings; configuration problems are never fatal.
    pub fn load_or_default() -> Self {
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::load_from(Path::new(&path)).unwrap_or_else(|e| {
                warn!("Config: {:#}. Using defaults.", e);
                Self::default()
            }),
            None => {
                info!("Config: {} not set, using defaults.", CONFIG_PATH_ENV);
                Self::default()
            }
        }
    }

    /// Reads and parses a JSON config file.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

// --- Surface Configuration ---

/// The pixel format the surface context tries to match exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub red_bits: u8,
    pub green_bits: u8,
    pub blue_bits: u8,
    /// Depth buffer size. Zero means no depth buffer.
    pub depth_bits: u8,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        SurfaceConfig {
            red_bits: 8,
            green_bits: 8,
            blue_bits: 8,
            depth_bits: 0,
        }
    }
}

// --- Sensor Configuration ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Accelerometer delivery rate requested while focused.
    pub target_rate_hz: u32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        SensorConfig { target_rate_hz: 60 }
    }
}

// --- Animation Configuration ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Amount added to the animation angle on every tick.
    pub angle_step: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        AnimationConfig { angle_step: 0.01 }
    }
}

// --- Logging Configuration ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `env_logger` filter applied when `RUST_LOG` is not set.
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            default_filter: "info".to_string(),
        }
    }
}

// --- Host Configuration ---

/// Settings for the scripted host used by the binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Package name reported by the host bridge.
    pub package_name: String,
    /// Pause between scripted host events, in milliseconds.
    pub frame_interval_ms: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        HostConfig {
            package_name: "com.example.native_activity".to_string(),
            frame_interval_ms: 16,
        }
    }
}
