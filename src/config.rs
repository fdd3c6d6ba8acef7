//! Configuration file support for the dashboard
//!
//! Settings are read from `.spacex-dash.toml` (or `spacex-dash.toml`), found by
//! searching the working directory and its parents. Every key is optional.
//!
//! ## Configuration File Format
//!
//! ```toml
//! # .spacex-dash.toml
//!
//! [data]
//! # Launch records CSV, relative to the working directory
//! path = "spacex_launch_dash.csv"
//!
//! [server]
//! port = 8050
//! open_browser = true
//! # Allow cross-origin API requests (frontend served elsewhere)
//! allow_cors = false
//! # Live sessions kept before the least recently used is evicted
//! max_sessions = 1024
//!
//! [slider]
//! # "fixed" uses min/max below; "dataset" uses the observed payload extent
//! bounds = "fixed"
//! min = 0
//! max = 10000
//! step = 1000
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::view::{SliderBounds, SliderSettings};

/// Default dataset file name
pub const DEFAULT_DATA_PATH: &str = "spacex_launch_dash.csv";

/// Errors that can occur when loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Dataset section
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
}

fn default_data_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_PATH)
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
        }
    }
}

/// HTTP server section
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_true")]
    pub open_browser: bool,

    #[serde(default)]
    pub allow_cors: bool,

    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_port() -> u16 {
    8050
}

fn default_true() -> bool {
    true
}

fn default_max_sessions() -> usize {
    1024
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: default_port(),
            open_browser: true,
            allow_cors: false,
            max_sessions: default_max_sessions(),
        }
    }
}

/// Where the slider bounds come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BoundsMode {
    #[default]
    Fixed,
    Dataset,
}

/// Payload slider section
#[derive(Debug, Clone, Deserialize)]
pub struct SliderSection {
    #[serde(default)]
    pub bounds: BoundsMode,

    #[serde(default)]
    pub min: f64,

    #[serde(default = "default_slider_max")]
    pub max: f64,

    #[serde(default = "default_slider_step")]
    pub step: f64,
}

fn default_slider_max() -> f64 {
    10000.0
}

fn default_slider_step() -> f64 {
    1000.0
}

impl Default for SliderSection {
    fn default() -> Self {
        Self {
            bounds: BoundsMode::Fixed,
            min: 0.0,
            max: default_slider_max(),
            step: default_slider_step(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DashConfig {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub slider: SliderSection,
}

impl DashConfig {
    /// Reject settings the dashboard cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.slider.step > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "slider.step must be positive, got {}",
                self.slider.step
            )));
        }
        if self.slider.bounds == BoundsMode::Fixed && !(self.slider.min <= self.slider.max) {
            return Err(ConfigError::Invalid(format!(
                "slider.min ({}) must not exceed slider.max ({})",
                self.slider.min, self.slider.max
            )));
        }
        if self.server.max_sessions == 0 {
            return Err(ConfigError::Invalid(
                "server.max_sessions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Slider settings for the layout builder
    pub fn slider_settings(&self) -> SliderSettings {
        let bounds = match self.slider.bounds {
            BoundsMode::Fixed => SliderBounds::Fixed {
                min: self.slider.min,
                max: self.slider.max,
            },
            BoundsMode::Dataset => SliderBounds::Dataset,
        };
        SliderSettings {
            bounds,
            step: self.slider.step,
        }
    }
}

/// Load configuration, searching upwards from `start_path`
///
/// Falls back to defaults when no config file exists.
pub fn load_config(start_path: &Path) -> Result<DashConfig, ConfigError> {
    match find_config_file(start_path) {
        Some(path) => load_config_file(&path),
        None => Ok(DashConfig::default()),
    }
}

/// Load and validate a specific config file
pub fn load_config_file(path: &Path) -> Result<DashConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: DashConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Find the config file by searching up the directory tree
pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
    let config_names = [".spacex-dash.toml", "spacex-dash.toml"];

    let mut current = if start_path.is_file() {
        start_path.parent()?.to_path_buf()
    } else {
        start_path.to_path_buf()
    };

    loop {
        for name in &config_names {
            let config_path = current.join(name);
            if config_path.exists() {
                return Some(config_path);
            }
        }

        if let Some(parent) = current.parent() {
            current = parent.to_path_buf();
        } else {
            break;
        }
    }

    None
}
