//! Settings types

use certmatch_core::OutputFormat;
use certmatch_tls::ScanOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Scan tuning
    #[serde(default)]
    pub scan: ScanOptions,

    /// Generated configuration
    #[serde(default)]
    pub output: OutputSettings,

    /// Logging
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Generated configuration settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputSettings {
    /// File to write; required by `generate` unless given on the command line
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Prefix joined onto every certificate and key path
    #[serde(default)]
    pub path_prefix: Option<PathBuf>,

    /// Output flavour
    #[serde(default)]
    pub format: OutputFormat,

    /// Traefik entry points attached to each certificate (TOML output)
    #[serde(default = "default_entry_points")]
    pub entry_points: Vec<String>,
}

fn default_entry_points() -> Vec<String> {
    vec!["https".to_string()]
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            path: None,
            path_prefix: None,
            format: OutputFormat::default(),
            entry_points: default_entry_points(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log line format
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Log line format
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable
    #[default]
    Text,
    /// One JSON object per line
    Json,
}
