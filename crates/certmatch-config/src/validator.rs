//! Settings validation

use crate::Settings;
use certmatch_core::{Error, Result};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    settings.scan.validate()?;

    validate_output(settings)?;

    validate_logging(settings)?;

    Ok(())
}

fn validate_output(settings: &Settings) -> Result<()> {
    let output = &settings.output;

    if output.entry_points.is_empty() {
        return Err(Error::Config(
            "output.entry_points must not be empty".to_string(),
        ));
    }

    if output.entry_points.iter().any(|e| e.trim().is_empty()) {
        return Err(Error::Config(
            "output.entry_points must not contain blank names".to_string(),
        ));
    }

    if let Some(ref path) = output.path {
        if path.as_os_str().is_empty() {
            return Err(Error::Config("output.path must not be empty".to_string()));
        }
    }

    Ok(())
}

fn validate_logging(settings: &Settings) -> Result<()> {
    let level = settings.logging.level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        return Err(Error::Config(format!(
            "Invalid log level: {} (must be one of {})",
            settings.logging.level,
            LOG_LEVELS.join(", ")
        )));
    }

    if settings.scan.concurrency > 4096 {
        tracing::warn!(
            concurrency = settings.scan.concurrency,
            "scan.concurrency is very high"
        );
    }

    Ok(())
}
