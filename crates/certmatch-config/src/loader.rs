//! Settings loading

use crate::{ConfigFormat, Settings};
use certmatch_core::{Error, Result};
use regex::{Captures, Regex};
use std::env;
use std::fs;
use std::path::Path;

/// Load settings from a file
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read settings file {}: {e}", path.display())))?;

    let format = ConfigFormat::from_path(path)?;

    load_from_str(&content, format)
}

/// Substitute `${VAR}` and `${VAR:-default}` from the environment.
///
/// As in a POSIX shell, the default also applies when the variable is set
/// but empty. `$${VAR}` is kept as the literal text `${VAR}`. Every unset
/// variable without a default is named in the error.
fn expand_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$(\$?)\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
        .map_err(|e| Error::Config(format!("Invalid variable pattern: {e}")))?;

    let mut missing = Vec::new();
    let expanded = re.replace_all(content, |cap: &Captures<'_>| {
        if !cap[1].is_empty() {
            return cap[0][1..].to_string();
        }

        let name = &cap[2];
        match (env::var(name).ok(), cap.get(3)) {
            (Some(value), Some(default)) if value.is_empty() => default.as_str().to_string(),
            (Some(value), _) => value,
            (None, Some(default)) => default.as_str().to_string(),
            (None, None) => {
                missing.push(name.to_string());
                String::new()
            }
        }
    });

    if !missing.is_empty() {
        return Err(Error::Config(format!(
            "Settings reference unset environment variables: {}",
            missing.join(", ")
        )));
    }

    Ok(expanded.into_owned())
}

/// Load settings from a string
pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<Settings> {
    let expanded = expand_env_vars(content)?;

    let settings = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(&expanded)
            .map_err(|e| Error::Config(format!("Failed to parse YAML: {e}")))?,
        ConfigFormat::Toml => toml::from_str(&expanded)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {e}")))?,
        ConfigFormat::Json => serde_json::from_str(&expanded)
            .map_err(|e| Error::Config(format!("Failed to parse JSON: {e}")))?,
    };

    Ok(settings)
}

/// Load and validate settings
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let settings = load_from_file(path)?;
    crate::validator::validate_settings(&settings)?;
    Ok(settings)
}
