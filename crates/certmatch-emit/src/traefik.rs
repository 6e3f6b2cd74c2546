//! Traefik TLS configuration

use crate::markers::{splice, wrap};
use certmatch_core::{clean, Error, KeyPair, OutputFormat, Result};
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::{info, warn};

/// Traefik v1 file provider: one `[[tls]]` table per pair
#[derive(Debug, Serialize)]
struct TraefikV1<'a> {
    tls: Vec<TlsEntry<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TlsEntry<'a> {
    entry_points: &'a [String],
    certificate: CertificateFiles,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CertificateFiles {
    cert_file: String,
    key_file: String,
}

/// Traefik v2 dynamic configuration
#[derive(Debug, Serialize)]
struct TraefikV2 {
    tls: TlsCertificates,
}

#[derive(Debug, Serialize)]
struct TlsCertificates {
    certificates: Vec<CertificateFiles>,
}

/// How [`TraefikEmitter::write`] updated the output file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// File did not exist
    Created,
    /// File existed without markers and was overwritten
    Replaced,
    /// Only the marker delimited region was replaced
    Spliced,
}

/// Renders key pairs as Traefik TLS configuration
#[derive(Debug, Clone)]
pub struct TraefikEmitter {
    format: OutputFormat,
    entry_points: Vec<String>,
    path_prefix: Option<PathBuf>,
}

impl Default for TraefikEmitter {
    fn default() -> Self {
        Self::new(OutputFormat::default())
    }
}

impl TraefikEmitter {
    /// Create an emitter for `format` with the `https` entry point
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            entry_points: vec!["https".to_string()],
            path_prefix: None,
        }
    }

    /// Entry points attached to each certificate
    pub fn with_entry_points(mut self, entry_points: Vec<String>) -> Self {
        self.entry_points = entry_points;
        self
    }

    /// Prefix joined onto every path written
    pub fn with_path_prefix(mut self, prefix: Option<PathBuf>) -> Self {
        self.path_prefix = prefix;
        self
    }

    /// Path as it appears in the generated configuration
    fn config_path(&self, path: &Path) -> String {
        match &self.path_prefix {
            // Absolute scan paths nest under the prefix; `..` is resolved after joining.
            Some(prefix) => {
                let relative: PathBuf = path
                    .components()
                    .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
                    .collect();
                clean(&prefix.join(relative)).to_string_lossy().into_owned()
            }
            None => path.to_string_lossy().into_owned(),
        }
    }

    fn files(&self, pair: &KeyPair) -> CertificateFiles {
        CertificateFiles {
            cert_file: self.config_path(pair.cert_path()),
            key_file: self.config_path(pair.key_path()),
        }
    }

    /// Render the body without markers
    pub fn render_body(&self, pairs: &[KeyPair]) -> Result<String> {
        if pairs.is_empty() {
            return Ok(String::new());
        }

        match self.format {
            OutputFormat::TraefikToml => {
                let document = TraefikV1 {
                    tls: pairs
                        .iter()
                        .map(|pair| TlsEntry {
                            entry_points: &self.entry_points,
                            certificate: self.files(pair),
                        })
                        .collect(),
                };
                toml::to_string(&document).map_err(|e| Error::Serialization(e.to_string()))
            }
            OutputFormat::TraefikYaml => {
                let document = TraefikV2 {
                    tls: TlsCertificates {
                        certificates: pairs.iter().map(|pair| self.files(pair)).collect(),
                    },
                };
                serde_yaml::to_string(&document).map_err(|e| Error::Serialization(e.to_string()))
            }
        }
    }

    /// Render the marker wrapped block
    pub fn render(&self, pairs: &[KeyPair]) -> Result<String> {
        Ok(wrap(&self.render_body(pairs)?))
    }

    /// Write the block to `out`.
    ///
    /// An existing block between markers is replaced in place; any other
    /// existing content is overwritten.
    pub fn write(&self, pairs: &[KeyPair], out: &Path) -> Result<WriteMode> {
        info!(pairs = pairs.len(), out = %out.display(), "Writing config");

        let block = self.render(pairs)?;

        let (content, mode) = match fs::read_to_string(out) {
            Ok(existing) => match splice(&existing, &block) {
                Some(spliced) => (spliced, WriteMode::Spliced),
                None => {
                    if !existing.trim().is_empty() {
                        warn!(out = %out.display(), "No autogenerated markers found, overwriting file");
                    }
                    (format!("{block}\n"), WriteMode::Replaced)
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => (format!("{block}\n"), WriteMode::Created),
            Err(e) => return Err(Error::read(out, e)),
        };

        fs::write(out, content).map_err(|e| Error::write(out, e))?;

        Ok(mode)
    }
}
