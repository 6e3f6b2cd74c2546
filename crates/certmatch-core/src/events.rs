//! Structured scan events
//!
//! Components report progress through a [`ScanObserver`] instead of writing
//! to a global logger. [`TracingObserver`] renders events as `tracing`
//! records; [`RecordingObserver`] keeps them for inspection.

use crate::types::MaterialKind;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Which concurrent phase a count belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Directory walk
    Walk,
    /// Per-file classification and parsing
    Load,
    /// Certificate to private key matching
    Match,
}

/// Something that happened during a scan
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    /// Walker entered a directory
    DirectoryEntered {
        /// Directory path
        path: PathBuf,
    },
    /// Walk finished
    FilesDiscovered {
        /// Number of regular files
        count: usize,
    },
    /// A file was loaded as a certificate or private key
    MaterialLoaded {
        /// Source file
        path: PathBuf,
        /// What it turned out to be
        kind: MaterialKind,
    },
    /// A file was skipped; see `reason` for the error kind
    FileSkipped {
        /// Source file
        path: PathBuf,
        /// [`crate::Error::kind`] label
        reason: &'static str,
        /// Rendered error
        message: String,
    },
    /// Load phase finished
    MaterialCounted {
        /// Certificates loaded
        certificates: usize,
        /// Private keys loaded
        private_keys: usize,
    },
    /// A certificate was paired
    PairMatched {
        /// Certificate file
        cert_path: PathBuf,
        /// Private key file
        key_path: PathBuf,
    },
    /// More than one private key carried the certificate's public key
    DuplicateKeys {
        /// Certificate file
        cert_path: PathBuf,
        /// Every candidate, chosen key first
        key_paths: Vec<PathBuf>,
    },
    /// A certificate had no private key
    Unmatched {
        /// Certificate file
        cert_path: PathBuf,
    },
    /// Phase barrier reached
    PhaseCompleted {
        /// Phase that completed
        phase: Phase,
        /// Tasks joined
        tasks: usize,
    },
}

/// Receiver of scan events.
///
/// Called from many tasks at once; implementations must not block.
pub trait ScanObserver: Send + Sync {
    /// Handle one event
    fn on_event(&self, event: &ScanEvent);
}

/// Shared observer handle
pub type SharedObserver = Arc<dyn ScanObserver>;

/// Renders events as `tracing` records
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ScanObserver for TracingObserver {
    fn on_event(&self, event: &ScanEvent) {
        match event {
            ScanEvent::DirectoryEntered { path } => {
                info!(path = %path.display(), "Searching for certificates");
            }
            ScanEvent::FilesDiscovered { count } => {
                info!(count, "Found files");
            }
            ScanEvent::MaterialLoaded { path, kind } => {
                info!(path = %path.display(), %kind, "Loaded key material");
            }
            ScanEvent::FileSkipped {
                path,
                reason,
                message,
            } => match *reason {
                "invalid_file" => debug!(path = %path.display(), "Skipping non-PEM file"),
                "expired" => warn!(path = %path.display(), "Found expired certificate"),
                _ => warn!(path = %path.display(), reason, error = %message, "Could not load file"),
            },
            ScanEvent::MaterialCounted {
                certificates,
                private_keys,
            } => {
                info!(certificates, private_keys, "Found certificates and private keys");
            }
            ScanEvent::PairMatched {
                cert_path,
                key_path,
            } => {
                info!(
                    cert = %cert_path.display(),
                    key = %key_path.display(),
                    "Valid pair"
                );
            }
            ScanEvent::DuplicateKeys {
                cert_path,
                key_paths,
            } => {
                warn!(
                    cert = %cert_path.display(),
                    candidates = key_paths.len(),
                    chosen = ?key_paths.first(),
                    "Several private keys match one certificate"
                );
            }
            ScanEvent::Unmatched { cert_path } => {
                warn!(cert = %cert_path.display(), "No private key found for certificate");
            }
            ScanEvent::PhaseCompleted { phase, tasks } => {
                debug!(?phase, tasks, "Phase completed");
            }
        }
    }
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ScanEvent>>,
}

impl RecordingObserver {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events
    pub fn events(&self) -> Vec<ScanEvent> {
        self.events.lock().clone()
    }

    /// Paths skipped for the given reason
    pub fn skipped(&self, reason: &str) -> Vec<PathBuf> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                ScanEvent::FileSkipped { path, reason: r, .. } if *r == reason => {
                    Some(path.clone())
                }
                _ => None,
            })
            .collect()
    }
}

impl ScanObserver for RecordingObserver {
    fn on_event(&self, event: &ScanEvent) {
        self.events.lock().push(event.clone());
    }
}
