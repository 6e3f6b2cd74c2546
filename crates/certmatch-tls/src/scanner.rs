//! Scan orchestration: walk, load, match

use crate::config::ScanOptions;
use crate::loader::load_file;
use crate::matcher::{Matched, PrivateKeyIndex};
use crate::walker::{normalize_root, walk};
use certmatch_core::{
    Error, KeyPair, LoadedKeyMaterial, Phase, Result, ScanEvent, SharedObserver, TracingObserver,
};
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Counts gathered during a scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Regular files discovered
    pub files: usize,
    /// Valid certificates loaded
    pub certificates: usize,
    /// Private keys loaded
    pub private_keys: usize,
    /// Certificates skipped as expired
    pub expired: usize,
    /// Files without a PEM header
    pub invalid: usize,
    /// Files that could not be read or parsed
    pub failed: usize,
    /// Certificates without a private key
    pub unmatched: usize,
    /// Pairs produced
    pub pairs: usize,
}

/// Outcome of a scan
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Matched pairs, ordered by certificate path
    pub pairs: Vec<KeyPair>,
    /// Counts
    pub stats: ScanStats,
}

/// Finds certificate and private key pairs below a directory
#[derive(Clone)]
pub struct Scanner {
    options: ScanOptions,
    observer: SharedObserver,
    reference_time: Option<OffsetDateTime>,
}

impl fmt::Debug for Scanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("options", &self.options)
            .field("reference_time", &self.reference_time)
            .finish_non_exhaustive()
    }
}

impl Scanner {
    /// Create a scanner that reports through `tracing`
    pub fn new(options: ScanOptions) -> Result<Self> {
        options.validate()?;

        Ok(Self {
            options,
            observer: Arc::new(TracingObserver),
            reference_time: None,
        })
    }

    /// Report events to `observer` instead
    pub fn with_observer(mut self, observer: SharedObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Judge expiry against a fixed instant instead of the current time
    pub fn with_reference_time(mut self, now: OffsetDateTime) -> Self {
        self.reference_time = Some(now);
        self
    }

    /// Walk `root` and pair every certificate with its private key.
    ///
    /// Only a directory listing failure is fatal.
    pub async fn scan(&self, root: &Path) -> Result<ScanReport> {
        let files = self.discover(normalize_root(root)).await?;
        Ok(self.scan_files(files).await)
    }

    async fn discover(&self, root: PathBuf) -> Result<Vec<PathBuf>> {
        let observer = Arc::clone(&self.observer);
        let files = tokio::task::spawn_blocking(move || walk(&root, observer.as_ref()))
            .await
            .map_err(|e| Error::Task(format!("directory walk: {e}")))??;

        self.observer.on_event(&ScanEvent::FilesDiscovered { count: files.len() });
        self.observer.on_event(&ScanEvent::PhaseCompleted {
            phase: Phase::Walk,
            tasks: 1,
        });

        Ok(files)
    }

    /// Load and pair an already discovered file list
    pub async fn scan_files(&self, files: Vec<PathBuf>) -> ScanReport {
        let mut stats = ScanStats {
            files: files.len(),
            ..ScanStats::default()
        };

        let (certificates, private_keys) = self.load_all(files, &mut stats).await;

        stats.certificates = certificates.len();
        stats.private_keys = private_keys.len();
        self.observer.on_event(&ScanEvent::MaterialCounted {
            certificates: stats.certificates,
            private_keys: stats.private_keys,
        });

        if certificates.is_empty() && private_keys.is_empty() {
            return ScanReport {
                pairs: Vec::new(),
                stats,
            };
        }

        // Load phase has joined; the index is complete and read-only from here.
        let index = Arc::new(PrivateKeyIndex::new(private_keys));
        let mut pairs = self.match_all(certificates, index, &mut stats).await;

        pairs.sort_by(|a, b| a.cert_path().cmp(b.cert_path()));
        stats.pairs = pairs.len();

        ScanReport { pairs, stats }
    }

    async fn load_all(
        &self,
        files: Vec<PathBuf>,
        stats: &mut ScanStats,
    ) -> (Vec<LoadedKeyMaterial>, Vec<LoadedKeyMaterial>) {
        let now = self.reference_time.unwrap_or_else(OffsetDateTime::now_utc);
        let permits = Arc::new(Semaphore::new(self.options.concurrency));
        let timeout = self.options.task_timeout;
        let mut tasks = JoinSet::new();

        for path in files {
            let permits = Arc::clone(&permits);
            tasks.spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| Error::Task(e.to_string()))?;
                let label = path.clone();
                with_timeout(timeout, &label, load_file(path, now)).await
            });
        }

        let mut certificates = Vec::new();
        let mut private_keys = Vec::new();
        let mut joined = 0;

        while let Some(outcome) = tasks.join_next().await {
            joined += 1;
            match outcome {
                Ok(Ok(material)) => {
                    self.observer.on_event(&ScanEvent::MaterialLoaded {
                        path: material.path.clone(),
                        kind: material.kind,
                    });
                    if material.is_certificate() {
                        certificates.push(material);
                    } else {
                        private_keys.push(material);
                    }
                }
                Ok(Err(e)) => {
                    match e {
                        Error::InvalidFile(_) => stats.invalid += 1,
                        Error::Expired { .. } => stats.expired += 1,
                        _ => stats.failed += 1,
                    }
                    self.report_skip(&e);
                }
                Err(e) => {
                    stats.failed += 1;
                    self.report_skip(&Error::Task(e.to_string()));
                }
            }
        }

        self.observer.on_event(&ScanEvent::PhaseCompleted {
            phase: Phase::Load,
            tasks: joined,
        });

        (certificates, private_keys)
    }

    async fn match_all(
        &self,
        certificates: Vec<LoadedKeyMaterial>,
        index: Arc<PrivateKeyIndex>,
        stats: &mut ScanStats,
    ) -> Vec<KeyPair> {
        let permits = Arc::new(Semaphore::new(self.options.concurrency));
        let timeout = self.options.task_timeout;
        let mut tasks = JoinSet::new();

        for certificate in certificates {
            let permits = Arc::clone(&permits);
            let index = Arc::clone(&index);
            tasks.spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| Error::Task(e.to_string()))?;
                let label = certificate.path.clone();
                with_timeout(timeout, &label, async move { index.pair(&certificate) }).await
            });
        }

        let mut pairs = Vec::new();
        let mut joined = 0;

        while let Some(outcome) = tasks.join_next().await {
            joined += 1;
            match outcome {
                Ok(Ok(Matched { pair, alternatives })) => {
                    self.observer.on_event(&ScanEvent::PairMatched {
                        cert_path: pair.cert_path().to_path_buf(),
                        key_path: pair.key_path().to_path_buf(),
                    });
                    if !alternatives.is_empty() {
                        let mut key_paths = vec![pair.key_path().to_path_buf()];
                        key_paths.extend(alternatives);
                        self.observer.on_event(&ScanEvent::DuplicateKeys {
                            cert_path: pair.cert_path().to_path_buf(),
                            key_paths,
                        });
                    }
                    pairs.push(pair);
                }
                Ok(Err(Error::NoMatchFound(cert_path))) => {
                    stats.unmatched += 1;
                    self.observer.on_event(&ScanEvent::Unmatched { cert_path });
                }
                Ok(Err(e)) => {
                    stats.failed += 1;
                    self.report_skip(&e);
                }
                Err(e) => {
                    stats.failed += 1;
                    self.report_skip(&Error::Task(e.to_string()));
                }
            }
        }

        self.observer.on_event(&ScanEvent::PhaseCompleted {
            phase: Phase::Match,
            tasks: joined,
        });

        pairs
    }

    fn report_skip(&self, error: &Error) {
        self.observer.on_event(&ScanEvent::FileSkipped {
            path: error.path().map(Path::to_path_buf).unwrap_or_default(),
            reason: error.kind(),
            message: error.to_string(),
        });
    }
}

async fn with_timeout<T>(
    limit: Option<Duration>,
    path: &Path,
    task: impl Future<Output = Result<T>>,
) -> Result<T> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, task)
            .await
            .map_err(|_| Error::Timeout(path.to_path_buf()))?,
        None => task.await,
    }
}
