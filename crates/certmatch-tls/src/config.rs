//! Scan options

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Scan tuning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanOptions {
    /// Maximum tasks in flight per phase
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Optional per-file and per-certificate timeout
    #[serde(default, with = "humantime_serde")]
    pub task_timeout: Option<Duration>,
}

fn default_concurrency() -> usize {
    64
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            task_timeout: None,
        }
    }
}

impl ScanOptions {
    /// Set the concurrency limit
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the per-task timeout
    pub fn with_task_timeout(mut self, timeout: Duration) -> Self {
        self.task_timeout = Some(timeout);
        self
    }

    /// Validate the options
    pub fn validate(&self) -> certmatch_core::Result<()> {
        if self.concurrency == 0 {
            return Err(certmatch_core::Error::Config(
                "concurrency must be > 0".to_string(),
            ));
        }

        if self.task_timeout == Some(Duration::ZERO) {
            return Err(certmatch_core::Error::Config(
                "task_timeout must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}
