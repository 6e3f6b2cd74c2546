//! Certificate and private key discovery for certmatch
//!
//! Walks a directory tree, loads every PEM certificate and private key it
//! finds, and pairs certificates with private keys that share a public key.
//!
//! # Pipeline
//!
//! - Walk: every regular file below the root
//! - Load: one task per file, classified by PEM header; expired
//!   certificates are dropped
//! - Match: one task per certificate against a read-only private key index
//!
//! Both fan-out phases are bounded by [`ScanOptions::concurrency`] and join
//! every task before the next phase starts.
//!
//! ```no_run
//! # async fn run() -> certmatch_core::Result<()> {
//! let report = certmatch_tls::find_key_pairs("/etc/ssl/sites").await?;
//! for pair in &report.pairs {
//!     println!("{} + {}", pair.cert_path().display(), pair.key_path().display());
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod config;
pub mod loader;
pub mod matcher;
pub mod scanner;
pub mod walker;

#[cfg(test)]
mod testing;

pub use config::ScanOptions;
pub use loader::{classify, load_file, parse_material};
pub use matcher::{Matched, PrivateKeyIndex};
pub use scanner::{ScanReport, ScanStats, Scanner};
pub use walker::{normalize_root, walk};

use std::path::Path;

/// Scan `root` with default options, logging through `tracing`
pub async fn find_key_pairs(root: impl AsRef<Path>) -> certmatch_core::Result<ScanReport> {
    Scanner::new(ScanOptions::default())?
        .scan(root.as_ref())
        .await
}
