//! # certmatch Core
//!
//! Core types, events, and error handling shared by the certmatch crates.
//!
//! This crate provides:
//! - The error taxonomy and its recovery policy
//! - Loaded key material and matched key pairs
//! - Structured scan events and the observer trait
//! - Lexical path cleaning for scan roots and emitted paths

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod error;
pub mod events;
pub mod path;
pub mod types;

pub use error::{Error, Result};
pub use events::{
    Phase, RecordingObserver, ScanEvent, ScanObserver, SharedObserver, TracingObserver,
};
pub use path::clean;
pub use types::{
    CertificateHandle, KeyPair, LoadedKeyMaterial, MaterialKind, OutputFormat, PublicKeyBytes,
};
