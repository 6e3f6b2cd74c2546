//! Reverse proxy TLS configuration rendering for certmatch
//!
//! Turns matched key pairs into a Traefik TLS block wrapped in
//! autogenerated markers, so the block can live inside a larger,
//! hand-maintained file.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod markers;
pub mod traefik;

pub use markers::{splice, CONFIG_FOOTER, CONFIG_HEADER};
pub use traefik::{TraefikEmitter, WriteMode};
