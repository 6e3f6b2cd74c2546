//! Certificate to private key matching

use certmatch_core::{Error, KeyPair, LoadedKeyMaterial, MaterialKind, PublicKeyBytes, Result};
use std::collections::HashMap;
use std::path::PathBuf;

/// Private keys grouped by canonical public key.
///
/// Candidates sharing a public key are kept in path order, so the smallest
/// path always wins regardless of load order.
#[derive(Debug, Default)]
pub struct PrivateKeyIndex {
    by_key: HashMap<PublicKeyBytes, Vec<LoadedKeyMaterial>>,
    len: usize,
}

/// A certificate paired with its private key
#[derive(Debug, Clone)]
pub struct Matched {
    /// The chosen pair
    pub pair: KeyPair,
    /// Other private keys with the same public key, in path order
    pub alternatives: Vec<PathBuf>,
}

impl PrivateKeyIndex {
    /// Index private keys; anything that is not a private key is ignored
    pub fn new(keys: impl IntoIterator<Item = LoadedKeyMaterial>) -> Self {
        let mut by_key: HashMap<PublicKeyBytes, Vec<LoadedKeyMaterial>> = HashMap::new();
        let mut len = 0;

        for key in keys {
            if key.kind != MaterialKind::PrivateKey {
                continue;
            }
            len += 1;
            by_key.entry(key.public_key.clone()).or_default().push(key);
        }

        for candidates in by_key.values_mut() {
            candidates.sort_by(|a, b| a.path.cmp(&b.path));
        }

        Self { by_key, len }
    }

    /// Number of indexed private keys
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no private key was indexed
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Private keys carrying `public_key`, in path order
    pub fn candidates(&self, public_key: &PublicKeyBytes) -> &[LoadedKeyMaterial] {
        self.by_key
            .get(public_key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Pair one certificate with its private key
    pub fn pair(&self, certificate: &LoadedKeyMaterial) -> Result<Matched> {
        let no_match = || Error::NoMatchFound(certificate.path.clone());

        let (chosen, rest) = self
            .candidates(&certificate.public_key)
            .split_first()
            .ok_or_else(no_match)?;

        let pair = KeyPair::new(certificate, chosen).ok_or_else(no_match)?;

        Ok(Matched {
            pair,
            alternatives: rest.iter().map(|key| key.path.clone()).collect(),
        })
    }
}
