//! Shared data model: loaded key material, key pairs, and output formats

use rustls::pki_types::CertificateDer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use time::OffsetDateTime;

/// Canonical public key encoding (DER SubjectPublicKeyInfo).
///
/// Equality is exact-byte. Never empty.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PublicKeyBytes(Arc<[u8]>);

impl PublicKeyBytes {
    /// Wrap an encoding, rejecting empty input
    pub fn new(bytes: impl Into<Vec<u8>>) -> Option<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return None;
        }
        Some(Self(bytes.into()))
    }

    /// Raw encoded bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Encoded length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true for a value built by [`PublicKeyBytes::new`]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for PublicKeyBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Tail bytes hold the key itself; the head is algorithm framing.
        let tail = &self.0[self.0.len().saturating_sub(8)..];
        write!(f, "PublicKeyBytes({} bytes, ..", self.0.len())?;
        for b in tail {
            write!(f, "{b:02x}")?;
        }
        write!(f, ")")
    }
}

/// Kind of PEM material found in a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    /// X.509 certificate
    Certificate,
    /// Private key
    PrivateKey,
}

impl fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaterialKind::Certificate => write!(f, "certificate"),
            MaterialKind::PrivateKey => write!(f, "private key"),
        }
    }
}

/// Parsed certificate kept for emission
#[derive(Debug, Clone)]
pub struct CertificateHandle {
    /// Leaf certificate DER
    pub der: CertificateDer<'static>,
    /// Subject distinguished name
    pub subject: String,
    /// End of validity
    pub not_after: OffsetDateTime,
    /// Number of certificates in the source file
    pub chain_len: usize,
}

/// One successfully loaded certificate or private key
#[derive(Debug, Clone)]
pub struct LoadedKeyMaterial {
    /// Source file
    pub path: PathBuf,
    /// Canonical public key
    pub public_key: PublicKeyBytes,
    /// Certificate or private key
    pub kind: MaterialKind,
    /// Present for certificates only
    pub certificate: Option<Arc<CertificateHandle>>,
}

impl LoadedKeyMaterial {
    /// Material loaded from a certificate file
    pub fn certificate(
        path: impl Into<PathBuf>,
        public_key: PublicKeyBytes,
        handle: CertificateHandle,
    ) -> Self {
        Self {
            path: path.into(),
            public_key,
            kind: MaterialKind::Certificate,
            certificate: Some(Arc::new(handle)),
        }
    }

    /// Material loaded from a private key file
    pub fn private_key(path: impl Into<PathBuf>, public_key: PublicKeyBytes) -> Self {
        Self {
            path: path.into(),
            public_key,
            kind: MaterialKind::PrivateKey,
            certificate: None,
        }
    }

    /// Whether this is a certificate
    pub fn is_certificate(&self) -> bool {
        self.kind == MaterialKind::Certificate
    }
}

/// Certificate matched with its private key
#[derive(Debug, Clone)]
pub struct KeyPair {
    certificate: Arc<CertificateHandle>,
    cert_path: PathBuf,
    key_path: PathBuf,
}

impl KeyPair {
    /// Pair a certificate with a private key.
    ///
    /// Returns `None` unless both sides share the same public key and the
    /// kinds are right.
    pub fn new(certificate: &LoadedKeyMaterial, private_key: &LoadedKeyMaterial) -> Option<Self> {
        if private_key.kind != MaterialKind::PrivateKey
            || certificate.public_key != private_key.public_key
        {
            return None;
        }
        let handle = certificate.certificate.clone()?;
        Some(Self {
            certificate: handle,
            cert_path: certificate.path.clone(),
            key_path: private_key.path.clone(),
        })
    }

    /// Parsed certificate
    pub fn certificate(&self) -> &CertificateHandle {
        &self.certificate
    }

    /// Certificate file
    pub fn cert_path(&self) -> &Path {
        &self.cert_path
    }

    /// Private key file
    pub fn key_path(&self) -> &Path {
        &self.key_path
    }
}

/// Output configuration flavour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Traefik v1 `[[tls]]` TOML blocks
    #[default]
    TraefikToml,
    /// Traefik v2 dynamic configuration (YAML)
    TraefikYaml,
}

impl std::str::FromStr for OutputFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "traefik-toml" | "toml" => Ok(OutputFormat::TraefikToml),
            "traefik-yaml" | "yaml" | "yml" => Ok(OutputFormat::TraefikYaml),
            other => Err(crate::Error::Config(format!(
                "Unknown output format: {other} (expected traefik-toml or traefik-yaml)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle() -> CertificateHandle {
        CertificateHandle {
            der: CertificateDer::from(vec![0x30, 0x00]),
            subject: "CN=a.example".to_string(),
            not_after: OffsetDateTime::UNIX_EPOCH,
            chain_len: 1,
        }
    }

    #[test]
    fn test_public_key_bytes_rejects_empty() {
        assert!(PublicKeyBytes::new(Vec::new()).is_none());
        let key = PublicKeyBytes::new(vec![1, 2, 3]).unwrap();
        assert_eq!(key.len(), 3);
        assert!(!key.is_empty());
    }

    #[test]
    fn test_key_pair_requires_equal_keys() {
        let x = PublicKeyBytes::new(vec![1, 2, 3]).unwrap();
        let y = PublicKeyBytes::new(vec![1, 2, 4]).unwrap();
        let cert = LoadedKeyMaterial::certificate("a.crt", x.clone(), handle());

        let matching = LoadedKeyMaterial::private_key("a.key", x);
        let other = LoadedKeyMaterial::private_key("d.key", y);

        let pair = KeyPair::new(&cert, &matching).unwrap();
        assert_eq!(pair.cert_path(), Path::new("a.crt"));
        assert_eq!(pair.key_path(), Path::new("a.key"));
        assert!(KeyPair::new(&cert, &other).is_none());
    }

    #[test]
    fn test_key_pair_rejects_two_certificates() {
        let x = PublicKeyBytes::new(vec![9]).unwrap();
        let a = LoadedKeyMaterial::certificate("a.crt", x.clone(), handle());
        let b = LoadedKeyMaterial::certificate("b.crt", x, handle());
        assert!(KeyPair::new(&a, &b).is_none());
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("toml".parse::<OutputFormat>().unwrap(), OutputFormat::TraefikToml);
        assert_eq!(
            "traefik-yaml".parse::<OutputFormat>().unwrap(),
            OutputFormat::TraefikYaml
        );
        assert!("ini".parse::<OutputFormat>().is_err());
    }
}
