//! Certificate fixtures minted with rcgen

use rcgen::{CertificateParams, DistinguishedName, DnType, KeyPair};
use time::{Duration, OffsetDateTime};

fn self_signed(key: &KeyPair, not_before: OffsetDateTime, not_after: OffsetDateTime) -> String {
    let mut params = CertificateParams::new(vec!["example.test".to_string()]).unwrap();
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, "example.test");
    params.distinguished_name = dn;
    params.not_before = not_before;
    params.not_after = not_after;
    params.self_signed(key).unwrap().pem()
}

/// Certificate valid for the next year
pub(crate) fn cert_pem(key: &KeyPair) -> String {
    let now = OffsetDateTime::now_utc();
    self_signed(key, now - Duration::days(1), now + Duration::days(365))
}

/// Certificate that ended yesterday
pub(crate) fn expired_cert_pem(key: &KeyPair) -> String {
    let now = OffsetDateTime::now_utc();
    self_signed(key, now - Duration::days(30), now - Duration::days(1))
}

/// PKCS#8 PEM of the key
pub(crate) fn key_pem(key: &KeyPair) -> String {
    key.serialize_pem()
}
