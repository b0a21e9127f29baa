//! Canonical form and salted digest of a tracking record.

use std::fmt;

use serde::Serialize;
use tracing::debug;
use tracker_model::{AttributeRecord, format_timestamp};

use crate::algorithm::DigestAlgorithm;
use crate::config::IntegrityConfig;
use crate::error::Result;

/// Salt used when no `TRACKER_INTEGRITY_SALT` was set at build time.
pub const DEFAULT_SALT: &str = "tracker-integrity-v1";

/// Salt compiled into this build.
pub const BUILD_SALT: &str = match option_env!("TRACKER_INTEGRITY_SALT") {
    Some(salt) => salt,
    None => DEFAULT_SALT,
};

/// Outcome of checking a record's stored integrity hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrityStatus {
    /// The stored hash matches the recomputed one.
    Valid,
    /// The stored hash does not match; the metadata was altered.
    Invalid,
    /// The record carries no hash to check.
    NotApplicable,
}

impl IntegrityStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::NotApplicable => "n/a",
        }
    }

    pub const fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid)
    }
}

impl fmt::Display for IntegrityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computes and verifies salted digests over tracking records.
#[derive(Debug, Clone)]
pub struct IntegrityCodec {
    algorithm: DigestAlgorithm,
    salt: String,
}

impl IntegrityCodec {
    /// Build a codec using the salt compiled into this build.
    ///
    /// Fails if the algorithm is unavailable.
    pub fn new(config: &IntegrityConfig) -> Result<Self> {
        Self::with_salt(config, BUILD_SALT)
    }

    /// Build a codec with an explicit salt.
    pub fn with_salt(config: &IntegrityConfig, salt: impl Into<String>) -> Result<Self> {
        let algorithm: DigestAlgorithm = config.algorithm.parse()?;
        debug!(%algorithm, "integrity codec ready");
        Ok(Self {
            algorithm,
            salt: salt.into(),
        })
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// Owner, date, version and UUID concatenated without separators.
    /// Absent fields contribute nothing; the date is always written with
    /// [`TIMESTAMP_FORMAT`](tracker_model::TIMESTAMP_FORMAT).
    pub fn canonicalize(&self, record: &AttributeRecord) -> String {
        let mut out = String::new();
        out.push_str(record.owner.as_deref().unwrap_or_default());
        if let Some(date) = &record.date {
            out.push_str(&format_timestamp(date));
        }
        out.push_str(record.version.as_deref().unwrap_or_default());
        out.push_str(record.uuid.as_deref().unwrap_or_default());
        out
    }

    /// Salted digest of a canonical string, as lowercase hex.
    ///
    /// Carriage returns, line feeds and spaces are dropped before salting.
    pub fn hash(&self, canonical: &str) -> String {
        let mut input: String = canonical
            .chars()
            .filter(|c| !matches!(c, '\r' | '\n' | ' '))
            .collect();
        input.push_str(&self.salt);
        self.algorithm.hex_digest(input.as_bytes())
    }

    /// Digest of a record's canonical form.
    pub fn digest(&self, record: &AttributeRecord) -> String {
        self.hash(&self.canonicalize(record))
    }

    /// Check the stored integrity hash against the record's other fields.
    pub fn verify(&self, record: &AttributeRecord) -> IntegrityStatus {
        let Some(stored) = record.integrity.as_deref() else {
            return IntegrityStatus::NotApplicable;
        };
        if stored == self.digest(record) {
            IntegrityStatus::Valid
        } else {
            IntegrityStatus::Invalid
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IntegrityError;
    use tracker_model::parse_timestamp;

    const ALICE_SHA256: &str = "5e4b7dadce04cf44a0598e5a53d4f36c57fb178057eff74911710ac4ed4f7723";

    fn codec() -> IntegrityCodec {
        IntegrityCodec::with_salt(&IntegrityConfig::default(), "S").unwrap()
    }

    fn alice() -> AttributeRecord {
        AttributeRecord::new()
            .with_owner("alice")
            .with_date(parse_timestamp("2024-01-02 03:04:05").unwrap())
            .with_version("1.0")
            .with_uuid("u1")
    }

    #[test]
    fn test_canonical_form() {
        assert_eq!(codec().canonicalize(&alice()), "alice2024-01-02 03:04:051.0u1");
        assert_eq!(codec().canonicalize(&AttributeRecord::new()), "");
    }

    #[test]
    fn test_known_digest() {
        assert_eq!(codec().digest(&alice()), ALICE_SHA256);
    }

    #[test]
    fn test_hash_ignores_line_breaks_and_spaces() {
        let codec = codec();
        assert_eq!(codec.hash("a b\r\nc"), codec.hash("abc"));
        assert_ne!(codec.hash("a\tb"), codec.hash("ab"));
    }

    #[test]
    fn test_verify_outcomes() {
        let codec = codec();
        assert_eq!(codec.verify(&alice()), IntegrityStatus::NotApplicable);

        let sealed = alice().with_integrity(ALICE_SHA256);
        assert_eq!(codec.verify(&sealed), IntegrityStatus::Valid);

        let upper = alice().with_integrity(ALICE_SHA256.to_uppercase());
        assert_eq!(codec.verify(&upper), IntegrityStatus::Invalid);
        let padded = alice().with_integrity(format!("  {ALICE_SHA256}  "));
        assert_eq!(codec.verify(&padded), IntegrityStatus::Invalid);

        let tampered = sealed.with_owner("bob");
        assert_eq!(codec.verify(&tampered), IntegrityStatus::Invalid);
    }

    #[test]
    fn test_salt_changes_digest() {
        let other = IntegrityCodec::with_salt(&IntegrityConfig::default(), "T").unwrap();
        assert_ne!(other.digest(&alice()), ALICE_SHA256);
    }

    #[test]
    fn test_unavailable_algorithm_fails_construction() {
        let config = IntegrityConfig::default().with_algorithm("sha1");
        let err = IntegrityCodec::new(&config).unwrap_err();
        assert!(matches!(err, IntegrityError::DigestAlgorithmUnavailable { .. }));
    }

    #[test]
    fn test_date_always_reaches_canonical_form() {
        let codec = codec();
        let other_day = alice().with_date(parse_timestamp("1999-12-31 23:59:59").unwrap());
        assert_eq!(
            codec.canonicalize(&other_day),
            "alice1999-12-31 23:59:591.0u1"
        );

        let sealed = alice().with_integrity(ALICE_SHA256);
        let tampered = sealed.with_date(parse_timestamp("1999-12-31 23:59:59").unwrap());
        assert_eq!(codec.verify(&tampered), IntegrityStatus::Invalid);
    }

    #[test]
    fn test_build_salt_is_not_empty() {
        assert!(!BUILD_SALT.is_empty());
    }
}
