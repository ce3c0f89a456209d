use super::digest::DigestType;
use super::ds::DsRecord;
use super::errors::{DnsSecError, Result};
use chrono::{DateTime, FixedOffset, Utc};

/// A published trust anchor digest, one `KeyDigest` element of IANA's
/// root-anchors document. The key tag is advisory: matching is done on
/// the digest, never on the tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustAnchorDigest {
    /// The `id` attribute of the KeyDigest element
    pub id: String,
    pub key_tag: u16,
    pub algorithm: u8,
    pub digest_type: DigestType,
    /// Expected digest as uppercase hex
    pub digest_hex: String,
    /// Start of the validity window; absence means no lower bound
    pub valid_from: Option<DateTime<FixedOffset>>,
    /// End of the validity window; absence means no upper bound
    pub valid_until: Option<DateTime<FixedOffset>>,
}

impl TrustAnchorDigest {
    pub fn new(
        id: impl Into<String>,
        key_tag: u16,
        algorithm: u8,
        digest_type: u8,
        digest_hex: impl Into<String>,
    ) -> Result<Self> {
        let digest_type = DigestType::from_u8(digest_type)?;
        let digest_hex: String = digest_hex.into();
        let digest_hex = digest_hex.to_uppercase();
        if hex::decode(&digest_hex).is_err() {
            return Err(DnsSecError::MalformedRecord(format!(
                "trust anchor digest is not valid hex: '{digest_hex}'"
            )));
        }
        Ok(Self {
            id: id.into(),
            key_tag,
            algorithm,
            digest_type,
            digest_hex,
            valid_from: None,
            valid_until: None,
        })
    }

    /// True if `now` falls inside the validity window. Missing bounds
    /// are treated as unbounded on that side.
    pub fn valid_at(&self, now: DateTime<Utc>) -> bool {
        if let Some(from) = &self.valid_from {
            if now < from.with_timezone(&Utc) {
                return false;
            }
        }
        if let Some(until) = &self.valid_until {
            if now > until.with_timezone(&Utc) {
                return false;
            }
        }
        true
    }

    /// Convert to an equivalent DS record
    pub fn to_ds(&self) -> Result<DsRecord> {
        let digest = hex::decode(&self.digest_hex)
            .map_err(|e| DnsSecError::MalformedRecord(format!("bad anchor digest hex: {e}")))?;
        Ok(DsRecord {
            key_tag: self.key_tag,
            algorithm: self.algorithm,
            digest_type: self.digest_type,
            digest,
        })
    }
}
