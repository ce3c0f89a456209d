use super::digest::DigestType;
use super::errors::{DnsSecError, Result};
use std::fmt;

/// A DS record: the digest of a DNSKEY as published by the parent zone
/// or distributed as a trust anchor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DsRecord {
    pub key_tag: u16,
    pub algorithm: u8,
    pub digest_type: DigestType,
    pub digest: Vec<u8>,
}

impl DsRecord {
    /// Parse presentation-format RDATA: `keytag algorithm digesttype hex...`
    pub fn from_rdata_text(text: &str) -> Result<Self> {
        let mut fields = text.split_whitespace();

        let key_tag = fields
            .next()
            .ok_or_else(|| DnsSecError::MalformedRecord("missing DS key tag".into()))?
            .parse::<u16>()
            .map_err(|e| DnsSecError::MalformedRecord(format!("bad DS key tag: {e}")))?;
        let algorithm = fields
            .next()
            .ok_or_else(|| DnsSecError::MalformedRecord("missing DS algorithm".into()))?
            .parse::<u8>()
            .map_err(|e| DnsSecError::MalformedRecord(format!("bad DS algorithm: {e}")))?;
        let digest_type = fields
            .next()
            .ok_or_else(|| DnsSecError::MalformedRecord("missing DS digest type".into()))?
            .parse::<u8>()
            .map_err(|e| DnsSecError::MalformedRecord(format!("bad DS digest type: {e}")))?;
        let digest_type = DigestType::from_u8(digest_type)?;

        let digest_hex: String = fields.collect();
        if digest_hex.is_empty() {
            return Err(DnsSecError::MalformedRecord("missing DS digest".into()));
        }
        let digest = hex::decode(&digest_hex)
            .map_err(|e| DnsSecError::MalformedRecord(format!("bad DS digest hex: {e}")))?;
        if digest.len() != digest_type.digest_len() {
            return Err(DnsSecError::MalformedRecord(format!(
                "DS digest is {} bytes, {} expects {}",
                digest.len(),
                digest_type,
                digest_type.digest_len()
            )));
        }

        Ok(Self {
            key_tag,
            algorithm,
            digest_type,
            digest,
        })
    }

    /// The digest as uppercase hex, the form used for anchor comparison
    pub fn digest_hex(&self) -> String {
        hex::encode_upper(&self.digest)
    }
}

impl fmt::Display for DsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.key_tag,
            self.algorithm,
            self.digest_type.to_u8(),
            self.digest_hex()
        )
    }
}
