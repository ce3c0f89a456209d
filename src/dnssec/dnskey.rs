use super::algorithm::DnsSecAlgorithm;
use super::constants::DNSKEY_PROTOCOL;
use super::digest::DigestType;
use super::ds::DsRecord;
use super::errors::{DnsSecError, Result};
use super::key_tag::calculate_key_tag;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::fmt;

/// A DNSKEY record in its transport form: fixed header fields plus the
/// base64-encoded public key as it appears in presentation format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnskeyRecord {
    pub flags: u16,
    pub protocol: u8,
    pub algorithm: DnsSecAlgorithm,
    /// Base64 public key, whitespace already stripped
    pub public_key: String,
}

impl DnskeyRecord {
    /// Create a record, validating field ranges. The protocol field is
    /// fixed at 3 (RFC 4034 §2.1.2) and the algorithm number must be a
    /// recognized DNSSEC algorithm.
    pub fn new(flags: u16, protocol: u8, algorithm: u8, public_key: &str) -> Result<Self> {
        if protocol != DNSKEY_PROTOCOL {
            return Err(DnsSecError::MalformedRecord(format!(
                "DNSKEY protocol must be {DNSKEY_PROTOCOL}, got {protocol}"
            )));
        }
        let algorithm = DnsSecAlgorithm::from_u8(algorithm)
            .ok_or(DnsSecError::UnsupportedAlgorithm(algorithm))?;

        Ok(Self {
            flags,
            protocol,
            algorithm,
            public_key: public_key.split_whitespace().collect(),
        })
    }

    /// Parse presentation-format RDATA: `flags protocol algorithm base64...`
    /// (the key may be split across several whitespace-separated chunks)
    pub fn from_rdata_text(text: &str) -> Result<Self> {
        let mut fields = text.split_whitespace();

        let flags = fields
            .next()
            .ok_or_else(|| DnsSecError::MalformedRecord("missing flags field".into()))?
            .parse::<u16>()
            .map_err(|e| DnsSecError::MalformedRecord(format!("bad flags field: {e}")))?;
        let protocol = fields
            .next()
            .ok_or_else(|| DnsSecError::MalformedRecord("missing protocol field".into()))?
            .parse::<u8>()
            .map_err(|e| DnsSecError::MalformedRecord(format!("bad protocol field: {e}")))?;
        let algorithm = fields
            .next()
            .ok_or_else(|| DnsSecError::MalformedRecord("missing algorithm field".into()))?
            .parse::<u8>()
            .map_err(|e| DnsSecError::MalformedRecord(format!("bad algorithm field: {e}")))?;

        let public_key: String = fields.collect();
        if public_key.is_empty() {
            return Err(DnsSecError::MalformedRecord("missing public key field".into()));
        }

        Self::new(flags, protocol, algorithm, &public_key)
    }

    /// Decode the public key from its base64 transport form
    pub fn public_key_bytes(&self) -> Result<Vec<u8>> {
        BASE64
            .decode(&self.public_key)
            .map_err(|e| DnsSecError::InvalidKeyEncoding(e.to_string()))
    }

    /// Wire-format RDATA: flags, protocol, algorithm, key bytes
    pub fn rdata_wire(&self) -> Result<Vec<u8>> {
        let key = self.public_key_bytes()?;
        let mut rdata = Vec::with_capacity(4 + key.len());
        rdata.extend_from_slice(&self.flags.to_be_bytes());
        rdata.push(self.protocol);
        rdata.push(self.algorithm.to_u8());
        rdata.extend_from_slice(&key);
        Ok(rdata)
    }

    /// Calculate the RFC 4034 key tag of this record
    pub fn key_tag(&self) -> Result<u16> {
        Ok(calculate_key_tag(
            self.flags,
            self.protocol,
            self.algorithm.to_u8(),
            &self.public_key_bytes()?,
        ))
    }

    /// Compute the DS digest over the owner name (wire format) and RDATA
    /// (RFC 4509 §2.1)
    pub fn digest(&self, owner_wire: &[u8], digest_type: DigestType) -> Result<Vec<u8>> {
        let rdata = self.rdata_wire()?;
        let mut input = Vec::with_capacity(owner_wire.len() + rdata.len());
        input.extend_from_slice(owner_wire);
        input.extend_from_slice(&rdata);
        Ok(digest_type.digest(&input))
    }

    /// Derive the DS record that a parent zone would publish for this key
    pub fn ds(&self, owner_wire: &[u8], digest_type: DigestType) -> Result<DsRecord> {
        Ok(DsRecord {
            key_tag: self.key_tag()?,
            algorithm: self.algorithm.to_u8(),
            digest_type,
            digest: self.digest(owner_wire, digest_type)?,
        })
    }

    /// True if the Secure Entry Point bit is set (KSK)
    pub fn is_ksk(&self) -> bool {
        self.flags & 0x0001 != 0
    }
}

impl fmt::Display for DnskeyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.flags,
            self.protocol,
            self.algorithm.to_u8(),
            self.public_key
        )
    }
}

/// Encode a domain name in DNS wire format, lowercased for digest
/// computation (RFC 4034 §6.2). The root is the single zero byte.
pub fn name_to_wire(name: &str) -> Result<Vec<u8>> {
    let trimmed = name.trim_end_matches('.');
    let mut wire = Vec::with_capacity(trimmed.len() + 2);
    if !trimmed.is_empty() {
        for label in trimmed.split('.') {
            if label.is_empty() {
                return Err(DnsSecError::InvalidName(format!("empty label in '{name}'")));
            }
            if label.len() > 63 {
                return Err(DnsSecError::InvalidName(format!(
                    "label longer than 63 octets in '{name}'"
                )));
            }
            wire.push(label.len() as u8);
            wire.extend(label.bytes().map(|b| b.to_ascii_lowercase()));
        }
    }
    wire.push(0);
    if wire.len() > 255 {
        return Err(DnsSecError::InvalidName(format!(
            "name '{name}' exceeds 255 octets"
        )));
    }
    Ok(wire)
}
