use super::errors::{DnsSecError, Result};
use std::fmt;

/// DS digest type algorithms accepted for trust anchor matching
/// (RFC 3658, RFC 4509)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DigestType {
    /// SHA-1 (RFC 3658)
    Sha1 = 1,
    /// SHA-256 (RFC 4509)
    Sha256 = 2,
}

impl DigestType {
    /// Create from digest type number; anything other than SHA-1 or
    /// SHA-256 is a hard error, never a silent fallback
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Self::Sha1),
            2 => Ok(Self::Sha256),
            other => Err(DnsSecError::UnsupportedDigestType(other)),
        }
    }

    /// Convert to digest type number
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Get the digest length in bytes
    pub fn digest_len(&self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha256 => 32,
        }
    }

    /// Calculate the digest of data using this algorithm
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        use ring::digest;
        let algorithm = match self {
            Self::Sha1 => &digest::SHA1_FOR_LEGACY_USE_ONLY,
            Self::Sha256 => &digest::SHA256,
        };
        digest::digest(algorithm, data).as_ref().to_vec()
    }
}

impl fmt::Display for DigestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha1 => write!(f, "SHA1"),
            Self::Sha256 => write!(f, "SHA256"),
        }
    }
}
