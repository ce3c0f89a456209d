use thiserror::Error;

/// Errors surfaced by the key tag / digest core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DnsSecError {
    #[error("Unsupported digest type: {0}")]
    UnsupportedDigestType(u8),

    #[error("Unsupported DNSSEC algorithm: {0}")]
    UnsupportedAlgorithm(u8),

    #[error("Invalid DNSKEY public key encoding: {0}")]
    InvalidKeyEncoding(String),

    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Invalid DNS name: {0}")]
    InvalidName(String),
}

pub type Result<T> = std::result::Result<T, DnsSecError>;
