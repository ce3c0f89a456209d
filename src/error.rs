use crate::dnssec::DnsSecError;
use thiserror::Error;

/// Unified error type for the trust anchor toolkit
#[derive(Debug, Error)]
pub enum AnchorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status} fetching {url}")]
    HttpStatus { url: String, status: u16 },

    #[error(transparent)]
    DnsSec(#[from] DnsSecError),

    #[error("Trust anchor XML error: {0}")]
    AnchorXml(String),

    #[error("Trust anchor file contains no KeyDigest elements")]
    NoAnchors,

    #[error("No trust anchors are within their validity period")]
    NoValidAnchors,

    #[error("Could not fetch DNSKEY records from any source")]
    NoKeySource,

    #[error("Resolver error: {0}")]
    Resolver(String),

    #[error("No published KSK matched a valid trust anchor")]
    NoMatchingKeys,

    #[error("CSR parse error: {0}")]
    Csr(String),

    #[error("Embedded DS does not match the CSR public key: expected '{expected}', computed '{computed}'")]
    DsMismatch { expected: String, computed: String },

    #[error("Signature verification failed: {0}")]
    SignatureVerification(String),

    #[error("Invalid UTF-8 in {0}")]
    InvalidUtf8(String),
}

pub type Result<T> = std::result::Result<T, AnchorError>;
