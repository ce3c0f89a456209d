pub mod algorithm;
pub mod digest;
pub mod dnskey;
pub mod ds;
pub mod errors;
pub mod key_tag;
pub mod matching;
pub mod trust_anchor;

pub use algorithm::{AlgorithmClass, DnsSecAlgorithm};
pub use digest::DigestType;
pub use dnskey::{DnskeyRecord, name_to_wire};
pub use ds::DsRecord;
pub use errors::DnsSecError;
pub use key_tag::calculate_key_tag;
pub use matching::{find_matching_keys, match_anchor};
pub use trust_anchor::TrustAnchorDigest;

/// DNSSEC constants
pub mod constants {
    /// Protocol field of every DNSKEY record (RFC 4034)
    pub const DNSKEY_PROTOCOL: u8 = 3;

    /// Flags value of a Key Signing Key (Zone Key + SEP)
    pub const FLAGS_KSK: u16 = 257;

    /// Flags value of a Zone Signing Key
    pub const FLAGS_ZSK: u16 = 256;

    /// The root zone owner name in wire format
    pub const ROOT_OWNER_WIRE: &[u8] = &[0];
}
