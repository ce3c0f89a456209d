/// Calculate the key tag of a DNSKEY record (RFC 4034 Appendix B).
///
/// The tag is a 16-bit one's-complement-style checksum over the wire
/// format RDATA: flags (2 bytes, big-endian), protocol, algorithm,
/// followed by the public key bytes. Odd-length RDATA is implicitly
/// padded with a trailing zero byte, which contributes nothing to the
/// accumulator.
pub fn calculate_key_tag(flags: u16, protocol: u8, algorithm: u8, public_key: &[u8]) -> u16 {
    // RSAMD5 (algorithm 1) keys carry their tag in the low 16 bits
    // of the modulus (RFC 4034 Appendix B.1)
    if algorithm == 1 {
        if public_key.len() >= 2 {
            return u16::from_be_bytes([
                public_key[public_key.len() - 2],
                public_key[public_key.len() - 1],
            ]);
        }
        return 0;
    }

    let mut rdata = Vec::with_capacity(4 + public_key.len());
    rdata.extend_from_slice(&flags.to_be_bytes());
    rdata.push(protocol);
    rdata.push(algorithm);
    rdata.extend_from_slice(public_key);

    let mut accumulator: u32 = 0;
    for (i, &byte) in rdata.iter().enumerate() {
        if i % 2 == 0 {
            accumulator += u32::from(byte) << 8;
        } else {
            accumulator += u32::from(byte);
        }
    }

    (((accumulator & 0xFFFF) + (accumulator >> 16)) & 0xFFFF) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_tag_rfc4034_vector() {
        // Test vector from RFC 4034 Appendix B.5
        let public_key = hex::decode(
            "030101a80020a95566ba42e886bb804cda84e47ef56dbd7aec612615552cec906d3e9b72dc4f90d3fc09b8e9d0ff2ae8ee5ed8cd61d7622c39ee2d76a2153bc0ac8b9e254125c46e0a224507fb358d7f6b5d7a42f75e60b9748e7c0747e2447f4bd7d10ca24bb1498de34a504406bbeb3b041fe48d0ad2b1de5adadb87d0c8824e7cc4dc3e5b7f0b3e8ac72c3d3d8aa7251abcaad82ad5ececed8cd83825d19ffd95e93bca729fdd88901b20fc598fb6a0779ddfa95e3e42ca9d0a7739d3c4ad3a7a5a30b3c60a73a6f09fdb812746e0d69edfba06754465f2e1dd5e3802e6d05bd6148e38fd8ca1632b71f6559fe9b6e18d73c5a750e3e2f2f205972e7b28ae04ddae5e27915a08d217db5ce090c119d23f79fb"
        ).unwrap();

        assert_eq!(calculate_key_tag(0x0101, 3, 5, &public_key), 55495);
    }

    #[test]
    fn test_key_tag_zero_rdata() {
        // All-zero RDATA of even length must yield tag 0
        assert_eq!(calculate_key_tag(0, 0, 0, &[0u8; 16]), 0);
        assert_eq!(calculate_key_tag(0, 0, 0, &[]), 0);
    }

    #[test]
    fn test_key_tag_deterministic() {
        let key = b"not a real key but good enough";
        let first = calculate_key_tag(257, 3, 8, key);
        for _ in 0..10 {
            assert_eq!(calculate_key_tag(257, 3, 8, key), first);
        }
    }

    #[test]
    fn test_key_tag_odd_length_padding() {
        // A trailing zero byte must not change the tag (RFC 4034 B padding)
        let odd = [0xABu8, 0xCD, 0xEF];
        let padded = [0xABu8, 0xCD, 0xEF, 0x00];
        assert_eq!(
            calculate_key_tag(257, 3, 8, &odd),
            calculate_key_tag(257, 3, 8, &padded)
        );
    }

    #[test]
    fn test_key_tag_rsamd5() {
        // RSAMD5 uses the last two bytes of the modulus
        assert_eq!(calculate_key_tag(0x0101, 3, 1, &[0x12, 0x34, 0x56, 0x78]), 0x5678);
        assert_eq!(calculate_key_tag(0x0101, 3, 1, &[0x12]), 0);
    }
}
