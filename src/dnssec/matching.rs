use super::dnskey::DnskeyRecord;
use super::errors::Result;
use super::trust_anchor::TrustAnchorDigest;
use tracing::{debug, warn};

/// Check whether a candidate DNSKEY hashes to the anchor's digest.
///
/// The owner name must be in wire format (see
/// [`super::constants::ROOT_OWNER_WIRE`] for the root zone). Pure
/// function over its inputs; the key tag is not consulted.
pub fn match_anchor(
    candidate: &DnskeyRecord,
    anchor: &TrustAnchorDigest,
    owner_wire: &[u8],
) -> Result<bool> {
    let digest = candidate.digest(owner_wire, anchor.digest_type)?;
    Ok(hex::encode_upper(digest).eq_ignore_ascii_case(&anchor.digest_hex))
}

/// Filter candidates down to those matching at least one anchor.
///
/// Anchors are tried in the order given and the first match wins; each
/// candidate appears at most once, in input order. A candidate that
/// fails to decode is skipped with a warning rather than aborting the
/// rest of the batch. Unmatched candidates are silently excluded; the
/// caller decides whether an empty result is fatal.
pub fn find_matching_keys<'a>(
    candidates: &'a [DnskeyRecord],
    anchors: &[TrustAnchorDigest],
    owner_wire: &[u8],
) -> Vec<&'a DnskeyRecord> {
    let mut matched = Vec::new();

    for candidate in candidates {
        let mut hit = false;
        for anchor in anchors {
            match match_anchor(candidate, anchor, owner_wire) {
                Ok(true) => {
                    debug!(
                        key_tag = anchor.key_tag,
                        anchor_id = %anchor.id,
                        "trust anchor matched DNSKEY"
                    );
                    hit = true;
                    break;
                }
                Ok(false) => {}
                Err(e) => {
                    warn!("skipping candidate DNSKEY: {e}");
                    break;
                }
            }
        }
        if hit {
            matched.push(candidate);
        }
    }

    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dnssec::constants::ROOT_OWNER_WIRE;

    // Root KSK-2010 (key tag 19036)
    const KSK_2010_B64: &str = "AwEAAagAIKlVZrpC6Ia7gEzahOR+9W29euxhJhVVLOyQbSEW0O8gcCjF\
                                FVQUTf6v58fLjwBd0YI0EzrAcQqBGCzh/RStIoO8g0NfnfL2MTJRkxoX\
                                bfDaUeVPQuYEhg37NZWAJQ9VnMVDxP/VHL496M/QZxkjf5/Efucp2gaD\
                                X6RS6CXpoY68LsvPVjR0ZSwzz1apAzvN9dlzEheX7ICJBBtuA6G3LQpz\
                                W5hOA2hzCTMjJPJ8LbqF6dsV6DoBQzgul0sGIcGOYl7OyQdXfZ57relS\
                                Qageu+ipAdTTJ25AsRTAoub8ONGcLmqrAmRLKBP1dfwhYB4N7knNnulq\
                                QxA+Uk1ihz0=";

    const KSK_2010_DIGEST: &str =
        "49AAC11D7B6F6446702E54A1607371607A1A41855200FD2CE1CDDE32F24E8FBB";

    fn ksk_2010() -> DnskeyRecord {
        DnskeyRecord::new(257, 3, 8, KSK_2010_B64).unwrap()
    }

    fn anchor_2010() -> TrustAnchorDigest {
        TrustAnchorDigest::new("Kjqmt7v", 19036, 8, 2, KSK_2010_DIGEST).unwrap()
    }

    #[test]
    fn test_published_pair_matches() {
        assert!(match_anchor(&ksk_2010(), &anchor_2010(), ROOT_OWNER_WIRE).unwrap());
        assert_eq!(ksk_2010().key_tag().unwrap(), 19036);
    }

    #[test]
    fn test_flipped_key_byte_does_not_match() {
        use base64::Engine;
        use base64::engine::general_purpose::STANDARD;

        let mut key = STANDARD.decode(ksk_2010().public_key).unwrap();
        for i in 0..key.len() {
            key[i] ^= 0x01;
            let flipped =
                DnskeyRecord::new(257, 3, 8, &STANDARD.encode(&key)).unwrap();
            assert!(!match_anchor(&flipped, &anchor_2010(), ROOT_OWNER_WIRE).unwrap());
            key[i] ^= 0x01;
        }
    }

    #[test]
    fn test_find_matching_keys_empty_candidates() {
        let anchors = [anchor_2010()];
        assert!(find_matching_keys(&[], &anchors, ROOT_OWNER_WIRE).is_empty());
    }

    #[test]
    fn test_find_matching_keys_no_match_is_empty_not_error() {
        let candidates = [DnskeyRecord::new(257, 3, 8, "AwEAAb8z").unwrap()];
        let anchors = [anchor_2010()];
        assert!(find_matching_keys(&candidates, &anchors, ROOT_OWNER_WIRE).is_empty());
    }

    #[test]
    fn test_find_matching_keys_skips_malformed_candidate() {
        let bad = DnskeyRecord::new(257, 3, 8, "////notvalidbase64!!").unwrap();
        let candidates = [bad, ksk_2010()];
        let anchors = [anchor_2010()];
        let matched = find_matching_keys(&candidates, &anchors, ROOT_OWNER_WIRE);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0], &candidates[1]);
    }

    #[test]
    fn test_find_matching_keys_first_match_once_in_order() {
        let zsk = DnskeyRecord::new(256, 3, 8, "AwEAAb8z").unwrap();
        let candidates = [ksk_2010(), zsk, ksk_2010()];
        // Same anchor twice: first-match must stop after the first hit
        let anchors = [anchor_2010(), anchor_2010()];
        let matched = find_matching_keys(&candidates, &anchors, ROOT_OWNER_WIRE);
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0], &candidates[0]);
        assert_eq!(matched[1], &candidates[2]);
    }
}
