use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use rootanchor::dnssec::constants::ROOT_OWNER_WIRE;
use rootanchor::dnssec::{
    DigestType, DnsSecError, DnskeyRecord, TrustAnchorDigest, calculate_key_tag,
    find_matching_keys, match_anchor,
};

// Root KSK-2010 (key tag 19036)
const KSK_2010_B64: &str = "AwEAAagAIKlVZrpC6Ia7gEzahOR+9W29euxhJhVVLOyQbSEW0O8gcCjFFVQUTf6v58fLjwBd0YI0EzrAcQqBGCzh/RStIoO8g0NfnfL2MTJRkxoXbfDaUeVPQuYEhg37NZWAJQ9VnMVDxP/VHL496M/QZxkjf5/Efucp2gaDX6RS6CXpoY68LsvPVjR0ZSwzz1apAzvN9dlzEheX7ICJBBtuA6G3LQpzW5hOA2hzCTMjJPJ8LbqF6dsV6DoBQzgul0sGIcGOYl7OyQdXfZ57relSQageu+ipAdTTJ25AsRTAoub8ONGcLmqrAmRLKBP1dfwhYB4N7knNnulqQxA+Uk1ihz0=";
const KSK_2010_DS_SHA256: &str =
    "49AAC11D7B6F6446702E54A1607371607A1A41855200FD2CE1CDDE32F24E8FBB";

// Root KSK-2017 (key tag 20326)
const KSK_2017_B64: &str = "AwEAAaz/tAm8yTn4Mfeh5eyI96WSVexTBAvkMgJzkKTOiW1vkIbzxeF3+/4RgWOq7HrxRixHlFlExOLAJr5emLvN7SWXgnLh4+B5xQlNVz8Og8kvArMtNROxVQuCaSnIDdD5LKyWbRd2n9WGe2R8PzgCmr3EgVLrjyBxWezF0jLHwVN8efS3rCj/EWgvIWgb9tarpVUDK/b58Da+sqqls3eNbuv7pr+eoZG+SrDK6nWeL3c6H5Apxz7LjVc1uTIdsIXxuOLYA4/ilBmSVIzuDWfdRUfhHdY6+cn8HFRm+2hM8AnXGXws9555KrUB5qihylGa8subX2Nn6UwNR1AkUTV74bU=";
const KSK_2017_DS_SHA256: &str =
    "E06D44B80B8F1D39A95C0B0D7C65D08458E880409BBC683457104237C7F8EC8D";

fn ksk_2010() -> DnskeyRecord {
    DnskeyRecord::new(257, 3, 8, KSK_2010_B64).unwrap()
}

fn ksk_2017() -> DnskeyRecord {
    DnskeyRecord::new(257, 3, 8, KSK_2017_B64).unwrap()
}

#[test]
fn test_published_key_tags() {
    assert_eq!(ksk_2010().key_tag().unwrap(), 19036);
    assert_eq!(ksk_2017().key_tag().unwrap(), 20326);
}

#[test]
fn test_published_ds_digests() {
    let digest = ksk_2010()
        .digest(ROOT_OWNER_WIRE, DigestType::Sha256)
        .unwrap();
    assert_eq!(hex::encode_upper(digest), KSK_2010_DS_SHA256);

    let ds = ksk_2017().ds(ROOT_OWNER_WIRE, DigestType::Sha256).unwrap();
    assert_eq!(ds.key_tag, 20326);
    assert_eq!(ds.digest_hex(), KSK_2017_DS_SHA256);
}

#[test]
fn test_key_tag_is_deterministic() {
    let key = BASE64.decode(KSK_2010_B64).unwrap();
    let first = calculate_key_tag(257, 3, 8, &key);
    for _ in 0..100 {
        assert_eq!(calculate_key_tag(257, 3, 8, &key), first);
    }
}

#[test]
fn test_match_anchor_published_pair() {
    let anchor = TrustAnchorDigest::new("Kjqmt7v", 19036, 8, 2, KSK_2010_DS_SHA256).unwrap();
    assert!(match_anchor(&ksk_2010(), &anchor, ROOT_OWNER_WIRE).unwrap());
    // The 2017 key must not match the 2010 anchor
    assert!(!match_anchor(&ksk_2017(), &anchor, ROOT_OWNER_WIRE).unwrap());
}

#[test]
fn test_match_anchor_rejects_any_flipped_key_byte() {
    let anchor = TrustAnchorDigest::new("Kjqmt7v", 19036, 8, 2, KSK_2010_DS_SHA256).unwrap();
    let mut key = BASE64.decode(KSK_2010_B64).unwrap();
    for i in 0..key.len() {
        key[i] ^= 0x80;
        let flipped = DnskeyRecord::new(257, 3, 8, &BASE64.encode(&key)).unwrap();
        assert!(!match_anchor(&flipped, &anchor, ROOT_OWNER_WIRE).unwrap());
        key[i] ^= 0x80;
    }
}

#[test]
fn test_unsupported_digest_types_are_hard_errors() {
    assert_eq!(
        DigestType::from_u8(0),
        Err(DnsSecError::UnsupportedDigestType(0))
    );
    assert_eq!(
        DigestType::from_u8(3),
        Err(DnsSecError::UnsupportedDigestType(3))
    );
    assert!(TrustAnchorDigest::new("x", 19036, 8, 3, KSK_2010_DS_SHA256).is_err());
}

#[test]
fn test_find_matching_keys_against_both_published_anchors() {
    let anchors = [
        TrustAnchorDigest::new("Kjqmt7v", 19036, 8, 2, KSK_2010_DS_SHA256).unwrap(),
        TrustAnchorDigest::new("Klajeyz", 20326, 8, 2, KSK_2017_DS_SHA256).unwrap(),
    ];
    let zsk = DnskeyRecord::new(256, 3, 8, "AwEAAb8z").unwrap();
    let candidates = [ksk_2017(), zsk, ksk_2010()];

    let matched = find_matching_keys(&candidates, &anchors, ROOT_OWNER_WIRE);
    assert_eq!(matched.len(), 2);
    // Input order is preserved
    assert_eq!(matched[0], &candidates[0]);
    assert_eq!(matched[1], &candidates[2]);
}

#[test]
fn test_find_matching_keys_empty_inputs() {
    let anchors = [TrustAnchorDigest::new("x", 19036, 8, 2, KSK_2010_DS_SHA256).unwrap()];
    assert!(find_matching_keys(&[], &anchors, ROOT_OWNER_WIRE).is_empty());
    assert!(find_matching_keys(&[ksk_2010()], &[], ROOT_OWNER_WIRE).is_empty());
}
