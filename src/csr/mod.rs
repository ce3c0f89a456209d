pub mod der;

use crate::dnssec::{AlgorithmClass, DnsSecAlgorithm, DnskeyRecord, DsRecord, name_to_wire};
use crate::error::{AnchorError, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use der::{DerReader, DerValue, TAG_BIT_STRING, TAG_INTEGER, TAG_OID, TAG_SEQUENCE, TAG_SET};
use tracing::{debug, info};

/// rsaEncryption (1.2.840.113549.1.1.1)
const OID_RSA_ENCRYPTION: &[u8] = &[0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x01];

/// Result of converting a CSR: the owner name taken from the embedded
/// DS hint, the rebuilt DNSKEY, and the DS it was verified against
#[derive(Debug, Clone)]
pub struct ConvertedKey {
    pub owner: String,
    pub dnskey: DnskeyRecord,
    pub ds: DsRecord,
}

/// Convert a DER-encoded PKCS#10 CSR into the DNSKEY record it
/// represents.
///
/// The request's subject must carry an attribute value of the form
/// `<owner> IN DS <rdata>`; the public key is rebuilt as DNSKEY key
/// data and its digest must equal the embedded DS digest.
pub fn convert(csr_der: &[u8]) -> Result<ConvertedKey> {
    let mut outer = DerReader::new(csr_der);
    let mut request = outer.expect(TAG_SEQUENCE)?.reader();

    // CertificationRequestInfo ::= SEQUENCE { version, subject,
    // subjectPKInfo, attributes }
    let mut info = request.expect(TAG_SEQUENCE)?.reader();
    let _version = info.expect(TAG_INTEGER)?;

    let subject = info.expect(TAG_SEQUENCE)?;
    let (owner, expected_ds) = find_embedded_ds(&subject)?;
    debug!(owner = %owner, key_tag = expected_ds.key_tag, "found DS hint in CSR subject");

    let algorithm = DnsSecAlgorithm::from_u8(expected_ds.algorithm)
        .ok_or(crate::dnssec::DnsSecError::UnsupportedAlgorithm(
            expected_ds.algorithm,
        ))?;
    if algorithm.class() != Some(AlgorithmClass::Rsa) {
        return Err(AnchorError::Csr(format!(
            "unsupported DS algorithm family for conversion: {algorithm}"
        )));
    }

    let spki = info.expect(TAG_SEQUENCE)?;
    let (modulus, exponent) = rsa_public_key(&spki)?;
    let key_data = rsa_to_keydata(&modulus, &exponent)?;

    let dnskey = DnskeyRecord::new(257, 3, expected_ds.algorithm, &BASE64.encode(&key_data))?;

    let owner_wire = name_to_wire(&owner)?;
    let computed = dnskey.ds(&owner_wire, expected_ds.digest_type)?;
    if computed != expected_ds {
        return Err(AnchorError::DsMismatch {
            expected: expected_ds.to_string(),
            computed: computed.to_string(),
        });
    }
    info!(owner = %owner, key_tag = computed.key_tag, "CSR public key matches its DS hint");

    Ok(ConvertedKey {
        owner,
        dnskey,
        ds: computed,
    })
}

/// Scan the subject's attribute values for `<owner> IN DS <rdata>`
fn find_embedded_ds(subject: &DerValue) -> Result<(String, DsRecord)> {
    let mut rdns = subject.reader();
    while !rdns.is_empty() {
        let mut rdn = rdns.expect(TAG_SET)?.reader();
        while !rdn.is_empty() {
            let mut attribute = rdn.expect(TAG_SEQUENCE)?.reader();
            let _oid = attribute.expect(TAG_OID)?;
            let value = attribute.read()?;
            if !value.is_string() {
                continue;
            }
            let Ok(text) = std::str::from_utf8(value.value) else {
                continue;
            };
            if let Some(position) = text.find(" IN DS ") {
                let owner = text[..position].to_string();
                let rdata = &text[position + " IN DS ".len()..];
                return Ok((owner, DsRecord::from_rdata_text(rdata)?));
            }
        }
    }
    Err(AnchorError::Csr(
        "no DS record found among the CSR subject attributes".into(),
    ))
}

/// Extract modulus and exponent from an RSA SubjectPublicKeyInfo
fn rsa_public_key(spki: &DerValue) -> Result<(Vec<u8>, Vec<u8>)> {
    let mut spki = spki.reader();

    let mut algorithm = spki.expect(TAG_SEQUENCE)?.reader();
    let oid = algorithm.expect(TAG_OID)?;
    if oid.value != OID_RSA_ENCRYPTION {
        return Err(AnchorError::Csr(
            "CSR public key algorithm is not rsaEncryption".into(),
        ));
    }

    let bits = spki.expect(TAG_BIT_STRING)?;
    let Some((&unused_bits, key_der)) = bits.value.split_first() else {
        return Err(AnchorError::Csr("empty subjectPublicKey".into()));
    };
    if unused_bits != 0 {
        return Err(AnchorError::Csr(
            "subjectPublicKey has unused trailing bits".into(),
        ));
    }

    // RSAPublicKey ::= SEQUENCE { modulus INTEGER, publicExponent INTEGER }
    let mut key = DerReader::new(key_der);
    let mut rsa = key.expect(TAG_SEQUENCE)?.reader();
    let modulus = rsa.expect(TAG_INTEGER)?.as_unsigned_bytes()?.to_vec();
    let exponent = rsa.expect(TAG_INTEGER)?.as_unsigned_bytes()?.to_vec();
    Ok((modulus, exponent))
}

/// Encode an RSA public key as DNSKEY key data (RFC 3110 §2):
/// exponent length prefix, exponent, modulus
pub fn rsa_to_keydata(modulus: &[u8], exponent: &[u8]) -> Result<Vec<u8>> {
    let mut data = Vec::with_capacity(3 + exponent.len() + modulus.len());
    if exponent.len() < 256 {
        data.push(exponent.len() as u8);
    } else if exponent.len() < 65536 {
        data.push(0);
        data.extend_from_slice(&(exponent.len() as u16).to_be_bytes());
    } else {
        return Err(AnchorError::Csr("RSA exponent too large to encode".into()));
    }
    data.extend_from_slice(exponent);
    data.extend_from_slice(modulus);
    Ok(data)
}
