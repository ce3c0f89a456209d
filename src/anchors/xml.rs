use super::TrustAnchorFile;
use crate::dnssec::TrustAnchorDigest;
use crate::error::{AnchorError, Result};
use chrono::{DateTime, FixedOffset};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

/// Accumulates one KeyDigest element while its children stream past
#[derive(Debug, Default)]
struct KeyDigestBuilder {
    id: String,
    valid_from: Option<DateTime<FixedOffset>>,
    valid_until: Option<DateTime<FixedOffset>>,
    key_tag: Option<String>,
    algorithm: Option<String>,
    digest_type: Option<String>,
    digest: Option<String>,
}

impl KeyDigestBuilder {
    fn from_attributes(start: &BytesStart) -> Result<Self> {
        let mut builder = Self::default();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| AnchorError::AnchorXml(e.to_string()))?;
            let value = attr
                .unescape_value()
                .map_err(|e| AnchorError::AnchorXml(e.to_string()))?;
            match attr.key.as_ref() {
                b"id" => builder.id = value.into_owned(),
                b"validFrom" => builder.valid_from = Some(parse_timestamp(&value)?),
                b"validUntil" => builder.valid_until = Some(parse_timestamp(&value)?),
                _ => {}
            }
        }
        Ok(builder)
    }

    fn set_child(&mut self, name: &[u8], text: String) {
        match name {
            b"KeyTag" => self.key_tag = Some(text),
            b"Algorithm" => self.algorithm = Some(text),
            b"DigestType" => self.digest_type = Some(text),
            b"Digest" => self.digest = Some(text),
            _ => {}
        }
    }

    fn build(self) -> Result<TrustAnchorDigest> {
        let key_tag = required(self.key_tag, "KeyTag")?
            .parse::<u16>()
            .map_err(|e| AnchorError::AnchorXml(format!("bad KeyTag: {e}")))?;
        let algorithm = required(self.algorithm, "Algorithm")?
            .parse::<u8>()
            .map_err(|e| AnchorError::AnchorXml(format!("bad Algorithm: {e}")))?;
        let digest_type = required(self.digest_type, "DigestType")?
            .parse::<u8>()
            .map_err(|e| AnchorError::AnchorXml(format!("bad DigestType: {e}")))?;
        let digest = required(self.digest, "Digest")?;

        let mut anchor = TrustAnchorDigest::new(self.id, key_tag, algorithm, digest_type, digest)?;
        anchor.valid_from = self.valid_from;
        anchor.valid_until = self.valid_until;
        Ok(anchor)
    }
}

fn required(field: Option<String>, name: &str) -> Result<String> {
    field.ok_or_else(|| AnchorError::AnchorXml(format!("KeyDigest is missing a {name} element")))
}

fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value)
        .map_err(|e| AnchorError::AnchorXml(format!("bad timestamp '{value}': {e}")))
}

/// Parse IANA's root-anchors.xml into its zone and KeyDigest entries.
///
/// A document with no KeyDigest elements, a missing required child, or
/// an unsupported digest type fails the whole parse.
pub fn parse_root_anchors(xml: &str) -> Result<TrustAnchorFile> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut zone = String::new();
    let mut digests = Vec::new();
    let mut current: Option<KeyDigestBuilder> = None;
    let mut in_zone = false;
    let mut child: Option<Vec<u8>> = None;

    loop {
        match reader
            .read_event()
            .map_err(|e| AnchorError::AnchorXml(e.to_string()))?
        {
            Event::Start(start) => match start.name().as_ref() {
                b"Zone" => in_zone = true,
                b"KeyDigest" => current = Some(KeyDigestBuilder::from_attributes(&start)?),
                name if current.is_some() => child = Some(name.to_vec()),
                _ => {}
            },
            Event::Empty(start) if start.name().as_ref() == b"KeyDigest" => {
                return Err(AnchorError::AnchorXml(
                    "KeyDigest element has no children".into(),
                ));
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| AnchorError::AnchorXml(e.to_string()))?
                    .into_owned();
                if in_zone {
                    zone = text;
                } else if let (Some(builder), Some(name)) = (current.as_mut(), child.as_ref()) {
                    builder.set_child(name, text);
                }
            }
            Event::End(end) => match end.name().as_ref() {
                b"Zone" => in_zone = false,
                b"KeyDigest" => {
                    let builder = current.take().ok_or_else(|| {
                        AnchorError::AnchorXml("unexpected KeyDigest close tag".into())
                    })?;
                    digests.push(builder.build()?);
                }
                _ => child = None,
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if zone.is_empty() {
        return Err(AnchorError::AnchorXml("missing Zone element".into()));
    }
    if digests.is_empty() {
        return Err(AnchorError::NoAnchors);
    }

    debug!(zone = %zone, count = digests.len(), "parsed trust anchor file");
    Ok(TrustAnchorFile { zone, digests })
}
