use crate::error::{AnchorError, Result};

pub const TAG_INTEGER: u8 = 0x02;
pub const TAG_BIT_STRING: u8 = 0x03;
pub const TAG_OID: u8 = 0x06;
pub const TAG_UTF8_STRING: u8 = 0x0C;
pub const TAG_PRINTABLE_STRING: u8 = 0x13;
pub const TAG_TELETEX_STRING: u8 = 0x14;
pub const TAG_IA5_STRING: u8 = 0x16;
pub const TAG_SEQUENCE: u8 = 0x30;
pub const TAG_SET: u8 = 0x31;

/// One decoded TLV: the tag and its raw contents
#[derive(Debug, Clone, Copy)]
pub struct DerValue<'a> {
    pub tag: u8,
    pub value: &'a [u8],
}

impl<'a> DerValue<'a> {
    /// Read the nested TLVs of a constructed value
    pub fn reader(&self) -> DerReader<'a> {
        DerReader::new(self.value)
    }

    /// True for the directory string types a subject attribute can use
    pub fn is_string(&self) -> bool {
        matches!(
            self.tag,
            TAG_UTF8_STRING | TAG_PRINTABLE_STRING | TAG_TELETEX_STRING | TAG_IA5_STRING
        )
    }

    /// Contents of an INTEGER as unsigned big-endian bytes with the
    /// sign padding stripped
    pub fn as_unsigned_bytes(&self) -> Result<&'a [u8]> {
        if self.tag != TAG_INTEGER {
            return Err(AnchorError::Csr(format!(
                "expected INTEGER, found tag {:#04x}",
                self.tag
            )));
        }
        let mut bytes = self.value;
        while bytes.len() > 1 && bytes[0] == 0 {
            bytes = &bytes[1..];
        }
        Ok(bytes)
    }
}

/// Minimal DER reader: walks a TLV stream, enough to traverse a
/// PKCS#10 certification request
#[derive(Debug)]
pub struct DerReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> DerReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn byte(&mut self) -> Result<u8> {
        let b = *self
            .data
            .get(self.pos)
            .ok_or_else(|| AnchorError::Csr("truncated DER input".into()))?;
        self.pos += 1;
        Ok(b)
    }

    /// Decode the next TLV
    pub fn read(&mut self) -> Result<DerValue<'a>> {
        let tag = self.byte()?;
        let first = self.byte()?;

        let length = if first & 0x80 == 0 {
            first as usize
        } else {
            let count = (first & 0x7F) as usize;
            if count == 0 || count > 4 {
                return Err(AnchorError::Csr(
                    "indefinite or oversized DER length".into(),
                ));
            }
            let mut length = 0usize;
            for _ in 0..count {
                length = (length << 8) | self.byte()? as usize;
            }
            length
        };

        let end = self
            .pos
            .checked_add(length)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| AnchorError::Csr("DER length exceeds input".into()))?;

        let value = &self.data[self.pos..end];
        self.pos = end;
        Ok(DerValue { tag, value })
    }

    /// Decode the next TLV and require a specific tag
    pub fn expect(&mut self, tag: u8) -> Result<DerValue<'a>> {
        let value = self.read()?;
        if value.tag != tag {
            return Err(AnchorError::Csr(format!(
                "expected DER tag {:#04x}, found {:#04x}",
                tag, value.tag
            )));
        }
        Ok(value)
    }
}
