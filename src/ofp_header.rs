use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{OfpSerializationError, Result};
use crate::ofp_utils::take_exact;
use crate::openflow0x01::MsgCode;

/// OpenFlow protocol version 1.0.
pub const OFP_VERSION: u8 = 0x01;

/// Byte-size of an `OfpHeader` on the wire.
pub const OFP_HEADER_SIZE: usize = 8;

/// OpenFlow Header
///
/// The first fields of every OpenFlow message, no matter the protocol version.
/// This is parsed to determine version and length of the remaining message, so that
/// it can be properly handled. Its `length` field is the envelope that bounds every
/// trailing list carried by the message body.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OfpHeader {
    version: u8,
    typ: u8,
    length: u16,
    xid: u32,
}

impl OfpHeader {
    /// Create an `OfpHeader` out of the arguments.
    pub fn new(version: u8, typ: u8, length: u16, xid: u32) -> OfpHeader {
        OfpHeader {
            version: version,
            typ: typ,
            length: length,
            xid: xid,
        }
    }

    /// Return the byte-size of an `OfpHeader`.
    pub fn size() -> usize {
        OFP_HEADER_SIZE
    }

    /// Fills a message buffer with the header fields of an `OfpHeader`.
    pub fn marshal(bytes: &mut Vec<u8>, header: OfpHeader) -> Result<()> {
        bytes.write_u8(header.version())?;
        bytes.write_u8(header.typ)?;
        bytes.write_u16::<BigEndian>(header.length)?;
        bytes.write_u32::<BigEndian>(header.xid())?;
        Ok(())
    }

    /// Parse the leading 8 bytes of `buf` as an `OfpHeader`.
    ///
    /// Only OpenFlow 1.0 headers are accepted, and the declared length must at least
    /// cover the header itself.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        let mut bytes = Cursor::new(take_exact(buf, 0, OFP_HEADER_SIZE)?);
        let header = OfpHeader {
            version: bytes.read_u8()?,
            typ: bytes.read_u8()?,
            length: bytes.read_u16::<BigEndian>()?,
            xid: bytes.read_u32::<BigEndian>()?,
        };
        if header.version != OFP_VERSION {
            return Err(OfpSerializationError::UnsupportedVersion { version: header.version });
        }
        if header.length() < OFP_HEADER_SIZE {
            return Err(OfpSerializationError::LengthMismatch {
                what: "ofp_header.length",
                declared: header.length(),
                actual: OFP_HEADER_SIZE,
            });
        }
        Ok(header)
    }

    /// Return the `version` field of a header.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Return the OpenFlow message type code of a header.
    pub fn type_code(&self) -> Result<MsgCode> {
        MsgCode::from_u8(self.typ)
    }

    /// Return the `length` field of a header. Includes the length of the header itself.
    pub fn length(&self) -> usize {
        self.length as usize
    }

    /// Return the number of body bytes following the header.
    pub fn body_length(&self) -> usize {
        self.length().saturating_sub(OFP_HEADER_SIZE)
    }

    /// Return the `xid` field of a header, the transaction id associated with this packet.
    ///  Replies use the same id to facilitate pairing.
    pub fn xid(&self) -> u32 {
        self.xid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_round_trip() {
        let mut bytes = vec![];
        OfpHeader::marshal(&mut bytes, OfpHeader::new(OFP_VERSION, 21, 16, 0xdeadbeef)).unwrap();
        assert_eq!(bytes, [0x01, 21, 0x00, 0x10, 0xde, 0xad, 0xbe, 0xef]);
        let header = OfpHeader::parse(&bytes).unwrap();
        assert_eq!(header.xid(), 0xdeadbeef);
        assert_eq!(header.length(), 16);
        assert_eq!(header.body_length(), 8);
        assert!(matches!(header.type_code(), Ok(MsgCode::QueueGetConfigResp)));
    }

    #[test]
    fn header_rejects_other_versions() {
        let bytes = [0x04, 0, 0, 8, 0, 0, 0, 1];
        assert!(matches!(OfpHeader::parse(&bytes),
                         Err(OfpSerializationError::UnsupportedVersion { version: 0x04 })));
    }

    #[test]
    fn header_rejects_length_below_header_size() {
        let bytes = [0x01, 0, 0, 4, 0, 0, 0, 1];
        assert!(matches!(OfpHeader::parse(&bytes),
                         Err(OfpSerializationError::LengthMismatch { declared: 4, .. })));
    }

    #[test]
    fn header_needs_eight_bytes() {
        assert!(matches!(OfpHeader::parse(&[0x01, 0, 0]),
                         Err(OfpSerializationError::BufferTooShort { expected: 8, actual: 3 })));
    }
}
