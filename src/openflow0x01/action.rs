use byteorder::{BigEndian, ByteOrder};

use crate::error::{OfpSerializationError, Result};
use crate::openflow0x01::list::{ListItem, OFP_ALIGNMENT};

/// Byte-size of the `type`/`len` prefix every action starts with.
pub const OFP_ACTION_HEADER_SIZE: usize = 4;

/// Smallest action on the wire (`ofp_action_header` with its padding).
pub const OFP_ACTION_MIN_SIZE: usize = 8;

/// An action carried opaquely: its type code plus the complete item bytes, header included.
///
/// Interpreting action bodies is left to an action codec; this type only keeps the bytes
/// intact and accounts for their length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawAction {
    raw: Vec<u8>,
}

impl RawAction {
    /// Wrap the complete wire bytes of one action.
    ///
    /// The `len` field inside `raw` must equal `raw.len()`, which must itself be a
    /// non-zero multiple of 8.
    pub fn from_bytes(raw: Vec<u8>) -> Result<RawAction> {
        if raw.len() < OFP_ACTION_MIN_SIZE || raw.len() % OFP_ALIGNMENT != 0 {
            return Err(OfpSerializationError::InvalidItemLength {
                len: raw.len(),
                min: OFP_ACTION_MIN_SIZE,
            });
        }
        let declared = RawAction::declared_len(&raw);
        if declared != raw.len() {
            return Err(OfpSerializationError::LengthMismatch {
                what: "ofp_action_header.len",
                declared: declared,
                actual: raw.len(),
            });
        }
        Ok(RawAction { raw: raw })
    }

    /// Build an action of type `typ` around `body`, padding it to 8-byte alignment.
    pub fn new(typ: u16, body: &[u8]) -> Result<RawAction> {
        let unpadded = OFP_ACTION_HEADER_SIZE + body.len();
        let len = (unpadded + OFP_ALIGNMENT - 1) / OFP_ALIGNMENT * OFP_ALIGNMENT;
        let len = len.max(OFP_ACTION_MIN_SIZE);
        if len > u16::MAX as usize {
            return Err(OfpSerializationError::InvalidItemLength {
                len: len,
                min: OFP_ACTION_MIN_SIZE,
            });
        }
        let mut raw = vec![0; len];
        BigEndian::write_u16(&mut raw[0..2], typ);
        BigEndian::write_u16(&mut raw[2..4], len as u16);
        raw[OFP_ACTION_HEADER_SIZE..unpadded].copy_from_slice(body);
        Ok(RawAction { raw: raw })
    }

    pub fn type_code(&self) -> u16 {
        BigEndian::read_u16(&self.raw[0..2])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }
}

impl ListItem for RawAction {
    const HEADER_SIZE: usize = OFP_ACTION_HEADER_SIZE;
    const MIN_LEN: usize = OFP_ACTION_MIN_SIZE;
    const NAME: &'static str = "ofp_action";

    fn declared_len(header: &[u8]) -> usize {
        BigEndian::read_u16(&header[2..4]) as usize
    }

    fn parse(item: &[u8]) -> Result<RawAction> {
        RawAction::from_bytes(item.to_vec())
    }

    fn size_of(act: &RawAction) -> usize {
        act.raw.len()
    }

    fn marshal(act: &RawAction, bytes: &mut Vec<u8>) -> Result<()> {
        bytes.extend_from_slice(&act.raw);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_action_is_padded_to_eight_bytes() {
        // OFPAT_OUTPUT to port 1, max_len 0.
        let act = RawAction::new(0, &[0, 1, 0, 0]).unwrap();
        assert_eq!(act.as_bytes(), &[0, 0, 0, 8, 0, 1, 0, 0]);
        assert_eq!(RawAction::size_of(&act), 8);
    }

    #[test]
    fn odd_bodies_round_up() {
        let act = RawAction::new(11, &[0; 9]).unwrap();
        assert_eq!(act.as_bytes().len(), 16);
        assert_eq!(act.type_code(), 11);
        assert_eq!(RawAction::declared_len(act.as_bytes()), 16);
    }

    #[test]
    fn from_bytes_checks_declared_len() {
        assert!(RawAction::from_bytes(vec![0, 0, 0, 8, 0, 1, 0, 0]).is_ok());
        assert!(matches!(RawAction::from_bytes(vec![0, 0, 0, 16, 0, 1, 0, 0]),
                         Err(OfpSerializationError::LengthMismatch { declared: 16, actual: 8, .. })));
        assert!(matches!(RawAction::from_bytes(vec![0, 0, 0, 4]),
                         Err(OfpSerializationError::InvalidItemLength { len: 4, .. })));
    }
}
