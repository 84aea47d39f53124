//! Queue configuration: OFPT_QUEUE_GET_CONFIG_REQUEST / _REPLY bodies and the packet queue
//! and queue property lists they carry.

use std::io::{BufRead, Cursor};

use byteorder::{BigEndian, ByteOrder, ReadBytesExt, WriteBytesExt};

use crate::error::{OfpSerializationError, Result};
use crate::ofp_utils::{take_exact, write_padding_bytes};
use crate::openflow0x01::layout::*;
use crate::openflow0x01::list::{marshal_list, parse_list, BoundedList, ListItem, OFP_ALIGNMENT};
use crate::openflow0x01::validate::{self, Validate};
use crate::openflow0x01::MessageType;

/// No property defined for queue.
pub const OFPQT_NONE: u16 = 0;
/// Minimum datarate guaranteed.
pub const OFPQT_MIN_RATE: u16 = 1;

/// Largest min rate that is actually configured, in tenths of a percent.
pub const OFPQ_MIN_RATE_MAX: u16 = 1000;

/// Common header of every queue property.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct QueuePropHeader {
    /// One of OFPQT_*.
    pub property: u16,
    /// Length of the property, header included.
    pub len: u16,
}

impl Validate for QueuePropHeader {}

impl FixedLayout for QueuePropHeader {
    const SIZE: usize = QUEUE_PROP_HEADER_SIZE;
    const NAME: &'static str = "ofp_queue_prop_header";

    fn read(bytes: &mut Cursor<&[u8]>) -> Result<QueuePropHeader> {
        let property = bytes.read_u16::<BigEndian>()?;
        let len = bytes.read_u16::<BigEndian>()?;
        bytes.consume(4);
        Ok(QueuePropHeader {
            property: property,
            len: len,
        })
    }

    fn write(&self, bytes: &mut Vec<u8>) -> Result<()> {
        bytes.write_u16::<BigEndian>(self.property)?;
        bytes.write_u16::<BigEndian>(self.len)?;
        write_padding_bytes(bytes, 4);
        Ok(())
    }
}

/// A queue property.
///
/// Property types this codec does not know are kept byte-for-byte in `Unknown`, so that a
/// reply can be relayed without losing properties defined by later protocol revisions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueueProperty {
    /// Guaranteed minimum rate in tenths of a percent; above 1000 the property is disabled.
    MinRate { rate: u16 },
    /// Any other property: its tag and the complete item bytes, header included. The tag
    /// and `len` inside `raw` must agree with `property` and `raw.len()`.
    Unknown { property: u16, raw: Vec<u8> },
}

impl QueueProperty {
    pub fn min_rate(rate: u16) -> QueueProperty {
        QueueProperty::MinRate { rate: rate }
    }

    /// Build a property of a type this codec does not interpret, padding `body` to 8-byte
    /// alignment.
    pub fn unknown(property: u16, body: &[u8]) -> Result<QueueProperty> {
        let unpadded = QUEUE_PROP_HEADER_SIZE + body.len();
        let len = (unpadded + OFP_ALIGNMENT - 1) / OFP_ALIGNMENT * OFP_ALIGNMENT;
        let mut raw = Vec::with_capacity(len);
        raw.write_u16::<BigEndian>(property)?;
        raw.write_u16::<BigEndian>(len.min(u16::MAX as usize) as u16)?;
        write_padding_bytes(&mut raw, 4);
        raw.extend_from_slice(body);
        write_padding_bytes(&mut raw, len - unpadded);
        let prop = QueueProperty::Unknown {
            property: property,
            raw: raw,
        };
        prop.validate()?;
        Ok(prop)
    }

    /// The property tag.
    pub fn property(&self) -> u16 {
        match *self {
            QueueProperty::MinRate { .. } => OFPQT_MIN_RATE,
            QueueProperty::Unknown { property, .. } => property,
        }
    }

    /// The min rate when it is configured. `None` for other properties and for rates above
    /// 1000, `OFPQ_MIN_RATE_UNCFG` included.
    pub fn configured_rate(&self) -> Option<u16> {
        match *self {
            QueueProperty::MinRate { rate } => validate::min_rate_configured(rate),
            QueueProperty::Unknown { .. } => None,
        }
    }
}

impl Validate for QueueProperty {
    fn validate(&self) -> Result<()> {
        match *self {
            QueueProperty::MinRate { .. } => Ok(()),
            QueueProperty::Unknown { property, ref raw } => {
                if property == OFPQT_MIN_RATE {
                    return Err(OfpSerializationError::InvalidProperty { property: property });
                }
                if raw.len() < QUEUE_PROP_HEADER_SIZE || raw.len() % OFP_ALIGNMENT != 0 ||
                   raw.len() > u16::MAX as usize {
                    return Err(OfpSerializationError::InvalidItemLength {
                        len: raw.len(),
                        min: QUEUE_PROP_HEADER_SIZE,
                    });
                }
                let tag = BigEndian::read_u16(&raw[0..2]);
                if tag != property {
                    return Err(OfpSerializationError::InvalidProperty { property: tag });
                }
                let len = BigEndian::read_u16(&raw[2..4]) as usize;
                if len != raw.len() {
                    return Err(OfpSerializationError::LengthMismatch {
                        what: "ofp_queue_prop_header.len",
                        declared: len,
                        actual: raw.len(),
                    });
                }
                Ok(())
            }
        }
    }
}

impl ListItem for QueueProperty {
    const HEADER_SIZE: usize = 4;
    const MIN_LEN: usize = QUEUE_PROP_HEADER_SIZE;
    const NAME: &'static str = "ofp_queue_prop";

    fn declared_len(header: &[u8]) -> usize {
        BigEndian::read_u16(&header[2..4]) as usize
    }

    fn parse(item: &[u8]) -> Result<QueueProperty> {
        let (header, _): (QueuePropHeader, usize) = decode_fixed(item, 0)?;
        match header.property {
            OFPQT_MIN_RATE => {
                let len = header.len as usize;
                if len != QUEUE_PROP_MIN_RATE_SIZE || len != item.len() {
                    return Err(OfpSerializationError::LengthMismatch {
                        what: "ofp_queue_prop_min_rate.len",
                        declared: len,
                        actual: QUEUE_PROP_MIN_RATE_SIZE,
                    });
                }
                let rate = BigEndian::read_u16(&item[QUEUE_PROP_HEADER_SIZE..]);
                Ok(QueueProperty::MinRate { rate: rate })
            }
            property => {
                let prop = QueueProperty::Unknown {
                    property: property,
                    raw: item.to_vec(),
                };
                prop.validate()?;
                Ok(prop)
            }
        }
    }

    fn size_of(prop: &QueueProperty) -> usize {
        match *prop {
            QueueProperty::MinRate { .. } => QUEUE_PROP_MIN_RATE_SIZE,
            QueueProperty::Unknown { ref raw, .. } => raw.len(),
        }
    }

    /// An `Unknown` item is written back exactly as carried, once its bytes are known to
    /// decode to the same value.
    fn marshal(prop: &QueueProperty, bytes: &mut Vec<u8>) -> Result<()> {
        prop.validate()?;
        match *prop {
            QueueProperty::MinRate { rate } => {
                let header = QueuePropHeader {
                    property: OFPQT_MIN_RATE,
                    len: QUEUE_PROP_MIN_RATE_SIZE as u16,
                };
                encode_fixed(&header, bytes)?;
                bytes.write_u16::<BigEndian>(rate)?;
                write_padding_bytes(bytes, 6);
            }
            QueueProperty::Unknown { ref raw, .. } => bytes.extend_from_slice(raw),
        }
        Ok(())
    }
}

/// Full description of one queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PacketQueue {
    pub queue_id: u32,
    pub properties: BoundedList<QueueProperty>,
}

impl PacketQueue {
    pub fn new(queue_id: u32, properties: Vec<QueueProperty>) -> PacketQueue {
        PacketQueue {
            queue_id: queue_id,
            properties: BoundedList::new(properties),
        }
    }

    /// Length of the queue description, header included.
    pub fn len(&self) -> usize {
        PACKET_QUEUE_SIZE + self.properties.byte_len()
    }
}

impl ListItem for PacketQueue {
    const HEADER_SIZE: usize = PACKET_QUEUE_SIZE;
    const MIN_LEN: usize = PACKET_QUEUE_SIZE;
    const NAME: &'static str = "ofp_packet_queue";

    fn declared_len(header: &[u8]) -> usize {
        BigEndian::read_u16(&header[4..6]) as usize
    }

    fn parse(item: &[u8]) -> Result<PacketQueue> {
        let mut bytes = Cursor::new(take_exact(item, 0, PACKET_QUEUE_SIZE)?);
        let queue_id = bytes.read_u32::<BigEndian>()?;
        let len = bytes.read_u16::<BigEndian>()? as usize;
        if len != item.len() {
            return Err(OfpSerializationError::LengthMismatch {
                what: "ofp_packet_queue.len",
                declared: len,
                actual: item.len(),
            });
        }
        let properties = parse_list(item, PACKET_QUEUE_SIZE, len - PACKET_QUEUE_SIZE)?;
        Ok(PacketQueue {
            queue_id: queue_id,
            properties: properties,
        })
    }

    fn size_of(pq: &PacketQueue) -> usize {
        pq.len()
    }

    fn marshal(pq: &PacketQueue, bytes: &mut Vec<u8>) -> Result<()> {
        let len = pq.len();
        if len > u16::MAX as usize {
            return Err(OfpSerializationError::LengthMismatch {
                what: "ofp_packet_queue.len",
                declared: u16::MAX as usize,
                actual: len,
            });
        }
        bytes.write_u32::<BigEndian>(pq.queue_id)?;
        bytes.write_u16::<BigEndian>(len as u16)?;
        write_padding_bytes(bytes, 2);
        marshal_list(&pq.properties, bytes)?;
        Ok(())
    }
}

/// Query for the queue configuration of a port.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct QueueGetConfigRequest {
    /// A physical port, below `OFPP_MAX`.
    pub port: u16,
}

impl Validate for QueueGetConfigRequest {
    fn validate(&self) -> Result<()> {
        validate::check_physical_port(self.port)
    }
}

impl MessageType for QueueGetConfigRequest {
    fn size_of(_: &QueueGetConfigRequest) -> usize {
        4
    }

    fn parse(buf: &[u8]) -> Result<QueueGetConfigRequest> {
        if buf.len() > 4 {
            return Err(OfpSerializationError::LengthMismatch {
                what: "ofp_queue_get_config_request",
                declared: buf.len(),
                actual: 4,
            });
        }
        let mut bytes = Cursor::new(take_exact(buf, 0, 4)?);
        let port = bytes.read_u16::<BigEndian>()?;
        let req = QueueGetConfigRequest { port: port };
        req.validate()?;
        Ok(req)
    }

    fn marshal(req: &QueueGetConfigRequest, bytes: &mut Vec<u8>) -> Result<()> {
        req.validate()?;
        bytes.write_u16::<BigEndian>(req.port)?;
        write_padding_bytes(bytes, 2);
        Ok(())
    }
}

/// Queue configuration of a port. The queue list runs to the end of the message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueueGetConfigReply {
    pub port: u16,
    pub queues: BoundedList<PacketQueue>,
}

impl QueueGetConfigReply {
    pub fn new(port: u16, queues: Vec<PacketQueue>) -> QueueGetConfigReply {
        QueueGetConfigReply {
            port: port,
            queues: BoundedList::new(queues),
        }
    }
}

impl Validate for QueueGetConfigReply {
    fn validate(&self) -> Result<()> {
        validate::check_physical_port(self.port)
    }
}

impl MessageType for QueueGetConfigReply {
    fn size_of(reply: &QueueGetConfigReply) -> usize {
        8 + reply.queues.byte_len()
    }

    /// `buf` is the message body as bounded by the envelope; every byte after the fixed
    /// part belongs to the queue list.
    fn parse(buf: &[u8]) -> Result<QueueGetConfigReply> {
        let mut bytes = Cursor::new(take_exact(buf, 0, 8)?);
        let port = bytes.read_u16::<BigEndian>()?;
        let queues = parse_list(buf, 8, buf.len() - 8)?;
        let reply = QueueGetConfigReply {
            port: port,
            queues: queues,
        };
        reply.validate()?;
        Ok(reply)
    }

    fn marshal(reply: &QueueGetConfigReply, bytes: &mut Vec<u8>) -> Result<()> {
        reply.validate()?;
        bytes.write_u16::<BigEndian>(reply.port)?;
        write_padding_bytes(bytes, 6);
        marshal_list(&reply.queues, bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openflow0x01::{OFPP_MAX, OFPQ_MIN_RATE_UNCFG};

    fn marshal_queue(pq: &PacketQueue) -> Vec<u8> {
        let mut bytes = vec![];
        PacketQueue::marshal(pq, &mut bytes).unwrap();
        bytes
    }

    #[test]
    fn min_rate_wire_form() {
        let bytes = marshal_queue(&PacketQueue::new(7, vec![QueueProperty::min_rate(500)]));
        assert_eq!(bytes,
                   [0, 0, 0, 7, 0, 24, 0, 0,
                    0, 1, 0, 16, 0, 0, 0, 0,
                    0x01, 0xf4, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn unknown_property_is_carried_verbatim() {
        let mut bytes = vec![0, 0, 0, 1, 0, 32, 0, 0];
        bytes.extend_from_slice(&[0, 1, 0, 16, 0, 0, 0, 0, 0, 100, 0, 0, 0, 0, 0, 0]);
        bytes.extend_from_slice(&[0, 99, 0, 8, 0xde, 0xad, 0xbe, 0xef]);
        let pq = PacketQueue::parse(&bytes).unwrap();
        assert_eq!(pq.queue_id, 1);
        assert_eq!(pq.properties.len(), 2);
        assert_eq!(pq.properties.items()[0], QueueProperty::MinRate { rate: 100 });
        match pq.properties.items()[1] {
            QueueProperty::Unknown { property, ref raw } => {
                assert_eq!(property, 99);
                assert_eq!(raw.as_slice(), &bytes[24..32]);
            }
            ref other => panic!("unexpected {:?}", other),
        }
        assert_eq!(marshal_queue(&pq), bytes);
    }

    #[test]
    fn min_rate_must_be_sixteen_bytes() {
        let mut bytes = vec![0, 0, 0, 1, 0, 32, 0, 0];
        bytes.extend_from_slice(&[0, 1, 0, 24]);
        bytes.extend_from_slice(&[0; 20]);
        assert!(matches!(PacketQueue::parse(&bytes),
                         Err(OfpSerializationError::LengthMismatch { declared: 24, actual: 16, .. })));
    }

    #[test]
    fn queue_len_must_match_its_properties() {
        let mut bytes = marshal_queue(&PacketQueue::new(3, vec![QueueProperty::min_rate(10)]));
        bytes.extend_from_slice(&[0; 8]);
        // The queue claims 32 bytes but holds 16 bytes of properties plus 8 zero bytes.
        BigEndian::write_u16(&mut bytes[4..6], 32);
        assert!(matches!(PacketQueue::parse(&bytes),
                         Err(OfpSerializationError::InvalidItemLength { len: 0, .. })));
        BigEndian::write_u16(&mut bytes[4..6], 24);
        assert!(matches!(PacketQueue::parse(&bytes),
                         Err(OfpSerializationError::LengthMismatch { declared: 24, actual: 32, .. })));
    }

    #[test]
    fn unconfigured_rate_round_trips() {
        let pq = PacketQueue::new(1, vec![QueueProperty::min_rate(OFPQ_MIN_RATE_UNCFG),
                                          QueueProperty::min_rate(1001)]);
        let parsed = PacketQueue::parse(&marshal_queue(&pq)).unwrap();
        assert_eq!(parsed, pq);
        assert!(parsed.properties.iter().all(|p| p.configured_rate().is_none()));
        assert_eq!(QueueProperty::min_rate(1000).configured_rate(), Some(1000));
    }

    #[test]
    fn unknown_property_must_match_its_own_bytes() {
        let raw = vec![0, 42, 0, 16, 0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7, 8];
        let prop = QueueProperty::Unknown {
            property: 42,
            raw: raw.clone(),
        };
        let mut bytes = vec![];
        QueueProperty::marshal(&prop, &mut bytes).unwrap();
        assert_eq!(bytes, raw);

        let stale = QueueProperty::Unknown {
            property: 42,
            raw: vec![0xff, 0xff, 0xff, 0xff, 0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7, 8],
        };
        assert!(matches!(QueueProperty::marshal(&stale, &mut vec![]),
                         Err(OfpSerializationError::InvalidProperty { property: 0xffff })));

        let zeroed = QueueProperty::Unknown {
            property: 99,
            raw: vec![0; 8],
        };
        assert!(matches!(QueueProperty::marshal(&zeroed, &mut vec![]),
                         Err(OfpSerializationError::InvalidProperty { property: 0 })));

        let wrong_len = QueueProperty::Unknown {
            property: 99,
            raw: vec![0, 99, 0, 16, 0, 0, 0, 0],
        };
        assert!(matches!(QueueProperty::marshal(&wrong_len, &mut vec![]),
                         Err(OfpSerializationError::LengthMismatch { declared: 16, actual: 8, .. })));

        let short = QueueProperty::Unknown {
            property: 42,
            raw: vec![0; 12],
        };
        assert!(matches!(QueueProperty::marshal(&short, &mut vec![]),
                         Err(OfpSerializationError::InvalidItemLength { len: 12, .. })));
    }

    #[test]
    fn min_rate_tag_is_never_opaque() {
        let prop = QueueProperty::Unknown {
            property: OFPQT_MIN_RATE,
            raw: vec![0, 1, 0, 16, 0, 0, 0, 0, 0, 5, 0, 0, 0, 0, 0, 0],
        };
        assert!(matches!(QueueProperty::marshal(&prop, &mut vec![]),
                         Err(OfpSerializationError::InvalidProperty { property: OFPQT_MIN_RATE })));
        assert!(matches!(QueueProperty::unknown(OFPQT_MIN_RATE, &[]),
                         Err(OfpSerializationError::InvalidProperty { property: OFPQT_MIN_RATE })));
    }

    #[test]
    fn unknown_constructor_pads_body() {
        let prop = QueueProperty::unknown(OFPQT_NONE, &[0xaa, 0xbb, 0xcc]).unwrap();
        let mut bytes = vec![];
        QueueProperty::marshal(&prop, &mut bytes).unwrap();
        assert_eq!(bytes,
                   [0, 0, 0, 16, 0, 0, 0, 0,
                    0xaa, 0xbb, 0xcc, 0, 0, 0, 0, 0]);
        let pq = PacketQueue::new(2, vec![prop.clone()]);
        assert_eq!(PacketQueue::parse(&marshal_queue(&pq)).unwrap(), pq);
        assert_eq!(QueueProperty::unknown(7, &[]).unwrap(),
                   QueueProperty::Unknown { property: 7, raw: vec![0, 7, 0, 8, 0, 0, 0, 0] });
    }

    #[test]
    fn config_request_port_range() {
        let mut bytes = vec![];
        QueueGetConfigRequest::marshal(&QueueGetConfigRequest { port: 1 }, &mut bytes).unwrap();
        assert_eq!(bytes, [0, 1, 0, 0]);
        assert_eq!(QueueGetConfigRequest::parse(&bytes).unwrap().port, 1);
        assert!(matches!(QueueGetConfigRequest::marshal(&QueueGetConfigRequest { port: OFPP_MAX },
                                                        &mut vec![]),
                         Err(OfpSerializationError::InvalidPort { port: 0xff00 })));
        assert!(matches!(QueueGetConfigRequest::parse(&[0xff, 0xfe, 0, 0]),
                         Err(OfpSerializationError::InvalidPort { port: 0xfffe })));
    }

    #[test]
    fn config_reply_walks_nested_lists() {
        let reply = QueueGetConfigReply::new(2,
                                             vec![PacketQueue::new(1, vec![]),
                                                  PacketQueue::new(2,
                                                                   vec![QueueProperty::min_rate(300)]),
                                                  PacketQueue::new(3,
                                                                   vec![QueueProperty::Unknown {
                                                                            property: 7,
                                                                            raw: vec![0, 7, 0, 8, 0, 0, 0, 0],
                                                                        }])]);
        let mut bytes = vec![];
        QueueGetConfigReply::marshal(&reply, &mut bytes).unwrap();
        assert_eq!(bytes.len(), QueueGetConfigReply::size_of(&reply));
        assert_eq!(bytes.len(), 8 + 8 + 24 + 16);
        let parsed = QueueGetConfigReply::parse(&bytes).unwrap();
        assert_eq!(parsed, reply);
        assert_eq!(parsed.queues.byte_len(), 48);

        // Cutting the envelope short leaves the last queue unfinished.
        assert!(matches!(QueueGetConfigReply::parse(&bytes[..bytes.len() - 8]),
                         Err(OfpSerializationError::LengthMismatch { .. })));
    }
}
