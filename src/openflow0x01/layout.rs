//! Fixed-size, fixed-offset records in network byte order.
//!
//! Each record kind has a documented wire size (the `*_SIZE` constants) and a packed
//! layout descriptor in `wire` that spells out its fields. `validate::check_struct_sizes`
//! holds both against what the marshaling code actually emits.

use std::io::Cursor;
use std::mem::size_of;

use crate::error::{OfpSerializationError, Result};
use crate::ofp_utils::take_exact;
use crate::openflow0x01::validate::Validate;

pub const OFP_MATCH_SIZE: usize = 40;
pub const FLOW_STATS_SIZE: usize = 88;
pub const FLOW_STATS_REQUEST_SIZE: usize = 44;
pub const AGGREGATE_STATS_REQUEST_SIZE: usize = 44;
pub const AGGREGATE_STATS_REPLY_SIZE: usize = 24;
pub const TABLE_STATS_SIZE: usize = 64;
pub const PORT_STATS_REQUEST_SIZE: usize = 8;
pub const PORT_STATS_SIZE: usize = 104;
pub const VENDOR_HEADER_SIZE: usize = 12;
pub const QUEUE_PROP_HEADER_SIZE: usize = 8;
pub const QUEUE_PROP_MIN_RATE_SIZE: usize = 16;
pub const PACKET_QUEUE_SIZE: usize = 8;
pub const QUEUE_GET_CONFIG_REQUEST_SIZE: usize = 12;
pub const QUEUE_GET_CONFIG_REPLY_SIZE: usize = 16;
pub const QUEUE_STATS_REQUEST_SIZE: usize = 8;
pub const QUEUE_STATS_SIZE: usize = 32;
pub const DESC_STATS_SIZE: usize = 1056;
/// `type` and `flags` leading every stats request and reply body.
pub const STATS_HEADER_SIZE: usize = 4;

/// Packed field-by-field descriptions of the wire records.
#[allow(dead_code)]
pub(crate) mod wire {
    #[repr(packed)]
    pub struct OfpHeader(u8, u8, u16, u32);

    #[repr(packed)]
    pub struct OfpMatch(u32, u16, [u8; 6], [u8; 6], u16, u8, u8, u16, u8, u8, u16, u32, u32,
                        u16, u16);

    #[repr(packed)]
    pub struct OfpFlowStats(u16, u8, u8, OfpMatch, u32, u32, u16, u16, u16, [u8; 6], u64, u64,
                            u64);

    #[repr(packed)]
    pub struct OfpFlowStatsRequest(OfpMatch, u8, u8, u16);

    #[repr(packed)]
    pub struct OfpAggregateStatsRequest(OfpMatch, u8, u8, u16);

    #[repr(packed)]
    pub struct OfpAggregateStatsReply(u64, u64, u32, [u8; 4]);

    #[repr(packed)]
    pub struct OfpTableStats(u8, [u8; 3], [u8; super::super::OFP_MAX_TABLE_NAME_LEN], u32, u32,
                             u32, u64, u64);

    #[repr(packed)]
    pub struct OfpPortStatsRequest(u16, [u8; 6]);

    #[repr(packed)]
    pub struct OfpPortStats(u16, [u8; 6], [u64; 12]);

    #[repr(packed)]
    pub struct OfpVendorHeader(OfpHeader, u32);

    #[repr(packed)]
    pub struct OfpQueuePropHeader(u16, u16, [u8; 4]);

    #[repr(packed)]
    pub struct OfpQueuePropMinRate(OfpQueuePropHeader, u16, [u8; 6]);

    #[repr(packed)]
    pub struct OfpPacketQueue(u32, u16, [u8; 2]);

    #[repr(packed)]
    pub struct OfpQueueGetConfigRequest(OfpHeader, u16, [u8; 2]);

    #[repr(packed)]
    pub struct OfpQueueGetConfigReply(OfpHeader, u16, [u8; 6]);

    #[repr(packed)]
    pub struct OfpQueueStatsRequest(u16, [u8; 2], u32);

    #[repr(packed)]
    pub struct OfpQueueStats(u16, [u8; 2], u32, u64, u64, u64);

    #[repr(packed)]
    pub struct OfpDescStats([u8; super::super::DESC_STR_LEN], [u8; super::super::DESC_STR_LEN],
                            [u8; super::super::DESC_STR_LEN], [u8; super::super::SERIAL_NUM_LEN],
                            [u8; super::super::DESC_STR_LEN]);
}

/// A record kind's documented size next to the size of its packed descriptor.
#[derive(Copy, Clone, Debug)]
pub struct StructSize {
    pub record: &'static str,
    pub documented: usize,
    pub layout: usize,
}

const fn entry(record: &'static str, documented: usize, layout: usize) -> StructSize {
    StructSize {
        record: record,
        documented: documented,
        layout: layout,
    }
}

pub const STRUCT_SIZES: [StructSize; 16] = [
    entry("ofp_flow_stats", FLOW_STATS_SIZE, size_of::<wire::OfpFlowStats>()),
    entry("ofp_flow_stats_request", FLOW_STATS_REQUEST_SIZE,
          size_of::<wire::OfpFlowStatsRequest>()),
    entry("ofp_aggregate_stats_request", AGGREGATE_STATS_REQUEST_SIZE,
          size_of::<wire::OfpAggregateStatsRequest>()),
    entry("ofp_aggregate_stats_reply", AGGREGATE_STATS_REPLY_SIZE,
          size_of::<wire::OfpAggregateStatsReply>()),
    entry("ofp_table_stats", TABLE_STATS_SIZE, size_of::<wire::OfpTableStats>()),
    entry("ofp_port_stats_request", PORT_STATS_REQUEST_SIZE,
          size_of::<wire::OfpPortStatsRequest>()),
    entry("ofp_port_stats", PORT_STATS_SIZE, size_of::<wire::OfpPortStats>()),
    entry("ofp_vendor_header", VENDOR_HEADER_SIZE, size_of::<wire::OfpVendorHeader>()),
    entry("ofp_queue_prop_header", QUEUE_PROP_HEADER_SIZE,
          size_of::<wire::OfpQueuePropHeader>()),
    entry("ofp_queue_prop_min_rate", QUEUE_PROP_MIN_RATE_SIZE,
          size_of::<wire::OfpQueuePropMinRate>()),
    entry("ofp_packet_queue", PACKET_QUEUE_SIZE, size_of::<wire::OfpPacketQueue>()),
    entry("ofp_queue_get_config_request", QUEUE_GET_CONFIG_REQUEST_SIZE,
          size_of::<wire::OfpQueueGetConfigRequest>()),
    entry("ofp_queue_get_config_reply", QUEUE_GET_CONFIG_REPLY_SIZE,
          size_of::<wire::OfpQueueGetConfigReply>()),
    entry("ofp_queue_stats_request", QUEUE_STATS_REQUEST_SIZE,
          size_of::<wire::OfpQueueStatsRequest>()),
    entry("ofp_queue_stats", QUEUE_STATS_SIZE, size_of::<wire::OfpQueueStats>()),
    entry("ofp_desc_stats", DESC_STATS_SIZE, size_of::<wire::OfpDescStats>()),
];

/// Look up the documented size of `record`.
pub fn documented_size(record: &str) -> Option<usize> {
    STRUCT_SIZES.iter().find(|s| s.record == record).map(|s| s.documented)
}

/// A record with a fixed wire size and fixed field offsets.
///
/// `read` is only ever handed a cursor over exactly `SIZE` bytes, and `write` must emit
/// exactly `SIZE` bytes with every reserved byte zeroed. Padding is skipped on read, not
/// checked.
pub trait FixedLayout: Validate + Sized {
    const SIZE: usize;
    /// Protocol name of the record, as used in `STRUCT_SIZES`.
    const NAME: &'static str;

    fn read(bytes: &mut Cursor<&[u8]>) -> Result<Self>;
    fn write(&self, bytes: &mut Vec<u8>) -> Result<()>;
}

/// Decode a `T` from `buf` at `offset`. Returns the value and the bytes consumed, always
/// `T::SIZE`.
pub fn decode_fixed<T: FixedLayout>(buf: &[u8], offset: usize) -> Result<(T, usize)> {
    let raw = take_exact(buf, offset, T::SIZE)?;
    let mut bytes = Cursor::new(raw);
    let value = T::read(&mut bytes)?;
    value.validate()?;
    Ok((value, T::SIZE))
}

/// Append the wire form of `value` to `bytes`. Returns the number of bytes written.
pub fn encode_fixed<T: FixedLayout>(value: &T, bytes: &mut Vec<u8>) -> Result<usize> {
    value.validate_encode()?;
    let start = bytes.len();
    value.write(bytes)?;
    let written = bytes.len() - start;
    debug_assert_eq!(written, T::SIZE, "{} emitted a wrong byte count", T::NAME);
    Ok(written)
}

/// Parse a body consisting solely of back-to-back `T` records.
pub fn parse_array<T: FixedLayout>(buf: &[u8]) -> Result<Vec<T>> {
    if buf.len() % T::SIZE != 0 {
        return Err(OfpSerializationError::LengthMismatch {
            what: T::NAME,
            declared: buf.len(),
            actual: buf.len() / T::SIZE * T::SIZE,
        });
    }
    let mut records = Vec::with_capacity(buf.len() / T::SIZE);
    let mut offset = 0;
    while offset < buf.len() {
        let (record, consumed) = decode_fixed(buf, offset)?;
        records.push(record);
        offset += consumed;
    }
    Ok(records)
}

pub fn marshal_array<T: FixedLayout>(records: &[T], bytes: &mut Vec<u8>) -> Result<()> {
    for record in records {
        encode_fixed(record, bytes)?;
    }
    Ok(())
}

/// Fail with `StructSizeAssertionFailed` unless `emitted` is the documented size of `record`.
pub fn assert_size(record: &'static str, emitted: usize) -> Result<()> {
    match documented_size(record) {
        Some(expected) if expected == emitted => Ok(()),
        Some(expected) => Err(OfpSerializationError::StructSizeAssertionFailed {
            record: record,
            expected: expected,
            actual: emitted,
        }),
        None => Err(OfpSerializationError::StructSizeAssertionFailed {
            record: record,
            expected: 0,
            actual: emitted,
        }),
    }
}
