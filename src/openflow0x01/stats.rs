//! Bodies of OFPT_STATS_REQUEST and OFPT_STATS_REPLY messages.

use std::io::{BufRead, Cursor, Read};

use byteorder::{BigEndian, ByteOrder, ReadBytesExt, WriteBytesExt};

use crate::error::{OfpSerializationError, Result};
use crate::ofp_utils::{read_fixed_size_string, take_exact, test_bit, write_fixed_size_string,
                       write_padding_bytes, FixedString};
use crate::openflow0x01::action::RawAction;
use crate::openflow0x01::layout::*;
use crate::openflow0x01::list::{marshal_list, parse_list, BoundedList, ListItem};
use crate::openflow0x01::validate::{self, Validate};
use crate::openflow0x01::{MessageType, StatsReqType, DESC_STR_LEN, OFPP_NONE,
                          OFP_COUNTER_UNSUPPORTED, OFP_MAX_TABLE_NAME_LEN, SERIAL_NUM_LEN};

/// Wildcard bits covering every match field.
pub const OFPFW_ALL: u32 = (1 << 22) - 1;

/// Fields to match against flows.
///
/// Kept as the raw 40-byte `ofp_match`; its field encoding belongs to a match codec.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pattern {
    raw: [u8; OFP_MATCH_SIZE],
}

impl Pattern {
    pub fn from_bytes(raw: [u8; OFP_MATCH_SIZE]) -> Pattern {
        Pattern { raw: raw }
    }

    /// A pattern wildcarding every field.
    pub fn match_all() -> Pattern {
        let mut raw = [0; OFP_MATCH_SIZE];
        BigEndian::write_u32(&mut raw[0..4], OFPFW_ALL);
        Pattern { raw: raw }
    }

    /// The `wildcards` bitmap leading the match.
    pub fn wildcards(&self) -> u32 {
        BigEndian::read_u32(&self.raw[0..4])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    fn parse(bytes: &mut Cursor<&[u8]>) -> Result<Pattern> {
        let mut raw = [0; OFP_MATCH_SIZE];
        bytes.read_exact(&mut raw)?;
        Ok(Pattern { raw: raw })
    }

    fn marshal(p: &Pattern, bytes: &mut Vec<u8>) {
        bytes.extend_from_slice(&p.raw);
    }
}

/// Body of a flow stats request: which flows to report.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FlowStatsRequest {
    pub pattern: Pattern,
    /// Table to read, `ALL_TABLES` for all or `EMERGENCY_TABLE` for the emergency cache.
    pub table_id: u8,
    /// Only report flows with an output action to this port; `OFPP_NONE` for no restriction.
    pub out_port: u16,
}

/// Aggregate stats requests select flows exactly like flow stats requests.
pub type AggregateStatsRequest = FlowStatsRequest;

impl Validate for FlowStatsRequest {}

impl FixedLayout for FlowStatsRequest {
    const SIZE: usize = FLOW_STATS_REQUEST_SIZE;
    const NAME: &'static str = "ofp_flow_stats_request";

    fn read(bytes: &mut Cursor<&[u8]>) -> Result<FlowStatsRequest> {
        let pattern = Pattern::parse(bytes)?;
        let table_id = bytes.read_u8()?;
        bytes.consume(1);
        let out_port = bytes.read_u16::<BigEndian>()?;
        Ok(FlowStatsRequest {
            pattern: pattern,
            table_id: table_id,
            out_port: out_port,
        })
    }

    fn write(&self, bytes: &mut Vec<u8>) -> Result<()> {
        Pattern::marshal(&self.pattern, bytes);
        bytes.write_u8(self.table_id)?;
        write_padding_bytes(bytes, 1);
        bytes.write_u16::<BigEndian>(self.out_port)?;
        Ok(())
    }
}

/// Statistics of one flow entry, followed by the flow's actions.
///
/// The wire `length` field is not stored: it is always `88 + actions.byte_len()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowStats<A = RawAction> {
    pub table_id: u8,
    pub pattern: Pattern,
    pub duration_sec: u32,
    pub duration_nsec: u32,
    pub priority: u16,
    pub idle_timeout: u16,
    pub hard_timeout: u16,
    pub cookie: u64,
    pub packet_count: u64,
    pub byte_count: u64,
    pub actions: BoundedList<A>,
}

impl<A: ListItem> FlowStats<A> {
    /// Total byte length of the entry, fixed part and actions.
    pub fn length(&self) -> usize {
        FLOW_STATS_SIZE + self.actions.byte_len()
    }

    /// Parse one flow stats entry. `buf` must hold exactly the entry, so its length is
    /// what the entry's `length` field has to declare.
    pub fn parse(buf: &[u8]) -> Result<FlowStats<A>> {
        let mut bytes = Cursor::new(take_exact(buf, 0, FLOW_STATS_SIZE)?);
        let length = bytes.read_u16::<BigEndian>()? as usize;
        if length != buf.len() {
            return Err(OfpSerializationError::LengthMismatch {
                what: "ofp_flow_stats.length",
                declared: length,
                actual: buf.len(),
            });
        }
        let table_id = bytes.read_u8()?;
        bytes.consume(1);
        let pattern = Pattern::parse(&mut bytes)?;
        let duration_sec = bytes.read_u32::<BigEndian>()?;
        let duration_nsec = bytes.read_u32::<BigEndian>()?;
        let priority = bytes.read_u16::<BigEndian>()?;
        let idle_timeout = bytes.read_u16::<BigEndian>()?;
        let hard_timeout = bytes.read_u16::<BigEndian>()?;
        bytes.consume(6);
        let cookie = bytes.read_u64::<BigEndian>()?;
        let packet_count = bytes.read_u64::<BigEndian>()?;
        let byte_count = bytes.read_u64::<BigEndian>()?;
        let actions = parse_list(buf, FLOW_STATS_SIZE, length - FLOW_STATS_SIZE)?;
        Ok(FlowStats {
            table_id: table_id,
            pattern: pattern,
            duration_sec: duration_sec,
            duration_nsec: duration_nsec,
            priority: priority,
            idle_timeout: idle_timeout,
            hard_timeout: hard_timeout,
            cookie: cookie,
            packet_count: packet_count,
            byte_count: byte_count,
            actions: actions,
        })
    }

    pub fn marshal(fs: &FlowStats<A>, bytes: &mut Vec<u8>) -> Result<()> {
        let length = fs.length();
        if length > u16::MAX as usize {
            return Err(OfpSerializationError::LengthMismatch {
                what: "ofp_flow_stats.length",
                declared: u16::MAX as usize,
                actual: length,
            });
        }
        bytes.write_u16::<BigEndian>(length as u16)?;
        bytes.write_u8(fs.table_id)?;
        write_padding_bytes(bytes, 1);
        Pattern::marshal(&fs.pattern, bytes);
        bytes.write_u32::<BigEndian>(fs.duration_sec)?;
        bytes.write_u32::<BigEndian>(fs.duration_nsec)?;
        bytes.write_u16::<BigEndian>(fs.priority)?;
        bytes.write_u16::<BigEndian>(fs.idle_timeout)?;
        bytes.write_u16::<BigEndian>(fs.hard_timeout)?;
        write_padding_bytes(bytes, 6);
        bytes.write_u64::<BigEndian>(fs.cookie)?;
        bytes.write_u64::<BigEndian>(fs.packet_count)?;
        bytes.write_u64::<BigEndian>(fs.byte_count)?;
        marshal_list(&fs.actions, bytes)?;
        Ok(())
    }
}

impl<A: ListItem> ListItem for FlowStats<A> {
    const HEADER_SIZE: usize = 2;
    const MIN_LEN: usize = FLOW_STATS_SIZE;
    const NAME: &'static str = "ofp_flow_stats";

    fn declared_len(header: &[u8]) -> usize {
        BigEndian::read_u16(&header[0..2]) as usize
    }

    fn parse(item: &[u8]) -> Result<FlowStats<A>> {
        FlowStats::parse(item)
    }

    fn size_of(fs: &FlowStats<A>) -> usize {
        fs.length()
    }

    fn marshal(fs: &FlowStats<A>, bytes: &mut Vec<u8>) -> Result<()> {
        FlowStats::marshal(fs, bytes)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AggregateStatsReply {
    pub packet_count: u64,
    pub byte_count: u64,
    pub flow_count: u32,
}

impl Validate for AggregateStatsReply {}

impl FixedLayout for AggregateStatsReply {
    const SIZE: usize = AGGREGATE_STATS_REPLY_SIZE;
    const NAME: &'static str = "ofp_aggregate_stats_reply";

    fn read(bytes: &mut Cursor<&[u8]>) -> Result<AggregateStatsReply> {
        let packet_count = bytes.read_u64::<BigEndian>()?;
        let byte_count = bytes.read_u64::<BigEndian>()?;
        let flow_count = bytes.read_u32::<BigEndian>()?;
        bytes.consume(4);
        Ok(AggregateStatsReply {
            packet_count: packet_count,
            byte_count: byte_count,
            flow_count: flow_count,
        })
    }

    fn write(&self, bytes: &mut Vec<u8>) -> Result<()> {
        bytes.write_u64::<BigEndian>(self.packet_count)?;
        bytes.write_u64::<BigEndian>(self.byte_count)?;
        bytes.write_u32::<BigEndian>(self.flow_count)?;
        write_padding_bytes(bytes, 4);
        Ok(())
    }
}

/// Statistics of one flow table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableStats {
    pub table_id: u8,
    /// At most `OFP_MAX_TABLE_NAME_LEN - 1` bytes on encode; the last byte of the field is
    /// the NUL.
    pub name: FixedString,
    /// Bitmap of OFPFW_* wildcards supported by the table.
    pub wildcards: u32,
    pub max_entries: u32,
    pub active_count: u32,
    pub lookup_count: u64,
    pub matched_count: u64,
}

impl Validate for TableStats {
    /// Names are only bounded on encode; a decoded name may fill the whole field.
    fn validate_encode(&self) -> Result<()> {
        validate::check_name(&self.name, OFP_MAX_TABLE_NAME_LEN)
    }
}

impl FixedLayout for TableStats {
    const SIZE: usize = TABLE_STATS_SIZE;
    const NAME: &'static str = "ofp_table_stats";

    fn read(bytes: &mut Cursor<&[u8]>) -> Result<TableStats> {
        let table_id = bytes.read_u8()?;
        bytes.consume(3);
        let name = read_fixed_size_string(bytes, OFP_MAX_TABLE_NAME_LEN)?;
        let wildcards = bytes.read_u32::<BigEndian>()?;
        let max_entries = bytes.read_u32::<BigEndian>()?;
        let active_count = bytes.read_u32::<BigEndian>()?;
        let lookup_count = bytes.read_u64::<BigEndian>()?;
        let matched_count = bytes.read_u64::<BigEndian>()?;
        Ok(TableStats {
            table_id: table_id,
            name: name,
            wildcards: wildcards,
            max_entries: max_entries,
            active_count: active_count,
            lookup_count: lookup_count,
            matched_count: matched_count,
        })
    }

    fn write(&self, bytes: &mut Vec<u8>) -> Result<()> {
        bytes.write_u8(self.table_id)?;
        write_padding_bytes(bytes, 3);
        write_fixed_size_string(bytes, &self.name, OFP_MAX_TABLE_NAME_LEN)?;
        bytes.write_u32::<BigEndian>(self.wildcards)?;
        bytes.write_u32::<BigEndian>(self.max_entries)?;
        bytes.write_u32::<BigEndian>(self.active_count)?;
        bytes.write_u64::<BigEndian>(self.lookup_count)?;
        bytes.write_u64::<BigEndian>(self.matched_count)?;
        Ok(())
    }
}

/// Body of a port stats request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PortStatsRequest {
    /// A single port, or `OFPP_NONE` for all ports.
    pub port_no: u16,
}

impl PortStatsRequest {
    pub fn all_ports() -> PortStatsRequest {
        PortStatsRequest { port_no: OFPP_NONE }
    }
}

impl Validate for PortStatsRequest {
    fn validate(&self) -> Result<()> {
        validate::check_port_stats_port(self.port_no)
    }
}

impl FixedLayout for PortStatsRequest {
    const SIZE: usize = PORT_STATS_REQUEST_SIZE;
    const NAME: &'static str = "ofp_port_stats_request";

    fn read(bytes: &mut Cursor<&[u8]>) -> Result<PortStatsRequest> {
        let port_no = bytes.read_u16::<BigEndian>()?;
        bytes.consume(6);
        Ok(PortStatsRequest { port_no: port_no })
    }

    fn write(&self, bytes: &mut Vec<u8>) -> Result<()> {
        bytes.write_u16::<BigEndian>(self.port_no)?;
        write_padding_bytes(bytes, 6);
        Ok(())
    }
}

/// Counters of one physical port. A counter the switch does not support holds
/// `OFP_COUNTER_UNSUPPORTED`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PortStats {
    pub port_no: u16,
    pub rx_packets: u64,
    pub tx_packets: u64,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub rx_dropped: u64,
    pub tx_dropped: u64,
    pub rx_errors: u64,
    pub tx_errors: u64,
    pub rx_frame_err: u64,
    pub rx_over_err: u64,
    pub rx_crc_err: u64,
    pub collisions: u64,
}

impl PortStats {
    /// Stats for `port_no` with every counter marked unsupported.
    pub fn unsupported(port_no: u16) -> PortStats {
        let u = OFP_COUNTER_UNSUPPORTED;
        PortStats {
            port_no: port_no,
            rx_packets: u,
            tx_packets: u,
            rx_bytes: u,
            tx_bytes: u,
            rx_dropped: u,
            tx_dropped: u,
            rx_errors: u,
            tx_errors: u,
            rx_frame_err: u,
            rx_over_err: u,
            rx_crc_err: u,
            collisions: u,
        }
    }

    /// `None` for a counter holding the unsupported sentinel.
    pub fn counter(value: u64) -> Option<u64> {
        if value == OFP_COUNTER_UNSUPPORTED {
            None
        } else {
            Some(value)
        }
    }

    fn counters(&self) -> [u64; 12] {
        [self.rx_packets, self.tx_packets, self.rx_bytes, self.tx_bytes, self.rx_dropped,
         self.tx_dropped, self.rx_errors, self.tx_errors, self.rx_frame_err, self.rx_over_err,
         self.rx_crc_err, self.collisions]
    }
}

impl Validate for PortStats {}

impl FixedLayout for PortStats {
    const SIZE: usize = PORT_STATS_SIZE;
    const NAME: &'static str = "ofp_port_stats";

    fn read(bytes: &mut Cursor<&[u8]>) -> Result<PortStats> {
        let port_no = bytes.read_u16::<BigEndian>()?;
        bytes.consume(6);
        let mut c = [0u64; 12];
        bytes.read_u64_into::<BigEndian>(&mut c)?;
        Ok(PortStats {
            port_no: port_no,
            rx_packets: c[0],
            tx_packets: c[1],
            rx_bytes: c[2],
            tx_bytes: c[3],
            rx_dropped: c[4],
            tx_dropped: c[5],
            rx_errors: c[6],
            tx_errors: c[7],
            rx_frame_err: c[8],
            rx_over_err: c[9],
            rx_crc_err: c[10],
            collisions: c[11],
        })
    }

    fn write(&self, bytes: &mut Vec<u8>) -> Result<()> {
        bytes.write_u16::<BigEndian>(self.port_no)?;
        write_padding_bytes(bytes, 6);
        for counter in self.counters().iter() {
            bytes.write_u64::<BigEndian>(*counter)?;
        }
        Ok(())
    }
}

/// Body of a queue stats request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct QueueStatsRequest {
    /// A single port, or `OFPP_ALL` for all ports.
    pub port_no: u16,
    /// A single queue, or `OFPQ_ALL` for all queues of the port.
    pub queue_id: u32,
}

impl Validate for QueueStatsRequest {
    fn validate(&self) -> Result<()> {
        validate::check_queue_stats_port(self.port_no)
    }
}

impl FixedLayout for QueueStatsRequest {
    const SIZE: usize = QUEUE_STATS_REQUEST_SIZE;
    const NAME: &'static str = "ofp_queue_stats_request";

    fn read(bytes: &mut Cursor<&[u8]>) -> Result<QueueStatsRequest> {
        let port_no = bytes.read_u16::<BigEndian>()?;
        bytes.consume(2);
        let queue_id = bytes.read_u32::<BigEndian>()?;
        Ok(QueueStatsRequest {
            port_no: port_no,
            queue_id: queue_id,
        })
    }

    fn write(&self, bytes: &mut Vec<u8>) -> Result<()> {
        bytes.write_u16::<BigEndian>(self.port_no)?;
        write_padding_bytes(bytes, 2);
        bytes.write_u32::<BigEndian>(self.queue_id)?;
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct QueueStats {
    pub port_no: u16,
    pub queue_id: u32,
    pub tx_bytes: u64,
    pub tx_packets: u64,
    /// Packets dropped due to overrun.
    pub tx_errors: u64,
}

impl Validate for QueueStats {}

impl FixedLayout for QueueStats {
    const SIZE: usize = QUEUE_STATS_SIZE;
    const NAME: &'static str = "ofp_queue_stats";

    fn read(bytes: &mut Cursor<&[u8]>) -> Result<QueueStats> {
        let port_no = bytes.read_u16::<BigEndian>()?;
        bytes.consume(2);
        let queue_id = bytes.read_u32::<BigEndian>()?;
        let tx_bytes = bytes.read_u64::<BigEndian>()?;
        let tx_packets = bytes.read_u64::<BigEndian>()?;
        let tx_errors = bytes.read_u64::<BigEndian>()?;
        Ok(QueueStats {
            port_no: port_no,
            queue_id: queue_id,
            tx_bytes: tx_bytes,
            tx_packets: tx_packets,
            tx_errors: tx_errors,
        })
    }

    fn write(&self, bytes: &mut Vec<u8>) -> Result<()> {
        bytes.write_u16::<BigEndian>(self.port_no)?;
        write_padding_bytes(bytes, 2);
        bytes.write_u32::<BigEndian>(self.queue_id)?;
        bytes.write_u64::<BigEndian>(self.tx_bytes)?;
        bytes.write_u64::<BigEndian>(self.tx_packets)?;
        bytes.write_u64::<BigEndian>(self.tx_errors)?;
        Ok(())
    }
}

/// Description of the switch. Each field is a NUL-padded string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DescStats {
    pub mfr_desc: FixedString,
    pub hw_desc: FixedString,
    pub sw_desc: FixedString,
    pub serial_num: FixedString,
    pub dp_desc: FixedString,
}

impl Validate for DescStats {
    fn validate_encode(&self) -> Result<()> {
        validate::check_name(&self.mfr_desc, DESC_STR_LEN)?;
        validate::check_name(&self.hw_desc, DESC_STR_LEN)?;
        validate::check_name(&self.sw_desc, DESC_STR_LEN)?;
        validate::check_name(&self.serial_num, SERIAL_NUM_LEN)?;
        validate::check_name(&self.dp_desc, DESC_STR_LEN)
    }
}

impl FixedLayout for DescStats {
    const SIZE: usize = DESC_STATS_SIZE;
    const NAME: &'static str = "ofp_desc_stats";

    fn read(bytes: &mut Cursor<&[u8]>) -> Result<DescStats> {
        Ok(DescStats {
            mfr_desc: read_fixed_size_string(bytes, DESC_STR_LEN)?,
            hw_desc: read_fixed_size_string(bytes, DESC_STR_LEN)?,
            sw_desc: read_fixed_size_string(bytes, DESC_STR_LEN)?,
            serial_num: read_fixed_size_string(bytes, SERIAL_NUM_LEN)?,
            dp_desc: read_fixed_size_string(bytes, DESC_STR_LEN)?,
        })
    }

    fn write(&self, bytes: &mut Vec<u8>) -> Result<()> {
        write_fixed_size_string(bytes, &self.mfr_desc, DESC_STR_LEN)?;
        write_fixed_size_string(bytes, &self.hw_desc, DESC_STR_LEN)?;
        write_fixed_size_string(bytes, &self.sw_desc, DESC_STR_LEN)?;
        write_fixed_size_string(bytes, &self.serial_num, SERIAL_NUM_LEN)?;
        write_fixed_size_string(bytes, &self.dp_desc, DESC_STR_LEN)?;
        Ok(())
    }
}

/// Vendor id followed by vendor-defined data.
///
/// Used as the body of OFPT_VENDOR messages and of vendor stats requests and replies. The
/// data carries no length of its own: it runs to the end of the enclosing message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VendorHeader {
    pub vendor: u32,
    pub data: Vec<u8>,
}

impl MessageType for VendorHeader {
    fn size_of(vh: &VendorHeader) -> usize {
        4 + vh.data.len()
    }

    fn parse(buf: &[u8]) -> Result<VendorHeader> {
        let vendor = BigEndian::read_u32(take_exact(buf, 0, 4)?);
        Ok(VendorHeader {
            vendor: vendor,
            data: buf[4..].to_vec(),
        })
    }

    fn marshal(vh: &VendorHeader, bytes: &mut Vec<u8>) -> Result<()> {
        bytes.write_u32::<BigEndian>(vh.vendor)?;
        bytes.extend_from_slice(&vh.data);
        Ok(())
    }
}

/// Decode a body that must be exactly one `T`.
fn parse_exact<T: FixedLayout>(body: &[u8]) -> Result<T> {
    let (value, consumed) = decode_fixed(body, 0)?;
    if consumed != body.len() {
        return Err(OfpSerializationError::LengthMismatch {
            what: T::NAME,
            declared: body.len(),
            actual: consumed,
        });
    }
    Ok(value)
}

fn expect_empty(what: &'static str, body: &[u8]) -> Result<()> {
    if !body.is_empty() {
        return Err(OfpSerializationError::LengthMismatch {
            what: what,
            declared: body.len(),
            actual: 0,
        });
    }
    Ok(())
}

/// Reads the `type` and `flags` fields leading every stats body.
fn parse_stats_header(buf: &[u8]) -> Result<(StatsReqType, u16)> {
    let mut bytes = Cursor::new(take_exact(buf, 0, STATS_HEADER_SIZE)?);
    let typ = StatsReqType::from_u16(bytes.read_u16::<BigEndian>()?)?;
    let flags = bytes.read_u16::<BigEndian>()?;
    Ok((typ, flags))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatsReqBody {
    Desc,
    Flow(FlowStatsRequest),
    Aggregate(AggregateStatsRequest),
    Table,
    Port(PortStatsRequest),
    Queue(QueueStatsRequest),
    Vendor(VendorHeader),
}

impl StatsReqBody {
    pub fn stats_type(&self) -> StatsReqType {
        match *self {
            StatsReqBody::Desc => StatsReqType::Desc,
            StatsReqBody::Flow(_) => StatsReqType::Flow,
            StatsReqBody::Aggregate(_) => StatsReqType::Aggregate,
            StatsReqBody::Table => StatsReqType::Table,
            StatsReqBody::Port(_) => StatsReqType::Port,
            StatsReqBody::Queue(_) => StatsReqType::Queue,
            StatsReqBody::Vendor(_) => StatsReqType::Vendor,
        }
    }
}

/// Body of an OFPT_STATS_REQUEST message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatsReq {
    /// OFPSF_REQ_* flags (none defined).
    pub flags: u16,
    pub body: StatsReqBody,
}

impl MessageType for StatsReq {
    fn size_of(sr: &StatsReq) -> usize {
        STATS_HEADER_SIZE +
        match sr.body {
            StatsReqBody::Desc | StatsReqBody::Table => 0,
            StatsReqBody::Flow(_) => FlowStatsRequest::SIZE,
            StatsReqBody::Aggregate(_) => AggregateStatsRequest::SIZE,
            StatsReqBody::Port(_) => PortStatsRequest::SIZE,
            StatsReqBody::Queue(_) => QueueStatsRequest::SIZE,
            StatsReqBody::Vendor(ref vh) => VendorHeader::size_of(vh),
        }
    }

    fn parse(buf: &[u8]) -> Result<StatsReq> {
        let (typ, flags) = parse_stats_header(buf)?;
        let body = &buf[STATS_HEADER_SIZE..];
        let body = match typ {
            StatsReqType::Desc => {
                expect_empty("ofp_stats_request.desc", body)?;
                StatsReqBody::Desc
            }
            StatsReqType::Flow => StatsReqBody::Flow(parse_exact(body)?),
            StatsReqType::Aggregate => StatsReqBody::Aggregate(parse_exact(body)?),
            StatsReqType::Table => {
                expect_empty("ofp_stats_request.table", body)?;
                StatsReqBody::Table
            }
            StatsReqType::Port => StatsReqBody::Port(parse_exact(body)?),
            StatsReqType::Queue => StatsReqBody::Queue(parse_exact(body)?),
            StatsReqType::Vendor => StatsReqBody::Vendor(VendorHeader::parse(body)?),
        };
        Ok(StatsReq {
            flags: flags,
            body: body,
        })
    }

    fn marshal(sr: &StatsReq, bytes: &mut Vec<u8>) -> Result<()> {
        bytes.write_u16::<BigEndian>(sr.body.stats_type() as u16)?;
        bytes.write_u16::<BigEndian>(sr.flags)?;
        match sr.body {
            StatsReqBody::Desc | StatsReqBody::Table => (),
            StatsReqBody::Flow(ref req) | StatsReqBody::Aggregate(ref req) => {
                encode_fixed(req, bytes)?;
            }
            StatsReqBody::Port(ref req) => {
                encode_fixed(req, bytes)?;
            }
            StatsReqBody::Queue(ref req) => {
                encode_fixed(req, bytes)?;
            }
            StatsReqBody::Vendor(ref vh) => VendorHeader::marshal(vh, bytes)?,
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatsRespBody {
    Desc(DescStats),
    Flow(BoundedList<FlowStats>),
    Aggregate(AggregateStatsReply),
    Table(Vec<TableStats>),
    Port(Vec<PortStats>),
    Queue(Vec<QueueStats>),
    Vendor(VendorHeader),
}

impl StatsRespBody {
    pub fn stats_type(&self) -> StatsReqType {
        match *self {
            StatsRespBody::Desc(_) => StatsReqType::Desc,
            StatsRespBody::Flow(_) => StatsReqType::Flow,
            StatsRespBody::Aggregate(_) => StatsReqType::Aggregate,
            StatsRespBody::Table(_) => StatsReqType::Table,
            StatsRespBody::Port(_) => StatsReqType::Port,
            StatsRespBody::Queue(_) => StatsReqType::Queue,
            StatsRespBody::Vendor(_) => StatsReqType::Vendor,
        }
    }
}

/// Body of an OFPT_STATS_REPLY message. Array bodies run to the end of the message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatsResp {
    /// OFPSF_REPLY_* flags.
    pub flags: u16,
    pub body: StatsRespBody,
}

impl StatsResp {
    /// Whether more replies to the same request follow.
    pub fn more(&self) -> bool {
        test_bit(0, self.flags as u64)
    }
}

impl MessageType for StatsResp {
    fn size_of(sr: &StatsResp) -> usize {
        STATS_HEADER_SIZE +
        match sr.body {
            StatsRespBody::Desc(_) => DescStats::SIZE,
            StatsRespBody::Flow(ref flow_stats) => flow_stats.byte_len(),
            StatsRespBody::Aggregate(_) => AggregateStatsReply::SIZE,
            StatsRespBody::Table(ref table_stats) => table_stats.len() * TableStats::SIZE,
            StatsRespBody::Port(ref port_stats) => port_stats.len() * PortStats::SIZE,
            StatsRespBody::Queue(ref queue_stats) => queue_stats.len() * QueueStats::SIZE,
            StatsRespBody::Vendor(ref vh) => VendorHeader::size_of(vh),
        }
    }

    fn parse(buf: &[u8]) -> Result<StatsResp> {
        let (typ, flags) = parse_stats_header(buf)?;
        let body = &buf[STATS_HEADER_SIZE..];
        let body = match typ {
            StatsReqType::Desc => StatsRespBody::Desc(parse_exact(body)?),
            StatsReqType::Flow => StatsRespBody::Flow(parse_list(body, 0, body.len())?),
            StatsReqType::Aggregate => StatsRespBody::Aggregate(parse_exact(body)?),
            StatsReqType::Table => StatsRespBody::Table(parse_array(body)?),
            StatsReqType::Port => StatsRespBody::Port(parse_array(body)?),
            StatsReqType::Queue => StatsRespBody::Queue(parse_array(body)?),
            StatsReqType::Vendor => StatsRespBody::Vendor(VendorHeader::parse(body)?),
        };
        Ok(StatsResp {
            flags: flags,
            body: body,
        })
    }

    fn marshal(sr: &StatsResp, bytes: &mut Vec<u8>) -> Result<()> {
        bytes.write_u16::<BigEndian>(sr.body.stats_type() as u16)?;
        bytes.write_u16::<BigEndian>(sr.flags)?;
        match sr.body {
            StatsRespBody::Desc(ref desc) => {
                encode_fixed(desc, bytes)?;
            }
            StatsRespBody::Flow(ref flow_stats) => {
                marshal_list(flow_stats, bytes)?;
            }
            StatsRespBody::Aggregate(ref agg) => {
                encode_fixed(agg, bytes)?;
            }
            StatsRespBody::Table(ref table_stats) => marshal_array(table_stats, bytes)?,
            StatsRespBody::Port(ref port_stats) => marshal_array(port_stats, bytes)?,
            StatsRespBody::Queue(ref queue_stats) => marshal_array(queue_stats, bytes)?,
            StatsRespBody::Vendor(ref vh) => VendorHeader::marshal(vh, bytes)?,
        }
        Ok(())
    }
}
