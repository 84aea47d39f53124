//! OpenFlow 1.0 statistics and queue-configuration wire types.

use crate::error::{OfpSerializationError, Result};

pub mod action;
pub mod layout;
pub mod list;
pub mod message;
pub mod queue;
pub mod stats;
pub mod validate;

pub use self::action::RawAction;
pub use self::layout::{decode_fixed, encode_fixed, FixedLayout};
pub use self::list::{marshal_list, parse_list, BoundedList, ListItem, ListWalker};
pub use self::message::Message;
pub use self::queue::{PacketQueue, QueueGetConfigReply, QueueGetConfigRequest, QueuePropHeader,
                      QueueProperty};
pub use self::stats::{AggregateStatsReply, AggregateStatsRequest, DescStats, FlowStats,
                      FlowStatsRequest, Pattern, PortStats, PortStatsRequest, QueueStats,
                      QueueStatsRequest, StatsReq, StatsReqBody, StatsResp, StatsRespBody,
                      TableStats, VendorHeader};

pub const OFP_MAX_TABLE_NAME_LEN: usize = 32;
pub const DESC_STR_LEN: usize = 256;
pub const SERIAL_NUM_LEN: usize = 32;

/// Table id addressing every table in a flow/aggregate stats request.
pub const ALL_TABLES: u8 = 0xff;
/// Table id addressing the emergency flow cache.
pub const EMERGENCY_TABLE: u8 = 0xfe;

pub const OFPP_MAX: u16 = OfpPort::OFPPMax as u16;
pub const OFPP_ALL: u16 = OfpPort::OFPPAll as u16;
pub const OFPP_LOCAL: u16 = OfpPort::OFPPLocal as u16;
pub const OFPP_NONE: u16 = OfpPort::OFPPNone as u16;

/// All queues of a port.
pub const OFPQ_ALL: u32 = OfpQueue::OFPQAll as u32;
/// Min rate value meaning "not configured". Any rate above 1000 disables the property.
pub const OFPQ_MIN_RATE_UNCFG: u16 = 0xffff;

/// Counter value reported by a switch for a port counter it does not support.
pub const OFP_COUNTER_UNSUPPORTED: u64 = 0xffff_ffff_ffff_ffff;

/// Stats reply flag: more replies follow.
pub const OFPSF_REPLY_MORE: u16 = 1 << 0;

/// OpenFlow 1.0 message type codes, used by headers to identify meaning of the rest of a message.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MsgCode {
    Hello,
    Error,
    EchoReq,
    EchoResp,
    Vendor,
    FeaturesReq,
    FeaturesResp,
    GetConfigReq,
    GetConfigResp,
    SetConfig,
    PacketIn,
    FlowRemoved,
    PortStatus,
    PacketOut,
    FlowMod,
    PortMod,
    StatsReq,
    StatsResp,
    BarrierReq,
    BarrierResp,
    QueueGetConfigReq,
    QueueGetConfigResp,
}

impl MsgCode {
    pub fn from_u8(code: u8) -> Result<MsgCode> {
        let msg_code = match code {
            0 => MsgCode::Hello,
            1 => MsgCode::Error,
            2 => MsgCode::EchoReq,
            3 => MsgCode::EchoResp,
            4 => MsgCode::Vendor,
            5 => MsgCode::FeaturesReq,
            6 => MsgCode::FeaturesResp,
            7 => MsgCode::GetConfigReq,
            8 => MsgCode::GetConfigResp,
            9 => MsgCode::SetConfig,
            10 => MsgCode::PacketIn,
            11 => MsgCode::FlowRemoved,
            12 => MsgCode::PortStatus,
            13 => MsgCode::PacketOut,
            14 => MsgCode::FlowMod,
            15 => MsgCode::PortMod,
            16 => MsgCode::StatsReq,
            17 => MsgCode::StatsResp,
            18 => MsgCode::BarrierReq,
            19 => MsgCode::BarrierResp,
            20 => MsgCode::QueueGetConfigReq,
            21 => MsgCode::QueueGetConfigResp,
            c => return Err(OfpSerializationError::UnsupportedMessage { code: c }),
        };
        Ok(msg_code)
    }
}

/// Common API for message bodies implementing OpenFlow Message Codes (see `MsgCode` enum).
///
/// `parse` receives exactly the body bytes the envelope declares.
pub trait MessageType: Sized {
    /// Return the byte-size of a message body.
    fn size_of(msg: &Self) -> usize;
    /// Parse a buffer into a message.
    fn parse(buf: &[u8]) -> Result<Self>;
    /// Marshal a message into a `u8` buffer.
    fn marshal(msg: &Self, bytes: &mut Vec<u8>) -> Result<()>;
}

/// Reserved port numbers.
#[repr(u16)]
pub enum OfpPort {
    OFPPMax = 0xff00,
    OFPPInPort = 0xfff8,
    OFPPTable = 0xfff9,
    OFPPNormal = 0xfffa,
    OFPPFlood = 0xfffb,
    OFPPAll = 0xfffc,
    OFPPController = 0xfffd,
    OFPPLocal = 0xfffe,
    OFPPNone = 0xffff,
}

#[repr(u32)]
pub enum OfpQueue {
    OFPQAll = 0xffffffff,
}

/// Kinds of statistics, shared by requests and replies.
#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StatsReqType {
    Desc = 0,
    Flow = 1,
    Aggregate = 2,
    Table = 3,
    Port = 4,
    Queue = 5,
    Vendor = 0xffff,
}

impl StatsReqType {
    pub fn from_u16(value: u16) -> Result<StatsReqType> {
        match value {
            0 => Ok(StatsReqType::Desc),
            1 => Ok(StatsReqType::Flow),
            2 => Ok(StatsReqType::Aggregate),
            3 => Ok(StatsReqType::Table),
            4 => Ok(StatsReqType::Port),
            5 => Ok(StatsReqType::Queue),
            0xffff => Ok(StatsReqType::Vendor),
            code => Err(OfpSerializationError::UnknownStatsType { code: code }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn msg_codes_follow_wire_numbering() {
        assert_eq!(MsgCode::from_u8(16).unwrap(), MsgCode::StatsReq);
        assert_eq!(MsgCode::from_u8(21).unwrap() as u8, 21);
        assert!(matches!(MsgCode::from_u8(22),
                         Err(OfpSerializationError::UnsupportedMessage { code: 22 })));
    }

    #[test]
    fn stats_types() {
        assert_eq!(StatsReqType::from_u16(0xffff).unwrap(), StatsReqType::Vendor);
        assert_eq!(StatsReqType::Queue as u16, 5);
        assert!(matches!(StatsReqType::from_u16(6),
                         Err(OfpSerializationError::UnknownStatsType { code: 6 })));
    }

    #[test]
    fn sentinels() {
        assert_eq!(OFPP_NONE, 0xffff);
        assert_eq!(OFPP_MAX, 0xff00);
        assert_eq!(OFPQ_ALL, 0xffff_ffff);
    }
}
