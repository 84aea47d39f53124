use log::debug;

use crate::error::{OfpSerializationError, Result};
use crate::ofp_header::{OfpHeader, OFP_VERSION};
use crate::ofp_message::OfpMessage;
use crate::ofp_utils::take_exact;
use crate::openflow0x01::queue::{QueueGetConfigReply, QueueGetConfigRequest};
use crate::openflow0x01::stats::{StatsReq, StatsResp, VendorHeader};
use crate::openflow0x01::validate::ensure_struct_sizes;
use crate::openflow0x01::{MessageType, MsgCode};

/// Abstractions of the OpenFlow 1.0 messages carrying statistics, queue configuration and
/// vendor extensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Message {
    Vendor(VendorHeader),
    StatsRequest(StatsReq),
    StatsReply(StatsResp),
    QueueGetConfigRequest(QueueGetConfigRequest),
    QueueGetConfigReply(QueueGetConfigReply),
}

impl Message {
    /// Map `Message` to associated OpenFlow message type code `MsgCode`.
    fn msg_code_of_message(msg: &Message) -> MsgCode {
        match *msg {
            Message::Vendor(_) => MsgCode::Vendor,
            Message::StatsRequest(_) => MsgCode::StatsReq,
            Message::StatsReply(_) => MsgCode::StatsResp,
            Message::QueueGetConfigRequest(_) => MsgCode::QueueGetConfigReq,
            Message::QueueGetConfigReply(_) => MsgCode::QueueGetConfigResp,
        }
    }

    /// Marshal the body of the OpenFlow message `msg`.
    fn marshal_body(msg: &Message, bytes: &mut Vec<u8>) -> Result<()> {
        match *msg {
            Message::Vendor(ref vh) => VendorHeader::marshal(vh, bytes),
            Message::StatsRequest(ref req) => StatsReq::marshal(req, bytes),
            Message::StatsReply(ref resp) => StatsResp::marshal(resp, bytes),
            Message::QueueGetConfigRequest(ref req) => QueueGetConfigRequest::marshal(req, bytes),
            Message::QueueGetConfigReply(ref reply) => QueueGetConfigReply::marshal(reply, bytes),
        }
    }

    /// Parse one complete message, header included, from the front of `buf`.
    ///
    /// Bytes past the length declared in the header are left alone.
    pub fn parse_frame(buf: &[u8]) -> Result<(u32, Message)> {
        let header = OfpHeader::parse(buf)?;
        let frame = take_exact(buf, 0, header.length())?;
        Message::parse(&header, &frame[OfpHeader::size()..])
    }
}

impl OfpMessage for Message {
    fn size_of(msg: &Message) -> usize {
        OfpHeader::size() +
        match *msg {
            Message::Vendor(ref vh) => VendorHeader::size_of(vh),
            Message::StatsRequest(ref req) => StatsReq::size_of(req),
            Message::StatsReply(ref resp) => StatsResp::size_of(resp),
            Message::QueueGetConfigRequest(ref req) => QueueGetConfigRequest::size_of(req),
            Message::QueueGetConfigReply(ref reply) => QueueGetConfigReply::size_of(reply),
        }
    }

    fn header_of(xid: u32, msg: &Message) -> Result<OfpHeader> {
        let sizeof_buf = Self::size_of(msg);
        if sizeof_buf > u16::MAX as usize {
            return Err(OfpSerializationError::LengthMismatch {
                what: "ofp_header.length",
                declared: u16::MAX as usize,
                actual: sizeof_buf,
            });
        }
        Ok(OfpHeader::new(OFP_VERSION,
                          Self::msg_code_of_message(msg) as u8,
                          sizeof_buf as u16,
                          xid))
    }

    fn marshal(xid: u32, msg: Message) -> Result<Vec<u8>> {
        ensure_struct_sizes();
        let hdr = Self::header_of(xid, &msg)?;
        let mut bytes = Vec::with_capacity(hdr.length());
        OfpHeader::marshal(&mut bytes, hdr)?;
        Message::marshal_body(&msg, &mut bytes)?;
        if bytes.len() != hdr.length() {
            return Err(OfpSerializationError::LengthMismatch {
                what: "ofp_header.length",
                declared: hdr.length(),
                actual: bytes.len(),
            });
        }
        debug!("marshaled {:?} xid {}: {} bytes",
               Self::msg_code_of_message(&msg),
               xid,
               bytes.len());
        Ok(bytes)
    }

    fn parse(header: &OfpHeader, buf: &[u8]) -> Result<(u32, Message)> {
        ensure_struct_sizes();
        let body = take_exact(buf, 0, header.body_length())?;
        let typ = header.type_code()?;
        debug!("parsing {:?} xid {}: {} body bytes", typ, header.xid(), body.len());
        let msg = match typ {
            MsgCode::Vendor => Message::Vendor(VendorHeader::parse(body)?),
            MsgCode::StatsReq => Message::StatsRequest(StatsReq::parse(body)?),
            MsgCode::StatsResp => Message::StatsReply(StatsResp::parse(body)?),
            MsgCode::QueueGetConfigReq => {
                Message::QueueGetConfigRequest(QueueGetConfigRequest::parse(body)?)
            }
            MsgCode::QueueGetConfigResp => {
                Message::QueueGetConfigReply(QueueGetConfigReply::parse(body)?)
            }
            t => return Err(OfpSerializationError::UnsupportedMessage { code: t as u8 }),
        };
        Ok((header.xid(), msg))
    }
}
