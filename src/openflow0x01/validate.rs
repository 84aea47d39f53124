//! Semantic checks on decoded and to-be-encoded values, and the struct-size self check.

use std::sync::OnceLock;

use log::{debug, error};

use crate::error::{OfpSerializationError, Result};
use crate::ofp_header::OFP_HEADER_SIZE;
use crate::ofp_utils::{check_fixed_size_string, FixedString};
use crate::openflow0x01::layout::*;
use crate::openflow0x01::list::{BoundedList, ListItem};
use crate::openflow0x01::queue::{PacketQueue, QueueGetConfigReply, QueueGetConfigRequest,
                                 QueuePropHeader, QueueProperty, OFPQ_MIN_RATE_MAX, OFPQT_NONE};
use crate::openflow0x01::stats::{AggregateStatsReply, AggregateStatsRequest, DescStats, FlowStats,
                                 FlowStatsRequest, Pattern, PortStats, PortStatsRequest,
                                 QueueStats, QueueStatsRequest, TableStats, VendorHeader};
use crate::openflow0x01::{MessageType, OFPP_ALL, OFPP_LOCAL, OFPP_MAX, OFPP_NONE};

/// Semantic constraints a value must satisfy beyond its wire shape.
///
/// `validate` is checked after a record is decoded and before it is encoded.
/// `validate_encode` adds constraints that only bind what this side emits.
pub trait Validate {
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn validate_encode(&self) -> Result<()> {
        self.validate()
    }
}

/// Port of a port stats request: a physical port, `OFPP_LOCAL`, or `OFPP_NONE` for all ports.
pub fn check_port_stats_port(port: u16) -> Result<()> {
    if check_physical_port(port).is_ok() || port == OFPP_LOCAL || port == OFPP_NONE {
        Ok(())
    } else {
        Err(OfpSerializationError::InvalidPort { port: port })
    }
}

/// Port of a queue stats request: a physical port, `OFPP_LOCAL`, or `OFPP_ALL`.
pub fn check_queue_stats_port(port: u16) -> Result<()> {
    if check_physical_port(port).is_ok() || port == OFPP_LOCAL || port == OFPP_ALL {
        Ok(())
    } else {
        Err(OfpSerializationError::InvalidPort { port: port })
    }
}

/// A physical port, strictly below `OFPP_MAX`. `OFPP_MAX` itself names no port. Every port
/// check in the codec builds on this one.
pub fn check_physical_port(port: u16) -> Result<()> {
    if port < OFPP_MAX {
        Ok(())
    } else {
        Err(OfpSerializationError::InvalidPort { port: port })
    }
}

/// `name` fits a NUL-terminated field of `size` bytes.
pub fn check_name(name: &FixedString, size: usize) -> Result<()> {
    check_fixed_size_string(name, size)
}

/// The rate of a min-rate property, if it is configured at all.
pub fn min_rate_configured(rate: u16) -> Option<u16> {
    if rate > OFPQ_MIN_RATE_MAX {
        None
    } else {
        Some(rate)
    }
}

fn emitted<F>(marshal: F) -> Result<usize>
    where F: FnOnce(&mut Vec<u8>) -> Result<()>
{
    let mut bytes = vec![];
    marshal(&mut bytes)?;
    Ok(bytes.len())
}

fn fixed<T: FixedLayout>(value: &T) -> Result<usize> {
    emitted(|bytes| encode_fixed(value, bytes).map(|_| ()))
}

/// With its OpenFlow header in front.
fn with_header<T: MessageType>(body: &T) -> Result<usize> {
    Ok(OFP_HEADER_SIZE + emitted(|bytes| T::marshal(body, bytes))?)
}

/// Marshal a minimal sample of every record kind and compare the emitted byte count with
/// the documented size. Also checks that every packed descriptor has the documented size.
pub fn check_struct_sizes() -> Result<()> {
    for s in STRUCT_SIZES.iter() {
        if s.documented != s.layout {
            return Err(OfpSerializationError::StructSizeAssertionFailed {
                record: s.record,
                expected: s.documented,
                actual: s.layout,
            });
        }
    }

    let flow_request = FlowStatsRequest {
        pattern: Pattern::match_all(),
        table_id: 0,
        out_port: OFPP_NONE,
    };
    let flow_stats: FlowStats = FlowStats {
        table_id: 0,
        pattern: Pattern::match_all(),
        duration_sec: 0,
        duration_nsec: 0,
        priority: 0,
        idle_timeout: 0,
        hard_timeout: 0,
        cookie: 0,
        packet_count: 0,
        byte_count: 0,
        actions: BoundedList::empty(),
    };
    let table_stats = TableStats {
        table_id: 0,
        name: FixedString::default(),
        wildcards: 0,
        max_entries: 0,
        active_count: 0,
        lookup_count: 0,
        matched_count: 0,
    };
    let queue_stats = QueueStats {
        port_no: 0,
        queue_id: 0,
        tx_bytes: 0,
        tx_packets: 0,
        tx_errors: 0,
    };
    let aggregate_reply = AggregateStatsReply {
        packet_count: 0,
        byte_count: 0,
        flow_count: 0,
    };
    let aggregate_request: AggregateStatsRequest = flow_request;

    let samples: [(&'static str, usize); 16] = [
        ("ofp_flow_stats", emitted(|bytes| FlowStats::marshal(&flow_stats, bytes))?),
        ("ofp_flow_stats_request", fixed(&flow_request)?),
        ("ofp_aggregate_stats_request", fixed(&aggregate_request)?),
        ("ofp_aggregate_stats_reply", fixed(&aggregate_reply)?),
        ("ofp_table_stats", fixed(&table_stats)?),
        ("ofp_port_stats_request", fixed(&PortStatsRequest::all_ports())?),
        ("ofp_port_stats", fixed(&PortStats::unsupported(0))?),
        ("ofp_vendor_header",
         with_header(&VendorHeader {
             vendor: 0,
             data: vec![],
         })?),
        ("ofp_queue_prop_header",
         fixed(&QueuePropHeader {
             property: OFPQT_NONE,
             len: QUEUE_PROP_HEADER_SIZE as u16,
         })?),
        ("ofp_queue_prop_min_rate",
         emitted(|bytes| QueueProperty::marshal(&QueueProperty::min_rate(0), bytes))?),
        ("ofp_packet_queue",
         emitted(|bytes| PacketQueue::marshal(&PacketQueue::new(0, vec![]), bytes))?),
        ("ofp_queue_get_config_request", with_header(&QueueGetConfigRequest { port: 0 })?),
        ("ofp_queue_get_config_reply", with_header(&QueueGetConfigReply::new(0, vec![]))?),
        ("ofp_queue_stats_request",
         fixed(&QueueStatsRequest {
             port_no: 0,
             queue_id: 0,
         })?),
        ("ofp_queue_stats", fixed(&queue_stats)?),
        ("ofp_desc_stats", fixed(&DescStats::default())?),
    ];
    for &(record, size) in samples.iter() {
        assert_size(record, size)?;
    }
    debug!("struct sizes verified for {} records", samples.len());
    Ok(())
}

/// Run `check_struct_sizes` once per process.
///
/// # Panics
///
/// Panics if the check fails: the codec would otherwise emit malformed messages.
pub fn ensure_struct_sizes() {
    static CHECKED: OnceLock<()> = OnceLock::new();
    CHECKED.get_or_init(|| {
        if let Err(e) = check_struct_sizes() {
            error!("{}", e);
            panic!("{}", e);
        }
    });
}
