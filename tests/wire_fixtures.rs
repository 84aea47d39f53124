use rust_ofp_stats::openflow0x01::layout::{self, STRUCT_SIZES};
use rust_ofp_stats::openflow0x01::stats::{StatsRespBody, OFPFW_ALL};
use rust_ofp_stats::openflow0x01::validate;
use rust_ofp_stats::openflow0x01::{decode_fixed, encode_fixed, BoundedList, FlowStats, Message,
                                   PacketQueue, Pattern, PortStats, QueueGetConfigReply,
                                   QueueProperty, QueueStats, RawAction, StatsResp, TableStats,
                                   OFPQ_MIN_RATE_UNCFG, OFP_COUNTER_UNSUPPORTED};
use rust_ofp_stats::{OfpMessage, OfpSerializationError};

fn bytes(hex: &str) -> Vec<u8> {
    hex::decode(hex.replace(' ', "")).unwrap()
}

const QUEUE_STATS: &str = "0001 0000 00000005 00000000000003e8 000000000000000a 0000000000000000";

#[test]
fn queue_stats_record() {
    let raw = bytes(QUEUE_STATS);
    assert_eq!(raw.len(), 32);
    let (stats, consumed): (QueueStats, usize) = decode_fixed(&raw, 0).unwrap();
    assert_eq!(consumed, 32);
    assert_eq!(stats,
               QueueStats {
                   port_no: 1,
                   queue_id: 5,
                   tx_bytes: 1000,
                   tx_packets: 10,
                   tx_errors: 0,
               });
    let mut out = vec![];
    assert_eq!(encode_fixed(&stats, &mut out).unwrap(), 32);
    assert_eq!(out, raw);
}

#[test]
fn queue_stats_reply_frame() {
    let raw = bytes(&format!("01 11 002c 00000001 0005 0000 {}", QUEUE_STATS));
    let (xid, msg) = Message::parse_frame(&raw).unwrap();
    assert_eq!(xid, 1);
    match msg {
        Message::StatsReply(StatsResp { flags: 0, body: StatsRespBody::Queue(ref stats) }) => {
            assert_eq!(stats.len(), 1);
            assert_eq!(stats[0].tx_bytes, 1000);
        }
        ref other => panic!("unexpected {:?}", other),
    }
    assert_eq!(Message::marshal(xid, msg).unwrap(), raw);
}

#[test]
fn queue_config_reply_frame_keeps_unknown_properties() {
    let raw = bytes("01 15 0030 0000002a \
                     0001 000000000000 \
                     00000001 0020 0000 \
                     0001 0010 00000000 01f4 000000000000 \
                     0063 0008 deadbeef");
    let (xid, msg) = Message::parse_frame(&raw).unwrap();
    assert_eq!(xid, 42);
    let reply = match msg {
        Message::QueueGetConfigReply(ref reply) => reply.clone(),
        ref other => panic!("unexpected {:?}", other),
    };
    assert_eq!(reply.port, 1);
    assert_eq!(reply.queues.len(), 1);
    let queue = &reply.queues.items()[0];
    assert_eq!(queue.queue_id, 1);
    assert_eq!(queue.properties.len(), 2);
    assert_eq!(queue.properties.items()[0].configured_rate(), Some(500));
    assert_eq!(queue.properties.items()[1].property(), 99);
    assert_eq!(Message::marshal(xid, msg).unwrap(), raw);
}

#[test]
fn queue_config_reply_with_trailing_garbage_in_envelope() {
    // The header covers 4 bytes that cannot hold a packet queue.
    let raw = bytes("01 15 0014 00000001 0001 000000000000 00000000");
    assert!(matches!(Message::parse_frame(&raw),
                     Err(OfpSerializationError::LengthMismatch { declared: 4, actual: 0, .. })));
}

#[test]
fn flow_stats_reply_frame() {
    let fs: FlowStats = FlowStats {
        table_id: 0,
        pattern: Pattern::match_all(),
        duration_sec: 1,
        duration_nsec: 2,
        priority: 3,
        idle_timeout: 4,
        hard_timeout: 5,
        cookie: 6,
        packet_count: 7,
        byte_count: 8,
        actions: BoundedList::new(vec![RawAction::new(0, &[0, 2, 0, 0]).unwrap()]),
    };
    let msg = Message::StatsReply(StatsResp {
        flags: 0,
        body: StatsRespBody::Flow(BoundedList::new(vec![fs.clone()])),
    });
    let raw = Message::marshal(3, msg.clone()).unwrap();
    assert_eq!(raw.len(), 8 + 4 + 96);
    assert_eq!(&raw[..4], &bytes("01 11 006c")[..]);
    assert_eq!(&raw[12..14], &bytes("0060")[..]);
    assert_eq!(&raw[16..20], &OFPFW_ALL.to_be_bytes());
    assert_eq!(&raw[100..], &bytes("0000 0008 0002 0000")[..]);
    assert_eq!(Message::parse_frame(&raw).unwrap(), (3, msg));
}

#[test]
fn table_name_capacity() {
    let mut table = TableStats {
        table_id: 1,
        name: "x".repeat(31).into(),
        wildcards: 0,
        max_entries: 0,
        active_count: 0,
        lookup_count: 0,
        matched_count: 0,
    };
    let mut out = vec![];
    encode_fixed(&table, &mut out).unwrap();
    assert_eq!(out.len(), 64);
    table.name = "x".repeat(32).into();
    assert!(matches!(encode_fixed(&table, &mut vec![]),
                     Err(OfpSerializationError::NameTooLong { len: 32, max: 31 })));
}

#[test]
fn sentinels_pass_through_untouched() {
    let stats = PortStats::unsupported(0xfffe);
    let mut out = vec![];
    encode_fixed(&stats, &mut out).unwrap();
    let (decoded, _): (PortStats, usize) = decode_fixed(&out, 0).unwrap();
    assert_eq!(decoded.rx_crc_err, OFP_COUNTER_UNSUPPORTED);

    let queue = PacketQueue::new(1, vec![QueueProperty::min_rate(OFPQ_MIN_RATE_UNCFG)]);
    let raw = Message::marshal(5,
                               Message::QueueGetConfigReply(QueueGetConfigReply::new(2,
                                                                                     vec![queue])))
        .unwrap();
    assert_eq!(&raw[32..34], &[0xff, 0xff]);
    match Message::parse_frame(&raw).unwrap().1 {
        Message::QueueGetConfigReply(reply) => {
            let prop = &reply.queues.items()[0].properties.items()[0];
            assert_eq!(*prop, QueueProperty::MinRate { rate: OFPQ_MIN_RATE_UNCFG });
            assert_eq!(prop.configured_rate(), None);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn documented_struct_sizes() {
    validate::check_struct_sizes().unwrap();
    assert_eq!(STRUCT_SIZES.len(), 16);
    assert_eq!(layout::documented_size("ofp_flow_stats"), Some(88));
    assert_eq!(layout::documented_size("ofp_desc_stats"), Some(1056));
    assert_eq!(layout::documented_size("ofp_queue_get_config_reply"), Some(16));
    assert_eq!(layout::documented_size("ofp_hello"), None);
}
