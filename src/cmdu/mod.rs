//! CMDU (Control Message Data Unit) header parse/forge and the message-type
//! catalogue (§4.1, §4.2). Fragmentation across Ethernet frames lives in
//! [`framer`].

pub mod framer;

use crate::codec::{read_u16, read_u8, TlvBody, WireError};
use crate::tlvs::{forge_tlvs, forge_tlvs_exact, parse_tlvs, Tlv};
use bytes::{Buf, BufMut, Bytes, BytesMut};

pub const MESSAGE_VERSION_1905_1_2013: u8 = 0x00;

pub const TOPOLOGY_DISCOVERY: u16 = 0x0000;
pub const TOPOLOGY_NOTIFICATION: u16 = 0x0001;
pub const TOPOLOGY_QUERY: u16 = 0x0002;
pub const TOPOLOGY_RESPONSE: u16 = 0x0003;
pub const VENDOR_SPECIFIC: u16 = 0x0004;
pub const LINK_METRIC_QUERY: u16 = 0x0005;
pub const LINK_METRIC_RESPONSE: u16 = 0x0006;
pub const AP_AUTOCONFIGURATION_SEARCH: u16 = 0x0007;
pub const AP_AUTOCONFIGURATION_RESPONSE: u16 = 0x0008;
pub const AP_AUTOCONFIGURATION_WSC: u16 = 0x0009;
pub const AP_AUTOCONFIGURATION_RENEW: u16 = 0x000a;
pub const PUSH_BUTTON_EVENT_NOTIFICATION: u16 = 0x000b;
pub const PUSH_BUTTON_JOIN_NOTIFICATION: u16 = 0x000c;

const FLAG_LAST_FRAGMENT: u8 = 0x80;
const FLAG_RELAY_INDICATOR: u8 = 0x40;

/// Whether `message_type` is eligible for multicast relaying across bridged
/// interfaces (the "relay indicator" in the CMDU header only has effect for
/// these types; §9, Open Question 3's resolution).
pub fn is_relayable(message_type: u16) -> bool {
    matches!(
        message_type,
        TOPOLOGY_DISCOVERY
            | TOPOLOGY_NOTIFICATION
            | VENDOR_SPECIFIC
            | PUSH_BUTTON_EVENT_NOTIFICATION
            | PUSH_BUTTON_JOIN_NOTIFICATION
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cmdu {
    pub message_version: u8,
    pub message_type: u16,
    pub message_id: u16,
    pub fragment_id: u8,
    pub last_fragment: bool,
    pub relay_indicator: bool,
    pub tlvs: Vec<Tlv>,
}

impl Cmdu {
    pub fn new(message_type: u16, message_id: u16, tlvs: Vec<Tlv>) -> Self {
        Cmdu {
            message_version: MESSAGE_VERSION_1905_1_2013,
            message_type,
            message_id,
            fragment_id: 0,
            last_fragment: true,
            relay_indicator: false,
            tlvs,
        }
    }

    /// Parses a single, already-reassembled CMDU (header + TLV stream). Callers
    /// that need fragment reassembly should go through [`framer::Framer`] first.
    pub fn parse(buf: &mut Bytes) -> Result<Self, WireError> {
        let message_version = read_u8(buf)?;
        let _reserved = read_u8(buf)?;
        let message_type = read_u16(buf)?;
        let message_id = read_u16(buf)?;
        let fragment_id = read_u8(buf)?;
        let flags = read_u8(buf)?;
        let tlvs = parse_tlvs(buf)?;
        Ok(Cmdu {
            message_version,
            message_type,
            message_id,
            fragment_id,
            last_fragment: flags & FLAG_LAST_FRAGMENT != 0,
            relay_indicator: flags & FLAG_RELAY_INDICATOR != 0,
            tlvs,
        })
    }

    pub fn forge(&self) -> Result<BytesMut, WireError> {
        self.forge_inner(true)
    }

    /// Forges the header and exactly the TLVs in `self.tlvs`, without
    /// auto-appending an `EndOfMessage` when the list lacks one. Used by
    /// [`framer::fragment`] for non-final fragments, which must not carry a
    /// terminator of their own.
    pub(crate) fn forge_raw(&self) -> Result<BytesMut, WireError> {
        self.forge_inner(false)
    }

    fn forge_inner(&self, auto_terminate: bool) -> Result<BytesMut, WireError> {
        let mut out = BytesMut::new();
        out.put_u8(self.message_version);
        out.put_u8(0);
        out.put_u16(self.message_type);
        out.put_u16(self.message_id);
        out.put_u8(self.fragment_id);
        let mut flags = 0u8;
        if self.last_fragment {
            flags |= FLAG_LAST_FRAGMENT;
        }
        if self.relay_indicator {
            flags |= FLAG_RELAY_INDICATOR;
        }
        out.put_u8(flags);
        if auto_terminate {
            forge_tlvs(&self.tlvs, &mut out)?;
        } else {
            forge_tlvs_exact(&self.tlvs, &mut out)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tlvs::{AlMacAddress, EndOfMessage};

    #[test]
    fn header_roundtrip_with_last_fragment_set() {
        let cmdu = Cmdu::new(
            TOPOLOGY_QUERY,
            0x1234,
            vec![
                Tlv::AlMacAddress(AlMacAddress {
                    al_mac_address: [1, 2, 3, 4, 5, 6],
                }),
                Tlv::EndOfMessage(EndOfMessage),
            ],
        );
        let mut bytes = cmdu.forge().unwrap().freeze();
        let parsed = Cmdu::parse(&mut bytes).unwrap();
        assert_eq!(parsed, cmdu);
        assert!(parsed.last_fragment);
        assert!(!is_relayable(TOPOLOGY_QUERY));
        assert!(is_relayable(TOPOLOGY_DISCOVERY));
    }

    #[test]
    fn scenario_1_link_metric_query_all_neighbors() {
        let raw: &[u8] = &[
            0x00, 0x00, 0x00, 0x05, 0x00, 0x07, 0x00, 0x80, 0x08, 0x00, 0x08, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x02, 0x00, 0x00, 0x00,
        ];
        let mut buf = Bytes::copy_from_slice(raw);
        let cmdu = Cmdu::parse(&mut buf).unwrap();
        assert_eq!(cmdu.message_type, LINK_METRIC_QUERY);
        assert_eq!(cmdu.message_id, 0x0007);
        assert_eq!(cmdu.fragment_id, 0);
        assert!(cmdu.last_fragment);
        assert!(!cmdu.relay_indicator);
        match &cmdu.tlvs[0] {
            Tlv::LinkMetricQuery(q) => {
                assert_eq!(q.neighbor_type, crate::tlvs::common::NeighborType::AllNeighbors);
                assert_eq!(
                    q.link_metrics_requested,
                    crate::tlvs::common::LinkMetricsRequested::TxAndRx
                );
            }
            other => panic!("expected LinkMetricQuery, got {other:?}"),
        }
        assert_eq!(cmdu.forge().unwrap().freeze(), Bytes::copy_from_slice(raw));
    }

    #[test]
    fn scenario_2_link_metric_query_specific_neighbor() {
        let raw: &[u8] = &[
            0x00, 0x00, 0x00, 0x05, 0x09, 0x2c, 0x00, 0x80, 0x08, 0x00, 0x08, 0x01, 0x01, 0x02, 0x02, 0x03, 0x04,
            0x05, 0x02, 0x00, 0x00, 0x00,
        ];
        let mut buf = Bytes::copy_from_slice(raw);
        let cmdu = Cmdu::parse(&mut buf).unwrap();
        assert_eq!(cmdu.message_id, 0x092c);
        match &cmdu.tlvs[0] {
            Tlv::LinkMetricQuery(q) => {
                assert_eq!(q.neighbor_type, crate::tlvs::common::NeighborType::SpecificNeighbor);
                assert_eq!(q.neighbor_mac, [0x01, 0x02, 0x02, 0x03, 0x04, 0x05]);
            }
            other => panic!("expected LinkMetricQuery, got {other:?}"),
        }
        assert_eq!(cmdu.forge().unwrap().freeze(), Bytes::copy_from_slice(raw));
    }

    #[test]
    fn scenario_3_topology_query() {
        let raw: &[u8] = &[0x00, 0x00, 0x00, 0x02, 0x00, 0x09, 0x00, 0x80, 0x00, 0x00, 0x00];
        let mut buf = Bytes::copy_from_slice(raw);
        let cmdu = Cmdu::parse(&mut buf).unwrap();
        assert_eq!(cmdu.message_type, TOPOLOGY_QUERY);
        assert_eq!(cmdu.message_id, 9);
        assert_eq!(cmdu.tlvs.len(), 1);
        assert!(matches!(cmdu.tlvs[0], Tlv::EndOfMessage(_)));
        assert_eq!(cmdu.forge().unwrap().freeze(), Bytes::copy_from_slice(raw));
    }

    #[test]
    fn scenario_4_wrong_ethertype_is_rejected_before_cmdu_parsing() {
        use crate::dispatcher::socket::ETHERTYPE_1905;
        assert_eq!(ETHERTYPE_1905, 0x893a);
        assert_ne!(0x893bu16, ETHERTYPE_1905);
    }
}
