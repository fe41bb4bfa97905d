//! Link Metric TLVs: Query (0x08), Transmitter (0x09) and Receiver (0x0a).
//!
//! The query body's exact 8-byte layout isn't spelled out in prose anywhere; it
//! was reconstructed from the two reference captures (all-neighbors and
//! specific-neighbor): `neighbor_type(1) + neighbor_mac(6) + link_metrics_type(1)`.
//! Crucially the neighbor MAC field is present -- and must be preserved byte for
//! byte -- even when `neighbor_type` is `AllNeighbors`, where the sender is free
//! to leave it as whatever was in its buffer. Silently zeroing it here would
//! break the round-trip property for real-world captures.

use crate::codec::macaddr::{read_mac, write_mac, MacAddr};
use crate::codec::{read_u16, read_u32, read_u8, TlvBody, WireError};
use crate::tlvs::common::{LinkMetricsRequested, NeighborType};
use bytes::{Buf, BufMut, Bytes, BytesMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkMetricQuery {
    pub neighbor_type: NeighborType,
    /// Raw on the wire regardless of `neighbor_type`; see module docs.
    pub neighbor_mac: MacAddr,
    pub link_metrics_requested: LinkMetricsRequested,
}

impl TlvBody for LinkMetricQuery {
    const TYPE: u8 = 0x08;
    const NAME: &'static str = "LinkMetricQuery";

    fn parse(buf: &mut Bytes) -> Result<Self, WireError> {
        let neighbor_type = NeighborType::from_u8(read_u8(buf)?);
        let neighbor_mac = read_mac(buf)?;
        let link_metrics_requested = LinkMetricsRequested::from_u8(read_u8(buf)?);
        if !buf.is_empty() {
            return Err(WireError::TrailingGarbage(buf.len(), Self::NAME));
        }
        Ok(LinkMetricQuery {
            neighbor_type,
            neighbor_mac,
            link_metrics_requested,
        })
    }

    fn forge(&self, out: &mut BytesMut) {
        out.put_u8(self.neighbor_type.to_u8());
        write_mac(out, &self.neighbor_mac);
        out.put_u8(self.link_metrics_requested.to_u8());
    }

    fn wire_len(&self) -> usize {
        8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxLinkMetricEntry {
    pub local_interface: MacAddr,
    pub neighbor_interface: MacAddr,
    pub intf_type: u16,
    pub bridge: bool,
    pub packet_errors: u32,
    pub transmitted_packets: u32,
    pub mac_throughput_capacity: u16,
    pub link_availability: u16,
    pub phy_rate: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransmitterLinkMetric {
    pub local_al_mac: MacAddr,
    pub neighbor_al_mac: MacAddr,
    pub entries: Vec<TxLinkMetricEntry>,
}

impl TlvBody for TransmitterLinkMetric {
    const TYPE: u8 = 0x09;
    const NAME: &'static str = "TransmitterLinkMetric";

    fn parse(buf: &mut Bytes) -> Result<Self, WireError> {
        let local_al_mac = read_mac(buf)?;
        let neighbor_al_mac = read_mac(buf)?;
        let mut entries = Vec::new();
        while buf.has_remaining() {
            if buf.remaining() < 23 {
                return Err(WireError::Truncated {
                    expected: 23,
                    actual: buf.remaining(),
                });
            }
            entries.push(TxLinkMetricEntry {
                local_interface: read_mac(buf)?,
                neighbor_interface: read_mac(buf)?,
                intf_type: read_u16(buf)?,
                bridge: read_u8(buf)? != 0,
                packet_errors: read_u32(buf)?,
                transmitted_packets: read_u32(buf)?,
                mac_throughput_capacity: read_u16(buf)?,
                link_availability: read_u16(buf)?,
                phy_rate: read_u16(buf)?,
            });
        }
        Ok(TransmitterLinkMetric {
            local_al_mac,
            neighbor_al_mac,
            entries,
        })
    }

    fn forge(&self, out: &mut BytesMut) {
        write_mac(out, &self.local_al_mac);
        write_mac(out, &self.neighbor_al_mac);
        for e in &self.entries {
            write_mac(out, &e.local_interface);
            write_mac(out, &e.neighbor_interface);
            out.put_u16(e.intf_type);
            out.put_u8(if e.bridge { 1 } else { 0 });
            out.put_u32(e.packet_errors);
            out.put_u32(e.transmitted_packets);
            out.put_u16(e.mac_throughput_capacity);
            out.put_u16(e.link_availability);
            out.put_u16(e.phy_rate);
        }
    }

    fn wire_len(&self) -> usize {
        12 + 23 * self.entries.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RxLinkMetricEntry {
    pub local_interface: MacAddr,
    pub neighbor_interface: MacAddr,
    pub intf_type: u16,
    pub packet_errors: u32,
    pub packets_received: u32,
    pub rssi: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiverLinkMetric {
    pub local_al_mac: MacAddr,
    pub neighbor_al_mac: MacAddr,
    pub entries: Vec<RxLinkMetricEntry>,
}

impl TlvBody for ReceiverLinkMetric {
    const TYPE: u8 = 0x0a;
    const NAME: &'static str = "ReceiverLinkMetric";

    fn parse(buf: &mut Bytes) -> Result<Self, WireError> {
        let local_al_mac = read_mac(buf)?;
        let neighbor_al_mac = read_mac(buf)?;
        let mut entries = Vec::new();
        while buf.has_remaining() {
            if buf.remaining() < 19 {
                return Err(WireError::Truncated {
                    expected: 19,
                    actual: buf.remaining(),
                });
            }
            entries.push(RxLinkMetricEntry {
                local_interface: read_mac(buf)?,
                neighbor_interface: read_mac(buf)?,
                intf_type: read_u16(buf)?,
                packet_errors: read_u32(buf)?,
                packets_received: read_u32(buf)?,
                rssi: read_u8(buf)?,
            });
        }
        Ok(ReceiverLinkMetric {
            local_al_mac,
            neighbor_al_mac,
            entries,
        })
    }

    fn forge(&self, out: &mut BytesMut) {
        write_mac(out, &self.local_al_mac);
        write_mac(out, &self.neighbor_al_mac);
        for e in &self.entries {
            write_mac(out, &e.local_interface);
            write_mac(out, &e.neighbor_interface);
            out.put_u16(e.intf_type);
            out.put_u32(e.packet_errors);
            out.put_u32(e.packets_received);
            out.put_u8(e.rssi);
        }
    }

    fn wire_len(&self) -> usize {
        12 + 19 * self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_roundtrips_with_garbage_mac_when_all_neighbors() {
        let tlv = LinkMetricQuery {
            neighbor_type: NeighborType::AllNeighbors,
            neighbor_mac: [0xde, 0xad, 0xbe, 0xef, 0x00, 0x01],
            link_metrics_requested: LinkMetricsRequested::TxAndRx,
        };
        let mut out = BytesMut::new();
        tlv.forge(&mut out);
        assert_eq!(out.len(), 8);
        let mut frozen = out.freeze();
        assert_eq!(LinkMetricQuery::parse(&mut frozen).unwrap(), tlv);
    }

    #[test]
    fn transmitter_roundtrip() {
        let tlv = TransmitterLinkMetric {
            local_al_mac: [1; 6],
            neighbor_al_mac: [2; 6],
            entries: vec![TxLinkMetricEntry {
                local_interface: [3; 6],
                neighbor_interface: [4; 6],
                intf_type: 0x0100,
                bridge: true,
                packet_errors: 7,
                transmitted_packets: 1000,
                mac_throughput_capacity: 600,
                link_availability: 100,
                phy_rate: 866,
            }],
        };
        let mut out = BytesMut::new();
        tlv.forge(&mut out);
        assert_eq!(out.len(), tlv.wire_len());
        let mut frozen = out.freeze();
        assert_eq!(TransmitterLinkMetric::parse(&mut frozen).unwrap(), tlv);
    }
}
