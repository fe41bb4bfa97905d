//! `Neighbor1905DeviceList` (type 0x07): 1905 neighbors seen on a local interface,
//! each flagged with whether it bridges further 1905 devices behind it.

use crate::codec::macaddr::{read_mac, write_mac, MacAddr};
use crate::codec::{read_u8, TlvBody, WireError};
use bytes::{Buf, BufMut, Bytes, BytesMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborEntry {
    pub al_mac_address: MacAddr,
    pub bridges_1905: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighbor1905DeviceList {
    pub local_mac_address: MacAddr,
    pub neighbors: Vec<NeighborEntry>,
}

impl TlvBody for Neighbor1905DeviceList {
    const TYPE: u8 = 0x07;
    const NAME: &'static str = "Neighbor1905DeviceList";

    fn parse(buf: &mut Bytes) -> Result<Self, WireError> {
        let local_mac_address = read_mac(buf)?;
        let mut neighbors = Vec::new();
        while buf.has_remaining() {
            let al_mac_address = read_mac(buf)?;
            let flags = read_u8(buf)?;
            neighbors.push(NeighborEntry {
                al_mac_address,
                bridges_1905: flags & 0x80 != 0,
            });
        }
        Ok(Neighbor1905DeviceList {
            local_mac_address,
            neighbors,
        })
    }

    fn forge(&self, out: &mut BytesMut) {
        write_mac(out, &self.local_mac_address);
        for n in &self.neighbors {
            write_mac(out, &n.al_mac_address);
            out.put_u8(if n.bridges_1905 { 0x80 } else { 0x00 });
        }
    }

    fn wire_len(&self) -> usize {
        6 + 7 * self.neighbors.len()
    }
}
