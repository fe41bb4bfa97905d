//! `L2NeighborDevice` (type 0x16): neighbors discovered by the 1905.1a layer-2
//! topology discovery mechanism (distinct from the 1905 neighbor list, which
//! only covers devices that exchanged Topology Discovery messages).

use crate::codec::macaddr::{read_mac, write_mac, MacAddr};
use crate::codec::{read_count, read_u16, write_count, TlvBody, WireError};
use bytes::{BufMut, Bytes, BytesMut};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct L2Neighbor {
    pub neighbor_mac: MacAddr,
    pub behind_mac_addresses: Vec<MacAddr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalInterfaceNeighbors {
    pub local_interface: MacAddr,
    pub neighbors: Vec<L2Neighbor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct L2NeighborDevice {
    pub local_interfaces: Vec<LocalInterfaceNeighbors>,
}

impl TlvBody for L2NeighborDevice {
    const TYPE: u8 = 0x16;
    const NAME: &'static str = "L2NeighborDevice";

    fn parse(buf: &mut Bytes) -> Result<Self, WireError> {
        let iface_count = read_count(buf)?;
        let mut local_interfaces = Vec::with_capacity(iface_count as usize);
        for _ in 0..iface_count {
            let local_interface = read_mac(buf)?;
            let neighbor_count = read_u16(buf)?;
            let mut neighbors = Vec::with_capacity(neighbor_count as usize);
            for _ in 0..neighbor_count {
                let neighbor_mac = read_mac(buf)?;
                let behind_count = read_u16(buf)?;
                let mut behind_mac_addresses = Vec::with_capacity(behind_count as usize);
                for _ in 0..behind_count {
                    behind_mac_addresses.push(read_mac(buf)?);
                }
                neighbors.push(L2Neighbor {
                    neighbor_mac,
                    behind_mac_addresses,
                });
            }
            local_interfaces.push(LocalInterfaceNeighbors {
                local_interface,
                neighbors,
            });
        }
        if !buf.is_empty() {
            return Err(WireError::TrailingGarbage(buf.len(), Self::NAME));
        }
        Ok(L2NeighborDevice { local_interfaces })
    }

    fn forge(&self, out: &mut BytesMut) {
        write_count(out, self.local_interfaces.len()).expect("bounded by caller");
        for iface in &self.local_interfaces {
            write_mac(out, &iface.local_interface);
            out.put_u16(iface.neighbors.len() as u16);
            for n in &iface.neighbors {
                write_mac(out, &n.neighbor_mac);
                out.put_u16(n.behind_mac_addresses.len() as u16);
                for mac in &n.behind_mac_addresses {
                    write_mac(out, mac);
                }
            }
        }
    }

    fn wire_len(&self) -> usize {
        1 + self
            .local_interfaces
            .iter()
            .map(|iface| {
                6 + 2
                    + iface
                        .neighbors
                        .iter()
                        .map(|n| 6 + 2 + 6 * n.behind_mac_addresses.len())
                        .sum::<usize>()
            })
            .sum::<usize>()
    }
}
