//! `Non1905NeighborDeviceList` (type 0x06): neighbors seen on a local interface
//! that do not speak 1905 themselves.

use crate::codec::macaddr::{read_mac, write_mac, MacAddr};
use crate::codec::{TlvBody, WireError};
use bytes::{Bytes, BytesMut};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Non1905NeighborDeviceList {
    pub local_mac_address: MacAddr,
    pub non1905_neighbors: Vec<MacAddr>,
}

impl TlvBody for Non1905NeighborDeviceList {
    const TYPE: u8 = 0x06;
    const NAME: &'static str = "Non1905NeighborDeviceList";

    fn parse(buf: &mut Bytes) -> Result<Self, WireError> {
        let local_mac_address = read_mac(buf)?;
        let mut non1905_neighbors = Vec::new();
        while !buf.is_empty() {
            non1905_neighbors.push(read_mac(buf)?);
        }
        Ok(Non1905NeighborDeviceList {
            local_mac_address,
            non1905_neighbors,
        })
    }

    fn forge(&self, out: &mut BytesMut) {
        write_mac(out, &self.local_mac_address);
        for mac in &self.non1905_neighbors {
            write_mac(out, mac);
        }
    }

    fn wire_len(&self) -> usize {
        6 + 6 * self.non1905_neighbors.len()
    }
}
