//! `MacAddress` (type 0x02): the MAC address of the interface a CMDU was sent from,
//! used during AP-Autoconfiguration and push-button exchanges.

use crate::codec::macaddr::{read_mac, write_mac, MacAddr};
use crate::codec::{TlvBody, WireError};
use bytes::{Bytes, BytesMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacAddress {
    pub mac_address: MacAddr,
}

impl TlvBody for MacAddress {
    const TYPE: u8 = 0x02;
    const NAME: &'static str = "MacAddress";

    fn parse(buf: &mut Bytes) -> Result<Self, WireError> {
        let mac_address = read_mac(buf)?;
        if !buf.is_empty() {
            return Err(WireError::TrailingGarbage(buf.len(), Self::NAME));
        }
        Ok(MacAddress { mac_address })
    }

    fn forge(&self, out: &mut BytesMut) {
        write_mac(out, &self.mac_address);
    }

    fn wire_len(&self) -> usize {
        6
    }
}
