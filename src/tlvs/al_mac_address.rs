//! `AlMacAddress` (type 0x01): the 1905 AL MAC address of the CMDU's originator.

use crate::codec::macaddr::{read_mac, write_mac, MacAddr};
use crate::codec::{TlvBody, WireError};
use bytes::{Bytes, BytesMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlMacAddress {
    pub al_mac_address: MacAddr,
}

impl TlvBody for AlMacAddress {
    const TYPE: u8 = 0x01;
    const NAME: &'static str = "AlMacAddress";

    fn parse(buf: &mut Bytes) -> Result<Self, WireError> {
        let al_mac_address = read_mac(buf)?;
        if !buf.is_empty() {
            return Err(WireError::TrailingGarbage(buf.len(), Self::NAME));
        }
        Ok(AlMacAddress { al_mac_address })
    }

    fn forge(&self, out: &mut BytesMut) {
        write_mac(out, &self.al_mac_address);
    }

    fn wire_len(&self) -> usize {
        6
    }
}
