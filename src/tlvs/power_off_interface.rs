//! `PowerOffInterface` (type 0x14): interfaces the sender has powered down,
//! carried in a Vendor-Specific-wrapped "goodbye" so neighbors can age them out
//! promptly instead of waiting for the stale timeout.

use crate::codec::macaddr::{read_mac, write_mac, MacAddr};
use crate::codec::{read_count, read_u16, write_count, TlvBody, WireError};
use bytes::{BufMut, Bytes, BytesMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoweredOffInterface {
    pub interface_address: MacAddr,
    pub media_type: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PowerOffInterface {
    pub interfaces: Vec<PoweredOffInterface>,
}

impl TlvBody for PowerOffInterface {
    const TYPE: u8 = 0x14;
    const NAME: &'static str = "PowerOffInterface";

    fn parse(buf: &mut Bytes) -> Result<Self, WireError> {
        let count = read_count(buf)?;
        let mut interfaces = Vec::with_capacity(count as usize);
        for _ in 0..count {
            interfaces.push(PoweredOffInterface {
                interface_address: read_mac(buf)?,
                media_type: read_u16(buf)?,
            });
        }
        if !buf.is_empty() {
            return Err(WireError::TrailingGarbage(buf.len(), Self::NAME));
        }
        Ok(PowerOffInterface { interfaces })
    }

    fn forge(&self, out: &mut BytesMut) {
        write_count(out, self.interfaces.len()).expect("bounded by caller");
        for i in &self.interfaces {
            write_mac(out, &i.interface_address);
            out.put_u16(i.media_type);
        }
    }

    fn wire_len(&self) -> usize {
        1 + 8 * self.interfaces.len()
    }
}
