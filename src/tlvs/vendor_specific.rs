//! `VendorSpecific` (type 0x0b): an OUI followed by an opaque vendor payload.
//! Carried verbatim; nothing in the core inspects the payload.

use crate::codec::{read_exact, TlvBody, WireError};
use bytes::{BufMut, Bytes, BytesMut};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorSpecific {
    pub vendor_oui: [u8; 3],
    pub vendor_data: Bytes,
}

impl TlvBody for VendorSpecific {
    const TYPE: u8 = 0x0b;
    const NAME: &'static str = "VendorSpecific";

    fn parse(buf: &mut Bytes) -> Result<Self, WireError> {
        let oui_bytes = read_exact(buf, 3)?;
        let mut vendor_oui = [0u8; 3];
        vendor_oui.copy_from_slice(&oui_bytes);
        let vendor_data = buf.split_off(0);
        Ok(VendorSpecific {
            vendor_oui,
            vendor_data,
        })
    }

    fn forge(&self, out: &mut BytesMut) {
        out.put_slice(&self.vendor_oui);
        out.put_slice(&self.vendor_data);
    }

    fn wire_len(&self) -> usize {
        3 + self.vendor_data.len()
    }
}
