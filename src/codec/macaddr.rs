//! 48-bit MAC address helpers. Every 1905 TLV field that is a MAC address is exactly
//! 6 raw bytes on the wire (§6, "Wire: TLV field encoding"), so there is no
//! endianness to worry about here -- unlike the teacher's pcap-ng options, which
//! sit inside a section whose endianness can flip.

use super::WireError;
use bytes::{Buf, BufMut, BytesMut};
use std::fmt;

pub type MacAddr = [u8; 6];

pub const BROADCAST: MacAddr = [0xff; 6];
pub const MULTICAST_1905: MacAddr = [0x01, 0x80, 0xc2, 0x00, 0x00, 0x13];

pub fn is_multicast(mac: &MacAddr) -> bool {
    mac[0] & 0x01 != 0
}

pub fn read_mac(buf: &mut impl Buf) -> Result<MacAddr, WireError> {
    if buf.remaining() < 6 {
        return Err(WireError::Truncated {
            expected: 6,
            actual: buf.remaining(),
        });
    }
    let mut mac = [0u8; 6];
    buf.copy_to_slice(&mut mac);
    Ok(mac)
}

pub fn write_mac(out: &mut BytesMut, mac: &MacAddr) {
    out.put_slice(mac);
}

/// Wraps a [`MacAddr`] purely so it can be printed the way `tlv_struct_print_field`
/// formats `tlv_struct_print_format_mac` fields (`xx:xx:xx:xx:xx:xx`).
pub struct MacDisplay<'a>(pub &'a MacAddr);

impl<'a> fmt::Display for MacDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let m = self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            m[0], m[1], m[2], m[3], m[4], m[5]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let mac: MacAddr = [1, 2, 3, 4, 5, 6];
        let mut buf = BytesMut::new();
        write_mac(&mut buf, &mac);
        let mut frozen = buf.freeze();
        assert_eq!(read_mac(&mut frozen).unwrap(), mac);
    }

    #[test]
    fn display_format() {
        let mac: MacAddr = [0x01, 0x02, 0x02, 0x03, 0x04, 0x05];
        assert_eq!(MacDisplay(&mac).to_string(), "01:02:02:03:04:05");
    }
}
