//! `DeviceInformation` (type 0x03): the AL MAC address plus one entry per local
//! 1905 interface (its MAC, its media type, and an opaque media-specific info
//! blob whose shape depends on media type -- §3.1).

use crate::codec::macaddr::{read_mac, write_mac, MacAddr};
use crate::codec::{read_count, read_exact, read_u16, read_u8, write_count, TlvBody, WireError};
use bytes::{Buf, BufMut, Bytes, BytesMut};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalInterface {
    pub mac_address: MacAddr,
    pub media_type: u16,
    /// Opaque per-media-type struct (§3.1 "media type" table); kept as raw bytes
    /// since most deployments only ever inspect `media_type` itself.
    pub media_specific_info: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInformation {
    pub al_mac_address: MacAddr,
    pub local_interfaces: Vec<LocalInterface>,
}

impl TlvBody for DeviceInformation {
    const TYPE: u8 = 0x03;
    const NAME: &'static str = "DeviceInformation";

    fn parse(buf: &mut Bytes) -> Result<Self, WireError> {
        let al_mac_address = read_mac(buf)?;
        let count = read_count(buf)?;
        let mut local_interfaces = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let mac_address = read_mac(buf)?;
            let media_type = read_u16(buf)?;
            let info_len = read_u8(buf)? as usize;
            let media_specific_info = read_exact(buf, info_len)?;
            local_interfaces.push(LocalInterface {
                mac_address,
                media_type,
                media_specific_info,
            });
        }
        if !buf.is_empty() {
            return Err(WireError::TrailingGarbage(buf.len(), Self::NAME));
        }
        Ok(DeviceInformation {
            al_mac_address,
            local_interfaces,
        })
    }

    fn forge(&self, out: &mut BytesMut) {
        write_mac(out, &self.al_mac_address);
        write_count(out, self.local_interfaces.len()).expect("bounded by caller");
        for iface in &self.local_interfaces {
            write_mac(out, &iface.mac_address);
            out.put_u16(iface.media_type);
            out.put_u8(iface.media_specific_info.len() as u8);
            out.put_slice(&iface.media_specific_info);
        }
    }

    fn wire_len(&self) -> usize {
        6 + 1
            + self
                .local_interfaces
                .iter()
                .map(|i| 6 + 2 + 1 + i.media_specific_info.len())
                .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_no_interfaces() {
        let tlv = DeviceInformation {
            al_mac_address: [1, 2, 3, 4, 5, 6],
            local_interfaces: vec![],
        };
        let mut out = BytesMut::new();
        tlv.forge(&mut out);
        let mut frozen = out.freeze();
        assert_eq!(DeviceInformation::parse(&mut frozen).unwrap(), tlv);
    }

    #[test]
    fn roundtrip_with_interface() {
        let tlv = DeviceInformation {
            al_mac_address: [1, 2, 3, 4, 5, 6],
            local_interfaces: vec![LocalInterface {
                mac_address: [0xaa; 6],
                media_type: 0x0100,
                media_specific_info: Bytes::from_static(&[0xde, 0xad]),
            }],
        };
        let mut out = BytesMut::new();
        tlv.forge(&mut out);
        assert_eq!(out.len(), tlv.wire_len());
        let mut frozen = out.freeze();
        assert_eq!(DeviceInformation::parse(&mut frozen).unwrap(), tlv);
    }
}
