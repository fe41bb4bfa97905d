//! `DeviceBridgingCapability` (type 0x04): groups of interfaces the device
//! bridges together at layer 2.

use crate::codec::macaddr::{read_mac, write_mac, MacAddr};
use crate::codec::{read_count, write_count, TlvBody, WireError};
use bytes::{Bytes, BytesMut};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgingTuple {
    pub bridged_interfaces: Vec<MacAddr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceBridgingCapability {
    pub bridging_tuples: Vec<BridgingTuple>,
}

impl TlvBody for DeviceBridgingCapability {
    const TYPE: u8 = 0x04;
    const NAME: &'static str = "DeviceBridgingCapability";

    fn parse(buf: &mut Bytes) -> Result<Self, WireError> {
        let tuple_count = read_count(buf)?;
        let mut bridging_tuples = Vec::with_capacity(tuple_count as usize);
        for _ in 0..tuple_count {
            let iface_count = read_count(buf)?;
            let mut bridged_interfaces = Vec::with_capacity(iface_count as usize);
            for _ in 0..iface_count {
                bridged_interfaces.push(read_mac(buf)?);
            }
            bridging_tuples.push(BridgingTuple { bridged_interfaces });
        }
        if !buf.is_empty() {
            return Err(WireError::TrailingGarbage(buf.len(), Self::NAME));
        }
        Ok(DeviceBridgingCapability { bridging_tuples })
    }

    fn forge(&self, out: &mut BytesMut) {
        write_count(out, self.bridging_tuples.len()).expect("bounded by caller");
        for tuple in &self.bridging_tuples {
            write_count(out, tuple.bridged_interfaces.len()).expect("bounded by caller");
            for mac in &tuple.bridged_interfaces {
                write_mac(out, mac);
            }
        }
    }

    fn wire_len(&self) -> usize {
        1 + self
            .bridging_tuples
            .iter()
            .map(|t| 1 + 6 * t.bridged_interfaces.len())
            .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let tlv = DeviceBridgingCapability {
            bridging_tuples: vec![BridgingTuple {
                bridged_interfaces: vec![[1; 6], [2; 6]],
            }],
        };
        let mut out = BytesMut::new();
        tlv.forge(&mut out);
        let mut frozen = out.freeze();
        assert_eq!(DeviceBridgingCapability::parse(&mut frozen).unwrap(), tlv);
    }
}
