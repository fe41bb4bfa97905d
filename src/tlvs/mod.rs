//! The master TLV catalogue (§3.1) and the list-level parse/forge entry points
//! that drive every [`TlvBody`] impl uniformly -- the Rust replacement for the
//! original's single generic `tlv_struct_parse`/`tlv_struct_forge` pair.

pub mod common;

pub mod al_mac_address;
pub mod autoconfig_freq_band;
pub mod device_bridging_capability;
pub mod device_information;
pub mod end_of_message;
pub mod l2_neighbor_device;
pub mod link_metric;
pub mod mac_address;
pub mod multiap;
pub mod neighbor_1905;
pub mod non1905_neighbor;
pub mod power_off_interface;
pub mod push_button;
pub mod searched_role;
pub mod supported_freq_band;
pub mod supported_role;
pub mod vendor_specific;
pub mod wsc;

pub use al_mac_address::AlMacAddress;
pub use autoconfig_freq_band::AutoconfigFreqBand;
pub use device_bridging_capability::DeviceBridgingCapability;
pub use device_information::{DeviceInformation, LocalInterface};
pub use end_of_message::EndOfMessage;
pub use l2_neighbor_device::L2NeighborDevice;
pub use link_metric::{LinkMetricQuery, ReceiverLinkMetric, TransmitterLinkMetric};
pub use mac_address::MacAddress;
pub use multiap::{
    ApOperationalBss, ApRadioBasicCapabilities, BackhaulSteeringRequest, BackhaulSteeringResponse,
    SupportedService,
};
pub use neighbor_1905::Neighbor1905DeviceList;
pub use non1905_neighbor::Non1905NeighborDeviceList;
pub use power_off_interface::PowerOffInterface;
pub use push_button::{PushButtonEventNotification, PushButtonJoinNotification};
pub use searched_role::SearchedRole;
pub use supported_freq_band::SupportedFreqBand;
pub use supported_role::SupportedRole;
pub use vendor_specific::VendorSpecific;
pub use wsc::Wsc;

use crate::codec::{TlvBody, WireError};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::fmt;

macro_rules! tlv_enum {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        /// A single parsed TLV. Unrecognised types (including every TLV-EX
        /// extension the device doesn't implement) fall through to `Unknown`,
        /// which carries the raw body so it can still be re-forged unchanged --
        /// the Rust analogue of the original silently skipping types its
        /// `tlv_struct_description` table had no entry for.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Tlv {
            $($variant($ty),)+
            Unknown { tlv_type: u8, body: Bytes },
        }

        impl Tlv {
            pub fn tlv_type(&self) -> u8 {
                match self {
                    $(Tlv::$variant(_) => <$ty as TlvBody>::TYPE,)+
                    Tlv::Unknown { tlv_type, .. } => *tlv_type,
                }
            }

            pub fn name(&self) -> &'static str {
                match self {
                    $(Tlv::$variant(_) => <$ty as TlvBody>::NAME,)+
                    Tlv::Unknown { .. } => "Unknown",
                }
            }

            fn parse_body(tlv_type: u8, mut body: Bytes) -> Result<Tlv, WireError> {
                Ok(match tlv_type {
                    $(<$ty as TlvBody>::TYPE => Tlv::$variant(<$ty as TlvBody>::parse(&mut body)?),)+
                    other => Tlv::Unknown { tlv_type: other, body },
                })
            }

            fn forge_body(&self, out: &mut BytesMut) {
                match self {
                    $(Tlv::$variant(v) => v.forge(out),)+
                    Tlv::Unknown { body, .. } => out.put_slice(body),
                }
            }

            pub fn body_len(&self) -> usize {
                match self {
                    $(Tlv::$variant(v) => v.wire_len(),)+
                    Tlv::Unknown { body, .. } => body.len(),
                }
            }
        }
    };
}

tlv_enum!(
    EndOfMessage(EndOfMessage),
    AlMacAddress(AlMacAddress),
    MacAddress(MacAddress),
    DeviceInformation(DeviceInformation),
    DeviceBridgingCapability(DeviceBridgingCapability),
    Non1905NeighborDeviceList(Non1905NeighborDeviceList),
    Neighbor1905DeviceList(Neighbor1905DeviceList),
    LinkMetricQuery(LinkMetricQuery),
    TransmitterLinkMetric(TransmitterLinkMetric),
    ReceiverLinkMetric(ReceiverLinkMetric),
    VendorSpecific(VendorSpecific),
    Wsc(Wsc),
    SearchedRole(SearchedRole),
    AutoconfigFreqBand(AutoconfigFreqBand),
    SupportedRole(SupportedRole),
    SupportedFreqBand(SupportedFreqBand),
    PushButtonEventNotification(PushButtonEventNotification),
    PushButtonJoinNotification(PushButtonJoinNotification),
    PowerOffInterface(PowerOffInterface),
    L2NeighborDevice(L2NeighborDevice),
    SupportedService(SupportedService),
    ApOperationalBss(ApOperationalBss),
    ApRadioBasicCapabilities(ApRadioBasicCapabilities),
    BackhaulSteeringRequest(BackhaulSteeringRequest),
    BackhaulSteeringResponse(BackhaulSteeringResponse),
);

impl fmt::Display for Tlv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (type {:#04x}, {} bytes)", self.name(), self.tlv_type(), self.body_len())
    }
}

/// Parses a flat run of TLVs out of a CMDU body, stopping at (and consuming) the
/// mandatory `EndOfMessage` TLV, the same terminator discipline as
/// `tlv_struct_parse`'s caller loop in `cmdu.c`.
pub fn parse_tlvs(buf: &mut Bytes) -> Result<Vec<Tlv>, WireError> {
    let mut tlvs = Vec::new();
    loop {
        if buf.remaining() < 3 {
            return Err(WireError::Truncated {
                expected: 3,
                actual: buf.remaining(),
            });
        }
        let tlv_type = buf.get_u8();
        let len = buf.get_u16() as usize;
        if buf.remaining() < len {
            return Err(WireError::LengthOverflow(tlv_type, len as u16, buf.remaining()));
        }
        let body = buf.copy_to_bytes(len);
        let is_eom = tlv_type == EndOfMessage::TYPE;
        tlvs.push(Tlv::parse_body(tlv_type, body)?);
        if is_eom {
            break;
        }
    }
    Ok(tlvs)
}

/// Forges exactly the given TLVs, in order, with no auto-termination. Callers
/// that need a guaranteed trailing `EndOfMessage` should use [`forge_tlvs`];
/// this is for callers (fragment forging) that must control the terminator
/// themselves.
pub(crate) fn forge_tlvs_exact(tlvs: &[Tlv], out: &mut BytesMut) -> Result<(), WireError> {
    for tlv in tlvs {
        let len = tlv.body_len();
        if len > u16::MAX as usize {
            return Err(WireError::BodyTooLarge(tlv.name(), len));
        }
        out.put_u8(tlv.tlv_type());
        out.put_u16(len as u16);
        tlv.forge_body(out);
    }
    Ok(())
}

/// Forges a list of TLVs, appending a trailing `EndOfMessage` if the caller
/// didn't already include one.
pub fn forge_tlvs(tlvs: &[Tlv], out: &mut BytesMut) -> Result<(), WireError> {
    forge_tlvs_exact(tlvs, out)?;
    if !tlvs.iter().any(|t| t.tlv_type() == EndOfMessage::TYPE) {
        out.put_u8(EndOfMessage::TYPE);
        out.put_u16(0);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_a_short_tlv_list() {
        let tlvs = vec![
            Tlv::AlMacAddress(AlMacAddress {
                al_mac_address: [1, 2, 3, 4, 5, 6],
            }),
            Tlv::EndOfMessage(EndOfMessage),
        ];
        let mut out = BytesMut::new();
        forge_tlvs(&tlvs, &mut out).unwrap();
        let mut frozen = out.freeze();
        let parsed = parse_tlvs(&mut frozen).unwrap();
        assert_eq!(parsed, tlvs);
    }

    #[test]
    fn unknown_tlv_type_is_preserved_verbatim() {
        let mut out = BytesMut::new();
        out.put_u8(0x7f);
        out.put_u16(3);
        out.put_slice(&[0xaa, 0xbb, 0xcc]);
        out.put_u8(EndOfMessage::TYPE);
        out.put_u16(0);
        let mut frozen = out.clone().freeze();
        let parsed = parse_tlvs(&mut frozen).unwrap();
        assert_eq!(
            parsed[0],
            Tlv::Unknown {
                tlv_type: 0x7f,
                body: Bytes::from_static(&[0xaa, 0xbb, 0xcc]),
            }
        );
        let mut reforged = BytesMut::new();
        forge_tlvs(&parsed, &mut reforged).unwrap();
        assert_eq!(reforged, out);
    }
}
