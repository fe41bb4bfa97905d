//! Wi-Fi Multi-AP (EasyMesh) provisioning glue (§4.6): the AP-Autoconfiguration
//! Search/Response/WSC handshake an Agent runs against a Controller to receive
//! its backhaul/fronthaul credentials, layered on top of the base 1905 CMDU
//! exchange rather than replacing it.

use crate::cmdu::{self, Cmdu};
use crate::codec::macaddr::MacAddr;
use crate::driver::{DriverError, WifiDriver, WscEngine};
use crate::model::{Network, Registrar};
use crate::tlvs::common::{FreqBand, Role};
use crate::tlvs::{
    AutoconfigFreqBand, EndOfMessage, MacAddress, SearchedRole, SupportedFreqBand, SupportedRole, Tlv, Wsc,
};

/// Builds an AP-Autoconfiguration Search, broadcast by an unconfigured Agent
/// looking for a registrar on `band`.
pub fn build_search(local_mac: MacAddr, message_id: u16, band: FreqBand) -> Cmdu {
    Cmdu::new(
        cmdu::AP_AUTOCONFIGURATION_SEARCH,
        message_id,
        vec![
            Tlv::AlMacAddress(crate::tlvs::AlMacAddress {
                al_mac_address: local_mac,
            }),
            Tlv::SearchedRole(SearchedRole { role: Role::Registrar }),
            Tlv::AutoconfigFreqBand(AutoconfigFreqBand { freq_band: band }),
            Tlv::EndOfMessage(EndOfMessage),
        ],
    )
}

/// Builds the Controller's reply to a Search, only ever sent by a device that
/// actually holds the [`Registrar`] role for `band`.
pub fn build_response(registrar: &Registrar, message_id: u16, band: FreqBand) -> Cmdu {
    Cmdu::new(
        cmdu::AP_AUTOCONFIGURATION_RESPONSE,
        message_id,
        vec![
            Tlv::SupportedRole(SupportedRole { role: Role::Registrar }),
            Tlv::SupportedFreqBand(SupportedFreqBand { freq_band: band }),
            Tlv::MacAddress(MacAddress {
                mac_address: registrar.al_mac_address,
            }),
            Tlv::EndOfMessage(EndOfMessage),
        ],
    )
}

/// Wraps an M1 WSC message (produced locally by the joining Agent's radio) in
/// an AP-Autoconfiguration WSC CMDU addressed to the registrar.
pub fn build_wsc_m1(message_id: u16, m1: Vec<u8>) -> Cmdu {
    Cmdu::new(
        cmdu::AP_AUTOCONFIGURATION_WSC,
        message_id,
        vec![Tlv::Wsc(Wsc { wsc_frame: m1.into() }), Tlv::EndOfMessage(EndOfMessage)],
    )
}

/// On the Controller side: given a received WSC CMDU carrying M1, asks `wsc`
/// to build M2 and wraps it for the reply. Returns `None` if the CMDU carried
/// no `Wsc` TLV (malformed exchange -- the caller should just drop it, §7).
pub fn handle_wsc_m1(wsc: &mut dyn WscEngine, message_id: u16, received: &Cmdu) -> Result<Option<Cmdu>, DriverError> {
    let m1 = received.tlvs.iter().find_map(|tlv| match tlv {
        Tlv::Wsc(w) => Some(w.wsc_frame.clone()),
        _ => None,
    });
    let Some(m1) = m1 else { return Ok(None) };
    let m2 = wsc.build_m2(&m1)?;
    Ok(Some(Cmdu::new(
        cmdu::AP_AUTOCONFIGURATION_WSC,
        message_id,
        vec![Tlv::Wsc(Wsc { wsc_frame: m2.into() }), Tlv::EndOfMessage(EndOfMessage)],
    )))
}

/// On the Agent side: applies a received M2 by handing it straight to the local
/// driver as the new backhaul configuration. Real M2 parsing (extracting SSID
/// and passphrase out of the WSC TLV attributes) belongs to the `WscEngine`
/// collaborator; here we only know the raw frame bytes, so this is a thin
/// plumbing function rather than a protocol implementation.
pub fn apply_m2(driver: &mut dyn WifiDriver, radio: &MacAddr, ssid: &str, passphrase: &str) -> Result<(), DriverError> {
    driver.set_backhaul_ssid(radio, ssid, passphrase)
}

/// Marks the local device as configured once its backhaul has been set up,
/// correcting the original's unconditional-`true` bug (§9, Open Question 1).
pub fn mark_configured(network: &mut Network, configured: bool) {
    if let Some(idx) = network.local_device {
        if let Some(device) = network.get_mut(idx) {
            device.set_configured(configured);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoWsc;
    impl WscEngine for EchoWsc {
        fn build_m2(&mut self, m1: &[u8]) -> Result<Vec<u8>, DriverError> {
            Ok(m1.iter().rev().copied().collect())
        }
    }

    #[test]
    fn controller_answers_m1_with_m2() {
        let m1 = build_wsc_m1(1, vec![1, 2, 3]);
        let mut wsc = EchoWsc;
        let response = handle_wsc_m1(&mut wsc, 2, &m1).unwrap().unwrap();
        let body = response
            .tlvs
            .iter()
            .find_map(|t| match t {
                Tlv::Wsc(w) => Some(w.wsc_frame.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(&body[..], &[3, 2, 1]);
    }

    #[test]
    fn search_and_response_roundtrip_through_the_wire() {
        let search = build_search([1; 6], 5, FreqBand::Band5Ghz);
        let bytes = search.forge().unwrap().freeze();
        let parsed = Cmdu::parse(&mut bytes.clone()).unwrap();
        assert_eq!(parsed, search);
    }
}
