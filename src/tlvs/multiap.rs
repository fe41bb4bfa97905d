//! Wi-Fi Multi-AP (EasyMesh) TLVs, layered on top of the 1905.1a TLV space
//! starting at 0x80 (§3.1, "Multi-AP TLVs"). These are generated by the Controller
//! and Agent roles in [`crate::multiap`] and never by the base 1905 layer itself.

use crate::codec::macaddr::{read_mac, write_mac, MacAddr};
use crate::codec::{read_count, read_u8, write_count, TlvBody, WireError};
use bytes::{BufMut, Bytes, BytesMut};

/// `SupportedService` (type 0x80): advertises whether the sender is a Multi-AP
/// Controller, Agent, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceEntry {
    pub is_controller: bool,
    pub is_agent: bool,
}

impl ServiceEntry {
    fn from_u8(v: u8) -> Self {
        ServiceEntry {
            is_controller: v == 0x00,
            is_agent: v == 0x01,
        }
    }

    fn to_u8(self) -> u8 {
        if self.is_controller {
            0x00
        } else {
            0x01
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SupportedService {
    pub services: Vec<ServiceEntry>,
}

impl TlvBody for SupportedService {
    const TYPE: u8 = 0x80;
    const NAME: &'static str = "SupportedService";

    fn parse(buf: &mut Bytes) -> Result<Self, WireError> {
        let count = read_count(buf)?;
        let mut services = Vec::with_capacity(count as usize);
        for _ in 0..count {
            services.push(ServiceEntry::from_u8(read_u8(buf)?));
        }
        if !buf.is_empty() {
            return Err(WireError::TrailingGarbage(buf.len(), Self::NAME));
        }
        Ok(SupportedService { services })
    }

    fn forge(&self, out: &mut BytesMut) {
        write_count(out, self.services.len()).expect("bounded by caller");
        for s in &self.services {
            out.put_u8(s.to_u8());
        }
    }

    fn wire_len(&self) -> usize {
        1 + self.services.len()
    }
}

/// `ApOperationalBss` (type 0x83): the BSSes a radio currently has up, grouped
/// by radio unique identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationalBss {
    pub bssid: MacAddr,
    pub ssid: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioBssGroup {
    pub radio_unique_identifier: MacAddr,
    pub bsses: Vec<OperationalBss>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApOperationalBss {
    pub radios: Vec<RadioBssGroup>,
}

impl TlvBody for ApOperationalBss {
    const TYPE: u8 = 0x83;
    const NAME: &'static str = "ApOperationalBss";

    fn parse(buf: &mut Bytes) -> Result<Self, WireError> {
        let radio_count = read_count(buf)?;
        let mut radios = Vec::with_capacity(radio_count as usize);
        for _ in 0..radio_count {
            let radio_unique_identifier = read_mac(buf)?;
            let bss_count = read_count(buf)?;
            let mut bsses = Vec::with_capacity(bss_count as usize);
            for _ in 0..bss_count {
                let bssid = read_mac(buf)?;
                let ssid_len = read_u8(buf)? as usize;
                let ssid = crate::codec::read_exact(buf, ssid_len)?;
                bsses.push(OperationalBss { bssid, ssid });
            }
            radios.push(RadioBssGroup {
                radio_unique_identifier,
                bsses,
            });
        }
        if !buf.is_empty() {
            return Err(WireError::TrailingGarbage(buf.len(), Self::NAME));
        }
        Ok(ApOperationalBss { radios })
    }

    fn forge(&self, out: &mut BytesMut) {
        write_count(out, self.radios.len()).expect("bounded by caller");
        for radio in &self.radios {
            write_mac(out, &radio.radio_unique_identifier);
            write_count(out, radio.bsses.len()).expect("bounded by caller");
            for bss in &radio.bsses {
                write_mac(out, &bss.bssid);
                out.put_u8(bss.ssid.len() as u8);
                out.put_slice(&bss.ssid);
            }
        }
    }

    fn wire_len(&self) -> usize {
        1 + self
            .radios
            .iter()
            .map(|r| 6 + 1 + r.bsses.iter().map(|b| 6 + 1 + b.ssid.len()).sum::<usize>())
            .sum::<usize>()
    }
}

/// `ApRadioBasicCapabilities` (type 0x84): per-radio BSS/channel capability
/// summary used during Multi-AP onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApRadioBasicCapabilities {
    pub radio_unique_identifier: MacAddr,
    pub max_bsses_supported: u8,
}

impl TlvBody for ApRadioBasicCapabilities {
    const TYPE: u8 = 0x84;
    const NAME: &'static str = "ApRadioBasicCapabilities";

    fn parse(buf: &mut Bytes) -> Result<Self, WireError> {
        let radio_unique_identifier = read_mac(buf)?;
        let max_bsses_supported = read_u8(buf)?;
        if !buf.is_empty() {
            return Err(WireError::TrailingGarbage(buf.len(), Self::NAME));
        }
        Ok(ApRadioBasicCapabilities {
            radio_unique_identifier,
            max_bsses_supported,
        })
    }

    fn forge(&self, out: &mut BytesMut) {
        write_mac(out, &self.radio_unique_identifier);
        out.put_u8(self.max_bsses_supported);
    }

    fn wire_len(&self) -> usize {
        7
    }
}

/// `BackhaulSteeringRequest` (type 0x8b): the Controller asking an Agent to move
/// its backhaul STA link to a different BSS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackhaulSteeringRequest {
    pub backhaul_sta_mac: MacAddr,
    pub target_bssid: MacAddr,
    pub operating_class: u8,
    pub channel_number: u8,
}

impl TlvBody for BackhaulSteeringRequest {
    const TYPE: u8 = 0x8b;
    const NAME: &'static str = "BackhaulSteeringRequest";

    fn parse(buf: &mut Bytes) -> Result<Self, WireError> {
        let backhaul_sta_mac = read_mac(buf)?;
        let target_bssid = read_mac(buf)?;
        let operating_class = read_u8(buf)?;
        let channel_number = read_u8(buf)?;
        if !buf.is_empty() {
            return Err(WireError::TrailingGarbage(buf.len(), Self::NAME));
        }
        Ok(BackhaulSteeringRequest {
            backhaul_sta_mac,
            target_bssid,
            operating_class,
            channel_number,
        })
    }

    fn forge(&self, out: &mut BytesMut) {
        write_mac(out, &self.backhaul_sta_mac);
        write_mac(out, &self.target_bssid);
        out.put_u8(self.operating_class);
        out.put_u8(self.channel_number);
    }

    fn wire_len(&self) -> usize {
        14
    }
}

/// `BackhaulSteeringResponse` (type 0x8c): the Agent's reply to a steering
/// request, with a non-zero `result_code` on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackhaulSteeringResponse {
    pub backhaul_sta_mac: MacAddr,
    pub target_bssid: MacAddr,
    pub result_code: u8,
}

impl TlvBody for BackhaulSteeringResponse {
    const TYPE: u8 = 0x8c;
    const NAME: &'static str = "BackhaulSteeringResponse";

    fn parse(buf: &mut Bytes) -> Result<Self, WireError> {
        let backhaul_sta_mac = read_mac(buf)?;
        let target_bssid = read_mac(buf)?;
        let result_code = read_u8(buf)?;
        if !buf.is_empty() {
            return Err(WireError::TrailingGarbage(buf.len(), Self::NAME));
        }
        Ok(BackhaulSteeringResponse {
            backhaul_sta_mac,
            target_bssid,
            result_code,
        })
    }

    fn forge(&self, out: &mut BytesMut) {
        write_mac(out, &self.backhaul_sta_mac);
        write_mac(out, &self.target_bssid);
        out.put_u8(self.result_code);
    }

    fn wire_len(&self) -> usize {
        13
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_service_roundtrip() {
        let tlv = SupportedService {
            services: vec![
                ServiceEntry {
                    is_controller: true,
                    is_agent: false,
                },
                ServiceEntry {
                    is_controller: false,
                    is_agent: true,
                },
            ],
        };
        let mut out = BytesMut::new();
        tlv.forge(&mut out);
        let mut frozen = out.freeze();
        assert_eq!(SupportedService::parse(&mut frozen).unwrap(), tlv);
    }

    #[test]
    fn operational_bss_roundtrip() {
        let tlv = ApOperationalBss {
            radios: vec![RadioBssGroup {
                radio_unique_identifier: [1; 6],
                bsses: vec![OperationalBss {
                    bssid: [2; 6],
                    ssid: Bytes::from_static(b"easymesh"),
                }],
            }],
        };
        let mut out = BytesMut::new();
        tlv.forge(&mut out);
        assert_eq!(out.len(), tlv.wire_len());
        let mut frozen = out.freeze();
        assert_eq!(ApOperationalBss::parse(&mut frozen).unwrap(), tlv);
    }
}
