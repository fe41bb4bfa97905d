//! A local or remote 1905 interface and, where applicable, its Wi-Fi specifics.

use crate::codec::macaddr::MacAddr;
use crate::model::radio::RadioBand;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceKind {
    Ethernet,
    Wifi,
    Other(u16),
}

impl InterfaceKind {
    /// Classifies a raw 1905 media type field (§3.1, `DeviceInformation`'s
    /// `media_type`). The high byte selects the media family; `0x01xx` is Wi-Fi.
    pub fn from_media_type(media_type: u16) -> Self {
        match media_type {
            0x0000..=0x0001 => InterfaceKind::Ethernet,
            0x0100..=0x010f => InterfaceKind::Wifi,
            other => InterfaceKind::Other(other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InterfaceWifi {
    pub band: RadioBand,
    pub bssid: Option<MacAddr>,
    pub ssid: Option<String>,
    /// `true` once this BSS has been handed its Multi-AP registrar configuration
    /// (backhaul SSID/key) by [`crate::multiap`].
    pub configured: bool,
}

#[derive(Debug, Clone)]
pub struct Interface {
    pub mac_address: MacAddr,
    pub media_type: u16,
    pub kind: InterfaceKind,
    pub wifi: Option<InterfaceWifi>,
    pub bridged: bool,
}

impl Interface {
    pub fn new(mac_address: MacAddr, media_type: u16) -> Self {
        let kind = InterfaceKind::from_media_type(media_type);
        let wifi = matches!(kind, InterfaceKind::Wifi).then(|| InterfaceWifi {
            band: RadioBand::from_media_type(media_type),
            bssid: None,
            ssid: None,
            configured: false,
        });
        Interface {
            mac_address,
            media_type,
            kind,
            wifi,
            bridged: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_ethernet_and_wifi() {
        assert_eq!(InterfaceKind::from_media_type(0x0000), InterfaceKind::Ethernet);
        assert_eq!(InterfaceKind::from_media_type(0x0103), InterfaceKind::Wifi);
        assert_eq!(InterfaceKind::from_media_type(0x0200), InterfaceKind::Other(0x0200));
    }
}
