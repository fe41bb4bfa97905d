//! The Multi-AP registrar role a device may hold (§4.6): the entity that owns
//! backhaul/fronthaul credentials and answers AP-Autoconfiguration Responses.

use crate::codec::macaddr::MacAddr;

#[derive(Debug, Clone)]
pub struct Registrar {
    pub al_mac_address: MacAddr,
    pub backhaul_ssid: String,
    pub backhaul_passphrase: String,
}

impl Registrar {
    pub fn new(al_mac_address: MacAddr, backhaul_ssid: String, backhaul_passphrase: String) -> Self {
        Registrar {
            al_mac_address,
            backhaul_ssid,
            backhaul_passphrase,
        }
    }
}
