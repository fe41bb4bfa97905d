//! Collaborator traits the AL entity depends on but does not implement itself
//! (§6 "External collaborators"). A production deployment supplies concrete
//! impls backed by `nl80211`/hostapd control sockets; this crate only defines
//! the seam and drives it.

use crate::codec::macaddr::MacAddr;
use crate::model::radio::RadioBand;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("radio {0:?} has no capacity for another BSS")]
    RadioFull(MacAddr),
    #[error("no such radio: {0:?}")]
    NoSuchRadio(MacAddr),
    #[error("driver rejected the request: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone)]
pub struct RadioDescriptor {
    pub radio_unique_identifier: MacAddr,
    pub band: RadioBand,
    pub max_bsses_supported: u8,
}

#[derive(Debug, Clone)]
pub struct BssInfo {
    pub bssid: MacAddr,
    pub ssid: String,
}

/// Enumerates the local Wi-Fi radios so [`crate::model::Network`] can be
/// populated at startup and whenever a radio is hot-plugged.
pub trait RadioEnumerator {
    fn enumerate(&self) -> Result<Vec<RadioDescriptor>, DriverError>;
}

/// The subset of driver operations the Multi-AP controller/agent logic needs
/// to actually stand up or tear down a BSS.
pub trait WifiDriver {
    fn add_ap(&mut self, radio: &MacAddr, ssid: &str, passphrase: &str) -> Result<BssInfo, DriverError>;

    fn add_sta(&mut self, radio: &MacAddr, bssid: &MacAddr, passphrase: &str) -> Result<(), DriverError>;

    fn set_backhaul_ssid(&mut self, radio: &MacAddr, ssid: &str, passphrase: &str) -> Result<(), DriverError>;

    fn tear_down(&mut self, bssid: &MacAddr) -> Result<(), DriverError>;
}

/// Builds the WSC M2 response to an M1 presented by a newly-joining agent.
/// Concrete implementations wrap a WSC/EAP state machine this crate does not
/// implement (§3.1 `Wsc` TLV docs).
pub trait WscEngine {
    fn build_m2(&mut self, m1: &[u8]) -> Result<Vec<u8>, DriverError>;
}
