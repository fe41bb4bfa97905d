//! A single 1905 device in the topology, local or remote.

use crate::codec::macaddr::MacAddr;
use crate::container::{Arena, ArenaIndex, PtrArray};
use crate::model::interface::Interface;
use std::time::Duration;

/// Lifecycle of a remote device as tracked by topology discovery (§4.5).
///
/// `Unknown` is never actually stored -- it exists so state-transition code can
/// match on "no entry yet" and "explicitly unknown" the same way -- every entry
/// that exists in [`Network`](super::Network) starts at `Discovered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    Unknown,
    Discovered,
    Stale,
    Gone,
}

#[derive(Debug, Clone)]
pub struct AlDevice {
    pub al_mac_address: MacAddr,
    pub state: DeviceState,
    pub interfaces: PtrArray<Interface>,
    /// Other devices this one has reported as 1905 neighbors, resolved to arena
    /// handles once both ends are known. Symmetric and potentially cyclic, hence
    /// the arena rather than plain ownership (see module docs on [`super`]).
    pub neighbors: Vec<ArenaIndex>,
    pub last_topology_discovery: Option<Duration>,
    pub last_topology_response: Option<Duration>,
    /// Set only on the locally-running device; `false` for every remote entry.
    is_local: bool,
    /// Whether this device's Multi-AP registrar parameters have been configured
    /// by the Controller. Only meaningful when `is_local` is true.
    configured: bool,
}

impl AlDevice {
    pub fn new_remote(al_mac_address: MacAddr) -> Self {
        AlDevice {
            al_mac_address,
            state: DeviceState::Discovered,
            interfaces: PtrArray::new(),
            neighbors: Vec::new(),
            last_topology_discovery: None,
            last_topology_response: None,
            is_local: false,
            configured: false,
        }
    }

    pub fn new_local(al_mac_address: MacAddr) -> Self {
        AlDevice {
            al_mac_address,
            state: DeviceState::Discovered,
            interfaces: PtrArray::new(),
            neighbors: Vec::new(),
            last_topology_discovery: None,
            last_topology_response: None,
            is_local: true,
            configured: false,
        }
    }

    pub fn is_local(&self) -> bool {
        self.is_local
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Sets the local device's "has the Multi-AP controller configured my
    /// registrar parameters yet" flag.
    ///
    /// The original's `localDeviceSetConfigured` unconditionally set the flag to
    /// `true` regardless of the `configured` argument it was passed -- callers
    /// that tried to *unset* it on a reset silently failed. This resolves that
    /// (§9, Open Question 1) by actually assigning the argument.
    pub fn set_configured(&mut self, configured: bool) {
        self.configured = configured;
    }

    pub fn touch_discovery(&mut self, now: Duration) {
        self.last_topology_discovery = Some(now);
        if self.state == DeviceState::Stale || self.state == DeviceState::Gone {
            self.state = DeviceState::Discovered;
        }
    }
}

/// Advances `device`'s lifecycle given how long it's been since its last
/// Topology Discovery message, per the 180s/600s timeouts in §4.5.
pub fn age_device(device: &mut AlDevice, since_last_seen: Duration) {
    if device.is_local {
        return;
    }
    device.state = if since_last_seen >= Duration::from_secs(600) {
        DeviceState::Gone
    } else if since_last_seen >= Duration::from_secs(180) {
        DeviceState::Stale
    } else {
        DeviceState::Discovered
    };
}

pub type DeviceArena = Arena<AlDevice>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_configured_actually_toggles() {
        let mut d = AlDevice::new_local([1; 6]);
        d.set_configured(true);
        assert!(d.is_configured());
        d.set_configured(false);
        assert!(!d.is_configured());
    }

    #[test]
    fn ages_through_stale_to_gone() {
        let mut d = AlDevice::new_remote([1; 6]);
        age_device(&mut d, Duration::from_secs(60));
        assert_eq!(d.state, DeviceState::Discovered);
        age_device(&mut d, Duration::from_secs(200));
        assert_eq!(d.state, DeviceState::Stale);
        age_device(&mut d, Duration::from_secs(700));
        assert_eq!(d.state, DeviceState::Gone);
    }

    #[test]
    fn touching_discovery_revives_a_stale_device() {
        let mut d = AlDevice::new_remote([1; 6]);
        age_device(&mut d, Duration::from_secs(200));
        assert_eq!(d.state, DeviceState::Stale);
        d.touch_discovery(Duration::from_secs(201));
        assert_eq!(d.state, DeviceState::Discovered);
    }
}
