//! Owns every [`AlDevice`] (local and remote) in the topology, keyed for lookup
//! by AL MAC address since that's how every incoming CMDU identifies its sender.

use crate::codec::macaddr::MacAddr;
use crate::container::{Arena, ArenaIndex};
use crate::model::device::AlDevice;
use crate::model::radio::Radio;
use crate::model::registrar::Registrar;
use std::collections::HashMap;

#[derive(Default)]
pub struct Network {
    devices: Arena<AlDevice>,
    by_mac: HashMap<MacAddr, ArenaIndex>,
    pub local_device: Option<ArenaIndex>,
    pub radios: Vec<Radio>,
    pub registrar: Option<Registrar>,
}

impl Network {
    pub fn new() -> Self {
        Network::default()
    }

    pub fn set_local_device(&mut self, device: AlDevice) -> ArenaIndex {
        let mac = device.al_mac_address;
        let idx = self.devices.insert(device);
        self.by_mac.insert(mac, idx);
        self.local_device = Some(idx);
        idx
    }

    pub fn get_or_insert_remote(&mut self, mac: MacAddr) -> ArenaIndex {
        if let Some(&idx) = self.by_mac.get(&mac) {
            return idx;
        }
        let idx = self.devices.insert(AlDevice::new_remote(mac));
        self.by_mac.insert(mac, idx);
        idx
    }

    pub fn lookup(&self, mac: &MacAddr) -> Option<ArenaIndex> {
        self.by_mac.get(mac).copied()
    }

    pub fn get(&self, idx: ArenaIndex) -> Option<&AlDevice> {
        self.devices.get(idx)
    }

    pub fn get_mut(&mut self, idx: ArenaIndex) -> Option<&mut AlDevice> {
        self.devices.get_mut(idx)
    }

    pub fn remove(&mut self, idx: ArenaIndex) -> Option<AlDevice> {
        let removed = self.devices.remove(idx)?;
        self.by_mac.remove(&removed.al_mac_address);
        Some(removed)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ArenaIndex, &AlDevice)> {
        self.devices.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ArenaIndex, &mut AlDevice)> {
        self.devices.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_devices_are_deduplicated_by_mac() {
        let mut net = Network::new();
        let a = net.get_or_insert_remote([1; 6]);
        let b = net.get_or_insert_remote([1; 6]);
        assert_eq!(a, b);
        assert_eq!(net.len(), 1);
    }

    #[test]
    fn removing_a_device_drops_its_mac_lookup() {
        let mut net = Network::new();
        let idx = net.get_or_insert_remote([2; 6]);
        net.remove(idx);
        assert!(net.lookup(&[2; 6]).is_none());
        assert!(net.get(idx).is_none());
    }
}
