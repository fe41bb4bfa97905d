//! Topology discovery and link metrics (§4.5): periodic broadcasts that keep
//! [`crate::model::Network`] in sync with what's actually on the wire, plus the
//! Topology Query/Response request-reply pair used when a neighbor needs the
//! full picture immediately instead of waiting for the next broadcast.

use crate::cmdu::{self, Cmdu};
use crate::codec::macaddr::MacAddr;
use crate::model::device::age_device;
use crate::model::Network;
use crate::tlvs::{
    AlMacAddress, ApOperationalBss, DeviceBridgingCapability, DeviceInformation, EndOfMessage, L2NeighborDevice,
    LocalInterface, MacAddress, Neighbor1905DeviceList, NeighborEntry, PowerOffInterface, SupportedService, Tlv,
};
use std::time::Duration;

/// How often Topology Discovery and Link Metric Query are broadcast, jittered
/// by up to 1 second so a whole segment of devices doesn't transmit in lockstep
/// (§4.5 "Periodic tasks").
pub const DISCOVERY_PERIOD: Duration = Duration::from_secs(60);
pub const DISCOVERY_JITTER: Duration = Duration::from_secs(1);

pub const STALE_TIMEOUT: Duration = Duration::from_secs(180);
pub const GONE_TIMEOUT: Duration = Duration::from_secs(600);

/// Builds the Topology Discovery CMDU broadcast every [`DISCOVERY_PERIOD`], one
/// per egress interface. `egress_interface` is that interface's own MAC, which
/// travels in a `MacAddress` TLV alongside the device-wide `AlMacAddress` TLV
/// (scenario 5: a neighbor must be able to tell both who sent this and which of
/// the sender's interfaces it arrived on).
pub fn build_topology_discovery(local_mac: MacAddr, egress_interface: MacAddr, message_id: u16) -> Cmdu {
    Cmdu::new(
        cmdu::TOPOLOGY_DISCOVERY,
        message_id,
        vec![
            Tlv::AlMacAddress(AlMacAddress {
                al_mac_address: local_mac,
            }),
            Tlv::MacAddress(MacAddress {
                mac_address: egress_interface,
            }),
            Tlv::EndOfMessage(EndOfMessage),
        ],
    )
}

/// Builds a Topology Notification, multicast whenever the local view of the
/// network changes in a way neighbors should hear about immediately rather
/// than waiting for the next periodic broadcast (e.g. a new AL device showing
/// up -- scenario 6).
pub fn build_topology_notification(local_mac: MacAddr, message_id: u16) -> Cmdu {
    Cmdu::new(
        cmdu::TOPOLOGY_NOTIFICATION,
        message_id,
        vec![
            Tlv::AlMacAddress(AlMacAddress {
                al_mac_address: local_mac,
            }),
            Tlv::EndOfMessage(EndOfMessage),
        ],
    )
}

/// Builds a Topology Query, sent unicast to a neighbor whenever its answer is
/// needed immediately (e.g. right after first discovery).
pub fn build_topology_query(message_id: u16) -> Cmdu {
    Cmdu::new(cmdu::TOPOLOGY_QUERY, message_id, vec![Tlv::EndOfMessage(EndOfMessage)])
}

/// Builds the Topology Response to a received Topology Query, describing every
/// local interface and bridging tuple known to `network`.
pub fn build_topology_response(network: &Network, message_id: u16) -> Option<Cmdu> {
    let local_idx = network.local_device?;
    let local = network.get(local_idx)?;

    let local_interfaces = local
        .interfaces
        .iter()
        .map(|iface| LocalInterface {
            mac_address: iface.mac_address,
            media_type: iface.media_type,
            media_specific_info: bytes::Bytes::new(),
        })
        .collect();

    let bridging_tuples = Vec::new(); // populated by the bridging-capability collector, not modeled here.

    let neighbors = local
        .neighbors
        .iter()
        .filter_map(|&idx| network.get(idx))
        .map(|n| NeighborEntry {
            al_mac_address: n.al_mac_address,
            bridges_1905: false,
        })
        .collect();

    Some(Cmdu::new(
        cmdu::TOPOLOGY_RESPONSE,
        message_id,
        vec![
            Tlv::DeviceInformation(DeviceInformation {
                al_mac_address: local.al_mac_address,
                local_interfaces,
            }),
            Tlv::DeviceBridgingCapability(DeviceBridgingCapability { bridging_tuples }),
            Tlv::Neighbor1905DeviceList(Neighbor1905DeviceList {
                local_mac_address: local.al_mac_address,
                neighbors,
            }),
            Tlv::PowerOffInterface(PowerOffInterface::default()),
            Tlv::L2NeighborDevice(L2NeighborDevice::default()),
            Tlv::SupportedService(SupportedService::default()),
            Tlv::ApOperationalBss(ApOperationalBss::default()),
            Tlv::EndOfMessage(EndOfMessage),
        ],
    ))
}

/// Applies a received Topology Discovery from `source` to `network`, inserting
/// the device if this is the first time it's been seen and marking it fresh.
/// Returns `true` if `source` was not already known, so the caller can react
/// (issue a Topology Query, multicast a Topology Notification -- scenarios 5
/// and 6).
pub fn handle_topology_discovery(network: &mut Network, source: MacAddr, now: Duration) -> bool {
    let is_new = network.lookup(&source).is_none();
    let idx = network.get_or_insert_remote(source);
    if let Some(device) = network.get_mut(idx) {
        device.touch_discovery(now);
    }
    is_new
}

/// Sweeps every remote device's state forward based on how long it's been
/// since its last Topology Discovery (§4.5). Returns the devices that just
/// transitioned to `Gone`, so the caller can emit a Topology Notification or
/// reap them.
pub fn sweep(network: &mut Network, now: Duration) -> Vec<MacAddr> {
    let mut newly_gone = Vec::new();
    for (_, device) in network.iter_mut() {
        if device.is_local() {
            continue;
        }
        let Some(last_seen) = device.last_topology_discovery else {
            continue;
        };
        let was_gone = device.state == crate::model::DeviceState::Gone;
        age_device(device, now.saturating_sub(last_seen));
        if !was_gone && device.state == crate::model::DeviceState::Gone {
            newly_gone.push(device.al_mac_address);
        }
    }
    newly_gone
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AlDevice;

    #[test]
    fn discovery_inserts_and_refreshes_a_device() {
        let mut network = Network::new();
        handle_topology_discovery(&mut network, [5; 6], Duration::from_secs(0));
        let idx = network.lookup(&[5; 6]).unwrap();
        assert_eq!(network.get(idx).unwrap().last_topology_discovery, Some(Duration::from_secs(0)));
        handle_topology_discovery(&mut network, [5; 6], Duration::from_secs(30));
        assert_eq!(network.get(idx).unwrap().last_topology_discovery, Some(Duration::from_secs(30)));
        assert_eq!(network.len(), 1);
    }

    #[test]
    fn sweep_reports_devices_that_just_went_gone() {
        let mut network = Network::new();
        network.set_local_device(AlDevice::new_local([1; 6]));
        handle_topology_discovery(&mut network, [5; 6], Duration::from_secs(0));
        let gone = sweep(&mut network, Duration::from_secs(601));
        assert_eq!(gone, vec![[5; 6]]);
        let gone_again = sweep(&mut network, Duration::from_secs(700));
        assert!(gone_again.is_empty(), "already-gone devices shouldn't be reported twice");
    }
}
