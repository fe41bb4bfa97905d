/*!
An IEEE 1905.1/1a Abstraction-Layer (AL) entity: the daemon that turns a set of
heterogeneous local interfaces (Ethernet, Wi-Fi, MoCA, ...) into one managed
1905 network, with Wi-Fi Multi-AP (EasyMesh) controller/agent provisioning
layered on top.

The crate is organised the way a CMDU flows through it:

* [`codec`] and [`tlvs`] -- wire format: parsing and forging TLVs.
* [`cmdu`] -- CMDU headers and fragmentation/reassembly across frames.
* [`container`] -- the generic containers the data model is built from.
* [`model`] -- the in-memory topology (devices, interfaces, radios).
* [`dispatcher`] -- the event loop: sockets, timers, dedup, backpressure.
* [`topology`] -- periodic discovery and link metrics.
* [`multiap`] -- Multi-AP registrar/agent provisioning.
* [`driver`] -- the external collaborator traits a deployment must implement.
*/

pub mod cmdu;
pub mod codec;
pub mod config;
pub mod container;
pub mod dispatcher;
pub mod driver;
pub mod error;
pub mod model;
pub mod multiap;
pub mod tlvs;
pub mod topology;

pub use error::{Error, Result};

use crate::cmdu::Cmdu;
use crate::codec::macaddr::MacAddr;
use crate::dispatcher::socket::RawSocket;
use crate::dispatcher::{DispatchError, Dispatcher, PollOutcome};
use crate::model::{AlDevice, Network};
use std::time::Duration;

/// Ties the dispatcher, the topology model, and the periodic-task schedule
/// together into the one object a caller drives. This is the facade
/// `src/bin/al1905d.rs` runs; everything it does is also directly reachable
/// for tests that want to drive pieces individually.
pub struct AlEntity<S: RawSocket> {
    pub dispatcher: Dispatcher<S>,
    pub network: Network,
    discovery_timer: Option<crate::dispatcher::TimerId>,
}

impl<S: RawSocket> AlEntity<S> {
    pub fn new(socket: S) -> Self {
        let local_mac = socket.local_mac();
        let mut dispatcher = Dispatcher::new(socket);
        let mut network = Network::new();
        network.set_local_device(AlDevice::new_local(local_mac));
        let discovery_timer = Some(dispatcher.schedule_timer(Duration::from_secs(0)));
        AlEntity {
            dispatcher,
            network,
            discovery_timer,
        }
    }

    pub fn local_mac(&self) -> MacAddr {
        self.dispatcher.local_mac()
    }

    /// Drives one iteration of the event loop: polls the socket/timers, applies
    /// whatever CMDU or timer fired to the topology model, and re-arms the
    /// periodic discovery timer when it fires. Returns the raw [`PollOutcome`]
    /// so callers (and tests) can assert on what happened.
    pub fn poll(&mut self, now: Duration) -> std::result::Result<PollOutcome, DispatchError> {
        let outcome = self.dispatcher.poll(now)?;

        if let Some((source, cmdu)) = &outcome.received {
            self.handle_cmdu(*source, cmdu, now)?;
        }

        if let Some(timer) = self.discovery_timer {
            if outcome.fired_timers.contains(&timer) {
                let mid = self.dispatcher.next_message_id();
                let local_mac = self.local_mac();
                let discovery = crate::topology::build_topology_discovery(local_mac, local_mac, mid);
                self.dispatcher.enqueue_multicast(&discovery)?;
                let jittered = crate::topology::DISCOVERY_PERIOD;
                self.discovery_timer = Some(self.dispatcher.schedule_timer(now + jittered));
            }
        }

        crate::topology::sweep(&mut self.network, now);

        Ok(outcome)
    }

    fn handle_cmdu(&mut self, source: MacAddr, cmdu: &Cmdu, now: Duration) -> std::result::Result<(), DispatchError> {
        match cmdu.message_type {
            crate::cmdu::TOPOLOGY_DISCOVERY => {
                let is_new = crate::topology::handle_topology_discovery(&mut self.network, source, now);

                // §4.5: a new `mid` on an already-known AL does not re-trigger a
                // query, only first sighting does.
                if is_new {
                    let query_mid = self.dispatcher.next_message_id();
                    let query = crate::topology::build_topology_query(query_mid);
                    self.dispatcher.enqueue(source, &query)?;

                    let notify_mid = self.dispatcher.next_message_id();
                    let notification = crate::topology::build_topology_notification(self.local_mac(), notify_mid);
                    self.dispatcher.enqueue_multicast(&notification)?;
                }
            }
            crate::cmdu::TOPOLOGY_QUERY => {
                let mid = self.dispatcher.next_message_id();
                if let Some(response) = crate::topology::build_topology_response(&self.network, mid) {
                    self.dispatcher.enqueue(source, &response)?;
                }
            }
            _ => {
                tracing::debug!(message_type = cmdu.message_type, "no handler for this message type yet");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::socket::{FakeSocket, Frame, ETHERTYPE_1905};

    #[test]
    fn responds_to_topology_query_with_a_response() {
        let mut socket = FakeSocket::new([1; 6]);
        let query = crate::topology::build_topology_query(1);
        socket.push_inbound(Frame {
            destination: [1; 6],
            source: [2; 6],
            ethertype: ETHERTYPE_1905,
            payload: query.forge().unwrap().to_vec(),
        });
        let mut entity = AlEntity::new(socket);
        entity.poll(Duration::from_secs(0)).unwrap();
        entity.poll(Duration::from_secs(1)).unwrap();
        assert!(!entity.dispatcher.socket_mut().outbox.is_empty());
    }
}
