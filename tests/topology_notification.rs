//! Integration coverage for spec scenario 6: discovering a brand-new AL device
//! must trigger a multicast Topology Notification, not just a unicast query.

use al1905d::cmdu::Cmdu;
use al1905d::dispatcher::socket::{FakeSocket, Frame, ETHERTYPE_1905};
use al1905d::AlEntity;
use std::time::Duration;

#[test]
fn a_new_neighbor_triggers_a_multicast_topology_notification() {
    let mut socket = FakeSocket::new([0xaa; 6]);
    let new_peer = [0xcc; 6];
    let discovery = al1905d::topology::build_topology_discovery(new_peer, new_peer, 1);
    socket.push_inbound(Frame {
        destination: al1905d::codec::macaddr::MULTICAST_1905,
        source: new_peer,
        ethertype: ETHERTYPE_1905,
        payload: discovery.forge().unwrap().to_vec(),
    });

    let mut entity = AlEntity::new(socket);
    for t in 0..6 {
        entity.poll(Duration::from_secs(t)).unwrap();
    }

    let sent: Vec<Frame> = entity.dispatcher.socket_mut().outbox.drain(..).collect();
    let notification = sent
        .iter()
        .find(|f| {
            f.destination == al1905d::codec::macaddr::MULTICAST_1905
                && Cmdu::parse(&mut bytes::Bytes::from(f.payload.clone()))
                    .map(|c| c.message_type == al1905d::cmdu::TOPOLOGY_NOTIFICATION)
                    .unwrap_or(false)
        })
        .expect("a topology notification should have been multicast for the newly-discovered peer");
    assert_eq!(notification.destination, al1905d::codec::macaddr::MULTICAST_1905);
}

#[test]
fn re_discovering_an_already_known_peer_does_not_re_notify() {
    let mut socket = FakeSocket::new([0xaa; 6]);
    let peer = [0xdc; 6];
    for mid in [1u16, 2] {
        let discovery = al1905d::topology::build_topology_discovery(peer, peer, mid);
        socket.push_inbound(Frame {
            destination: al1905d::codec::macaddr::MULTICAST_1905,
            source: peer,
            ethertype: ETHERTYPE_1905,
            payload: discovery.forge().unwrap().to_vec(),
        });
    }

    let mut entity = AlEntity::new(socket);
    for t in 0..10 {
        entity.poll(Duration::from_secs(t)).unwrap();
    }

    let sent: Vec<Frame> = entity.dispatcher.socket_mut().outbox.drain(..).collect();
    let notification_count = sent
        .iter()
        .filter(|f| {
            Cmdu::parse(&mut bytes::Bytes::from(f.payload.clone()))
                .map(|c| c.message_type == al1905d::cmdu::TOPOLOGY_NOTIFICATION)
                .unwrap_or(false)
        })
        .count();
    assert_eq!(notification_count, 1, "only the first sighting of a peer should notify");
}
