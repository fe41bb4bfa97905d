//! Integration coverage for the topology discovery cycle (spec scenario 5):
//! startup discovery broadcast, query-on-discovery, and a full topology
//! response to an incoming query.

use al1905d::cmdu::Cmdu;
use al1905d::dispatcher::socket::{FakeSocket, Frame, ETHERTYPE_1905};
use al1905d::tlvs::Tlv;
use al1905d::AlEntity;
use std::time::Duration;

fn drain_outbox(entity: &mut AlEntity<FakeSocket>) -> Vec<Frame> {
    std::mem::take(&mut entity.dispatcher.socket_mut().outbox).into_iter().collect()
}

#[test]
fn emits_topology_discovery_within_61_seconds_of_startup() {
    let socket = FakeSocket::new([0xaa; 6]);
    let mut entity = AlEntity::new(socket);

    entity.poll(Duration::from_secs(0)).unwrap();
    entity.poll(Duration::from_secs(1)).unwrap();
    let frames = drain_outbox(&mut entity);
    assert_eq!(frames.len(), 1, "startup should queue exactly one discovery frame");

    let cmdu = Cmdu::parse(&mut bytes::Bytes::from(frames[0].payload.clone())).unwrap();
    assert_eq!(cmdu.message_type, al1905d::cmdu::TOPOLOGY_DISCOVERY);
    assert!(cmdu.tlvs.iter().any(|t| matches!(t, Tlv::AlMacAddress(_))));
    assert!(cmdu.tlvs.iter().any(|t| matches!(t, Tlv::MacAddress(_))));
}

#[test]
fn answers_a_discovery_with_a_query_then_a_query_with_a_full_response() {
    let mut socket = FakeSocket::new([0xaa; 6]);
    let peer = [0xba; 6];
    let discovery = al1905d::topology::build_topology_discovery(peer, peer, 1);
    socket.push_inbound(Frame {
        destination: [0xaa; 6],
        source: peer,
        ethertype: ETHERTYPE_1905,
        payload: discovery.forge().unwrap().to_vec(),
    });

    let mut entity = AlEntity::new(socket);
    for t in 0..6 {
        entity.poll(Duration::from_secs(t)).unwrap();
    }

    let frames = drain_outbox(&mut entity);
    let query = frames
        .iter()
        .map(|f| Cmdu::parse(&mut bytes::Bytes::from(f.payload.clone())).unwrap())
        .find(|c| c.message_type == al1905d::cmdu::TOPOLOGY_QUERY)
        .expect("a topology query should have been sent back to the new peer");
    assert!(matches!(query.tlvs[0], Tlv::EndOfMessage(_)));

    let mut socket = FakeSocket::new([0xaa; 6]);
    let response_request = al1905d::topology::build_topology_query(7);
    socket.push_inbound(Frame {
        destination: [0xaa; 6],
        source: peer,
        ethertype: ETHERTYPE_1905,
        payload: response_request.forge().unwrap().to_vec(),
    });
    let mut entity = AlEntity::new(socket);
    for t in 0..4 {
        entity.poll(Duration::from_secs(t)).unwrap();
    }

    let frames = drain_outbox(&mut entity);
    let response = frames
        .iter()
        .map(|f| Cmdu::parse(&mut bytes::Bytes::from(f.payload.clone())).unwrap())
        .find(|c| c.message_type == al1905d::cmdu::TOPOLOGY_RESPONSE)
        .expect("a topology response should have been sent");

    for expected in [
        |t: &Tlv| matches!(t, Tlv::DeviceInformation(_)),
        |t: &Tlv| matches!(t, Tlv::DeviceBridgingCapability(_)),
        |t: &Tlv| matches!(t, Tlv::Neighbor1905DeviceList(_)),
        |t: &Tlv| matches!(t, Tlv::PowerOffInterface(_)),
        |t: &Tlv| matches!(t, Tlv::L2NeighborDevice(_)),
        |t: &Tlv| matches!(t, Tlv::SupportedService(_)),
        |t: &Tlv| matches!(t, Tlv::ApOperationalBss(_)),
    ] {
        assert!(response.tlvs.iter().any(expected), "missing an expected TLV in the topology response");
    }
}
