//! The single-threaded cooperative event loop (§4.4). Everything here is driven
//! by an explicit `now: Duration` the caller supplies, so the whole dispatcher
//! can be driven deterministically in tests without real sockets or a real
//! clock -- the same testability goal behind the teacher's `poll`-oriented
//! reader, just applied to an event loop instead of a byte stream.

pub mod socket;

use crate::cmdu::framer::{fragment, Reassembler};
use crate::cmdu::Cmdu;
use crate::codec::macaddr::{is_multicast, MacAddr, MULTICAST_1905};
use crate::dispatcher::socket::{DriverSocketError, ETHERTYPE_1905, Frame, RawSocket};
use bytes::Bytes;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("wire error: {0}")]
    Wire(#[from] crate::codec::WireError),
    #[error("socket error: {0}")]
    Socket(#[from] DriverSocketError),
}

/// The dedup window (§4.4 "Duplicate suppression"): a (source, message_id) pair
/// is remembered for at most 10 seconds or until 100 newer pairs have pushed it
/// out, whichever comes first.
const DEDUP_CAPACITY: usize = 100;
const DEDUP_TTL: Duration = Duration::from_secs(10);

struct DedupEntry {
    source: MacAddr,
    message_id: u16,
    seen_at: Duration,
}

/// Maximum Ethernet-frame payload this dispatcher will ever forge a single CMDU
/// fragment into: the 1500-byte Ethernet MTU minus the 14-byte Ethernet header
/// and the 8-byte CMDU header (§4.3/§6).
pub const DEFAULT_MSS: usize = 1500 - 14 - 8;

/// §4.4: a fragment is re-queued up to this many times on backpressure before
/// the whole CMDU it belongs to is dropped.
const MAX_SEND_RETRIES: u32 = 3;

/// §4.4: how long a backpressured fragment waits before its next send attempt.
const SEND_RETRY_BACKOFF: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimerId(pub u64);

struct TimerEntry {
    fire_at: Duration,
    id: TimerId,
}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at
    }
}
impl Eq for TimerEntry {}
impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for TimerEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.fire_at.cmp(&other.fire_at)
    }
}

/// What happened during one [`Dispatcher::poll`] call.
#[derive(Debug, Default)]
pub struct PollOutcome {
    /// A fully reassembled, deduplicated, freshly-arrived CMDU, if one completed
    /// this poll.
    pub received: Option<(MacAddr, Cmdu)>,
    /// Timer ids that reached their fire time this poll, in ascending `fire_at`
    /// order.
    pub fired_timers: Vec<TimerId>,
    /// `true` if nothing at all happened: no frame, no timer, no retry.
    pub idle: bool,
}

struct QueuedSend {
    frame: Frame,
    attempts: u32,
    /// Groups every fragment of one `enqueue()` call so that giving up on one
    /// fragment can drop the rest of the same CMDU instead of leaving a hole
    /// (§4.4).
    cmdu_seq: u64,
    /// Earliest `now` at which this entry may be attempted again.
    retry_after: Duration,
}

pub struct Dispatcher<S: RawSocket> {
    socket: S,
    reassembler: Reassembler,
    dedup: VecDeque<DedupEntry>,
    timers: BinaryHeap<Reverse<TimerEntry>>,
    next_timer_id: u64,
    send_queue: VecDeque<QueuedSend>,
    next_message_id: u16,
    next_cmdu_seq: u64,
}

impl<S: RawSocket> Dispatcher<S> {
    pub fn new(socket: S) -> Self {
        Dispatcher {
            socket,
            reassembler: Reassembler::new(),
            dedup: VecDeque::with_capacity(DEDUP_CAPACITY),
            timers: BinaryHeap::new(),
            next_timer_id: 0,
            send_queue: VecDeque::new(),
            next_message_id: 0,
            next_cmdu_seq: 0,
        }
    }

    pub fn local_mac(&self) -> MacAddr {
        self.socket.local_mac()
    }

    pub fn socket_mut(&mut self) -> &mut S {
        &mut self.socket
    }

    /// Allocates the next outgoing message_id, wrapping per §4.4.
    pub fn next_message_id(&mut self) -> u16 {
        let id = self.next_message_id;
        self.next_message_id = self.next_message_id.wrapping_add(1);
        id
    }

    pub fn schedule_timer(&mut self, fire_at: Duration) -> TimerId {
        let id = TimerId(self.next_timer_id);
        self.next_timer_id += 1;
        self.timers.push(Reverse(TimerEntry { fire_at, id }));
        id
    }

    fn remember(&mut self, source: MacAddr, message_id: u16, now: Duration) {
        while self.dedup.len() >= DEDUP_CAPACITY {
            self.dedup.pop_front();
        }
        self.dedup.push_back(DedupEntry {
            source,
            message_id,
            seen_at: now,
        });
    }

    fn is_duplicate(&self, source: MacAddr, message_id: u16, now: Duration) -> bool {
        self.dedup.iter().any(|e| {
            e.source == source && e.message_id == message_id && now.saturating_sub(e.seen_at) < DEDUP_TTL
        })
    }

    /// Queues a CMDU for transmission to `destination`, fragmenting it first if
    /// needed. `destination` may be [`MULTICAST_1905`] for relayed message types.
    pub fn enqueue(&mut self, destination: MacAddr, cmdu: &Cmdu) -> Result<(), DispatchError> {
        let frames = fragment(cmdu, DEFAULT_MSS)?;
        let source = self.socket.local_mac();
        let cmdu_seq = self.next_cmdu_seq;
        self.next_cmdu_seq = self.next_cmdu_seq.wrapping_add(1);
        for payload in frames {
            self.send_queue.push_back(QueuedSend {
                frame: Frame {
                    destination,
                    source,
                    ethertype: ETHERTYPE_1905,
                    payload: payload.to_vec(),
                },
                attempts: 0,
                cmdu_seq,
                retry_after: Duration::ZERO,
            });
        }
        Ok(())
    }

    /// Attempts one queued send. Returns `Ok(true)` whenever it actually acted
    /// on the queue -- sent, re-queued for retry, or gave up -- and `Ok(false)`
    /// only when there's nothing eligible to try yet (empty queue, or the
    /// front entry is still in its backoff window).
    fn drain_send_queue(&mut self, now: Duration) -> Result<bool, DispatchError> {
        match self.send_queue.front() {
            Some(front) if front.retry_after <= now => {}
            _ => return Ok(false),
        }
        let mut queued = self.send_queue.pop_front().unwrap();
        match self.socket.send(&queued.frame) {
            Ok(()) => Ok(true),
            Err(DriverSocketError::WouldBlock) => {
                queued.attempts += 1;
                if queued.attempts >= MAX_SEND_RETRIES {
                    let cmdu_seq = queued.cmdu_seq;
                    tracing::warn!(attempts = queued.attempts, "dropping CMDU after repeated backpressure");
                    self.send_queue.retain(|q| q.cmdu_seq != cmdu_seq);
                } else {
                    queued.retry_after = now + SEND_RETRY_BACKOFF;
                    self.send_queue.push_front(queued);
                }
                Ok(true)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Advances the dispatcher by one step: tries to receive a frame, drains one
    /// queued send, and fires any timers due by `now`. Never blocks.
    pub fn poll(&mut self, now: Duration) -> Result<PollOutcome, DispatchError> {
        let mut outcome = PollOutcome::default();

        self.reassembler.expire(now);

        let did_send = self.drain_send_queue(now)?;

        if let Some(frame) = self.socket.recv()? {
            let own_mac = self.socket.local_mac();
            let is_loopback = frame.source == own_mac || is_multicast(&frame.source);
            if frame.ethertype == ETHERTYPE_1905 && !is_loopback {
                let mut bytes = Bytes::from(frame.payload);
                let cmdu = Cmdu::parse(&mut bytes)?;
                if let Some(complete) = self.reassembler.feed(frame.source, cmdu, now) {
                    if !self.is_duplicate(frame.source, complete.message_id, now) {
                        self.remember(frame.source, complete.message_id, now);
                        outcome.received = Some((frame.source, complete));
                    }
                }
            }
        }

        while let Some(Reverse(top)) = self.timers.peek() {
            if top.fire_at > now {
                break;
            }
            let Reverse(entry) = self.timers.pop().unwrap();
            outcome.fired_timers.push(entry.id);
        }

        outcome.idle = outcome.received.is_none() && outcome.fired_timers.is_empty() && !did_send;
        Ok(outcome)
    }

    /// Convenience for broadcasting a relayable CMDU to the 1905 multicast group.
    pub fn enqueue_multicast(&mut self, cmdu: &Cmdu) -> Result<(), DispatchError> {
        debug_assert!(is_multicast(&MULTICAST_1905));
        self.enqueue(MULTICAST_1905, cmdu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmdu::{TOPOLOGY_QUERY, TOPOLOGY_DISCOVERY};
    use crate::dispatcher::socket::FakeSocket;
    use crate::tlvs::{AlMacAddress, EndOfMessage, Tlv};

    fn sample() -> Cmdu {
        Cmdu::new(
            TOPOLOGY_QUERY,
            1,
            vec![
                Tlv::AlMacAddress(AlMacAddress {
                    al_mac_address: [9; 6],
                }),
                Tlv::EndOfMessage(EndOfMessage),
            ],
        )
    }

    #[test]
    fn enqueue_then_poll_sends_one_frame_per_poll() {
        let socket = FakeSocket::new([1; 6]);
        let mut dispatcher = Dispatcher::new(socket);
        dispatcher.enqueue([2; 6], &sample()).unwrap();
        let outcome = dispatcher.poll(Duration::from_secs(0)).unwrap();
        assert!(!outcome.idle);
    }

    #[test]
    fn receives_and_dedups_by_source_and_message_id() {
        let mut socket = FakeSocket::new([1; 6]);
        let cmdu = sample();
        let payload = cmdu.forge().unwrap().to_vec();
        socket.push_inbound(Frame {
            destination: [1; 6],
            source: [4; 6],
            ethertype: ETHERTYPE_1905,
            payload: payload.clone(),
        });
        socket.push_inbound(Frame {
            destination: [1; 6],
            source: [4; 6],
            ethertype: ETHERTYPE_1905,
            payload,
        });
        let mut dispatcher = Dispatcher::new(socket);
        let first = dispatcher.poll(Duration::from_secs(0)).unwrap();
        assert!(first.received.is_some());
        let second = dispatcher.poll(Duration::from_secs(1)).unwrap();
        assert!(second.received.is_none(), "duplicate message_id should be suppressed");
    }

    #[test]
    fn a_frame_from_our_own_mac_or_a_multicast_source_is_dropped() {
        let mut socket = FakeSocket::new([1; 6]);
        let cmdu = sample();
        socket.push_inbound(Frame {
            destination: [1; 6],
            source: [1; 6],
            ethertype: ETHERTYPE_1905,
            payload: cmdu.forge().unwrap().to_vec(),
        });
        socket.push_inbound(Frame {
            destination: [1; 6],
            source: MULTICAST_1905,
            ethertype: ETHERTYPE_1905,
            payload: cmdu.forge().unwrap().to_vec(),
        });
        let mut dispatcher = Dispatcher::new(socket);
        let first = dispatcher.poll(Duration::from_secs(0)).unwrap();
        assert!(first.received.is_none(), "a looped-back frame must not be dispatched");
        let second = dispatcher.poll(Duration::from_secs(1)).unwrap();
        assert!(second.received.is_none(), "a multicast-sourced frame must not be dispatched");
    }

    #[test]
    fn timers_fire_in_order_once_due() {
        let socket = FakeSocket::new([1; 6]);
        let mut dispatcher = Dispatcher::new(socket);
        let later = dispatcher.schedule_timer(Duration::from_secs(10));
        let sooner = dispatcher.schedule_timer(Duration::from_secs(5));
        let outcome = dispatcher.poll(Duration::from_secs(6)).unwrap();
        assert_eq!(outcome.fired_timers, vec![sooner]);
        let outcome = dispatcher.poll(Duration::from_secs(11)).unwrap();
        assert_eq!(outcome.fired_timers, vec![later]);
    }

    #[test]
    fn retries_on_backpressure_then_eventually_drops() {
        let mut socket = FakeSocket::new([1; 6]);
        for _ in 0..MAX_SEND_RETRIES {
            socket.fail_next_send();
        }
        let mut dispatcher = Dispatcher::new(socket);
        dispatcher.enqueue([2; 6], &sample()).unwrap();
        for t in 0..MAX_SEND_RETRIES {
            let outcome = dispatcher.poll(Duration::from_secs(t as u64)).unwrap();
            assert!(!outcome.idle);
        }
        assert!(dispatcher.send_queue.is_empty());
    }

    #[test]
    fn backpressure_exhaustion_drops_every_fragment_of_the_same_cmdu() {
        let mut socket = FakeSocket::new([1; 6]);
        for _ in 0..MAX_SEND_RETRIES {
            socket.fail_next_send();
        }
        let mut dispatcher = Dispatcher::new(socket);
        dispatcher.enqueue([2; 6], &sample()).unwrap();
        // Simulate a second fragment of the same CMDU sharing its cmdu_seq, the
        // way `enqueue()` would have queued it had `sample()` not fit in one
        // fragment.
        let cmdu_seq = dispatcher.send_queue.front().unwrap().cmdu_seq;
        dispatcher.send_queue.push_back(QueuedSend {
            frame: dispatcher.send_queue.front().unwrap().frame.clone(),
            attempts: 0,
            cmdu_seq,
            retry_after: Duration::ZERO,
        });
        assert_eq!(dispatcher.send_queue.len(), 2);

        for t in 0..MAX_SEND_RETRIES {
            let outcome = dispatcher.poll(Duration::from_secs(t as u64)).unwrap();
            assert!(!outcome.idle, "a retry or a give-up-drop both count as activity");
        }
        assert!(
            dispatcher.send_queue.is_empty(),
            "giving up on one fragment must drop every sibling fragment of the same CMDU"
        );
    }

    #[test]
    fn relayable_vs_non_relayable_message_types() {
        assert!(crate::cmdu::is_relayable(TOPOLOGY_DISCOVERY));
        assert!(!crate::cmdu::is_relayable(TOPOLOGY_QUERY));
    }
}
