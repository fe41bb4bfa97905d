//! CMDU fragmentation and reassembly across Ethernet frames (§4.3). A CMDU whose
//! forged TLV stream doesn't fit in one frame is split into multiple frames that
//! share `message_id`, with ascending `fragment_id` and the last-fragment flag
//! set only on the final piece. Reassembly is keyed by `(source AL MAC,
//! message_id)` since two different neighbors can reuse the same message_id
//! independently.

use super::Cmdu;
use crate::codec::macaddr::MacAddr;
use crate::codec::{TlvBody, WireError};
use crate::tlvs::{EndOfMessage, Tlv};
use bytes::Bytes;
use std::collections::HashMap;
use std::time::Duration;

/// How long a partially-received CMDU is kept before being dropped as
/// undeliverable (§4.3 "Reassembly timeout").
pub const REASSEMBLY_TIMEOUT: Duration = Duration::from_secs(10);

/// Splits `cmdu`'s TLVs across as many frames as needed so that each frame's
/// forged byte length (header + TLVs, no trailing `EndOfMessage` duplicated
/// across fragments) stays within `mss`. A lone TLV that cannot fit even in an
/// otherwise-empty frame is a hard error: nothing this entity can do will make
/// it fit, so it should not be queued at all (§4.3 edge case).
///
/// Only the final fragment is `EndOfMessage`-terminated. Every fragment is
/// forged with [`Cmdu::forge_raw`], which writes exactly the TLVs handed to
/// it with no auto-termination, so intermediate fragments don't pick up a
/// spurious `EndOfMessage` the way a top-level `Cmdu::forge()` call would --
/// otherwise a CMDU split into N fragments would reassemble with N
/// `EndOfMessage` TLVs instead of one (§4.3).
pub fn fragment(cmdu: &Cmdu, mss: usize) -> Result<Vec<BytesOwned>, WireError> {
    const HEADER_LEN: usize = 8;
    let mut frames = Vec::new();
    let mut current: Vec<Tlv> = Vec::new();
    let mut current_len = HEADER_LEN;

    let flush = |tlvs: &mut Vec<Tlv>,
                 current_len: &mut usize,
                 fragment_id: &mut u8,
                 frames: &mut Vec<BytesOwned>,
                 last: bool|
     -> Result<(), WireError> {
        let mut frag_tlvs = std::mem::take(tlvs);
        if last && !frag_tlvs.iter().any(|t| t.tlv_type() == EndOfMessage::TYPE) {
            frag_tlvs.push(Tlv::EndOfMessage(EndOfMessage));
        }
        let mut frag = Cmdu {
            fragment_id: *fragment_id,
            last_fragment: last,
            ..cmdu.clone_header()
        };
        frag.tlvs = frag_tlvs;
        frames.push(frag.forge_raw()?.freeze());
        *fragment_id += 1;
        *current_len = HEADER_LEN;
        Ok(())
    };

    let mut fragment_id = 0u8;
    for tlv in &cmdu.tlvs {
        let tlv_wire_len = 3 + tlv_body_len(tlv);
        if tlv_wire_len > mss.saturating_sub(HEADER_LEN) {
            return Err(WireError::TlvTooLarge(tlv_wire_len, mss.saturating_sub(HEADER_LEN)));
        }
        if current_len + tlv_wire_len > mss && !current.is_empty() {
            flush(&mut current, &mut current_len, &mut fragment_id, &mut frames, false)?;
        }
        current_len += tlv_wire_len;
        current.push(tlv.clone());
    }
    flush(&mut current, &mut current_len, &mut fragment_id, &mut frames, true)?;
    Ok(frames)
}

fn tlv_body_len(tlv: &Tlv) -> usize {
    tlv.body_len()
}

pub type BytesOwned = Bytes;

impl Cmdu {
    fn clone_header(&self) -> Cmdu {
        Cmdu {
            message_version: self.message_version,
            message_type: self.message_type,
            message_id: self.message_id,
            fragment_id: self.fragment_id,
            last_fragment: self.last_fragment,
            relay_indicator: self.relay_indicator,
            tlvs: Vec::new(),
        }
    }
}

struct PendingReassembly {
    fragments: HashMap<u8, Vec<Tlv>>,
    highest_seen: Option<u8>,
    last_touched: Duration,
    message_type: u16,
    message_version: u8,
    relay_indicator: bool,
}

/// Reassembles fragmented CMDUs arriving out of order (§4.3). `now` is supplied
/// by the caller (the dispatcher's clock) rather than read from the system, so
/// reassembly can be driven deterministically in tests.
#[derive(Default)]
pub struct Reassembler {
    pending: HashMap<(MacAddr, u16), PendingReassembly>,
}

impl Reassembler {
    pub fn new() -> Self {
        Reassembler {
            pending: HashMap::new(),
        }
    }

    /// Feeds one already-parsed CMDU fragment in. Returns `Some(cmdu)` once the
    /// final fragment for its `(source, message_id)` key has arrived; returns
    /// `None` while more fragments are still outstanding. Duplicate fragments
    /// (same source, message_id, fragment_id) are silently ignored rather than
    /// treated as an error, since at-least-once link-layer delivery can retransmit
    /// a fragment the receiver already has.
    pub fn feed(&mut self, source: MacAddr, cmdu: Cmdu, now: Duration) -> Option<Cmdu> {
        if cmdu.fragment_id == 0 && cmdu.last_fragment {
            return Some(cmdu);
        }
        let key = (source, cmdu.message_id);
        let entry = self.pending.entry(key).or_insert_with(|| PendingReassembly {
            fragments: HashMap::new(),
            highest_seen: None,
            last_touched: now,
            message_type: cmdu.message_type,
            message_version: cmdu.message_version,
            relay_indicator: cmdu.relay_indicator,
        });
        entry.last_touched = now;
        entry.fragments.entry(cmdu.fragment_id).or_insert(cmdu.tlvs);
        if cmdu.last_fragment {
            entry.highest_seen = Some(cmdu.fragment_id);
        }

        let complete = entry
            .highest_seen
            .map(|highest| (0..=highest).all(|id| entry.fragments.contains_key(&id)))
            .unwrap_or(false);

        if !complete {
            return None;
        }
        let entry = self.pending.remove(&key).unwrap();
        let highest = entry.highest_seen.unwrap();
        let mut tlvs = Vec::new();
        for id in 0..=highest {
            tlvs.extend(entry.fragments.get(&id).cloned().unwrap_or_default());
        }
        Some(Cmdu {
            message_version: entry.message_version,
            message_type: entry.message_type,
            message_id: key.1,
            fragment_id: 0,
            last_fragment: true,
            relay_indicator: entry.relay_indicator,
            tlvs,
        })
    }

    /// Drops any reassembly state older than [`REASSEMBLY_TIMEOUT`].
    pub fn expire(&mut self, now: Duration) {
        self.pending
            .retain(|_, entry| now.saturating_sub(entry.last_touched) < REASSEMBLY_TIMEOUT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tlvs::{AlMacAddress, EndOfMessage};

    fn sample_cmdu(n_fill_tlvs: usize) -> Cmdu {
        let mut tlvs: Vec<Tlv> = (0..n_fill_tlvs)
            .map(|i| {
                Tlv::AlMacAddress(AlMacAddress {
                    al_mac_address: [i as u8; 6],
                })
            })
            .collect();
        tlvs.push(Tlv::EndOfMessage(EndOfMessage));
        Cmdu::new(super::super::TOPOLOGY_QUERY, 7, tlvs)
    }

    #[test]
    fn fragments_and_reassembles_out_of_order() {
        let cmdu = sample_cmdu(20);
        let frames = fragment(&cmdu, 64).unwrap();
        assert!(frames.len() > 1, "expected multiple fragments for a 64-byte MSS");

        let mut reassembler = Reassembler::new();
        let source = [9u8; 6];
        let mut parsed: Vec<Cmdu> = frames
            .iter()
            .map(|f| Cmdu::parse(&mut f.clone()).unwrap())
            .collect();
        parsed.reverse();

        let mut result = None;
        for frag in parsed {
            result = reassembler.feed(source, frag, Duration::from_secs(0));
        }
        let reassembled = result.expect("should complete once all fragments are fed");
        assert_eq!(reassembled.message_id, cmdu.message_id);
        assert_eq!(reassembled.tlvs, cmdu.tlvs);
    }

    #[test]
    fn duplicate_fragment_is_idempotent() {
        let cmdu = sample_cmdu(20);
        let frames = fragment(&cmdu, 64).unwrap();
        let mut reassembler = Reassembler::new();
        let source = [1u8; 6];
        let first = Cmdu::parse(&mut frames[0].clone()).unwrap();
        assert!(reassembler.feed(source, first.clone(), Duration::from_secs(0)).is_none());
        assert!(reassembler.feed(source, first, Duration::from_secs(1)).is_none());
        assert_eq!(reassembler.pending.len(), 1);
    }

    #[test]
    fn expire_drops_stale_partial_reassembly() {
        let cmdu = sample_cmdu(20);
        let frames = fragment(&cmdu, 64).unwrap();
        let mut reassembler = Reassembler::new();
        let source = [2u8; 6];
        let first = Cmdu::parse(&mut frames[0].clone()).unwrap();
        reassembler.feed(source, first, Duration::from_secs(0));
        reassembler.expire(Duration::from_secs(11));
        assert!(reassembler.pending.is_empty());
    }
}
