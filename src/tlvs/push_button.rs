//! Push-button configuration TLVs: `PushButtonEventNotification` (0x12) announces
//! that a media's push button has been pressed locally; `PushButtonJoinNotification`
//! (0x13) lets a device tell the network who it just paired with, so the
//! notification can be de-duplicated against the originating event.

use crate::codec::macaddr::{read_mac, write_mac, MacAddr};
use crate::codec::{read_count, read_u16, read_u8, write_count, TlvBody, WireError};
use bytes::{Buf, BufMut, Bytes, BytesMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaTypeEntry {
    pub media_type: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushButtonEventNotification {
    pub media_types: Vec<MediaTypeEntry>,
}

impl TlvBody for PushButtonEventNotification {
    const TYPE: u8 = 0x12;
    const NAME: &'static str = "PushButtonEventNotification";

    fn parse(buf: &mut Bytes) -> Result<Self, WireError> {
        let count = read_count(buf)?;
        let mut media_types = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let media_type = read_u16(buf)?;
            // Each entry is followed by a length-prefixed media-specific blob we
            // don't otherwise interpret; skip it.
            let info_len = read_u8(buf)? as usize;
            if buf.remaining() < info_len {
                return Err(WireError::Truncated {
                    expected: info_len,
                    actual: buf.remaining(),
                });
            }
            buf.advance(info_len);
            media_types.push(MediaTypeEntry { media_type });
        }
        if !buf.is_empty() {
            return Err(WireError::TrailingGarbage(buf.len(), Self::NAME));
        }
        Ok(PushButtonEventNotification { media_types })
    }

    fn forge(&self, out: &mut BytesMut) {
        write_count(out, self.media_types.len()).expect("bounded by caller");
        for m in &self.media_types {
            out.put_u16(m.media_type);
            out.put_u8(0);
        }
    }

    fn wire_len(&self) -> usize {
        1 + 3 * self.media_types.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushButtonJoinNotification {
    pub al_mac_address: MacAddr,
    pub message_identifier: u16,
    pub transmitter_interface: MacAddr,
    pub new_member_interface: MacAddr,
}

impl TlvBody for PushButtonJoinNotification {
    const TYPE: u8 = 0x13;
    const NAME: &'static str = "PushButtonJoinNotification";

    fn parse(buf: &mut Bytes) -> Result<Self, WireError> {
        let al_mac_address = read_mac(buf)?;
        let message_identifier = read_u16(buf)?;
        let transmitter_interface = read_mac(buf)?;
        let new_member_interface = read_mac(buf)?;
        if !buf.is_empty() {
            return Err(WireError::TrailingGarbage(buf.len(), Self::NAME));
        }
        Ok(PushButtonJoinNotification {
            al_mac_address,
            message_identifier,
            transmitter_interface,
            new_member_interface,
        })
    }

    fn forge(&self, out: &mut BytesMut) {
        write_mac(out, &self.al_mac_address);
        out.put_u16(self.message_identifier);
        write_mac(out, &self.transmitter_interface);
        write_mac(out, &self.new_member_interface);
    }

    fn wire_len(&self) -> usize {
        6 + 2 + 6 + 6
    }
}
