//! `EndOfMessage` (type 0x00) terminates a CMDU's TLV list. Always zero-length.

use crate::codec::{TlvBody, WireError};
use bytes::{Bytes, BytesMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EndOfMessage;

impl TlvBody for EndOfMessage {
    const TYPE: u8 = 0x00;
    const NAME: &'static str = "EndOfMessage";

    fn parse(buf: &mut Bytes) -> Result<Self, WireError> {
        if buf.is_empty() {
            Ok(EndOfMessage)
        } else {
            Err(WireError::TrailingGarbage(buf.len(), Self::NAME))
        }
    }

    fn forge(&self, _out: &mut BytesMut) {}

    fn wire_len(&self) -> usize {
        0
    }
}
