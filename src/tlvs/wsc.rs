//! `Wsc` (type 0x0c): carries an opaque Wi-Fi Simple Configuration message
//! (M1/M2/...). The AL entity neither parses nor generates these TLV-EX payloads
//! itself -- that's the collaborating [`crate::driver::WscEngine`]'s job -- so the
//! body is kept as an undifferentiated blob here, the same way the teacher treats
//! option payloads whose semantics belong to a higher layer.

use crate::codec::{TlvBody, WireError};
use bytes::{BufMut, Bytes, BytesMut};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wsc {
    pub wsc_frame: Bytes,
}

impl TlvBody for Wsc {
    const TYPE: u8 = 0x0c;
    const NAME: &'static str = "Wsc";

    fn parse(buf: &mut Bytes) -> Result<Self, WireError> {
        let wsc_frame = buf.split_off(0);
        Ok(Wsc { wsc_frame })
    }

    fn forge(&self, out: &mut BytesMut) {
        out.put_slice(&self.wsc_frame);
    }

    fn wire_len(&self) -> usize {
        self.wsc_frame.len()
    }
}
