//! `SearchedRole` (type 0x0d): the role an AP-Autoconfiguration Search is looking
//! for. The spec only ever defines `Registrar`.

use crate::codec::{read_u8, TlvBody, WireError};
use crate::tlvs::common::Role;
use bytes::{BufMut, Bytes, BytesMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchedRole {
    pub role: Role,
}

impl TlvBody for SearchedRole {
    const TYPE: u8 = 0x0d;
    const NAME: &'static str = "SearchedRole";

    fn parse(buf: &mut Bytes) -> Result<Self, WireError> {
        let role = Role::from_u8(read_u8(buf)?);
        if !buf.is_empty() {
            return Err(WireError::TrailingGarbage(buf.len(), Self::NAME));
        }
        Ok(SearchedRole { role })
    }

    fn forge(&self, out: &mut BytesMut) {
        out.put_u8(self.role.to_u8());
    }

    fn wire_len(&self) -> usize {
        1
    }
}
