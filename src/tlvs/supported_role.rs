//! `SupportedRole` (type 0x0f): the role carried in an AP-Autoconfiguration
//! Response.

use crate::codec::{read_u8, TlvBody, WireError};
use crate::tlvs::common::Role;
use bytes::{BufMut, Bytes, BytesMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportedRole {
    pub role: Role,
}

impl TlvBody for SupportedRole {
    const TYPE: u8 = 0x0f;
    const NAME: &'static str = "SupportedRole";

    fn parse(buf: &mut Bytes) -> Result<Self, WireError> {
        let role = Role::from_u8(read_u8(buf)?);
        if !buf.is_empty() {
            return Err(WireError::TrailingGarbage(buf.len(), Self::NAME));
        }
        Ok(SupportedRole { role })
    }

    fn forge(&self, out: &mut BytesMut) {
        out.put_u8(self.role.to_u8());
    }

    fn wire_len(&self) -> usize {
        1
    }
}
