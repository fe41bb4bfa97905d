//! TLV codec runtime: the reflection engine that drives parse/forge/length/compare
//! for every 1905 TLV uniformly.
//!
//! The original drove this from a `tlv_struct_description` table of field
//! descriptors (offset, wire size, print format) interpreted generically by
//! `tlv_struct_parse_single`/`tlv_struct_forge_single`/`tlv_struct_length_list`. This
//! rewrite takes option (b) from the design notes: each TLV body implements the
//! [`TlvBody`] trait directly, the same shape as the teacher's per-block
//! `FromBytes::parse<T: Buf>(buf, endianness) -> Result<Self, BlockError>`, minus the
//! endianness parameter (1905 fields are always big-endian on the wire, §4.2).

pub mod macaddr;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use thiserror::Error;

/// Wire-level failures. All are recoverable: the caller drops the offending CMDU
/// and continues (§7, kind 1 -- "Wire errors").
#[derive(Debug, Error)]
pub enum WireError {
    #[error("truncated TLV body: expected at least {expected} bytes, had {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error("TLV type {0} declared length {1} but only {2} bytes remained in the CMDU")]
    LengthOverflow(u8, u16, usize),
    #[error("{0} bytes of garbage left over after parsing TLV {1}")]
    TrailingGarbage(usize, &'static str),
    #[error("TLV list of {0} bytes does not fit within the {1}-byte limit")]
    DoesNotFit(usize, usize),
    #[error("a single TLV of {0} bytes exceeds the {1}-byte segment limit and cannot be fragmented")]
    TlvTooLarge(usize, usize),
    #[error("TLV body has more than 255 children in one list")]
    TooManyChildren,
    #[error("TLV {0} serialised to {1} bytes, which doesn't fit in a u16 length field")]
    BodyTooLarge(&'static str, usize),
}

/// A TLV body type: the unit of reflection the codec drives uniformly.
pub trait TlvBody: Sized {
    const TYPE: u8;
    const NAME: &'static str;

    /// Parse the body (the bytes strictly between the 3-byte header and the next
    /// TLV). `buf` contains exactly the declared length; any bytes left over after
    /// a successful parse is a [`WireError::TrailingGarbage`].
    fn parse(buf: &mut Bytes) -> Result<Self, WireError>;

    /// Append the wire representation of `self` to `out`.
    fn forge(&self, out: &mut BytesMut);

    /// Serialised body length in bytes (excludes the 3-byte type+length header).
    fn wire_len(&self) -> usize;
}

pub(crate) fn read_u8(buf: &mut Bytes) -> Result<u8, WireError> {
    if !buf.has_remaining() {
        return Err(WireError::Truncated {
            expected: 1,
            actual: 0,
        });
    }
    Ok(buf.get_u8())
}

pub(crate) fn read_u16(buf: &mut Bytes) -> Result<u16, WireError> {
    if buf.remaining() < 2 {
        return Err(WireError::Truncated {
            expected: 2,
            actual: buf.remaining(),
        });
    }
    Ok(buf.get_u16())
}

pub(crate) fn read_u32(buf: &mut Bytes) -> Result<u32, WireError> {
    if buf.remaining() < 4 {
        return Err(WireError::Truncated {
            expected: 4,
            actual: buf.remaining(),
        });
    }
    Ok(buf.get_u32())
}

pub(crate) fn read_exact(buf: &mut Bytes, len: usize) -> Result<Bytes, WireError> {
    if buf.remaining() < len {
        return Err(WireError::Truncated {
            expected: len,
            actual: buf.remaining(),
        });
    }
    Ok(buf.copy_to_bytes(len))
}

/// Reads the 1-byte child-list count prefix shared by every children list on the
/// wire (`tlv_struct_parse_list`'s `_E1BL(buffer, &children_nr, length)`).
pub(crate) fn read_count(buf: &mut Bytes) -> Result<u8, WireError> {
    read_u8(buf)
}

pub(crate) fn write_count(out: &mut BytesMut, count: usize) -> Result<(), WireError> {
    if count > u8::MAX as usize {
        return Err(WireError::TooManyChildren);
    }
    out.put_u8(count as u8);
    Ok(())
}
