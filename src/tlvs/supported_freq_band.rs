//! `SupportedFreqBand` (type 0x10): the RF band carried in an
//! AP-Autoconfiguration Response.

use crate::codec::{read_u8, TlvBody, WireError};
use crate::tlvs::common::FreqBand;
use bytes::{BufMut, Bytes, BytesMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportedFreqBand {
    pub freq_band: FreqBand,
}

impl TlvBody for SupportedFreqBand {
    const TYPE: u8 = 0x10;
    const NAME: &'static str = "SupportedFreqBand";

    fn parse(buf: &mut Bytes) -> Result<Self, WireError> {
        let freq_band = FreqBand::from_u8(read_u8(buf)?);
        if !buf.is_empty() {
            return Err(WireError::TrailingGarbage(buf.len(), Self::NAME));
        }
        Ok(SupportedFreqBand { freq_band })
    }

    fn forge(&self, out: &mut BytesMut) {
        out.put_u8(self.freq_band.to_u8());
    }

    fn wire_len(&self) -> usize {
        1
    }
}
