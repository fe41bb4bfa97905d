//! `AutoconfigFreqBand` (type 0x0e): the RF band an AP-Autoconfiguration Search
//! applies to.

use crate::codec::{read_u8, TlvBody, WireError};
use crate::tlvs::common::FreqBand;
use bytes::{BufMut, Bytes, BytesMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoconfigFreqBand {
    pub freq_band: FreqBand,
}

impl TlvBody for AutoconfigFreqBand {
    const TYPE: u8 = 0x0e;
    const NAME: &'static str = "AutoconfigFreqBand";

    fn parse(buf: &mut Bytes) -> Result<Self, WireError> {
        let freq_band = FreqBand::from_u8(read_u8(buf)?);
        if !buf.is_empty() {
            return Err(WireError::TrailingGarbage(buf.len(), Self::NAME));
        }
        Ok(AutoconfigFreqBand { freq_band })
    }

    fn forge(&self, out: &mut BytesMut) {
        out.put_u8(self.freq_band.to_u8());
    }

    fn wire_len(&self) -> usize {
        1
    }
}
