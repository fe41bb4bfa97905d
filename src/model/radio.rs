//! A Wi-Fi radio on the local device, as exposed by [`crate::driver::RadioEnumerator`].

use crate::codec::macaddr::MacAddr;
use crate::container::PtrArray;
use crate::model::interface::InterfaceWifi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioBand {
    Ghz2_4,
    Ghz5,
    Ghz60,
    Unknown,
}

impl RadioBand {
    pub fn from_media_type(media_type: u16) -> Self {
        match media_type {
            0x0100..=0x0102 => RadioBand::Ghz2_4,
            0x0103..=0x0108 => RadioBand::Ghz5,
            0x0109 => RadioBand::Ghz60,
            _ => RadioBand::Unknown,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Radio {
    pub radio_unique_identifier: MacAddr,
    pub band: RadioBand,
    pub max_bsses_supported: u8,
    pub bsses: PtrArray<InterfaceWifi>,
}

impl Radio {
    pub fn new(radio_unique_identifier: MacAddr, band: RadioBand, max_bsses_supported: u8) -> Self {
        Radio {
            radio_unique_identifier,
            band,
            max_bsses_supported,
            bsses: PtrArray::new(),
        }
    }

    pub fn has_capacity_for_another_bss(&self) -> bool {
        self.bsses.len() < self.max_bsses_supported as usize
    }
}
