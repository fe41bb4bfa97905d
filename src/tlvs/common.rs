//! Small enums shared by several TLV bodies. Kept deliberately permissive (an
//! `Other(raw)` fallback on every enum) so that parsing never has to reject a
//! spec-compliant but locally-unrecognised value, and so that `forge(parse(x)) == x`
//! holds even for TLVs the original only half-describes.

use std::fmt;

macro_rules! byte_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $value:expr),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant,)+
            Other(u8),
        }

        impl $name {
            pub fn from_u8(v: u8) -> Self {
                match v {
                    $($value => $name::$variant,)+
                    other => $name::Other(other),
                }
            }

            pub fn to_u8(self) -> u8 {
                match self {
                    $($name::$variant => $value,)+
                    $name::Other(v) => v,
                }
            }
        }
    };
}

byte_enum!(
    /// "Specified neighbor type" field of the Link Metric Query TLV.
    NeighborType {
        AllNeighbors = 0x00,
        SpecificNeighbor = 0x01,
    }
);

byte_enum!(
    /// "Link metrics requested" field of the Link Metric Query TLV.
    LinkMetricsRequested {
        TxOnly = 0x00,
        RxOnly = 0x01,
        TxAndRx = 0x02,
    }
);

byte_enum!(
    /// Registrar/agent role advertised in AP-Autoconfiguration Search/Response.
    Role {
        Registrar = 0x00,
    }
);

byte_enum!(
    /// RF band, as used by `AutoconfigFreqBand` and `SupportedFreqBand`.
    FreqBand {
        Band2_4Ghz = 0x00,
        Band5Ghz = 0x01,
        Band60Ghz = 0x02,
    }
);

impl fmt::Display for FreqBand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FreqBand::Band2_4Ghz => write!(f, "2.4GHz"),
            FreqBand::Band5Ghz => write!(f, "5GHz"),
            FreqBand::Band60Ghz => write!(f, "60GHz"),
            FreqBand::Other(v) => write!(f, "band({v:#x})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_known_and_unknown_values() {
        assert_eq!(NeighborType::from_u8(0x00), NeighborType::AllNeighbors);
        assert_eq!(NeighborType::AllNeighbors.to_u8(), 0x00);
        assert_eq!(NeighborType::from_u8(0x42), NeighborType::Other(0x42));
        assert_eq!(NeighborType::Other(0x42).to_u8(), 0x42);
    }
}
