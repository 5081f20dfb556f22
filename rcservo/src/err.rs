use core::fmt::Display;

/// MessagePack markers used by the calibration record.
#[cfg_attr(feature = "no_std", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    FixArray,
    Array16,
    Array32,
    U8,
    U16,
}

impl Marker {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x90..=0x9f => Some(Marker::FixArray),
            0xdc => Some(Marker::Array16),
            0xdd => Some(Marker::Array32),
            0xcc => Some(Marker::U8),
            0xcd => Some(Marker::U16),
            _ => None,
        }
    }

    /// Tag byte for this marker. For `FixArray` this is the base value; the
    /// element count lives in the low nibble.
    pub fn to_byte(&self) -> u8 {
        match self {
            Marker::FixArray => 0x90,
            Marker::Array16 => 0xdc,
            Marker::Array32 => 0xdd,
            Marker::U8 => 0xcc,
            Marker::U16 => 0xcd,
        }
    }
}

/// Calibration codec errors.
#[cfg_attr(feature = "no_std", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// ran out of input before the record was complete
    UnexpectedEof,
    /// array header declared the wrong number of elements
    ArrayLen(u32),
    /// a field was tagged with an unexpected type
    TypeTag { expected: Marker, found: u8 },
    /// record parsed, but did not occupy exactly `CALIBRATION_BUFFER_SIZE` bytes
    Length(usize),
    /// destination buffer can't hold a full record
    BufferTooSmall(usize),
}

impl Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::UnexpectedEof => write!(f, "unexpected end of calibration data"),
            Error::ArrayLen(n) => write!(f, "expected array of 6 elements, found {}", n),
            Error::TypeTag { expected, found } => {
                write!(f, "expected {:?} tag, found 0x{:02x}", expected, found)
            }
            Error::Length(n) => write!(f, "calibration record is {} bytes, expected 18", n),
            Error::BufferTooSmall(n) => {
                write!(f, "buffer of {} bytes is too small for calibration", n)
            }
        }
    }
}

// `no_std` wins when both features are on
#[cfg(all(feature = "std", not(feature = "no_std")))]
impl std::error::Error for Error {}
