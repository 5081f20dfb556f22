use static_assertions::const_assert_eq;

use crate::codec::{self, Reader, Writer};
use crate::err::Error;

/// Number of fields in the serialized calibration array.
pub const CALIBRATION_ARRAY_LEN: u32 = 6;

/// Serialized calibration size:
/// array header (1) + u16 fields (1 tag + 2 data) * 5 + u8 field (1 tag + 1 data)
pub const CALIBRATION_BUFFER_SIZE: usize = 18;

const_assert_eq!(CALIBRATION_BUFFER_SIZE, 1 + 5 * (1 + 2) + (1 + 1));

// [-1, 1] full scale maps to [1ms, 2ms], zero at 1.5ms, limits [0.9ms, 2.1ms]
pub const DEFAULT_GAIN_POS: u16 = 5000;
pub const DEFAULT_GAIN_NEG: u16 = 5000;
pub const DEFAULT_ZERO: u16 = 15000;
pub const DEFAULT_MIN: u16 = 9000;
pub const DEFAULT_MAX: u16 = 21000;
/// 20ms
pub const DEFAULT_UPDATE_PERIOD: u8 = 200;

/// `update_period` is stored in 100us, pulse widths in 100ns.
pub const UPDATE_PERIOD_SCALE: u32 = 1000;

/// Per-unit servo calibration.
///
/// Pulse widths and gains are in 100ns counts, `update_period` in 100us.
#[cfg_attr(feature = "no_std", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calibration {
    pub gain_pos: u16,     // gain for input > 0
    pub gain_neg: u16,     // gain for input <= 0
    pub zero: u16,         // pulse width at zero input
    pub min: u16,          // mechanical min pulse width
    pub max: u16,          // mechanical max pulse width
    pub update_period: u8, // minimum interval between pulses
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            gain_pos: DEFAULT_GAIN_POS,
            gain_neg: DEFAULT_GAIN_NEG,
            zero: DEFAULT_ZERO,
            min: DEFAULT_MIN,
            max: DEFAULT_MAX,
            update_period: DEFAULT_UPDATE_PERIOD,
        }
    }
}

impl Calibration {
    /// Decode a calibration record from the start of `bytes`.
    ///
    /// Trailing bytes after the record are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut rd = Reader::new(bytes);
        let calib = codec::read_calibration(&mut rd)?;
        Ok(calib)
    }

    pub fn to_bytes(&self) -> [u8; CALIBRATION_BUFFER_SIZE] {
        let mut bytes = [0u8; CALIBRATION_BUFFER_SIZE];
        let mut wr = Writer::new(&mut bytes);
        // the array is exactly one record long
        let written = codec::write_calibration(&mut wr, self);
        debug_assert!(written.is_ok());
        bytes
    }
}
