//! RC servo driver core.
//!
//! Maps a normalized command (about [-1, 1]) onto a pulse width through a
//! per-unit calibration, and stores that calibration as an 18 byte
//! MessagePack record:
//! `[u16:gain_pos, u16:gain_neg, u16:zero, u16:min, u16:max, u8:update_period]`
//!
//! Pulse widths are in 100ns units throughout.

#![cfg_attr(all(feature = "no_std", not(test)), no_std)]

mod fmt;

pub mod calib;
pub mod codec;
pub mod err;
pub mod output;
pub mod servo;
pub mod store;

pub use calib::{Calibration, CALIBRATION_BUFFER_SIZE};
pub use err::Error;
pub use output::ServoOutput;
pub use servo::RcServo;
pub use store::{CalibrationStore, StoreError};
