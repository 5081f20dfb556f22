//! Non-volatile calibration storage.
//!
//! The flash/EEPROM driver implements [`CalibrationStore`]; the servo reads
//! its record at boot and writes it back after calibration changes.

use crate::calib::{Calibration, CALIBRATION_BUFFER_SIZE};
use crate::err::Error;
use crate::fmt::log_warn;
use crate::servo::RcServo;

pub trait CalibrationStore {
    type Error;

    fn read(&mut self, buf: &mut [u8; CALIBRATION_BUFFER_SIZE]) -> Result<(), Self::Error>;
    fn write(&mut self, buf: &[u8; CALIBRATION_BUFFER_SIZE]) -> Result<(), Self::Error>;
}

#[cfg_attr(feature = "no_std", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StoreError<E> {
    Storage(E),
    Decode(Error),
}

impl RcServo {
    /// Restore calibration from storage.
    ///
    /// On any failure the servo keeps the default calibration and the error is
    /// handed back so the caller can decide whether to rewrite the record.
    pub fn restore<S: CalibrationStore>(
        &mut self,
        store: &mut S,
    ) -> Result<(), StoreError<S::Error>> {
        let mut buf = [0u8; CALIBRATION_BUFFER_SIZE];
        if let Err(e) = store.read(&mut buf) {
            log_warn!("calibration read failed, using defaults");
            self.calib = Calibration::default();
            return Err(StoreError::Storage(e));
        }
        if let Err(e) = self.load_calibration(&buf) {
            self.calib = Calibration::default();
            return Err(StoreError::Decode(e));
        }
        Ok(())
    }

    /// Write the current calibration to storage.
    pub fn persist<S: CalibrationStore>(&self, store: &mut S) -> Result<(), StoreError<S::Error>> {
        let buf = self.calib.to_bytes();
        store.write(&buf).map_err(StoreError::Storage)
    }
}
