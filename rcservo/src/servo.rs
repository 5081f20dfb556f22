use crate::calib::{Calibration, UPDATE_PERIOD_SCALE};
use crate::codec;
use crate::err::Error;
use crate::fmt::{log_debug, log_warn};

/// Single RC servo channel.
///
/// Holds the unit's calibration, the current pulse width and whether the PWM
/// driver should emit pulses at all. The driver polls [`RcServo::get_pwm`] and
/// [`RcServo::get_update_period`]; nothing here touches hardware.
#[cfg_attr(feature = "no_std", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RcServo {
    pub calib: Calibration,
    pub pos: u16,            // [100ns] current pulse width
    pub enable_output: bool, // pulse output enabled
}

impl Default for RcServo {
    fn default() -> Self {
        Self::new()
    }
}

impl RcServo {
    /// Default calibration, output disabled, positioned at zero.
    pub fn new() -> Self {
        let calib = Calibration::default();
        Self {
            calib,
            pos: calib.zero,
            enable_output: false,
        }
    }

    /// Reset to defaults, discarding any loaded calibration.
    pub fn init(&mut self) {
        *self = Self::new();
    }

    pub fn enable(&mut self) {
        log_debug!("servo output enabled");
        self.enable_output = true;
    }

    pub fn disable(&mut self) {
        log_debug!("servo output disabled");
        self.enable_output = false;
    }

    /// Load a serialized calibration, returning the bytes after the record.
    pub fn load_calibration<'a>(&mut self, src: &'a [u8]) -> Result<&'a [u8], Error> {
        match codec::load(&mut self.calib, src) {
            Ok(rest) => {
                log_debug!("calibration loaded: {:?}", self.calib);
                Ok(rest)
            }
            Err(e) => {
                log_warn!("calibration load failed: {:?}", e);
                Err(e)
            }
        }
    }

    /// Serialize the calibration into `dst`, returning the unwritten tail.
    pub fn save_calibration<'a>(&self, dst: &'a mut [u8]) -> Result<&'a mut [u8], Error> {
        let rest = codec::save(&self.calib, dst)?;
        log_debug!("calibration saved");
        Ok(rest)
    }

    /// Set position, full scale is about [-1, 1].
    ///
    /// NaN maps to zero. The result is clamped to the mechanical limits, so
    /// out of range and infinite inputs end up at `min`/`max`. An input of
    /// exactly 0 goes through `gain_neg`.
    pub fn set(&mut self, input: f32) {
        let input = if input.is_nan() { 0.0 } else { input };
        let gain = if input > 0.0 {
            self.calib.gain_pos
        } else {
            self.calib.gain_neg
        };

        // zero gain with infinite input would give NaN
        let offset = if gain == 0 { 0.0 } else { input * gain as f32 };
        let mut pulse = self.calib.zero as f32 + offset;

        // max first, so min wins if the limits are crossed
        if pulse > self.calib.max as f32 {
            pulse = self.calib.max as f32;
        }
        if pulse < self.calib.min as f32 {
            pulse = self.calib.min as f32;
        }
        self.pos = pulse as u16;
    }

    /// Set raw pulse width in 100ns. Calibration and min/max limits don't apply!
    pub fn set_raw(&mut self, pwm: u16) {
        self.pos = pwm;
    }

    /// Pulse width in 100ns.
    pub fn get_pwm(&self) -> u16 {
        self.pos
    }

    /// Minimum interval between pulses in 100ns.
    pub fn get_update_period(&self) -> u32 {
        self.calib.update_period as u32 * UPDATE_PERIOD_SCALE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom() -> RcServo {
        let mut s = RcServo::new();
        s.calib.gain_pos = 1000;
        s.calib.gain_neg = 1000;
        s.calib.zero = 13000;
        s.calib.min = 10000;
        s.calib.max = 20000;
        s.calib.update_period = 100;
        s
    }

    #[test]
    fn init_overwrites() {
        let mut s = custom();
        s.enable();
        s.set_raw(1);
        s.init();
        assert_eq!(s, RcServo::new());
        assert_eq!(s.pos, 15000);
        assert!(!s.enable_output);
    }

    #[test]
    fn enable_touches_only_flag() {
        let mut s = custom();
        s.set_raw(12345);
        let before = s;
        s.enable();
        assert!(s.enable_output);
        assert_eq!(s.calib, before.calib);
        assert_eq!(s.pos, before.pos);
        s.disable();
        assert_eq!(s, before);
    }

    #[test]
    fn zero_input_uses_gain_neg() {
        // only observable when the two gains differ
        let mut s = RcServo::new();
        s.calib.gain_neg = 0;
        s.set(0.0);
        assert_eq!(s.pos, 15000);
        s.set(-0.0);
        assert_eq!(s.pos, 15000);
        s.set(1.0);
        assert_eq!(s.pos, 20000);
        s.set(-1.0);
        assert_eq!(s.pos, 15000);
    }

    #[test]
    fn asymmetric_gains() {
        let mut s = custom();
        s.calib.gain_pos = 2000;
        s.calib.gain_neg = 500;
        s.set(1.0);
        assert_eq!(s.pos, 15000);
        s.set(-1.0);
        assert_eq!(s.pos, 12500);
    }

    #[test]
    fn zero_gain_infinite_input() {
        let mut s = custom();
        s.calib.gain_pos = 0;
        s.set(f32::INFINITY);
        assert_eq!(s.pos, 13000);
    }

    #[test]
    fn crossed_limits_min_wins() {
        let mut s = RcServo::new();
        s.calib.min = 16000;
        s.calib.max = 14000;
        s.set(0.0);
        assert_eq!(s.pos, 16000);
        s.set(1.0);
        assert_eq!(s.pos, 16000);
    }

    #[test]
    fn set_truncates() {
        let mut s = RcServo::new();
        // 15000 + 0.00005 * 5000 = 15000.25
        s.set(0.00005);
        assert_eq!(s.pos, 15000);
    }

    #[test]
    fn update_period_max() {
        let mut s = RcServo::new();
        s.calib.update_period = u8::MAX;
        assert_eq!(s.get_update_period(), 255_000);
    }

    #[test]
    fn load_failure_reports_error() {
        let mut s = RcServo::new();
        let rec = [0x95u8, 0xcd, 0x13, 0x88];
        assert_eq!(s.load_calibration(&rec), Err(Error::ArrayLen(5)));
    }
}
