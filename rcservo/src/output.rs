use embedded_hal::pwm::SetDutyCycle;

use crate::servo::RcServo;

/// Drives a PWM channel from an [`RcServo`].
///
/// The timer is expected to run with a period of the servo's update period.
pub struct ServoOutput<P> {
    pwm: P,
}

impl<P: SetDutyCycle> ServoOutput<P> {
    pub fn new(pwm: P) -> Self {
        Self { pwm }
    }

    /// Push the servo's current pulse width to the channel.
    ///
    /// Writes zero duty while output is disabled. Returns the duty written.
    pub fn update(&mut self, servo: &RcServo) -> Result<u16, P::Error> {
        if !servo.enable_output {
            self.pwm.set_duty_cycle_fully_off()?;
            return Ok(0);
        }
        let duty = pulse_to_duty(
            servo.get_pwm(),
            servo.get_update_period(),
            self.pwm.max_duty_cycle(),
        );
        self.pwm.set_duty_cycle(duty)?;
        Ok(duty)
    }

    pub fn release(self) -> P {
        self.pwm
    }
}

/// Scale a pulse width to a duty count. Both widths are in 100ns.
///
/// A zero period saturates to `max_duty`.
pub fn pulse_to_duty(pulse: u16, period: u32, max_duty: u16) -> u16 {
    let duty = (pulse as u32 * max_duty as u32)
        .checked_div(period)
        .unwrap_or(max_duty as u32);
    duty.min(max_duty as u32) as u16
}
