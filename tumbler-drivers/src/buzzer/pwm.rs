//! PWM buzzer
//!
//! A passive piezo driven at half duty. The tone frequency is whatever
//! the PWM slice is configured for.

use embedded_hal::pwm::SetDutyCycle;
use tumbler_core::traits::Buzzer;

/// Duty cycle while sounding
const TONE_DUTY_PERCENT: u8 = 50;

pub struct PwmBuzzer<P> {
    pwm: P,
    sounding: bool,
}

impl<P: SetDutyCycle> PwmBuzzer<P> {
    /// Create a buzzer, silenced
    pub fn new(mut pwm: P) -> Result<Self, P::Error> {
        pwm.set_duty_cycle_fully_off()?;
        Ok(Self {
            pwm,
            sounding: false,
        })
    }

    pub fn is_sounding(&self) -> bool {
        self.sounding
    }
}

impl<P: SetDutyCycle> Buzzer for PwmBuzzer<P> {
    type Error = P::Error;

    fn set_sounding(&mut self, on: bool) -> Result<(), Self::Error> {
        if on {
            self.pwm.set_duty_cycle_percent(TONE_DUTY_PERCENT)?;
        } else {
            self.pwm.set_duty_cycle_fully_off()?;
        }
        self.sounding = on;
        Ok(())
    }
}
