//! Servo-driven latch
//!
//! A standard hobby servo on a 50 Hz PWM channel swings the bolt between
//! 0° (locked) and 90° (unlocked). The door-state switch pulls its input
//! low while the door is open.

use embedded_hal::pwm::SetDutyCycle;
use tumbler_core::traits::DoorLock;
use tumbler_hal::InputPin;

/// Latch angle when locked
pub const LOCKED_DEGREES: u16 = 0;

/// Latch angle when unlocked
pub const UNLOCKED_DEGREES: u16 = 90;

/// Pulse widths of the servo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServoTiming {
    /// PWM period, 20 ms at 50 Hz
    pub period_us: u16,
    /// Pulse for 0°
    pub min_pulse_us: u16,
    /// Pulse for 180°
    pub max_pulse_us: u16,
}

impl Default for ServoTiming {
    fn default() -> Self {
        Self {
            period_us: 20_000,
            min_pulse_us: 544,
            max_pulse_us: 2_400,
        }
    }
}

impl ServoTiming {
    /// Pulse width for an angle, clamped to 0..=180°
    pub fn pulse_us(&self, degrees: u16) -> u16 {
        let degrees = degrees.min(180) as u32;
        let span = (self.max_pulse_us - self.min_pulse_us) as u32;
        self.min_pulse_us + (span * degrees / 180) as u16
    }
}

pub struct ServoLatch<P, S> {
    pwm: P,
    door: S,
    timing: ServoTiming,
    locked: bool,
}

impl<P: SetDutyCycle, S: InputPin> ServoLatch<P, S> {
    /// Create the latch; the servo is not moved until `lock` or `unlock`
    pub fn new(pwm: P, door: S, timing: ServoTiming) -> Self {
        Self {
            pwm,
            door,
            timing,
            locked: false,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    fn move_to(&mut self, degrees: u16) -> Result<(), P::Error> {
        let pulse = self.timing.pulse_us(degrees);
        self.pwm
            .set_duty_cycle_fraction(pulse, self.timing.period_us)
    }
}

impl<P: SetDutyCycle, S: InputPin> DoorLock for ServoLatch<P, S> {
    type Error = P::Error;

    fn lock(&mut self) -> Result<(), Self::Error> {
        self.move_to(LOCKED_DEGREES)?;
        self.locked = true;
        Ok(())
    }

    fn unlock(&mut self) -> Result<(), Self::Error> {
        self.move_to(UNLOCKED_DEGREES)?;
        self.locked = false;
        Ok(())
    }

    fn is_door_open(&self) -> bool {
        self.door.is_low()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::pwm::ErrorType;

    /// PWM channel with a 20000-step period, one step per microsecond
    struct MockPwm {
        duty: u16,
    }

    impl ErrorType for MockPwm {
        type Error = Infallible;
    }

    impl SetDutyCycle for MockPwm {
        fn max_duty_cycle(&self) -> u16 {
            20_000
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
            self.duty = duty;
            Ok(())
        }
    }

    struct MockSwitch(bool);

    impl InputPin for MockSwitch {
        fn is_high(&self) -> bool {
            self.0
        }
    }

    fn latch(door_high: bool) -> ServoLatch<MockPwm, MockSwitch> {
        ServoLatch::new(MockPwm { duty: 0 }, MockSwitch(door_high), ServoTiming::default())
    }

    #[test]
    fn test_pulse_widths() {
        let timing = ServoTiming::default();
        assert_eq!(timing.pulse_us(0), 544);
        assert_eq!(timing.pulse_us(90), 1_472);
        assert_eq!(timing.pulse_us(180), 2_400);
        assert_eq!(timing.pulse_us(270), 2_400);
    }

    #[test]
    fn test_lock_and_unlock_positions() {
        let mut latch = latch(true);

        latch.lock().unwrap();
        assert!(latch.is_locked());
        assert_eq!(latch.pwm.duty, 544);

        latch.unlock().unwrap();
        assert!(!latch.is_locked());
        assert_eq!(latch.pwm.duty, 1_472);
    }

    #[test]
    fn test_door_switch_active_low() {
        assert!(!latch(true).is_door_open());
        assert!(latch(false).is_door_open());
    }
}
