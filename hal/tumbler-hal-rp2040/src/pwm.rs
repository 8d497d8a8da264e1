//! PWM slice configuration
//!
//! The system clock is 125 MHz. A divider of 64 gives a 1.953125 MHz
//! counter clock, from which `top` picks the output frequency.

use embassy_rp::pwm::Config;
use fixed::traits::ToFixed;

/// Counter clock divider used for both slices
const DIVIDER: u8 = 64;

/// Counter ticks per 20 ms servo period (50 Hz)
pub const SERVO_TOP: u16 = 39_062;

/// Counter ticks per buzzer period (about 2 kHz)
pub const BUZZER_TOP: u16 = 976;

fn config(top: u16) -> Config {
    let mut config = Config::default();
    config.divider = DIVIDER.to_fixed();
    config.top = top;
    config.compare_a = 0;
    config.compare_b = 0;
    config
}

/// 50 Hz slice for a hobby servo
pub fn servo_config() -> Config {
    config(SERVO_TOP)
}

/// Audio-rate slice for a passive buzzer, output off
pub fn buzzer_config() -> Config {
    config(BUZZER_TOP)
}
