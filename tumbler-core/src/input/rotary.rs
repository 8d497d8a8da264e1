//! Quadrature decoding for the rotary encoder
//!
//! Each pin's falling-edge handler samples both pins. The encoder contacts
//! pull their lines to ground, so a set bit in the sampled levels means the
//! contact is closed (the line reads low). A detent is counted when one pin
//! has seen its half-step and the other then finds both contacts closed.
//! The counter wraps within `0..=9`.
//!
//! ```text
//! clockwise:          A falls with levels 0b10 -> seen_a
//!                     B falls with levels 0b11 -> +1
//! counter-clockwise:  B falls with levels 0b01 -> seen_b
//!                     A falls with levels 0b11 -> -1
//! ```

use portable_atomic::{AtomicBool, AtomicU8, Ordering};
use tumbler_hal::InputPin;

use crate::config::{COUNTER_MAX, COUNTER_MIN};

const BOTH_HIGH: u8 = 0b11;
const ONLY_A: u8 = 0b10;
const ONLY_B: u8 = 0b01;

/// Pack the two contact states as `(A << 1) | B`
pub const fn pin_levels(a_closed: bool, b_closed: bool) -> u8 {
    ((a_closed as u8) << 1) | b_closed as u8
}

/// Sample both encoder lines of a pulled-up encoder
pub fn sample_levels(pin_a: &impl InputPin, pin_b: &impl InputPin) -> u8 {
    pin_levels(pin_a.is_low(), pin_b.is_low())
}

/// Encoder channel that produced an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncoderPin {
    A,
    B,
}

/// Encoder state shared between the pin handlers and the input loop
///
/// Every field is an atomic so the handlers can run from interrupt
/// context while the input loop reads the counter.
#[derive(Debug)]
pub struct RotaryEncoder {
    counter: AtomicU8,
    seen_a: AtomicBool,
    seen_b: AtomicBool,
}

impl Default for RotaryEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl RotaryEncoder {
    pub const fn new() -> Self {
        Self {
            counter: AtomicU8::new(COUNTER_MIN),
            seen_a: AtomicBool::new(false),
            seen_b: AtomicBool::new(false),
        }
    }

    /// Handler for a falling edge on pin A
    pub fn on_pin_a_falling(&self, levels: u8) {
        if self.seen_b.load(Ordering::Relaxed) && levels == BOTH_HIGH {
            self.step(false);
        } else if levels == ONLY_A {
            self.seen_a.store(true, Ordering::Relaxed);
        }
    }

    /// Handler for a falling edge on pin B
    pub fn on_pin_b_falling(&self, levels: u8) {
        if self.seen_a.load(Ordering::Relaxed) && levels == BOTH_HIGH {
            self.step(true);
        } else if levels == ONLY_B {
            self.seen_b.store(true, Ordering::Relaxed);
        }
    }

    /// Sample the raw pins after a falling edge on `edge` and decode
    pub fn on_falling_edge(
        &self,
        edge: EncoderPin,
        pin_a: &impl InputPin,
        pin_b: &impl InputPin,
    ) {
        let levels = sample_levels(pin_a, pin_b);
        match edge {
            EncoderPin::A => self.on_pin_a_falling(levels),
            EncoderPin::B => self.on_pin_b_falling(levels),
        }
    }

    /// Current value, always in `0..=9`
    pub fn counter(&self) -> u8 {
        self.counter.load(Ordering::Acquire)
    }

    pub fn reset(&self) {
        self.counter.store(COUNTER_MIN, Ordering::Release);
    }

    fn step(&self, clockwise: bool) {
        let _ = self
            .counter
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |value| {
                Some(match (clockwise, value) {
                    (true, v) if v >= COUNTER_MAX => COUNTER_MIN,
                    (true, v) => v + 1,
                    (false, v) if v == COUNTER_MIN || v > COUNTER_MAX => COUNTER_MAX,
                    (false, v) => v - 1,
                })
            });
        self.seen_a.store(false, Ordering::Relaxed);
        self.seen_b.store(false, Ordering::Relaxed);
    }
}
