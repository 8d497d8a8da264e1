//! Polled push-button press detection
//!
//! A press fires when the button is asserted and the previous asserted
//! poll was more than the debounce interval ago. Every asserted poll moves
//! the timestamp, so holding the button fires once and releasing it for
//! longer than the interval re-arms it.

use tumbler_hal::InputPin;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressDetector {
    debounce_ms: u32,
    last_asserted_ms: Option<u64>,
}

impl PressDetector {
    pub const fn new(debounce_ms: u32) -> Self {
        Self {
            debounce_ms,
            last_asserted_ms: None,
        }
    }

    /// Feed one sample; returns true when it counts as a new press
    pub fn poll(&mut self, asserted: bool, now_ms: u64) -> bool {
        if !asserted {
            return false;
        }

        let fired = match self.last_asserted_ms {
            Some(last) => now_ms.saturating_sub(last) > self.debounce_ms as u64,
            None => true,
        };
        self.last_asserted_ms = Some(now_ms);
        fired
    }

    /// Sample a pin that reads high while pressed
    pub fn poll_pin<P: InputPin>(&mut self, pin: &P, now_ms: u64) -> bool {
        self.poll(pin.is_high(), now_ms)
    }
}
