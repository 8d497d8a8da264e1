//! Rotary encoder keypad
//!
//! The encoder pins raise interrupts that only touch [`RotaryEncoder`].
//! Everything else runs in the polling input loop.

pub mod button;
pub mod entry;
pub mod rotary;

pub use button::PressDetector;
pub use entry::DigitEntryController;
pub use rotary::{pin_levels, sample_levels, EncoderPin, RotaryEncoder};
