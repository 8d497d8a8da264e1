//! Shift-register byte encoding
//!
//! The 74HC595 feeds a BCD-to-7-segment decoder on the high nibble and the
//! digit enables on the low nibble. Both sides are active low, so the byte
//! on the wire is the complement of the code built here.

use crate::config::{COUNTER_MAX, DIGIT_COUNT};

/// Code for all digits showing 8, the error pattern
pub const ERROR_PATTERN_CODE: u8 = ((15 - 8) << 4) | 0b1111;

/// Code with no digit enabled
pub const BLANK_CODE: u8 = 0;

/// Code for `digit` shown at display `position` (0 = leftmost)
///
/// Digits above 9 are clamped to 9 and positions wrap within the display.
pub const fn digit_code(digit: u8, position: u8) -> u8 {
    let digit = if digit > COUNTER_MAX { COUNTER_MAX } else { digit };
    let position = position % DIGIT_COUNT as u8;
    ((15 - digit) << 4) | (1 << position)
}

/// Byte shifted out for a code
pub const fn wire_byte(code: u8) -> u8 {
    !code
}
