//! Fixed dimensions and the persistent storage layout

use tumbler_protocol::CODE_LENGTH;

/// Number of digits on the display, one per code digit
pub const DIGIT_COUNT: usize = CODE_LENGTH;

/// Smallest value the rotary counter takes
pub const COUNTER_MIN: u8 = 0;

/// Largest value the rotary counter takes
pub const COUNTER_MAX: u8 = 9;

/// Address of the "already initialised" marker byte
pub const INIT_MARKER_ADDRESS: u16 = 0;

/// Value of the marker once the store has been provisioned
pub const INIT_MARKER: u8 = 0xA5;

/// Address of the first passcode digit; the rest follow consecutively
pub const PASSCODE_ADDRESS: u16 = 1;

/// Address of the incorrect-tries counter, right after the passcode
pub const INCORRECT_TRIES_ADDRESS: u16 = PASSCODE_ADDRESS + CODE_LENGTH as u16;

/// Bytes of storage the layout needs
pub const STORAGE_FOOTPRINT: usize = INCORRECT_TRIES_ADDRESS as usize + 1;
