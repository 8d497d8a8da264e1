//! Board-agnostic core logic for the vault firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Rotary encoder decoding and button press detection
//! - Digit entry on the 4-digit display
//! - Display state shared between the refresh and flash loops
//! - Password verification with persisted incorrect-tries counter
//! - Lockout policy and the door state machine
//! - Configuration type definitions
//!
//! Nothing in here owns a global. The firmware places the context structs
//! in statics and hands out references.

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod display;
pub mod input;
pub mod password;
pub mod state;
pub mod traits;
pub mod vault;

#[cfg(test)]
pub(crate) mod test_support;

pub use tumbler_protocol::{Code, CODE_LENGTH};
