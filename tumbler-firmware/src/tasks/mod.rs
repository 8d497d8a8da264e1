//! Embassy async tasks
//!
//! Each task handles a specific subsystem:
//! - Display refresh: multiplexes the four digits
//! - Display flash: blinks the error pattern, one run at a time
//! - Rotary: counts encoder detents from pin edges
//! - Input: code entry, reset button and the vault controller
//! - Remote: Bluetooth serial code entry

mod display;
mod input;
mod remote;
mod rotary;

pub use display::{display_refresh_task, flash_error};
pub use input::input_task;
pub use remote::remote_task;
pub use rotary::rotary_task;
