//! Multiplexed 4-digit display
//!
//! Two loops compete for the physical output: the refresh loop scans the
//! digits continuously and the flash loop takes over to blink the error
//! pattern. The output mutex decides who drives the hardware; the
//! `flashing` and `flash_requested` hints let the refresh loop back off
//! without touching the lock.

pub mod encoding;
pub mod flash;
pub mod refresh;
pub mod state;

pub use encoding::{digit_code, wire_byte, BLANK_CODE, ERROR_PATTERN_CODE};
pub use flash::{FlashLoop, FlashSequence};
pub use refresh::RefreshLoop;
pub use state::{DecimalPoint, DisplayContext, DisplayState};
