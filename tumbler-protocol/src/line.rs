//! Line framing for the remote-entry serial link.
//!
//! The phone terminal sends `\r\n`, `\n` or a bare `\r` depending on its
//! settings, so any of them ends a line and empty lines are skipped.
//! Bytes outside printable ASCII are dropped before they reach the buffer.

use heapless::String;

/// Longest accepted line, excluding the terminator
pub const MAX_LINE_LENGTH: usize = 32;

/// A complete received line
pub type Line = String<MAX_LINE_LENGTH>;

/// Errors that can occur while assembling a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// More than `MAX_LINE_LENGTH` bytes arrived before a terminator
    TooLong,
}

/// Accumulates bytes into terminator-delimited lines
#[derive(Debug, Clone, Default)]
pub struct LineParser {
    buffer: Line,
    overflowed: bool,
}

impl LineParser {
    /// Create an empty line parser
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            overflowed: false,
        }
    }

    /// Drop any partially received line
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.overflowed = false;
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(line))` when a terminator completes a non-empty line
    /// and `Ok(None)` when more bytes are needed. An overlong line is
    /// reported once, at its terminator, and then discarded.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Line>, LineError> {
        match byte {
            b'\r' | b'\n' => {
                if self.overflowed {
                    self.reset();
                    return Err(LineError::TooLong);
                }
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                let line = self.buffer.clone();
                self.buffer.clear();
                Ok(Some(line))
            }
            0x20..=0x7E => {
                if !self.overflowed && self.buffer.push(byte as char).is_err() {
                    self.overflowed = true;
                }
                Ok(None)
            }
            _ => Ok(None),
        }
    }
}
