//! Remote-Entry Line Protocol
//!
//! This crate defines the text protocol spoken over the Bluetooth serial
//! link between a paired phone and the vault. Every message is one line:
//!
//! ```text
//! ┌────────┬───────┬──────────────┬──────────────┐
//! │ INTENT │ DELIM │ DIGITS       │ TERMINATOR   │
//! │ 1 char │ '|'   │ 1-4 decimal  │ \r and/or \n │
//! └────────┴───────┴──────────────┴──────────────┘
//! ```
//!
//! - `E|1234` - enter a code; the vault answers `1` or `0`
//! - `C|1234` - change the stored code; no answer
//!
//! Short digit fields are zero-padded on the left, so `E|7` means `0007`.

#![no_std]
#![deny(unsafe_code)]

pub mod code;
pub mod line;
pub mod messages;

pub use code::{decode_code, Code, CODE_LENGTH, MAX_CODE_VALUE};
pub use line::{Line, LineError, LineParser, MAX_LINE_LENGTH};
pub use messages::{ParseError, RemoteMessage, Response, FIELD_DELIMITER};
