//! Remote-entry message types
//!
//! Messages are divided into two directions:
//! - Phone → Vault: code entry and code change requests
//! - Vault → Phone: the verdict for a code entry

use crate::code::{decode_code, Code, CODE_LENGTH};

/// Separates the intent from the digit field
pub const FIELD_DELIMITER: char = '|';

/// Intent character for a code entry
pub const INTENT_ENTER: char = 'E';

/// Intent character for a code change
pub const INTENT_CHANGE: char = 'C';

/// Errors that can occur while parsing a remote message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// The message was empty or only whitespace
    Empty,
    /// The first character is not a known intent
    UnknownIntent,
    /// No digit field follows the delimiter
    MissingField,
    /// The digit field is not 1-4 decimal digits
    InvalidDigits,
}

/// Messages from the phone to the vault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RemoteMessage {
    /// Check a code as if it had been dialed on the encoder
    Enter(Code),
    /// Replace the stored passcode
    Change(Code),
}

impl RemoteMessage {
    /// Parse one received line
    ///
    /// Only the field after the first delimiter is read; anything after a
    /// second delimiter is ignored.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        let intent = line.chars().next().ok_or(ParseError::Empty)?;

        let mut fields = line.split(FIELD_DELIMITER);
        let head = fields.next().unwrap_or_default().trim();
        if head.len() != 1 {
            return Err(ParseError::UnknownIntent);
        }

        let field = fields.next().ok_or(ParseError::MissingField)?.trim();
        if field.is_empty() {
            return Err(ParseError::MissingField);
        }
        let code = parse_digits(field)?;

        match intent.to_ascii_uppercase() {
            INTENT_ENTER => Ok(RemoteMessage::Enter(code)),
            INTENT_CHANGE => Ok(RemoteMessage::Change(code)),
            _ => Err(ParseError::UnknownIntent),
        }
    }
}

fn parse_digits(field: &str) -> Result<Code, ParseError> {
    if field.len() > CODE_LENGTH || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidDigits);
    }

    let value = field
        .bytes()
        .fold(0u16, |acc, b| acc * 10 + (b - b'0') as u16);
    Ok(decode_code(value))
}

/// Messages from the vault to the phone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    /// The entered code matched
    Correct,
    /// The entered code did not match, or the vault is locked out
    Incorrect,
}

impl Response {
    /// Wire form of the response, terminator included
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            Response::Correct => b"1\r\n",
            Response::Incorrect => b"0\r\n",
        }
    }
}

impl From<bool> for Response {
    fn from(correct: bool) -> Self {
        if correct {
            Response::Correct
        } else {
            Response::Incorrect
        }
    }
}
