//! Vault timing and threshold configuration

use tumbler_protocol::Code;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors from configuration validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Flash time cannot be split into two visible halves
    FlashTimeTooShort,
    /// Error feedback needs at least one blink
    FlashCountZero,
    /// Refresh loop needs a non-zero lock wait
    RefreshWaitZero,
    /// Lockout would trigger before any attempt
    MaxTriesZero,
    /// Default passcode contains a digit above 9
    InvalidDefaultPasscode,
}

/// Vault timings and thresholds
///
/// All durations are milliseconds unless the field name says otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VaultConfig {
    /// Minimum gap between two writes of the encoder value into a slot
    pub read_input_delay_ms: u32,
    /// Rotary push button debounce
    pub button_debounce_ms: u32,
    /// Reset-password button debounce
    pub reset_button_debounce_ms: u32,
    /// Length of one error blink (pattern plus blank)
    pub flash_time_ms: u32,
    /// Number of error blinks
    pub flash_count: u8,
    /// Longest the refresh loop waits for the output lock
    pub refresh_lock_wait_ms: u32,
    /// Incorrect tries before entry is locked out
    pub max_incorrect_tries: u8,
    /// Lockout length in seconds
    pub lock_time_s: u16,
    /// Relock delay when the door is never opened after an unlock
    pub unlock_lock_delay_ms: u32,
    /// Relock delay after the door closes
    pub lock_delay_ms: u32,
    /// Relock delay after a passcode reset
    pub reset_lock_delay_ms: u32,
    /// How long the buzzer sounds on a rejected code
    pub buzzer_time_ms: u32,
    /// Passcode written on first boot and by the reset button
    pub default_passcode: Code,
}

impl VaultConfig {
    pub const DEFAULT: Self = Self {
        read_input_delay_ms: 50,
        button_debounce_ms: 50,
        reset_button_debounce_ms: 200,
        flash_time_ms: 900,
        flash_count: 3,
        refresh_lock_wait_ms: 10,
        max_incorrect_tries: 3,
        lock_time_s: 180,
        unlock_lock_delay_ms: 5000,
        lock_delay_ms: 2500,
        reset_lock_delay_ms: 600,
        buzzer_time_ms: 1000,
        default_passcode: [0; 4],
    };

    /// Check the values for combinations the vault cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.flash_time_ms < 2 {
            return Err(ConfigError::FlashTimeTooShort);
        }
        if self.flash_count == 0 {
            return Err(ConfigError::FlashCountZero);
        }
        if self.refresh_lock_wait_ms == 0 {
            return Err(ConfigError::RefreshWaitZero);
        }
        if self.max_incorrect_tries == 0 {
            return Err(ConfigError::MaxTriesZero);
        }
        if self.default_passcode.iter().any(|&d| d > 9) {
            return Err(ConfigError::InvalidDefaultPasscode);
        }
        Ok(())
    }

    /// Lockout length in milliseconds
    pub fn lock_time_ms(&self) -> u64 {
        self.lock_time_s as u64 * 1000
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
