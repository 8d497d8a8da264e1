//! RP2040-specific HAL for the vault firmware
//!
//! This crate provides RP2040 implementations of the shared `tumbler-hal`
//! traits:
//!
//! - GPIO newtypes over embassy-rp pins
//! - PWM slice configurations for the servo and the buzzer
//! - Emulated EEPROM in flash (implements `tumbler_hal::NvStorage`)

#![no_std]

pub mod flash;
pub mod gpio;
pub mod pwm;

// Re-export shared traits from tumbler-hal for convenience
pub use tumbler_hal::{NvStorage, StorageKey};
