//! Tumbler Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the vault logic is written
//! against. Chip-specific crates implement them, and host tests implement
//! them with plain structs.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  tumbler-core / tumbler-drivers         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tumbler-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ tumbler-hal-  │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`storage::NvStorage`] - Byte-addressed persistent storage

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod storage;

// Re-export key traits at crate root for convenience
pub use gpio::{ActiveLow, InputPin, OutputPin};
pub use storage::{EepromImage, NvStorage, StorageError, StorageKey, EEPROM_SIZE};
