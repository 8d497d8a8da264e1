//! Configuration types
//!
//! Compile-time layout constants plus the runtime-tunable [`VaultConfig`].
//! The firmware builds its `VaultConfig` from `vault.toml` at build time.

pub mod layout;
pub mod vault;

pub use layout::*;
pub use vault::{ConfigError, VaultConfig};
