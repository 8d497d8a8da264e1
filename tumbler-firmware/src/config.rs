//! Build-time configuration
//!
//! `build.rs` validates vault.toml and writes the constants included here.

use tumbler_core::config::VaultConfig;

include!(concat!(env!("OUT_DIR"), "/vault_config.rs"));

/// Period of the input loop
pub const INPUT_POLL_MS: u64 = 5;
