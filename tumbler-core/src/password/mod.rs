//! Passcode storage and brute-force protection

pub mod lockout;
pub mod store;

pub use lockout::{LockoutPolicy, LockoutStatus};
pub use store::PasswordStore;
