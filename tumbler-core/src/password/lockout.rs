//! Lockout after repeated incorrect codes
//!
//! Reaching the tries limit blocks code entry for the lock time. Once it
//! expires one more attempt is allowed; failing it locks out again, no
//! matter whether the persisted counter has saturated. The counter itself
//! only resets on a correct code.

use crate::config::VaultConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LockoutStatus {
    /// Codes may be entered
    Open,
    /// Entry is blocked for the remaining time
    Locked { remaining_ms: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    max_tries: u8,
    lock_time_ms: u64,
    locked_until: Option<u64>,
}

impl LockoutPolicy {
    pub fn new(config: &VaultConfig) -> Self {
        Self {
            max_tries: config.max_incorrect_tries,
            lock_time_ms: config.lock_time_ms(),
            locked_until: None,
        }
    }

    /// Pick up where a previous run left off
    ///
    /// A tries count already at the limit starts a fresh lockout, so power
    /// cycling the vault does not skip the wait.
    pub fn resume(&mut self, incorrect_tries: u8, now_ms: u64) -> bool {
        self.record_failure(incorrect_tries, now_ms)
    }

    /// Account for a rejected code; returns true when a lockout starts
    ///
    /// Callers only verify codes while the lockout is open, so every
    /// failure at or above the limit starts a new one.
    pub fn record_failure(&mut self, incorrect_tries: u8, now_ms: u64) -> bool {
        if incorrect_tries < self.max_tries || self.is_locked(now_ms) {
            return false;
        }
        self.locked_until = Some(now_ms.saturating_add(self.lock_time_ms));
        true
    }

    pub fn status(&self, now_ms: u64) -> LockoutStatus {
        match self.locked_until {
            Some(until) if now_ms < until => LockoutStatus::Locked {
                remaining_ms: until - now_ms,
            },
            _ => LockoutStatus::Open,
        }
    }

    /// Drop an elapsed lockout; returns true if one just ended
    pub fn expire(&mut self, now_ms: u64) -> bool {
        match self.locked_until {
            Some(until) if now_ms >= until => {
                self.locked_until = None;
                true
            }
            _ => false,
        }
    }

    /// End any lockout after a correct code or a reset
    pub fn clear(&mut self) {
        self.locked_until = None;
    }

    pub fn is_locked(&self, now_ms: u64) -> bool {
        matches!(self.status(now_ms), LockoutStatus::Locked { .. })
    }
}
