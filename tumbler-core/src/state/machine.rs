//! State machine definition

use super::events::Event;

/// Vault states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Latch engaged, waiting for a code
    Locked,
    /// Latch released, door not opened yet
    Unlocked,
    /// Door stands open
    Open,
    /// Door shut again, latch engages when the delay runs out
    Closing,
    /// Too many incorrect codes; entry refused until the lockout ends
    LockedOut,
}

impl State {
    /// Check if the latch is released in this state
    pub fn is_unlocked(&self) -> bool {
        matches!(self, State::Unlocked | State::Open | State::Closing)
    }

    /// Check if this state runs a relock timer
    pub fn relock_pending(&self) -> bool {
        matches!(self, State::Unlocked | State::Closing)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use State::*;

        match (self, event) {
            // Locked transitions
            (Locked, CodeAccepted) => Unlocked,
            (Locked, LockoutStarted) => LockedOut,

            // Unlocked transitions
            (Unlocked, DoorOpened) => Open,
            (Unlocked, RelockTimeout) => Locked,
            (Unlocked, PasscodeReset) => Closing,

            // Open transitions
            (Open, DoorClosed) => Closing,

            // Closing transitions
            (Closing, DoorOpened) => Open,
            (Closing, RelockTimeout) => Locked,
            (Closing, CodeAccepted) => Unlocked,

            // LockedOut transitions
            (LockedOut, LockoutExpired) => Locked,

            // Default: stay in current state
            _ => self,
        }
    }
}
