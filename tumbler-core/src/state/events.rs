//! Events that trigger state transitions

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Code entry
    /// A correct code was entered
    CodeAccepted,
    /// An incorrect code was entered
    CodeRejected,
    /// The passcode was restored to the default with the reset button
    PasscodeReset,

    // Door switch
    /// The door-state switch reports open
    DoorOpened,
    /// The door-state switch reports closed
    DoorClosed,

    // Timers
    /// The relock deadline passed
    RelockTimeout,
    /// Too many incorrect codes
    LockoutStarted,
    /// The lockout time elapsed
    LockoutExpired,
}
