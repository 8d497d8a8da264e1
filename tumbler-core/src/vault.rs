//! Vault controller
//!
//! Ties code entry to the password store, the lockout policy, the latch
//! and the buzzer. The input loop calls [`VaultController::code_entered`]
//! when the keypad completes a code and [`VaultController::tick`] on every
//! pass; remote requests go through [`VaultController::remote_request`].

use tumbler_hal::{NvStorage, StorageError};
use tumbler_protocol::{RemoteMessage, Response};

use crate::config::VaultConfig;
use crate::password::{LockoutPolicy, LockoutStatus, PasswordStore};
use crate::state::{Event, State};
use crate::traits::{Buzzer, DoorLock};
use crate::Code;

/// Errors surfaced by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VaultError {
    /// Persisting to storage failed
    Storage(StorageError),
    /// The latch or buzzer refused a command
    Actuator,
}

impl From<StorageError> for VaultError {
    fn from(e: StorageError) -> Self {
        VaultError::Storage(e)
    }
}

/// Result of a code entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodeOutcome {
    Accepted,
    Rejected { incorrect_tries: u8 },
    /// Entry refused without checking the code
    LockedOut { remaining_ms: u64 },
}

impl CodeOutcome {
    /// Whether the display should flash the error pattern
    pub fn needs_error_feedback(&self) -> bool {
        !matches!(self, CodeOutcome::Accepted)
    }

    /// Reply sent to a remote entry
    pub fn response(&self) -> Response {
        Response::from(matches!(self, CodeOutcome::Accepted))
    }
}

pub struct VaultController<S, L, Z> {
    config: VaultConfig,
    store: PasswordStore<S>,
    lockout: LockoutPolicy,
    latch: L,
    buzzer: Z,
    state: State,
    relock_at: Option<u64>,
    /// Relock with the reset delay on the next door close
    reset_pending: bool,
    buzzer_off_at: Option<u64>,
}

impl<S, L, Z> VaultController<S, L, Z>
where
    S: NvStorage,
    L: DoorLock,
    Z: Buzzer,
{
    /// Engage the latch and resume any lockout left from the previous run
    pub fn new(
        config: VaultConfig,
        store: PasswordStore<S>,
        mut latch: L,
        buzzer: Z,
        now_ms: u64,
    ) -> Result<Self, VaultError> {
        latch.lock().map_err(|_| VaultError::Actuator)?;

        let mut lockout = LockoutPolicy::new(&config);
        let state = if lockout.resume(store.amount_of_incorrect_tries(), now_ms) {
            State::Locked.transition(Event::LockoutStarted)
        } else {
            State::Locked
        };

        Ok(Self {
            config,
            store,
            lockout,
            latch,
            buzzer,
            state,
            relock_at: None,
            reset_pending: false,
            buzzer_off_at: None,
        })
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn store(&self) -> &PasswordStore<S> {
        &self.store
    }

    /// Check a code from the keypad or a remote entry
    pub async fn code_entered(
        &mut self,
        code: Code,
        now_ms: u64,
    ) -> Result<CodeOutcome, VaultError> {
        if let LockoutStatus::Locked { remaining_ms } = self.lockout.status(now_ms) {
            return Ok(CodeOutcome::LockedOut { remaining_ms });
        }

        if self.store.is_password_correct(&code).await? {
            self.lockout.clear();
            if self.state == State::LockedOut {
                self.apply(Event::LockoutExpired);
            }
            if matches!(self.state, State::Locked | State::Unlocked | State::Closing) {
                self.latch.unlock().map_err(|_| VaultError::Actuator)?;
                self.apply(Event::CodeAccepted);
                self.relock_at = Some(now_ms + self.config.unlock_lock_delay_ms as u64);
            }
            return Ok(CodeOutcome::Accepted);
        }

        let incorrect_tries = self.store.amount_of_incorrect_tries();
        self.apply(Event::CodeRejected);
        self.sound_buzzer(now_ms)?;
        if self.lockout.record_failure(incorrect_tries, now_ms) {
            self.apply(Event::LockoutStarted);
        }
        Ok(CodeOutcome::Rejected { incorrect_tries })
    }

    /// Handle a parsed remote message
    ///
    /// Entries return their outcome so the caller can answer and flash;
    /// passcode changes return `None`.
    pub async fn remote_request(
        &mut self,
        message: RemoteMessage,
        now_ms: u64,
    ) -> Result<Option<CodeOutcome>, VaultError> {
        match message {
            RemoteMessage::Enter(code) => self.code_entered(code, now_ms).await.map(Some),
            RemoteMessage::Change(code) => {
                self.store.set_passcode(&code).await?;
                Ok(None)
            }
        }
    }

    /// Poll the reset-password button
    ///
    /// Only honoured while the latch is released. Returns true when the
    /// passcode was reset.
    pub async fn reset_button(&mut self, asserted: bool, now_ms: u64) -> Result<bool, VaultError> {
        if !self.store.reset_button_pressed(asserted, now_ms) || !self.state.is_unlocked() {
            return Ok(false);
        }

        let default = self.config.default_passcode;
        self.store.set_passcode(&default).await?;
        self.store.clear_incorrect_tries().await?;
        self.lockout.clear();

        self.apply(Event::PasscodeReset);
        self.reset_pending = true;
        if self.state == State::Closing {
            self.relock_at = Some(now_ms + self.config.reset_lock_delay_ms as u64);
        }
        Ok(true)
    }

    /// Advance timers and follow the door switch
    ///
    /// Applies at most one event per call and returns it.
    pub fn tick(&mut self, now_ms: u64) -> Result<Option<Event>, VaultError> {
        if self.buzzer_off_at.is_some_and(|at| now_ms >= at) {
            self.buzzer_off_at = None;
            self.buzzer.set_sounding(false).map_err(|_| VaultError::Actuator)?;
        }

        let door_open = self.latch.is_door_open();
        let relock_due = self.relock_at.is_some_and(|at| now_ms >= at);

        let state = self.state;
        let event = match state {
            State::LockedOut if self.lockout.expire(now_ms) => Event::LockoutExpired,
            s if s.relock_pending() && door_open => Event::DoorOpened,
            s if s.relock_pending() && relock_due => Event::RelockTimeout,
            State::Open if !door_open => Event::DoorClosed,
            _ => return Ok(None),
        };

        match event {
            Event::DoorOpened => self.relock_at = None,
            Event::DoorClosed => {
                let delay = if self.reset_pending {
                    self.config.reset_lock_delay_ms
                } else {
                    self.config.lock_delay_ms
                };
                self.relock_at = Some(now_ms + delay as u64);
            }
            Event::RelockTimeout => {
                self.relock_at = None;
                self.reset_pending = false;
                self.latch.lock().map_err(|_| VaultError::Actuator)?;
            }
            _ => {}
        }

        self.apply(event);
        Ok(Some(event))
    }

    fn apply(&mut self, event: Event) {
        self.state = self.state.transition(event);
    }

    fn sound_buzzer(&mut self, now_ms: u64) -> Result<(), VaultError> {
        self.buzzer.set_sounding(true).map_err(|_| VaultError::Actuator)?;
        self.buzzer_off_at = Some(now_ms + self.config.buzzer_time_ms as u64);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::INCORRECT_TRIES_ADDRESS;
    use crate::test_support::{MockBuzzer, MockLatch, RamStorage};
    use embassy_futures::block_on;

    type Vault = VaultController<RamStorage, MockLatch, MockBuzzer>;

    fn vault_with(code: Code) -> Vault {
        let config = VaultConfig {
            default_passcode: code,
            ..VaultConfig::DEFAULT
        };
        let store = block_on(PasswordStore::open(RamStorage::erased(), &config)).unwrap();
        VaultController::new(config, store, MockLatch::default(), MockBuzzer::default(), 0).unwrap()
    }

    #[test]
    fn test_starts_locked() {
        let vault = vault_with([1, 2, 3, 4]);
        assert_eq!(vault.state(), State::Locked);
        assert!(vault.latch.locked);
    }

    #[test]
    fn test_correct_code_unlocks() {
        let mut vault = vault_with([1, 2, 3, 4]);
        let outcome = block_on(vault.code_entered([1, 2, 3, 4], 100)).unwrap();
        assert_eq!(outcome, CodeOutcome::Accepted);
        assert!(!outcome.needs_error_feedback());
        assert_eq!(vault.state(), State::Unlocked);
        assert!(!vault.latch.locked);
    }

    #[test]
    fn test_wrong_code_buzzes_for_a_while() {
        let mut vault = vault_with([1, 2, 3, 4]);
        let outcome = block_on(vault.code_entered([0, 0, 0, 0], 100)).unwrap();
        assert_eq!(outcome, CodeOutcome::Rejected { incorrect_tries: 1 });
        assert!(outcome.needs_error_feedback());
        assert_eq!(vault.state(), State::Locked);
        assert!(vault.buzzer.sounding);

        assert_eq!(vault.tick(1099), Ok(None));
        assert!(vault.buzzer.sounding);
        vault.tick(1100).unwrap();
        assert!(!vault.buzzer.sounding);
    }

    #[test]
    fn test_relock_when_door_never_opened() {
        let mut vault = vault_with([1, 2, 3, 4]);
        block_on(vault.code_entered([1, 2, 3, 4], 0)).unwrap();

        assert_eq!(vault.tick(4_999), Ok(None));
        assert_eq!(vault.tick(5_000), Ok(Some(Event::RelockTimeout)));
        assert_eq!(vault.state(), State::Locked);
        assert!(vault.latch.locked);
    }

    #[test]
    fn test_door_cycle() {
        let mut vault = vault_with([1, 2, 3, 4]);
        block_on(vault.code_entered([1, 2, 3, 4], 0)).unwrap();

        vault.latch.door_open = true;
        assert_eq!(vault.tick(1_000), Ok(Some(Event::DoorOpened)));
        // Open doors never relock
        assert_eq!(vault.tick(60_000), Ok(None));

        vault.latch.door_open = false;
        assert_eq!(vault.tick(60_100), Ok(Some(Event::DoorClosed)));
        assert_eq!(vault.tick(62_599), Ok(None));
        assert_eq!(vault.tick(62_600), Ok(Some(Event::RelockTimeout)));
        assert!(vault.latch.locked);
    }

    #[test]
    fn test_lockout_after_max_tries() {
        let mut vault = vault_with([1, 2, 3, 4]);
        for _ in 0..3 {
            block_on(vault.code_entered([9, 9, 9, 9], 0)).unwrap();
        }
        assert_eq!(vault.state(), State::LockedOut);

        // Even the right code is refused and not counted
        let outcome = block_on(vault.code_entered([1, 2, 3, 4], 1_000)).unwrap();
        assert_eq!(outcome, CodeOutcome::LockedOut { remaining_ms: 179_000 });
        assert_eq!(vault.store().amount_of_incorrect_tries(), 3);

        assert_eq!(vault.tick(180_000), Ok(Some(Event::LockoutExpired)));
        assert_eq!(vault.state(), State::Locked);

        let outcome = block_on(vault.code_entered([1, 2, 3, 4], 180_001)).unwrap();
        assert_eq!(outcome, CodeOutcome::Accepted);
        assert_eq!(vault.store().amount_of_incorrect_tries(), 0);
    }

    #[test]
    fn test_lockout_survives_reboot() {
        let mut vault = vault_with([1, 2, 3, 4]);
        for _ in 0..3 {
            block_on(vault.code_entered([9, 9, 9, 9], 0)).unwrap();
        }

        let storage = vault.store().storage().reboot();
        let store = block_on(PasswordStore::open(storage, &VaultConfig::DEFAULT)).unwrap();
        let vault: Vault = VaultController::new(
            VaultConfig::DEFAULT,
            store,
            MockLatch::default(),
            MockBuzzer::default(),
            0,
        )
        .unwrap();
        assert_eq!(vault.state(), State::LockedOut);
    }

    #[test]
    fn test_remote_enter_zero_padded() {
        let mut vault = vault_with([0, 0, 0, 7]);
        let message = RemoteMessage::parse("E|7").unwrap();
        assert_eq!(message, RemoteMessage::Enter([0, 0, 0, 7]));

        let outcome = block_on(vault.remote_request(message, 0)).unwrap().unwrap();
        assert_eq!(outcome.response(), Response::Correct);
        assert_eq!(outcome.response().as_bytes(), b"1\r\n");
    }

    #[test]
    fn test_remote_enter_wrong_code() {
        let mut vault = vault_with([1, 2, 3, 4]);
        let message = RemoteMessage::parse("E|7").unwrap();
        let outcome = block_on(vault.remote_request(message, 0)).unwrap().unwrap();
        assert_eq!(outcome.response().as_bytes(), b"0\r\n");
        assert_eq!(vault.store().amount_of_incorrect_tries(), 1);
    }

    #[test]
    fn test_remote_change() {
        let mut vault = vault_with([1, 2, 3, 4]);
        let message = RemoteMessage::parse("C|4321").unwrap();
        assert_eq!(block_on(vault.remote_request(message, 0)), Ok(None));
        assert_eq!(vault.store().stored_passcode(), Ok([4, 3, 2, 1]));
        assert_eq!(vault.state(), State::Locked);
    }

    #[test]
    fn test_reset_button_ignored_while_locked() {
        let mut vault = vault_with([1, 2, 3, 4]);
        block_on(vault.remote_request(RemoteMessage::Change([5, 5, 5, 5]), 0)).unwrap();

        assert_eq!(block_on(vault.reset_button(true, 1_000)), Ok(false));
        assert_eq!(vault.store().stored_passcode(), Ok([5, 5, 5, 5]));
    }

    #[test]
    fn test_reset_button_restores_default_and_relocks() {
        let mut vault = vault_with([0, 0, 0, 0]);
        block_on(vault.remote_request(RemoteMessage::Change([5, 5, 5, 5]), 0)).unwrap();
        block_on(vault.code_entered([5, 5, 5, 5], 0)).unwrap();
        assert_eq!(vault.state(), State::Unlocked);

        assert_eq!(block_on(vault.reset_button(true, 1_000)), Ok(true));
        assert_eq!(vault.store().stored_passcode(), Ok([0, 0, 0, 0]));
        assert_eq!(vault.state(), State::Closing);

        assert_eq!(vault.tick(1_599), Ok(None));
        assert_eq!(vault.tick(1_600), Ok(Some(Event::RelockTimeout)));
    }

    #[test]
    fn test_reset_with_door_open_uses_reset_delay() {
        let mut vault = vault_with([0, 0, 0, 0]);
        block_on(vault.code_entered([0, 0, 0, 0], 0)).unwrap();
        vault.latch.door_open = true;
        assert_eq!(vault.tick(100), Ok(Some(Event::DoorOpened)));

        assert_eq!(block_on(vault.reset_button(true, 1_000)), Ok(true));
        assert_eq!(vault.state(), State::Open);

        vault.latch.door_open = false;
        assert_eq!(vault.tick(2_000), Ok(Some(Event::DoorClosed)));
        assert_eq!(vault.tick(2_599), Ok(None));
        assert_eq!(vault.tick(2_600), Ok(Some(Event::RelockTimeout)));
        assert!(vault.latch.locked);

        // The next ordinary door cycle is back to the normal delay
        block_on(vault.code_entered([0, 0, 0, 0], 10_000)).unwrap();
        vault.latch.door_open = true;
        assert_eq!(vault.tick(10_100), Ok(Some(Event::DoorOpened)));
        vault.latch.door_open = false;
        assert_eq!(vault.tick(11_000), Ok(Some(Event::DoorClosed)));
        assert_eq!(vault.tick(13_499), Ok(None));
        assert_eq!(vault.tick(13_500), Ok(Some(Event::RelockTimeout)));
    }

    #[test]
    fn test_lockout_rearms_with_saturated_tries() {
        let config = VaultConfig::DEFAULT;
        let store = block_on(PasswordStore::open(RamStorage::erased(), &config)).unwrap();
        let mut storage = store.storage().clone();
        storage.write(INCORRECT_TRIES_ADDRESS, 254).unwrap();
        let store = PasswordStore::new(storage, true).unwrap();
        let mut vault: Vault =
            VaultController::new(config, store, MockLatch::default(), MockBuzzer::default(), 0)
                .unwrap();
        assert_eq!(vault.state(), State::LockedOut);

        let mut now = 0;
        for _ in 0..3 {
            now += 180_000;
            assert_eq!(vault.tick(now), Ok(Some(Event::LockoutExpired)));

            let outcome = block_on(vault.code_entered([9, 9, 9, 9], now)).unwrap();
            assert!(matches!(outcome, CodeOutcome::Rejected { .. }));
            assert_eq!(vault.state(), State::LockedOut);

            // Every further attempt in this window is refused unchecked
            let outcome = block_on(vault.code_entered([9, 9, 9, 9], now + 1)).unwrap();
            assert!(matches!(outcome, CodeOutcome::LockedOut { .. }));
        }
        assert_eq!(vault.store().amount_of_incorrect_tries(), 255);
    }

    #[test]
    fn test_storage_failure_surfaces() {
        let config = VaultConfig::DEFAULT;
        let store = block_on(PasswordStore::open(RamStorage::erased(), &config)).unwrap();
        let mut storage = store.storage().clone();
        storage.fail_commit = true;
        let store = PasswordStore::new(storage, true).unwrap();
        let mut vault: Vault =
            VaultController::new(config, store, MockLatch::default(), MockBuzzer::default(), 0)
                .unwrap();

        assert_eq!(
            block_on(vault.code_entered([1, 1, 1, 1], 0)),
            Err(VaultError::Storage(StorageError::Flash))
        );
    }
}
