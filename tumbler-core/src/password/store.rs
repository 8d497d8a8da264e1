//! Persisted passcode and incorrect-tries counter
//!
//! Layout in [`NvStorage`]:
//!
//! ```text
//! addr 0      init marker (0xA5 once provisioned)
//! addr 1..=4  passcode digits, most significant first
//! addr 5      incorrect tries
//! ```
//!
//! Every mutation is committed before the call returns.

use tumbler_hal::{NvStorage, StorageError};

use crate::config::{
    VaultConfig, DIGIT_COUNT, INCORRECT_TRIES_ADDRESS, INIT_MARKER, INIT_MARKER_ADDRESS,
    PASSCODE_ADDRESS,
};
use crate::input::PressDetector;
use crate::Code;

pub struct PasswordStore<S> {
    storage: S,
    incorrect_tries: u8,
    reset_button: PressDetector,
}

impl<S: NvStorage> PasswordStore<S> {
    /// Wrap storage whose provisioning state the caller already knows
    ///
    /// When `already_initialized` is set the tries counter is restored
    /// from storage, otherwise it starts at zero.
    pub fn new(storage: S, already_initialized: bool) -> Result<Self, StorageError> {
        let incorrect_tries = if already_initialized {
            storage.read(INCORRECT_TRIES_ADDRESS)?
        } else {
            0
        };

        Ok(Self {
            storage,
            incorrect_tries,
            reset_button: PressDetector::new(VaultConfig::DEFAULT.reset_button_debounce_ms),
        })
    }

    /// Open the store, provisioning it on first boot
    ///
    /// First boot is detected by a missing init marker. The default
    /// passcode and a zero tries counter are written and committed before
    /// the marker is considered set.
    pub async fn open(mut storage: S, config: &VaultConfig) -> Result<Self, StorageError> {
        let initialized = Self::is_initialized(&storage)?;
        if !initialized {
            write_code(&mut storage, &config.default_passcode)?;
            storage.write(INCORRECT_TRIES_ADDRESS, 0)?;
            storage.write(INIT_MARKER_ADDRESS, INIT_MARKER)?;
            storage.commit().await?;
        }

        let mut store = Self::new(storage, initialized)?;
        store.reset_button = PressDetector::new(config.reset_button_debounce_ms);
        Ok(store)
    }

    /// Open the store after the backend tried to load its persisted image
    ///
    /// Provisioning only happens when the backend reported that nothing was
    /// stored yet. A failed load, or a loaded image without the marker, is
    /// returned as an error so a read fault never overwrites the record.
    pub async fn open_loaded(
        storage: S,
        loaded: Result<bool, StorageError>,
        config: &VaultConfig,
    ) -> Result<Self, StorageError> {
        if loaded? && !Self::is_initialized(&storage)? {
            return Err(StorageError::Corrupted);
        }
        Self::open(storage, config).await
    }

    /// Whether `storage` carries the init marker
    pub fn is_initialized(storage: &S) -> Result<bool, StorageError> {
        Ok(storage.read(INIT_MARKER_ADDRESS)? == INIT_MARKER)
    }

    /// Compare `candidate` with the stored passcode
    ///
    /// A mismatch bumps the incorrect-tries counter and commits it. A
    /// match clears the counter, committing only if it was non-zero.
    pub async fn is_password_correct(&mut self, candidate: &Code) -> Result<bool, StorageError> {
        let stored = self.stored_passcode()?;

        if stored != *candidate {
            self.incorrect_tries = self.incorrect_tries.saturating_add(1);
            self.storage
                .write(INCORRECT_TRIES_ADDRESS, self.incorrect_tries)?;
            self.storage.commit().await?;
            return Ok(false);
        }

        if self.incorrect_tries != 0 {
            self.clear_incorrect_tries().await?;
        }
        Ok(true)
    }

    /// Replace the stored passcode
    ///
    /// Digits are stored as given; range checks belong to the caller.
    pub async fn set_passcode(&mut self, code: &Code) -> Result<(), StorageError> {
        write_code(&mut self.storage, code)?;
        self.storage.commit().await
    }

    /// Incorrect tries since the last successful verification
    pub fn amount_of_incorrect_tries(&self) -> u8 {
        self.incorrect_tries
    }

    /// Zero the tries counter and commit
    pub async fn clear_incorrect_tries(&mut self) -> Result<(), StorageError> {
        self.incorrect_tries = 0;
        self.storage.write(INCORRECT_TRIES_ADDRESS, 0)?;
        self.storage.commit().await
    }

    pub fn stored_passcode(&self) -> Result<Code, StorageError> {
        let mut code = [0; DIGIT_COUNT];
        for (offset, digit) in code.iter_mut().enumerate() {
            *digit = self.storage.read(PASSCODE_ADDRESS + offset as u16)?;
        }
        Ok(code)
    }

    /// Poll the reset-password button, which reads high while pressed
    pub fn reset_button_pressed(&mut self, asserted: bool, now_ms: u64) -> bool {
        self.reset_button.poll(asserted, now_ms)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

fn write_code<S: NvStorage>(storage: &mut S, code: &Code) -> Result<(), StorageError> {
    for (offset, &digit) in code.iter().enumerate() {
        storage.write(PASSCODE_ADDRESS + offset as u16, digit)?;
    }
    Ok(())
}
