//! Display state shared between the input loop and the display loops

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use portable_atomic::{AtomicBool, Ordering};

use crate::config::DIGIT_COUNT;
use crate::Code;

/// Decimal point marking the slot being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecimalPoint {
    pub enabled: bool,
    /// Slot index, `0..DIGIT_COUNT`
    pub position: u8,
}

/// What the display should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayState {
    /// Digit per slot, index 0 is the most significant
    pub digits: Code,
    pub dot: DecimalPoint,
}

impl DisplayState {
    pub const fn new() -> Self {
        Self {
            digits: [0; DIGIT_COUNT],
            dot: DecimalPoint {
                enabled: true,
                position: 0,
            },
        }
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the display loops and the entry controller share
///
/// `state` is a short critical section around plain data. `output` owns
/// the display driver and is held for a whole refresh cycle or a whole
/// flash sequence.
pub struct DisplayContext<M: RawMutex, D> {
    state: BlockingMutex<M, RefCell<DisplayState>>,
    output: Mutex<M, D>,
    flashing: AtomicBool,
    flash_requested: AtomicBool,
}

impl<M: RawMutex, D> DisplayContext<M, D> {
    pub const fn new(driver: D) -> Self {
        Self {
            state: BlockingMutex::new(RefCell::new(DisplayState::new())),
            output: Mutex::new(driver),
            flashing: AtomicBool::new(false),
            flash_requested: AtomicBool::new(false),
        }
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> DisplayState {
        self.state.lock(|state| *state.borrow())
    }

    /// Mutate the state under its lock
    pub fn update<R>(&self, f: impl FnOnce(&mut DisplayState) -> R) -> R {
        self.state.lock(|state| f(&mut state.borrow_mut()))
    }

    /// The lock over the physical output
    pub fn output(&self) -> &Mutex<M, D> {
        &self.output
    }

    /// True while the flash loop owns the output
    pub fn is_flashing(&self) -> bool {
        self.flashing.load(Ordering::Acquire)
    }

    /// True from the moment a flash is requested until it starts
    pub fn is_flash_requested(&self) -> bool {
        self.flash_requested.load(Ordering::Acquire)
    }

    pub(crate) fn request_flash(&self) {
        self.flash_requested.store(true, Ordering::Release);
    }

    pub(crate) fn begin_flashing(&self) {
        self.flashing.store(true, Ordering::Release);
        self.flash_requested.store(false, Ordering::Release);
    }

    pub(crate) fn end_flashing(&self) {
        self.flashing.store(false, Ordering::Release);
    }
}
