//! Mocks shared by the unit tests

use embassy_futures::yield_now;
use embedded_hal_async::delay::DelayNs;
use heapless::Vec;
use tumbler_hal::{EepromImage, NvStorage, StorageError, EEPROM_SIZE};

use crate::traits::{Buzzer, DoorLock, SegmentDisplay};

/// One latched byte and the decimal point level at that moment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub byte: u8,
    pub dot: bool,
}

/// Display driver that records every latched byte
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    pub frames: Vec<Frame, 1024>,
    dot: bool,
}

impl SegmentDisplay for RecordingDisplay {
    fn write_byte(&mut self, byte: u8) {
        let _ = self.frames.push(Frame { byte, dot: self.dot });
    }

    fn set_decimal_point(&mut self, on: bool) {
        self.dot = on;
    }
}

/// Delay that advances a virtual clock and yields once per call
#[derive(Debug, Default)]
pub struct MockDelay {
    pub elapsed_ms: u64,
    pub calls: u32,
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ms += (ns / 1_000_000) as u64;
        self.calls += 1;
        yield_now().await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.elapsed_ms += ms as u64;
        self.calls += 1;
        yield_now().await;
    }
}

/// RAM-backed storage that tracks what has actually been committed
#[derive(Debug, Clone)]
pub struct RamStorage {
    pub working: EepromImage<EEPROM_SIZE>,
    pub committed: [u8; EEPROM_SIZE],
    pub commits: u32,
    pub fail_commit: bool,
}

impl RamStorage {
    pub fn erased() -> Self {
        Self {
            working: EepromImage::erased(),
            committed: [0xFF; EEPROM_SIZE],
            commits: 0,
            fail_commit: false,
        }
    }

    /// Storage as found after a power cycle
    pub fn reboot(&self) -> Self {
        Self {
            working: EepromImage::from_bytes(&self.committed),
            committed: self.committed,
            commits: 0,
            fail_commit: false,
        }
    }
}

impl NvStorage for RamStorage {
    fn read(&self, address: u16) -> Result<u8, StorageError> {
        self.working.read(address)
    }

    fn write(&mut self, address: u16, value: u8) -> Result<(), StorageError> {
        self.working.write(address, value)
    }

    async fn commit(&mut self) -> Result<(), StorageError> {
        if self.fail_commit {
            return Err(StorageError::Flash);
        }
        self.committed = *self.working.as_bytes();
        self.working.mark_clean();
        self.commits += 1;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MockLatch {
    pub locked: bool,
    pub door_open: bool,
    pub moves: u32,
}

impl DoorLock for MockLatch {
    type Error = ();

    fn lock(&mut self) -> Result<(), ()> {
        self.locked = true;
        self.moves += 1;
        Ok(())
    }

    fn unlock(&mut self) -> Result<(), ()> {
        self.locked = false;
        self.moves += 1;
        Ok(())
    }

    fn is_door_open(&self) -> bool {
        self.door_open
    }
}

#[derive(Debug, Default)]
pub struct MockBuzzer {
    pub sounding: bool,
    pub beeps: u32,
}

impl Buzzer for MockBuzzer {
    type Error = ();

    fn set_sounding(&mut self, on: bool) -> Result<(), ()> {
        if on && !self.sounding {
            self.beeps += 1;
        }
        self.sounding = on;
        Ok(())
    }
}
