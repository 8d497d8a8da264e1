//! Emulated EEPROM on RP2040 flash
//!
//! The vault's few bytes live in RAM and are persisted as a single
//! sequential-storage map item in the last 64KB of flash. sequential-storage
//! takes care of wear levelling across the partition.
//!
//! Implements the `NvStorage` trait from `tumbler-hal`.

use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use sequential_storage::cache::NoCache;
use sequential_storage::map;
use tumbler_hal::{EepromImage, NvStorage, StorageError, StorageKey, EEPROM_SIZE};

/// Flash storage configuration
pub const FLASH_SIZE: usize = 2 * 1024 * 1024; // 2MB flash on the Pico
pub const STORAGE_PARTITION_SIZE: usize = 64 * 1024;
pub const STORAGE_PARTITION_START: usize = FLASH_SIZE - STORAGE_PARTITION_SIZE;

/// Flash range for the storage partition
pub const STORAGE_RANGE: core::ops::Range<u32> =
    (STORAGE_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Scratch space for one map item (header, key and image)
const ITEM_BUFFER_SIZE: usize = 64;

pub struct Rp2040Eeprom<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
    image: EepromImage<EEPROM_SIZE>,
}

impl<'d> Rp2040Eeprom<'d> {
    /// Create the storage with an erased image; call `load` before use
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        Self {
            flash: Flash::new(flash, dma),
            image: EepromImage::erased(),
        }
    }

    /// Read the persisted image into RAM
    ///
    /// Returns `Ok(false)` when nothing has been stored yet; the image then
    /// stays erased.
    pub async fn load(&mut self) -> Result<bool, StorageError> {
        let mut buffer = [0u8; ITEM_BUFFER_SIZE];

        let result = map::fetch_item::<StorageKey, &[u8], _>(
            &mut self.flash,
            STORAGE_RANGE,
            &mut NoCache::new(),
            &mut buffer,
            &StorageKey::VaultRecord,
        )
        .await;

        match result {
            Ok(Some(data)) => {
                if data.len() != EEPROM_SIZE {
                    return Err(StorageError::Corrupted);
                }
                self.image = EepromImage::from_bytes(data);
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(_) => Err(StorageError::Storage),
        }
    }
}

impl NvStorage for Rp2040Eeprom<'_> {
    fn read(&self, address: u16) -> Result<u8, StorageError> {
        self.image.read(address)
    }

    fn write(&mut self, address: u16, value: u8) -> Result<(), StorageError> {
        self.image.write(address, value)
    }

    async fn commit(&mut self) -> Result<(), StorageError> {
        if !self.image.is_dirty() {
            return Ok(());
        }

        let mut buffer = [0u8; ITEM_BUFFER_SIZE];
        let data: &[u8] = self.image.as_bytes();

        map::store_item(
            &mut self.flash,
            STORAGE_RANGE,
            &mut NoCache::new(),
            &mut buffer,
            &StorageKey::VaultRecord,
            &data,
        )
        .await
        .map_err(|e| match e {
            sequential_storage::Error::FullStorage => StorageError::Full,
            sequential_storage::Error::Storage { .. } => StorageError::Flash,
            _ => StorageError::Storage,
        })?;

        self.image.mark_clean();
        Ok(())
    }
}
