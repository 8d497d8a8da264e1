//! Persistent storage abstractions
//!
//! The vault keeps a handful of bytes (an init marker, the passcode and the
//! incorrect-tries counter) in a small byte-addressed region modelled on an
//! EEPROM. Reads and writes hit a RAM image; [`NvStorage::commit`] makes
//! pending writes durable.

use core::future::Future;

/// Size of the emulated EEPROM region in bytes
pub const EEPROM_SIZE: usize = 16;

/// Storage keys for records kept in flash
///
/// Backends built on a key-value flash map store the whole EEPROM image
/// under a single key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StorageKey {
    /// The emulated EEPROM image
    VaultRecord = 0,
}

impl StorageKey {
    /// Get the key as a byte value
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create a key from a byte value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(StorageKey::VaultRecord),
            _ => None,
        }
    }
}

/// Errors from persistent storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Flash operation failed
    Flash,
    /// Storage operation failed
    Storage,
    /// Address is outside the storage region
    OutOfRange,
    /// Data corrupted or invalid
    Corrupted,
    /// Storage is full
    Full,
}

/// Byte-addressed persistent storage
///
/// Writes are buffered until `commit`. A value written and then read back
/// without a commit is the written value; only a commit survives a reset.
pub trait NvStorage {
    /// Read the byte at `address`
    fn read(&self, address: u16) -> Result<u8, StorageError>;

    /// Stage a write of `value` at `address`
    fn write(&mut self, address: u16, value: u8) -> Result<(), StorageError>;

    /// Persist all staged writes
    fn commit(&mut self) -> impl Future<Output = Result<(), StorageError>>;
}

/// RAM image of an EEPROM region with dirty tracking
///
/// Backends keep one of these as the working copy and flush it to their
/// medium on commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EepromImage<const N: usize> {
    bytes: [u8; N],
    dirty: bool,
}

impl<const N: usize> Default for EepromImage<N> {
    fn default() -> Self {
        Self::erased()
    }
}

impl<const N: usize> EepromImage<N> {
    /// An image in the erased state (all bytes 0xFF)
    pub const fn erased() -> Self {
        Self {
            bytes: [0xFF; N],
            dirty: false,
        }
    }

    /// An image loaded from previously persisted bytes
    ///
    /// Short input leaves the tail erased; extra input is ignored.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut image = Self::erased();
        let len = data.len().min(N);
        image.bytes[..len].copy_from_slice(&data[..len]);
        image
    }

    pub fn read(&self, address: u16) -> Result<u8, StorageError> {
        self.bytes
            .get(address as usize)
            .copied()
            .ok_or(StorageError::OutOfRange)
    }

    pub fn write(&mut self, address: u16, value: u8) -> Result<(), StorageError> {
        let slot = self
            .bytes
            .get_mut(address as usize)
            .ok_or(StorageError::OutOfRange)?;
        if *slot != value {
            *slot = value;
            self.dirty = true;
        }
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8; N] {
        &self.bytes
    }

    /// Whether writes are pending since the last commit
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

// Implement the sequential-storage Key trait when the feature is enabled
#[cfg(feature = "sequential-storage")]
impl sequential_storage::map::Key for StorageKey {
    fn serialize_into(
        &self,
        buffer: &mut [u8],
    ) -> Result<usize, sequential_storage::map::SerializationError> {
        if buffer.is_empty() {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        buffer[0] = self.as_u8();
        Ok(1)
    }

    fn deserialize_from(
        buffer: &[u8],
    ) -> Result<(Self, usize), sequential_storage::map::SerializationError> {
        if buffer.is_empty() {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        match StorageKey::from_u8(buffer[0]) {
            Some(key) => Ok((key, 1)),
            None => Err(sequential_storage::map::SerializationError::InvalidFormat),
        }
    }
}
