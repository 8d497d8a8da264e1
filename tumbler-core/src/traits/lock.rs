//! Door latch trait

/// Servo latch plus the door-state switch
pub trait DoorLock {
    type Error;

    /// Move the latch to the locked position
    fn lock(&mut self) -> Result<(), Self::Error>;

    /// Move the latch to the unlocked position
    fn unlock(&mut self) -> Result<(), Self::Error>;

    /// Whether the door currently stands open
    fn is_door_open(&self) -> bool;
}
