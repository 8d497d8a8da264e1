//! Buzzer trait

pub trait Buzzer {
    type Error;

    /// Start or stop the tone
    fn set_sounding(&mut self, on: bool) -> Result<(), Self::Error>;
}
