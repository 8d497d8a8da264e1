//! Segment display output trait

/// Output stage of the multiplexed display
///
/// Writes are infallible: the hardware is a few GPIO lines.
pub trait SegmentDisplay {
    /// Shift `byte` out most significant bit first and latch it
    fn write_byte(&mut self, byte: u8);

    /// Drive the decimal point line
    fn set_decimal_point(&mut self, on: bool);
}

impl<T: SegmentDisplay + ?Sized> SegmentDisplay for &mut T {
    fn write_byte(&mut self, byte: u8) {
        (**self).write_byte(byte)
    }

    fn set_decimal_point(&mut self, on: bool) {
        (**self).set_decimal_point(on)
    }
}
