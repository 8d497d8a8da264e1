//! 74HC595 display output
//!
//! Bit-bangs one byte per digit into the shift register: latch low, eight
//! data bits most significant first, each clocked on a rising edge, latch
//! high. The decimal point has its own line, wired active low.

use tumbler_core::traits::SegmentDisplay;
use tumbler_hal::{ActiveLow, OutputPin};

pub struct ShiftRegisterDisplay<DATA, CLK, LATCH, DOT> {
    data: DATA,
    clock: CLK,
    latch: LATCH,
    dot: ActiveLow<DOT>,
}

impl<DATA, CLK, LATCH, DOT> ShiftRegisterDisplay<DATA, CLK, LATCH, DOT>
where
    DATA: OutputPin,
    CLK: OutputPin,
    LATCH: OutputPin,
    DOT: OutputPin,
{
    /// Take the pins and park them: clock low, latch high, dot off
    pub fn new(data: DATA, clock: CLK, latch: LATCH, dot: DOT) -> Self {
        let mut display = Self {
            data,
            clock,
            latch,
            dot: ActiveLow(dot),
        };
        display.clock.set_low();
        display.latch.set_high();
        display.dot.set_low();
        display
    }
}

impl<DATA, CLK, LATCH, DOT> SegmentDisplay for ShiftRegisterDisplay<DATA, CLK, LATCH, DOT>
where
    DATA: OutputPin,
    CLK: OutputPin,
    LATCH: OutputPin,
    DOT: OutputPin,
{
    fn write_byte(&mut self, byte: u8) {
        self.latch.set_low();
        for bit in (0..8).rev() {
            self.data.set_state(byte & (1 << bit) != 0);
            self.clock.set_high();
            self.clock.set_low();
        }
        self.latch.set_high();
    }

    fn set_decimal_point(&mut self, on: bool) {
        self.dot.set_state(on);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use heapless::Vec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Line {
        Data,
        Clock,
        Latch,
        Dot,
    }

    type Log = RefCell<Vec<(Line, bool), 128>>;

    /// Pin that appends every level change to a shared log
    struct LoggedPin<'a> {
        line: Line,
        high: bool,
        log: &'a Log,
    }

    impl<'a> LoggedPin<'a> {
        fn new(line: Line, log: &'a Log) -> Self {
            Self {
                line,
                high: false,
                log,
            }
        }
    }

    impl OutputPin for LoggedPin<'_> {
        fn set_high(&mut self) {
            self.high = true;
            let _ = self.log.borrow_mut().push((self.line, true));
        }

        fn set_low(&mut self) {
            self.high = false;
            let _ = self.log.borrow_mut().push((self.line, false));
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    type TestDisplay<'a> =
        ShiftRegisterDisplay<LoggedPin<'a>, LoggedPin<'a>, LoggedPin<'a>, LoggedPin<'a>>;

    fn display(log: &Log) -> TestDisplay<'_> {
        let display = ShiftRegisterDisplay::new(
            LoggedPin::new(Line::Data, log),
            LoggedPin::new(Line::Clock, log),
            LoggedPin::new(Line::Latch, log),
            LoggedPin::new(Line::Dot, log),
        );
        log.borrow_mut().clear();
        display
    }

    /// Rebuild the byte the shift register saw from the pin log
    fn shifted_byte(log: &Log) -> u8 {
        let mut data = false;
        let mut byte = 0u8;
        for &(line, high) in log.borrow().iter() {
            match line {
                Line::Data => data = high,
                Line::Clock if high => byte = (byte << 1) | data as u8,
                _ => {}
            }
        }
        byte
    }

    #[test]
    fn test_parks_pins() {
        let log = Log::default();
        let display = display(&log);
        assert!(!display.clock.is_set_high());
        assert!(display.latch.is_set_high());
        // Dot off means the active-low line is high
        assert!(display.dot.0.is_set_high());
    }

    #[test]
    fn test_shifts_msb_first() {
        for byte in [0x0E, 0x80, 0xFF, 0x00, 0xA5] {
            let log = Log::default();
            let mut display = display(&log);
            display.write_byte(byte);
            assert_eq!(shifted_byte(&log), byte);
        }
    }

    #[test]
    fn test_latch_frames_the_shift() {
        let log = Log::default();
        let mut display = display(&log);
        display.write_byte(0x5A);

        let log = log.borrow();
        assert_eq!(log.first(), Some(&(Line::Latch, false)));
        assert_eq!(log.last(), Some(&(Line::Latch, true)));
        let clocks = log.iter().filter(|&&(l, h)| l == Line::Clock && h).count();
        assert_eq!(clocks, 8);
    }

    #[test]
    fn test_decimal_point_active_low() {
        let log = Log::default();
        let mut display = display(&log);

        display.set_decimal_point(true);
        assert!(!display.dot.0.is_set_high());

        display.set_decimal_point(false);
        assert!(display.dot.0.is_set_high());
    }
}
