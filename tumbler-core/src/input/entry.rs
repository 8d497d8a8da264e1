//! Digit entry on the display
//!
//! The slot being edited is the decimal point position and the buffer is
//! the displayed digits, so both live in the shared `DisplayState`. The
//! encoder value is copied into the current slot at most once per read
//! interval; a button press moves to the next slot, and pressing past the
//! last one completes the code.

use embassy_sync::blocking_mutex::raw::RawMutex;

use super::button::PressDetector;
use super::rotary::RotaryEncoder;
use crate::config::{VaultConfig, DIGIT_COUNT};
use crate::display::DisplayContext;
use crate::Code;

pub struct DigitEntryController<'a, M: RawMutex, D> {
    display: &'a DisplayContext<M, D>,
    encoder: &'a RotaryEncoder,
    button: PressDetector,
    read_delay_ms: u32,
    last_read_ms: u64,
    value: u8,
}

impl<'a, M: RawMutex, D> DigitEntryController<'a, M, D> {
    pub fn new(
        display: &'a DisplayContext<M, D>,
        encoder: &'a RotaryEncoder,
        config: &VaultConfig,
    ) -> Self {
        Self {
            display,
            encoder,
            button: PressDetector::new(config.button_debounce_ms),
            read_delay_ms: config.read_input_delay_ms,
            last_read_ms: 0,
            value: 0,
        }
    }

    /// One pass of the input loop
    ///
    /// `button_asserted` is the current level of the encoder push button.
    /// `on_complete` receives the code when this pass completes one.
    pub fn handle_input(
        &mut self,
        button_asserted: bool,
        now_ms: u64,
        mut on_complete: impl FnMut(Code),
    ) {
        self.value = self.encoder.counter();

        if self.button.poll(button_asserted, now_ms) {
            self.submit(&mut on_complete);
        }

        if self.display.is_flashing() {
            // No input is taken while the error pattern shows
            self.reset();
            return;
        }

        if now_ms.saturating_sub(self.last_read_ms) > self.read_delay_ms as u64 {
            self.last_read_ms = now_ms;
            let value = self.value;
            self.display
                .update(|state| state.digits[state.dot.position as usize % DIGIT_COUNT] = value);
        }
    }

    /// Accept the current slot and move to the next one
    ///
    /// Returns true when this completed a code. The digits stay on the
    /// display; only the slot goes back to the first position.
    pub fn submit(&mut self, on_complete: impl FnOnce(Code)) -> bool {
        if self.display.is_flashing() {
            return false;
        }

        self.value = 0;
        self.encoder.reset();

        let completed = self.display.update(|state| {
            state.dot.position += 1;
            if state.dot.position as usize >= DIGIT_COUNT {
                state.dot.position = 0;
                Some(state.digits)
            } else {
                None
            }
        });

        match completed {
            Some(code) => {
                on_complete(code);
                true
            }
            None => false,
        }
    }

    /// Clear every digit and start over at the first slot
    pub fn reset(&mut self) {
        self.value = 0;
        self.display.update(|state| {
            state.digits = [0; DIGIT_COUNT];
            state.dot.position = 0;
        });
        self.encoder.reset();
    }

    /// Current slot index
    pub fn position(&self) -> u8 {
        self.display.snapshot().dot.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::rotary::pin_levels;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    type Ctx = DisplayContext<NoopRawMutex, ()>;

    fn turn(encoder: &RotaryEncoder, detents: u8) {
        for _ in 0..detents {
            encoder.on_pin_a_falling(pin_levels(true, false));
            encoder.on_pin_b_falling(pin_levels(true, true));
        }
    }

    #[test]
    fn test_value_written_to_current_slot() {
        let ctx = Ctx::new(());
        let encoder = RotaryEncoder::new();
        let mut entry = DigitEntryController::new(&ctx, &encoder, &VaultConfig::DEFAULT);

        turn(&encoder, 3);
        entry.handle_input(false, 100, |_| panic!("no code yet"));
        assert_eq!(ctx.snapshot().digits, [3, 0, 0, 0]);
    }

    #[test]
    fn test_reads_are_rate_limited() {
        let ctx = Ctx::new(());
        let encoder = RotaryEncoder::new();
        let mut entry = DigitEntryController::new(&ctx, &encoder, &VaultConfig::DEFAULT);

        entry.handle_input(false, 100, |_| {});
        turn(&encoder, 4);
        entry.handle_input(false, 130, |_| {});
        assert_eq!(ctx.snapshot().digits[0], 0);

        entry.handle_input(false, 151, |_| {});
        assert_eq!(ctx.snapshot().digits[0], 4);
    }

    #[test]
    fn test_four_submits_complete_once() {
        let ctx = Ctx::new(());
        let encoder = RotaryEncoder::new();
        let mut entry = DigitEntryController::new(&ctx, &encoder, &VaultConfig::DEFAULT);

        let mut completions = 0;
        let mut received = None;
        for (slot, digit) in [1u8, 2, 3, 4].into_iter().enumerate() {
            assert_eq!(entry.position() as usize, slot);
            ctx.update(|s| s.digits[slot] = digit);
            let done = entry.submit(|code| {
                completions += 1;
                received = Some(code);
            });
            assert_eq!(done, slot == 3);
        }

        assert_eq!(completions, 1);
        assert_eq!(received, Some([1, 2, 3, 4]));
        assert_eq!(entry.position(), 0);
        // Digits stay until the next read overwrites them
        assert_eq!(ctx.snapshot().digits, [1, 2, 3, 4]);
    }

    #[test]
    fn test_button_press_through_handle_input() {
        let ctx = Ctx::new(());
        let encoder = RotaryEncoder::new();
        let mut entry = DigitEntryController::new(&ctx, &encoder, &VaultConfig::DEFAULT);

        let mut code = None;
        let mut now = 100;
        for digit in [7u8, 0, 0, 7] {
            turn(&encoder, digit);
            // Let the value land in the slot, then press and release
            entry.handle_input(false, now, |c| code = Some(c));
            entry.handle_input(true, now + 60, |c| code = Some(c));
            entry.handle_input(false, now + 120, |c| code = Some(c));
            now += 200;
        }

        assert_eq!(code, Some([7, 0, 0, 7]));
        assert_eq!(encoder.counter(), 0);
    }

    #[test]
    fn test_submit_ignored_while_flashing() {
        let ctx = Ctx::new(());
        let encoder = RotaryEncoder::new();
        let mut entry = DigitEntryController::new(&ctx, &encoder, &VaultConfig::DEFAULT);

        ctx.begin_flashing();
        assert!(!entry.submit(|_| panic!("must not complete")));
        assert_eq!(entry.position(), 0);
    }

    #[test]
    fn test_flashing_resets_entry() {
        let ctx = Ctx::new(());
        let encoder = RotaryEncoder::new();
        let mut entry = DigitEntryController::new(&ctx, &encoder, &VaultConfig::DEFAULT);

        ctx.update(|s| {
            s.digits = [5, 6, 0, 0];
            s.dot.position = 2;
        });
        turn(&encoder, 2);

        ctx.begin_flashing();
        entry.handle_input(false, 500, |_| {});

        let state = ctx.snapshot();
        assert_eq!(state.digits, [0, 0, 0, 0]);
        assert_eq!(state.dot.position, 0);
        assert_eq!(encoder.counter(), 0);
    }
}
