//! Display refresh loop
//!
//! Scans the four digits one at a time, 1 ms each, for as long as the
//! firmware runs. Backs off whenever the flash loop wants the output.

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;

use super::encoding::{digit_code, wire_byte};
use super::state::DisplayContext;
use crate::config::DIGIT_COUNT;
use crate::traits::SegmentDisplay;

/// Time each digit stays lit
const DIGIT_HOLD_MS: u32 = 1;

/// Pause before retrying when the output is unavailable
const RETRY_MS: u32 = 1;

pub struct RefreshLoop<'a, M: RawMutex, D, T> {
    ctx: &'a DisplayContext<M, D>,
    delay: T,
    lock_wait_ms: u32,
}

impl<'a, M, D, T> RefreshLoop<'a, M, D, T>
where
    M: RawMutex,
    D: SegmentDisplay,
    T: DelayNs,
{
    pub fn new(ctx: &'a DisplayContext<M, D>, delay: T, lock_wait_ms: u32) -> Self {
        Self {
            ctx,
            delay,
            lock_wait_ms,
        }
    }

    /// Run one scan of all digits
    ///
    /// Returns `false` without touching the output when a flash is pending
    /// or running, or when the output lock is not free within the wait.
    pub async fn refresh_cycle(&mut self) -> bool {
        if self.ctx.is_flashing() || self.ctx.is_flash_requested() {
            self.delay.delay_ms(RETRY_MS).await;
            return false;
        }

        let lock = self.ctx.output().lock();
        let timeout = self.delay.delay_ms(self.lock_wait_ms);
        let mut output = match select(lock, timeout).await {
            Either::First(guard) => guard,
            Either::Second(()) => return false,
        };

        for position in 0..DIGIT_COUNT {
            let state = self.ctx.snapshot();
            let dot = state.dot.enabled && state.dot.position as usize == position;
            let code = digit_code(state.digits[position], position as u8);

            output.set_decimal_point(dot);
            output.write_byte(wire_byte(code));
            self.delay.delay_ms(DIGIT_HOLD_MS).await;
        }

        drop(output);
        true
    }

    pub async fn run(mut self) -> ! {
        loop {
            self.refresh_cycle().await;
        }
    }
}
