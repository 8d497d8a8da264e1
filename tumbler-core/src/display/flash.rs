//! Error flash sequence
//!
//! Blinks "8888" with every decimal point lit, then hands the output back.
//! Runs once per rejected code.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;

use super::encoding::{wire_byte, BLANK_CODE, ERROR_PATTERN_CODE};
use super::state::DisplayContext;
use crate::config::VaultConfig;
use crate::traits::SegmentDisplay;

/// Pause between attempts to take the output
const RETRY_MS: u32 = 1;

/// Shape of the blink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlashSequence {
    /// Number of pattern/blank pairs
    pub count: u8,
    /// Length of one pair; each half gets `flash_time_ms / 2`
    pub flash_time_ms: u32,
}

impl From<&VaultConfig> for FlashSequence {
    fn from(config: &VaultConfig) -> Self {
        Self {
            count: config.flash_count,
            flash_time_ms: config.flash_time_ms,
        }
    }
}

pub struct FlashLoop<'a, M: RawMutex, D, T> {
    ctx: &'a DisplayContext<M, D>,
    delay: T,
    sequence: FlashSequence,
}

impl<'a, M, D, T> FlashLoop<'a, M, D, T>
where
    M: RawMutex,
    D: SegmentDisplay,
    T: DelayNs,
{
    pub fn new(ctx: &'a DisplayContext<M, D>, delay: T, sequence: FlashSequence) -> Self {
        Self {
            ctx,
            delay,
            sequence,
        }
    }

    /// Take the output, blink, release
    ///
    /// Waits as long as it takes for the refresh loop to finish its cycle;
    /// the pending request keeps it from starting another.
    pub async fn run(mut self) {
        self.ctx.request_flash();

        let mut output = loop {
            match self.ctx.output().try_lock() {
                Ok(guard) => break guard,
                Err(_) => self.delay.delay_ms(RETRY_MS).await,
            }
        };

        self.ctx.begin_flashing();
        output.set_decimal_point(true);

        let half = self.sequence.flash_time_ms / 2;
        for _ in 0..self.sequence.count {
            output.write_byte(wire_byte(ERROR_PATTERN_CODE));
            self.delay.delay_ms(half).await;
            output.write_byte(wire_byte(BLANK_CODE));
            self.delay.delay_ms(half).await;
        }

        drop(output);
        self.ctx.end_flashing();
    }
}
