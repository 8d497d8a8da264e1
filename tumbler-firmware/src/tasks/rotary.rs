//! Rotary encoder edge task
//!
//! Waits for a falling edge on either channel and hands both lines to the
//! shared counter. This is the only writer of the counter apart from the
//! digit entry reset.

use defmt::*;
use embassy_futures::select::{select, Either};
use tumbler_core::input::EncoderPin;
use tumbler_hal_rp2040::gpio::RpInput;

use crate::ENCODER;

#[embassy_executor::task]
pub async fn rotary_task(mut pin_a: RpInput<'static>, mut pin_b: RpInput<'static>) {
    info!("Rotary task started");

    loop {
        let falling = select(pin_a.0.wait_for_falling_edge(), pin_b.0.wait_for_falling_edge());
        let edge = match falling.await {
            Either::First(()) => EncoderPin::A,
            Either::Second(()) => EncoderPin::B,
        };

        ENCODER.on_falling_edge(edge, &pin_a, &pin_b);
    }
}
