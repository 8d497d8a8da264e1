//! Display refresh and error flash tasks

use defmt::*;
use embassy_executor::Spawner;
use embassy_time::Delay;
use tumbler_core::display::{FlashLoop, FlashSequence, RefreshLoop};

use crate::config::VAULT_CONFIG;
use crate::DisplayCtx;

/// Multiplex the digits for as long as the firmware runs
#[embassy_executor::task]
pub async fn display_refresh_task(ctx: &'static DisplayCtx) {
    info!("Display refresh task started");

    RefreshLoop::new(ctx, Delay, VAULT_CONFIG.refresh_lock_wait_ms)
        .run()
        .await
}

#[embassy_executor::task(pool_size = 1)]
async fn display_flash_task(ctx: &'static DisplayCtx) {
    debug!("Error flash started");
    FlashLoop::new(ctx, Delay, FlashSequence::from(&VAULT_CONFIG))
        .run()
        .await;
    debug!("Error flash finished");
}

/// Start an error flash unless one is already running
pub fn flash_error(spawner: Spawner, ctx: &'static DisplayCtx) {
    match display_flash_task(ctx) {
        Ok(token) => spawner.spawn(token),
        Err(_) => debug!("Error flash already running"),
    }
}
