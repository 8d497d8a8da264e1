//! Input loop
//!
//! Owns the vault controller. Each pass samples the rotary button and the
//! reset button, applies remote requests, and lets the controller run its
//! timers.

use defmt::*;
use embassy_executor::Spawner;
use embassy_time::{Duration, Instant, Ticker};
use tumbler_core::input::DigitEntryController;
use tumbler_core::vault::CodeOutcome;
use tumbler_core::Code;
use tumbler_hal::InputPin;
use tumbler_protocol::RemoteMessage;

use crate::channels::{REMOTE_REQUESTS, REMOTE_RESPONSE};
use crate::config::{INPUT_POLL_MS, VAULT_CONFIG};
use crate::tasks::flash_error;
use crate::{DisplayCtx, EncoderButton, ResetButton, Vault, ENCODER};

#[embassy_executor::task]
pub async fn input_task(
    display: &'static DisplayCtx,
    mut vault: Vault,
    button: EncoderButton,
    reset: ResetButton,
) {
    info!("Input task started");

    // SAFETY: polled only by the Embassy executor running this task.
    let spawner = unsafe { Spawner::for_current_executor() }.await;
    let mut entry = DigitEntryController::new(display, &ENCODER, &VAULT_CONFIG);
    let mut ticker = Ticker::every(Duration::from_millis(INPUT_POLL_MS));

    loop {
        ticker.next().await;
        let now = Instant::now().as_millis();

        let mut completed: Option<Code> = None;
        entry.handle_input(button.is_high(), now, |code| completed = Some(code));

        if let Some(code) = completed {
            match vault.code_entered(code, now).await {
                Ok(outcome) => report(spawner, display, outcome),
                Err(e) => error!("Code check failed: {:?}", e),
            }
        }

        while let Ok(message) = REMOTE_REQUESTS.try_receive() {
            match vault.remote_request(message, now).await {
                Ok(Some(outcome)) => {
                    REMOTE_RESPONSE.signal(outcome.response());
                    report(spawner, display, outcome);
                }
                Ok(None) => info!("Passcode changed remotely"),
                Err(e) => match message {
                    RemoteMessage::Enter(_) => error!("Remote code check failed: {:?}", e),
                    RemoteMessage::Change(_) => error!("Remote passcode change failed: {:?}", e),
                },
            }
        }

        match vault.reset_button(reset.is_high(), now).await {
            Ok(true) => info!("Passcode reset to default"),
            Ok(false) => {}
            Err(e) => error!("Passcode reset failed: {:?}", e),
        }

        match vault.tick(now) {
            Ok(Some(event)) => info!("Vault event {:?}, now {:?}", event, vault.state()),
            Ok(None) => {}
            Err(e) => error!("Vault update failed: {:?}", e),
        }
    }
}

fn report(spawner: Spawner, display: &'static DisplayCtx, outcome: CodeOutcome) {
    match outcome {
        CodeOutcome::Accepted => info!("Code accepted"),
        CodeOutcome::Rejected { incorrect_tries } => {
            warn!("Code rejected ({} incorrect tries)", incorrect_tries)
        }
        CodeOutcome::LockedOut { remaining_ms } => {
            warn!("Entry locked out for another {} ms", remaining_ms)
        }
    }

    if outcome.needs_error_feedback() {
        flash_error(spawner, display);
    }
}
