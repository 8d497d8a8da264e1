//! Tumbler - Combination-Lock Vault Firmware
//!
//! Main firmware binary for an RP2040 vault: a rotary encoder dials a
//! four-digit code onto a multiplexed seven-segment display, a servo
//! drives the latch, and a Bluetooth serial module allows remote entry.
//!
//! Pin map (Raspberry Pi Pico):
//!
//! | GPIO | Function                            |
//! |------|-------------------------------------|
//! | 2    | Reset-password button (active high) |
//! | 4/5  | UART1 TX/RX to Bluetooth module     |
//! | 12   | Servo PWM                           |
//! | 13   | Door switch (low = open)            |
//! | 15   | Buzzer PWM                          |
//! | 16   | Shift register data                 |
//! | 17   | Shift register clock                |
//! | 18   | Shift register latch                |
//! | 19   | Decimal point (active low)          |
//! | 20   | Encoder push button (active low)    |
//! | 21   | Encoder channel A                   |
//! | 22   | Encoder channel B                   |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART1;
use embassy_rp::pwm::{Pwm, PwmOutput};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Instant, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use tumbler_core::display::DisplayContext;
use tumbler_core::input::RotaryEncoder;
use tumbler_core::password::PasswordStore;
use tumbler_core::vault::VaultController;
use tumbler_drivers::buzzer::PwmBuzzer;
use tumbler_drivers::display::ShiftRegisterDisplay;
use tumbler_drivers::latch::{ServoLatch, ServoTiming};
use tumbler_hal::ActiveLow;
use tumbler_hal_rp2040::flash::Rp2040Eeprom;
use tumbler_hal_rp2040::gpio::{RpInput, RpOutput};
use tumbler_hal_rp2040::pwm;

use crate::config::{REMOTE_BAUDRATE, VAULT_CONFIG};

mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART1_IRQ => BufferedInterruptHandler<UART1>;
});

pub type Display = ShiftRegisterDisplay<
    RpOutput<'static>,
    RpOutput<'static>,
    RpOutput<'static>,
    RpOutput<'static>,
>;

/// Display state and output shared by the refresh, flash and input tasks
pub type DisplayCtx = DisplayContext<CriticalSectionRawMutex, Display>;

pub type Vault = VaultController<
    Rp2040Eeprom<'static>,
    ServoLatch<PwmOutput<'static>, RpInput<'static>>,
    PwmBuzzer<PwmOutput<'static>>,
>;

pub type EncoderButton = ActiveLow<RpInput<'static>>;
pub type ResetButton = RpInput<'static>;

/// Detent counter written from the rotary task
pub static ENCODER: RotaryEncoder = RotaryEncoder::new();

static DISPLAY: StaticCell<DisplayCtx> = StaticCell::new();

/// Flash reads attempted before the vault gives up
const STORAGE_LOAD_ATTEMPTS: u32 = 3;

// UART buffers for the Bluetooth module
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Tumbler firmware starting...");

    let p = embassy_rp::init(Default::default());

    // Display: parked with latch high and the decimal point off
    let display = ShiftRegisterDisplay::new(
        RpOutput(Output::new(p.PIN_16, Level::Low)),
        RpOutput(Output::new(p.PIN_17, Level::Low)),
        RpOutput(Output::new(p.PIN_18, Level::High)),
        RpOutput(Output::new(p.PIN_19, Level::High)),
    );
    let display: &'static DisplayCtx = DISPLAY.init(DisplayContext::new(display));

    // Storage
    let mut eeprom = Rp2040Eeprom::new(p.FLASH, p.DMA_CH0);
    let mut loaded = eeprom.load().await;
    for attempt in 1..STORAGE_LOAD_ATTEMPTS {
        let Err(e) = loaded else { break };
        warn!("Failed to load vault record (attempt {}): {:?}", attempt, e);
        Timer::after_millis(100).await;
        loaded = eeprom.load().await;
    }
    match loaded {
        Ok(true) => info!("Vault record loaded from flash"),
        Ok(false) => info!("No vault record in flash, first boot"),
        Err(_) => {}
    }

    let store = match PasswordStore::open_loaded(eeprom, loaded, &VAULT_CONFIG).await {
        Ok(store) => store,
        Err(e) => {
            // Latch stays unpowered and no input is accepted
            error!("Vault record unreadable ({:?}), refusing entry", e);
            loop {
                Timer::after_secs(60).await;
            }
        }
    };
    info!(
        "Password store ready, {} incorrect tries recorded",
        store.amount_of_incorrect_tries()
    );

    // Latch: servo on slice 6 channel A, door switch pulled up
    let servo = Pwm::new_output_a(p.PWM_SLICE6, p.PIN_12, pwm::servo_config());
    let (servo, _) = servo.split();
    let door = RpInput(Input::new(p.PIN_13, Pull::Up));
    let latch = ServoLatch::new(unwrap!(servo), door, ServoTiming::default());

    // Buzzer: slice 7 channel B
    let buzzer = Pwm::new_output_b(p.PWM_SLICE7, p.PIN_15, pwm::buzzer_config());
    let (_, buzzer) = buzzer.split();
    let buzzer = unwrap!(PwmBuzzer::new(unwrap!(buzzer)).map_err(|_| ()));

    let vault = unwrap!(VaultController::new(
        VAULT_CONFIG,
        store,
        latch,
        buzzer,
        Instant::now().as_millis(),
    ));
    info!("Vault controller ready in {:?}", vault.state());

    // Encoder and buttons
    let pin_a = RpInput(Input::new(p.PIN_21, Pull::Up));
    let pin_b = RpInput(Input::new(p.PIN_22, Pull::Up));
    let button = ActiveLow(RpInput(Input::new(p.PIN_20, Pull::Up)));
    let reset = RpInput(Input::new(p.PIN_2, Pull::Down));

    // Bluetooth module on UART1
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = REMOTE_BAUDRATE;

    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 64]);

    let uart = Uart::new_blocking(p.UART1, p.PIN_4, p.PIN_5, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART1 initialized at {} baud", REMOTE_BAUDRATE);

    // Spawn tasks
    spawner.spawn(unwrap!(tasks::display_refresh_task(display)));
    spawner.spawn(unwrap!(tasks::rotary_task(pin_a, pin_b)));
    spawner.spawn(unwrap!(tasks::input_task(display, vault, button, reset)));
    spawner.spawn(unwrap!(tasks::remote_task(tx, rx)));

    info!("All tasks spawned, firmware running");

    loop {
        Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
