//! Inter-task communication channels
//!
//! The remote task runs independently of the input loop, which owns the
//! vault controller. Requests flow in through a channel, verdicts come
//! back through a signal.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use tumbler_protocol::{RemoteMessage, Response};

/// Channel capacity for remote requests
const REMOTE_CHANNEL_SIZE: usize = 4;

/// Parsed requests from the Bluetooth serial link
pub static REMOTE_REQUESTS: Channel<CriticalSectionRawMutex, RemoteMessage, REMOTE_CHANNEL_SIZE> =
    Channel::new();

/// Verdict for the most recent remote code entry
pub static REMOTE_RESPONSE: Signal<CriticalSectionRawMutex, Response> = Signal::new();
