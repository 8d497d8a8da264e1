//! Bluetooth serial remote entry
//!
//! Talks to an AT-command serial module on UART1. After a short handshake
//! that names the module, every received line is parsed as a remote
//! message and forwarded to the input loop. Code entries are answered with
//! `1` or `0`.
//!
//! When the module does not answer the handshake the task logs a warning
//! and exits; the keypad keeps working.

use defmt::*;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx, Error as UartError};
use embassy_time::{with_timeout, Duration};
use embedded_io_async::{Read, ReadExactError, Write};
use heapless::String;
use tumbler_protocol::{Line, LineParser, RemoteMessage, MAX_LINE_LENGTH};

use crate::channels::{REMOTE_REQUESTS, REMOTE_RESPONSE};
use crate::config::{REMOTE_DEVICE_NAME, REMOTE_HANDSHAKE_TIMEOUT_MS, REMOTE_RESPONSE_TIMEOUT_MS};

/// Reply the module sends to an accepted AT command
const AT_OK: &str = "OK";

#[derive(Debug, Format)]
enum HandshakeError {
    /// No reply within the handshake timeout
    Timeout,
    /// The module replied with something other than OK
    Rejected,
    /// The command did not fit the line buffer
    CommandTooLong,
    Uart(UartError),
}

#[embassy_executor::task]
pub async fn remote_task(mut tx: BufferedUartTx, mut rx: BufferedUartRx) {
    info!("Remote task started");

    let mut parser = LineParser::new();

    if let Err(e) = handshake(&mut tx, &mut rx, &mut parser).await {
        warn!("Bluetooth module not responding ({:?}), remote entry disabled", e);
        return;
    }
    info!("Bluetooth module ready as {}", REMOTE_DEVICE_NAME);

    parser.reset();
    let mut buf = [0u8; MAX_LINE_LENGTH];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) => {
                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(line)) => handle_line(&mut tx, &line).await,
                        Ok(None) => {}
                        Err(e) => warn!("Remote line dropped: {:?}", e),
                    }
                }
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

/// Check the module is alive and set its advertised name
async fn handshake(
    tx: &mut BufferedUartTx,
    rx: &mut BufferedUartRx,
    parser: &mut LineParser,
) -> Result<(), HandshakeError> {
    command(tx, rx, parser, "AT").await?;

    let mut rename: String<MAX_LINE_LENGTH> = String::new();
    rename
        .push_str("AT+NAME=")
        .map_err(|_| HandshakeError::CommandTooLong)?;
    rename
        .push_str(REMOTE_DEVICE_NAME)
        .map_err(|_| HandshakeError::CommandTooLong)?;
    command(tx, rx, parser, &rename).await
}

/// Send one AT command and wait for OK
async fn command(
    tx: &mut BufferedUartTx,
    rx: &mut BufferedUartRx,
    parser: &mut LineParser,
    cmd: &str,
) -> Result<(), HandshakeError> {
    debug!("AT > {}", cmd);
    tx.write_all(cmd.as_bytes()).await.map_err(HandshakeError::Uart)?;
    tx.write_all(b"\r\n").await.map_err(HandshakeError::Uart)?;

    let timeout = Duration::from_millis(REMOTE_HANDSHAKE_TIMEOUT_MS);
    let reply = with_timeout(timeout, read_line(rx, parser))
        .await
        .map_err(|_| HandshakeError::Timeout)??;

    debug!("AT < {}", reply.as_str());
    if reply.as_str().starts_with(AT_OK) {
        Ok(())
    } else {
        Err(HandshakeError::Rejected)
    }
}

/// Read byte by byte until the parser completes a line
async fn read_line(
    rx: &mut BufferedUartRx,
    parser: &mut LineParser,
) -> Result<Line, HandshakeError> {
    let mut byte = [0u8; 1];
    loop {
        rx.read_exact(&mut byte).await.map_err(|e| match e {
            ReadExactError::Other(e) => HandshakeError::Uart(e),
            ReadExactError::UnexpectedEof => HandshakeError::Rejected,
        })?;
        match parser.feed(byte[0]) {
            Ok(Some(line)) => return Ok(line),
            Ok(None) => {}
            Err(_) => return Err(HandshakeError::Rejected),
        }
    }
}

/// Forward one line to the input loop and answer code entries
async fn handle_line(tx: &mut BufferedUartTx, line: &str) {
    let message = match RemoteMessage::parse(line) {
        Ok(message) => message,
        Err(e) => {
            warn!("Ignoring remote line {:?}: {:?}", line, e);
            return;
        }
    };

    REMOTE_RESPONSE.reset();
    REMOTE_REQUESTS.send(message).await;

    if let RemoteMessage::Enter(_) = message {
        let timeout = Duration::from_millis(REMOTE_RESPONSE_TIMEOUT_MS);
        match with_timeout(timeout, REMOTE_RESPONSE.wait()).await {
            Ok(response) => {
                if let Err(e) = tx.write_all(response.as_bytes()).await {
                    warn!("UART write error: {:?}", e);
                }
            }
            Err(_) => warn!("No verdict for remote entry"),
        }
    }
}
