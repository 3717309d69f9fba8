//! Radio bridge UART receive task
//!
//! Receives frames from the radio bridge and hands telemetry datagrams to
//! the mailbox. This task never touches the display.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use gaugelink_protocol::{BridgeMessage, FrameParser};

use crate::channels::{now_ms, RadioStatus, RADIO_STATUS, TELEMETRY};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Radio RX task - receives and parses frames from the radio bridge
#[embassy_executor::task]
pub async fn radio_rx_task(mut rx: BufferedUartRx) {
    info!("Radio RX task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(frame)) => match BridgeMessage::from_frame(&frame) {
                            Ok(message) => handle_bridge_message(message),
                            Err(e) => {
                                warn!("Failed to parse bridge message: {:?}", e);
                            }
                        },
                        Ok(None) => {
                            // Need more bytes
                        }
                        Err(e) => {
                            warn!("Frame parse error: {:?}", e);
                        }
                    }
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

/// Handle a parsed bridge message
fn handle_bridge_message(message: BridgeMessage<'_>) {
    match message {
        BridgeMessage::Datagram { sender, data } => {
            // Any sender is accepted; length is the only check
            if let Err(e) = TELEMETRY.publish(data, now_ms()) {
                debug!("Dropped datagram from {}: {:?}", sender, e);
            }
        }
        BridgeMessage::Ready { mac } => {
            RADIO_STATUS.signal(RadioStatus::Ready(mac));
        }
        BridgeMessage::MacUnavailable => {
            RADIO_STATUS.signal(RadioStatus::MacUnavailable);
        }
        BridgeMessage::InitFailed { code } => {
            RADIO_STATUS.signal(RadioStatus::InitFailed(code));
        }
    }
}
