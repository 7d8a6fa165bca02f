//! Radio receive task
//!
//! Parses coordinator traffic from the modem and logs it. Nothing received
//! here feeds back into the control loop.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use wasche_protocol::{Packet, PacketParser, PacketType};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Radio RX task - receives and parses packets from the coordinator
#[embassy_executor::task]
pub async fn radio_rx_task(mut rx: BufferedUartRx, node_id: u16) {
    info!("Radio RX task started");

    let mut parser = PacketParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(packet)) => handle_packet(&packet, node_id),
                        Ok(None) => {
                            // Need more bytes
                        }
                        Err(e) => {
                            warn!("Packet parse error: {:?}", e);
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

fn handle_packet(packet: &Packet, node_id: u16) {
    if packet.node_id != node_id {
        trace!("Packet for node {} ignored", packet.node_id);
        return;
    }

    match packet.packet_type {
        PacketType::Ack => debug!("ACK received (t={}ms)", packet.timestamp),
        other => debug!("Unexpected {:?} from coordinator", other),
    }
}
