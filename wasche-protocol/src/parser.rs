//! Streaming packet parser for the coordinator side of the link.
//!
//! Packets carry no sync byte, so the parser locks onto the first byte that
//! is a valid packet type, collects a full packet, and checks the checksum.
//! On a mismatch it drops the candidate start byte and re-scans the bytes it
//! already holds for the next plausible start.

use heapless::Vec;

use crate::packet::{Packet, PacketError, PacketType, PACKET_SIZE};

/// Byte-at-a-time packet parser
#[derive(Debug, Clone)]
pub struct PacketParser {
    buffer: Vec<u8, PACKET_SIZE>,
}

impl Default for PacketParser {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketParser {
    /// Create a new packet parser
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Number of bytes buffered towards the next packet
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(packet))` when a complete valid packet is parsed,
    /// `Ok(None)` when more bytes are needed, or `Err` when a candidate
    /// packet failed verification.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Packet>, PacketError> {
        if self.buffer.is_empty() && PacketType::from_byte(byte).is_none() {
            // Silently ignore bytes that cannot start a packet
            return Ok(None);
        }

        // Capacity is PACKET_SIZE and the buffer is drained on reaching it
        let _ = self.buffer.push(byte);
        if self.buffer.len() < PACKET_SIZE {
            return Ok(None);
        }

        match Packet::decode(&self.buffer) {
            Ok(packet) => {
                self.reset();
                Ok(Some(packet))
            }
            Err(e) => {
                self.resync();
                Err(e)
            }
        }
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete packet found, if any.
    /// Remaining bytes after a complete packet are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Packet>, PacketError> {
        for &byte in bytes {
            if let Some(packet) = self.feed(byte)? {
                return Ok(Some(packet));
            }
        }
        Ok(None)
    }

    /// Discard the current start byte and shift to the next plausible start
    fn resync(&mut self) {
        let next_start = self.buffer[1..]
            .iter()
            .position(|&b| PacketType::from_byte(b).is_some())
            .map(|i| i + 1);

        let mut shifted = Vec::new();
        if let Some(start) = next_start {
            // Never exceeds capacity: a strict suffix of a full buffer
            let _ = shifted.extend_from_slice(&self.buffer[start..]);
        }
        self.buffer = shifted;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::PKT_DATA;

    #[test]
    fn test_parse_single_packet() {
        let packet = Packet::data(0x0001, 1, 0.55, 3.125, 5000);
        let mut parser = PacketParser::new();

        let parsed = parser.feed_bytes(&packet.encode()).unwrap().unwrap();
        assert_eq!(parsed, packet);
        assert_eq!(parser.pending(), 0);
    }

    #[test]
    fn test_parser_skips_leading_garbage() {
        let packet = Packet::heartbeat(0x0002, 30_000);
        let mut data = Vec::<u8, 32>::new();
        data.extend_from_slice(&[0x00, 0xFF, 0x55, 0xAA]).unwrap();
        data.extend_from_slice(&packet.encode()).unwrap();

        let mut parser = PacketParser::new();
        let parsed = parser.feed_bytes(&data).unwrap().unwrap();
        assert_eq!(parsed.packet_type, PacketType::Heartbeat);
        assert_eq!(parsed.node_id, 0x0002);
    }

    #[test]
    fn test_parser_resyncs_after_truncated_packet() {
        let good = Packet::data(0x0009, 2, 1.7, 12.5, 777);

        // A lone type byte and two junk bytes precede the real packet
        let mut data = Vec::<u8, 32>::new();
        data.extend_from_slice(&[PKT_DATA, 0x10, 0x20]).unwrap();
        data.extend_from_slice(&good.encode()).unwrap();

        let mut parser = PacketParser::new();
        let mut errors = 0;
        let mut found = None;
        for &byte in data.iter() {
            match parser.feed(byte) {
                Ok(Some(packet)) => found = Some(packet),
                Ok(None) => {}
                Err(e) => {
                    assert_eq!(e, PacketError::InvalidChecksum);
                    errors += 1;
                }
            }
        }

        assert_eq!(errors, 1);
        assert_eq!(found, Some(good));
    }

    #[test]
    fn test_parse_back_to_back_packets() {
        let first = Packet::data(1, 0, 0.05, 0.78125, 10);
        let second = Packet::ack(1, 11);

        let mut parser = PacketParser::new();
        assert_eq!(parser.feed_bytes(&first.encode()), Ok(Some(first)));
        assert_eq!(parser.feed_bytes(&second.encode()), Ok(Some(second)));
    }

    #[test]
    fn test_reset_discards_partial_packet() {
        let bytes = Packet::heartbeat(3, 0).encode();
        let mut parser = PacketParser::new();
        assert_eq!(parser.feed_bytes(&bytes[..5]), Ok(None));
        assert_eq!(parser.pending(), 5);

        parser.reset();
        assert_eq!(parser.pending(), 0);
        assert_eq!(parser.feed_bytes(&bytes), Ok(Some(Packet::heartbeat(3, 0))));
    }
}
