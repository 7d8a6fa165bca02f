//! Packet encoding and decoding for the node-to-coordinator link.
//!
//! Packet format (packed, little-endian, 18 bytes):
//! - TYPE (1 byte): 0x01 data, 0x02 heartbeat, 0x03 ack
//! - NODE_ID (2 bytes): sending node
//! - STATE (1 byte): machine state tag
//! - RMS (4 bytes): f32 RMS magnitude in g
//! - FREQ (4 bytes): f32 dominant frequency in Hz
//! - TIMESTAMP (4 bytes): u32 milliseconds since node boot
//! - CHECKSUM (2 bytes): 16-bit wrapping sum of the 16 preceding bytes
//!
//! The checksum is a plain additive sum. It catches any single flipped bit,
//! but swapping two bytes (or compensating errors) goes unnoticed. It is not
//! an authenticity check.

/// Encoded packet size in bytes
pub const PACKET_SIZE: usize = 18;

/// Number of bytes covered by the checksum
pub const CHECKSUM_OFFSET: usize = PACKET_SIZE - 2;

// Field offsets
const OFF_TYPE: usize = 0;
const OFF_NODE_ID: usize = 1;
const OFF_STATE: usize = 3;
const OFF_RMS: usize = 4;
const OFF_FREQ: usize = 8;
const OFF_TIMESTAMP: usize = 12;

// Packet type IDs
pub const PKT_DATA: u8 = 0x01;
pub const PKT_HEARTBEAT: u8 = 0x02;
pub const PKT_ACK: u8 = 0x03;

/// Errors that can occur during packet encoding or decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketError {
    /// Input is not exactly one packet long
    InvalidLength,
    /// Type byte is not a known packet type
    UnknownType,
    /// Checksum mismatch
    InvalidChecksum,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// Packet type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketType {
    /// Vibration analysis result
    Data,
    /// Liveness keepalive
    Heartbeat,
    /// Coordinator acknowledgement
    Ack,
}

impl PacketType {
    /// Parse a packet type from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            PKT_DATA => Some(PacketType::Data),
            PKT_HEARTBEAT => Some(PacketType::Heartbeat),
            PKT_ACK => Some(PacketType::Ack),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            PacketType::Data => PKT_DATA,
            PacketType::Heartbeat => PKT_HEARTBEAT,
            PacketType::Ack => PKT_ACK,
        }
    }
}

/// Compute the additive checksum over `data`
///
/// Unsigned 16-bit sum of every byte, wrapping on overflow.
pub fn checksum(data: &[u8]) -> u16 {
    data.iter()
        .fold(0u16, |sum, &byte| sum.wrapping_add(byte as u16))
}

/// A single node-to-coordinator record
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Packet {
    /// Packet type
    pub packet_type: PacketType,
    /// Sending node identifier
    pub node_id: u16,
    /// Machine state tag
    pub state: u8,
    /// RMS magnitude (g)
    pub rms_magnitude: f32,
    /// Dominant frequency (Hz)
    pub dominant_freq: f32,
    /// Timestamp (ms)
    pub timestamp: u32,
}

impl Packet {
    /// Create a data packet carrying an analysis result
    pub fn data(node_id: u16, state: u8, rms_magnitude: f32, dominant_freq: f32, timestamp: u32) -> Self {
        Self {
            packet_type: PacketType::Data,
            node_id,
            state,
            rms_magnitude,
            dominant_freq,
            timestamp,
        }
    }

    /// Create a heartbeat packet (measurement fields zeroed)
    pub fn heartbeat(node_id: u16, timestamp: u32) -> Self {
        Self {
            packet_type: PacketType::Heartbeat,
            node_id,
            state: 0,
            rms_magnitude: 0.0,
            dominant_freq: 0.0,
            timestamp,
        }
    }

    /// Create an acknowledgement addressed to `node_id`
    pub fn ack(node_id: u16, timestamp: u32) -> Self {
        Self {
            packet_type: PacketType::Ack,
            ..Self::heartbeat(node_id, timestamp)
        }
    }

    /// Encode this packet into its fixed-size wire form
    pub fn encode(&self) -> [u8; PACKET_SIZE] {
        let mut buf = [0u8; PACKET_SIZE];

        buf[OFF_TYPE] = self.packet_type.to_byte();
        buf[OFF_NODE_ID..OFF_STATE].copy_from_slice(&self.node_id.to_le_bytes());
        buf[OFF_STATE] = self.state;
        buf[OFF_RMS..OFF_FREQ].copy_from_slice(&self.rms_magnitude.to_le_bytes());
        buf[OFF_FREQ..OFF_TIMESTAMP].copy_from_slice(&self.dominant_freq.to_le_bytes());
        buf[OFF_TIMESTAMP..CHECKSUM_OFFSET].copy_from_slice(&self.timestamp.to_le_bytes());

        let sum = checksum(&buf[..CHECKSUM_OFFSET]);
        buf[CHECKSUM_OFFSET..].copy_from_slice(&sum.to_le_bytes());

        buf
    }

    /// Encode this packet into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode_into(&self, buffer: &mut [u8]) -> Result<usize, PacketError> {
        if buffer.len() < PACKET_SIZE {
            return Err(PacketError::BufferTooSmall);
        }
        buffer[..PACKET_SIZE].copy_from_slice(&self.encode());
        Ok(PACKET_SIZE)
    }

    /// Decode a packet from exactly [`PACKET_SIZE`] bytes
    ///
    /// The checksum is verified before any field is interpreted.
    pub fn decode(bytes: &[u8]) -> Result<Self, PacketError> {
        let bytes: &[u8; PACKET_SIZE] = bytes.try_into().map_err(|_| PacketError::InvalidLength)?;

        let expected = u16::from_le_bytes([bytes[CHECKSUM_OFFSET], bytes[CHECKSUM_OFFSET + 1]]);
        if checksum(&bytes[..CHECKSUM_OFFSET]) != expected {
            return Err(PacketError::InvalidChecksum);
        }

        let packet_type = PacketType::from_byte(bytes[OFF_TYPE]).ok_or(PacketError::UnknownType)?;

        Ok(Self {
            packet_type,
            node_id: u16::from_le_bytes([bytes[OFF_NODE_ID], bytes[OFF_NODE_ID + 1]]),
            state: bytes[OFF_STATE],
            rms_magnitude: f32::from_le_bytes(field4(bytes, OFF_RMS)),
            dominant_freq: f32::from_le_bytes(field4(bytes, OFF_FREQ)),
            timestamp: u32::from_le_bytes(field4(bytes, OFF_TIMESTAMP)),
        })
    }
}

/// Copy out a 4-byte field
fn field4(bytes: &[u8; PACKET_SIZE], offset: usize) -> [u8; 4] {
    [
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ]
}
