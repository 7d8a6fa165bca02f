//! Vibration analysis result

use wasche_protocol::Packet;

use super::classifier::MachineState;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Summary of one full-window analysis pass
///
/// Produced once per analysis and never modified afterwards; a newer pass
/// replaces it wholesale.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VibrationResult {
    /// RMS of the window's magnitude sequence (g)
    pub rms_magnitude: f32,
    /// Dominant non-DC frequency (Hz)
    pub dominant_freq: f32,
    /// Classified machine state
    pub state: MachineState,
    /// Clock reading when the window was analysed (ms)
    pub timestamp: u32,
}

impl VibrationResult {
    /// Build the data packet carrying this result
    pub fn to_packet(&self, node_id: u16) -> Packet {
        Packet::data(
            node_id,
            self.state.tag(),
            self.rms_magnitude,
            self.dominant_freq,
            self.timestamp,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasche_protocol::PacketType;

    #[test]
    fn test_to_packet() {
        let result = VibrationResult {
            rms_magnitude: 0.62,
            dominant_freq: 3.125,
            state: MachineState::Washing,
            timestamp: 12_340,
        };
        let packet = result.to_packet(0x0042);

        assert_eq!(packet.packet_type, PacketType::Data);
        assert_eq!(packet.node_id, 0x0042);
        assert_eq!(packet.state, 1);
        assert_eq!(packet.rms_magnitude, 0.62);
        assert_eq!(packet.dominant_freq, 3.125);
        assert_eq!(packet.timestamp, 12_340);
    }
}
