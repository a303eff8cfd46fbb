//! In-memory packet transport.

use std::collections::VecDeque;

use oscframe_core::Transport;

/// A transport fed from a scripted queue of inbound packets.
///
/// Outbound packets are recorded verbatim for later assertion. Reads are
/// destructive in the same at-most-once discipline the real contract
/// promises: one `read_packet` per non-zero `packet_size`.
#[derive(Default)]
pub struct ScriptedTransport {
    incoming: VecDeque<Vec<u8>>,
    sent: Vec<Vec<u8>>,
}

impl ScriptedTransport {
    /// Create an empty transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one inbound packet.
    pub fn push_packet(&mut self, packet: impl Into<Vec<u8>>) {
        self.incoming.push_back(packet.into());
    }

    /// Packets still waiting to be read.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.incoming.len()
    }

    /// Every packet written so far, in order.
    #[must_use]
    pub fn sent(&self) -> &[Vec<u8>] {
        &self.sent
    }
}

impl Transport for ScriptedTransport {
    fn packet_size(&mut self) -> u32 {
        self.incoming.front().map_or(0, |packet| packet.len() as u32)
    }

    fn read_packet(&mut self, buf: &mut [u8]) {
        if let Some(packet) = self.incoming.pop_front() {
            let len = packet.len().min(buf.len());
            buf[..len].copy_from_slice(&packet[..len]);
        }
    }

    fn write_packet(&mut self, packet: &[u8]) {
        self.sent.push(packet.to_vec());
    }
}
