//! Packet transport contract and send helpers.
//!
//! The host owns the wire — UDP, SLIP over a UART, a ring buffer shared
//! with an interrupt handler. The library only sees whole packets moving
//! through this trait.

use oscframe_proto::{Bundle, Message};

use crate::error::Result;

/// Host-supplied packet transport.
///
/// Calls may block or yield at the host's discretion; an idle host is
/// expected to yield inside [`Transport::packet_size`].
pub trait Transport {
    /// Byte length of the next pending packet, or `0` when none is
    /// pending.
    fn packet_size(&mut self) -> u32;

    /// Fill `buf` with the pending packet's bytes.
    ///
    /// Called at most once per non-zero [`Transport::packet_size`]
    /// report, with a buffer of exactly that length.
    fn read_packet(&mut self, buf: &mut [u8]);

    /// Transmit `packet` as one wire packet.
    fn write_packet(&mut self, packet: &[u8]);
}

/// Encode `message` and hand it to the transport as a single packet.
///
/// # Errors
///
/// [`ServerError::Allocation`](crate::ServerError::Allocation) if the
/// encode buffer could not be reserved; nothing is written in that case.
pub fn send_message<T: Transport>(transport: &mut T, message: &Message) -> Result<()> {
    let wire = message.to_bytes()?;
    transport.write_packet(&wire);
    Ok(())
}

/// Encode `bundle` and hand it to the transport as a single packet.
///
/// # Errors
///
/// [`ServerError::Allocation`](crate::ServerError::Allocation) if the
/// encode buffer could not be reserved; nothing is written in that case.
pub fn send_bundle<T: Transport>(transport: &mut T, bundle: &Bundle) -> Result<()> {
    let wire = bundle.to_bytes()?;
    transport.write_packet(&wire);
    Ok(())
}
