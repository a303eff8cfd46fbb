//! Top-level packet dispatch.
//!
//! A transport hands over opaque byte runs; the first bytes decide what
//! they are. `/` opens a message address, the `#bundle` tag opens a
//! bundle, anything else is malformed.

use bytes::{BufMut, Bytes};

use crate::{
    Timetag,
    bundle::{BUNDLE_TAG, Bundle},
    errors::{ProtocolError, Result},
    message::Message,
};

/// One decoded OSC packet: a single message or a bundle tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    /// A bare message
    Message(Message),
    /// A timetagged bundle
    Bundle(Bundle),
}

impl Packet {
    /// Decode one packet from its complete byte run.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::UnrecognizedPacket`] when the bytes start with
    /// neither `/` nor the bundle tag, otherwise whatever the message or
    /// bundle decoder reports.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Self::decode_nested(bytes, Timetag::IMMEDIATELY)
    }

    /// Decode a packet nested inside a bundle tagged `inherited`.
    pub(crate) fn decode_nested(bytes: &[u8], inherited: Timetag) -> Result<Self> {
        if bytes.starts_with(BUNDLE_TAG) {
            Bundle::decode_nested(bytes, inherited).map(Self::Bundle)
        } else if bytes.first() == Some(&b'/') {
            Message::decode(bytes).map(Self::Message)
        } else {
            Err(ProtocolError::UnrecognizedPacket)
        }
    }

    /// Bytes this packet occupies on the wire.
    #[must_use]
    pub fn padded_len(&self) -> usize {
        match self {
            Self::Message(message) => message.padded_len(),
            Self::Bundle(bundle) => bundle.padded_len(),
        }
    }

    /// Encode the packet into `dst`.
    pub fn encode(&self, dst: &mut impl BufMut) {
        match self {
            Self::Message(message) => message.encode(dst),
            Self::Bundle(bundle) => bundle.encode(dst),
        }
    }

    /// Encode into a freshly reserved buffer.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::Allocation`] if the buffer could not be reserved.
    pub fn to_bytes(&self) -> Result<Bytes> {
        match self {
            Self::Message(message) => message.to_bytes(),
            Self::Bundle(bundle) => bundle.to_bytes(),
        }
    }
}

impl From<Message> for Packet {
    fn from(message: Message) -> Self {
        Self::Message(message)
    }
}

impl From<Bundle> for Packet {
    fn from(bundle: Bundle) -> Self {
        Self::Bundle(bundle)
    }
}
