//! OSC bundles: timetagged containers of messages and nested bundles.
//!
//! Adding an element always clones the caller's value, so a bundle tree
//! is strictly a tree: no element is ever aliased with the value it was
//! built from, and cycles cannot be constructed.

use bytes::{BufMut, Bytes};

use crate::{
    Timetag,
    errors::{ProtocolError, Result},
    message::Message,
    packet::Packet,
    wire::WireReader,
};

/// The 8-byte tag that opens every bundle on the wire.
pub(crate) const BUNDLE_TAG: &[u8; 8] = b"#bundle\0";

/// Bytes of the bundle header: the `#bundle` tag plus the timetag.
const HEADER_LEN: usize = 16;

/// One element of a bundle.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// A leaf message
    Message(Message),
    /// A nested bundle
    Bundle(Bundle),
}

impl Element {
    /// Bytes this element occupies on the wire, excluding its size prefix.
    #[must_use]
    pub fn padded_len(&self) -> usize {
        match self {
            Self::Message(message) => message.padded_len(),
            Self::Bundle(bundle) => bundle.padded_len(),
        }
    }

    fn encode(&self, dst: &mut impl BufMut) {
        match self {
            Self::Message(message) => message.encode(dst),
            Self::Bundle(bundle) => bundle.encode(dst),
        }
    }
}

/// An OSC bundle: a timetag plus an ordered list of elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Bundle {
    timetag: Timetag,
    elements: Vec<Element>,
}

impl Default for Bundle {
    fn default() -> Self {
        Self::new()
    }
}

impl Bundle {
    /// Create an empty bundle tagged "immediately".
    #[must_use]
    pub fn new() -> Self {
        Self { timetag: Timetag::IMMEDIATELY, elements: Vec::new() }
    }

    /// The bundle's timetag.
    #[must_use]
    pub fn timetag(&self) -> Timetag {
        self.timetag
    }

    /// Replace the timetag.
    pub fn set_timetag(&mut self, timetag: Timetag) {
        self.timetag = timetag;
    }

    /// The elements in wire order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Consume the bundle, yielding its elements in wire order.
    #[must_use]
    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }

    /// Append a deep copy of `message`.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::Allocation`]; the bundle is unchanged on failure.
    pub fn add_message(&mut self, message: &Message) -> Result<()> {
        self.elements.try_reserve(1)?;
        self.elements.push(Element::Message(message.clone()));
        Ok(())
    }

    /// Append a deep copy of `bundle`, including its nested elements.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::Allocation`]; the bundle is unchanged on failure.
    pub fn add_bundle(&mut self, bundle: &Bundle) -> Result<()> {
        self.elements.try_reserve(1)?;
        self.elements.push(Element::Bundle(bundle.clone()));
        Ok(())
    }

    /// Bytes this bundle occupies on the wire: the 16-byte header plus a
    /// 4-byte size prefix and padded body per element.
    #[must_use]
    pub fn padded_len(&self) -> usize {
        HEADER_LEN + self.elements.iter().map(|e| 4 + e.padded_len()).sum::<usize>()
    }

    /// Encode the bundle into `dst`.
    ///
    /// Writes exactly [`Bundle::padded_len`] bytes.
    pub fn encode(&self, dst: &mut impl BufMut) {
        dst.put_slice(BUNDLE_TAG);
        dst.put_u64(self.timetag.raw());
        for element in &self.elements {
            dst.put_u32(element.padded_len() as u32);
            element.encode(dst);
        }
    }

    /// Encode into a freshly reserved buffer.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::Allocation`] if the buffer could not be reserved.
    pub fn to_bytes(&self) -> Result<Bytes> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(self.padded_len())?;
        self.encode(&mut buf);
        Ok(Bytes::from(buf))
    }

    /// Decode a top-level bundle from one packet's bytes.
    ///
    /// # Errors
    ///
    /// Any [`ProtocolError`] format variant for malformed input, or
    /// [`ProtocolError::Allocation`] while building the tree.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Self::decode_nested(bytes, Timetag::IMMEDIATELY)
    }

    /// Decode a bundle whose enclosing bundle carried `inherited`.
    ///
    /// A nested bundle must not be tagged earlier than its parent; an
    /// inherited value of "immediately" imposes no constraint.
    pub(crate) fn decode_nested(bytes: &[u8], inherited: Timetag) -> Result<Self> {
        let mut reader = WireReader::new(bytes);

        if reader.read_bytes(8)? != BUNDLE_TAG {
            return Err(ProtocolError::UnrecognizedPacket);
        }
        let timetag = Timetag::from_raw(reader.read_u64()?);
        if !inherited.is_immediate() && timetag < inherited {
            return Err(ProtocolError::NestedTimetagEarlier { nested: timetag, parent: inherited });
        }

        let mut bundle = Self::new();
        bundle.set_timetag(timetag);
        while !reader.is_empty() {
            let size = reader.read_u32()? as usize;
            let child = reader.read_bytes(size)?;
            bundle.elements.try_reserve(1)?;
            bundle.elements.push(match Packet::decode_nested(child, timetag)? {
                Packet::Message(message) => Element::Message(message),
                Packet::Bundle(nested) => Element::Bundle(nested),
            });
        }
        Ok(bundle)
    }
}
