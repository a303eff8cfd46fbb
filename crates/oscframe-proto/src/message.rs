//! OSC messages: the address/arguments model and its codec.
//!
//! A message owns an address and an ordered argument list. The type tag
//! string the wire format carries is derived from the arguments, so the
//! "one tag per argument, position for position" invariant holds by
//! construction and cannot be violated through the public API.
//!
//! Builder operations either fully succeed or leave the message unchanged.
//! Growth goes through fallible reservation so memory-constrained hosts
//! see allocation failure as an error value instead of an abort.

use bytes::{BufMut, Bytes};

use crate::{
    errors::{ProtocolError, Result},
    wire::{WireReader, pad4},
};

/// Allocation granularity for address storage, as in the original
/// embedded implementation: grow in 8-byte blocks to amortize
/// reallocation.
const ADDRESS_BLOCK: usize = 8;

/// One typed OSC argument.
///
/// The tag byte of each variant is fixed: `i`, `f`, `s`, `b`. String
/// arguments are byte-transparent — the library neither validates nor
/// produces UTF-8 for them; the only constraint is the absence of
/// interior NUL bytes, which the NUL-terminated wire encoding could not
/// carry.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// Signed 32-bit integer (`i`)
    Int32(i32),
    /// 32-bit IEEE-754 float (`f`)
    Float32(f32),
    /// NUL-terminated byte string (`s`), stored without the terminator
    String(Bytes),
    /// Length-prefixed binary blob (`b`)
    Blob(Bytes),
}

impl Argument {
    /// The wire type tag byte for this argument.
    #[must_use]
    pub fn tag(&self) -> u8 {
        match self {
            Self::Int32(_) => b'i',
            Self::Float32(_) => b'f',
            Self::String(_) => b's',
            Self::Blob(_) => b'b',
        }
    }

    /// Bytes this argument occupies on the wire.
    fn wire_len(&self) -> usize {
        match self {
            Self::Int32(_) | Self::Float32(_) => 4,
            Self::String(bytes) => pad4(bytes.len() + 1),
            Self::Blob(bytes) => 4 + pad4(bytes.len()),
        }
    }
}

/// An OSC message: an address plus an ordered argument list.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    address: String,
    args: Vec<Argument>,
}

impl Default for Message {
    fn default() -> Self {
        Self::new()
    }
}

impl Message {
    /// Create an empty message addressed to `/`.
    #[must_use]
    pub fn new() -> Self {
        Self { address: String::from("/"), args: Vec::new() }
    }

    /// The message address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Replace the address.
    ///
    /// Storage grows in [`ADDRESS_BLOCK`]-byte steps; on reservation
    /// failure the previous address is kept.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::InteriorNul`] if the address contains a NUL byte
    /// - [`ProtocolError::Allocation`] if storage could not be reserved
    pub fn set_address(&mut self, address: &str) -> Result<()> {
        if address.as_bytes().contains(&0) {
            return Err(ProtocolError::InteriorNul { field: "address" });
        }
        if self.address.capacity() < address.len() + 1 {
            let rounded = ADDRESS_BLOCK * (address.len() / ADDRESS_BLOCK + 1);
            let mut fresh = String::new();
            fresh.try_reserve_exact(rounded)?;
            self.address = fresh;
        }
        self.address.clear();
        self.address.push_str(address);
        Ok(())
    }

    /// Append a signed 32-bit integer argument.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::Allocation`]; the message is unchanged on failure.
    pub fn add_int32(&mut self, value: i32) -> Result<()> {
        self.push_arg(Argument::Int32(value))
    }

    /// Append a 32-bit float argument.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::Allocation`]; the message is unchanged on failure.
    pub fn add_float(&mut self, value: f32) -> Result<()> {
        self.push_arg(Argument::Float32(value))
    }

    /// Append a string argument, copying the caller's bytes.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::InteriorNul`] if the bytes contain a NUL
    /// - [`ProtocolError::Allocation`]; the message is unchanged on failure
    pub fn add_string(&mut self, value: impl AsRef<[u8]>) -> Result<()> {
        let bytes = value.as_ref();
        if bytes.contains(&0) {
            return Err(ProtocolError::InteriorNul { field: "string argument" });
        }
        self.push_arg(Argument::String(copy_bytes(bytes)?))
    }

    /// Append a blob argument, copying the caller's bytes.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::Allocation`]; the message is unchanged on failure.
    pub fn add_blob(&mut self, value: impl AsRef<[u8]>) -> Result<()> {
        self.push_arg(Argument::Blob(copy_bytes(value.as_ref())?))
    }

    fn push_arg(&mut self, arg: Argument) -> Result<()> {
        self.args.try_reserve(1)?;
        self.args.push(arg);
        Ok(())
    }

    /// Number of arguments.
    #[must_use]
    pub fn argument_count(&self) -> usize {
        self.args.len()
    }

    /// All arguments in order.
    #[must_use]
    pub fn arguments(&self) -> &[Argument] {
        &self.args
    }

    /// The argument at `position`, if any.
    #[must_use]
    pub fn argument(&self, position: usize) -> Option<&Argument> {
        self.args.get(position)
    }

    /// The type tag byte at `position`, or NUL when out of range.
    #[must_use]
    pub fn argument_type(&self, position: usize) -> u8 {
        self.args.get(position).map_or(0, Argument::tag)
    }

    /// The type tag string (no leading `,`; that is a wire artifact).
    #[must_use]
    pub fn type_tags(&self) -> String {
        self.args.iter().map(|arg| arg.tag() as char).collect()
    }

    /// The integer at `position`, or `0` when absent or not an integer.
    #[must_use]
    pub fn int32(&self, position: usize) -> i32 {
        match self.args.get(position) {
            Some(Argument::Int32(value)) => *value,
            _ => 0,
        }
    }

    /// The float at `position`, or `0.0` when absent or not a float.
    #[must_use]
    pub fn float(&self, position: usize) -> f32 {
        match self.args.get(position) {
            Some(Argument::Float32(value)) => *value,
            _ => 0.0,
        }
    }

    /// The string bytes at `position`, or empty when absent or not a
    /// string.
    #[must_use]
    pub fn string(&self, position: usize) -> &[u8] {
        match self.args.get(position) {
            Some(Argument::String(bytes)) => bytes,
            _ => &[],
        }
    }

    /// The blob bytes at `position`, or empty when absent or not a blob.
    #[must_use]
    pub fn blob(&self, position: usize) -> &[u8] {
        match self.args.get(position) {
            Some(Argument::Blob(bytes)) => bytes,
            _ => &[],
        }
    }

    /// Bytes this message occupies on the wire.
    ///
    /// Always a multiple of 4: the padded address, the padded type tag
    /// string, and each argument's padded contribution.
    #[must_use]
    pub fn padded_len(&self) -> usize {
        pad4(self.address.len() + 1)
            + pad4(self.args.len() + 2)
            + self.args.iter().map(Argument::wire_len).sum::<usize>()
    }

    /// Encode the message into `dst`.
    ///
    /// Writes exactly [`Message::padded_len`] bytes; padding bytes are
    /// explicit NULs.
    pub fn encode(&self, dst: &mut impl BufMut) {
        put_padded(dst, self.address.as_bytes(), pad4(self.address.len() + 1));

        dst.put_u8(b',');
        for arg in &self.args {
            dst.put_u8(arg.tag());
        }
        dst.put_bytes(0, pad4(self.args.len() + 2) - (self.args.len() + 1));

        for arg in &self.args {
            match arg {
                Argument::Int32(value) => dst.put_i32(*value),
                Argument::Float32(value) => dst.put_u32(value.to_bits()),
                Argument::String(bytes) => put_padded(dst, bytes, pad4(bytes.len() + 1)),
                Argument::Blob(bytes) => {
                    dst.put_u32(bytes.len() as u32);
                    // Blob payload follows its length prefix on the same
                    // padded-bytes path a string takes.
                    put_padded(dst, bytes, pad4(bytes.len()));
                }
            }
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

    /// Decode a message from one packet's bytes.
    ///
    /// The whole slice must be consumed; trailing bytes are a format
    /// error.
    ///
    /// # Errors
    ///
    /// Any [`ProtocolError`] format variant for malformed input, or
    /// [`ProtocolError::Allocation`] while building the message. No
    /// partial message is ever returned.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut reader = WireReader::new(bytes);

        let address = reader.read_padded_str("address")?;
        if !address.starts_with(b"/") {
            return Err(ProtocolError::AddressStart);
        }
        let address = std::str::from_utf8(address)
            .map_err(|_| ProtocolError::InvalidUtf8 { field: "address" })?;

        let mut message = Self::new();
        message.set_address(address)?;

        let tags = reader.read_padded_str("type tag string")?;
        let Some((&b',', tags)) = tags.split_first() else {
            return Err(ProtocolError::MissingTypeTagComma);
        };

        for &tag in tags {
            match tag {
                b'i' => message.add_int32(reader.read_i32()?)?,
                b'f' => message.add_float(reader.read_f32()?)?,
                b's' => {
                    let value = reader.read_padded_str("string argument")?;
                    message.add_string(value)?;
                }
                b'b' => {
                    let size = reader.read_u32()? as usize;
                    let value = reader.read_bytes(size)?;
                    reader.skip_padding(pad4(size) - size)?;
                    message.add_blob(value)?;
                }
                other => return Err(ProtocolError::UnsupportedTypeTag { tag: other as char }),
            }
        }

        reader.finish("message")?;
        Ok(message)
    }
}

/// Shared padded-write path for the address, string arguments, and blob
/// payloads: the bytes, then NUL fill up to `padded`.
fn put_padded(dst: &mut impl BufMut, bytes: &[u8], padded: usize) {
    dst.put_slice(bytes);
    dst.put_bytes(0, padded - bytes.len());
}

/// Fallibly copy caller bytes into owned storage.
fn copy_bytes(bytes: &[u8]) -> Result<Bytes> {
    let mut copy = Vec::new();
    copy.try_reserve_exact(bytes.len())?;
    copy.extend_from_slice(bytes);
    Ok(Bytes::from(copy))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_message_is_empty_root() {
        let message = Message::new();
        assert_eq!(message.address(), "/");
        assert_eq!(message.argument_count(), 0);
        assert_eq!(message.type_tags(), "");
    }

    #[test]
    fn root_address_round_trips() {
        let message = Message::new();
        let wire = message.to_bytes().unwrap();
        assert_eq!(&wire[..], b"/\0\0\0,\0\0\0");
        assert_eq!(Message::decode(&wire).unwrap(), message);
    }

    #[test]
    fn tags_track_arguments() {
        let mut message = Message::new();
        message.set_address("/mix/volume").unwrap();
        message.add_int32(-3).unwrap();
        message.add_float(0.5).unwrap();
        message.add_string("main").unwrap();
        message.add_blob([1u8, 2, 3]).unwrap();

        assert_eq!(message.type_tags(), "ifsb");
        assert_eq!(message.argument_count(), 4);
        assert_eq!(message.argument_type(0), b'i');
        assert_eq!(message.argument_type(3), b'b');
        assert_eq!(message.argument_type(4), 0);
        assert_eq!(message.int32(0), -3);
        assert_eq!(message.float(1), 0.5);
        assert_eq!(message.string(2), b"main");
        assert_eq!(message.blob(3), &[1, 2, 3]);
    }

    #[test]
    fn out_of_range_reads_are_benign() {
        let message = Message::new();
        assert_eq!(message.int32(7), 0);
        assert_eq!(message.float(7), 0.0);
        assert_eq!(message.string(7), b"");
        assert_eq!(message.blob(7), b"");
        assert!(message.argument(7).is_none());
    }

    #[test]
    fn type_mismatched_reads_are_benign() {
        let mut message = Message::new();
        message.add_string("text").unwrap();
        assert_eq!(message.int32(0), 0);
        assert_eq!(message.blob(0), b"");
    }

    #[test]
    fn interior_nul_is_rejected() {
        let mut message = Message::new();
        assert_eq!(
            message.set_address("/a\0b"),
            Err(ProtocolError::InteriorNul { field: "address" })
        );
        assert_eq!(message.address(), "/");
        assert_eq!(
            message.add_string(b"a\0b".as_slice()),
            Err(ProtocolError::InteriorNul { field: "string argument" })
        );
        assert_eq!(message.argument_count(), 0);
    }

    #[test]
    fn padded_len_counts_every_field() {
        let mut message = Message::new();
        message.set_address("/test").unwrap();
        message.add_int32(7).unwrap();
        message.add_float(1.0).unwrap();
        message.add_string("abc").unwrap();
        // 8 (address) + 8 (",ifs" padded) + 4 + 4 + 4
        assert_eq!(message.padded_len(), 28);
    }

    #[test]
    fn zero_argument_message_has_padded_comma() {
        let mut message = Message::new();
        message.set_address("/ping").unwrap();
        assert_eq!(message.padded_len(), 8 + 4);

        let wire = message.to_bytes().unwrap();
        assert_eq!(&wire[..], b"/ping\0\0\0,\0\0\0");
    }

    #[test]
    fn blob_padding_is_explicit() {
        for size in [0usize, 1, 3, 4, 5] {
            let payload = vec![0xAB; size];
            let mut message = Message::new();
            message.set_address("/b").unwrap();
            message.add_blob(&payload).unwrap();

            let wire = message.to_bytes().unwrap();
            assert_eq!(wire.len(), message.padded_len());
            assert_eq!(wire.len() % 4, 0);

            let decoded = Message::decode(&wire).unwrap();
            assert_eq!(decoded.blob(0), payload.as_slice());
        }
    }

    #[test]
    fn decode_rejects_unknown_type_tag() {
        let mut message = Message::new();
        message.set_address("/t").unwrap();
        let mut wire = message.to_bytes().unwrap().to_vec();
        // Patch the tag string ",\0\0\0" into ",T\0\0".
        wire[5] = b'T';
        assert_eq!(
            Message::decode(&wire),
            Err(ProtocolError::UnsupportedTypeTag { tag: 'T' })
        );
    }

    #[test]
    fn decode_rejects_missing_comma() {
        assert_eq!(
            Message::decode(b"/a\0\0ifs\0"),
            Err(ProtocolError::MissingTypeTagComma)
        );
    }

    #[test]
    fn decode_rejects_bad_address_start() {
        assert_eq!(Message::decode(b"a\0\0\0,\0\0\0"), Err(ProtocolError::AddressStart));
        // An encoded empty address decodes as an empty NUL-terminated
        // string, which also fails the leading-slash requirement.
        assert_eq!(Message::decode(b"\0\0\0\0,\0\0\0"), Err(ProtocolError::AddressStart));
    }

    #[test]
    fn decode_rejects_trailing_bytes() {
        let mut message = Message::new();
        message.set_address("/t").unwrap();
        let mut wire = message.to_bytes().unwrap().to_vec();
        wire.extend_from_slice(&[0, 0, 0, 0]);
        assert_eq!(
            Message::decode(&wire),
            Err(ProtocolError::TrailingBytes { context: "message", remaining: 4 })
        );
    }

    #[test]
    fn decode_rejects_truncated_argument() {
        let mut message = Message::new();
        message.set_address("/t").unwrap();
        message.add_int32(42).unwrap();
        let wire = message.to_bytes().unwrap();
        assert!(matches!(
            Message::decode(&wire[..wire.len() - 2]),
            Err(ProtocolError::Truncated { .. })
        ));
    }

    #[test]
    fn set_address_grows_in_blocks() {
        let mut message = Message::new();
        message.set_address("/a/very/much/longer/address").unwrap();
        assert_eq!(message.address(), "/a/very/much/longer/address");
        message.set_address("/s").unwrap();
        assert_eq!(message.address(), "/s");
    }

    #[test]
    fn clone_is_independent() {
        let mut original = Message::new();
        original.set_address("/x").unwrap();
        original.add_int32(1).unwrap();

        let mut copy = original.clone();
        copy.set_address("/y").unwrap();
        copy.add_int32(2).unwrap();

        assert_eq!(original.address(), "/x");
        assert_eq!(original.argument_count(), 1);
        assert_eq!(copy.address(), "/y");
        assert_eq!(copy.argument_count(), 2);
    }
}
