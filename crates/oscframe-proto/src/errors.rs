//! Error types for the OSC wire protocol.
//!
//! Strongly-typed errors for the two failure classes the codec and the
//! builders can hit: memory that could not be reserved, and bytes that do
//! not conform to the OSC 1.0 wire format. Every variant except
//! [`ProtocolError::Allocation`] is a format violation.
//!
//! We avoid `std::io::Error` here on purpose: the codec never performs
//! I/O, it only transforms byte slices.

use std::collections::TryReserveError;

use thiserror::Error;

use crate::Timetag;

/// Convenience alias used throughout the protocol crate.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors produced by the packet codec and the message/bundle builders.
///
/// Builder operations fail only with [`ProtocolError::Allocation`] (or the
/// interior-NUL check); decoding can fail with any format variant. A failed
/// operation never leaves a partially mutated value behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Memory could not be reserved; the caller's state is unchanged.
    #[error("allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    /// The packet ended before a fixed-size field could be read.
    #[error("packet truncated at offset {offset}: needed {needed} bytes, {available} available")]
    Truncated {
        /// Byte offset where the read started
        offset: usize,
        /// Bytes the field required
        needed: usize,
        /// Bytes left in the packet
        available: usize,
    },

    /// A NUL-terminated field ran to the end of the packet without a
    /// terminator.
    #[error("missing NUL terminator in {field} at offset {offset}")]
    UnterminatedString {
        /// Field being read when the terminator was missed
        field: &'static str,
        /// Byte offset where the field started
        offset: usize,
    },

    /// The packet starts with neither a `/` address nor the `#bundle` tag.
    #[error("packet starts with neither '/' nor '#bundle'")]
    UnrecognizedPacket,

    /// A message address did not start with `/`.
    #[error("message address must start with '/'")]
    AddressStart,

    /// A decoded text field was not valid UTF-8.
    #[error("{field} is not valid UTF-8")]
    InvalidUtf8 {
        /// Field that failed validation
        field: &'static str,
    },

    /// The type tag string did not start with the `,` wire marker.
    #[error("type tag string does not start with ','")]
    MissingTypeTagComma,

    /// An argument carried a type tag this implementation does not support.
    #[error("unsupported type tag {tag:?}")]
    UnsupportedTypeTag {
        /// The offending tag byte
        tag: char,
    },

    /// Bytes remained after the last field of a fully parsed structure.
    #[error("{context} has {remaining} trailing bytes after its last field")]
    TrailingBytes {
        /// Structure that finished early
        context: &'static str,
        /// Number of unconsumed bytes
        remaining: usize,
    },

    /// A nested bundle claimed a timetag earlier than its parent's.
    #[error("nested bundle timetag {nested} precedes its parent timetag {parent}")]
    NestedTimetagEarlier {
        /// The nested bundle's timetag
        nested: Timetag,
        /// The enclosing bundle's timetag
        parent: Timetag,
    },

    /// A text field contained an interior NUL byte, which cannot survive a
    /// round trip through the NUL-terminated wire encoding.
    #[error("interior NUL byte in {field}")]
    InteriorNul {
        /// Field the byte was found in
        field: &'static str,
    },
}

impl ProtocolError {
    /// True for wire-format violations, false for allocation failure.
    #[must_use]
    pub fn is_format(&self) -> bool {
        !matches!(self, Self::Allocation(_))
    }
}
