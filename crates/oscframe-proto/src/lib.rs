//! OSC 1.0 wire protocol: models, codec, and address-pattern matching.
//!
//! This crate is the I/O-free half of the library. It owns the message
//! and bundle models, the bit-exact big-endian codec with its 4-byte
//! padding discipline, and the glob-style matcher that pairs handler
//! patterns with message addresses. Everything operates on byte slices
//! and buffers; transports, clocks, and dispatch live in
//! `oscframe-core`.
//!
//! # Fallible allocation
//!
//! The library targets memory-constrained hosts. Every growth site in
//! the builders and codec reserves through `try_reserve` and surfaces
//! exhaustion as [`ProtocolError::Allocation`] with the caller's state
//! unchanged, instead of aborting the process.

pub mod errors;

mod bundle;
mod message;
mod packet;
mod pattern;
mod timetag;
mod wire;

pub use bundle::{Bundle, Element};
pub use errors::{ProtocolError, Result};
pub use message::{Argument, Message};
pub use packet::Packet;
pub use pattern::matches;
pub use timetag::Timetag;
