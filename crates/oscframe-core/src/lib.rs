//! Single-threaded OSC server dispatcher.
//!
//! This crate is the I/O-facing half of the library, built on the codec
//! in `oscframe-proto`. The host supplies a [`Transport`] (whole packets
//! in, whole packets out) and a [`Clock`] (NTP timetags); the [`Server`]
//! matches decoded messages against registered handler patterns and
//! releases them once their timetag has elapsed.
//!
//! Everything runs cooperatively on the caller's thread: handlers fire
//! synchronously inside [`Server::cycle`], and the only points that may
//! block are the host's own transport and clock callbacks.

pub mod clock;
pub mod error;
pub mod server;
pub mod transport;

pub use clock::Clock;
pub use error::{Result, ServerError};
pub use server::{Handler, Server, ServerConfig};
pub use transport::{Transport, send_bundle, send_message};
