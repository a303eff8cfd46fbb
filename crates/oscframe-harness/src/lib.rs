//! Deterministic test doubles for oscframe.
//!
//! A server under test needs a transport and a clock; this crate
//! provides scripted, fully deterministic implementations of both, plus
//! a [`Recorder`] for asserting handler invocation order. The
//! integration suite under `tests/` drives complete
//! decode-queue-dispatch scenarios through them.

pub mod manual_clock;
pub mod recorder;
pub mod scripted_transport;

pub use manual_clock::ManualClock;
pub use recorder::Recorder;
pub use scripted_transport::ScriptedTransport;
