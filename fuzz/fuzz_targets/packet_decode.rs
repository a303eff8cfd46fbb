//! Fuzz target for Packet::decode
//!
//! This fuzzer tests packet decoding with arbitrary byte sequences to find:
//! - Parser crashes or panics
//! - Integer overflows in padding and size arithmetic
//! - Buffer over-reads in the NUL-terminated field readers
//! - Malformed nesting that bypasses the bundle timetag check
//!
//! The fuzzer should NEVER panic. All invalid inputs should return an error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use oscframe_proto::Packet;

fuzz_target!(|data: &[u8]| {
    // Attempt to decode arbitrary bytes as a packet
    // This should never panic, only return Err for invalid data
    if let Ok(packet) = Packet::decode(data) {
        // A decoded packet must re-encode to its claimed padded length.
        if let Ok(wire) = packet.to_bytes() {
            assert_eq!(wire.len(), packet.padded_len());
        }
    }
});
