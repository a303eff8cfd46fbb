//! Property-based tests for the OSC packet codec.
//!
//! Round-trip and framing properties over arbitrary messages and nested
//! bundles, plus the golden byte vectors that pin the wire layout down
//! to the exact octet.

use oscframe_proto::{Bundle, Message, Packet, Timetag, matches};
use proptest::prelude::*;

fn arbitrary_address() -> impl Strategy<Value = String> {
    "(/[a-z0-9_]{1,8}){1,4}"
}

#[derive(Debug, Clone)]
enum ArgSpec {
    Int32(i32),
    Float32(f32),
    String(String),
    Blob(Vec<u8>),
}

fn arbitrary_arg() -> impl Strategy<Value = ArgSpec> {
    prop_oneof![
        any::<i32>().prop_map(ArgSpec::Int32),
        (-1.0e6f32..1.0e6f32).prop_map(ArgSpec::Float32),
        "[a-zA-Z0-9 /._-]{0,12}".prop_map(ArgSpec::String),
        prop::collection::vec(any::<u8>(), 0..16).prop_map(ArgSpec::Blob),
    ]
}

fn build_message(address: &str, args: &[ArgSpec]) -> Message {
    let mut message = Message::new();
    message.set_address(address).expect("set address");
    for arg in args {
        match arg {
            ArgSpec::Int32(v) => message.add_int32(*v).expect("add int32"),
            ArgSpec::Float32(v) => message.add_float(*v).expect("add float"),
            ArgSpec::String(v) => message.add_string(v).expect("add string"),
            ArgSpec::Blob(v) => message.add_blob(v).expect("add blob"),
        }
    }
    message
}

fn arbitrary_message() -> impl Strategy<Value = Message> {
    (arbitrary_address(), prop::collection::vec(arbitrary_arg(), 0..6))
        .prop_map(|(address, args)| build_message(&address, &args))
}

/// Depth-bounded bundle whose nested timetags never precede their
/// parents, so every generated tree is decodable.
fn arbitrary_bundle() -> impl Strategy<Value = Bundle> {
    let leaf = (2u64..1_000_000, prop::collection::vec(arbitrary_message(), 0..4)).prop_map(
        |(raw, messages)| {
            let mut bundle = Bundle::new();
            bundle.set_timetag(Timetag::from_raw(raw));
            for message in &messages {
                bundle.add_message(message).expect("add message");
            }
            bundle
        },
    );
    leaf.prop_recursive(3, 12, 3, |inner| {
        (0u64..1_000_000, prop::collection::vec(inner, 0..3)).prop_map(|(bump, children)| {
            let mut bundle = Bundle::new();
            for child in &children {
                bundle.add_bundle(child).expect("add bundle");
            }
            // Tag the parent no later than its earliest child.
            let floor = children.iter().map(|c| c.timetag().raw()).min().unwrap_or(2 + bump);
            bundle.set_timetag(Timetag::from_raw(floor.saturating_sub(bump).max(2)));
            bundle
        })
    })
}

#[test]
fn prop_message_round_trip() {
    proptest!(|(message in arbitrary_message())| {
        let wire = message.to_bytes().expect("should encode");

        // PROPERTY: the encoding is exactly padded_len bytes, a multiple of 4.
        prop_assert_eq!(wire.len(), message.padded_len());
        prop_assert_eq!(wire.len() % 4, 0);

        // PROPERTY: round-trip must be identity.
        let decoded = Message::decode(&wire).expect("should decode");
        prop_assert_eq!(decoded, message);
    });
}

#[test]
fn prop_message_padding_bytes_are_nul() {
    proptest!(|(address in arbitrary_address(), text in "[a-z]{0,9}")| {
        let mut message = Message::new();
        message.set_address(&address).expect("set address");
        message.add_string(&text).expect("add string");
        let wire = message.to_bytes().expect("should encode");

        // PROPERTY: every byte past a field's content up to its padded
        // boundary is NUL.
        let address_span = (address.len() + 1 + 3) & !3;
        for &byte in &wire[address.len()..address_span] {
            prop_assert_eq!(byte, 0);
        }
        let tail = wire.len() - ((text.len() + 1 + 3) & !3) + text.len();
        for &byte in &wire[tail..] {
            prop_assert_eq!(byte, 0);
        }
    });
}

#[test]
fn prop_bundle_round_trip() {
    proptest!(|(bundle in arbitrary_bundle())| {
        let wire = bundle.to_bytes().expect("should encode");

        prop_assert_eq!(wire.len(), bundle.padded_len());
        prop_assert_eq!(wire.len() % 4, 0);

        let decoded = Bundle::decode(&wire).expect("should decode");
        prop_assert_eq!(decoded, bundle);
    });
}

#[test]
fn prop_packet_dispatch_round_trip() {
    proptest!(|(bundle in arbitrary_bundle(), message in arbitrary_message())| {
        for packet in [Packet::from(message.clone()), Packet::from(bundle.clone())] {
            let wire = packet.to_bytes().expect("should encode");
            let decoded = Packet::decode(&wire).expect("should decode");
            prop_assert_eq!(decoded, packet);
        }
    });
}

#[test]
fn prop_literal_pattern_matches_its_own_address() {
    proptest!(|(address in arbitrary_address())| {
        prop_assert!(matches(&address, &address));
        prop_assert!(matches("*", &address));
    });
}

#[test]
fn golden_simple_message_encoding() {
    let mut message = Message::new();
    message.set_address("/test").expect("set address");
    message.add_int32(7).expect("add int32");
    message.add_float(1.0).expect("add float");
    message.add_string("abc").expect("add string");

    let wire = message.to_bytes().expect("should encode");
    assert_eq!(wire.len(), 28);
    assert_eq!(
        hex::encode(&wire),
        "2f746573740000002c69667300000000000000073f80000061626300"
    );
}

#[test]
fn golden_blob_round_trip() {
    let mut message = Message::new();
    message.set_address("/b").expect("set address");
    message.add_blob([0xDE, 0xAD, 0xBE]).expect("add blob");

    let wire = message.to_bytes().expect("should encode");
    // 4 address + 4 tags + 4 size prefix + 4 padded payload
    assert_eq!(wire.len(), 16);
    // Padding byte after the 3-byte payload is NUL.
    assert_eq!(wire[15], 0);

    let decoded = Message::decode(&wire).expect("should decode");
    assert_eq!(decoded.blob(0), &[0xDE, 0xAD, 0xBE]);
}

#[test]
fn golden_bundle_header() {
    let mut bundle = Bundle::new();
    bundle.set_timetag(Timetag::from_parts(0x0102_0304, 0x0506_0708));

    let wire = bundle.to_bytes().expect("should encode");
    assert_eq!(hex::encode(&wire), "2362756e646c65000102030405060708");
}
