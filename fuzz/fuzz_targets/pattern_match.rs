//! Fuzz target for the address-pattern matcher
//!
//! Splits the input at its first NUL into a pattern half and an address
//! half and matches them. The matcher must terminate (bounded
//! backtracking depth) and never panic, whatever the meta-character
//! soup looks like.

#![no_main]

use libfuzzer_sys::fuzz_target;
use oscframe_proto::matches;

fuzz_target!(|data: &[u8]| {
    let Some(split) = data.iter().position(|&b| b == 0) else {
        return;
    };
    let (pattern, address) = (&data[..split], &data[split + 1..]);
    if let (Ok(pattern), Ok(address)) =
        (std::str::from_utf8(pattern), std::str::from_utf8(address))
    {
        let _ = matches(pattern, address);
    }
});
