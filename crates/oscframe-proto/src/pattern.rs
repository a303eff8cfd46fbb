//! OSC address-pattern matching.
//!
//! A handler registers under a *pattern* that may contain the OSC 1.0
//! meta-characters; incoming messages carry a plain *address*. Matching is
//! asymmetric: the pattern is always the first argument.
//!
//! Supported syntax:
//!
//! - `?` matches exactly one byte
//! - `*` matches zero or more bytes, greedily with backtracking; a run of
//!   consecutive `*` collapses to one, and `*` matches across `/`
//!   segment boundaries
//! - `[...]` character class, `[!...]` negated, with inclusive `c-d`
//!   ranges (a reversed range degenerates to its two endpoints)
//! - `{a,b,...}` alternation over literal alternatives
//! - every other byte matches itself
//!
//! An unterminated class or alternation never matches. Recursion depth is
//! capped; patterns that exceed the cap are treated as non-matching.

/// Backtracking depth limit for `*` and `{}` recursion.
const MAX_RECURSION_DEPTH: usize = 64;

/// Match a handler pattern against a message address.
///
/// Deterministic and free of side effects; the same inputs always produce
/// the same answer.
#[must_use]
pub fn matches(pattern: &str, address: &str) -> bool {
    match_inner(pattern.as_bytes(), address.as_bytes(), 0)
}

fn match_inner(mut pattern: &[u8], mut address: &[u8], depth: usize) -> bool {
    if depth > MAX_RECURSION_DEPTH {
        return false;
    }

    while let Some((&pc, pattern_rest)) = pattern.split_first() {
        if address.is_empty() && pc != b'*' {
            return false;
        }

        match pc {
            b'*' => {
                // A run of stars is equivalent to a single one.
                let mut rest = pattern_rest;
                while let Some((&b'*', r)) = rest.split_first() {
                    rest = r;
                }
                let Some(&next) = rest.first() else {
                    return true;
                };
                // Fast-skip to the next possible anchor before trying the
                // pattern remainder at each suffix.
                if next != b'?' && next != b'[' && next != b'{' {
                    while let Some((&ac, address_rest)) = address.split_first() {
                        if ac == next {
                            break;
                        }
                        address = address_rest;
                    }
                }
                while !address.is_empty() {
                    if match_inner(rest, address, depth + 1) {
                        return true;
                    }
                    address = &address[1..];
                }
                return false;
            }

            b'?' => {
                address = &address[1..];
                pattern = pattern_rest;
            }

            b'[' => match match_class(pattern_rest, address[0]) {
                Some(rest) => {
                    address = &address[1..];
                    pattern = rest;
                }
                None => return false,
            },

            b'{' => {
                let Some(close) = pattern_rest.iter().position(|&b| b == b'}') else {
                    return false;
                };
                let remainder = &pattern_rest[close + 1..];
                for alternative in pattern_rest[..close].split(|&b| b == b',') {
                    if address.starts_with(alternative)
                        && match_inner(remainder, &address[alternative.len()..], depth + 1)
                    {
                        return true;
                    }
                }
                return false;
            }

            literal => {
                if address[0] != literal {
                    return false;
                }
                address = &address[1..];
                pattern = pattern_rest;
            }
        }
    }

    address.is_empty()
}

/// Match one address byte against a `[...]` class.
///
/// `class` starts just past the `[`. Returns the pattern remainder past
/// the closing `]` when the byte is accepted, `None` when it is rejected
/// or the class is malformed.
fn match_class(class: &[u8], byte: u8) -> Option<&[u8]> {
    let (negate, class) = match class.split_first() {
        Some((&b'!', rest)) => (true, rest),
        _ => (false, class),
    };

    let mut matched = false;
    let mut i = 0;
    while !matched {
        let low = *class.get(i)?;
        i += 1;
        let peek = *class.get(i)?;
        if peek == b'-' {
            i += 1;
            let high = *class.get(i)?;
            if high == b']' {
                // Open-ended range "c-]" accepts everything from c up.
                if byte >= low {
                    matched = true;
                }
                break;
            }
            // Inclusive range; a reversed range keeps only its endpoints.
            if byte == low || byte == high || (byte > low && byte < high) {
                matched = true;
            }
        } else {
            if byte == low {
                matched = true;
            }
            if peek == b']' {
                break;
            }
            if byte == peek {
                matched = true;
            }
        }
    }

    if negate == matched {
        return None;
    }
    while *class.get(i)? != b']' {
        i += 1;
    }
    Some(&class[i + 1..])
}
