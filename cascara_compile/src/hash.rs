// Copyright 2026 the Cascara Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic content hashing for class names and the global wrapper.
//!
//! Naming must be reproducible across machines and runs, so everything here
//! is keyed BLAKE3 output with no seed. The standard library's hasher is
//! deliberately not used: its per-process randomization would break
//! cross-build dedup.

use alloc::string::String;

/// Eight lowercase hex characters of a BLAKE3 hash over `parts`.
///
/// Parts are fed through a unit separator so `("ab", "c")` and `("a", "bc")`
/// hash differently.
pub fn short_hash(parts: &[&str]) -> String {
    let mut hasher = blake3::Hasher::new();
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update(&[0x1f]);
    }
    let digest = hasher.finalize();
    let mut out = String::with_capacity(8);
    for byte in &digest.as_bytes()[..4] {
        push_hex(&mut out, *byte);
    }
    out
}

/// Class-name token for one `(selector-context, property, value)` triple.
///
/// The optional `prefix` namespaces independently compiled sources; it is
/// folded into the hash rather than the visible token, so tokens keep a fixed
/// shape (`_` + 8 hex chars).
pub fn class_name(
    prefix: Option<&str>,
    at_context: &str,
    selector_context: &str,
    property: &str,
    value: &str,
    important: bool,
) -> String {
    let mut token = String::with_capacity(9);
    token.push('_');
    token.push_str(&short_hash(&[
        prefix.unwrap_or(""),
        at_context,
        selector_context,
        property,
        value,
        if important { "!" } else { "" },
    ]));
    token
}

fn push_hex(out: &mut String, byte: u8) {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    out.push(HEX[(byte >> 4) as usize] as char);
    out.push(HEX[(byte & 0xf) as usize] as char);
}
