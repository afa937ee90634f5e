// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Compact identifier codec.
//!
//! The host embeds asset identifiers in a 23-character form: the first five
//! hex digits verbatim, then the remaining 27 hex digits re-encoded three at a
//! time (12 bits) as two symbols of a 64-symbol alphabet.

use uuid::Uuid;

/// Symbol alphabet for compacted identifiers (index = 6-bit value).
pub const COMPACT_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Length of a compacted identifier.
pub const COMPACT_LEN: usize = 23;

const HEX_LEN: usize = 32;
const PREFIX_LEN: usize = 5;

/// Strip hyphens and lowercase; `None` unless the result is 32 hex digits.
fn clean_hex(id: &str) -> Option<String> {
    let cleaned: String = id
        .chars()
        .filter(|c| *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if cleaned.len() == HEX_LEN && cleaned.bytes().all(|b| b.is_ascii_hexdigit()) {
        Some(cleaned)
    } else {
        None
    }
}

fn hex_value(b: u8) -> u16 {
    match b {
        b'0'..=b'9' => u16::from(b - b'0'),
        b'a'..=b'f' => u16::from(b - b'a' + 10),
        b'A'..=b'F' => u16::from(b - b'A' + 10),
        _ => 0,
    }
}

fn symbol_value(b: u8) -> Option<u16> {
    COMPACT_ALPHABET
        .iter()
        .position(|s| *s == b)
        .and_then(|p| u16::try_from(p).ok())
}

/// Compact a 128-bit identifier into its 23-character host form.
///
/// Hyphens are ignored and input is case-insensitive. Input that is not 32
/// hex digits after cleaning is returned unchanged.
pub fn compact(id: &str) -> String {
    let Some(hex) = clean_hex(id) else {
        return id.to_string();
    };
    let bytes = hex.as_bytes();
    let mut out = String::with_capacity(COMPACT_LEN);
    out.push_str(&hex[..PREFIX_LEN]);

    for group in bytes[PREFIX_LEN..].chunks(3) {
        let mut value: u16 = 0;
        for i in 0..3 {
            let digit = group.get(i).copied().unwrap_or(b'0');
            value = (value << 4) | hex_value(digit);
        }
        out.push(char::from(COMPACT_ALPHABET[usize::from(value >> 6)]));
        out.push(char::from(COMPACT_ALPHABET[usize::from(value & 0x3f)]));
    }
    out
}

/// Expand a compacted identifier back to canonical hyphenated lowercase form.
///
/// Returns `None` when `compact_id` is not a 23-character compacted identifier.
pub fn expand(compact_id: &str) -> Option<String> {
    let bytes = compact_id.as_bytes();
    if bytes.len() != COMPACT_LEN || !bytes[..PREFIX_LEN].iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    let mut hex = String::with_capacity(HEX_LEN);
    hex.push_str(&compact_id[..PREFIX_LEN].to_ascii_lowercase());

    for pair in bytes[PREFIX_LEN..].chunks(2) {
        let hi = symbol_value(pair[0])?;
        let lo = symbol_value(*pair.get(1)?)?;
        let value = (hi << 6) | lo;
        for shift in [8u16, 4, 0] {
            let nibble = (value >> shift) & 0xf;
            hex.push(char::from_digit(u32::from(nibble), 16)?);
        }
    }
    hyphenate(&hex)
}

/// Canonical hyphenated lowercase form (8-4-4-4-12) of a 32-hex-digit identifier.
pub fn canonical(id: &str) -> Option<String> {
    clean_hex(id).and_then(|hex| hyphenate(&hex))
}

/// True when `s` decodes as a compacted identifier.
pub fn is_compact(s: &str) -> bool {
    expand(s).is_some()
}

fn hyphenate(hex: &str) -> Option<String> {
    if hex.len() != HEX_LEN {
        return None;
    }
    Uuid::parse_str(hex)
        .ok()
        .map(|id| id.hyphenated().to_string())
}
