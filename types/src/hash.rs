//! Hex rendering helpers for hashes and other fixed-size byte strings.

/// Lowercase hex of the whole slice.
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Lowercase hex of the first `prefix_len` bytes followed by an ellipsis.
///
/// Used when a hash is shown to a human; the full value is never needed there.
pub fn short_hex(bytes: &[u8], prefix_len: usize) -> String {
    let end = prefix_len.min(bytes.len());
    if end == bytes.len() {
        return hex::encode(bytes);
    }
    format!("{}\u{2026}", hex::encode(&bytes[..end]))
}
