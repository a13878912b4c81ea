//! 32-bit name hashing as the engine does it.

/// Jenkins one-at-a-time over the lowercased UTF-8 bytes of `name`.
pub fn joaat(name: &str) -> u32 {
    let mut hash: u32 = 0;
    for byte in name.bytes() {
        hash = hash.wrapping_add(byte.to_ascii_lowercase() as u32);
        hash = hash.wrapping_add(hash << 10);
        hash ^= hash >> 6;
    }
    hash = hash.wrapping_add(hash << 3);
    hash ^= hash >> 11;
    hash.wrapping_add(hash << 15)
}

/// Parses a hash field: `hash_AABBCCDD` literal, empty string for zero,
/// anything else is hashed as a name.
pub fn parse_hash_text(text: &str) -> u32 {
    let text = text.trim();
    if text.is_empty() {
        return 0;
    }
    if let Some(hex) = text.strip_prefix("hash_") {
        if let Ok(value) = u32::from_str_radix(hex, 16) {
            return value;
        }
    }
    joaat(text)
}

/// Inverse of [`parse_hash_text`] for hashes with no known name. A zero
/// hash encodes as the empty string.
pub fn format_hash(hash: u32) -> String {
    if hash == 0 {
        String::new()
    } else {
        format!("hash_{:08X}", hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joaat_is_case_insensitive() {
        assert_eq!(joaat("Prop_Bench_01"), joaat("prop_bench_01"));
    }

    #[test]
    fn joaat_known_value() {
        // reference value for the engine's hash of "a"
        assert_eq!(joaat("a"), 0xCA2E9442);
    }

    #[test]
    fn hash_text_round_trip() {
        assert_eq!(parse_hash_text(""), 0);
        assert_eq!(format_hash(0), "");
        let h = joaat("ladder_metal");
        assert_eq!(parse_hash_text(&format_hash(h)), h);
        assert_eq!(parse_hash_text("ladder_metal"), h);
    }
}
