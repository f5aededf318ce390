// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Polynomial hash functions over string keys
//!
//! Only the first [`MAX_KEY_CHARS`] characters of a key take part in hashing,
//! so hashing costs O(1) regardless of key length. Keys sharing that prefix
//! always collide.

/// Number of leading characters that are hashed
pub const MAX_KEY_CHARS: usize = 13;

/// Multiplier of the primary (Horner) hash
pub const POLYNOMIAL_CONSTANT: i32 = 33;

/// Multiplier of the secondary (step) hash
pub const SECONDARY_POLYNOMIAL_CONSTANT: u64 = 31;

/// Copies the hashed prefix of a key into a fixed buffer.
fn prefix(key: &str) -> ([u32; MAX_KEY_CHARS], usize) {
    let mut buf = [0; MAX_KEY_CHARS];
    let mut len = 0;

    for (slot, c) in buf.iter_mut().zip(key.chars()) {
        *slot = u32::from(c);
        len += 1;
    }

    (buf, len)
}

/// Computes the primary hash code of a key.
///
/// Uses Horner's rule with multiplier 33, starting at the last character of
/// the (truncated) key and working back to the first:
///
/// ```text
/// h = c[len - 1]
/// h = h * 33 + c[i]    for i = len - 2 down to 0
/// ```
///
/// Arithmetic wraps like a 32-bit signed integer, so the result may be
/// negative. It is not yet a slot index, see [`crate::compression`].
///
/// The empty key hashes to 0.
#[must_use]
pub fn hash_code(key: &str) -> i32 {
    let (buf, len) = prefix(key);

    // NOTE: Starting from 0 makes the first step yield the last character
    #[allow(clippy::cast_possible_wrap, reason = "chars are at most 0x10FFFF")]
    let hash = buf.iter().take(len).rev().fold(0_i32, |acc, &c| {
        acc.wrapping_mul(POLYNOMIAL_CONSTANT)
            .wrapping_add(c as i32)
    });

    hash
}

/// Computes the double hashing step of a key for a table of `capacity` slots.
///
/// This is a second polynomial hash (multiplier 31, first character to last)
/// reduced into `[1, capacity - 1]`. For a prime capacity every such step is
/// coprime with the capacity, so the probe sequence visits every slot.
///
/// # Panics
///
/// Panics if `capacity` is less than 2.
#[must_use]
pub fn secondary_step(key: &str, capacity: usize) -> usize {
    assert!(capacity >= 2, "capacity too small for double hashing");

    let (buf, len) = prefix(key);

    let hash = buf.iter().take(len).fold(0_u64, |acc, &c| {
        acc.wrapping_mul(SECONDARY_POLYNOMIAL_CONSTANT)
            .wrapping_add(u64::from(c))
    });

    #[expect(
        clippy::cast_possible_truncation,
        reason = "result is below capacity, which is a usize"
    )]
    let step = (hash % (capacity as u64 - 1)) as usize;

    step + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn hash_code_horner_order() {
        let expected = (i32::from(b'c') * 33 + i32::from(b'b')) * 33 + i32::from(b'a');
        assert_eq!(111_142, expected);
        assert_eq!(expected, hash_code("abc"));
    }

    #[test]
    fn hash_code_single_char() {
        assert_eq!(i32::from(b'x'), hash_code("x"));
    }

    #[test]
    fn hash_code_empty() {
        assert_eq!(0, hash_code(""));
    }

    #[test]
    fn hash_code_order_matters() {
        assert_ne!(hash_code("ab"), hash_code("ba"));
    }

    #[test]
    fn hash_code_truncates_long_keys() {
        let a = "abcdefghijklm-first";
        let b = "abcdefghijklm-second";
        assert_eq!(hash_code(a), hash_code(b));
        assert_eq!(hash_code("abcdefghijklm"), hash_code(a));
        assert_ne!(hash_code("abcdefghijkl"), hash_code(a));
    }

    #[test]
    fn hash_code_wraps_to_negative() {
        assert_eq!(628_754_332, hash_code("zzzzzz"));
        assert_eq!(-725_943_402, hash_code("zzzzzzz"));
    }

    #[test]
    fn secondary_step_in_range() {
        for capacity in [2, 3, 7, 13, 101, 1_009] {
            for key in ["", "a", "abc", "hello-world", "some-very-long-key-here"] {
                let step = secondary_step(key, capacity);
                assert!(step >= 1);
                assert!(step < capacity);
            }
        }
    }

    #[test]
    fn secondary_step_independent_of_primary() {
        // "ab" and "ba" differ in both hashes, but not by the same relation
        let a = secondary_step("ab", 101);
        let b = secondary_step("ba", 101);
        assert_ne!(a, b);
    }
}
