// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use rand::Rng;

/// Prime modulus of the compression function
///
/// Smallest prime above 2^31, so it exceeds the magnitude of every
/// 32-bit hash code.
pub const COMPRESSION_PRIME: u64 = 2_147_483_659;

/// Maps raw hash codes to slot indices
///
/// `compress(h) = ((a * h + b) mod P) mod N`
///
/// The coefficients are redrawn every time the table capacity changes, so
/// collision patterns do not carry over from one table generation to the next.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Compressor {
    a: u64,
    b: u64,
    capacity: usize,
}

impl Compressor {
    /// Creates a compressor with fixed coefficients.
    ///
    /// # Panics
    ///
    /// Panics if the capacity is 0.
    #[must_use]
    pub fn new(a: u64, b: u64, capacity: usize) -> Self {
        assert!(capacity > 0, "capacity may not be 0");
        Self { a, b, capacity }
    }

    /// Draws both coefficients uniformly from `[1, capacity - 2]`.
    ///
    /// # Panics
    ///
    /// Panics if the capacity is less than 3.
    #[must_use]
    pub fn draw<R: Rng>(capacity: usize, rng: &mut R) -> Self {
        assert!(capacity >= 3, "capacity too small to draw coefficients");

        let upper = capacity as u64 - 2;
        let a = rng.random_range(1..=upper);
        let b = rng.random_range(1..=upper);

        Self::new(a, b, capacity)
    }

    /// Returns the coefficients `(a, b)`.
    #[must_use]
    pub fn coefficients(&self) -> (u64, u64) {
        (self.a, self.b)
    }

    /// Returns the table size this compressor maps into.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Compresses a hash code into `[0, capacity)`.
    #[must_use]
    pub fn compress(&self, hash_code: i32) -> usize {
        let p = i128::from(COMPRESSION_PRIME);

        // NOTE: Normalizing first keeps negative hash codes in range,
        // and is congruent to normalizing afterwards
        let hash = i128::from(hash_code).rem_euclid(p);
        let folded = (i128::from(self.a) * hash + i128::from(self.b)).rem_euclid(p);

        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "result is non-negative and below capacity"
        )]
        let slot = (folded % self.capacity as i128) as usize;

        slot
    }
}
