// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use super::{ConfigNotice, MAX_CAPACITY};
use crate::prime::next_prime;

/// Factor used when an invalid factor is given
pub const DEFAULT_GROWTH_FACTOR: f64 = 2.0;

/// Increment used when an invalid increment is given
pub const DEFAULT_GROWTH_INCREMENT: usize = 10;

/// Growth policy applied to the capacity on resize
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GrowthPolicy {
    /// Multiply the capacity (must be > 1)
    Factor(f64),

    /// Add a number of slots (must be > 0)
    Increment(usize),
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::Factor(DEFAULT_GROWTH_FACTOR)
    }
}

impl GrowthPolicy {
    /// Replaces invalid values with defaults.
    pub(crate) fn normalize(self) -> (Self, Option<ConfigNotice>) {
        match self {
            Self::Factor(factor) if !(factor.is_finite() && factor > 1.0) => (
                Self::Factor(DEFAULT_GROWTH_FACTOR),
                Some(ConfigNotice::GrowthFactor {
                    given: factor,
                    used: DEFAULT_GROWTH_FACTOR,
                }),
            ),
            Self::Increment(0) => (
                Self::Increment(DEFAULT_GROWTH_INCREMENT),
                Some(ConfigNotice::GrowthIncrement {
                    given: 0,
                    used: DEFAULT_GROWTH_INCREMENT,
                }),
            ),
            policy => (policy, None),
        }
    }

    /// Returns the capacity after applying the policy, before prime rounding.
    ///
    /// Saturates at `usize::MAX`.
    #[must_use]
    pub fn grow(&self, capacity: usize) -> usize {
        match *self {
            Self::Factor(factor) => {
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss,
                    reason = "float to int casts saturate"
                )]
                let grown = (capacity as f64 * factor).ceil() as usize;
                grown
            }
            Self::Increment(n) => capacity.saturating_add(n),
        }
    }

    /// Returns the next table capacity: the smallest prime that is
    /// greater or equal to [`GrowthPolicy::grow`], and greater than `capacity`.
    ///
    /// Returns `None` if that would exceed [`MAX_CAPACITY`].
    #[must_use]
    pub fn next_capacity(&self, capacity: usize) -> Option<usize> {
        let target = self.grow(capacity).max(capacity.saturating_add(1));

        if target > MAX_CAPACITY {
            return None;
        }

        next_prime(target).filter(|&capacity| capacity <= MAX_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn growth_increment_example() {
        let policy = GrowthPolicy::Increment(5);
        assert_eq!(12, policy.grow(7));
        assert_eq!(Some(13), policy.next_capacity(7));
    }

    #[test]
    fn growth_factor() {
        let policy = GrowthPolicy::Factor(2.0);
        assert_eq!(202, policy.grow(101));
        assert_eq!(Some(211), policy.next_capacity(101));

        // 7 * 1.2 = 8.4 -> 9 -> 11
        assert_eq!(Some(11), GrowthPolicy::Factor(1.2).next_capacity(7));
    }

    #[test]
    fn growth_always_increases() {
        // 3 * 1.01 = 3.03 -> 4 -> 5
        assert_eq!(Some(5), GrowthPolicy::Factor(1.01).next_capacity(3));
        assert_eq!(Some(5), GrowthPolicy::Increment(1).next_capacity(3));
    }

    #[test]
    fn growth_huge_values_refused() {
        assert_eq!(usize::MAX, GrowthPolicy::Factor(1e30).grow(3));
        assert_eq!(None, GrowthPolicy::Factor(1e30).next_capacity(3));

        assert_eq!(usize::MAX, GrowthPolicy::Increment(usize::MAX).grow(3));
        assert_eq!(None, GrowthPolicy::Increment(usize::MAX).next_capacity(3));

        assert_eq!(None, GrowthPolicy::Increment(1).next_capacity(MAX_CAPACITY));
        assert_eq!(
            Some(MAX_CAPACITY),
            GrowthPolicy::Increment(1).next_capacity(MAX_CAPACITY - 1)
        );
    }

    #[test]
    fn growth_normalize() {
        assert_eq!(
            (GrowthPolicy::Factor(1.5), None),
            GrowthPolicy::Factor(1.5).normalize()
        );

        let (policy, notice) = GrowthPolicy::Factor(0.5).normalize();
        assert_eq!(GrowthPolicy::Factor(2.0), policy);
        assert!(notice.is_some());

        let (policy, notice) = GrowthPolicy::Factor(f64::NAN).normalize();
        assert_eq!(GrowthPolicy::Factor(2.0), policy);
        assert!(notice.is_some());

        let (policy, notice) = GrowthPolicy::Increment(0).normalize();
        assert_eq!(GrowthPolicy::Increment(10), policy);
        assert!(notice.is_some());
    }
}
