// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

/// Returns `true` if `n` is prime.
#[must_use]
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }

    let mut i = 5;

    while i <= n / i {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }

    true
}

/// Returns the smallest prime that is greater or equal to `n`.
///
/// Returns `None` if `n` is above the largest prime that fits into `usize`.
#[must_use]
pub fn next_prime(n: usize) -> Option<usize> {
    let mut candidate = n.max(2);

    while !is_prime(candidate) {
        candidate = candidate.checked_add(1)?;
    }

    Some(candidate)
}
