// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::CollisionStrategy;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Step {
    Quadratic,
    Double(usize),
}

/// Slot indices visited when resolving a key
///
/// Yields exactly `capacity` indices, starting at the home slot.
///
/// - Quadratic probing: `s_i = (s_0 + i^2) mod N`
/// - Double hashing: `s_i = (s_0 + i * step) mod N`
///
/// Quadratic probing only reaches about half of the slots of a prime-sized
/// table before repeating, double hashing with a step coprime to `N`
/// reaches all of them.
#[derive(Clone, Debug)]
pub struct ProbeSequence {
    start: usize,
    step: Step,
    capacity: usize,

    /// Number of indices yielded so far
    i: usize,

    /// Distance of the next index from `start`, modulo capacity
    offset: usize,
}

impl ProbeSequence {
    /// Creates a quadratic probe sequence.
    ///
    /// # Panics
    ///
    /// Panics if `start` is out of bounds.
    #[must_use]
    pub fn quadratic(start: usize, capacity: usize) -> Self {
        Self::with_step(start, Step::Quadratic, capacity)
    }

    /// Creates a double hashing probe sequence.
    ///
    /// # Panics
    ///
    /// Panics if `start` is out of bounds, or the step is 0.
    #[must_use]
    pub fn double(start: usize, step: usize, capacity: usize) -> Self {
        assert!(step > 0, "double hashing step may not be 0");
        Self::with_step(start, Step::Double(step % capacity), capacity)
    }

    fn with_step(start: usize, step: Step, capacity: usize) -> Self {
        assert!(start < capacity, "home slot out of bounds");

        Self {
            start,
            step,
            capacity,
            i: 0,
            offset: 0,
        }
    }

    /// Returns the collision strategy that generated this sequence.
    #[must_use]
    pub fn strategy(&self) -> CollisionStrategy {
        match self.step {
            Step::Quadratic => CollisionStrategy::Quadratic,
            Step::Double(_) => CollisionStrategy::Double,
        }
    }

    /// Returns the home slot.
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns the double hashing step, if any.
    #[must_use]
    pub fn step(&self) -> Option<usize> {
        match self.step {
            Step::Quadratic => None,
            Step::Double(step) => Some(step),
        }
    }
}

impl Iterator for ProbeSequence {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.i >= self.capacity {
            return None;
        }

        let slot = (self.start + self.offset) % self.capacity;

        // i^2 -> (i + 1)^2 adds 2i + 1
        let delta = match self.step {
            Step::Quadratic => (2 * self.i + 1) % self.capacity,
            Step::Double(step) => step,
        };

        self.offset = (self.offset + delta) % self.capacity;
        self.i += 1;

        Some(slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.capacity - self.i;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ProbeSequence {}

impl std::iter::FusedIterator for ProbeSequence {}
