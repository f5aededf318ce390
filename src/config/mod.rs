// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

mod collision;
mod growth;
mod marker;
mod notice;

pub use collision::CollisionStrategy;
pub use growth::{GrowthPolicy, DEFAULT_GROWTH_FACTOR, DEFAULT_GROWTH_INCREMENT};
pub use marker::EmptyMarkerScheme;
pub use notice::ConfigNotice;

use crate::{prime::next_prime, HashTable, MAX_REPAIR_SHIFTS};

/// Capacity of a table created with the default configuration
pub const DEFAULT_CAPACITY: usize = 101;

/// Smallest capacity a table can have
///
/// Compression coefficients are drawn from `[1, N - 2]`, which needs `N >= 3`.
pub const MIN_CAPACITY: usize = 3;

/// Largest capacity a table can have
///
/// This is `i32::MAX`, a prime. Home slots are compressed hash codes, which
/// stay below the compression prime anyway.
pub const MAX_CAPACITY: usize = 2_147_483_647;

/// Rehash threshold of the default configuration
pub const DEFAULT_REHASH_THRESHOLD: f64 = 0.5;

/// Table configuration builder
///
/// Out-of-range settings are accepted and normalized in [`Config::validate`].
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Load factor that triggers growth
    pub rehash_threshold: f64,

    /// How the capacity grows on resize
    pub growth_policy: GrowthPolicy,

    /// Collision strategy code, `'Q'` or `'D'`
    pub collision_code: char,

    /// Empty marker scheme code, `'A'`, `'N'` or `'R'`
    pub marker_code: char,

    /// Capacity of the initial backing array
    pub initial_capacity: usize,

    /// Capacity the table may not grow beyond
    pub max_capacity: Option<usize>,

    /// Number of records a single delete may move backward
    /// under [`EmptyMarkerScheme::ReplaceWithTombstone`]
    pub max_repair_shifts: usize,

    /// Seed of the coefficient RNG, random if not set
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rehash_threshold: DEFAULT_REHASH_THRESHOLD,
            growth_policy: GrowthPolicy::default(),
            collision_code: CollisionStrategy::default().into(),
            marker_code: EmptyMarkerScheme::default().into(),
            initial_capacity: DEFAULT_CAPACITY,
            max_capacity: None,
            max_repair_shifts: MAX_REPAIR_SHIFTS,
            seed: None,
        }
    }
}

impl Config {
    /// Initializes a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the load factor threshold, which should be in `[0, 1]`.
    ///
    /// Once `len / capacity` exceeds the threshold, the table grows.
    ///
    /// Defaults to 0.5.
    #[must_use]
    pub fn rehash_threshold(mut self, threshold: f64) -> Self {
        self.rehash_threshold = threshold;
        self
    }

    /// Sets the growth policy.
    #[must_use]
    pub fn growth_policy(mut self, policy: GrowthPolicy) -> Self {
        self.growth_policy = policy;
        self
    }

    /// Grows the table by multiplying its capacity with `factor`, which should be > 1.
    ///
    /// Defaults to a factor of 2.
    #[must_use]
    pub fn growth_factor(self, factor: f64) -> Self {
        self.growth_policy(GrowthPolicy::Factor(factor))
    }

    /// Grows the table by adding `n` slots, which should be > 0.
    #[must_use]
    pub fn growth_increment(self, n: usize) -> Self {
        self.growth_policy(GrowthPolicy::Increment(n))
    }

    /// Sets the collision strategy.
    ///
    /// Defaults to double hashing.
    #[must_use]
    pub fn collision_strategy(mut self, strategy: CollisionStrategy) -> Self {
        self.collision_code = strategy.into();
        self
    }

    /// Sets the collision strategy by its code (`'Q'` or `'D'`).
    ///
    /// Unknown codes fall back to double hashing.
    #[must_use]
    pub fn collision_code(mut self, code: char) -> Self {
        self.collision_code = code;
        self
    }

    /// Sets the empty marker scheme.
    ///
    /// Defaults to [`EmptyMarkerScheme::NegativeMarker`].
    #[must_use]
    pub fn empty_marker_scheme(mut self, scheme: EmptyMarkerScheme) -> Self {
        self.marker_code = scheme.into();
        self
    }

    /// Sets the empty marker scheme by its code (`'A'`, `'N'` or `'R'`).
    ///
    /// Unknown codes fall back to the negative marker scheme.
    #[must_use]
    pub fn empty_marker_code(mut self, code: char) -> Self {
        self.marker_code = code;
        self
    }

    /// Sets the initial capacity.
    ///
    /// Is rounded up to the next prime, to at least 3,
    /// and at most [`MAX_CAPACITY`].
    ///
    /// Defaults to 101.
    #[must_use]
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Sets a capacity the table may never grow beyond.
    ///
    /// Once reached, inserts that find no slot fail with [`crate::Error::TableFull`].
    ///
    /// Tables never grow beyond [`MAX_CAPACITY`], with or without this setting.
    #[must_use]
    pub fn max_capacity(mut self, capacity: usize) -> Self {
        self.max_capacity = Some(capacity);
        self
    }

    /// Sets how many records a single delete may move backward to close
    /// its gap, before leaving a tombstone instead.
    ///
    /// Only used by [`EmptyMarkerScheme::ReplaceWithTombstone`].
    ///
    /// Defaults to [`MAX_REPAIR_SHIFTS`].
    #[must_use]
    pub fn max_repair_shifts(mut self, shifts: usize) -> Self {
        self.max_repair_shifts = shifts;
        self
    }

    /// Seeds the RNG that draws the compression coefficients.
    ///
    /// Tables built from the same seed and fed the same operations
    /// have identical slot layouts.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Normalizes the configuration, returning the settings in use and
    /// a notice for every value that had to be replaced.
    #[must_use]
    pub fn validate(&self) -> (ValidatedConfig, Vec<ConfigNotice>) {
        let mut notices = vec![];

        let (rehash_threshold, notice) = clamp_threshold(self.rehash_threshold);
        notices.extend(notice);

        let (growth_policy, notice) = self.growth_policy.normalize();
        notices.extend(notice);

        let collision_strategy =
            CollisionStrategy::try_from(self.collision_code).unwrap_or_else(|()| {
                let used = CollisionStrategy::Double;
                notices.push(ConfigNotice::CollisionCode {
                    given: self.collision_code,
                    used,
                });
                used
            });

        let marker_scheme = EmptyMarkerScheme::try_from(self.marker_code).unwrap_or_else(|()| {
            let used = EmptyMarkerScheme::NegativeMarker;
            notices.push(ConfigNotice::MarkerCode {
                given: self.marker_code,
                used,
            });
            used
        });

        // NOTE: MAX_CAPACITY is prime, so rounding up never exceeds it
        let initial_capacity =
            next_prime(self.initial_capacity.clamp(MIN_CAPACITY, MAX_CAPACITY))
                .unwrap_or(MAX_CAPACITY);
        if initial_capacity != self.initial_capacity {
            notices.push(ConfigNotice::InitialCapacity {
                given: self.initial_capacity,
                used: initial_capacity,
            });
        }

        let max_capacity = match self.max_capacity {
            Some(max) if max < initial_capacity => {
                notices.push(ConfigNotice::MaxCapacity {
                    given: max,
                    initial: initial_capacity,
                });
                None
            }
            max => max,
        };

        let config = ValidatedConfig {
            rehash_threshold,
            growth_policy,
            collision_strategy,
            marker_scheme,
            initial_capacity,
            max_capacity,
            max_repair_shifts: self.max_repair_shifts,
            seed: self.seed,
        };

        (config, notices)
    }

    /// Builds the table, logging a warning for every normalized setting.
    #[must_use]
    pub fn build(self) -> HashTable {
        let (config, notices) = self.validate();

        for notice in &notices {
            log::warn!("{notice}");
        }

        HashTable::new(config)
    }
}

/// Clamps a rehash threshold into `[0, 1]`.
pub(crate) fn clamp_threshold(threshold: f64) -> (f64, Option<ConfigNotice>) {
    let used = if threshold.is_nan() {
        DEFAULT_REHASH_THRESHOLD
    } else {
        threshold.clamp(0.0, 1.0)
    };

    #[allow(clippy::float_cmp, reason = "clamp returns the input unchanged when in range")]
    let changed = threshold.is_nan() || used != threshold;

    if changed {
        (used, Some(ConfigNotice::RehashThreshold { given: threshold, used }))
    } else {
        (used, None)
    }
}

/// Normalized table configuration
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedConfig {
    pub(crate) rehash_threshold: f64,
    pub(crate) growth_policy: GrowthPolicy,
    pub(crate) collision_strategy: CollisionStrategy,
    pub(crate) marker_scheme: EmptyMarkerScheme,
    pub(crate) initial_capacity: usize,
    pub(crate) max_capacity: Option<usize>,
    pub(crate) max_repair_shifts: usize,
    pub(crate) seed: Option<u64>,
}

impl ValidatedConfig {
    /// Load factor that triggers growth, in `[0, 1]`.
    #[must_use]
    pub fn rehash_threshold(&self) -> f64 {
        self.rehash_threshold
    }

    /// Growth policy.
    #[must_use]
    pub fn growth_policy(&self) -> GrowthPolicy {
        self.growth_policy
    }

    /// Collision strategy.
    #[must_use]
    pub fn collision_strategy(&self) -> CollisionStrategy {
        self.collision_strategy
    }

    /// Empty marker scheme.
    #[must_use]
    pub fn empty_marker_scheme(&self) -> EmptyMarkerScheme {
        self.marker_scheme
    }

    /// Initial capacity, a prime of at least 3.
    #[must_use]
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Capacity ceiling, if any.
    #[must_use]
    pub fn max_capacity(&self) -> Option<usize> {
        self.max_capacity
    }

    /// Gap repair shift budget.
    #[must_use]
    pub fn max_repair_shifts(&self) -> usize {
        self.max_repair_shifts
    }

    /// Builds the table.
    #[must_use]
    pub fn build(self) -> HashTable {
        HashTable::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn config_default_is_valid() {
        let (config, notices) = Config::default().validate();
        assert!(notices.is_empty());
        assert_eq!(CollisionStrategy::Double, config.collision_strategy());
        assert_eq!(
            EmptyMarkerScheme::NegativeMarker,
            config.empty_marker_scheme()
        );
        assert_eq!(101, config.initial_capacity());
        assert_eq!(GrowthPolicy::Factor(2.0), config.growth_policy());
        assert_eq!(None, config.max_capacity());
        assert_eq!(MAX_REPAIR_SHIFTS, config.max_repair_shifts());
    }

    #[test]
    fn config_threshold_clamped() {
        let (config, notices) = Config::new().rehash_threshold(-0.5).validate();
        assert_eq!(0.0, config.rehash_threshold());
        assert_eq!(
            vec![ConfigNotice::RehashThreshold {
                given: -0.5,
                used: 0.0
            }],
            notices
        );

        let (config, notices) = Config::new().rehash_threshold(1.5).validate();
        assert_eq!(1.0, config.rehash_threshold());
        assert_eq!(1, notices.len());

        let (config, notices) = Config::new().rehash_threshold(f64::NAN).validate();
        assert_eq!(DEFAULT_REHASH_THRESHOLD, config.rehash_threshold());
        assert_eq!(1, notices.len());

        let (config, notices) = Config::new().rehash_threshold(1.0).validate();
        assert_eq!(1.0, config.rehash_threshold());
        assert!(notices.is_empty());
    }

    #[test]
    fn config_codes() {
        let (config, notices) = Config::new()
            .collision_code('Q')
            .empty_marker_code('R')
            .validate();
        assert!(notices.is_empty());
        assert_eq!(CollisionStrategy::Quadratic, config.collision_strategy());
        assert_eq!(
            EmptyMarkerScheme::ReplaceWithTombstone,
            config.empty_marker_scheme()
        );

        let (config, notices) = Config::new()
            .collision_code('x')
            .empty_marker_code('y')
            .validate();
        assert_eq!(CollisionStrategy::Double, config.collision_strategy());
        assert_eq!(
            EmptyMarkerScheme::NegativeMarker,
            config.empty_marker_scheme()
        );
        assert_eq!(
            vec![
                ConfigNotice::CollisionCode {
                    given: 'x',
                    used: CollisionStrategy::Double
                },
                ConfigNotice::MarkerCode {
                    given: 'y',
                    used: EmptyMarkerScheme::NegativeMarker
                },
            ],
            notices
        );
    }

    #[test]
    fn config_typed_setters_round_trip_codes() {
        let config = Config::new()
            .collision_strategy(CollisionStrategy::Quadratic)
            .empty_marker_scheme(EmptyMarkerScheme::Available);
        assert_eq!('Q', config.collision_code);
        assert_eq!('A', config.marker_code);
    }

    #[test]
    fn config_capacity_rounded_to_prime() {
        let (config, notices) = Config::new().initial_capacity(100).validate();
        assert_eq!(101, config.initial_capacity());
        assert_eq!(
            vec![ConfigNotice::InitialCapacity {
                given: 100,
                used: 101
            }],
            notices
        );

        let (config, _) = Config::new().initial_capacity(0).validate();
        assert_eq!(3, config.initial_capacity());

        let (config, notices) = Config::new().initial_capacity(7).validate();
        assert_eq!(7, config.initial_capacity());
        assert!(notices.is_empty());

        let (config, notices) = Config::new().initial_capacity(usize::MAX).validate();
        assert_eq!(MAX_CAPACITY, config.initial_capacity());
        assert_eq!(
            vec![ConfigNotice::InitialCapacity {
                given: usize::MAX,
                used: MAX_CAPACITY
            }],
            notices
        );
    }

    #[test]
    fn config_growth_defaults() {
        let (config, notices) = Config::new().growth_factor(1.0).validate();
        assert_eq!(GrowthPolicy::Factor(2.0), config.growth_policy());
        assert_eq!(1, notices.len());

        let (config, notices) = Config::new().growth_increment(0).validate();
        assert_eq!(GrowthPolicy::Increment(10), config.growth_policy());
        assert_eq!(1, notices.len());
    }

    #[test]
    fn config_max_capacity_below_initial_ignored() {
        let (config, notices) = Config::new()
            .initial_capacity(11)
            .max_capacity(5)
            .validate();
        assert_eq!(None, config.max_capacity());
        assert_eq!(
            vec![ConfigNotice::MaxCapacity {
                given: 5,
                initial: 11
            }],
            notices
        );
    }

    #[test]
    fn config_notice_display() {
        let notice = ConfigNotice::RehashThreshold {
            given: 2.0,
            used: 1.0,
        };
        assert_eq!(
            "rehash threshold must be between 0 and 1, got 2, using 1",
            notice.to_string()
        );
    }
}
