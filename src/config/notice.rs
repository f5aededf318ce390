// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use super::{CollisionStrategy, EmptyMarkerScheme, MAX_CAPACITY};

/// A configuration value that was out of range and has been replaced
///
/// Invalid settings are never rejected; they are clamped or defaulted and
/// reported through these notices.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigNotice {
    /// Rehash threshold was outside of `[0, 1]`
    RehashThreshold {
        /// Given value
        given: f64,

        /// Value in use
        used: f64,
    },

    /// Growth factor was not greater than 1
    GrowthFactor {
        /// Given value
        given: f64,

        /// Value in use
        used: f64,
    },

    /// Growth increment was not greater than 0
    GrowthIncrement {
        /// Given value
        given: usize,

        /// Value in use
        used: usize,
    },

    /// Unknown collision strategy code
    CollisionCode {
        /// Given code
        given: char,

        /// Strategy in use
        used: CollisionStrategy,
    },

    /// Unknown empty marker scheme code
    MarkerCode {
        /// Given code
        given: char,

        /// Scheme in use
        used: EmptyMarkerScheme,
    },

    /// Initial capacity was too small, too large or not prime
    InitialCapacity {
        /// Given value
        given: usize,

        /// Value in use
        used: usize,
    },

    /// Maximum capacity was below the initial capacity and is ignored
    MaxCapacity {
        /// Given value
        given: usize,

        /// Initial capacity
        initial: usize,
    },
}

impl std::fmt::Display for ConfigNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RehashThreshold { given, used } => write!(
                f,
                "rehash threshold must be between 0 and 1, got {given}, using {used}"
            ),
            Self::GrowthFactor { given, used } => write!(
                f,
                "growth factor must be greater than 1, got {given}, using {used}"
            ),
            Self::GrowthIncrement { given, used } => write!(
                f,
                "growth increment must be greater than 0, got {given}, using {used}"
            ),
            Self::CollisionCode { given, used } => write!(
                f,
                "collision strategy must be either 'Q' or 'D', got {given:?}, using {used:?}"
            ),
            Self::MarkerCode { given, used } => write!(
                f,
                "empty marker scheme must be one of 'A', 'N' or 'R', got {given:?}, using {used:?}"
            ),
            Self::InitialCapacity { given, used } => write!(
                f,
                "initial capacity must be a prime between 3 and {MAX_CAPACITY}, got {given}, using {used}"
            ),
            Self::MaxCapacity { given, initial } => write!(
                f,
                "max capacity {given} is below initial capacity {initial}, ignoring it"
            ),
        }
    }
}
