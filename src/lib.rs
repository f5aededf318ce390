// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! A configurable open-addressing hash table from string keys to string values.
//!
//! ##### About
//!
//! This crate exports a [`HashTable`] that exposes the mechanics a standard
//! library map hides:
//!
//! - Keys are hashed with a polynomial hash over their first 13 characters
//!   ([`hash::hash_code`]).
//! - Hash codes are compressed into slot indices with randomized coefficients
//!   that are redrawn on every resize ([`compression::Compressor`]).
//! - Collisions are resolved by quadratic probing or double hashing
//!   ([`CollisionStrategy`], [`ProbeSequence`]).
//! - Deleted slots are marked according to an [`EmptyMarkerScheme`].
//! - The table grows to the next prime capacity once its load factor
//!   exceeds the rehash threshold ([`GrowthPolicy`]).
//!
//! Out-of-range configuration values are never rejected; they are clamped
//! and reported as [`ConfigNotice`]s.
//!
//! ```
//! use probe_table::Config;
//!
//! let mut table = Config::new()
//!     .rehash_threshold(0.7)
//!     .growth_increment(5)
//!     .initial_capacity(7)
//!     .seed(0)
//!     .build();
//!
//! for key in ["a", "b", "c", "d", "e"] {
//!     table.insert(key, key.to_uppercase())?;
//! }
//!
//! // 5 / 7 exceeds the threshold, so the table grew to the next prime >= 12
//! assert_eq!(13, table.capacity());
//! assert_eq!(Some("C"), table.get("c"));
//! #
//! # Ok::<(), probe_table::Error>(())
//! ```

#![deny(clippy::all, missing_docs, clippy::cargo)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::indexing_slicing)]
#![warn(clippy::pedantic, clippy::nursery)]
#![warn(clippy::expect_used)]
#![allow(clippy::missing_const_for_fn)]
#![warn(clippy::multiple_crate_versions)]
#![allow(clippy::option_if_let_else)]
#![warn(clippy::redundant_feature_names)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

/// Hash code compression
pub mod compression;

/// Configuration
pub mod config;

mod entry;
mod error;

pub mod hash;

/// Prime number helpers
pub mod prime;

mod probe;
mod slot;
mod table;

pub use {
    config::{
        CollisionStrategy, Config, ConfigNotice, EmptyMarkerScheme, GrowthPolicy, ValidatedConfig,
    },
    entry::Entry,
    error::{Error, Result},
    probe::ProbeSequence,
    slot::Slot,
    table::{HashTable, MAX_REPAIR_SHIFTS},
};
