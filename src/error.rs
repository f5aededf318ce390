// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

/// Represents errors that can occur in the hash table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No usable slot was found along the probe sequence, even after
    /// attempting to grow the table
    TableFull,

    /// The key to delete is not present
    KeyNotFound(String),

    /// Growing would exceed the maximum capacity, either the configured one
    /// or [`crate::config::MAX_CAPACITY`]
    CapacityLimit(usize),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ProbeTableError: {self:?}")
    }
}

impl std::error::Error for Error {}

/// Table result
pub type Result<T> = std::result::Result<T, Error>;
