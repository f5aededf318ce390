// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::Entry;

/// One cell of the backing array
///
/// ```text
/// Empty ──insert──▶ Occupied ──delete──▶ Available | Tombstone | Empty
///                      ▲                        │
///                      └─────────insert─────────┘
/// ```
///
/// Searches stop at [`Slot::Empty`] and probe through deleted slots;
/// inserts may reuse deleted slots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Slot {
    /// Never used since the last resize (or emptied by gap repair)
    #[default]
    Empty,

    /// Holds a live record
    Occupied(Entry),

    /// Deleted under [`crate::EmptyMarkerScheme::Available`]
    ///
    /// The old record storage is kept, but flagged as available.
    Available(Entry),

    /// Deleted, holding the reserved negative marker
    Tombstone,
}

impl Slot {
    /// Returns the live record, if any.
    #[must_use]
    pub fn entry(&self) -> Option<&Entry> {
        match self {
            Self::Occupied(entry) => Some(entry),
            _ => None,
        }
    }

    /// Returns `true` if the slot holds a live record for `key`.
    #[must_use]
    pub fn holds(&self, key: &str) -> bool {
        self.entry().is_some_and(|entry| entry.key() == key)
    }

    /// Returns `true` if the slot holds a live record.
    #[must_use]
    pub fn is_occupied(&self) -> bool {
        matches!(self, Self::Occupied(_))
    }

    /// Returns `true` if the slot was never used (ends a probe).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns `true` if the slot holds a deletion marker of any scheme.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Available(_) | Self::Tombstone)
    }

    /// Takes the slot's live record, if any.
    pub(crate) fn into_entry(self) -> Option<Entry> {
        match self {
            Self::Occupied(entry) => Some(entry),
            _ => None,
        }
    }
}
