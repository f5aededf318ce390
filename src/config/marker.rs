// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

/// How deleted slots are represented
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum EmptyMarkerScheme {
    /// The slot keeps its record storage and is flagged as available
    Available,

    /// The slot is overwritten with a reserved marker (tombstone)
    #[default]
    NegativeMarker,

    /// A later record of the same cluster is moved back into the slot,
    /// so no marker is needed
    ///
    /// Falls back to a tombstone if the gap cannot be closed. Such tombstones
    /// are cleared once no record probes through them anymore.
    ReplaceWithTombstone,
}

impl From<EmptyMarkerScheme> for char {
    fn from(val: EmptyMarkerScheme) -> Self {
        match val {
            EmptyMarkerScheme::Available => 'A',
            EmptyMarkerScheme::NegativeMarker => 'N',
            EmptyMarkerScheme::ReplaceWithTombstone => 'R',
        }
    }
}

impl TryFrom<char> for EmptyMarkerScheme {
    type Error = ();

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'A' => Ok(Self::Available),
            'N' => Ok(Self::NegativeMarker),
            'R' => Ok(Self::ReplaceWithTombstone),
            _ => Err(()),
        }
    }
}
