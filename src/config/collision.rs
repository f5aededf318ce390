// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

/// Collision resolution strategy
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CollisionStrategy {
    /// Quadratic probing, `s_i = (s_0 + i^2) mod N`
    Quadratic,

    /// Double hashing, `s_i = (s_0 + i * h2(key)) mod N`
    #[default]
    Double,
}

impl From<CollisionStrategy> for char {
    fn from(val: CollisionStrategy) -> Self {
        match val {
            CollisionStrategy::Quadratic => 'Q',
            CollisionStrategy::Double => 'D',
        }
    }
}

impl TryFrom<char> for CollisionStrategy {
    type Error = ();

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'Q' => Ok(Self::Quadratic),
            'D' => Ok(Self::Double),
            _ => Err(()),
        }
    }
}
