// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

/// Key used by [`Entry::default`]
pub const DEFAULT_KEY: &str = "default";

/// Value used by [`Entry::default`]
pub const DEFAULT_VALUE: &str = "default";

/// An owned key-value record stored in a table slot
///
/// Entries are never mutated in place; updating a key replaces the
/// whole record.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Entry {
    key: String,
    value: String,
}

impl Default for Entry {
    /// Placeholder record (`"default"`, `"default"`).
    fn default() -> Self {
        Self::new(DEFAULT_KEY, DEFAULT_VALUE)
    }
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for Entry {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

impl Entry {
    /// Creates a new record.
    #[must_use]
    pub fn new<K: Into<String>, V: Into<String>>(key: K, value: V) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Returns the key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Consumes the record, returning its key and value.
    #[must_use]
    pub fn into_parts(self) -> (String, String) {
        (self.key, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn entry_default_is_placeholder() {
        let entry = Entry::default();
        assert_eq!("default", entry.key());
        assert_eq!("default", entry.value());
    }

    #[test]
    fn entry_from_tuple() {
        let entry = Entry::from(("a", String::from("b")));
        assert_eq!(Entry::new("a", "b"), entry);
        assert_eq!((String::from("a"), String::from("b")), entry.into_parts());
    }
}
