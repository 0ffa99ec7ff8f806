//! Copy-on-write key selections

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A set of catalog keys
///
/// Selections are never mutated in place: every toggle returns a new set, so
/// an engine input can be reused after deriving a variant of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection(BTreeSet<String>);

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// New selection with `key` added
    pub fn with(&self, key: &str) -> Self {
        let mut next = self.0.clone();
        next.insert(key.to_string());
        Self(next)
    }

    /// New selection with `key` removed
    pub fn without(&self, key: &str) -> Self {
        let mut next = self.0.clone();
        next.remove(key);
        Self(next)
    }

    /// New selection with `key` flipped
    pub fn toggled(&self, key: &str) -> Self {
        if self.contains(key) {
            self.without(key)
        } else {
            self.with(key)
        }
    }

    /// New selection where `key` is present exactly when `flag` is set
    pub fn with_flag(&self, key: &str, flag: bool) -> Self {
        if flag {
            self.with(key)
        } else {
            self.without(key)
        }
    }
}

impl<S: Into<String>> FromIterator<S> for Selection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a String;
    type IntoIter = std::collections::btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
