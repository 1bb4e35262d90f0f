//! Reading history
//!
//! An ordered, duplicate-permitting sequence of readings owned by one
//! sensor. Only appending and first-match removal mutate it.

use core::slice;

/// Ordered history of readings of type `V`
///
/// Insertion order is preserved and duplicates are allowed. `Clone` makes
/// an independent deep copy, and `clone_from` drops the destination's
/// previous readings before copying.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadingHistory<V> {
    values: Vec<V>,
}

impl<V> ReadingHistory<V> {
    /// Create an empty history
    pub const fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Append a reading at the end
    pub fn push(&mut self, value: V) {
        self.values.push(value);
    }

    /// Number of stored readings
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Oldest reading
    pub fn first(&self) -> Option<&V> {
        self.values.first()
    }

    /// Iterate readings oldest first
    pub fn iter(&self) -> slice::Iter<'_, V> {
        self.values.iter()
    }

    /// Readings as a slice, oldest first
    pub fn as_slice(&self) -> &[V] {
        &self.values
    }
}

impl<V: PartialEq> ReadingHistory<V> {
    /// Remove the oldest reading equal to `value`
    ///
    /// Returns `false` and leaves the history untouched if nothing matches.
    pub fn remove_first(&mut self, value: &V) -> bool {
        match self.values.iter().position(|v| v == value) {
            Some(idx) => {
                self.values.remove(idx);
                true
            }
            None => false,
        }
    }
}

impl<V> Default for ReadingHistory<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> FromIterator<V> for ReadingHistory<V> {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<V> Extend<V> for ReadingHistory<V> {
    fn extend<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        self.values.extend(iter);
    }
}

impl<'a, V> IntoIterator for &'a ReadingHistory<V> {
    type Item = &'a V;
    type IntoIter = slice::Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
