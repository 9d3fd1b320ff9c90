//! Cycle guard for pointer graphs.

use std::collections::HashSet;

/// Visited records the pointer pairs already compared. A pair is keyed on
/// both addresses, so isomorphic cycles built from different nodes still
/// terminate.
#[derive(Debug, Default)]
pub struct Visited {
    pairs: HashSet<(usize, usize)>,
}

impl Visited {
    pub fn new() -> Self {
        Visited::default()
    }

    /// Records the pair. Returns false if it was already recorded.
    pub fn insert(&mut self, a: usize, b: usize) -> bool {
        self.pairs.insert((a, b))
    }

    pub fn contains(&self, a: usize, b: usize) -> bool {
        self.pairs.contains(&(a, b))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
