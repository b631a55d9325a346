//! Positional iteration over one query's result nodes

use std::iter::{Copied, Enumerate};
use std::slice;

/// The nodes produced by a single query evaluation, plus a read position.
///
/// Membership is fixed when the cursor is created: later changes to the
/// document do not add or drop entries, and a removed node stays in its
/// slot (detached, but still usable).
///
/// The position starts at 0 and is never clamped. Moving past the end is
/// allowed and simply makes [`ResultCursor::current`] return `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCursor<N> {
    nodes: Vec<N>,
    position: usize,
}

impl<N> Default for ResultCursor<N> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            position: 0,
        }
    }
}

impl<N> From<Vec<N>> for ResultCursor<N> {
    fn from(nodes: Vec<N>) -> Self {
        Self { nodes, position: 0 }
    }
}

impl<N: Copy> ResultCursor<N> {
    pub fn new(nodes: Vec<N>) -> Self {
        Self::from(nodes)
    }

    /// Number of nodes in the result set
    pub fn count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Current position
    pub fn key(&self) -> usize {
        self.position
    }

    /// Move forward by one, returning the position before the move
    pub fn advance(&mut self) -> usize {
        let previous = self.position;
        self.position += 1;
        previous
    }

    /// Back to the first node
    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// Node at the current position, if the position is in range
    pub fn current(&self) -> Option<N> {
        self.nodes.get(self.position).copied()
    }

    pub fn valid(&self) -> bool {
        self.current().is_some()
    }

    /// Jump to `index`.
    ///
    /// Any index up to and including `count()` is accepted; `count()` itself
    /// leaves the cursor one past the end. Larger indexes are refused and
    /// leave the position unchanged.
    pub fn seek(&mut self, index: usize) -> bool {
        if index <= self.nodes.len() {
            self.position = index;
            true
        } else {
            false
        }
    }

    /// [`seek`](Self::seek), returning the node landed on
    pub fn seek_node(&mut self, index: usize) -> Option<N> {
        if self.seek(index) {
            self.current()
        } else {
            None
        }
    }

    /// Node at an absolute index, ignoring the position
    pub fn get(&self, index: usize) -> Option<N> {
        self.nodes.get(index).copied()
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.nodes.len()
    }

    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    /// `(index, node)` pairs in result order. Does not move the position.
    pub fn iter(&self) -> Enumerate<Copied<slice::Iter<'_, N>>> {
        self.nodes.iter().copied().enumerate()
    }
}

impl<'a, N: Copy> IntoIterator for &'a ResultCursor<N> {
    type Item = (usize, N);
    type IntoIter = Enumerate<Copied<slice::Iter<'a, N>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
