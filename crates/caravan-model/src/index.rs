// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Strongly Typed Node Indices (Zero-Cost)
//!
//! A phantom-free newtype around `usize` identifying a city of the instance.
//! Raw `usize` invites accidental swaps between node indices and ordinary
//! counters; `NodeIndex` encodes the intent at the type level while compiling
//! down to a transparent `usize`.

/// A strongly typed index identifying one node (city) of a TSP instance.
///
/// # Examples
///
/// ```rust
/// use caravan_model::index::NodeIndex;
///
/// let node = NodeIndex::new(5);
/// assert_eq!(node.get(), 5);
/// assert_eq!(format!("{}", node), "NodeIndex(5)");
/// ```
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// Creates a new `NodeIndex` with the given `usize` index.
    #[inline(always)]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the underlying `usize` index.
    #[inline(always)]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl From<usize> for NodeIndex {
    #[inline(always)]
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}

impl From<NodeIndex> for usize {
    #[inline(always)]
    fn from(index: NodeIndex) -> Self {
        index.get()
    }
}

impl std::fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeIndex({})", self.0)
    }
}

impl std::fmt::Debug for NodeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeIndex({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::NodeIndex;

    #[test]
    fn test_new_and_get_round_trip() {
        let index = NodeIndex::new(7);
        assert_eq!(index.get(), 7);
    }

    #[test]
    fn test_conversions() {
        let index: NodeIndex = 3usize.into();
        assert_eq!(index, NodeIndex::new(3));
        let raw: usize = index.into();
        assert_eq!(raw, 3);
    }

    #[test]
    fn test_ordering_follows_underlying_index() {
        assert!(NodeIndex::new(1) < NodeIndex::new(2));
        assert_eq!(NodeIndex::new(4), NodeIndex::new(4));
    }

    #[test]
    fn test_display_and_debug() {
        let index = NodeIndex::new(9);
        assert_eq!(format!("{}", index), "NodeIndex(9)");
        assert_eq!(format!("{:?}", index), "NodeIndex(9)");
    }
}
