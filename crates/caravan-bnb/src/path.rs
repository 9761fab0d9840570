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

use caravan_model::{
    graph::{TspGraph, FIRST_NODE, MAX_GRAPH},
    index::NodeIndex,
    num::CostNumeric,
    tour::Tour,
};
use fixedbitset::FixedBitSet;
use smallvec::SmallVec;

/// The error type for path mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    /// `push` was given a node index at or beyond the instance size.
    NodeOutOfRange { node: usize, graph_size: usize },
    /// `pop` on a path that only holds the starting node.
    EmptyPath,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NodeOutOfRange { node, graph_size } => write!(
                f,
                "Node {} outside the graph (size {})",
                node, graph_size
            ),
            Self::EmptyPath => write!(f, "Cannot pop the starting node off a path"),
        }
    }
}

impl std::error::Error for PathError {}

/// A mutable partial tour.
///
/// The path always starts at [`FIRST_NODE`], which is pinned: `pop` never
/// removes it and never clears its membership bit. The running distance is
/// maintained incrementally under `push`/`pop`, and the membership bitmap
/// answers `contains` in O(1).
///
/// Invariants:
/// - `len() >= 1` and `nodes()[0] == FIRST_NODE`
/// - the bitmap holds exactly the indices currently on the path
/// - `distance()` equals the sum of edge distances along the path
///
/// A path is owned by exactly one task and cloned when a child task is
/// born; it is never shared.
#[derive(Debug, Clone)]
pub struct SearchPath<T> {
    nodes: SmallVec<[NodeIndex; MAX_GRAPH]>,
    visited: FixedBitSet,
    distance: T,
}

impl<T> SearchPath<T>
where
    T: CostNumeric,
{
    /// Creates a path holding only the starting node.
    pub fn new() -> Self {
        let mut nodes = SmallVec::new();
        nodes.push(FIRST_NODE);
        let mut visited = FixedBitSet::with_capacity(MAX_GRAPH);
        visited.insert(FIRST_NODE.get());
        Self {
            nodes,
            visited,
            distance: T::zero(),
        }
    }

    /// Returns the number of nodes on the path.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `false`; a path always holds at least the starting node.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the running total distance along the path.
    #[inline]
    pub fn distance(&self) -> T {
        self.distance
    }

    /// Returns `true` if `node` is currently on the path.
    #[inline]
    pub fn contains(&self, node: NodeIndex) -> bool {
        self.visited.contains(node.get())
    }

    /// Returns the most recently pushed node.
    #[inline]
    pub fn tail(&self) -> NodeIndex {
        self.nodes[self.nodes.len() - 1]
    }

    /// Extends the path by `node`, adding the edge from the current tail.
    pub fn push(&mut self, node: NodeIndex, graph: &TspGraph<T>) -> Result<(), PathError> {
        debug_assert!(
            graph.len() <= MAX_GRAPH,
            "called `SearchPath::push` with a graph beyond MAX_GRAPH: the limit is {} but the graph has {} nodes",
            MAX_GRAPH,
            graph.len()
        );
        if node.get() >= graph.len() {
            return Err(PathError::NodeOutOfRange {
                node: node.get(),
                graph_size: graph.len(),
            });
        }
        self.distance = self.distance + graph.distance(self.tail(), node);
        self.visited.insert(node.get());
        self.nodes.push(node);
        Ok(())
    }

    /// Removes the tail node, subtracting its edge from the running
    /// distance. The starting node cannot be removed.
    ///
    /// The membership bit of [`FIRST_NODE`] survives even when the tail is a
    /// closing return to it, so a closed tour can be reopened with a single
    /// `pop`.
    pub fn pop(&mut self, graph: &TspGraph<T>) -> Result<NodeIndex, PathError> {
        if self.nodes.len() < 2 {
            return Err(PathError::EmptyPath);
        }
        let old_tail = self.nodes[self.nodes.len() - 1];
        self.nodes.pop();
        let new_tail = self.tail();
        if old_tail != FIRST_NODE {
            self.visited.set(old_tail.get(), false);
        }
        self.distance = self.distance - graph.distance(new_tail, old_tail);
        Ok(old_tail)
    }

    /// Snapshots the path into an immutable [`Tour`].
    pub fn to_tour(&self) -> Tour<T> {
        Tour::new(self.distance, self.nodes.iter().copied().collect())
    }
}

impl<T> Default for SearchPath<T>
where
    T: CostNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Display for SearchPath<T>
where
    T: CostNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}: ", self.distance)?;
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", node.get())?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_graph() -> TspGraph<i32> {
        TspGraph::from_coords(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)], "square")
            .expect("square instance should build")
    }

    #[test]
    fn test_new_path_holds_the_starting_node() {
        let path = SearchPath::<i32>::new();
        assert_eq!(path.len(), 1);
        assert!(!path.is_empty());
        assert_eq!(path.tail(), FIRST_NODE);
        assert_eq!(path.distance(), 0);
        assert!(path.contains(FIRST_NODE));
        assert!(!path.contains(NodeIndex::new(1)));
    }

    #[test]
    fn test_push_updates_distance_membership_and_tail() {
        let graph = square_graph();
        let mut path = SearchPath::new();
        path.push(NodeIndex::new(1), &graph).unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path.distance(), 10);
        assert_eq!(path.tail(), NodeIndex::new(1));
        assert!(path.contains(NodeIndex::new(1)));

        path.push(NodeIndex::new(2), &graph).unwrap();
        assert_eq!(path.distance(), 20);
        assert_eq!(path.tail(), NodeIndex::new(2));
    }

    #[test]
    fn test_push_pop_round_trip_restores_the_path_exactly() {
        let graph = square_graph();
        let mut path = SearchPath::new();
        path.push(NodeIndex::new(2), &graph).unwrap();

        let len = path.len();
        let distance = path.distance();

        path.push(NodeIndex::new(3), &graph).unwrap();
        let popped = path.pop(&graph).unwrap();

        assert_eq!(popped, NodeIndex::new(3));
        assert_eq!(path.len(), len);
        assert_eq!(path.distance(), distance);
        assert!(!path.contains(NodeIndex::new(3)));
        assert!(path.contains(NodeIndex::new(2)));
    }

    #[test]
    fn test_pop_of_a_closing_return_keeps_the_start_visited() {
        let graph = square_graph();
        let mut path = SearchPath::new();
        for i in [1, 2, 3] {
            path.push(NodeIndex::new(i), &graph).unwrap();
        }
        // Close the tour and reopen it.
        path.push(FIRST_NODE, &graph).unwrap();
        assert_eq!(path.distance(), 40);
        path.pop(&graph).unwrap();
        assert_eq!(path.distance(), 30);
        assert!(path.contains(FIRST_NODE));
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn test_push_rejects_out_of_range_nodes() {
        let graph = square_graph();
        let mut path = SearchPath::new();
        let err = path.push(NodeIndex::new(4), &graph).unwrap_err();
        assert_eq!(
            err,
            PathError::NodeOutOfRange {
                node: 4,
                graph_size: 4
            }
        );
        assert_eq!(path.len(), 1);
        assert_eq!(path.distance(), 0);
    }

    #[test]
    fn test_pop_rejects_removing_the_starting_node() {
        let graph = square_graph();
        let mut path = SearchPath::<i32>::new();
        assert_eq!(path.pop(&graph).unwrap_err(), PathError::EmptyPath);
    }

    #[test]
    fn test_to_tour_snapshots_the_closed_cycle() {
        let graph = square_graph();
        let mut path = SearchPath::new();
        for i in [1, 2, 3] {
            path.push(NodeIndex::new(i), &graph).unwrap();
        }
        path.push(FIRST_NODE, &graph).unwrap();

        let tour = path.to_tour();
        assert_eq!(tour.cost(), 40);
        assert!(tour.verify_cycle(&graph));
    }

    #[test]
    fn test_display_matches_expected_format() {
        let graph = square_graph();
        let mut path = SearchPath::new();
        path.push(NodeIndex::new(1), &graph).unwrap();
        assert_eq!(format!("{}", path), "{10: 0, 1}");
    }

    #[test]
    fn test_error_display_is_single_line() {
        for err in [
            PathError::NodeOutOfRange {
                node: 9,
                graph_size: 4,
            },
            PathError::EmptyPath,
        ] {
            assert!(!format!("{}", err).contains('\n'));
        }
    }
}
