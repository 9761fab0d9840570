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

use crate::{
    graph::{TspGraph, FIRST_NODE},
    index::NodeIndex,
    num::CostNumeric,
};

/// A complete tour reported by the solver.
///
/// The node sequence is closed: it starts and ends at [`FIRST_NODE`], so a
/// tour over an instance of `n` cities carries `n + 1` node entries. The
/// stored cost is the sum of the edge distances along the sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tour<T> {
    cost: T,
    nodes: Vec<NodeIndex>,
}

impl<T> Tour<T>
where
    T: CostNumeric,
{
    /// Constructs a new `Tour`.
    ///
    /// # Panics
    ///
    /// Panics if `nodes` is empty.
    pub fn new(cost: T, nodes: Vec<NodeIndex>) -> Self {
        assert!(
            !nodes.is_empty(),
            "called `Tour::new` with an empty node sequence"
        );
        Self { cost, nodes }
    }

    /// Returns the total cost of this tour.
    #[inline]
    pub fn cost(&self) -> T {
        self.cost
    }

    /// Returns the closed node sequence of this tour.
    #[inline]
    pub fn nodes(&self) -> &[NodeIndex] {
        &self.nodes
    }

    /// Returns the number of node entries (including the closing node).
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `false`; a tour always carries at least one node.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Checks that this tour is a Hamiltonian cycle of `graph` and that the
    /// stored cost matches the edge distances.
    ///
    /// A valid tour visits each of the `n` cities exactly once, starts and
    /// ends at [`FIRST_NODE`], and its cost is the sum of `distance` over
    /// consecutive pairs.
    pub fn verify_cycle(&self, graph: &TspGraph<T>) -> bool {
        let n = graph.len();
        if self.nodes.len() != n + 1 {
            return false;
        }
        if self.nodes[0] != FIRST_NODE || self.nodes[n] != FIRST_NODE {
            return false;
        }
        let mut seen = vec![false; n];
        for &node in &self.nodes[..n] {
            if node.get() >= n || seen[node.get()] {
                return false;
            }
            seen[node.get()] = true;
        }
        let mut total = T::zero();
        for pair in self.nodes.windows(2) {
            total = total + graph.distance(pair[0], pair[1]);
        }
        total == self.cost
    }
}

impl<T> std::fmt::Display for Tour<T>
where
    T: CostNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}: ", self.cost)?;
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", node.get())?;
        }
        write!(f, "}}")
    }
}
