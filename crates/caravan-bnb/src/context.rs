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

use crate::incumbent::SharedIncumbent;
use caravan_model::{
    graph::{TspGraph, FIRST_NODE, MAX_GRAPH},
    index::NodeIndex,
    num::CostNumeric,
    tour::Tour,
};
use std::sync::atomic::{AtomicBool, Ordering};

/// The error type for search setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    /// The instance exceeds the membership bitmap's capacity.
    GraphTooLarge { size: usize, limit: usize },
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GraphTooLarge { size, limit } => write!(
                f,
                "Graph with {} nodes exceeds the supported limit of {}",
                size, limit
            ),
        }
    }
}

impl std::error::Error for SearchError {}

/// Shared state of one branch-and-bound search.
///
/// Every task of a search holds a reference to one context: the instance,
/// the shared incumbent, the cutoff depth, and the one-shot flag guarding
/// the initial bound. Keeping this per-search (instead of process-wide
/// statics) lets independent searches run concurrently in one process.
#[derive(Debug)]
pub struct SearchContext<T> {
    graph: TspGraph<T>,
    incumbent: SharedIncumbent<T>,
    cutoff_size: usize,
    initial_bound_set: AtomicBool,
}

impl<T> SearchContext<T>
where
    T: CostNumeric,
{
    /// Creates the context for one search over `graph`.
    ///
    /// `cutoff` counts levels from the leaves: tasks whose path has reached
    /// `graph.len() - cutoff` nodes stop splitting and are solved inline.
    /// `cutoff = 0` splits all the way down; `cutoff >= graph.len()`
    /// degenerates into a purely inline search.
    pub fn new(graph: TspGraph<T>, cutoff: usize) -> Result<Self, SearchError> {
        if graph.len() > MAX_GRAPH {
            return Err(SearchError::GraphTooLarge {
                size: graph.len(),
                limit: MAX_GRAPH,
            });
        }
        let cutoff_size = graph.len().saturating_sub(cutoff);
        Ok(Self {
            graph,
            incumbent: SharedIncumbent::new(),
            cutoff_size,
            initial_bound_set: AtomicBool::new(false),
        })
    }

    /// Returns the instance being searched.
    #[inline]
    pub fn graph(&self) -> &TspGraph<T> {
        &self.graph
    }

    /// Returns the shared incumbent of this search.
    #[inline]
    pub fn incumbent(&self) -> &SharedIncumbent<T> {
        &self.incumbent
    }

    /// Returns the path length at which splitting stops.
    #[inline]
    pub fn cutoff_size(&self) -> usize {
        self.cutoff_size
    }

    /// Installs the canonical tour `0 → 1 → … → n-1 → 0` as the initial
    /// incumbent. Exactly one caller performs the computation; the atomic
    /// exchange makes later calls no-ops.
    ///
    /// An immediately usable bound is what makes early pruning effective;
    /// without it the first levels of the tree split unpruned.
    pub fn ensure_initial_bound(&self) {
        if self.graph.is_empty() || self.initial_bound_set.swap(true, Ordering::AcqRel) {
            return;
        }
        let tour = self.canonical_tour();
        self.incumbent.try_install(&tour);
    }

    fn canonical_tour(&self) -> Tour<T> {
        let n = self.graph.len();
        let mut nodes = Vec::with_capacity(n + 1);
        let mut cost = T::zero();
        for i in 0..n {
            let node = NodeIndex::new(i);
            if i > 0 {
                cost = cost + self.graph.distance(NodeIndex::new(i - 1), node);
            }
            nodes.push(node);
        }
        cost = cost + self.graph.distance(NodeIndex::new(n - 1), FIRST_NODE);
        nodes.push(FIRST_NODE);
        Tour::new(cost, nodes)
    }
}
