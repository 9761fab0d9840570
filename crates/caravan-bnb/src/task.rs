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

use crate::{context::SearchContext, path::{PathError, SearchPath}};
use caravan_engine::task::{Task, TaskError, TaskPool};
use caravan_model::{graph::FIRST_NODE, index::NodeIndex, num::CostNumeric};
use std::sync::Arc;

/// How often the periodic dominance check actually consults the incumbent.
/// The other checks are free; sampling keeps the shared bound off the
/// hottest loop.
const BOUND_CHECK_PERIOD: u32 = 16;

/// One node of the branch-and-bound search tree.
///
/// The task owns a partial tour. `split` bears one child per unvisited city
/// whose one-edge extension can still beat the incumbent; `solve` exhausts
/// the subtree inline once the path has reached the cutoff depth. A task can
/// only be created through [`TourSearchTask::root`] or by splitting; there
/// is deliberately no parameterless constructor.
pub struct TourSearchTask<T> {
    context: Arc<SearchContext<T>>,
    path: SearchPath<T>,
    bound_checks: u32,
}

impl<T> TourSearchTask<T>
where
    T: CostNumeric,
{
    /// Creates the root task of a search.
    pub fn root(context: Arc<SearchContext<T>>) -> Self {
        Self {
            context,
            path: SearchPath::new(),
            bound_checks: 0,
        }
    }

    /// Returns the best tour found by this task's search so far.
    pub fn best_tour(&self) -> Option<caravan_model::tour::Tour<T>> {
        self.context.incumbent().snapshot()
    }

    fn child(&self, node: NodeIndex) -> Result<Self, PathError> {
        let mut path = self.path.clone();
        path.push(node, self.context.graph())?;
        Ok(Self {
            context: Arc::clone(&self.context),
            path,
            bound_checks: 0,
        })
    }

    /// Samples the incumbent every [`BOUND_CHECK_PERIOD`]-th call and
    /// reports whether this subtree is dominated.
    fn should_prune(&mut self) -> bool {
        self.bound_checks = self.bound_checks.wrapping_add(1);
        if self.bound_checks % BOUND_CHECK_PERIOD == 0 {
            let here: i64 = self.path.distance().into();
            return here >= self.context.incumbent().upper_bound();
        }
        false
    }

    /// Exhausts the subtree below the current path inline, updating the
    /// incumbent whenever a complete better tour closes.
    fn search_inline(&mut self) -> Result<(), PathError> {
        if self.should_prune() {
            return Ok(());
        }
        let n = self.context.graph().len();
        if self.path.len() == n {
            self.path.push(FIRST_NODE, self.context.graph())?;
            let total: i64 = self.path.distance().into();
            if total < self.context.incumbent().upper_bound() {
                self.context.incumbent().try_install(&self.path.to_tour());
            }
            self.path.pop(self.context.graph())?;
        } else {
            let mut best = self.context.incumbent().upper_bound();
            for i in 0..n {
                let node = NodeIndex::new(i);
                if self.path.contains(node) {
                    continue;
                }
                let here: i64 = self.path.distance().into();
                let edge: i64 = self.context.graph().distance(self.path.tail(), node).into();
                if here + edge < best {
                    self.path.push(node, self.context.graph())?;
                    self.search_inline()?;
                    self.path.pop(self.context.graph())?;
                    // The incumbent may have improved during the recursion.
                    best = self.context.incumbent().upper_bound();
                }
            }
        }
        Ok(())
    }
}

impl<T> Task for TourSearchTask<T>
where
    T: CostNumeric,
{
    fn split(&mut self, pool: &dyn TaskPool) -> Result<usize, TaskError> {
        self.context.ensure_initial_bound();
        if self.path.len() >= self.context.cutoff_size() {
            return Ok(0);
        }
        if self.should_prune() {
            return Ok(0);
        }
        let best = self.context.incumbent().upper_bound();
        let here: i64 = self.path.distance().into();
        let tail = self.path.tail();
        let mut count = 0;
        for i in 0..self.context.graph().len() {
            let node = NodeIndex::new(i);
            if self.path.contains(node) {
                continue;
            }
            let edge: i64 = self.context.graph().distance(tail, node).into();
            if here + edge < best {
                let child = self.child(node)?;
                pool.push(Box::new(child))?;
                count += 1;
            }
        }
        Ok(count)
    }

    fn merge(&mut self, _pool: &dyn TaskPool) -> Result<(), TaskError> {
        // Results flow through the shared incumbent; parents aggregate
        // nothing.
        Ok(())
    }

    fn solve(&mut self) -> Result<(), TaskError> {
        self.search_inline().map_err(Into::into)
    }

    fn write(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Task{}", self.path)
    }
}
