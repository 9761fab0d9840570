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

use caravan_bnb::{
    context::{SearchContext, SearchError},
    task::TourSearchTask,
};
use caravan_engine::{
    parallel::ParallelRunner,
    report::{RunReport, RunTermination},
    sequential::DirectRunner,
    task::{TaskError, TaskRunner},
};
use caravan_model::{graph::TspGraph, num::CostNumeric, tour::Tour};
use std::sync::Arc;

/// The error type for a solver invocation.
#[derive(Debug)]
pub enum SolverError {
    /// Search setup was rejected (e.g. the instance is too large).
    Search(SearchError),
    /// A task failed during execution.
    Task(TaskError),
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Search(e) => write!(f, "{e}"),
            Self::Task(e) => write!(f, "Task failure: {e}"),
        }
    }
}

impl std::error::Error for SolverError {}

impl From<SearchError> for SolverError {
    fn from(e: SearchError) -> Self {
        Self::Search(e)
    }
}

impl From<TaskError> for SolverError {
    fn from(e: TaskError) -> Self {
        Self::Task(e)
    }
}

/// What the search established about the instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveResult<T> {
    /// The search ran to completion; the tour is the global optimum.
    Optimal(Tour<T>),
    /// The search was interrupted; the tour is the best one found so far.
    Feasible(Tour<T>),
    /// The search ended without finding any tour.
    Unknown,
}

impl<T> SolveResult<T>
where
    T: CostNumeric,
{
    /// Returns the cost of the reported tour, if any.
    #[inline]
    pub fn cost(&self) -> Option<T> {
        match self {
            Self::Optimal(tour) | Self::Feasible(tour) => Some(tour.cost()),
            Self::Unknown => None,
        }
    }

    /// Returns the reported tour, if any.
    #[inline]
    pub fn tour(&self) -> Option<&Tour<T>> {
        match self {
            Self::Optimal(tour) | Self::Feasible(tour) => Some(tour),
            Self::Unknown => None,
        }
    }
}

impl<T> std::fmt::Display for SolveResult<T>
where
    T: CostNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Optimal(tour) => write!(f, "Optimal(cost: {})", tour.cost()),
            Self::Feasible(tour) => write!(f, "Feasible(cost: {})", tour.cost()),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// The complete outcome of one solver invocation.
#[derive(Debug, Clone)]
pub struct SolveOutcome<T> {
    result: SolveResult<T>,
    report: RunReport,
}

impl<T> SolveOutcome<T>
where
    T: CostNumeric,
{
    /// Returns the search result.
    #[inline]
    pub fn result(&self) -> &SolveResult<T> {
        &self.result
    }

    /// Returns the runner report of this invocation.
    #[inline]
    pub fn report(&self) -> &RunReport {
        &self.report
    }
}

impl<T> std::fmt::Display for SolveOutcome<T>
where
    T: CostNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SolveOutcome(result: {})", self.result)
    }
}

/// Configures and runs branch-and-bound searches.
#[derive(Debug, Clone, Copy)]
pub struct Solver {
    num_threads: usize,
    cutoff: usize,
}

impl Solver {
    /// Creates a solver. `num_threads = 0` selects the hardware concurrency
    /// (with a floor of 4); `cutoff` is the number of levels from the leaves
    /// at which splitting stops.
    pub fn new(num_threads: usize, cutoff: usize) -> Self {
        Self {
            num_threads,
            cutoff,
        }
    }

    /// Runs the parallel search over `graph`.
    pub fn solve<T>(&self, graph: &TspGraph<T>) -> Result<SolveOutcome<T>, SolverError>
    where
        T: CostNumeric,
    {
        let context = Arc::new(SearchContext::new(graph.clone(), self.cutoff)?);
        let root = TourSearchTask::root(Arc::clone(&context));
        let runner = ParallelRunner::new(self.num_threads);
        let report = runner.run(Box::new(root))?;
        Ok(Self::outcome(&context, report))
    }

    /// Runs the single-threaded baseline: the root task is solved inline,
    /// bypassing the split machinery entirely.
    pub fn solve_sequential<T>(&self, graph: &TspGraph<T>) -> Result<SolveOutcome<T>, SolverError>
    where
        T: CostNumeric,
    {
        let context = Arc::new(SearchContext::new(graph.clone(), self.cutoff)?);
        let root = TourSearchTask::root(Arc::clone(&context));
        // The baseline bypasses `split`, so the initial bound that `split`
        // would install must be seeded here.
        context.ensure_initial_bound();
        let report = DirectRunner::new().run(Box::new(root))?;
        Ok(Self::outcome(&context, report))
    }

    fn outcome<T>(context: &SearchContext<T>, report: RunReport) -> SolveOutcome<T>
    where
        T: CostNumeric,
    {
        let result = match context.incumbent().snapshot() {
            Some(tour) if report.termination == RunTermination::Completed => {
                SolveResult::Optimal(tour)
            }
            Some(tour) => SolveResult::Feasible(tour),
            None => SolveResult::Unknown,
        };
        SolveOutcome { result, report }
    }
}
