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

//! Single-threaded reference runners.
//!
//! `DirectRunner` ignores the split machinery entirely and runs the root
//! task's `solve` inline; it is the baseline for speedup measurements.
//! `PartitionedRunner` drives the full split/solve/merge contract through a
//! per-level bounded stack, recursing depth-first.

use crate::{
    report::{RunReport, RunTermination},
    task::{BoundedTaskStack, BoxedTask, Task, TaskError, TaskPool, TaskRunner},
};
use std::time::Instant;

/// Runs the root task's `solve` inline on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectRunner;

impl DirectRunner {
    pub fn new() -> Self {
        Self
    }
}

impl TaskRunner for DirectRunner {
    fn run(&self, mut root: BoxedTask) -> Result<RunReport, TaskError> {
        let start = Instant::now();
        root.solve()?;
        Ok(RunReport {
            termination: RunTermination::Completed,
            duration: start.elapsed(),
            tasks_created: 1,
            tasks_processed: 1,
            tasks_split: 0,
            num_threads: 1,
        })
    }
}

/// Drives the full task contract recursively on the calling thread.
///
/// Each recursion level owns a fresh [`BoundedTaskStack`]; children popped
/// from it are recursed into depth-first and then re-presented to the
/// parent's `merge` in their original push order.
#[derive(Debug, Clone, Copy)]
pub struct PartitionedRunner {
    capacity: usize,
}

impl PartitionedRunner {
    /// Creates a runner whose per-level stacks hold at most `capacity`
    /// children. A `split` that produces more fails with `PoolError::Full`.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    fn recurse(
        &self,
        task: &mut dyn Task,
        created: &mut u64,
        splits: &mut u64,
        solves: &mut u64,
    ) -> Result<(), TaskError> {
        let stack = BoundedTaskStack::new(self.capacity);
        let n = task.split(&stack)?;
        if n > 0 {
            *splits += 1;
            *created += n as u64;
            let mut children: Vec<BoxedTask> = Vec::with_capacity(n);
            for _ in 0..n {
                let Some(mut child) = stack.pop()? else { break };
                self.recurse(child.as_mut(), created, splits, solves)?;
                children.push(child);
            }
            // Children come off the stack newest-first; restore push order
            // before handing them back to merge.
            for child in children.into_iter().rev() {
                stack.push(child)?;
            }
            task.merge(&stack)?;
        } else {
            *solves += 1;
            task.solve()?;
        }
        Ok(())
    }
}

impl TaskRunner for PartitionedRunner {
    fn run(&self, mut root: BoxedTask) -> Result<RunReport, TaskError> {
        let mut created = 1u64;
        let mut splits = 0u64;
        let mut solves = 0u64;
        let start = Instant::now();
        self.recurse(root.as_mut(), &mut created, &mut splits, &mut solves)?;
        Ok(RunReport {
            termination: RunTermination::Completed,
            duration: start.elapsed(),
            tasks_created: created,
            tasks_processed: solves,
            tasks_split: splits,
            num_threads: 1,
        })
    }
}
