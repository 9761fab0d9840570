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

//! # Parallel Task Runner
//!
//! A fixed pool of worker threads draining a shared lock-free LIFO of tasks.
//!
//! ## Termination
//!
//! Termination is driven exclusively by the `outstanding_tasks` counter:
//! it starts at 1 for the root, grows by `n` when a split bears `n`
//! children, and shrinks by 1 when a task is retired. A worker that adds
//! children always does so *before* decrementing the parent; reversing the
//! two would let the counter touch zero with work still pending. The counter
//! reaches zero exactly once per run.
//!
//! An "all workers idle" heuristic is deliberately absent; it races with
//! pushes that are in flight between a split and the counter update.
//!
//! ## Waiting
//!
//! Workers that find the pool empty park on a condition variable whose
//! predicate is `termination_requested || !pool.empty() || outstanding == 0`.
//! The wait is bounded by a short timeout as a backstop; spurious wakeups
//! are harmless because the predicate is re-evaluated on every pass.

use crate::{
    lockfree::LockFreePool,
    report::{RunReport, RunTermination},
    task::{BoxedTask, TaskError, TaskRunner},
};
use std::{
    sync::{
        atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering},
        Condvar, Mutex,
    },
    thread,
    time::{Duration, Instant},
};

const IDLE_WAIT: Duration = Duration::from_millis(1);

/// A blocking multi-worker runner over a shared lock-free pool.
///
/// `run` spawns the workers, blocks until all of them have joined, and
/// returns a [`RunReport`]. `stop` may be called from any thread while a run
/// is in progress; workers notice the flag between tasks and exit promptly.
pub struct ParallelRunner {
    pool: LockFreePool,
    num_threads: usize,
    termination_requested: AtomicBool,
    outstanding_tasks: AtomicI64,
    tasks_created: AtomicU64,
    tasks_processed: AtomicU64,
    tasks_split: AtomicU64,
    idle_lock: Mutex<()>,
    idle_cv: Condvar,
}

impl ParallelRunner {
    /// Creates a runner with the given worker count. Requesting 0 selects
    /// the hardware concurrency, with a floor of 4 workers.
    pub fn new(num_threads: usize) -> Self {
        let num_threads = if num_threads == 0 {
            thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(0)
                .max(4)
        } else {
            num_threads
        };
        Self {
            pool: LockFreePool::new(),
            num_threads,
            termination_requested: AtomicBool::new(false),
            outstanding_tasks: AtomicI64::new(0),
            tasks_created: AtomicU64::new(0),
            tasks_processed: AtomicU64::new(0),
            tasks_split: AtomicU64::new(0),
            idle_lock: Mutex::new(()),
            idle_cv: Condvar::new(),
        }
    }

    /// Returns the resolved worker count.
    #[inline]
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Returns the number of tasks created so far in the current run.
    #[inline]
    pub fn tasks_created(&self) -> u64 {
        self.tasks_created.load(Ordering::Relaxed)
    }

    /// Returns the number of tasks solved so far in the current run.
    #[inline]
    pub fn tasks_processed(&self) -> u64 {
        self.tasks_processed.load(Ordering::Relaxed)
    }

    /// Returns the number of tasks retired through `split` so far.
    #[inline]
    pub fn tasks_split(&self) -> u64 {
        self.tasks_split.load(Ordering::Relaxed)
    }

    /// Returns the outstanding-work counter. Zero means the task tree has
    /// been exhausted.
    #[inline]
    pub fn outstanding_tasks(&self) -> i64 {
        self.outstanding_tasks.load(Ordering::Acquire)
    }

    /// Requests cooperative cancellation and wakes every parked worker.
    ///
    /// Workers exit between tasks; tasks still resident in the pool are
    /// dropped when the pool is next cleared.
    pub fn stop(&self) {
        self.termination_requested.store(true, Ordering::Relaxed);
        let _guard = self.idle_lock.lock().unwrap();
        self.idle_cv.notify_all();
    }

    fn predicate_holds(&self) -> bool {
        self.termination_requested.load(Ordering::Relaxed)
            || !self.pool.is_empty()
            || self.outstanding_tasks.load(Ordering::Acquire) == 0
    }

    fn worker(&self, failure: &Mutex<Option<TaskError>>) {
        loop {
            let Some(mut task) = self.pool.pop() else {
                if self.termination_requested.load(Ordering::Relaxed) {
                    break;
                }
                if self.outstanding_tasks.load(Ordering::Acquire) == 0 && self.pool.is_empty() {
                    break;
                }
                let guard = self.idle_lock.lock().unwrap();
                let _unused = self
                    .idle_cv
                    .wait_timeout_while(guard, IDLE_WAIT, |_| !self.predicate_holds())
                    .unwrap();
                continue;
            };

            let n = match task.split(&self.pool) {
                Ok(n) => n,
                Err(error) => {
                    self.record_failure(failure, error);
                    break;
                }
            };

            if n > 0 {
                // Children are accounted before the parent is retired; see
                // the module docs for why this order is load-bearing.
                self.tasks_created.fetch_add(n as u64, Ordering::Relaxed);
                self.outstanding_tasks.fetch_add(n as i64, Ordering::Relaxed);
                self.tasks_split.fetch_add(1, Ordering::Relaxed);
                drop(task);
            } else {
                let solved = task.solve();
                drop(task);
                if let Err(error) = solved {
                    self.record_failure(failure, error);
                    break;
                }
                self.tasks_processed.fetch_add(1, Ordering::Relaxed);
            }

            let remaining = self.outstanding_tasks.fetch_sub(1, Ordering::AcqRel) - 1;
            {
                let _guard = self.idle_lock.lock().unwrap();
                if remaining == 0 {
                    self.idle_cv.notify_all();
                } else {
                    self.idle_cv.notify_one();
                }
            }

            if self.termination_requested.load(Ordering::Relaxed) {
                break;
            }
        }
    }

    fn record_failure(&self, failure: &Mutex<Option<TaskError>>, error: TaskError) {
        {
            let mut slot = failure.lock().unwrap();
            if slot.is_none() {
                *slot = Some(error);
            }
        }
        // Cancel the run; the remaining workers exit between tasks.
        self.stop();
    }
}

impl TaskRunner for ParallelRunner {
    fn run(&self, root: BoxedTask) -> Result<RunReport, TaskError> {
        self.termination_requested.store(false, Ordering::Relaxed);
        self.tasks_processed.store(0, Ordering::Relaxed);
        self.tasks_split.store(0, Ordering::Relaxed);
        self.outstanding_tasks.store(1, Ordering::Relaxed);

        self.pool.clear();
        self.pool.push(root);
        self.tasks_created.store(1, Ordering::Relaxed);

        let failure: Mutex<Option<TaskError>> = Mutex::new(None);
        let start = Instant::now();

        thread::scope(|scope| {
            for _ in 0..self.num_threads {
                scope.spawn(|| self.worker(&failure));
            }
            let _guard = self.idle_lock.lock().unwrap();
            self.idle_cv.notify_all();
        });

        let duration = start.elapsed();
        if let Some(error) = failure.into_inner().unwrap() {
            return Err(error);
        }

        let termination = if self.termination_requested.load(Ordering::Relaxed) {
            RunTermination::Interrupted
        } else {
            RunTermination::Completed
        };
        Ok(RunReport {
            termination,
            duration,
            tasks_created: self.tasks_created(),
            tasks_processed: self.tasks_processed(),
            tasks_split: self.tasks_split(),
            num_threads: self.num_threads,
        })
    }
}

impl std::fmt::Display for ParallelRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ParallelRunner(threads: {}, outstanding: {})",
            self.num_threads,
            self.outstanding_tasks()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Task, TaskPool};
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    /// A k-ary tree of depth `depth`; every leaf bumps a shared counter.
    struct TreeTask {
        depth: usize,
        fanout: usize,
        leaves: Arc<AtomicUsize>,
    }

    impl Task for TreeTask {
        fn split(&mut self, pool: &dyn TaskPool) -> Result<usize, TaskError> {
            if self.depth == 0 {
                return Ok(0);
            }
            for _ in 0..self.fanout {
                pool.push(Box::new(TreeTask {
                    depth: self.depth - 1,
                    fanout: self.fanout,
                    leaves: Arc::clone(&self.leaves),
                }))?;
            }
            Ok(self.fanout)
        }

        fn merge(&mut self, _pool: &dyn TaskPool) -> Result<(), TaskError> {
            Ok(())
        }

        fn solve(&mut self) -> Result<(), TaskError> {
            self.leaves.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }

        fn write(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "TreeTask(depth: {})", self.depth)
        }
    }

    fn tree(depth: usize, fanout: usize, leaves: &Arc<AtomicUsize>) -> BoxedTask {
        Box::new(TreeTask {
            depth,
            fanout,
            leaves: Arc::clone(leaves),
        })
    }

    #[test]
    fn test_runs_a_complete_tree_and_counts_add_up() {
        let leaves = Arc::new(AtomicUsize::new(0));
        let runner = ParallelRunner::new(4);
        let report = runner.run(tree(4, 3, &leaves)).unwrap();

        // 3^4 leaves, (3^5 - 1) / 2 tasks in total.
        assert_eq!(leaves.load(Ordering::Relaxed), 81);
        assert_eq!(report.termination, RunTermination::Completed);
        assert_eq!(report.tasks_created, 121);
        assert_eq!(report.tasks_processed, 81);
        assert_eq!(report.tasks_split, 40);
        assert_eq!(
            report.tasks_created,
            report.tasks_processed + report.tasks_split
        );
        assert_eq!(runner.outstanding_tasks(), 0);
    }

    #[test]
    fn test_single_thread_matches_multi_thread_counts() {
        let leaves_a = Arc::new(AtomicUsize::new(0));
        let leaves_b = Arc::new(AtomicUsize::new(0));

        let single = ParallelRunner::new(1);
        let report_a = single.run(tree(3, 4, &leaves_a)).unwrap();

        let multi = ParallelRunner::new(8);
        let report_b = multi.run(tree(3, 4, &leaves_b)).unwrap();

        assert_eq!(leaves_a.load(Ordering::Relaxed), 64);
        assert_eq!(leaves_b.load(Ordering::Relaxed), 64);
        assert_eq!(report_a.tasks_created, report_b.tasks_created);
        assert_eq!(report_a.tasks_processed, report_b.tasks_processed);
    }

    #[test]
    fn test_zero_threads_selects_at_least_four_workers() {
        let runner = ParallelRunner::new(0);
        assert!(runner.num_threads() >= 4);
    }

    #[test]
    fn test_rerunning_on_the_same_runner_resets_counters() {
        let leaves = Arc::new(AtomicUsize::new(0));
        let runner = ParallelRunner::new(2);

        let first = runner.run(tree(2, 2, &leaves)).unwrap();
        let second = runner.run(tree(2, 2, &leaves)).unwrap();
        assert_eq!(first.tasks_created, second.tasks_created);
        assert_eq!(first.tasks_processed, second.tasks_processed);
        assert_eq!(leaves.load(Ordering::Relaxed), 8);
    }

    #[test]
    fn test_task_error_cancels_the_run_and_propagates() {
        struct PoisonTask {
            poisoned: bool,
        }

        impl Task for PoisonTask {
            fn split(&mut self, pool: &dyn TaskPool) -> Result<usize, TaskError> {
                if self.poisoned {
                    return Ok(0);
                }
                for _ in 0..4 {
                    pool.push(Box::new(PoisonTask { poisoned: true }))?;
                }
                Ok(4)
            }

            fn merge(&mut self, _pool: &dyn TaskPool) -> Result<(), TaskError> {
                Ok(())
            }

            fn solve(&mut self) -> Result<(), TaskError> {
                Err("poisoned subtree".into())
            }

            fn write(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "PoisonTask")
            }
        }

        let runner = ParallelRunner::new(4);
        let err = runner
            .run(Box::new(PoisonTask { poisoned: false }))
            .unwrap_err();
        assert_eq!(err.to_string(), "poisoned subtree");
    }

    /// An unbounded tree that can only be ended through `stop()`.
    struct EndlessTask;

    impl Task for EndlessTask {
        fn split(&mut self, pool: &dyn TaskPool) -> Result<usize, TaskError> {
            thread::sleep(Duration::from_millis(1));
            for _ in 0..2 {
                pool.push(Box::new(EndlessTask))?;
            }
            Ok(2)
        }

        fn merge(&mut self, _pool: &dyn TaskPool) -> Result<(), TaskError> {
            Ok(())
        }

        fn solve(&mut self) -> Result<(), TaskError> {
            Ok(())
        }

        fn write(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "EndlessTask")
        }
    }

    #[test]
    fn test_stop_interrupts_a_running_search_and_joins_workers() {
        let runner = ParallelRunner::new(4);

        let report = thread::scope(|scope| {
            let stopper = scope.spawn(|| {
                thread::sleep(Duration::from_millis(100));
                runner.stop();
            });
            let report = runner.run(Box::new(EndlessTask)).unwrap();
            stopper.join().unwrap();
            report
        });

        // `run` returning proves every worker joined.
        assert_eq!(report.termination, RunTermination::Interrupted);
        assert!(report.tasks_split > 0, "the endless tree must have split");
    }

    #[test]
    fn test_stop_leftovers_are_cleared_by_the_next_run() {
        let runner = ParallelRunner::new(2);
        thread::scope(|scope| {
            scope.spawn(|| {
                thread::sleep(Duration::from_millis(20));
                runner.stop();
            });
            runner.run(Box::new(EndlessTask)).unwrap();
        });

        // The interrupted run may leave tasks in the pool; a fresh run
        // starts from a clean slate and completes normally.
        let leaves = Arc::new(AtomicUsize::new(0));
        let report = runner.run(tree(2, 2, &leaves)).unwrap();
        assert_eq!(report.termination, RunTermination::Completed);
        assert_eq!(leaves.load(Ordering::Relaxed), 4);
        assert_eq!(runner.outstanding_tasks(), 0);
    }
}
