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

use crate::report::RunReport;
use std::sync::Mutex;

/// A heap-allocated task handle. Pools and runners exchange tasks through
/// this type; ownership transfers on every push and pop.
pub type BoxedTask = Box<dyn Task>;

/// The error type surfaced by task execution.
///
/// Runners cannot know the concrete error types of the task implementations
/// they drive, so failures cross the `dyn Task` boundary boxed. Pool errors
/// convert into this type through the blanket `From` for boxed errors.
pub type TaskError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A divisible unit of work.
///
/// Runners call `split` first. If it pushed children the parent is retired
/// without being solved; if it returned 0 the runner calls `solve`. Exactly
/// one of the two runs for every task.
pub trait Task: Send {
    /// Either pushes `n >= 1` freshly-owned child tasks onto `pool` and
    /// returns `n`, or pushes nothing and returns 0 to indicate that this
    /// task is a leaf and must be solved inline.
    ///
    /// `split` must not call `solve`.
    fn split(&mut self, pool: &dyn TaskPool) -> Result<usize, TaskError>;

    /// Optional post-split hook invoked by recursive runners after all
    /// children have been processed. The children are re-presented through
    /// `pool`; implementations that aggregate nothing leave it untouched.
    fn merge(&mut self, pool: &dyn TaskPool) -> Result<(), TaskError>;

    /// Computes the task's result, running the remaining work to completion
    /// inline without creating further tasks.
    fn solve(&mut self) -> Result<(), TaskError>;

    /// Writes a human-readable dump of the task.
    fn write(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result;
}

impl std::fmt::Display for dyn Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.write(f)
    }
}

/// The error type for pool operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// `pop` or `take` found no task at the requested position.
    Exhausted,
    /// `push` on a bounded pool that is at capacity.
    Full { capacity: usize },
    /// The pool does not support positional access.
    UnsupportedAccess,
}

impl std::fmt::Display for PoolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exhausted => write!(f, "Task pool exhausted"),
            Self::Full { capacity } => {
                write!(f, "Task pool full (capacity {})", capacity)
            }
            Self::UnsupportedAccess => {
                write!(f, "Indexed access is not supported by this task pool")
            }
        }
    }
}

impl std::error::Error for PoolError {}

/// A container of owned task handles.
///
/// Implementations differ in their concurrency story: the bounded stack is a
/// mutex-guarded LIFO for single-threaded recursive runners, the lock-free
/// pool is shared by all parallel workers. Both transfer ownership on push
/// and pop.
pub trait TaskPool: Send + Sync {
    /// Returns the number of resident tasks. For concurrent pools this is
    /// advisory only and must never be used for correctness decisions.
    fn size(&self) -> usize;

    /// Pushes a task, transferring ownership to the pool.
    fn push(&self, task: BoxedTask) -> Result<(), PoolError>;

    /// Pops the most recently pushed task.
    ///
    /// Concurrent pools answer an empty pool with `Ok(None)`; the bounded
    /// reference stack treats it as `PoolError::Exhausted`.
    fn pop(&self) -> Result<Option<BoxedTask>, PoolError>;

    /// Removes and returns the task at `index`, counted from the bottom.
    ///
    /// Pools without a stable positional order answer
    /// `PoolError::UnsupportedAccess`; an out-of-range index is
    /// `PoolError::Exhausted`.
    fn take(&self, index: usize) -> Result<BoxedTask, PoolError>;

    /// Removes and drops every resident task.
    fn clear(&self);

    /// Returns `true` if the pool holds no tasks.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

/// Drives a root task to completion and summarizes the run.
pub trait TaskRunner {
    /// Runs `root`, blocking until the whole task tree has been handled,
    /// the runner was cancelled, or a task failed.
    fn run(&self, root: BoxedTask) -> Result<RunReport, TaskError>;
}

/// A bounded, mutex-guarded LIFO task stack.
///
/// This is the reference pool used by the single-threaded recursive runner.
/// It enforces its capacity strictly: pushing beyond it fails with
/// `PoolError::Full` and popping an empty stack fails with
/// `PoolError::Exhausted`.
pub struct BoundedTaskStack {
    items: Mutex<Vec<BoxedTask>>,
    capacity: usize,
}

impl BoundedTaskStack {
    /// Creates a stack holding at most `capacity` tasks.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
        }
    }

    /// Returns the capacity this stack was created with.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl TaskPool for BoundedTaskStack {
    fn size(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    fn push(&self, task: BoxedTask) -> Result<(), PoolError> {
        let mut items = self.items.lock().unwrap();
        if items.len() >= self.capacity {
            return Err(PoolError::Full {
                capacity: self.capacity,
            });
        }
        items.push(task);
        Ok(())
    }

    fn pop(&self) -> Result<Option<BoxedTask>, PoolError> {
        let mut items = self.items.lock().unwrap();
        match items.pop() {
            Some(task) => Ok(Some(task)),
            None => Err(PoolError::Exhausted),
        }
    }

    fn take(&self, index: usize) -> Result<BoxedTask, PoolError> {
        let mut items = self.items.lock().unwrap();
        if index >= items.len() {
            return Err(PoolError::Exhausted);
        }
        Ok(items.remove(index))
    }

    fn clear(&self) {
        self.items.lock().unwrap().clear();
    }
}

impl std::fmt::Display for BoundedTaskStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BoundedTaskStack(size: {}, capacity: {})",
            self.size(),
            self.capacity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LabelTask {
        label: usize,
    }

    impl Task for LabelTask {
        fn split(&mut self, _pool: &dyn TaskPool) -> Result<usize, TaskError> {
            Ok(0)
        }

        fn merge(&mut self, _pool: &dyn TaskPool) -> Result<(), TaskError> {
            Ok(())
        }

        fn solve(&mut self) -> Result<(), TaskError> {
            Ok(())
        }

        fn write(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "LabelTask({})", self.label)
        }
    }

    fn label(label: usize) -> BoxedTask {
        Box::new(LabelTask { label })
    }

    fn label_of(task: &BoxedTask) -> usize {
        format!("{}", &**task)
            .trim_start_matches("LabelTask(")
            .trim_end_matches(')')
            .parse()
            .unwrap()
    }

    #[test]
    fn test_push_pop_is_lifo() {
        let stack = BoundedTaskStack::new(4);
        stack.push(label(1)).unwrap();
        stack.push(label(2)).unwrap();
        stack.push(label(3)).unwrap();
        assert_eq!(stack.size(), 3);

        let popped = stack.pop().unwrap().unwrap();
        assert_eq!(label_of(&popped), 3);
        let popped = stack.pop().unwrap().unwrap();
        assert_eq!(label_of(&popped), 2);
        let popped = stack.pop().unwrap().unwrap();
        assert_eq!(label_of(&popped), 1);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_pop_on_empty_stack_is_exhausted() {
        let stack = BoundedTaskStack::new(2);
        assert!(matches!(stack.pop(), Err(PoolError::Exhausted)));
    }

    #[test]
    fn test_push_beyond_capacity_is_full() {
        let stack = BoundedTaskStack::new(2);
        stack.push(label(1)).unwrap();
        stack.push(label(2)).unwrap();
        let err = stack.push(label(3)).unwrap_err();
        assert_eq!(err, PoolError::Full { capacity: 2 });
        assert_eq!(stack.size(), 2);
    }

    #[test]
    fn test_take_removes_by_position_from_bottom() {
        let stack = BoundedTaskStack::new(4);
        stack.push(label(10)).unwrap();
        stack.push(label(20)).unwrap();
        stack.push(label(30)).unwrap();

        let taken = stack.take(1).unwrap();
        assert_eq!(label_of(&taken), 20);
        assert_eq!(stack.size(), 2);

        assert!(matches!(stack.take(5), Err(PoolError::Exhausted)));
    }

    #[test]
    fn test_clear_empties_the_stack() {
        let stack = BoundedTaskStack::new(4);
        stack.push(label(1)).unwrap();
        stack.push(label(2)).unwrap();
        stack.clear();
        assert!(stack.is_empty());
        assert!(matches!(stack.pop(), Err(PoolError::Exhausted)));
    }

    #[test]
    fn test_display_reports_size_and_capacity() {
        let stack = BoundedTaskStack::new(8);
        stack.push(label(1)).unwrap();
        assert_eq!(
            format!("{}", stack),
            "BoundedTaskStack(size: 1, capacity: 8)"
        );
    }

    #[test]
    fn test_pool_error_display_is_single_line() {
        for err in [
            PoolError::Exhausted,
            PoolError::Full { capacity: 3 },
            PoolError::UnsupportedAccess,
        ] {
            assert!(!format!("{}", err).contains('\n'));
        }
    }
}
