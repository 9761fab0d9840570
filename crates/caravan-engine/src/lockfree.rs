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

//! # Lock-Free Work Pool (Treiber Stack)
//!
//! A LIFO pool of task handles shared by all parallel workers. `push` and
//! `pop` are linearizable compare-and-swap loops on a single atomic head;
//! `pop` on an empty pool returns `None` without blocking.
//!
//! ## Reclamation and ABA
//!
//! A popped node cannot be freed immediately: a concurrent popper may have
//! loaded the old head and be about to dereference its `next` link. Nodes
//! are therefore retired through `crossbeam::epoch` and destroyed only once
//! every thread has passed a quiescent point. Deferred reclamation also
//! closes the classic ABA window: a head pointer can never be observed,
//! recycled, and re-observed at the same address within one pinned epoch, so
//! no version counter is needed alongside the pointer.
//!
//! ## Ordering
//!
//! The successful `push` CAS uses release ordering and the `pop` loads and
//! successful CAS use acquire / acquire-release, which publishes the payload
//! of a pushed node to whichever thread pops it.

use crate::task::{BoxedTask, PoolError, TaskPool};
use crossbeam::epoch::{self, Atomic, Owned, Shared};
use std::{
    mem::ManuallyDrop,
    ptr,
    sync::atomic::{AtomicIsize, Ordering},
};

struct Node {
    // The task is moved out by the popper that wins the CAS; `ManuallyDrop`
    // keeps the deferred node destruction from dropping it a second time.
    task: ManuallyDrop<BoxedTask>,
    next: Atomic<Node>,
}

/// The lock-free LIFO work pool.
///
/// The size counter is maintained with relaxed operations and is advisory
/// only: it is eventually consistent with the contents and must never drive
/// a correctness decision. Emptiness checks read the head pointer instead.
pub struct LockFreePool {
    head: Atomic<Node>,
    len: AtomicIsize,
}

// Safety: tasks stored in the pool are `Send` (`BoxedTask` requires it), and
// a task is only ever touched by the single popper that won the head CAS, so
// sharing the pool between threads cannot alias a task.
unsafe impl Send for LockFreePool {}
unsafe impl Sync for LockFreePool {}

impl LockFreePool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self {
            head: Atomic::null(),
            len: AtomicIsize::new(0),
        }
    }

    /// Pushes a task onto the pool, transferring ownership to it.
    pub fn push(&self, task: BoxedTask) {
        let mut node = Owned::new(Node {
            task: ManuallyDrop::new(task),
            next: Atomic::null(),
        });
        let guard = epoch::pin();
        loop {
            let head = self.head.load(Ordering::Acquire, &guard);
            node.next.store(head, Ordering::Relaxed);
            match self.head.compare_exchange(
                head,
                node,
                Ordering::Release,
                Ordering::Relaxed,
                &guard,
            ) {
                Ok(_) => {
                    self.len.fetch_add(1, Ordering::Relaxed);
                    return;
                }
                Err(e) => node = e.new,
            }
        }
    }

    /// Pops the most recently pushed task, or `None` if the pool is empty.
    pub fn pop(&self) -> Option<BoxedTask> {
        let guard = epoch::pin();
        loop {
            let head = self.head.load(Ordering::Acquire, &guard);
            let node = unsafe { head.as_ref() }?;
            let next = node.next.load(Ordering::Acquire, &guard);
            if self
                .head
                .compare_exchange(head, next, Ordering::AcqRel, Ordering::Acquire, &guard)
                .is_ok()
            {
                self.len.fetch_sub(1, Ordering::Relaxed);
                // Safety: winning the CAS makes this thread the exclusive
                // owner of `node`; the task is moved out exactly once and
                // the node itself is reclaimed at the next quiescent point.
                unsafe {
                    let task = ManuallyDrop::into_inner(ptr::read(&node.task));
                    guard.defer_destroy(head);
                    return Some(task);
                }
            }
        }
    }

    /// Detaches the whole chain atomically and drops every resident task.
    pub fn clear(&self) {
        let guard = epoch::pin();
        let mut head = self.head.swap(Shared::null(), Ordering::AcqRel, &guard);
        let mut drained = 0isize;
        while let Some(node) = unsafe { head.as_ref() } {
            let next = node.next.load(Ordering::Relaxed, &guard);
            // Safety: the swap detached the chain, so no popper can win a
            // CAS on these nodes anymore; the tasks are exclusively ours.
            unsafe {
                drop(ManuallyDrop::into_inner(ptr::read(&node.task)));
                guard.defer_destroy(head);
            }
            drained += 1;
            head = next;
        }
        if drained > 0 {
            self.len.fetch_sub(drained, Ordering::Relaxed);
        }
    }

    /// Returns `true` if the pool holds no tasks. Unlike `len`, this reads
    /// the head pointer and is exact at its linearization point.
    pub fn is_empty(&self) -> bool {
        let guard = epoch::pin();
        self.head.load(Ordering::Acquire, &guard).is_null()
    }

    /// Returns the advisory size counter.
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed).max(0) as usize
    }
}

impl Default for LockFreePool {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LockFreePool {
    fn drop(&mut self) {
        self.clear();
    }
}

impl TaskPool for LockFreePool {
    fn size(&self) -> usize {
        LockFreePool::len(self)
    }

    fn push(&self, task: BoxedTask) -> Result<(), PoolError> {
        LockFreePool::push(self, task);
        Ok(())
    }

    fn pop(&self) -> Result<Option<BoxedTask>, PoolError> {
        Ok(LockFreePool::pop(self))
    }

    fn take(&self, _index: usize) -> Result<BoxedTask, PoolError> {
        Err(PoolError::UnsupportedAccess)
    }

    fn clear(&self) {
        LockFreePool::clear(self);
    }

    fn is_empty(&self) -> bool {
        LockFreePool::is_empty(self)
    }
}

impl std::fmt::Display for LockFreePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LockFreePool(len: {})", self.len())
    }
}
