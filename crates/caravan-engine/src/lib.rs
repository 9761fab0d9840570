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

//! # Caravan Engine
//!
//! **A runtime for divisible tasks with split/solve/merge semantics.**
//!
//! This crate knows nothing about travelling salesmen. It defines a contract
//! for units of work that can either subdivide themselves into child tasks or
//! solve themselves inline, plus the pools and runners that execute them.
//!
//! ## Core flow
//!
//! A runner receives a root task and drives it through the contract: `split`
//! is asked first; if it enqueued children the parent is retired, otherwise
//! `solve` runs the task to completion. The parallel runner shares a
//! lock-free pool between a fixed set of worker threads and detects
//! termination through an outstanding-work counter.
//!
//! ## Module map
//!
//! - `task`: the `Task` and `TaskPool` contracts, pool errors, the bounded
//!   reference stack, and the `TaskRunner` trait.
//! - `lockfree`: the Treiber-stack work pool shared by the parallel workers.
//! - `sequential`: single-threaded runners used for baselining (`DirectRunner`
//!   runs `solve` inline; `PartitionedRunner` drives the full contract
//!   recursively).
//! - `parallel`: the multi-worker runner with cooperative cancellation.
//! - `report`: the outcome summary returned by every runner.
//!
//! ## Ownership model
//!
//! Tasks move: a pool owns every task resident in it, and a worker that pops
//! a task owns it until the task has been split (children pushed, parent
//! dropped) or solved (dropped). No task is ever reachable from two owners,
//! which is what makes the lock-free pool's reclamation story tractable.

pub mod lockfree;
pub mod parallel;
pub mod report;
pub mod sequential;
pub mod task;
