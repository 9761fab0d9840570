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

//! # Caravan BnB
//!
//! **Branch-and-bound travelling-salesman search over the task runtime.**
//!
//! The search explores the permutation tree of an instance as a forest of
//! divisible tasks. Every task carries a partial tour; `split` bears one
//! child per promising extension until the cutoff depth, below which `solve`
//! exhausts the remaining subtree inline. Subtrees whose lower bound cannot
//! beat the shared incumbent are pruned.
//!
//! Results flow exclusively through the incumbent: a task that completes a
//! better tour installs it; parents aggregate nothing, so `merge` is a
//! no-op.
//!
//! ## Module map
//!
//! - `path`: the mutable partial tour (`SearchPath`) with O(1) membership
//!   tests and incremental distance bookkeeping.
//! - `incumbent`: the shared best-tour holder (`SharedIncumbent`) with a
//!   lock-free cost bound and a mutex-guarded witness.
//! - `context`: the per-search shared state (`SearchContext`) passed to
//!   every task, replacing the process-wide globals a naive port would use.
//! - `task`: the search task itself (`TourSearchTask`).

pub mod context;
pub mod incumbent;
pub mod path;
pub mod task;
