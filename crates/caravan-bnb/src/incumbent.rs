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

//! # Shared Incumbent (Best Tour Holder)
//!
//! A concurrent container for the best complete tour discovered so far. It
//! has two concurrency tiers matching how the search reads it:
//!
//! - `upper_bound` is an atomic cost consulted on every pruning decision; it
//!   is read with relaxed ordering because the bound is monotonically
//!   non-increasing, so a stale read is merely a slightly looser bound,
//!   never an incorrect one.
//! - the witness tour is read only at the end of a run and lives behind a
//!   `Mutex`.
//!
//! Installation uses a compare-and-swap loop on the bound: while the
//! candidate is strictly better, attempt to install its cost. The
//! check-then-update pattern is sound precisely because the bound never
//! increases; a failed CAS just retries against the newer, tighter bound.

use caravan_model::{num::CostNumeric, tour::Tour};
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Mutex,
};

/// A concurrent holder for the best (incumbent) tour found during search.
///
/// The bound starts at `i64::MAX`, meaning "no incumbent yet". Every cost
/// type widens losslessly into `i64` (see `CostNumeric`), so the sentinel is
/// unambiguous.
#[derive(Debug)]
pub struct SharedIncumbent<T> {
    best_cost: AtomicI64,
    best_tour: Mutex<Option<Tour<T>>>,
}

impl<T> SharedIncumbent<T>
where
    T: CostNumeric,
{
    /// Creates a new shared incumbent with no tour installed.
    #[inline]
    pub fn new() -> Self {
        Self {
            best_cost: AtomicI64::new(i64::MAX),
            best_tour: Mutex::new(None),
        }
    }

    /// Returns the current upper bound. Cheap enough for the hot path.
    #[inline]
    pub fn upper_bound(&self) -> i64 {
        self.best_cost.load(Ordering::Relaxed)
    }

    /// Returns a clone of the current witness tour, if any.
    #[inline]
    pub fn snapshot(&self) -> Option<Tour<T>> {
        self.best_tour.lock().unwrap().clone()
    }

    /// Attempts to install `candidate` as the new incumbent. Returns `true`
    /// if the candidate won the bound.
    pub fn try_install(&self, candidate: &Tour<T>) -> bool {
        let cost: i64 = candidate.cost().into();
        let mut current = self.best_cost.load(Ordering::Relaxed);
        while cost < current {
            match self.best_cost.compare_exchange_weak(
                current,
                cost,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    let mut witness = self.best_tour.lock().unwrap();
                    // A cheaper winner may reach the lock first; the witness
                    // must never regress past it.
                    let keep_existing = witness
                        .as_ref()
                        .map_or(false, |tour| Into::<i64>::into(tour.cost()) <= cost);
                    if !keep_existing {
                        *witness = Some(candidate.clone());
                    }
                    return true;
                }
                Err(actual) => current = actual,
            }
        }
        false
    }
}

impl<T> Default for SharedIncumbent<T>
where
    T: CostNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Display for SharedIncumbent<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Incumbent(upper_bound: {})",
            self.best_cost.load(Ordering::Relaxed)
        )
    }
}
