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

use num_traits::{FromPrimitive, PrimInt, Signed};

/// A trait alias for the integer types that can be used as edge costs.
/// These are usually the signed integer types `i16`, `i32` and `i64`.
///
/// The shared incumbent bound is kept in an `AtomicI64`, so every cost type
/// must widen losslessly into `i64` (`Into<i64>`). Pruning comparisons are
/// performed in `i64` for the same reason.
///
/// # Note
///
/// `i128` is intentionally excluded: it does not widen into `i64`, and it is
/// significantly slower on many platforms.
pub trait CostNumeric:
    PrimInt
    + Signed
    + FromPrimitive
    + Into<i64>
    + Send
    + Sync
    + std::fmt::Debug
    + std::fmt::Display
    + 'static
{
}

impl<T> CostNumeric for T where
    T: PrimInt
        + Signed
        + FromPrimitive
        + Into<i64>
        + Send
        + Sync
        + std::fmt::Debug
        + std::fmt::Display
        + 'static
{
}
