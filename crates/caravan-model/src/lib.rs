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

//! # Caravan Model
//!
//! **The Core Domain Model for the Caravan Travelling-Salesman Solver.**
//!
//! This crate defines the data structures shared by every other crate in the
//! workspace. It is the interchange layer between problem input (TSPLIB
//! files) and the search engine (`caravan_bnb`).
//!
//! ## Module map
//!
//! * **`index`**: The strongly-typed `NodeIndex` wrapper that prevents raw
//!   `usize` indices from leaking through APIs.
//! * **`num`**: The `CostNumeric` trait alias describing the integer types
//!   usable as edge costs.
//! * **`graph`**: The `TspGraph` instance type (coordinates, symmetric
//!   distance matrix, TSPLIB loader) and the `MAX_GRAPH` limit.
//! * **`tour`**: The `Tour` witness type reported by the solver, including
//!   Hamiltonian-cycle verification.
//!
//! ## Design notes
//!
//! The distance matrix is stored as one flattened vector rather than nested
//! vectors to keep the hot `distance(a, b)` lookup a single indexed load.
//! Loaders validate eagerly so the search never observes an invalid instance.

pub mod graph;
pub mod index;
pub mod num;
pub mod tour;
