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

//! Problem instance type and loader for the symmetric Euclidean TSP.
//!
//! A `TspGraph` holds the city coordinates and a precomputed symmetric
//! distance matrix. Instances are loaded from TSPLIB-format files containing
//! at least a `DIMENSION` header and a `NODE_COORD_SECTION` of
//! `<index> <x> <y>` lines terminated by `EOF`. Distances are Euclidean,
//! rounded to the nearest integer (the TSPLIB `EUC_2D` convention).
//!
//! The loader validates eagerly and reports descriptive errors; the search
//! engine never sees a partially constructed instance.

use crate::{index::NodeIndex, num::CostNumeric};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

/// The largest instance the search can handle. This is the capacity of the
/// search path's membership bitmap.
pub const MAX_GRAPH: usize = 32;

/// The designated starting node of every tour.
pub const FIRST_NODE: NodeIndex = NodeIndex::new(0);

/// A city coordinate as read from the instance file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// The error type for instance loading and construction.
#[derive(Debug)]
pub enum GraphFileError {
    /// An I/O error occurred while reading the instance file.
    Io(std::io::Error),
    /// The `DIMENSION` header is missing or does not carry a positive integer.
    MissingDimension,
    /// The `NODE_COORD_SECTION` header is missing.
    MissingCoordSection,
    /// A coordinate line names a city index outside `1..=dimension`.
    InvalidCityIndex { index: i64, dimension: usize },
    /// The number of coordinate lines does not match the declared dimension.
    CoordCountMismatch { expected: usize, found: usize },
    /// A computed distance does not fit into the chosen cost type.
    DistanceOverflow { from: usize, to: usize },
}

impl std::fmt::Display for GraphFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::MissingDimension => write!(f, "Invalid or missing DIMENSION header"),
            Self::MissingCoordSection => write!(f, "Missing NODE_COORD_SECTION"),
            Self::InvalidCityIndex { index, dimension } => write!(
                f,
                "Invalid city index {} (instance dimension is {})",
                index, dimension
            ),
            Self::CoordCountMismatch { expected, found } => write!(
                f,
                "Coordinate count mismatch: expected {} cities, found {}",
                expected, found
            ),
            Self::DistanceOverflow { from, to } => write!(
                f,
                "Distance between cities {} and {} does not fit the cost type",
                from, to
            ),
        }
    }
}

impl std::error::Error for GraphFileError {}

impl From<std::io::Error> for GraphFileError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// A symmetric Euclidean TSP instance.
///
/// The distance matrix is flattened row-major with a fixed stride, so
/// `distance(a, b)` is a single indexed load. Truncating the instance to its
/// first `n` cities only moves the logical size; the matrix keeps its
/// original stride, which keeps truncation O(1).
///
/// Invariants:
/// - `dist[a * stride + b] == dist[b * stride + a]` (symmetry)
/// - `dist[i * stride + i] == 0`
/// - all distances are non-negative
#[derive(Debug, Clone)]
pub struct TspGraph<T> {
    coords: Vec<Point>,
    dist: Vec<T>,
    stride: usize,
    len: usize,
    name: String,
}

impl<T> TspGraph<T>
where
    T: CostNumeric,
{
    /// Builds an instance from raw coordinates.
    ///
    /// Distances are Euclidean rounded to the nearest integer. Fails with
    /// `DistanceOverflow` if any rounded distance does not fit into `T`.
    pub fn from_coords(points: &[(f64, f64)], name: &str) -> Result<Self, GraphFileError> {
        let coords: Vec<Point> = points.iter().map(|&(x, y)| Point { x, y }).collect();
        Self::from_points(coords, name)
    }

    fn from_points(coords: Vec<Point>, name: &str) -> Result<Self, GraphFileError> {
        let n = coords.len();
        let mut dist = vec![T::zero(); n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = euc2d::<T>(coords[i], coords[j])
                    .ok_or(GraphFileError::DistanceOverflow { from: i, to: j })?;
                dist[i * n + j] = d;
                dist[j * n + i] = d;
            }
        }
        Ok(Self {
            coords,
            dist,
            stride: n,
            len: n,
            name: name.to_string(),
        })
    }

    /// Loads an instance from a TSPLIB-format file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, GraphFileError> {
        let name = path.as_ref().display().to_string();
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), &name)
    }

    /// Loads an instance from any buffered reader.
    ///
    /// The reader must contain a `DIMENSION` header carrying a positive
    /// integer and a `NODE_COORD_SECTION` of `<index> <x> <y>` lines
    /// (1-based indices) terminated by `EOF`. Lines inside the coordinate
    /// section that do not parse as a coordinate triple are ignored.
    pub fn from_reader<R: BufRead>(reader: R, name: &str) -> Result<Self, GraphFileError> {
        let mut lines = reader.lines();

        let mut dimension: usize = 0;
        let mut in_coord_section = false;
        for line in lines.by_ref() {
            let line = line?;
            if line.contains("DIMENSION") {
                dimension = parse_trailing_integer(&line).unwrap_or(0);
            }
            if line.contains("NODE_COORD_SECTION") {
                in_coord_section = true;
                break;
            }
        }
        if dimension == 0 {
            return Err(GraphFileError::MissingDimension);
        }
        if !in_coord_section {
            return Err(GraphFileError::MissingCoordSection);
        }

        let mut coords = vec![Point { x: 0.0, y: 0.0 }; dimension];
        let mut count = 0usize;
        for line in lines {
            let line = line?;
            if line.trim() == "EOF" {
                break;
            }
            if line.trim().is_empty() {
                continue;
            }
            let Some((index, point)) = parse_coord_line(&line) else {
                continue;
            };
            if index < 1 || index > dimension as i64 {
                return Err(GraphFileError::InvalidCityIndex { index, dimension });
            }
            coords[(index - 1) as usize] = point;
            count += 1;
        }
        if count != dimension {
            return Err(GraphFileError::CoordCountMismatch {
                expected: dimension,
                found: count,
            });
        }

        Self::from_points(coords, name)
    }

    /// Returns the number of active cities.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the instance has no cities.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the instance name (usually the source file path).
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the coordinate of the given city.
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of bounds.
    #[inline]
    pub fn coord(&self, node: NodeIndex) -> Point {
        self.coords[node.get()]
    }

    /// Returns the distance between two cities.
    ///
    /// The matrix is symmetric, non-negative, and `distance(i, i) == 0`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds. In debug builds the bounds
    /// are checked against the active (possibly truncated) size.
    #[inline]
    pub fn distance(&self, a: NodeIndex, b: NodeIndex) -> T {
        debug_assert!(
            a.get() < self.len,
            "called `TspGraph::distance` with node index out of bounds: the len is {} but the index is {}",
            self.len,
            a.get()
        );
        debug_assert!(
            b.get() < self.len,
            "called `TspGraph::distance` with node index out of bounds: the len is {} but the index is {}",
            self.len,
            b.get()
        );
        self.dist[a.get() * self.stride + b.get()]
    }

    /// Truncates the instance to its first `n` cities.
    ///
    /// A no-op unless `0 < n < len`. The distance matrix is untouched; only
    /// the logical size shrinks.
    #[inline]
    pub fn truncate(&mut self, n: usize) {
        if n > 0 && n < self.len {
            self.len = n;
        }
    }
}

impl<T> std::fmt::Display for TspGraph<T>
where
    T: CostNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "TSP graph {} ({} cities)", self.name, self.len)?;
        let n = self.len;
        for i in 0..n {
            writeln!(
                f,
                " point {} {{ x: {}, y: {} }}",
                i, self.coords[i].x, self.coords[i].y
            )?;
        }
        // Column width follows the widest distance in the active instance.
        let mut max: i64 = 0;
        for i in 0..n {
            for j in (i + 1)..n {
                let d: i64 = self.dist[i * self.stride + j].into();
                if d > max {
                    max = d;
                }
            }
        }
        let width = max.to_string().len() + 1;
        write!(f, "  ")?;
        for j in (1..n).rev() {
            write!(f, "{:>width$}", j, width = width)?;
        }
        writeln!(f)?;
        for i in 0..n.saturating_sub(1) {
            write!(f, "{:>3}", i)?;
            for j in ((i + 1)..n).rev() {
                write!(f, "{:>width$}", self.dist[i * self.stride + j], width = width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Extracts the first run of digits from a header line like `DIMENSION: 48`.
fn parse_trailing_integer(line: &str) -> Option<usize> {
    let digits: String = line
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Parses one `<index> <x> <y>` coordinate line. Returns `None` for lines
/// that do not carry a full triple.
fn parse_coord_line(line: &str) -> Option<(i64, Point)> {
    let mut tokens = line.split_whitespace();
    let index: i64 = tokens.next()?.parse().ok()?;
    let x: f64 = tokens.next()?.parse().ok()?;
    let y: f64 = tokens.next()?.parse().ok()?;
    Some((index, Point { x, y }))
}

/// Euclidean distance rounded to the nearest integer (TSPLIB `EUC_2D`).
fn euc2d<T: CostNumeric>(a: Point, b: Point) -> Option<T> {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    T::from_f64((dx * dx + dy * dy).sqrt().round())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = "\
NAME: square
TYPE: TSP
DIMENSION: 4
EDGE_WEIGHT_TYPE: EUC_2D
NODE_COORD_SECTION
1 0 0
2 0 10
3 10 10
4 10 0
EOF
";

    fn square_graph() -> TspGraph<i32> {
        TspGraph::from_reader(SQUARE.as_bytes(), "square").expect("square instance should load")
    }

    #[test]
    fn test_load_square_instance() {
        let graph = square_graph();
        assert_eq!(graph.len(), 4);
        assert!(!graph.is_empty());
        assert_eq!(graph.name(), "square");
        assert_eq!(graph.coord(NodeIndex::new(2)), Point { x: 10.0, y: 10.0 });
    }

    #[test]
    fn test_distances_are_symmetric_and_zero_on_diagonal() {
        let graph = square_graph();
        for i in 0..4 {
            let a = NodeIndex::new(i);
            assert_eq!(graph.distance(a, a), 0);
            for j in 0..4 {
                let b = NodeIndex::new(j);
                assert_eq!(graph.distance(a, b), graph.distance(b, a));
                assert!(graph.distance(a, b) >= 0);
            }
        }
        // Sides are 10, diagonals round(sqrt(200)) = 14.
        assert_eq!(graph.distance(NodeIndex::new(0), NodeIndex::new(1)), 10);
        assert_eq!(graph.distance(NodeIndex::new(0), NodeIndex::new(2)), 14);
    }

    #[test]
    fn test_from_coords_matches_loader() {
        let loaded = square_graph();
        let built =
            TspGraph::<i32>::from_coords(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)], "square")
                .expect("square coords should build");
        for i in 0..4 {
            for j in 0..4 {
                let (a, b) = (NodeIndex::new(i), NodeIndex::new(j));
                assert_eq!(loaded.distance(a, b), built.distance(a, b));
            }
        }
    }

    #[test]
    fn test_missing_dimension_is_rejected() {
        let text = "NODE_COORD_SECTION\n1 0 0\nEOF\n";
        let err = TspGraph::<i32>::from_reader(text.as_bytes(), "broken").unwrap_err();
        assert!(matches!(err, GraphFileError::MissingDimension));
    }

    #[test]
    fn test_missing_coord_section_is_rejected() {
        let text = "DIMENSION: 3\n";
        let err = TspGraph::<i32>::from_reader(text.as_bytes(), "broken").unwrap_err();
        assert!(matches!(err, GraphFileError::MissingCoordSection));
    }

    #[test]
    fn test_coordinate_count_mismatch_is_rejected() {
        let text = "DIMENSION: 3\nNODE_COORD_SECTION\n1 0 0\n2 1 1\nEOF\n";
        let err = TspGraph::<i32>::from_reader(text.as_bytes(), "broken").unwrap_err();
        assert!(matches!(
            err,
            GraphFileError::CoordCountMismatch {
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_out_of_range_city_index_is_rejected() {
        let text = "DIMENSION: 2\nNODE_COORD_SECTION\n1 0 0\n5 1 1\nEOF\n";
        let err = TspGraph::<i32>::from_reader(text.as_bytes(), "broken").unwrap_err();
        assert!(matches!(
            err,
            GraphFileError::InvalidCityIndex {
                index: 5,
                dimension: 2
            }
        ));
    }

    #[test]
    fn test_unparsable_coordinate_lines_are_skipped() {
        let text = "DIMENSION: 2\nNODE_COORD_SECTION\nCOMMENT not a coordinate\n1 0 0\n2 3 4\nEOF\n";
        let graph = TspGraph::<i32>::from_reader(text.as_bytes(), "ok").unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.distance(NodeIndex::new(0), NodeIndex::new(1)), 5);
    }

    #[test]
    fn test_truncate_shrinks_logical_size_only() {
        let mut graph = square_graph();
        graph.truncate(2);
        assert_eq!(graph.len(), 2);
        // Remaining distances are unchanged.
        assert_eq!(graph.distance(NodeIndex::new(0), NodeIndex::new(1)), 10);

        // Out-of-range truncations are no-ops.
        graph.truncate(0);
        assert_eq!(graph.len(), 2);
        graph.truncate(10);
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_display_contains_points_and_distances() {
        let graph = square_graph();
        let text = format!("{}", graph);
        assert!(text.contains("TSP graph square (4 cities)"));
        assert!(text.contains("point 0"));
        assert!(text.contains("14"));
    }

    #[test]
    fn test_display_error_messages_are_single_line() {
        let err = GraphFileError::CoordCountMismatch {
            expected: 4,
            found: 2,
        };
        let text = format!("{}", err);
        assert!(!text.contains('\n'));
        assert!(text.contains("expected 4"));
    }
}
