//! Reference geometries and coordinates in their reference domains.
use crate::error::{Result, UnsupportedError};
use std::fmt;

/// Default tolerance used when testing whether a point lies in a reference domain
pub const DOMAIN_TOL: f64 = 1e-12;

/// Edges of the reference triangle, each from its lower to its higher vertex
pub const TRIANGLE_EDGES: [[usize; 2]; 3] = [[0, 1], [1, 2], [0, 2]];

/// The shape of a reference domain
///
/// Only [Geometry::Point], [Geometry::Segment] and [Geometry::Triangle] are populated by
/// Lagrange collections; the remaining variants are reserved slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Geometry {
    Point,
    Segment,
    Triangle,
    Square,
    Tetrahedron,
    Cube,
    Prism,
    Pyramid,
}

impl Geometry {
    /// Number of geometry types
    pub const COUNT: usize = 8;

    /// Every geometry type, in index order
    pub const ALL: [Geometry; Self::COUNT] = [
        Self::Point,
        Self::Segment,
        Self::Triangle,
        Self::Square,
        Self::Tetrahedron,
        Self::Cube,
        Self::Prism,
        Self::Pyramid,
    ];

    /// Position of this geometry in [Geometry::ALL]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Topological dimension of the reference domain
    pub const fn dim(self) -> usize {
        match self {
            Self::Point => 0,
            Self::Segment => 1,
            Self::Triangle | Self::Square => 2,
            Self::Tetrahedron | Self::Cube | Self::Prism | Self::Pyramid => 3,
        }
    }

    pub const fn num_vertices(self) -> usize {
        match self {
            Self::Point => 1,
            Self::Segment => 2,
            Self::Triangle => 3,
            Self::Square | Self::Tetrahedron => 4,
            Self::Pyramid => 5,
            Self::Prism => 6,
            Self::Cube => 8,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Point => "Point",
            Self::Segment => "Segment",
            Self::Triangle => "Triangle",
            Self::Square => "Square",
            Self::Tetrahedron => "Tetrahedron",
            Self::Cube => "Cube",
            Self::Prism => "Prism",
            Self::Pyramid => "Pyramid",
        }
    }

    /// Vertices of the reference domain
    ///
    /// ```text
    ///  Segment:            Triangle:
    ///                       2
    ///                       *
    ///                       | \
    ///  0 *-------* 1        |   \
    ///                       *-----*
    ///                       0      1
    /// ```
    pub fn reference_vertices(self) -> Result<Vec<Point>> {
        match self {
            Self::Point => Ok(vec![Point::at(0.0, 0.0)]),
            Self::Segment => Ok(vec![Point::at(0.0, 0.0), Point::at(1.0, 0.0)]),
            Self::Triangle => Ok(vec![
                Point::at(0.0, 0.0),
                Point::at(1.0, 0.0),
                Point::at(0.0, 1.0),
            ]),
            _ => Err(UnsupportedError::Geometry(self).into()),
        }
    }

    /// Vertex pairs of the reference edges
    ///
    /// Each pair runs from the lower to the higher vertex index, the direction in which the
    /// edge's interior nodes are listed. The triangle's third edge is the one opposite vertex 1.
    pub fn reference_edges(self) -> Result<&'static [[usize; 2]]> {
        match self {
            Self::Point => Ok(&[]),
            Self::Segment => Ok(&[[0, 1]]),
            Self::Triangle => Ok(&TRIANGLE_EDGES),
            _ => Err(UnsupportedError::Geometry(self).into()),
        }
    }

    /// Check whether `point` lies in the closed reference domain (within `tol`)
    pub fn contains(self, point: &Point, tol: f64) -> Result<bool> {
        match self {
            Self::Point => Ok(point.x.abs() <= tol && point.y.abs() <= tol),
            Self::Segment => Ok(point.x >= -tol && point.x <= 1.0 + tol),
            Self::Triangle => {
                Ok(point.x >= -tol && point.y >= -tol && point.x + point.y <= 1.0 + tol)
            }
            _ => Err(UnsupportedError::Geometry(self).into()),
        }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A coordinate in a reference domain. [Geometry::Segment] elements only read `x`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn at(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }

    /// A point on the reference segment
    pub const fn on_segment(x: f64) -> Self {
        Self { x, y: 0.0 }
    }

    pub fn dist(&self, other: &Self) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl Default for Point {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
