//! Nodal Lagrange reference elements
//!
//! Each [ReferenceElement] owns the canonical node set of one [Geometry] and evaluates
//! its Lagrange shape functions (and their gradients) at points in the reference domain.
//!
//! The canonical node order is: vertices, then edge-interior nodes (edge by edge), then
//! face-interior nodes. Orientation tables in [crate::dof] permute the interior nodes in
//! this order.
mod points;
mod sampler;
mod segment;
mod triangle;

pub use points::{closed_points, gauss_legendre, PointDistribution};
pub use sampler::{ShapeSampler, ShapeTable};
pub use segment::SegmentElement;
pub use triangle::TriangleElement;
pub(crate) use triangle::triangle_nodes;

use crate::error::{ConfigError, DomainError, Result, UnsupportedError};
use crate::geometry::{Geometry, Point, DOMAIN_TOL};
use nalgebra::{DMatrix, DVector};
use smallvec::SmallVec;
use std::ops::Range;

/// Lowest polynomial order with implemented shape functions
pub const MIN_ORDER: usize = 1;
/// Highest polynomial order with implemented shape functions
pub const MAX_ORDER: usize = 2;

/// Local node indices associated with one sub-entity of an element
pub type EntityDofs = SmallVec<[usize; 4]>;

/// Shape function evaluation over a reference domain.
/// [PointElement], [SegmentElement] and [TriangleElement] implement this trait.
pub trait ReferenceElement: Send + Sync {
    fn geometry(&self) -> Geometry;

    /// Polynomial order of the basis
    fn order(&self) -> usize;

    /// Node coordinates in canonical order
    fn nodes(&self) -> &[Point];

    /// Value of every shape function at `ip`, in canonical node order
    fn calc_shape(&self, ip: &Point) -> Result<DVector<f64>>;

    /// Gradient of every shape function at `ip`
    ///
    /// Row `i` holds the partial derivatives of shape function `i`, one column per reference coordinate
    fn calc_dshape(&self, ip: &Point) -> Result<DMatrix<f64>>;

    fn dim(&self) -> usize {
        self.geometry().dim()
    }

    fn num_nodes(&self) -> usize {
        self.nodes().len()
    }

    /// Local node indices owned by sub-entity `index` of dimension `dim`
    ///
    /// Vertex `v` owns node `v`; edges and the interior own the contiguous runs of nodes that follow.
    fn entity_dofs(&self, dim: usize, index: usize) -> Result<EntityDofs> {
        entity_dof_range(self.geometry(), self.order(), dim, index).map(|range| range.collect())
    }

    /// Evaluate the field with nodal `values` at `ip`
    fn interpolate(&self, values: &[f64], ip: &Point) -> Result<f64> {
        check_values(self.num_nodes(), values)?;
        let shape = self.calc_shape(ip)?;
        Ok(shape.iter().zip(values).map(|(n, v)| n * v).sum())
    }

    /// Evaluate the reference gradient of the field with nodal `values` at `ip`
    fn interpolate_gradient(&self, values: &[f64], ip: &Point) -> Result<DVector<f64>> {
        check_values(self.num_nodes(), values)?;
        let dshape = self.calc_dshape(ip)?;
        Ok(dshape.tr_mul(&DVector::from_column_slice(values)))
    }

    /// Nodal interpolant of `f`: its value at every node
    fn project<F>(&self, f: F) -> Vec<f64>
    where
        F: Fn(&Point) -> f64,
        Self: Sized,
    {
        self.nodes().iter().map(f).collect()
    }
}

/// A reference element of any supported geometry
#[derive(Clone, Debug)]
pub enum LagrangeElement {
    Point(PointElement),
    Segment(SegmentElement),
    Triangle(TriangleElement),
}

impl LagrangeElement {
    /// Construct the element for `geometry`
    ///
    /// Returns an Error for geometries without a Lagrange element, or if the order / distribution is unsupported
    pub fn with(geometry: Geometry, p: usize, distribution: PointDistribution) -> Result<Self> {
        match geometry {
            Geometry::Point => Ok(Self::Point(PointElement::new())),
            Geometry::Segment => Ok(Self::Segment(SegmentElement::with(p, distribution)?)),
            Geometry::Triangle => Ok(Self::Triangle(TriangleElement::with(p, distribution)?)),
            _ => Err(UnsupportedError::Geometry(geometry).into()),
        }
    }

    fn inner(&self) -> &dyn ReferenceElement {
        match self {
            Self::Point(elem) => elem,
            Self::Segment(elem) => elem,
            Self::Triangle(elem) => elem,
        }
    }
}

impl ReferenceElement for LagrangeElement {
    fn geometry(&self) -> Geometry {
        self.inner().geometry()
    }

    fn order(&self) -> usize {
        self.inner().order()
    }

    fn nodes(&self) -> &[Point] {
        self.inner().nodes()
    }

    fn calc_shape(&self, ip: &Point) -> Result<DVector<f64>> {
        self.inner().calc_shape(ip)
    }

    fn calc_dshape(&self, ip: &Point) -> Result<DMatrix<f64>> {
        self.inner().calc_dshape(ip)
    }
}

/// The single-node element on a [Geometry::Point]
#[derive(Clone, Debug)]
pub struct PointElement {
    nodes: [Point; 1],
}

impl PointElement {
    pub fn new() -> Self {
        Self {
            nodes: [Point::default()],
        }
    }
}

impl Default for PointElement {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceElement for PointElement {
    fn geometry(&self) -> Geometry {
        Geometry::Point
    }

    fn order(&self) -> usize {
        0
    }

    fn nodes(&self) -> &[Point] {
        &self.nodes
    }

    fn calc_shape(&self, ip: &Point) -> Result<DVector<f64>> {
        check_domain(Geometry::Point, ip)?;
        Ok(DVector::from_element(1, 1.0))
    }

    fn calc_dshape(&self, ip: &Point) -> Result<DMatrix<f64>> {
        check_domain(Geometry::Point, ip)?;
        Ok(DMatrix::zeros(1, 0))
    }
}

/// Number of nodes owned by the interior of `geometry` (excluding every lower-dimensional sub-entity)
pub fn interior_dof_count(geometry: Geometry, p: usize) -> usize {
    match geometry {
        Geometry::Point => 1,
        Geometry::Segment => p.saturating_sub(1),
        Geometry::Triangle => p.saturating_sub(1) * p.saturating_sub(2) / 2,
        _ => 0,
    }
}

/// Total number of nodes on the closed `geometry`
pub fn node_count(geometry: Geometry, p: usize) -> Result<usize> {
    match geometry {
        Geometry::Point => Ok(1),
        Geometry::Segment => Ok(p + 1),
        Geometry::Triangle => Ok((p + 1) * (p + 2) / 2),
        _ => Err(UnsupportedError::Geometry(geometry).into()),
    }
}

fn entity_dof_range(geometry: Geometry, p: usize, dim: usize, index: usize) -> Result<Range<usize>> {
    let invalid = || DomainError::InvalidEntity {
        geometry,
        dim,
        index,
    };
    let num_vertices = geometry.num_vertices();
    // a segment's only edge is its interior
    let num_edges = match geometry.dim() {
        0 | 1 => 0,
        _ => geometry.reference_edges()?.len(),
    };
    let edge_dofs = interior_dof_count(Geometry::Segment, p);

    match dim {
        0 if index < num_vertices => Ok(index..index + 1),
        d if d > 0 && d == geometry.dim() && index == 0 => {
            let start = num_vertices + num_edges * edge_dofs;
            Ok(start..node_count(geometry, p)?)
        }
        1 if index < num_edges => {
            let start = num_vertices + index * edge_dofs;
            Ok(start..start + edge_dofs)
        }
        _ => Err(invalid().into()),
    }
}

pub(crate) fn check_order(p: usize) -> Result<()> {
    if (MIN_ORDER..=MAX_ORDER).contains(&p) {
        Ok(())
    } else {
        Err(ConfigError::UnsupportedOrder {
            order: p,
            min: MIN_ORDER,
            max: MAX_ORDER,
        }
        .into())
    }
}

pub(crate) fn check_domain(geometry: Geometry, ip: &Point) -> Result<()> {
    if geometry.contains(ip, DOMAIN_TOL)? {
        Ok(())
    } else {
        Err(DomainError::PointOutsideDomain {
            geometry,
            point: *ip,
        }
        .into())
    }
}

fn check_values(expected: usize, values: &[f64]) -> Result<()> {
    if values.len() == expected {
        Ok(())
    } else {
        Err(DomainError::MismatchedValues {
            expected,
            found: values.len(),
        }
        .into())
    }
}
