use super::{gauss_legendre, ReferenceElement};
use crate::error::{DomainError, Result, UnsupportedError};
use crate::geometry::{Geometry, Point};
use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

/// Structure used to evaluate a [ReferenceElement]'s shape functions over a fixed set of sample points
///
/// Evaluations are parallelized over the Rayon Global Threadpool
pub struct ShapeSampler<'e, E: ReferenceElement> {
    elem: &'e E,
    /// Sample points in the element's reference domain
    points: Vec<Point>,
    /// Quadrature weights associated with each point (unit weights if not sampling a quadrature rule)
    weights: Vec<f64>,
}

impl<'e, E: ReferenceElement> ShapeSampler<'e, E> {
    /// Sample `elem` at arbitrary `points` (with unit weights)
    pub fn with(elem: &'e E, points: Vec<Point>) -> Self {
        let weights = vec![1.0; points.len()];
        Self {
            elem,
            points,
            weights,
        }
    }

    /// Sample `elem` at the points of a Gauss-Legendre rule with `n` points per direction
    ///
    /// Triangle rules are collapsed tensor rules: `(u, v) -> (u, v * (1 - u))`
    pub fn gauss(elem: &'e E, n: usize) -> Result<Self> {
        let (x, w) = gauss_legendre(n);
        let x: Vec<f64> = x.iter().map(|x| (x + 1.0) / 2.0).collect();
        let w: Vec<f64> = w.iter().map(|w| w / 2.0).collect();

        let (points, weights) = match elem.geometry() {
            Geometry::Point => (vec![Point::default()], vec![1.0]),
            Geometry::Segment => (x.iter().map(|x| Point::on_segment(*x)).collect(), w),
            Geometry::Triangle => x
                .iter()
                .zip(w.iter())
                .flat_map(|(u, wu)| {
                    x.iter().zip(w.iter()).map(move |(v, wv)| {
                        (Point::at(*u, v * (1.0 - u)), wu * wv * (1.0 - u))
                    })
                })
                .unzip(),
            g => return Err(UnsupportedError::Geometry(g).into()),
        };

        Ok(Self {
            elem,
            points,
            weights,
        })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Evaluate every shape function and its gradient at every sample point
    ///
    /// Returns the first error encountered (e.g. a point outside the reference domain)
    pub fn sample(&self) -> Result<ShapeTable> {
        let evals: Vec<(DVector<f64>, DMatrix<f64>)> = self
            .points
            .par_iter()
            .map(|ip| Ok((self.elem.calc_shape(ip)?, self.elem.calc_dshape(ip)?)))
            .collect::<Result<_>>()?;

        let num_nodes = self.elem.num_nodes();
        let mut shapes = DMatrix::zeros(num_nodes, self.points.len());
        let mut dshapes = Vec::with_capacity(self.points.len());
        for (m, (shape, dshape)) in evals.into_iter().enumerate() {
            shapes.set_column(m, &shape);
            dshapes.push(dshape);
        }

        Ok(ShapeTable {
            shapes,
            dshapes,
            weights: self.weights.clone(),
        })
    }
}

/// Shape function values and gradients tabulated at a set of sample points
#[derive(Clone, Debug)]
pub struct ShapeTable {
    /// Shape values: row `i` is node `i`, column `m` is sample point `m`
    pub shapes: DMatrix<f64>,
    /// Gradients at each sample point (one row per node)
    pub dshapes: Vec<DMatrix<f64>>,
    pub weights: Vec<f64>,
}

impl ShapeTable {
    pub fn num_points(&self) -> usize {
        self.shapes.ncols()
    }

    #[inline]
    pub fn shape(&self, i: usize, m: usize) -> f64 {
        self.shapes[(i, m)]
    }

    #[inline]
    pub fn dshape(&self, m: usize) -> &DMatrix<f64> {
        &self.dshapes[m]
    }

    /// Weighted sum of each shape function over the sample points
    pub fn integrate_shapes(&self) -> DVector<f64> {
        &self.shapes * DVector::from_column_slice(&self.weights)
    }

    /// Values of the field with nodal `values` at every sample point
    pub fn interpolate(&self, values: &[f64]) -> Result<DVector<f64>> {
        if values.len() != self.shapes.nrows() {
            return Err(DomainError::MismatchedValues {
                expected: self.shapes.nrows(),
                found: values.len(),
            }
            .into());
        }
        Ok(self.shapes.tr_mul(&DVector::from_column_slice(values)))
    }
}
