use super::{check_domain, check_order, closed_points, PointDistribution, ReferenceElement};
use crate::error::{ConfigError, Result};
use crate::geometry::{Geometry, Point, TRIANGLE_EDGES};
use nalgebra::{DMatrix, DVector};
use tracing::trace;

/// Lagrange element on the reference triangle with vertices (0, 0), (1, 0), (0, 1)
///
/// Node layout (p = 2):
/// ```text
///    2
///    *
///    | \
///  5 *   * 4
///    |     \
///    *---*---*
///    0   3   1
/// ```
///
/// Vertices come first, then the interior nodes of edges (0, 1), (1, 2), (0, 2), each listed from
/// its lower-indexed vertex towards its higher-indexed vertex, then the face-interior nodes.
#[derive(Clone, Debug)]
pub struct TriangleElement {
    order: usize,
    distribution: PointDistribution,
    nodes: Vec<Point>,
}

impl TriangleElement {
    /// Construct an element of order `p` with nodes taken from a closed point `distribution`
    pub fn with(p: usize, distribution: PointDistribution) -> Result<Self> {
        check_order(p)?;
        let cp = closed_points(p, distribution)?;
        let nodes = triangle_nodes(&cp);
        trace!(order = p, %distribution, "placed triangle nodes");

        Ok(Self {
            order: p,
            distribution,
            nodes,
        })
    }

    pub fn distribution(&self) -> PointDistribution {
        self.distribution
    }
}

impl ReferenceElement for TriangleElement {
    fn geometry(&self) -> Geometry {
        Geometry::Triangle
    }

    fn order(&self) -> usize {
        self.order
    }

    fn nodes(&self) -> &[Point] {
        &self.nodes
    }

    fn calc_shape(&self, ip: &Point) -> Result<DVector<f64>> {
        check_domain(Geometry::Triangle, ip)?;
        let [l0, l1, l2] = barycentric(ip);

        match self.order {
            1 => Ok(DVector::from_vec(vec![l0, l1, l2])),
            2 => Ok(DVector::from_vec(vec![
                l0 * (2.0 * l0 - 1.0),
                l1 * (2.0 * l1 - 1.0),
                l2 * (2.0 * l2 - 1.0),
                4.0 * l0 * l1,
                4.0 * l1 * l2,
                4.0 * l2 * l0,
            ])),
            p => Err(unimplemented_order(p)),
        }
    }

    #[rustfmt::skip]
    fn calc_dshape(&self, ip: &Point) -> Result<DMatrix<f64>> {
        check_domain(Geometry::Triangle, ip)?;
        let [l0, l1, l2] = barycentric(ip);

        match self.order {
            1 => Ok(DMatrix::from_row_slice(3, 2, &[
                -1.0, -1.0,
                1.0, 0.0,
                0.0, 1.0,
            ])),
            2 => Ok(DMatrix::from_row_slice(6, 2, &[
                1.0 - 4.0 * l0, 1.0 - 4.0 * l0,
                4.0 * l1 - 1.0, 0.0,
                0.0, 4.0 * l2 - 1.0,
                4.0 * (l0 - l1), -4.0 * l1,
                4.0 * l2, 4.0 * l1,
                -4.0 * l2, 4.0 * (l0 - l2),
            ])),
            p => Err(unimplemented_order(p)),
        }
    }
}

fn barycentric(ip: &Point) -> [f64; 3] {
    [1.0 - ip.x - ip.y, ip.x, ip.y]
}

fn unimplemented_order(p: usize) -> crate::error::BasisError {
    ConfigError::UnsupportedOrder {
        order: p,
        min: super::MIN_ORDER,
        max: super::MAX_ORDER,
    }
    .into()
}

/// Canonical triangle nodes from the `p + 1` closed points `cp`
pub(crate) fn triangle_nodes(cp: &[f64]) -> Vec<Point> {
    let p = cp.len() - 1;
    let mut nodes = Vec::with_capacity((p + 1) * (p + 2) / 2);
    let vertices = [Point::at(cp[0], cp[0]), Point::at(cp[p], cp[0]), Point::at(cp[0], cp[p])];

    nodes.extend(vertices);

    for [a, b] in TRIANGLE_EDGES {
        let (lo, hi) = (vertices[a], vertices[b]);
        for i in 1..p {
            nodes.push(Point::at(
                lo.x * cp[p - i] + hi.x * cp[i],
                lo.y * cp[p - i] + hi.y * cp[i],
            ));
        }
    }

    for j in 1..p {
        for i in 1..(p - j) {
            let w = cp[i] + cp[j] + cp[p - i - j];
            nodes.push(Point::at(cp[i] / w, cp[j] / w));
        }
    }

    nodes
}
