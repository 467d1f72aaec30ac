use super::{check_domain, check_order, closed_points, PointDistribution, ReferenceElement};
use crate::error::Result;
use crate::geometry::{Geometry, Point};
use nalgebra::{DMatrix, DVector};
use tracing::trace;

/// Lagrange element on the reference segment [0, 1]
///
/// Node layout (p = 2):
/// ```text
///    0     2     1
///    *-----*-----*
/// ```
/// The two endpoints come first, then the interior points in ascending order.
#[derive(Clone, Debug)]
pub struct SegmentElement {
    order: usize,
    distribution: PointDistribution,
    nodes: Vec<Point>,
}

impl SegmentElement {
    /// Construct an element of order `p` with nodes taken from a closed point `distribution`
    pub fn with(p: usize, distribution: PointDistribution) -> Result<Self> {
        check_order(p)?;
        let cp = closed_points(p, distribution)?;
        let nodes = segment_nodes(&cp);
        trace!(order = p, %distribution, "placed segment nodes");

        Ok(Self {
            order: p,
            distribution,
            nodes,
        })
    }

    pub fn distribution(&self) -> PointDistribution {
        self.distribution
    }

    /// Node i's 1-D Lagrange polynomial and its derivative at x
    fn lagrange(&self, i: usize, x: f64) -> (f64, f64) {
        let xi = self.nodes[i].x;
        let others = || self.nodes.iter().enumerate().filter(move |(j, _)| *j != i);

        let value = others().map(|(_, n)| (x - n.x) / (xi - n.x)).product();
        let deriv = others()
            .map(|(k, nk)| {
                others()
                    .filter(|(j, _)| *j != k)
                    .map(|(_, n)| (x - n.x) / (xi - n.x))
                    .product::<f64>()
                    / (xi - nk.x)
            })
            .sum();

        (value, deriv)
    }
}

impl ReferenceElement for SegmentElement {
    fn geometry(&self) -> Geometry {
        Geometry::Segment
    }

    fn order(&self) -> usize {
        self.order
    }

    fn nodes(&self) -> &[Point] {
        &self.nodes
    }

    fn calc_shape(&self, ip: &Point) -> Result<DVector<f64>> {
        check_domain(Geometry::Segment, ip)?;
        Ok(DVector::from_fn(self.nodes.len(), |i, _| self.lagrange(i, ip.x).0))
    }

    fn calc_dshape(&self, ip: &Point) -> Result<DMatrix<f64>> {
        check_domain(Geometry::Segment, ip)?;
        Ok(DMatrix::from_fn(self.nodes.len(), 1, |i, _| self.lagrange(i, ip.x).1))
    }
}

/// Canonical segment nodes from the `p + 1` closed points `cp`
pub(crate) fn segment_nodes(cp: &[f64]) -> Vec<Point> {
    let p = cp.len() - 1;
    let mut nodes = Vec::with_capacity(p + 1);

    nodes.push(Point::on_segment(cp[0]));
    nodes.push(Point::on_segment(cp[p]));
    nodes.extend(cp[1..p].iter().map(|x| Point::on_segment(*x)));

    nodes
}
