use crate::error::{BasisError, ConfigError, Result};
use nalgebra::{DMatrix, SymmetricEigen};
use std::fmt;
use std::str::FromStr;

/// Families of 1-D sample points on a closed interval
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointDistribution {
    /// Roots of the Legendre polynomial (no endpoints)
    GaussLegendre,
    /// Endpoints plus the roots of the derivative of the Legendre polynomial
    GaussLobatto,
    /// Equally spaced, excluding endpoints
    OpenUniform,
    /// Equally spaced, including endpoints
    ClosedUniform,
}

impl PointDistribution {
    /// Whether the family includes both endpoints of the interval
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::GaussLobatto | Self::ClosedUniform)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::GaussLegendre => "GaussLegendre",
            Self::GaussLobatto => "GaussLobatto",
            Self::OpenUniform => "OpenUniform",
            Self::ClosedUniform => "ClosedUniform",
        }
    }
}

impl Default for PointDistribution {
    fn default() -> Self {
        Self::GaussLobatto
    }
}

impl fmt::Display for PointDistribution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for PointDistribution {
    type Err = BasisError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "GaussLegendre" | "GL" => Ok(Self::GaussLegendre),
            "GaussLobatto" | "GLL" => Ok(Self::GaussLobatto),
            "OpenUniform" => Ok(Self::OpenUniform),
            "ClosedUniform" => Ok(Self::ClosedUniform),
            _ => Err(ConfigError::UnknownPointDistribution(s.to_string()).into()),
        }
    }
}

/// The `p + 1` points of a closed family on [0, 1], in ascending order.
///
/// The first and last points are exactly 0.0 and 1.0.
///
/// Returns an Error if the distribution does not include the endpoints
pub fn closed_points(p: usize, distribution: PointDistribution) -> Result<Vec<f64>> {
    let points = match distribution {
        PointDistribution::GaussLobatto => {
            let mut points = Vec::with_capacity(p + 1);
            points.push(0.0);
            if p >= 1 {
                points.extend(
                    symmetric_jacobi_roots(p - 1, |k| k * (k + 2.0) / ((2.0 * k + 1.0) * (2.0 * k + 3.0)))
                        .into_iter()
                        .map(|x| (x + 1.0) / 2.0),
                );
                points.push(1.0);
            }
            points
        }
        PointDistribution::ClosedUniform => {
            if p == 0 {
                vec![0.0]
            } else {
                (0..=p).map(|i| i as f64 / p as f64).collect()
            }
        }
        open => return Err(ConfigError::UnsupportedPointDistribution(open).into()),
    };

    Ok(points)
}

/// Gauss-Legendre points and weights on [-1, 1]
// https://en.wikipedia.org/wiki/Gaussian_quadrature#Gauss%E2%80%93Legendre_quadrature
pub fn gauss_legendre(n: usize) -> (Vec<f64>, Vec<f64>) {
    if n == 0 {
        return (Vec::new(), Vec::new());
    }

    let eigen_decomp = SymmetricEigen::new(jacobi_matrix(n, |k| k * k / (4.0 * k * k - 1.0)));

    let mut xw: Vec<(f64, f64)> = eigen_decomp
        .eigenvalues
        .iter()
        .cloned()
        .zip(
            eigen_decomp
                .eigenvectors
                .row(0)
                .iter()
                .map(|weight| (*weight).powi(2) * 2.0),
        )
        .collect();

    xw.sort_by(|a, b| a.0.total_cmp(&b.0));
    xw.into_iter().unzip()
}

/// Eigenvalues (ascending) of the `n x n` symmetric tridiagonal matrix with a zero diagonal
/// and squared off-diagonal entries `beta_sq(k)`, k = 1..n
fn symmetric_jacobi_roots(n: usize, beta_sq: impl Fn(f64) -> f64) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }

    let mut roots: Vec<f64> = SymmetricEigen::new(jacobi_matrix(n, beta_sq))
        .eigenvalues
        .iter()
        .cloned()
        .collect();
    roots.sort_by(|a, b| a.total_cmp(b));
    roots
}

fn jacobi_matrix(n: usize, beta_sq: impl Fn(f64) -> f64) -> DMatrix<f64> {
    let betas: Vec<f64> = (1..n).map(|k| beta_sq(k as f64).sqrt()).collect();

    DMatrix::from_fn(n, n, |r, c| {
        if r == c + 1 {
            betas[r - 1]
        } else if c == r + 1 {
            betas[c - 1]
        } else {
            0.0
        }
    })
}
