use crate::basis::PointDistribution;
use crate::geometry::{Geometry, Point};
use thiserror::Error;

/// Top-level error type for Lagrange basis construction and evaluation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BasisError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Unsupported(#[from] UnsupportedError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Invalid (order, dimension, point distribution) settings.
///
/// These are detected before any element is built, so no partially constructed collection ever exists.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("order {order} is not supported by Lagrange elements; expected {min} <= order <= {max}")]
    UnsupportedOrder { order: usize, min: usize, max: usize },

    #[error("Lagrange collections require dim == 2; got dim = {0}")]
    UnsupportedDimension(usize),

    #[error("point distribution {0} is not endpoint-inclusive; Lagrange nodes require a closed family")]
    UnsupportedPointDistribution(PointDistribution),

    #[error("cannot parse '{0}' as a collection name (expected '<DIM>D_P<ORDER>')")]
    InvalidName(String),

    #[error("unknown point distribution '{0}'")]
    UnknownPointDistribution(String),
}

/// Requests for geometries or features that are recognized but not implemented.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UnsupportedError {
    #[error("geometry type {0} is not implemented")]
    Geometry(Geometry),

    #[error("trace collection of {0} is not available")]
    TraceCollection(String),

    #[error("Cartesian DoF map for geometry type {0} is not implemented")]
    DofMap(Geometry),
}

/// Inputs outside the domain of an otherwise valid operation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    #[error("point {point} is outside the reference {geometry}")]
    PointOutsideDomain { geometry: Geometry, point: Point },

    #[error("orientation {code} is invalid for a {geometry}; expected 0 <= orientation < {count}")]
    InvalidOrientation {
        geometry: Geometry,
        code: usize,
        count: usize,
    },

    #[error("{geometry} has no sub-entity of dimension {dim} with index {index}")]
    InvalidEntity {
        geometry: Geometry,
        dim: usize,
        index: usize,
    },

    #[error("expected {expected} nodal values; got {found}")]
    MismatchedValues { expected: usize, found: usize },
}

/// Convenience type alias for results using [`BasisError`].
pub type Result<T> = std::result::Result<T, BasisError>;
