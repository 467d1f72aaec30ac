//! Collections of Lagrange elements, one per geometry, for a fixed order and dimension
use crate::basis::{
    interior_dof_count, LagrangeElement, PointDistribution, ReferenceElement, MAX_ORDER, MIN_ORDER,
};
use crate::dof::OrientationTable;
use crate::error::{ConfigError, Result, UnsupportedError};
use crate::geometry::Geometry;
#[cfg(feature = "json_export")]
use json::{array, object, JsonValue};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// The only spatial dimension Lagrange collections are built for
pub const SUPPORTED_DIM: usize = 2;

/// Inter-element continuity enforced by a collection's basis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuity {
    /// H1: values agree across shared entities
    Continuous,
}

impl fmt::Display for Continuity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Continuous => write!(f, "H1"),
        }
    }
}

/// Settings used to construct a [LagrangeCollection]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollectionConfig {
    /// Polynomial order of every element
    pub order: usize,
    /// Spatial dimension of the mesh
    pub dim: usize,
    /// Family of 1-D points used to place nodes
    pub distribution: PointDistribution,
}

impl CollectionConfig {
    pub const fn with(order: usize, dim: usize) -> Self {
        Self {
            order,
            dim,
            distribution: PointDistribution::GaussLobatto,
        }
    }

    pub const fn with_distribution(mut self, distribution: PointDistribution) -> Self {
        self.distribution = distribution;
        self
    }

    /// Check the settings without building anything
    pub fn validate(&self) -> Result<()> {
        if !(MIN_ORDER..=MAX_ORDER).contains(&self.order) {
            return Err(ConfigError::UnsupportedOrder {
                order: self.order,
                min: MIN_ORDER,
                max: MAX_ORDER,
            }
            .into());
        }
        if self.dim != SUPPORTED_DIM {
            return Err(ConfigError::UnsupportedDimension(self.dim).into());
        }
        if !self.distribution.is_closed() {
            return Err(ConfigError::UnsupportedPointDistribution(self.distribution).into());
        }
        Ok(())
    }

    /// Collection name: `"<DIM>D_P<ORDER>"`
    pub fn name(&self) -> String {
        format!("{}D_P{}", self.dim, self.order)
    }
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self::with(1, SUPPORTED_DIM)
    }
}

impl FromStr for CollectionConfig {
    type Err = crate::error::BasisError;

    /// Parse a collection name such as `"2D_P2"` (the distribution defaults to Gauss-Lobatto)
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ConfigError::InvalidName(s.to_string());
        let (dim, order) = s.split_once("D_P").ok_or_else(invalid)?;

        Ok(Self::with(
            order.parse().map_err(|_| invalid())?,
            dim.parse().map_err(|_| invalid())?,
        ))
    }
}

/// The Lagrange reference elements, DoF counts and DoF orientation tables of every geometry
/// in a mesh of a given dimension.
///
/// Geometries without a Lagrange element hold explicitly empty slots: zero DoFs, no element
/// and no orientation table.
#[derive(Clone, Debug)]
pub struct LagrangeCollection {
    config: CollectionConfig,
    name: String,
    elements: [Option<LagrangeElement>; Geometry::COUNT],
    dofs: [usize; Geometry::COUNT],
    orientations: [Option<OrientationTable>; Geometry::COUNT],
}

impl LagrangeCollection {
    /// Build a collection
    ///
    /// # Returns
    /// * An `Err` if the order is not 1 or 2
    /// * An `Err` if the dimension is not 2
    /// * An `Err` if the point distribution does not include the endpoints
    /// * The collection, otherwise
    pub fn new(config: CollectionConfig) -> Result<Self> {
        config.validate()?;
        let CollectionConfig {
            order,
            dim,
            distribution,
        } = config;

        let mut elements: [Option<LagrangeElement>; Geometry::COUNT] = Default::default();
        let mut dofs = [0; Geometry::COUNT];
        let mut orientations: [Option<OrientationTable>; Geometry::COUNT] = Default::default();

        for geometry in [Geometry::Point, Geometry::Segment, Geometry::Triangle] {
            if geometry.dim() > dim {
                continue;
            }
            let g = geometry.index();
            elements[g] = Some(LagrangeElement::with(geometry, order, distribution)?);
            dofs[g] = interior_dof_count(geometry, order);
            orientations[g] = match geometry {
                Geometry::Segment => Some(OrientationTable::segment(order)),
                Geometry::Triangle => Some(OrientationTable::triangle(order)),
                _ => None,
            };
        }

        let name = config.name();
        debug!(
            %name,
            %distribution,
            segment_dofs = dofs[Geometry::Segment.index()],
            triangle_dofs = dofs[Geometry::Triangle.index()],
            "built Lagrange collection"
        );

        Ok(Self {
            config,
            name,
            elements,
            dofs,
            orientations,
        })
    }

    /// Build a Gauss-Lobatto collection of order `p` in dimension `dim`
    pub fn with(p: usize, dim: usize) -> Result<Self> {
        Self::new(CollectionConfig::with(p, dim))
    }

    /// Build the collection described by a name produced by [LagrangeCollection::name]
    pub fn from_name(name: &str) -> Result<Self> {
        Self::new(name.parse()?)
    }

    pub fn config(&self) -> CollectionConfig {
        self.config
    }

    pub fn order(&self) -> usize {
        self.config.order
    }

    pub fn dim(&self) -> usize {
        self.config.dim
    }

    pub fn distribution(&self) -> PointDistribution {
        self.config.distribution
    }

    /// Identifier of the form `"<DIM>D_P<ORDER>"`, for diagnostics
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn continuity(&self) -> Continuity {
        Continuity::Continuous
    }

    /// Number of DoFs owned by the interior of a `geometry` entity (zero for empty slots)
    pub fn dof_count(&self, geometry: Geometry) -> usize {
        self.dofs[geometry.index()]
    }

    /// Number of DoFs on a closed `geometry` entity: its vertices, edges, and interior
    pub fn total_dofs(&self, geometry: Geometry) -> Result<usize> {
        self.element(geometry)?;
        let num_edges = match geometry.dim() {
            0 | 1 => 0,
            _ => geometry.reference_edges()?.len(),
        };

        Ok(geometry.num_vertices() * self.dof_count(Geometry::Point)
            + num_edges * self.dof_count(Geometry::Segment)
            + match geometry {
                Geometry::Point => 0,
                _ => self.dof_count(geometry),
            })
    }

    /// The reference element of `geometry`
    pub fn element(&self, geometry: Geometry) -> Result<&LagrangeElement> {
        self.elements[geometry.index()]
            .as_ref()
            .ok_or_else(|| UnsupportedError::Geometry(geometry).into())
    }

    /// Iterate over the populated reference elements
    pub fn elements(&self) -> impl Iterator<Item = &LagrangeElement> + '_ {
        self.elements.iter().flatten()
    }

    /// The orientation table of a shareable `geometry`
    pub fn orientation_table(&self, geometry: Geometry) -> Result<&OrientationTable> {
        self.orientations[geometry.index()]
            .as_ref()
            .ok_or_else(|| UnsupportedError::Geometry(geometry).into())
    }

    /// The interior DoF permutation of `geometry` under orientation `code`
    ///
    /// # Returns
    /// * `Ok(None)` for [Geometry::Point], which has no orientation
    /// * `Ok(Some(perm))` for segments and triangles (`perm` is empty if the geometry has no interior DoFs)
    /// * An `Err` if `code` is out of range, or for geometries without a Lagrange element
    pub fn orientation_permutation(&self, geometry: Geometry, code: usize) -> Result<Option<&[usize]>> {
        match geometry {
            Geometry::Point if self.elements[geometry.index()].is_some() => Ok(None),
            _ => self.orientation_table(geometry)?.permutation(code).map(Some),
        }
    }

    /// The collection of traces of this collection on element boundaries
    ///
    /// Not available for Lagrange collections: always returns an Error
    pub fn trace_collection(&self) -> Result<LagrangeCollection> {
        Err(UnsupportedError::TraceCollection(self.name.clone()).into())
    }

    /// Map from Cartesian (lexicographic) node order to the canonical order
    ///
    /// Not implemented for any geometry: always returns an Error
    pub fn dof_map(&self, geometry: Geometry) -> Result<&[usize]> {
        Err(UnsupportedError::DofMap(geometry).into())
    }

    #[cfg(feature = "json_export")]
    pub fn to_json(&self) -> JsonValue {
        let elements: Vec<JsonValue> = self
            .elements()
            .map(|elem| {
                let g = elem.geometry();
                object! {
                    "geometry": g.name(),
                    "dofs": self.dof_count(g),
                    "nodes": JsonValue::from(
                        elem.nodes().iter().map(|n| array![n.x, n.y]).collect::<Vec<_>>()
                    ),
                    "orientations": JsonValue::from(
                        self.orientations[g.index()]
                            .iter()
                            .flat_map(|table| table.iter())
                            .map(|perm| JsonValue::from(perm.to_vec()))
                            .collect::<Vec<_>>()
                    ),
                }
            })
            .collect();

        object! {
            "name": self.name.as_str(),
            "order": self.order(),
            "dim": self.dim(),
            "distribution": self.distribution().name(),
            "elements": JsonValue::from(elements),
        }
    }
}

impl fmt::Display for LagrangeCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
