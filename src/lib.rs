//! Nodal Lagrange finite element bases for 2D meshes
//!
//! A [LagrangeCollection] owns, for a fixed polynomial order, the reference element of every
//! geometry in the mesh (points, segments and triangles), the number of DoFs owned by the
//! interior of each geometry, and the permutations that reconcile the DoFs of shared edges and
//! faces with their canonical numbering.
//!
//! ```text
//!   LagrangeCollection (2D_P2)
//!     ├── Point    : PointElement,    1 DoF
//!     ├── Segment  : SegmentElement,  1 interior DoF,  2 orientations
//!     └── Triangle : TriangleElement, 0 interior DoFs, 6 orientations
//! ```
//!
//! Everything is built once and is read-only afterwards, so collections and elements can be
//! shared freely between threads.
pub mod basis;
pub mod collection;
pub mod dof;
pub mod error;
pub mod geometry;

pub use basis::{LagrangeElement, PointDistribution, ReferenceElement, ShapeSampler, ShapeTable};
pub use collection::{CollectionConfig, Continuity, LagrangeCollection};
pub use dof::{OrientationTable, SegmentOrientation, TriangleOrientation};
pub use error::{BasisError, ConfigError, DomainError, Result, UnsupportedError};
pub use geometry::{Geometry, Point};

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;
    use std::collections::BTreeMap;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn collections_are_shareable() {
        assert_send_sync::<LagrangeCollection>();
        assert_send_sync::<LagrangeElement>();
        assert_send_sync::<OrientationTable>();
    }

    #[test]
    fn quadratic_collection_end_to_end() {
        init_tracing();
        let fec = LagrangeCollection::with(2, 2).unwrap();
        assert_eq!(fec.name(), "2D_P2");

        assert_eq!(fec.dof_count(Geometry::Segment), 1);
        assert_eq!(fec.dof_count(Geometry::Triangle), 0);

        let seg = fec.orientation_table(Geometry::Segment).unwrap();
        assert_eq!(seg.num_orientations(), 2);
        assert_eq!(seg.permutation(0).unwrap(), &[0]);
        assert_eq!(seg.permutation(1).unwrap(), &[0]);

        let tri = fec.orientation_table(Geometry::Triangle).unwrap();
        assert_eq!(tri.num_orientations(), 6);
        for code in 0..6 {
            assert!(tri.permutation(code).unwrap().is_empty());
        }
    }

    #[test]
    fn linear_collection_end_to_end() {
        init_tracing();
        let fec = LagrangeCollection::with(1, 2).unwrap();
        for g in [Geometry::Segment, Geometry::Triangle] {
            assert_eq!(fec.dof_count(g), 0);
            let table = fec.orientation_table(g).unwrap();
            for perm in table.iter() {
                assert!(perm.is_empty());
            }
        }

        let seg = fec.element(Geometry::Segment).unwrap();
        let shape = seg.calc_shape(&Point::on_segment(0.4)).unwrap();
        assert_eq!(shape.len(), 2);
        assert!((shape[0] - 0.6).abs() < 1e-14);
        assert!((shape[1] - 0.4).abs() < 1e-14);

        let tri = fec.element(Geometry::Triangle).unwrap();
        let ip = Point::at(0.1, 0.7);
        let shape = tri.calc_shape(&ip).unwrap();
        assert_eq!(shape.len(), 3);
        assert!((shape[0] - 0.2).abs() < 1e-14);
        assert!((shape[1] - 0.1).abs() < 1e-14);
        assert!((shape[2] - 0.7).abs() < 1e-14);
        let dshape = tri.calc_dshape(&ip).unwrap();
        assert_eq!(dshape.row(0).iter().cloned().collect::<Vec<_>>(), vec![-1.0, -1.0]);
    }

    /// Number the DoFs of a two-triangle mesh the way a finite element space does: vertex DoFs
    /// by vertex id, edge DoFs along the edge's canonical (ascending) vertex order, face DoFs
    /// per triangle. Every global DoF must land on a single physical location.
    ///
    /// Returns the number of global DoFs.
    fn number_two_triangle_mesh(nodes: &[Point], p: usize, seg_table: &OrientationTable) -> usize {
        let edge_dofs = p - 1;
        let coords = [
            Point::at(0.0, 0.0),
            Point::at(1.0, 0.0),
            Point::at(0.0, 1.0),
            Point::at(1.0, 1.0),
        ];
        // the second triangle sees the shared edge (1, 2) backwards
        let triangles = [[0, 1, 2], [2, 1, 3]];

        let mut edge_ids: BTreeMap<[usize; 2], usize> = BTreeMap::new();
        let mut global_coords: BTreeMap<usize, Point> = BTreeMap::new();
        let mut next = coords.len();

        for verts in triangles {
            let mut local_to_global = vec![0; nodes.len()];
            local_to_global[..3].copy_from_slice(&verts);

            for (e, [a, b]) in Geometry::Triangle.reference_edges().unwrap().iter().enumerate() {
                let key = [verts[*a].min(verts[*b]), verts[*a].max(verts[*b])];
                let first_dof = *edge_ids.entry(key).or_insert_with(|| {
                    next += edge_dofs;
                    next - edge_dofs
                });

                let code = if verts[*a] < verts[*b] {
                    SegmentOrientation::Forward
                } else {
                    SegmentOrientation::Reversed
                };
                let perm = seg_table.permutation(code.code()).unwrap();
                for (i, c) in perm.iter().enumerate() {
                    local_to_global[3 + e * edge_dofs + i] = first_dof + c;
                }
            }
            for local in (3 + 3 * edge_dofs)..nodes.len() {
                local_to_global[local] = next;
                next += 1;
            }

            // physical location of every local node (affine map of the reference triangle)
            let [p0, p1, p2] = [coords[verts[0]], coords[verts[1]], coords[verts[2]]];
            for (local, node) in nodes.iter().enumerate() {
                let x = Point::at(
                    p0.x + (p1.x - p0.x) * node.x + (p2.x - p0.x) * node.y,
                    p0.y + (p1.y - p0.y) * node.x + (p2.y - p0.y) * node.y,
                );
                let global = local_to_global[local];
                if let Some(prev) = global_coords.insert(global, x) {
                    assert!(prev.dist(&x) < 1e-14, "DoF {} placed at {} and {}", global, prev, x);
                }
            }
        }

        assert_eq!(global_coords.len(), next);
        next
    }

    #[test]
    fn shared_edges_get_consistent_global_dofs() {
        init_tracing();
        let fec = LagrangeCollection::with(2, 2).unwrap();
        let elem = fec.element(Geometry::Triangle).unwrap();
        let seg_table = fec.orientation_table(Geometry::Segment).unwrap();

        for e in 0..3 {
            let dofs = elem.entity_dofs(1, e).unwrap();
            assert_eq!(dofs.as_slice(), &[3 + e]);
        }
        // 4 vertices + 5 edges
        assert_eq!(number_two_triangle_mesh(elem.nodes(), 2, seg_table), 9);
    }

    #[test]
    fn reversed_shared_edges_are_reordered() {
        init_tracing();
        // two nodes per edge, so a wrong orientation places a DoF at two locations
        let p = 3;
        let cp = basis::closed_points(p, PointDistribution::GaussLobatto).unwrap();
        let nodes = basis::triangle_nodes(&cp);
        let seg_table = OrientationTable::segment(p);

        // 4 vertices + 5 edges * 2 + 2 faces
        assert_eq!(number_two_triangle_mesh(&nodes, p, &seg_table), 16);
    }

    #[test]
    fn concurrent_evaluation_matches_serial() {
        let fec = LagrangeCollection::with(2, 2).unwrap();
        let tri = fec.element(Geometry::Triangle).unwrap();
        let points: Vec<Point> = (0..200)
            .map(|k| {
                let t = k as f64 / 200.0;
                Point::at(t * 0.5, (1.0 - t) * 0.5)
            })
            .collect();

        let serial: Vec<_> = points.iter().map(|ip| tri.calc_shape(ip).unwrap()).collect();
        let parallel: Vec<_> = points.par_iter().map(|ip| tri.calc_shape(ip).unwrap()).collect();
        assert_eq!(serial, parallel);
    }

    #[test]
    fn unsupported_configurations_build_nothing() {
        init_tracing();
        for config in [
            CollectionConfig::with(0, 2),
            CollectionConfig::with(3, 2),
            CollectionConfig::with(1, 3),
        ] {
            assert!(matches!(
                LagrangeCollection::new(config),
                Err(BasisError::Config(_))
            ));
        }
    }
}
