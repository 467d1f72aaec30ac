//! Orientation of degrees of freedom on shared mesh entities
//!
//! An edge or face shared by several elements is seen by each of them with its own vertex
//! order. The interior DoFs of the entity are numbered canonically (see [crate::basis]); an
//! [OrientationTable] maps the DoFs as an element sees them onto that canonical numbering.
use crate::basis::interior_dof_count;
use crate::error::{DomainError, Result};
use crate::geometry::Geometry;
use std::fmt;

/// Number of relative orientations of a shared segment
pub const NUM_SEGMENT_ORIENTATIONS: usize = 2;
/// Number of relative orientations of a shared triangle
pub const NUM_TRIANGLE_ORIENTATIONS: usize = 6;

/// Vertex relabeling of each triangle orientation code:
/// canonical vertex `m` of the face sits at local position `TRIANGLE_ORIENTATIONS[code][m]`
/// of the vertex list an element sees
///
/// Even codes are rotations, odd codes are reflections
pub const TRIANGLE_ORIENTATIONS: [[usize; 3]; NUM_TRIANGLE_ORIENTATIONS] = [
    [0, 1, 2],
    [1, 0, 2],
    [2, 0, 1],
    [2, 1, 0],
    [1, 2, 0],
    [0, 2, 1],
];

/// Relative direction of a shared segment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentOrientation {
    Forward,
    Reversed,
}

impl SegmentOrientation {
    pub fn from_code(code: usize) -> Result<Self> {
        match code {
            0 => Ok(Self::Forward),
            1 => Ok(Self::Reversed),
            _ => Err(invalid_orientation(Geometry::Segment, code)),
        }
    }

    pub const fn code(self) -> usize {
        match self {
            Self::Forward => 0,
            Self::Reversed => 1,
        }
    }
}

/// Relative vertex order of a shared triangle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TriangleOrientation {
    code: usize,
}

impl TriangleOrientation {
    pub fn from_code(code: usize) -> Result<Self> {
        if code < NUM_TRIANGLE_ORIENTATIONS {
            Ok(Self { code })
        } else {
            Err(invalid_orientation(Geometry::Triangle, code))
        }
    }

    /// Find the orientation that maps `local` vertex ids onto `canonical` vertex ids,
    /// i.e. the code `o` with `local[TRIANGLE_ORIENTATIONS[o][m]] == canonical[m]`
    ///
    /// Returns `None` if the two lists are not permutations of each other
    pub fn between(local: [usize; 3], canonical: [usize; 3]) -> Option<Self> {
        TRIANGLE_ORIENTATIONS
            .iter()
            .position(|relabel| (0..3).all(|m| local[relabel[m]] == canonical[m]))
            .map(|code| Self { code })
    }

    pub const fn code(self) -> usize {
        self.code
    }

    pub const fn relabeling(self) -> [usize; 3] {
        TRIANGLE_ORIENTATIONS[self.code]
    }

    pub const fn is_reflection(self) -> bool {
        self.code % 2 == 1
    }
}

/// Precomputed interior-DoF permutations of one geometry, indexed by orientation code
///
/// `permutation(o)[i]` is the canonical index of the DoF an element with orientation `o` numbers `i`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrientationTable {
    geometry: Geometry,
    perms: Vec<Vec<usize>>,
}

impl OrientationTable {
    /// The two orderings of the `p - 1` interior DoFs of a segment
    pub fn segment(p: usize) -> Self {
        let n = interior_dof_count(Geometry::Segment, p);

        Self {
            geometry: Geometry::Segment,
            perms: vec![(0..n).collect(), (0..n).rev().collect()],
        }
    }

    /// The six orderings of the `(p - 1)(p - 2) / 2` interior DoFs of a triangle
    ///
    /// Interior node `(i, j)` (row `j`, column `i`) has integer barycentric coordinates
    /// `(p - i - j, i, j)`. Canonical coordinate `m` is the local coordinate at position
    /// `relabel[m]`; the node's canonical index is read off the moved coordinates.
    pub fn triangle(p: usize) -> Self {
        let n = interior_dof_count(Geometry::Triangle, p);
        let perms = TRIANGLE_ORIENTATIONS
            .iter()
            .map(|relabel| {
                let mut perm = Vec::with_capacity(n);
                for j in 1..p {
                    for i in 1..(p - j) {
                        let local = [p - i - j, i, j];
                        let canonical = [local[relabel[0]], local[relabel[1]], local[relabel[2]]];
                        perm.push(triangle_interior_index(p, canonical[1], canonical[2]));
                    }
                }
                perm
            })
            .collect();

        Self {
            geometry: Geometry::Triangle,
            perms,
        }
    }

    /// A table with no orientations, for geometries that are never shared
    pub fn empty(geometry: Geometry) -> Self {
        Self {
            geometry,
            perms: Vec::new(),
        }
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Number of valid orientation codes
    pub fn num_orientations(&self) -> usize {
        self.perms.len()
    }

    /// Number of DoFs permuted by each orientation
    pub fn dof_count(&self) -> usize {
        self.perms.first().map_or(0, Vec::len)
    }

    pub fn permutation(&self, code: usize) -> Result<&[usize]> {
        self.perms
            .get(code)
            .map(Vec::as_slice)
            .ok_or_else(|| invalid_orientation(self.geometry, code))
    }

    /// Reorder a list of DoF ids numbered by an element with orientation `code` into canonical order
    pub fn apply<T: Copy + Default>(&self, code: usize, local: &[T]) -> Result<Vec<T>> {
        let perm = self.permutation(code)?;
        if local.len() != perm.len() {
            return Err(DomainError::MismatchedValues {
                expected: perm.len(),
                found: local.len(),
            }
            .into());
        }

        let mut canonical = vec![T::default(); perm.len()];
        for (i, &c) in perm.iter().enumerate() {
            canonical[c] = local[i];
        }
        Ok(canonical)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.perms.iter().map(Vec::as_slice)
    }
}

impl fmt::Display for OrientationTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} orientations:", self.geometry)?;
        for (code, perm) in self.perms.iter().enumerate() {
            write!(f, " {}:{:?}", code, perm)?;
        }
        Ok(())
    }
}

/// Canonical index of interior node `(i, j)` of an order `p` triangle
///
/// Nodes are listed row by row (increasing `j`), then by increasing `i`; row `j` holds `p - 1 - j` nodes.
fn triangle_interior_index(p: usize, i: usize, j: usize) -> usize {
    (j - 1) * (p - 1) - (j - 1) * j / 2 + (i - 1)
}

fn invalid_orientation(geometry: Geometry, code: usize) -> crate::error::BasisError {
    DomainError::InvalidOrientation {
        geometry,
        code,
        count: match geometry {
            Geometry::Segment => NUM_SEGMENT_ORIENTATIONS,
            Geometry::Triangle => NUM_TRIANGLE_ORIENTATIONS,
            _ => 0,
        },
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_bijection(perm: &[usize]) -> bool {
        let mut seen = vec![false; perm.len()];
        for &c in perm {
            if c >= perm.len() || seen[c] {
                return false;
            }
            seen[c] = true;
        }
        true
    }

    fn compose(a: &[usize], b: &[usize]) -> Vec<usize> {
        b.iter().map(|&k| a[k]).collect()
    }

    #[test]
    fn segment_tables() {
        assert_eq!(OrientationTable::segment(1).permutation(1).unwrap(), &[] as &[usize]);
        assert_eq!(OrientationTable::segment(2).permutation(1).unwrap(), &[0]);

        for p in 1..8 {
            let table = OrientationTable::segment(p);
            let n = p - 1;
            assert_eq!(table.num_orientations(), 2);
            assert_eq!(table.permutation(0).unwrap(), (0..n).collect::<Vec<_>>().as_slice());

            let rev = table.permutation(1).unwrap();
            assert!(is_bijection(rev));
            for (i, &r) in rev.iter().enumerate() {
                assert_eq!(r, n - 1 - i);
            }
            assert_eq!(compose(rev, rev), (0..n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn triangle_tables_are_bijections() {
        for p in 1..9 {
            let table = OrientationTable::triangle(p);
            let n = (p - 1) * p.saturating_sub(2) / 2;
            assert_eq!(table.num_orientations(), 6);
            assert_eq!(table.dof_count(), n);
            assert_eq!(table.permutation(0).unwrap(), (0..n).collect::<Vec<_>>().as_slice());
            for perm in table.iter() {
                assert_eq!(perm.len(), n);
                assert!(is_bijection(perm));
            }
        }
    }

    #[test]
    fn triangle_group_structure() {
        for p in 3..9 {
            let table = OrientationTable::triangle(p);
            let identity: Vec<usize> = (0..table.dof_count()).collect();
            let perm = |code| table.permutation(code).unwrap();

            // reflections are involutions
            for code in [1, 3, 5] {
                assert_eq!(compose(perm(code), perm(code)), identity);
            }
            // the two non-trivial rotations are each other's inverse
            assert_eq!(compose(perm(2), perm(4)), identity);
            assert_eq!(compose(perm(4), perm(2)), identity);
            assert_eq!(compose(perm(2), &compose(perm(2), perm(2))), identity);
        }
    }

    #[test]
    fn triangle_permutation_moves_nodes_with_vertices() {
        // p = 4: interior nodes (1,1), (2,1), (1,2) sit closest to vertices 0, 1, 2, so local
        // node n becomes the node of the canonical vertex found at local position n
        let table = OrientationTable::triangle(4);
        assert_eq!(table.permutation(1).unwrap(), &[1, 0, 2]);
        assert_eq!(table.permutation(2).unwrap(), &[1, 2, 0]);
        assert_eq!(table.permutation(3).unwrap(), &[2, 1, 0]);
        assert_eq!(table.permutation(4).unwrap(), &[2, 0, 1]);
        assert_eq!(table.permutation(5).unwrap(), &[0, 2, 1]);
    }

    /// Index of the first interior node of `row` (from 0) in a triangle with `n` interior rows
    fn row_start(n: usize, total: usize, row: usize) -> usize {
        total - ((n - row) * (n + 1 - row)) / 2
    }

    #[test]
    fn triangle_tables_match_closed_forms() {
        for p in 4..8 {
            let table = OrientationTable::triangle(p);
            let total = table.dof_count();
            let n = p - 2;

            let mut expected = vec![Vec::with_capacity(total); 6];
            for j in 0..n {
                for i in 0..(n - j) {
                    let k = n - 1 - j - i;
                    expected[0].push(row_start(n, total, j) + i);
                    expected[1].push(row_start(n, total, j) + k);
                    expected[2].push(row_start(n, total, i) + k);
                    expected[3].push(row_start(n, total, k) + i);
                    expected[4].push(row_start(n, total, k) + j);
                    expected[5].push(row_start(n, total, i) + j);
                }
            }

            for (code, perm) in expected.iter().enumerate() {
                assert_eq!(table.permutation(code).unwrap(), perm.as_slice(), "p = {}, code {}", p, code);
            }
        }
    }

    #[test]
    fn invalid_orientation_codes() {
        assert!(OrientationTable::segment(2).permutation(2).is_err());
        assert!(OrientationTable::triangle(2).permutation(6).is_err());
        assert!(SegmentOrientation::from_code(2).is_err());
        assert!(TriangleOrientation::from_code(6).is_err());
        assert_eq!(SegmentOrientation::from_code(1).unwrap(), SegmentOrientation::Reversed);
    }

    #[test]
    fn rotated_face_orientation() {
        // a face seen as (v1, v2, v0) is rotation code 2
        assert_eq!(TriangleOrientation::between([21, 22, 20], [20, 21, 22]).unwrap().code(), 2);
        assert_eq!(TriangleOrientation::between([22, 20, 21], [20, 21, 22]).unwrap().code(), 4);
    }

    #[test]
    fn orientation_between_vertex_lists() {
        let canonical = [10, 20, 30];
        for (code, relabel) in TRIANGLE_ORIENTATIONS.iter().enumerate() {
            let mut local = [0; 3];
            for m in 0..3 {
                local[relabel[m]] = canonical[m];
            }
            let o = TriangleOrientation::between(local, canonical).unwrap();
            assert_eq!(o.code(), code);
            assert_eq!(o.is_reflection(), code % 2 == 1);
        }
        assert!(TriangleOrientation::between([10, 20, 40], canonical).is_none());
    }

    #[test]
    fn apply_reorders_local_ids() {
        let table = OrientationTable::segment(4);
        assert_eq!(table.apply(1, &[7, 8, 9]).unwrap(), vec![9, 8, 7]);
        assert_eq!(table.apply(0, &[7, 8, 9]).unwrap(), vec![7, 8, 9]);
        assert!(table.apply(0, &[7, 8]).is_err());
    }
}
