//! One-ring neighborhoods.
//!
//! Smoothing never looks at faces directly. It needs, per vertex, the ordered
//! ring of directly connected vertices and a boundary flag. [`Neighborhood`]
//! is that contract; [`HalfEdgeMesh`] implements it, and hosts with their own
//! topology can implement it too or hand over explicit rings via
//! [`RingTable::new`].
//!
//! Because topology is fixed for a whole smoothing run, the smoother flattens
//! whatever provider it gets into a [`RingTable`] once up front.

use super::halfedge::HalfEdgeMesh;
use super::index::VertexId;
use crate::error::{MeshError, Result};

/// Supplies per-vertex adjacency to the smoother.
///
/// Rings must be cyclic and consistently oriented: for an interior vertex of
/// a triangle mesh, ring entries `i` and `i + 1` together with the vertex
/// form a face.
pub trait Neighborhood {
    /// Number of vertices addressed by this topology.
    fn num_vertices(&self) -> usize;

    /// Whether the vertex lies on an open border. Boundary vertices are never moved.
    fn is_boundary(&self, v: VertexId) -> bool;

    /// The ordered one-ring of `v`.
    fn ring_neighbors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_;
}

impl Neighborhood for HalfEdgeMesh {
    fn num_vertices(&self) -> usize {
        HalfEdgeMesh::num_vertices(self)
    }

    fn is_boundary(&self, v: VertexId) -> bool {
        self.is_boundary_vertex(v)
    }

    fn ring_neighbors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.vertex_neighbors(v)
    }
}

/// Compressed one-ring table.
///
/// Rings are stored back to back in one buffer with an offset per vertex,
/// so looking up a ring is a slice borrow.
#[derive(Debug, Clone, Default)]
pub struct RingTable {
    offsets: Vec<usize>,
    neighbors: Vec<VertexId>,
    boundary: Vec<bool>,
}

impl RingTable {
    /// Build a table from explicit rings and boundary flags.
    ///
    /// # Errors
    ///
    /// - [`MeshError::TopologyMismatch`] if `rings` and `boundary` differ in length
    /// - [`MeshError::InvalidRingIndex`] if a ring names a vertex that does not exist
    ///
    /// # Example
    ///
    /// ```
    /// use cotsmooth::mesh::{Neighborhood, RingTable, VertexId};
    ///
    /// let rings = vec![vec![1, 2, 3, 4], vec![], vec![], vec![], vec![]];
    /// let boundary = vec![false, true, true, true, true];
    /// let table = RingTable::new(&rings, boundary).unwrap();
    /// assert_eq!(table.ring(VertexId::new(0)).len(), 4);
    /// assert!(table.is_boundary(VertexId::new(3)));
    /// ```
    pub fn new(rings: &[Vec<usize>], boundary: Vec<bool>) -> Result<Self> {
        if rings.len() != boundary.len() {
            return Err(MeshError::TopologyMismatch {
                topology: boundary.len(),
                positions: rings.len(),
            });
        }

        let n = rings.len();
        let mut offsets = Vec::with_capacity(n + 1);
        let mut neighbors = Vec::with_capacity(rings.iter().map(Vec::len).sum());
        offsets.push(0);

        for (vertex, ring) in rings.iter().enumerate() {
            for &neighbor in ring {
                if neighbor >= n {
                    return Err(MeshError::InvalidRingIndex { vertex, neighbor });
                }
                neighbors.push(VertexId::new(neighbor));
            }
            offsets.push(neighbors.len());
        }

        Ok(Self {
            offsets,
            neighbors,
            boundary,
        })
    }

    /// Flatten any neighborhood provider into a table.
    ///
    /// Rings are copied verbatim. A neighbor outside `0..num_vertices()` has
    /// no position in any snapshot, so the vertex naming it is never moved.
    pub fn from_neighborhood<N: Neighborhood>(topology: &N) -> Self {
        let n = topology.num_vertices();
        let mut offsets = Vec::with_capacity(n + 1);
        let mut neighbors = Vec::new();
        let mut boundary = Vec::with_capacity(n);
        offsets.push(0);

        for i in 0..n {
            let v = VertexId::new(i);
            boundary.push(topology.is_boundary(v));
            neighbors.extend(topology.ring_neighbors(v));
            offsets.push(neighbors.len());
        }

        Self {
            offsets,
            neighbors,
            boundary,
        }
    }

    /// Number of vertices in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.boundary.len()
    }

    /// Whether the table has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.boundary.is_empty()
    }

    /// The ordered one-ring of `v`.
    #[inline]
    pub fn ring(&self, v: VertexId) -> &[VertexId] {
        let i = v.index();
        &self.neighbors[self.offsets[i]..self.offsets[i + 1]]
    }

    /// Boundary flag of `v`.
    #[inline]
    pub fn boundary(&self, v: VertexId) -> bool {
        self.boundary[v.index()]
    }

    /// Number of boundary vertices.
    pub fn num_boundary(&self) -> usize {
        self.boundary.iter().filter(|&&b| b).count()
    }
}

impl Neighborhood for RingTable {
    fn num_vertices(&self) -> usize {
        self.len()
    }

    fn is_boundary(&self, v: VertexId) -> bool {
        self.boundary(v)
    }

    fn ring_neighbors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.ring(v).iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_triangles;
    use nalgebra::Point3;

    #[test]
    fn test_new_validates_lengths() {
        let rings = vec![vec![1], vec![0]];
        let result = RingTable::new(&rings, vec![false]);
        assert!(matches!(
            result,
            Err(MeshError::TopologyMismatch { topology: 1, positions: 2 })
        ));
    }

    #[test]
    fn test_new_validates_indices() {
        let rings = vec![vec![1, 5], vec![0]];
        let result = RingTable::new(&rings, vec![false, false]);
        assert!(matches!(
            result,
            Err(MeshError::InvalidRingIndex { vertex: 0, neighbor: 5 })
        ));
    }

    #[test]
    fn test_rings_are_sliced_per_vertex() {
        let rings = vec![vec![1, 2], vec![], vec![0, 1, 3], vec![2]];
        let table = RingTable::new(&rings, vec![false, true, false, true]).unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(table.num_boundary(), 2);
        assert!(table.ring(VertexId::new(1)).is_empty());
        let ring2: Vec<usize> = table.ring(VertexId::new(2)).iter().map(|v| v.index()).collect();
        assert_eq!(ring2, vec![0, 1, 3]);
    }

    #[test]
    fn test_from_half_edge_mesh() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [0, 2, 3], [0, 3, 4], [0, 4, 1]];
        let mesh = build_from_triangles(&vertices, &faces).unwrap();

        let table = RingTable::from_neighborhood(&mesh);
        assert_eq!(table.len(), 5);
        assert!(!table.boundary(VertexId::new(0)));
        assert_eq!(table.num_boundary(), 4);

        let expected: Vec<VertexId> = mesh.vertex_neighbors(VertexId::new(0)).collect();
        assert_eq!(table.ring(VertexId::new(0)), expected.as_slice());
    }

    /// Host topology whose first ring names a vertex that does not exist.
    struct DanglingRing;

    impl Neighborhood for DanglingRing {
        fn num_vertices(&self) -> usize {
            3
        }

        fn is_boundary(&self, v: VertexId) -> bool {
            v.index() != 0
        }

        fn ring_neighbors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
            let ring: &[usize] = if v.index() == 0 { &[1, 2, 7] } else { &[] };
            ring.iter().map(|&i| VertexId::new(i))
        }
    }

    #[test]
    fn test_from_neighborhood_keeps_unknown_neighbors() {
        let table = RingTable::from_neighborhood(&DanglingRing);
        let ring: Vec<usize> = table.ring(VertexId::new(0)).iter().map(|v| v.index()).collect();
        assert_eq!(ring, vec![1, 2, 7]);
    }

    #[test]
    fn test_table_is_its_own_neighborhood() {
        let rings = vec![vec![1, 2], vec![0], vec![0]];
        let table = RingTable::new(&rings, vec![false, true, true]).unwrap();
        let copy = RingTable::from_neighborhood(&table);
        assert_eq!(copy.ring(VertexId::new(0)), table.ring(VertexId::new(0)));
        assert_eq!(copy.num_boundary(), 2);
    }
}
