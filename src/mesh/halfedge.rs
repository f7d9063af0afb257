//! Half-edge mesh data structure.
//!
//! Polygonal meshes (triangles, quads, or mixed n-gons) are stored as a
//! half-edge list. Smoothing needs two things from the mesh: the ordered
//! one-ring of a vertex and whether the vertex lies on an open border. Both
//! fall out of walking outgoing half-edges around the vertex.
//!
//! # Structure
//!
//! - Each edge is split into two **half-edges** pointing in opposite directions
//! - Each half-edge knows its **twin**, **next**, **prev**, **origin vertex**,
//!   and **incident face**
//! - Each vertex stores one outgoing half-edge
//! - Each face stores one half-edge on its boundary
//!
//! # Boundary Handling
//!
//! Boundary half-edges have an invalid face ID and are linked into loops with
//! `next`/`prev`. A boundary vertex always stores a boundary half-edge as its
//! outgoing half-edge, so the one-ring walk starts at the open side.

use nalgebra::Point3;

use super::index::{FaceId, HalfEdgeId, VertexId};

/// A vertex in the half-edge mesh.
#[derive(Debug, Clone)]
pub struct Vertex {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// One outgoing half-edge from this vertex.
    /// For boundary vertices, this is guaranteed to be a boundary half-edge.
    pub halfedge: HalfEdgeId,
}

impl Vertex {
    /// Create a new unconnected vertex at the given position.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            halfedge: HalfEdgeId::invalid(),
        }
    }
}

/// A half-edge in the mesh.
#[derive(Debug, Clone, Copy, Default)]
pub struct HalfEdge {
    /// The vertex this half-edge originates from.
    pub origin: VertexId,

    /// The opposite half-edge.
    pub twin: HalfEdgeId,

    /// The next half-edge around the face.
    pub next: HalfEdgeId,

    /// The previous half-edge around the face.
    pub prev: HalfEdgeId,

    /// The face this half-edge belongs to. Invalid on the boundary.
    pub face: FaceId,
}

impl HalfEdge {
    /// Check if this half-edge is on the boundary.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        !self.face.is_valid()
    }
}

/// A polygonal face.
#[derive(Debug, Clone, Copy, Default)]
pub struct Face {
    /// One half-edge on the boundary of this face.
    pub halfedge: HalfEdgeId,
}

/// A half-edge mesh of arbitrary polygons.
#[derive(Debug, Clone, Default)]
pub struct HalfEdgeMesh {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) halfedges: Vec<HalfEdge>,
    pub(crate) faces: Vec<Face>,
}

impl HalfEdgeMesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh with pre-allocated capacity.
    ///
    /// `num_corners` is the total number of face corners (sum of face sizes),
    /// which equals the number of interior half-edges.
    pub fn with_capacity(num_vertices: usize, num_faces: usize, num_corners: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(num_vertices),
            // Boundary half-edges come on top of the interior ones.
            halfedges: Vec::with_capacity(num_corners + num_corners / 4),
            faces: Vec::with_capacity(num_faces),
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of half-edges (including boundary half-edges).
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    #[inline]
    pub(crate) fn vertex_mut(&mut self, id: VertexId) -> &mut Vertex {
        &mut self.vertices[id.index()]
    }

    /// Get a half-edge by ID.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId) -> &HalfEdge {
        &self.halfedges[id.index()]
    }

    #[inline]
    pub(crate) fn halfedge_mut(&mut self, id: HalfEdgeId) -> &mut HalfEdge {
        &mut self.halfedges[id.index()]
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId) -> &Point3<f64> {
        &self.vertex(v).position
    }

    /// Set the position of a vertex.
    #[inline]
    pub fn set_position(&mut self, v: VertexId, pos: Point3<f64>) {
        self.vertex_mut(v).position = pos;
    }

    /// Copy all vertex positions out, in vertex index order.
    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.vertices.iter().map(|v| v.position).collect()
    }

    // ==================== Topology Queries ====================

    /// Get the twin (opposite) half-edge.
    #[inline]
    pub fn twin(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.halfedge(he).twin
    }

    /// Get the next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.halfedge(he).next
    }

    /// Get the previous half-edge around the face.
    #[inline]
    pub fn prev(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.halfedge(he).prev
    }

    /// Get the origin vertex of a half-edge.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId) -> VertexId {
        self.halfedge(he).origin
    }

    /// Get the destination vertex of a half-edge.
    #[inline]
    pub fn dest(&self, he: HalfEdgeId) -> VertexId {
        self.origin(self.twin(he))
    }

    /// Check if a half-edge is on the boundary.
    #[inline]
    pub fn is_boundary_halfedge(&self, he: HalfEdgeId) -> bool {
        self.halfedge(he).is_boundary()
    }

    /// Check if a vertex is on the boundary.
    ///
    /// Isolated vertices (no incident faces) count as boundary vertices, so
    /// they are never moved by smoothing.
    pub fn is_boundary_vertex(&self, v: VertexId) -> bool {
        let start = self.vertex(v).halfedge;
        if !start.is_valid() {
            return true;
        }
        self.vertex_halfedges(v)
            .any(|he| self.is_boundary_halfedge(he))
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all half-edge IDs.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        (0..self.halfedges.len()).map(HalfEdgeId::new)
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// Iterate over outgoing half-edges around a vertex, in ring order.
    pub fn vertex_halfedges(&self, v: VertexId) -> VertexHalfEdgeIter<'_> {
        VertexHalfEdgeIter::new(self, v)
    }

    /// Iterate over the one-ring of a vertex.
    ///
    /// The order is cyclic and has the same orientation for every vertex,
    /// so consecutive neighbors span a face corner at `v`.
    pub fn vertex_neighbors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.vertex_halfedges(v).map(|he| self.dest(he))
    }

    /// Iterate over half-edges around a face.
    pub fn face_halfedges(&self, f: FaceId) -> FaceHalfEdgeIter<'_> {
        FaceHalfEdgeIter::new(self, f)
    }

    /// Iterate over the corners of a face.
    pub fn face_vertices(&self, f: FaceId) -> impl Iterator<Item = VertexId> + '_ {
        self.face_halfedges(f).map(|he| self.origin(he))
    }

    // ==================== Geometry ====================

    /// Compute the length of an edge.
    pub fn edge_length(&self, he: HalfEdgeId) -> f64 {
        let p0 = self.position(self.origin(he));
        let p1 = self.position(self.dest(he));
        (p1 - p0).norm()
    }

    /// Average length over all edges, counting each edge once.
    pub fn average_edge_length(&self) -> f64 {
        let (sum, count) = self
            .halfedge_ids()
            .filter(|&he| he < self.twin(he))
            .fold((0.0, 0usize), |(sum, count), he| {
                (sum + self.edge_length(he), count + 1)
            });
        if count == 0 {
            0.0
        } else {
            sum / count as f64
        }
    }

    /// Compute the valence (degree) of a vertex.
    pub fn valence(&self, v: VertexId) -> usize {
        self.vertex_halfedges(v).count()
    }

    /// Compute the axis-aligned bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.vertices.first()?.position;
        let (mut min, mut max) = (first, first);
        for v in &self.vertices {
            for i in 0..3 {
                min[i] = min[i].min(v.position[i]);
                max[i] = max[i].max(v.position[i]);
            }
        }
        Some((min, max))
    }

    // ==================== Construction ====================

    /// Add a new unconnected vertex and return its ID.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex::new(position));
        id
    }

    // ==================== Validation ====================

    /// Check that all connectivity is consistent.
    pub fn is_valid(&self) -> bool {
        let vertices_ok = self.vertex_ids().all(|v| {
            let he = self.vertex(v).halfedge;
            !he.is_valid() || self.origin(he) == v
        });

        let halfedges_ok = self.halfedge_ids().all(|id| {
            let he = self.halfedge(id);
            he.twin.is_valid()
                && self.twin(he.twin) == id
                && (!he.next.is_valid() || self.prev(he.next) == id)
                && (!he.prev.is_valid() || self.next(he.prev) == id)
        });

        let faces_ok = self.faces.iter().all(|f| f.halfedge.is_valid());

        vertices_ok && halfedges_ok && faces_ok
    }
}

/// Iterator over outgoing half-edges around a vertex.
///
/// Rotates with `next(twin(he))`. Stops when it returns to the start or hits
/// an unlinked half-edge (non-manifold input).
pub struct VertexHalfEdgeIter<'a> {
    mesh: &'a HalfEdgeMesh,
    start: HalfEdgeId,
    current: HalfEdgeId,
    done: bool,
}

impl<'a> VertexHalfEdgeIter<'a> {
    fn new(mesh: &'a HalfEdgeMesh, v: VertexId) -> Self {
        let start = mesh.vertex(v).halfedge;
        Self {
            mesh,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }
}

impl<'a> Iterator for VertexHalfEdgeIter<'a> {
    type Item = HalfEdgeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;

        // he: v -> w, twin(he): w -> v, next(twin(he)) leaves v again.
        self.current = self.mesh.next(self.mesh.twin(self.current));

        if self.current == self.start || !self.current.is_valid() {
            self.done = true;
        }

        Some(result)
    }
}

/// Iterator over half-edges around a face.
pub struct FaceHalfEdgeIter<'a> {
    mesh: &'a HalfEdgeMesh,
    start: HalfEdgeId,
    current: HalfEdgeId,
    done: bool,
}

impl<'a> FaceHalfEdgeIter<'a> {
    fn new(mesh: &'a HalfEdgeMesh, f: FaceId) -> Self {
        let start = mesh.face(f).halfedge;
        Self {
            mesh,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }
}

impl<'a> Iterator for FaceHalfEdgeIter<'a> {
    type Item = HalfEdgeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;
        self.current = self.mesh.next(self.current);

        if self.current == self.start {
            self.done = true;
        }

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_triangles;

    /// Square split into four triangles around a center vertex.
    fn fan() -> HalfEdgeMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [0, 2, 3], [0, 3, 4], [0, 4, 1]];
        build_from_triangles(&vertices, &faces).unwrap()
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = HalfEdgeMesh::new();
        assert_eq!(mesh.num_vertices(), 0);
        assert_eq!(mesh.num_faces(), 0);
        assert!(mesh.is_valid());
        assert!(mesh.bounding_box().is_none());
    }

    #[test]
    fn test_isolated_vertex_is_boundary() {
        let mut mesh = HalfEdgeMesh::new();
        let v = mesh.add_vertex(Point3::new(1.0, 2.0, 3.0));
        assert!(mesh.is_boundary_vertex(v));
        assert_eq!(mesh.vertex_neighbors(v).count(), 0);
    }

    #[test]
    fn test_fan_center_ring() {
        let mesh = fan();
        let center = VertexId::new(0);
        assert!(!mesh.is_boundary_vertex(center));

        let ring: Vec<usize> = mesh.vertex_neighbors(center).map(|v| v.index()).collect();
        assert_eq!(ring.len(), 4);

        // Cyclic order: every consecutive pair must share a face with the center.
        let mut sorted = ring.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![1, 2, 3, 4]);
        for i in 0..4 {
            let a = ring[i];
            let b = ring[(i + 1) % 4];
            let adjacent = (a % 4) + 1 == b || (b % 4) + 1 == a;
            assert!(adjacent, "ring {:?} is not cyclically ordered", ring);
        }
    }

    #[test]
    fn test_fan_rim_is_boundary() {
        let mesh = fan();
        for i in 1..5 {
            assert!(mesh.is_boundary_vertex(VertexId::new(i)));
            assert_eq!(mesh.valence(VertexId::new(i)), 3);
        }
    }

    #[test]
    fn test_average_edge_length() {
        let mesh = fan();
        // 4 spokes of length 1 and 4 rim edges of length sqrt(2).
        let expected = (4.0 + 4.0 * 2f64.sqrt()) / 8.0;
        assert!((mesh.average_edge_length() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_bounding_box() {
        let mesh = fan();
        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min, Point3::new(-1.0, -1.0, 0.0));
        assert_eq!(max, Point3::new(1.0, 1.0, 0.0));
    }
}
