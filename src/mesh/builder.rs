//! Mesh construction utilities.
//!
//! Builds half-edge meshes from face-vertex polygon lists as found in mesh
//! files, and converts them back.

use std::collections::HashMap;

use nalgebra::Point3;

use super::halfedge::{Face, HalfEdge, HalfEdgeMesh};
use super::index::{FaceId, HalfEdgeId, VertexId};
use crate::error::{MeshError, Result};

/// Build a half-edge mesh from vertices and triangle faces.
///
/// # Example
/// ```
/// use cotsmooth::mesh::build_from_triangles;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let mesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.num_faces(), 1);
/// ```
pub fn build_from_triangles(vertices: &[Point3<f64>], faces: &[[usize; 3]]) -> Result<HalfEdgeMesh> {
    let polygons: Vec<Vec<usize>> = faces.iter().map(|f| f.to_vec()).collect();
    build_from_polygons(vertices, &polygons)
}

/// Build a half-edge mesh from vertices and polygonal faces.
///
/// Faces must be consistently wound; each face lists its corners in order.
/// Faces of any size >= 3 may be mixed.
///
/// # Errors
///
/// - [`MeshError::EmptyMesh`] if `faces` is empty
/// - [`MeshError::InvalidVertexIndex`] if a corner is out of range
/// - [`MeshError::DegenerateFace`] if a face has < 3 corners or repeats a vertex
/// - [`MeshError::NonManifoldEdge`] if a directed edge appears twice
pub fn build_from_polygons(vertices: &[Point3<f64>], faces: &[Vec<usize>]) -> Result<HalfEdgeMesh> {
    if faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    for (fi, face) in faces.iter().enumerate() {
        if face.len() < 3 {
            return Err(MeshError::DegenerateFace { face: fi });
        }
        for (ci, &vi) in face.iter().enumerate() {
            if vi >= vertices.len() {
                return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
            }
            if face[ci + 1..].contains(&vi) {
                return Err(MeshError::DegenerateFace { face: fi });
            }
        }
    }

    let num_corners: usize = faces.iter().map(Vec::len).sum();
    let mut mesh = HalfEdgeMesh::with_capacity(vertices.len(), faces.len(), num_corners);

    let vertex_ids: Vec<VertexId> = vertices.iter().map(|&pos| mesh.add_vertex(pos)).collect();

    // Directed edge (v0, v1) -> interior half-edge.
    let mut edge_map: HashMap<(usize, usize), HalfEdgeId> = HashMap::with_capacity(num_corners);

    for face in faces {
        let face_id = FaceId::new(mesh.num_faces());
        let first = mesh.num_halfedges();
        let n = face.len();

        mesh.faces.push(Face {
            halfedge: HalfEdgeId::new(first),
        });

        for (k, &v) in face.iter().enumerate() {
            let he = HalfEdgeId::new(first + k);
            mesh.halfedges.push(HalfEdge {
                origin: vertex_ids[v],
                twin: HalfEdgeId::invalid(),
                next: HalfEdgeId::new(first + (k + 1) % n),
                prev: HalfEdgeId::new(first + (k + n - 1) % n),
                face: face_id,
            });
            mesh.vertex_mut(vertex_ids[v]).halfedge = he;

            let w = face[(k + 1) % n];
            if edge_map.insert((v, w), he).is_some() {
                return Err(MeshError::NonManifoldEdge { v0: v, v1: w });
            }
        }
    }

    // Link twins, creating boundary half-edges for open edges. Sorted so the
    // half-edge layout does not depend on hash order.
    let mut directed: Vec<((usize, usize), HalfEdgeId)> = edge_map.iter().map(|(&k, &v)| (k, v)).collect();
    directed.sort_unstable_by_key(|&(_, he)| he);

    for ((v0, v1), he) in directed {
        if let Some(&twin) = edge_map.get(&(v1, v0)) {
            mesh.halfedge_mut(he).twin = twin;
        } else {
            let boundary_he = HalfEdgeId::new(mesh.num_halfedges());
            mesh.halfedges.push(HalfEdge {
                origin: vertex_ids[v1],
                twin: he,
                ..HalfEdge::default()
            });
            mesh.halfedge_mut(he).twin = boundary_he;
        }
    }

    link_boundary_loops(&mut mesh);
    fix_boundary_vertex_halfedges(&mut mesh);

    Ok(mesh)
}

/// Link boundary half-edges into loops via `next`/`prev`.
fn link_boundary_loops(mesh: &mut HalfEdgeMesh) {
    let boundary_hes: Vec<HalfEdgeId> = mesh
        .halfedge_ids()
        .filter(|&he| mesh.is_boundary_halfedge(he))
        .collect();

    let outgoing: HashMap<VertexId, HalfEdgeId> = boundary_hes
        .iter()
        .map(|&he| (mesh.origin(he), he))
        .collect();

    for &he in &boundary_hes {
        if let Some(&next_he) = outgoing.get(&mesh.dest(he)) {
            mesh.halfedge_mut(he).next = next_he;
            mesh.halfedge_mut(next_he).prev = he;
        }
    }
}

/// Point every boundary vertex at one of its outgoing boundary half-edges,
/// so one-ring walks start on the open side.
fn fix_boundary_vertex_halfedges(mesh: &mut HalfEdgeMesh) {
    for he in mesh.halfedge_ids().collect::<Vec<_>>() {
        if mesh.is_boundary_halfedge(he) {
            let origin = mesh.origin(he);
            mesh.vertex_mut(origin).halfedge = he;
        }
    }
}

/// Convert a half-edge mesh back to a face-vertex representation.
///
/// Returns `(vertices, faces)` with faces in their original polygon form.
pub fn to_face_vertex(mesh: &HalfEdgeMesh) -> (Vec<Point3<f64>>, Vec<Vec<usize>>) {
    let vertices = mesh.positions();
    let faces = mesh
        .face_ids()
        .map(|f| mesh.face_vertices(f).map(VertexId::index).collect())
        .collect();
    (vertices, faces)
}
