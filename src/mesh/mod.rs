//! Core mesh data structures.
//!
//! [`HalfEdgeMesh`] stores a polygonal mesh with O(1) adjacency queries.
//! [`Neighborhood`] is the narrow view the smoother consumes: ordered
//! one-rings plus boundary flags. [`RingTable`] is a flattened copy of that
//! view and also accepts rings supplied directly by a host application.
//!
//! # Construction
//!
//! ```
//! use cotsmooth::mesh::{build_from_polygons, Neighborhood, VertexId};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mesh = build_from_polygons(&vertices, &[vec![0, 1, 2, 3]]).unwrap();
//! assert!(mesh.is_boundary(VertexId::new(0)));
//! ```

mod builder;
mod halfedge;
mod index;
mod ring;

pub use builder::{build_from_polygons, build_from_triangles, to_face_vertex};
pub use halfedge::{Face, FaceHalfEdgeIter, HalfEdge, HalfEdgeMesh, Vertex, VertexHalfEdgeIter};
pub use index::{FaceId, HalfEdgeId, VertexId};
pub use ring::{Neighborhood, RingTable};
