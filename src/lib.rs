//! # cotsmooth
//!
//! Cotangent-weighted Laplacian and Taubin smoothing for polygon meshes.
//!
//! Each iteration moves every interior vertex toward the cotangent-weighted
//! mean of its one-ring. Cotangent weights follow the surface geometry
//! instead of the connectivity alone, so flat regions stay put and vertices
//! do not slide tangentially. Taubin mode adds a negative second step per
//! iteration to counter the shrinkage of plain Laplacian smoothing.
//!
//! ## Features
//!
//! - **Half-edge data structure**: ordered one-rings and boundary flags with type-safe indices
//! - **Pluggable topology**: smooth any host mesh through the [`mesh::Neighborhood`] trait
//! - **Selections**: smooth a subset of vertices via [`algo::smooth::PositionSnapshot`]
//! - **Parallel**: per-vertex updates run on rayon with bit-identical results
//! - **File formats**: PLY, STL
//!
//! ## Quick Start
//!
//! ```no_run
//! use cotsmooth::prelude::*;
//!
//! let mut mesh = cotsmooth::io::load("model.ply").unwrap();
//!
//! let options = SmoothOptions::default()
//!     .with_mode(SmoothMode::Taubin)
//!     .with_iterations(10);
//! smooth_mesh(&mut mesh, &options).unwrap();
//!
//! cotsmooth::io::save(&mesh, "smoothed.ply").unwrap();
//! ```
//!
//! ## Smoothing Explicit Rings
//!
//! Hosts with their own mesh representation can pass rings and boundary
//! flags directly:
//!
//! ```
//! use cotsmooth::prelude::*;
//! use nalgebra::Point3;
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 1.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(-1.0, 0.0, 0.0),
//!     Point3::new(0.0, -1.0, 0.0),
//! ];
//! let rings = vec![vec![1, 2, 3, 4], vec![], vec![], vec![], vec![]];
//! let topology = RingTable::new(&rings, vec![false, true, true, true, true]).unwrap();
//!
//! let options = SmoothOptions::default().with_iterations(1).with_lambda(0.5);
//! let smoothed = smooth_positions(&topology, &positions, &options).unwrap();
//! assert!((smoothed[0].z - 0.5).abs() < 1e-12);
//! assert_eq!(smoothed[1], positions[1]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// ```
/// use cotsmooth::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::smooth::{
        smooth, smooth_mesh, smooth_positions, PositionSnapshot, SmoothMode, SmoothOptions,
    };
    pub use crate::algo::Progress;
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_polygons, build_from_triangles, to_face_vertex, FaceId, HalfEdgeId, HalfEdgeMesh,
        Neighborhood, RingTable, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
