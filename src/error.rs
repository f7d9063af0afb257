//! Error types for cotsmooth.
//!
//! Only input validation and file I/O produce errors. Numeric trouble inside
//! the smoothing loop (degenerate triangles, incomplete rings, zero total
//! weight) is handled locally by skipping the affected vertex and never
//! reaches the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur while building, loading, or smoothing a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has fewer than three corners or repeats a vertex.
    #[error("face {face} is degenerate (fewer than 3 distinct vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// The same directed edge is used by two faces.
    #[error("edge ({v0}, {v1}) has more than two incident faces or inconsistent winding")]
    NonManifoldEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// A one-ring references a vertex that does not exist.
    #[error("ring of vertex {vertex} references invalid neighbor {neighbor}")]
    InvalidRingIndex {
        /// The vertex whose ring is invalid.
        vertex: usize,
        /// The out-of-range neighbor index.
        neighbor: usize,
    },

    /// Topology and position data disagree on the number of vertices.
    #[error("topology has {topology} vertices but {positions} positions were supplied")]
    TopologyMismatch {
        /// Vertex count reported by the topology.
        topology: usize,
        /// Number of position slots supplied.
        positions: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
