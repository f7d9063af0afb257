//! Mesh file I/O.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | PLY | `.ply` | ✓ | ✓ | Polygons kept as-is, ASCII on save |
//! | STL | `.stl` | ✓ | ✓ | Vertices welded on load, binary on save |
//!
//! # Usage
//!
//! ```no_run
//! use cotsmooth::io::{load, save};
//!
//! let mesh = load("model.ply").unwrap();
//! save(&mesh, "output.stl").unwrap();
//! ```

pub mod ply;
pub mod stl;

use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::HalfEdgeMesh;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// PLY (Stanford polygon) format.
    Ply,
    /// STL (stereolithography) format.
    Stl,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "ply" => Some(Format::Ply),
            "stl" => Some(Format::Stl),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

fn detect(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load a mesh, picking the format from the file extension.
pub fn load<P: AsRef<Path>>(path: P) -> Result<HalfEdgeMesh> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Ply => ply::load(path),
        Format::Stl => stl::load(path),
    }
}

/// Save a mesh, picking the format from the file extension.
pub fn save<P: AsRef<Path>>(mesh: &HalfEdgeMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Ply => ply::save(mesh, path),
        Format::Stl => stl::save(mesh, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path("a/b/mesh.PLY"), Some(Format::Ply));
        assert_eq!(Format::from_path("mesh.stl"), Some(Format::Stl));
        assert_eq!(Format::from_path("mesh.obj"), None);
        assert_eq!(Format::from_path("mesh"), None);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = load("model.gltf");
        assert!(matches!(
            result,
            Err(MeshError::UnsupportedFormat { ref extension }) if extension == "gltf"
        ));

        let result = save(&HalfEdgeMesh::new(), "model");
        assert!(matches!(
            result,
            Err(MeshError::UnsupportedFormat { ref extension }) if extension == "(none)"
        ));
    }
}
