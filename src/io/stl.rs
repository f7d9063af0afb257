//! STL (stereolithography) format support.
//!
//! STL stores three corners per triangle. Corners with identical coordinates
//! are welded into one vertex on load so the mesh has real one-rings.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use nalgebra::{Point3, Vector3};

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_triangles, to_face_vertex, HalfEdgeMesh};

/// Load a mesh from an STL file (binary or ASCII).
///
/// # Example
///
/// ```no_run
/// use cotsmooth::io::stl;
///
/// let mesh = stl::load("model.stl").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<HalfEdgeMesh> {
    let path = path.as_ref();
    let mut file = File::open(path)?;

    let stl = stl_io::read_stl(&mut file).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut welded: HashMap<[u32; 3], usize> = HashMap::with_capacity(stl.vertices.len());
    let mut vertices: Vec<Point3<f64>> = Vec::with_capacity(stl.vertices.len());
    let mut faces: Vec<[usize; 3]> = Vec::with_capacity(stl.faces.len());
    let mut degenerate = 0;

    for tri in &stl.faces {
        let mut corners = [0usize; 3];
        for (corner, &index) in corners.iter_mut().zip(&tri.vertices) {
            let vtx = &stl.vertices[index];
            let key = [vtx[0].to_bits(), vtx[1].to_bits(), vtx[2].to_bits()];
            *corner = *welded.entry(key).or_insert_with(|| {
                vertices.push(Point3::new(f64::from(vtx[0]), f64::from(vtx[1]), f64::from(vtx[2])));
                vertices.len() - 1
            });
        }

        let [i0, i1, i2] = corners;
        if i0 != i1 && i1 != i2 && i0 != i2 {
            faces.push(corners);
        } else {
            degenerate += 1;
        }
    }

    if degenerate > 0 {
        log::warn!("{}: dropped {} degenerate triangles", path.display(), degenerate);
    }

    if faces.is_empty() {
        return Err(MeshError::LoadError {
            path: path.to_path_buf(),
            message: "STL file contains no valid triangles".to_string(),
        });
    }

    build_from_triangles(&vertices, &faces)
}

/// Save a mesh to a binary STL file. Polygons are fan-triangulated.
pub fn save<P: AsRef<Path>>(mesh: &HalfEdgeMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let (vertices, faces) = to_face_vertex(mesh);

    let vertex = |p: &Point3<f64>| stl_io::Vertex::new([p.x as f32, p.y as f32, p.z as f32]);

    let triangles: Vec<stl_io::Triangle> = faces
        .iter()
        .flat_map(|f| (1..f.len() - 1).map(move |i| [f[0], f[i], f[i + 1]]))
        .map(|[a, b, c]| {
            let (p0, p1, p2) = (&vertices[a], &vertices[b], &vertices[c]);
            let n = (p1 - p0)
                .cross(&(p2 - p0))
                .try_normalize(f64::EPSILON)
                .unwrap_or_else(Vector3::zeros);

            stl_io::Triangle {
                normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: [vertex(p0), vertex(p1), vertex(p2)],
            }
        })
        .collect();

    stl_io::write_stl(&mut writer, triangles.iter()).map_err(|e| MeshError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(())
}
