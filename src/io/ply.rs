//! PLY (Stanford polygon) format support.
//!
//! Faces are loaded as polygons, without triangulation, so one-rings follow
//! the topology stored in the file.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_polygons, to_face_vertex, HalfEdgeMesh};

/// Load a mesh from a PLY file (ASCII or binary).
///
/// # Example
///
/// ```no_run
/// use cotsmooth::io::ply;
///
/// let mesh = ply::load("model.ply").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<HalfEdgeMesh> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let load_error = |message: &str| MeshError::LoadError {
        path: path.to_path_buf(),
        message: message.to_string(),
    };

    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(&mut reader)
        .map_err(|e| load_error(&e.to_string()))?;

    let vertex_element = ply
        .payload
        .get("vertex")
        .ok_or_else(|| load_error("PLY file has no vertex element"))?;

    let mut vertices: Vec<Point3<f64>> = Vec::with_capacity(vertex_element.len());
    for vertex in vertex_element {
        let x = get_float_property(vertex, "x").ok_or_else(|| load_error("vertex missing x coordinate"))?;
        let y = get_float_property(vertex, "y").ok_or_else(|| load_error("vertex missing y coordinate"))?;
        let z = get_float_property(vertex, "z").ok_or_else(|| load_error("vertex missing z coordinate"))?;
        vertices.push(Point3::new(x, y, z));
    }

    let face_element = ply
        .payload
        .get("face")
        .ok_or_else(|| load_error("PLY file has no face element"))?;

    let mut faces: Vec<Vec<usize>> = Vec::with_capacity(face_element.len());
    let mut skipped = 0;
    for face in face_element {
        let indices = get_list_property(face, "vertex_indices")
            .or_else(|| get_list_property(face, "vertex_index"))
            .ok_or_else(|| load_error("face missing vertex_indices property"))?;

        if indices.len() >= 3 {
            faces.push(indices);
        } else {
            skipped += 1;
        }
    }

    if skipped > 0 {
        log::warn!("{}: skipped {} faces with fewer than 3 corners", path.display(), skipped);
    }

    if faces.is_empty() {
        return Err(load_error("PLY file contains no faces"));
    }

    build_from_polygons(&vertices, &faces)
}

fn get_float_property(element: &DefaultElement, name: &str) -> Option<f64> {
    match element.get(name)? {
        Property::Float(v) => Some(f64::from(*v)),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(f64::from(*v)),
        Property::UInt(v) => Some(f64::from(*v)),
        Property::Short(v) => Some(f64::from(*v)),
        Property::UShort(v) => Some(f64::from(*v)),
        Property::Char(v) => Some(f64::from(*v)),
        Property::UChar(v) => Some(f64::from(*v)),
        _ => None,
    }
}

fn get_list_property(element: &DefaultElement, name: &str) -> Option<Vec<usize>> {
    match element.get(name)? {
        Property::ListInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        _ => None,
    }
}

/// Save a mesh to an ASCII PLY file.
///
/// Positions are written as doubles so a load after save reproduces them
/// exactly. Faces keep their corner count.
pub fn save<P: AsRef<Path>>(mesh: &HalfEdgeMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let (vertices, faces) = to_face_vertex(mesh);

    if let Some(face) = faces.iter().find(|f| f.len() > usize::from(u8::MAX)) {
        return Err(MeshError::SaveError {
            path: path.to_path_buf(),
            message: format!("face with {} corners does not fit a uchar list count", face.len()),
        });
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Generated by cotsmooth")?;
    writeln!(writer, "element vertex {}", vertices.len())?;
    writeln!(writer, "property double x")?;
    writeln!(writer, "property double y")?;
    writeln!(writer, "property double z")?;
    writeln!(writer, "element face {}", faces.len())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;

    for v in &vertices {
        writeln!(writer, "{} {} {}", v.x, v.y, v.z)?;
    }

    for f in &faces {
        write!(writer, "{}", f.len())?;
        for i in f {
            write!(writer, " {}", i)?;
        }
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}
