//! Wavefront OBJ import
//!
//! Reads vertex positions (`v`) and faces (`f`). Faces may reference
//! vertices as `v`, `v/vt`, `v/vt/vn` or `v//vn`, with 1-based or negative
//! (relative) indices; polygons are fan-triangulated. Texture coordinates,
//! normals, groups and materials are ignored.
//!
//! Per-vertex color uses the widespread `v x y z r g b` extension (channels
//! in `[0, 1]`). Colors are kept only if every vertex carries one.
//!
//! Author: Moroya Sakamoto

use crate::io::IoError;
use crate::mesh::{Face, Mesh};
use glam::Vec3;
use log::warn;
use std::path::Path;

/// Load a mesh from OBJ format
pub fn import_obj(path: impl AsRef<Path>) -> Result<Mesh, IoError> {
    let content = std::fs::read_to_string(path)?;
    parse_obj(&content)
}

/// Parse OBJ text into a mesh
pub fn parse_obj(content: &str) -> Result<Mesh, IoError> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut colors: Vec<Vec3> = Vec::new();
    let mut faces: Vec<Face> = Vec::new();

    for (line_idx, raw) in content.lines().enumerate() {
        let line_no = line_idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "v" => {
                if parts.len() < 4 {
                    return Err(IoError::parse(line_no, "vertex needs 3 coordinates"));
                }
                let p = parse_vec3(&parts[1..4], line_no)?;
                positions.push(p);
                // Optional weight (4 values) is ignored; 6 values is x y z r g b
                if parts.len() >= 7 {
                    colors.push(parse_vec3(&parts[4..7], line_no)?);
                }
            }
            "f" => {
                if parts.len() < 4 {
                    return Err(IoError::parse(line_no, "face needs at least 3 vertices"));
                }
                let corners = parts[1..]
                    .iter()
                    .map(|s| resolve_index(s, positions.len(), line_no))
                    .collect::<Result<Vec<u32>, IoError>>()?;

                // Fan triangulation
                for i in 1..corners.len() - 1 {
                    faces.push(Face::new(corners[0], corners[i], corners[i + 1]));
                }
            }
            _ => {}
        }
    }

    let colors = if colors.is_empty() {
        None
    } else if colors.len() == positions.len() {
        Some(colors)
    } else {
        warn!(
            "Only {} of {} vertices carry a color; ignoring vertex colors",
            colors.len(),
            positions.len()
        );
        None
    };

    Ok(Mesh::new(positions, faces, colors)?)
}

fn parse_vec3(parts: &[&str], line_no: usize) -> Result<Vec3, IoError> {
    let mut out = [0.0f32; 3];
    for (slot, s) in out.iter_mut().zip(parts) {
        let value: f32 = s
            .parse()
            .map_err(|_| IoError::parse(line_no, format!("invalid number '{}'", s)))?;
        if !value.is_finite() {
            return Err(IoError::parse(line_no, format!("non-finite number '{}'", s)));
        }
        *slot = value;
    }
    Ok(Vec3::from_array(out))
}

/// Resolve the position part of an OBJ face vertex to a 0-based index
///
/// Positive indices are 1-based; negative ones count back from the most
/// recent vertex. Forward references are checked when the mesh is built.
fn resolve_index(token: &str, vertex_count: usize, line_no: usize) -> Result<u32, IoError> {
    let v = token.split('/').next().unwrap_or("");
    let idx: i64 = v
        .parse()
        .map_err(|_| IoError::parse(line_no, format!("invalid face vertex '{}'", token)))?;

    let resolved = if idx > 0 {
        idx - 1
    } else if idx < 0 {
        vertex_count as i64 + idx
    } else {
        return Err(IoError::parse(line_no, "face index 0 is not valid in OBJ"));
    };

    u32::try_from(resolved)
        .map_err(|_| IoError::parse(line_no, format!("face vertex '{}' out of range", token)))
}
