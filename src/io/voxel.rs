//! Voxel tree export
//!
//! Line-oriented text read by the world builder. Depth-first, children in
//! octant order:
//!
//! ```text
//! --(0.000000, 0.000000, 0.000000)---   root anchor
//! f <face>                              root's own faces (only if never split)
//! g (64.000000, 0.000000, 0.000000)     one group per non-root cell
//! f <face>                              faces assigned to the cell
//! c <color>                             mean red intensity, 0 if none
//! ```
//!
//! Author: Moroya Sakamoto

use crate::io::IoError;
use crate::mesh::Mesh;
use crate::octree::{CellId, Octree};
use glam::Vec3;
use log::info;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Save a built tree to file
///
/// Fails with [`IoError::TreeNotBuilt`] before creating the file if the tree
/// has not been built.
pub fn save_octree(tree: &Octree, mesh: &Mesh, path: impl AsRef<Path>) -> Result<(), IoError> {
    if !tree.is_built() {
        return Err(IoError::TreeNotBuilt);
    }
    let path = path.as_ref();
    info!("Saving tree to {}...", path.display());

    let file = std::fs::File::create(path)?;
    let mut w = BufWriter::new(file);
    write_octree(tree, mesh, &mut w)?;
    w.flush()?;

    info!("Complete.");
    Ok(())
}

/// Serialize a built tree into any writer
pub fn write_octree(tree: &Octree, mesh: &Mesh, w: &mut impl Write) -> Result<(), IoError> {
    let root = tree.root().ok_or(IoError::TreeNotBuilt)?;
    let root_cell = tree.cell(root);

    writeln!(w, "--{}---", format_anchor(root_cell.anchor()))?;
    for f in root_cell.faces() {
        writeln!(w, "f {}", f)?;
    }
    for child in tree.children(root) {
        write_cell(tree, mesh, child, w)?;
    }
    Ok(())
}

fn write_cell(tree: &Octree, mesh: &Mesh, id: CellId, w: &mut impl Write) -> Result<(), IoError> {
    let cell = tree.cell(id);

    writeln!(w, "g {}", format_anchor(cell.anchor()))?;
    for f in cell.faces() {
        writeln!(w, "f {}", f)?;
    }
    match cell_color(mesh, cell.faces()) {
        Some(color) => writeln!(w, "c {:.6}", color)?,
        None => writeln!(w, "c 0")?,
    }

    for child in tree.children(id) {
        write_cell(tree, mesh, child, w)?;
    }
    Ok(())
}

/// Mean red intensity (0-255) over the corners of the given faces
///
/// `None` when there are no faces or the mesh has no vertex colors.
pub fn cell_color(mesh: &Mesh, faces: &[u32]) -> Option<f32> {
    let colors = mesh.colors()?;
    if faces.is_empty() {
        return None;
    }

    let sum: f32 = faces
        .iter()
        .flat_map(|&f| mesh.faces()[f as usize].indices())
        .map(|v| colors[v as usize].x * 255.0)
        .sum();
    Some(sum / (faces.len() as f32 * 3.0))
}

/// Render a cell anchor as `(x, y, z)` with six decimals
pub fn format_anchor(p: Vec3) -> String {
    format!("({:.6}, {:.6}, {:.6})", p.x, p.y, p.z)
}
