//! File I/O for meshes and voxel trees
//!
//! Input meshes:
//! - .obj: Wavefront OBJ, with the common `v x y z r g b` color extension
//! - .ply: ASCII PLY with optional `red green blue` vertex properties
//!
//! Output: the line-oriented voxel tree format read by the world builder
//! (see [`voxel`]).
//!
//! Author: Moroya Sakamoto

pub mod obj;
pub mod ply;
pub mod voxel;

pub use obj::{import_obj, parse_obj};
pub use ply::{import_ply, parse_ply};
pub use voxel::{save_octree, write_octree};

use crate::mesh::{Mesh, MeshError};
use log::info;
use std::path::Path;
use thiserror::Error;

/// File I/O errors
#[derive(Error, Debug)]
pub enum IoError {
    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed content at a given line
    #[error("Parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },

    /// Invalid file format
    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    /// Format or extension not supported
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Parsed data does not form a valid mesh
    #[error("Invalid mesh: {0}")]
    Mesh(#[from] MeshError),

    /// Tree must be built before it can be saved
    #[error("Saving tree failed, tree not yet built")]
    TreeNotBuilt,
}

impl IoError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        IoError::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Load a mesh from file (auto-detect format from extension)
///
/// # Arguments
/// * `path` - File path (.obj or .ply)
///
/// # Returns
/// The decoded mesh; the caller owns its vertex buffer
pub fn load_mesh(path: impl AsRef<Path>) -> Result<Mesh, IoError> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    info!("Loading mesh {}...", path.display());
    let mesh = match ext.as_str() {
        "obj" => import_obj(path)?,
        "ply" => import_ply(path)?,
        _ => {
            return Err(IoError::UnsupportedFormat(format!(
                "unknown mesh extension '{}'. Use .obj or .ply",
                ext
            )))
        }
    };
    info!(
        "Done. {} vertices, {} faces{}",
        mesh.vertex_count(),
        mesh.face_count(),
        if mesh.has_colors() { ", vertex colors" } else { "" }
    );
    Ok(mesh)
}
