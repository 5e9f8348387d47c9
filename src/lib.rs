//! # minecrafter
//!
//! Turns a triangle mesh into an octree of unit voxels for building
//! block worlds.
//!
//! The mesh is rescaled so its longest axis spans exactly the 128-block
//! world height, then a cube of that size is split recursively into eight
//! octants down to unit cells. Every cell records the faces that touch it,
//! and the tree is written as a line-oriented text file for the world
//! builder.
//!
//! ## Features
//!
//! - **Mesh input**: Wavefront OBJ and ASCII PLY, optional vertex colors
//! - **Normalization**: aspect-preserving fit onto the height limit
//! - **Octree**: exact triangle/box assignment, arena-backed cells
//! - **Export**: depth-first voxel tree with per-cell red intensity
//!
//! ## Example
//!
//! ```rust
//! use minecrafter::prelude::*;
//!
//! let mut mesh = Mesh::new(
//!     vec![Vec3::ZERO, Vec3::new(127.0, 0.0, 0.0), Vec3::new(0.0, 127.0, 0.0)],
//!     vec![Face::new(0, 1, 2)],
//!     None,
//! )
//! .unwrap();
//!
//! let metrics = normalize(&mut mesh).unwrap();
//! assert_eq!(metrics.range, Vec3::new(128.0, 128.0, 0.0));
//!
//! let tree = Octree::from_mesh(&mesh);
//! assert_eq!(tree.max_depth(), 7);
//!
//! let mut out = Vec::new();
//! write_octree(&tree, &mesh, &mut out).unwrap();
//! assert!(out.starts_with(b"--(0.000000, 0.000000, 0.000000)---\n"));
//! ```
//!
//! ## Author
//!
//! Moroya Sakamoto

#![warn(missing_docs)]

pub mod convert;
pub mod io;
pub mod mesh;
pub mod octree;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude - commonly used types and functions
pub mod prelude {
    pub use crate::convert::{convert_file, voxelize, ConversionSummary, ConvertConfig, ConvertError};
    pub use crate::io::{import_obj, import_ply, load_mesh, save_octree, write_octree, IoError};
    pub use crate::mesh::{
        normalize, normalize_with_limit, Aabb, Axis, Face, Mesh, MeshError, MeshMetrics,
        NormalizeError, HEIGHT_LIMIT,
    };
    pub use crate::octree::{Cell, CellId, Octree, OctreeConfig, OctreeError, OctreeStats};
    pub use glam::Vec3;
}

// Re-exports for convenience
pub use convert::convert_file;
pub use mesh::{normalize, Mesh};
pub use octree::Octree;

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_basic_workflow() {
        let mut mesh = Mesh::new(
            vec![
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.5),
            ],
            vec![Face::new(0, 1, 2)],
            None,
        )
        .unwrap();

        let metrics = normalize(&mut mesh).unwrap();
        assert_eq!(metrics.min, Vec3::ZERO);

        let mut tree = Octree::from_mesh(&mesh);
        assert!(tree.occupied_leaves().count() > 0);

        let mut out = Vec::new();
        write_octree(&tree, &mesh, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.lines().any(|l| l == "f 0"));

        let created = tree.stats().cells_created;
        assert_eq!(tree.clear(), created);
    }
}
