//! Mesh → voxel tree conversion pipeline
//!
//! load → normalize → build octree → save → clear. Every stage owns its
//! inputs explicitly; nothing is kept between runs.
//!
//! Author: Moroya Sakamoto

use glam::Vec3;
use log::info;
use std::path::Path;
use thiserror::Error;

use crate::io::{load_mesh, save_octree, IoError};
use crate::mesh::{normalize_with_limit, Axis, Mesh, NormalizeError, HEIGHT_LIMIT};
use crate::octree::{Octree, OctreeConfig, OctreeError, OctreeStats};

/// Conversion errors
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Loading the mesh or writing the tree failed
    #[error(transparent)]
    Io(#[from] IoError),

    /// The mesh cannot be mapped onto the grid
    #[error("Normalization failed: {0}")]
    Normalize(#[from] NormalizeError),

    /// The height limit does not halve onto unit cells
    #[error("Invalid grid: {0}")]
    Octree(#[from] OctreeError),
}

/// Configuration for a conversion run
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Grid extent along the mesh's primary axis
    pub height_limit: f32,
    /// Run face/child intersection tests on the rayon pool
    pub parallel: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        ConvertConfig {
            height_limit: HEIGHT_LIMIT,
            parallel: false,
        }
    }
}

impl ConvertConfig {
    /// Octree configuration matching this run
    pub fn octree_config(&self) -> OctreeConfig {
        OctreeConfig {
            root_size: self.height_limit,
            parallel: self.parallel,
            ..Default::default()
        }
    }
}

/// What a conversion produced
#[derive(Debug, Clone)]
pub struct ConversionSummary {
    /// Vertices in the input mesh
    pub vertex_count: usize,
    /// Triangles in the input mesh (after fan triangulation)
    pub face_count: usize,
    /// Axis that was scaled onto the height limit
    pub primary_axis: Axis,
    /// Extent of the normalized mesh
    pub normalized_range: Vec3,
    /// Octree build counters
    pub stats: OctreeStats,
    /// Total cells in the tree, root included
    pub cell_count: usize,
    /// Unit cells holding at least one face
    pub occupied_voxels: usize,
}

/// Normalize a mesh in place and build its octree
///
/// The grid is checked before the mesh is touched.
pub fn voxelize(
    mesh: &mut Mesh,
    config: &ConvertConfig,
) -> Result<(Octree, ConversionSummary), ConvertError> {
    let mut tree = Octree::with_config(config.octree_config())?;
    let metrics = normalize_with_limit(mesh, config.height_limit)?;
    tree.build(mesh);

    let summary = ConversionSummary {
        vertex_count: mesh.vertex_count(),
        face_count: mesh.face_count(),
        primary_axis: metrics.primary_axis,
        normalized_range: metrics.range,
        stats: tree.stats(),
        cell_count: tree.cell_count(),
        occupied_voxels: tree.occupied_leaves().count(),
    };
    Ok((tree, summary))
}

/// Convert a mesh file into a voxel tree file
///
/// Any error aborts the run before the output file is created.
pub fn convert_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &ConvertConfig,
) -> Result<ConversionSummary, ConvertError> {
    let mut mesh = load_mesh(input)?;
    let (mut tree, summary) = voxelize(&mut mesh, config)?;
    save_octree(&tree, &mesh, output)?;
    tree.clear();

    info!(
        "{} occupied voxels in {} cells",
        summary.occupied_voxels, summary.cell_count
    );
    Ok(summary)
}
