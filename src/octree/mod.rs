//! Face-assignment octree
//!
//! Partitions a cube anchored at the origin into unit cells and records, for
//! every cell, which mesh faces touch it. Cells live in a flat arena owned
//! by the [`Octree`]; the eight children of a split cell are allocated
//! contiguously, so a cell only needs the index of its first child.
//!
//! # Split rule
//!
//! A cell splits into eight anchor-corner octants iff its edge is longer
//! than `min_cell_size` and it holds at least one face. The parent's face
//! list is emptied by the split, so faces end up in leaves only.
//!
//! # Usage
//!
//! ```rust,ignore
//! use minecrafter::prelude::*;
//!
//! let mut mesh = import_obj("bunny.obj")?;
//! normalize(&mut mesh)?;
//!
//! let mut tree = Octree::new();
//! tree.build(&mesh);
//! save_octree(&tree, &mesh, "bunny.oct")?;
//! tree.clear();
//! ```
//!
//! Author: Moroya Sakamoto

pub mod build;

use glam::Vec3;
use thiserror::Error;

use crate::mesh::{Aabb, HEIGHT_LIMIT};

/// Deepest split level a configuration may request
///
/// Keeps the arena under `u32` cell ids and the recursion shallow.
pub const MAX_DEPTH: u32 = 10;

/// Octree configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OctreeError {
    /// Sizes are not finite, the floor is not positive, or the root is smaller
    #[error("invalid cell sizes: root {root_size}, minimum {min_cell_size}")]
    InvalidCellSize {
        /// Requested root edge
        root_size: f32,
        /// Requested minimum edge
        min_cell_size: f32,
    },

    /// Halving the root never lands exactly on the minimum cell size
    #[error("root size {root_size} is not a power-of-two multiple of {min_cell_size}")]
    NotPowerOfTwo {
        /// Requested root edge
        root_size: f32,
        /// Requested minimum edge
        min_cell_size: f32,
    },

    /// Reaching the minimum cell size takes more than [`MAX_DEPTH`] splits
    #[error("root size {root_size} needs more than {} splits to reach {min_cell_size}", MAX_DEPTH)]
    TooDeep {
        /// Requested root edge
        root_size: f32,
        /// Requested minimum edge
        min_cell_size: f32,
    },
}

/// Index of a cell in the octree arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(u32);

impl CellId {
    /// The root cell of a built tree
    pub const ROOT: CellId = CellId(0);

    /// Arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Octree cell
#[derive(Debug, Clone)]
pub struct Cell {
    bounds: Aabb,
    depth: u32,
    parent: Option<CellId>,
    first_child: Option<CellId>,
    faces: Vec<u32>,
}

impl Cell {
    fn new(bounds: Aabb, depth: u32, parent: Option<CellId>, faces: Vec<u32>) -> Self {
        Cell {
            bounds,
            depth,
            parent,
            first_child: None,
            faces,
        }
    }

    /// Cube covered by this cell
    #[inline]
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Minimum corner of the cell
    #[inline]
    pub fn anchor(&self) -> Vec3 {
        self.bounds.min
    }

    /// Edge length
    #[inline]
    pub fn edge(&self) -> f32 {
        self.bounds.size().x
    }

    /// Number of splits between the root and this cell
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Parent cell (metadata only, `None` for the root)
    #[inline]
    pub fn parent(&self) -> Option<CellId> {
        self.parent
    }

    /// Face indices assigned to this cell, in mesh order
    #[inline]
    pub fn faces(&self) -> &[u32] {
        &self.faces
    }

    /// Whether the cell was never split
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.first_child.is_none()
    }

    /// Child ids in octant order, empty for a leaf
    pub fn children(&self) -> impl Iterator<Item = CellId> {
        let first = self.first_child.map_or(0, |c| c.0);
        let count = if self.first_child.is_some() { 8 } else { 0 };
        (first..first + count).map(CellId)
    }
}

/// Configuration for octree construction
#[derive(Debug, Clone)]
pub struct OctreeConfig {
    /// Edge length of the root cube anchored at the origin
    pub root_size: f32,
    /// Cells at or below this edge length never split
    pub min_cell_size: f32,
    /// Test faces against the eight children on the rayon pool
    pub parallel: bool,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        OctreeConfig {
            root_size: HEIGHT_LIMIT,
            min_cell_size: 1.0,
            parallel: false,
        }
    }
}

impl OctreeConfig {
    /// Check the cell sizes, returning the depth of the smallest cells
    ///
    /// The root must halve exactly onto `min_cell_size` within
    /// [`MAX_DEPTH`] splits.
    pub fn validate(&self) -> Result<u32, OctreeError> {
        let (root_size, min_cell_size) = (self.root_size, self.min_cell_size);
        if !(root_size.is_finite()
            && min_cell_size.is_finite()
            && min_cell_size > 0.0
            && root_size >= min_cell_size)
        {
            return Err(OctreeError::InvalidCellSize {
                root_size,
                min_cell_size,
            });
        }

        let mut edge = root_size;
        let mut depth = 0;
        while edge > min_cell_size {
            if depth == MAX_DEPTH {
                return Err(OctreeError::TooDeep {
                    root_size,
                    min_cell_size,
                });
            }
            edge *= 0.5;
            depth += 1;
        }
        if edge != min_cell_size {
            return Err(OctreeError::NotPowerOfTwo {
                root_size,
                min_cell_size,
            });
        }
        Ok(depth)
    }
}

/// Build counters, for reporting only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OctreeStats {
    /// Non-root cells created by splits
    pub cells_created: usize,
    /// Total (cell, face) assignments made while splitting
    pub face_assignments: usize,
}

/// Face-assignment octree over a cubic volume
#[derive(Debug, Clone, Default)]
pub struct Octree {
    cells: Vec<Cell>,
    config: OctreeConfig,
    stats: OctreeStats,
}

impl Octree {
    /// Create an unbuilt tree with the default configuration
    pub fn new() -> Self {
        Octree {
            cells: Vec::new(),
            config: OctreeConfig::default(),
            stats: OctreeStats::default(),
        }
    }

    /// Create an unbuilt tree, rejecting cell sizes that would not
    /// terminate on unit cells
    pub fn with_config(config: OctreeConfig) -> Result<Self, OctreeError> {
        config.validate()?;
        Ok(Octree {
            cells: Vec::new(),
            config,
            stats: OctreeStats::default(),
        })
    }

    /// Configuration in use
    pub fn config(&self) -> &OctreeConfig {
        &self.config
    }

    /// Whether [`Octree::build`] has run since creation or the last clear
    #[inline]
    pub fn is_built(&self) -> bool {
        !self.cells.is_empty()
    }

    /// Root cell id, `None` before build
    #[inline]
    pub fn root(&self) -> Option<CellId> {
        self.is_built().then_some(CellId::ROOT)
    }

    /// Access a cell
    ///
    /// # Panics
    /// Panics if `id` does not belong to this tree.
    #[inline]
    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.index()]
    }

    /// Child ids of a cell in octant order
    pub fn children(&self, id: CellId) -> impl Iterator<Item = CellId> {
        self.cell(id).children()
    }

    /// Total number of cells, root included
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Build counters
    #[inline]
    pub fn stats(&self) -> OctreeStats {
        self.stats
    }

    /// All cells with their ids, in arena order
    pub fn cells(&self) -> impl Iterator<Item = (CellId, &Cell)> {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, c)| (CellId(i as u32), c))
    }

    /// Leaf cells with their ids
    pub fn leaves(&self) -> impl Iterator<Item = (CellId, &Cell)> {
        self.cells().filter(|(_, c)| c.is_leaf())
    }

    /// Leaves holding at least one face (the occupied voxels)
    pub fn occupied_leaves(&self) -> impl Iterator<Item = (CellId, &Cell)> {
        self.leaves().filter(|(_, c)| !c.faces.is_empty())
    }

    /// Deepest cell depth (0 for a root-only or unbuilt tree)
    pub fn max_depth(&self) -> u32 {
        self.cells.iter().map(|c| c.depth).max().unwrap_or(0)
    }

    /// Release every cell, children before parents
    ///
    /// Returns the number of non-root cells released. The tree is unbuilt
    /// afterwards; clearing an unbuilt tree does nothing.
    pub fn clear(&mut self) -> usize {
        let Some(root) = self.root() else {
            return 0;
        };
        log::info!("Clearing tree nodes...");
        let mut released = 0;
        for child in self.children(root).collect::<Vec<_>>() {
            released += self.release(child);
        }
        self.cells.clear();
        self.stats = OctreeStats::default();
        log::info!("Complete ({} cells released)", released);
        released
    }

    fn release(&mut self, id: CellId) -> usize {
        let mut released = 0;
        for child in self.children(id).collect::<Vec<_>>() {
            released += self.release(child);
        }
        let cell = &mut self.cells[id.index()];
        cell.faces = Vec::new();
        cell.first_child = None;
        released + 1
    }
}
