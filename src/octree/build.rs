//! Octree construction: top-down face assignment
//!
//! # Algorithm
//!
//! 1. Seed the root cube with every face index of the mesh
//! 2. If the cell edge is at most `min_cell_size`, or it holds no faces → leaf
//! 3. Otherwise split into eight anchor-corner octants
//! 4. Test each of the parent's faces against each child box (closed SAT)
//! 5. Empty the parent's face list and recurse into children 0..7
//!
//! The edge halves at every level, so a 128-unit root reaches unit cells
//! after seven splits.
//!
//! Author: Moroya Sakamoto

use glam::Vec3;
use log::{debug, info};
use rayon::prelude::*;

use super::{Cell, CellId, Octree, OctreeStats};
use crate::mesh::{Aabb, Mesh};

impl Octree {
    /// Build the tree for a (normalized) mesh
    ///
    /// Any previous tree is cleared first. The mesh is only read.
    pub fn build(&mut self, mesh: &Mesh) {
        if self.is_built() {
            self.clear();
        }

        info!("Building tree...");
        let triangles: Vec<[Vec3; 3]> = (0..mesh.face_count()).map(|f| mesh.triangle(f)).collect();

        let root_bounds = Aabb::cube(Vec3::ZERO, self.config.root_size);
        let all_faces: Vec<u32> = (0..mesh.face_count() as u32).collect();
        self.cells.push(Cell::new(root_bounds, 0, None, all_faces));
        self.stats = OctreeStats::default();

        split_cell(self, &triangles, CellId::ROOT);

        info!(
            "Complete[{},{}]",
            self.stats.cells_created, self.stats.face_assignments
        );
        debug!(
            "{} cells, max depth {}, {} occupied leaves",
            self.cell_count(),
            self.max_depth(),
            self.occupied_leaves().count()
        );
    }

    /// Build a tree with the default configuration
    pub fn from_mesh(mesh: &Mesh) -> Self {
        let mut tree = Octree::new();
        tree.build(mesh);
        tree
    }
}

/// Recursive top-down split
fn split_cell(tree: &mut Octree, triangles: &[[Vec3; 3]], id: CellId) {
    let cell = &tree.cells[id.index()];

    // Cells split evenly, so one unit along any edge is the floor
    if cell.edge() <= tree.config.min_cell_size {
        return;
    }
    if cell.faces.is_empty() {
        return;
    }

    let bounds = cell.bounds;
    let depth = cell.depth + 1;
    let parent_faces = std::mem::take(&mut tree.cells[id.index()].faces);

    let child_bounds: [Aabb; 8] = std::array::from_fn(|i| bounds.octant(i as u8));
    let assigned: Vec<Vec<u32>> = if tree.config.parallel {
        child_bounds
            .par_iter()
            .map(|b| faces_touching(b, &parent_faces, triangles))
            .collect()
    } else {
        child_bounds
            .iter()
            .map(|b| faces_touching(b, &parent_faces, triangles))
            .collect()
    };

    let first_child = CellId(tree.cells.len() as u32);
    for (b, faces) in child_bounds.into_iter().zip(assigned) {
        tree.stats.face_assignments += faces.len();
        tree.stats.cells_created += 1;
        tree.cells.push(Cell::new(b, depth, Some(id), faces));
    }
    tree.cells[id.index()].first_child = Some(first_child);

    for octant in 0..8 {
        split_cell(tree, triangles, CellId(first_child.0 + octant));
    }
}

/// Faces from `candidates` whose triangle touches `bounds`, order preserved
fn faces_touching(bounds: &Aabb, candidates: &[u32], triangles: &[[Vec3; 3]]) -> Vec<u32> {
    candidates
        .iter()
        .copied()
        .filter(|&f| {
            let [v0, v1, v2] = triangles[f as usize];
            bounds.intersects_triangle(v0, v1, v2)
        })
        .collect()
}
