//! Common test helpers for minecrafter integration tests
//!
//! Author: Moroya Sakamoto

#![allow(dead_code)]

use minecrafter::prelude::*;
use std::path::PathBuf;

// ============================================================================
// Standard test meshes
// ============================================================================

/// Right triangle spanning 127 units in x and y, normalizes to 128
pub fn single_triangle_mesh() -> Mesh {
    Mesh::new(
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(127.0, 0.0, 0.0),
            Vec3::new(0.0, 127.0, 0.0),
        ],
        vec![Face::new(0, 1, 2)],
        None,
    )
    .expect("valid mesh")
}

/// Axis-aligned square at height `z`, split into two triangles
pub fn quad_mesh(min: f32, max: f32, z: f32) -> Mesh {
    Mesh::new(
        vec![
            Vec3::new(min, min, z),
            Vec3::new(max, min, z),
            Vec3::new(max, max, z),
            Vec3::new(min, max, z),
        ],
        vec![Face::new(0, 1, 2), Face::new(0, 2, 3)],
        None,
    )
    .expect("valid mesh")
}

/// Closed tetrahedron with per-vertex colors
pub fn colored_tetrahedron() -> Mesh {
    Mesh::new(
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(0.0, 10.0, 0.0),
            Vec3::new(0.0, 0.0, 10.0),
        ],
        vec![
            Face::new(0, 2, 1),
            Face::new(0, 1, 3),
            Face::new(0, 3, 2),
            Face::new(1, 2, 3),
        ],
        Some(vec![
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.5, 0.5, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.25, 0.0, 1.0),
        ]),
    )
    .expect("valid mesh")
}

/// OBJ text for [`colored_tetrahedron`]
pub const TETRAHEDRON_OBJ: &str = "\
# tetrahedron
v 0 0 0 1 0 0
v 10 0 0 0.5 0.5 0
v 0 10 0 0 1 0
v 0 0 10 0.25 0 1
f 1 3 2
f 1 2 4
f 1 4 3
f 2 3 4
";

// ============================================================================
// Filesystem helpers
// ============================================================================

/// Per-suite scratch directory under the system temp dir
pub fn temp_dir(suite: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("minecrafter_test_{}", suite));
    std::fs::create_dir_all(&dir).ok();
    dir
}

/// Render a built tree to a string
pub fn render(tree: &Octree, mesh: &Mesh) -> String {
    let mut out = Vec::new();
    write_octree(tree, mesh, &mut out).expect("write_octree failed");
    String::from_utf8(out).expect("output is utf-8")
}

// ============================================================================
// Assertion helpers
// ============================================================================

/// Assert two f32 values are close within tolerance
pub fn assert_close(a: f32, b: f32, tol: f32, msg: &str) {
    assert!(
        (a - b).abs() < tol,
        "{}: {} vs {} (diff={}, tol={})",
        msg,
        a,
        b,
        (a - b).abs(),
        tol
    );
}

/// Assert two vectors are close component-wise
pub fn assert_vec_close(a: Vec3, b: Vec3, tol: f32, msg: &str) {
    assert!(
        (a - b).abs().max_element() < tol,
        "{}: {:?} vs {:?} (tol={})",
        msg,
        a,
        b,
        tol
    );
}
