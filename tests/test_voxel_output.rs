//! Integration tests: voxel tree export and the file pipeline
//!
//! Author: Moroya Sakamoto

mod common;

use common::*;
use minecrafter::prelude::*;
use std::path::PathBuf;

fn write_input(name: &str, content: &str) -> PathBuf {
    let path = temp_dir("voxel").join(name);
    std::fs::write(&path, content).expect("write input");
    path
}

fn fresh_output(name: &str) -> PathBuf {
    let path = temp_dir("voxel").join(name);
    std::fs::remove_file(&path).ok();
    path
}

// ============================================================================
// Format
// ============================================================================

#[test]
fn output_starts_with_root_anchor() {
    let mut mesh = single_triangle_mesh();
    let (tree, _) = voxelize(&mut mesh, &ConvertConfig::default()).unwrap();
    let text = render(&tree, &mesh);

    assert!(text.starts_with("--(0.000000, 0.000000, 0.000000)---\n"));
    assert_eq!(text.lines().filter(|l| l.starts_with("--")).count(), 1);
}

#[test]
fn one_group_per_non_root_cell() {
    let mut mesh = colored_tetrahedron();
    let (tree, _) = voxelize(&mut mesh, &ConvertConfig::default()).unwrap();
    let text = render(&tree, &mesh);

    let groups = text.lines().filter(|l| l.starts_with("g ")).count();
    let colors = text.lines().filter(|l| l.starts_with("c ")).count();
    assert_eq!(groups, tree.cell_count() - 1);
    assert_eq!(colors, groups);

    let faces = text.lines().filter(|l| l.starts_with("f ")).count();
    let stored: usize = tree.cells().map(|(_, c)| c.faces().len()).sum();
    assert_eq!(faces, stored);
}

#[test]
fn every_line_is_well_formed() {
    let mut mesh = colored_tetrahedron();
    let (tree, _) = voxelize(&mut mesh, &ConvertConfig::default()).unwrap();
    let text = render(&tree, &mesh);

    for line in text.lines().skip(1) {
        let (tag, rest) = line.split_once(' ').expect("tagged line");
        match tag {
            "g" => assert!(rest.starts_with('(') && rest.ends_with(')')),
            "f" => {
                let f: usize = rest.parse().expect("face index");
                assert!(f < mesh.face_count());
            }
            "c" => {
                let c: f32 = rest.parse().expect("color value");
                assert!((0.0..=255.0).contains(&c));
            }
            other => panic!("unexpected tag {:?}", other),
        }
    }
}

#[test]
fn colorless_mesh_writes_zero_colors() {
    let mut mesh = quad_mesh(0.0, 4.0, 0.0);
    let (tree, _) = voxelize(&mut mesh, &ConvertConfig::default()).unwrap();
    let text = render(&tree, &mesh);

    assert!(text
        .lines()
        .filter(|l| l.starts_with("c "))
        .all(|l| l == "c 0"));
}

#[test]
fn corner_voxel_color_is_mean_red() {
    let mut mesh = colored_tetrahedron();
    let (tree, _) = voxelize(&mut mesh, &ConvertConfig::default()).unwrap();
    let text = render(&tree, &mesh);

    // Unit cell at the origin touches the three faces meeting there
    let corner = "g (0.000000, 0.000000, 0.000000)\nf 0\nf 1\nf 2\nc 127.500000\n";
    assert!(text.contains(corner));
}

#[test]
fn mesh_without_faces_writes_root_only() {
    let mut mesh = Mesh::new(vec![Vec3::ZERO, Vec3::ONE], Vec::new(), None).unwrap();
    let (tree, summary) = voxelize(&mut mesh, &ConvertConfig::default()).unwrap();

    assert_eq!(summary.cell_count, 1);
    assert_eq!(summary.occupied_voxels, 0);
    assert_eq!(render(&tree, &mesh), "--(0.000000, 0.000000, 0.000000)---\n");
}

#[test]
fn output_is_deterministic() {
    let render_once = |parallel: bool| {
        let mut mesh = colored_tetrahedron();
        let config = ConvertConfig {
            parallel,
            ..Default::default()
        };
        let (tree, _) = voxelize(&mut mesh, &config).unwrap();
        render(&tree, &mesh)
    };

    let first = render_once(false);
    assert_eq!(first, render_once(false));
    assert_eq!(first, render_once(true));
}

// ============================================================================
// File pipeline
// ============================================================================

#[test]
fn convert_obj_end_to_end() {
    let input = write_input("tetra.obj", TETRAHEDRON_OBJ);
    let output = fresh_output("tetra.oct");

    let summary = convert_file(&input, &output, &ConvertConfig::default()).unwrap();
    assert_eq!(summary.vertex_count, 4);
    assert_eq!(summary.face_count, 4);
    assert_eq!(summary.normalized_range, Vec3::splat(128.0));
    assert!(summary.occupied_voxels > 0);

    let text = std::fs::read_to_string(&output).unwrap();
    let mut mesh = colored_tetrahedron();
    let (tree, _) = voxelize(&mut mesh, &ConvertConfig::default()).unwrap();
    assert_eq!(text, render(&tree, &mesh));
}

#[test]
fn convert_twice_is_byte_identical() {
    let input = write_input("tetra_twice.obj", TETRAHEDRON_OBJ);
    let a = fresh_output("tetra_a.oct");
    let b = fresh_output("tetra_b.oct");

    convert_file(&input, &a, &ConvertConfig::default()).unwrap();
    convert_file(&input, &b, &ConvertConfig::default()).unwrap();
    assert_eq!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());
}

#[test]
fn degenerate_mesh_creates_no_output() {
    let input = write_input("point.obj", "v 1 1 1\nv 1 1 1\nv 1 1 1\nf 1 2 3\n");
    let output = fresh_output("point.oct");

    let err = convert_file(&input, &output, &ConvertConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        ConvertError::Normalize(NormalizeError::DegenerateExtent { .. })
    ));
    assert!(!output.exists());
}

#[test]
fn empty_mesh_creates_no_output() {
    let input = write_input("empty.obj", "# nothing here\n");
    let output = fresh_output("empty.oct");

    let err = convert_file(&input, &output, &ConvertConfig::default()).unwrap_err();
    assert!(matches!(err, ConvertError::Normalize(NormalizeError::EmptyMesh)));
    assert!(!output.exists());
}

#[test]
fn missing_input_creates_no_output() {
    let input = temp_dir("voxel").join("does_not_exist.obj");
    let output = fresh_output("missing.oct");

    let err = convert_file(&input, &output, &ConvertConfig::default()).unwrap_err();
    assert!(matches!(err, ConvertError::Io(IoError::Io(_))));
    assert!(!output.exists());
}

#[test]
fn unsupported_extension_is_rejected() {
    let input = write_input("mesh.stl", "solid nothing\nendsolid\n");
    let output = fresh_output("stl.oct");

    let err = convert_file(&input, &output, &ConvertConfig::default()).unwrap_err();
    assert!(matches!(err, ConvertError::Io(IoError::UnsupportedFormat(_))));
    assert!(!output.exists());
}

#[test]
fn off_grid_height_limit_creates_no_output() {
    let input = write_input("tetra_grid.obj", TETRAHEDRON_OBJ);
    let output = fresh_output("tetra_grid.oct");
    let config = ConvertConfig {
        height_limit: 100.0,
        ..Default::default()
    };

    let err = convert_file(&input, &output, &config).unwrap_err();
    assert!(matches!(
        err,
        ConvertError::Octree(OctreeError::NotPowerOfTwo { .. })
    ));
    assert!(!output.exists());
}

#[test]
fn save_after_clear_fails() {
    let mut mesh = single_triangle_mesh();
    let (mut tree, _) = voxelize(&mut mesh, &ConvertConfig::default()).unwrap();
    tree.clear();

    let output = fresh_output("cleared.oct");
    let result = save_octree(&tree, &mesh, &output);
    assert!(matches!(result, Err(IoError::TreeNotBuilt)));
    assert!(!output.exists());
}
