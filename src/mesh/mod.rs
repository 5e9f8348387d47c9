//! Triangle mesh model
//!
//! Vertex positions, triangular faces as index triples, and optional
//! per-vertex colors. A mesh is validated on construction and is read-only
//! afterwards except for the in-place rescale done by [`normalize`].
//!
//! Author: Moroya Sakamoto

pub mod aabb;
pub mod normalize;

pub use aabb::Aabb;
pub use normalize::{normalize, normalize_with_limit, NormalizeError};

use glam::Vec3;
use std::fmt;
use thiserror::Error;

/// Maximum voxel-grid extent along the primary axis (world height in blocks)
pub const HEIGHT_LIMIT: f32 = 128.0;

/// Mesh validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// A face references a vertex that does not exist
    #[error("face {face} references vertex {index}, but mesh has {vertex_count} vertices")]
    FaceIndexOutOfRange {
        /// Face index
        face: usize,
        /// Offending vertex index
        index: u32,
        /// Number of vertices in the mesh
        vertex_count: usize,
    },

    /// Color array is not parallel to the vertex array
    #[error("mesh has {vertices} vertices but {colors} colors")]
    ColorCountMismatch {
        /// Number of vertices
        vertices: usize,
        /// Number of colors
        colors: usize,
    },

    /// Vertex position contains NaN or infinity
    #[error("vertex {0} has a non-finite coordinate")]
    NonFiniteVertex(usize),
}

/// Coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// X axis
    X,
    /// Y axis
    Y,
    /// Z axis
    Z,
}

impl Axis {
    /// Component index (0=X, 1=Y, 2=Z)
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Axis with the largest component
    ///
    /// X wins only if strictly greater than both Y and Z; otherwise Y wins
    /// if strictly greater than Z; otherwise Z.
    #[inline]
    pub fn longest(d: Vec3) -> Axis {
        if d.x > d.y && d.x > d.z {
            Axis::X
        } else if d.y > d.z {
            Axis::Y
        } else {
            Axis::Z
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

/// Triangle face indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    /// First vertex index
    pub a: u32,
    /// Second vertex index
    pub b: u32,
    /// Third vertex index
    pub c: u32,
}

impl Face {
    /// Create a new face
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Face { a, b, c }
    }

    /// Vertex indices as an array
    #[inline]
    pub fn indices(&self) -> [u32; 3] {
        [self.a, self.b, self.c]
    }
}

impl From<[u32; 3]> for Face {
    fn from(v: [u32; 3]) -> Self {
        Face::new(v[0], v[1], v[2])
    }
}

/// Bounding metrics of a mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshMetrics {
    /// Componentwise minimum over all vertices
    pub min: Vec3,
    /// Componentwise maximum over all vertices
    pub max: Vec3,
    /// `max - min`
    pub range: Vec3,
    /// Axis of greatest range
    pub primary_axis: Axis,
    /// Target extent along the primary axis
    pub height_limit: f32,
}

impl MeshMetrics {
    /// Compute metrics for a set of positions, `None` if there are none
    pub fn from_positions(positions: &[Vec3], height_limit: f32) -> Option<Self> {
        let bounds = Aabb::from_points(positions)?;
        let range = bounds.size();
        Some(MeshMetrics {
            min: bounds.min,
            max: bounds.max,
            range,
            primary_axis: Axis::longest(range),
            height_limit,
        })
    }

    /// Range along the primary axis
    #[inline]
    pub fn primary_range(&self) -> f32 {
        self.range[self.primary_axis.index()]
    }
}

/// Triangle mesh with optional per-vertex color
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    positions: Vec<Vec3>,
    faces: Vec<Face>,
    colors: Option<Vec<Vec3>>,
}

impl Mesh {
    /// Create a mesh, validating face indices and color count
    ///
    /// Colors are RGB with channels in `[0, 1]`, one per vertex.
    pub fn new(
        positions: Vec<Vec3>,
        faces: Vec<Face>,
        colors: Option<Vec<Vec3>>,
    ) -> Result<Self, MeshError> {
        if let Some(i) = positions.iter().position(|p| !p.is_finite()) {
            return Err(MeshError::NonFiniteVertex(i));
        }

        let vertex_count = positions.len();
        for (face, f) in faces.iter().enumerate() {
            if let Some(&index) = f.indices().iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::FaceIndexOutOfRange {
                    face,
                    index,
                    vertex_count,
                });
            }
        }

        if let Some(colors) = &colors {
            if colors.len() != vertex_count {
                return Err(MeshError::ColorCountMismatch {
                    vertices: vertex_count,
                    colors: colors.len(),
                });
            }
        }

        Ok(Mesh {
            positions,
            faces,
            colors,
        })
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Vertex positions in source order
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Faces in source order
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Per-vertex colors, if the source carried them
    pub fn colors(&self) -> Option<&[Vec3]> {
        self.colors.as_deref()
    }

    /// Whether per-vertex colors are present
    pub fn has_colors(&self) -> bool {
        self.colors.is_some()
    }

    /// Corner positions of a face
    #[inline]
    pub fn triangle(&self, face: usize) -> [Vec3; 3] {
        let f = self.faces[face];
        [
            self.positions[f.a as usize],
            self.positions[f.b as usize],
            self.positions[f.c as usize],
        ]
    }

    /// Bounding metrics with the default height limit
    pub fn metrics(&self) -> Option<MeshMetrics> {
        MeshMetrics::from_positions(&self.positions, HEIGHT_LIMIT)
    }
}
