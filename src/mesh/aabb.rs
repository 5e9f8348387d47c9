//! Axis-aligned bounding boxes and the triangle/box overlap test
//!
//! The octree partitions space into closed boxes: a triangle that only
//! touches a face, edge or corner of a box still counts as intersecting it,
//! so a surface lying exactly on a splitting plane registers in both cells.
//!
//! Author: Moroya Sakamoto

use glam::Vec3;

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner (the anchor of an octree cell)
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Create an empty (inverted) AABB
    #[inline]
    pub fn empty() -> Self {
        Aabb {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    /// Create AABB from min/max
    #[inline]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Aabb { min, max }
    }

    /// Create a cube anchored at `anchor` with the given edge length
    #[inline]
    pub fn cube(anchor: Vec3, edge: f32) -> Self {
        Aabb {
            min: anchor,
            max: anchor + Vec3::splat(edge),
        }
    }

    /// Smallest AABB enclosing all points, `None` for an empty slice
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut aabb = Aabb::empty();
        for &p in points {
            aabb.expand_point(p);
        }
        Some(aabb)
    }

    /// Expand AABB to include a point
    #[inline]
    pub fn expand_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Anchor corner (same as `min`)
    #[inline]
    pub fn anchor(&self) -> Vec3 {
        self.min
    }

    /// Extent along each axis
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Half extent along each axis
    #[inline]
    pub fn half_size(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Get center of AABB
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Child box for an anchor-corner octant split
    ///
    /// Bit 0 of `octant` offsets along X, bit 1 along Y, bit 2 along Z.
    /// The eight octants tile the parent exactly.
    #[inline]
    pub fn octant(&self, octant: u8) -> Aabb {
        let half = self.half_size();
        let offset = Vec3::new(
            if octant & 1 != 0 { half.x } else { 0.0 },
            if octant & 2 != 0 { half.y } else { 0.0 },
            if octant & 4 != 0 { half.z } else { 0.0 },
        );
        let min = self.min + offset;
        Aabb { min, max: min + half }
    }

    /// Test if a triangle touches or lies inside this box
    ///
    /// Separating Axis Theorem over the 13 candidate axes: the three box
    /// normals, the triangle normal, and the nine box-edge x triangle-edge
    /// cross products. Degenerate (zero) axes never separate.
    pub fn intersects_triangle(&self, v0: Vec3, v1: Vec3, v2: Vec3) -> bool {
        let center = self.center();
        let extents = self.half_size();

        // Triangle in box-local space
        let t0 = v0 - center;
        let t1 = v1 - center;
        let t2 = v2 - center;

        // Box normals
        let tri_min = t0.min(t1).min(t2);
        let tri_max = t0.max(t1).max(t2);
        if tri_min.cmpgt(extents).any() || tri_max.cmplt(-extents).any() {
            return false;
        }

        let e0 = t1 - t0;
        let e1 = t2 - t1;
        let e2 = t0 - t2;

        // Triangle plane
        let normal = e0.cross(e1);
        if separated_on(normal, t0, t1, t2, extents) {
            return false;
        }

        // Edge cross products
        for box_axis in [Vec3::X, Vec3::Y, Vec3::Z] {
            for edge in [e0, e1, e2] {
                if separated_on(box_axis.cross(edge), t0, t1, t2, extents) {
                    return false;
                }
            }
        }

        true
    }
}

#[inline]
fn separated_on(axis: Vec3, t0: Vec3, t1: Vec3, t2: Vec3, extents: Vec3) -> bool {
    let p0 = t0.dot(axis);
    let p1 = t1.dot(axis);
    let p2 = t2.dot(axis);
    let radius = extents.dot(axis.abs());
    p0.min(p1).min(p2) > radius || p0.max(p1).max(p2) < -radius
}
