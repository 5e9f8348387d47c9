//! Mesh reparameterization onto the voxel grid
//!
//! Rescales vertices so the mesh's longest axis spans exactly
//! `[0, height_limit]`. All three axes are divided by the same scalar, so the
//! aspect ratio survives and the two shorter axes end up inside the grid.
//!
//! Author: Moroya Sakamoto

use log::info;
use thiserror::Error;

use super::{Mesh, MeshMetrics, HEIGHT_LIMIT};

/// Normalization errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    /// The mesh has no vertices
    #[error("mesh has no vertices")]
    EmptyMesh,

    /// Every vertex coincides, so there is no extent to scale
    #[error("mesh has zero extent along its primary axis ({axis})")]
    DegenerateExtent {
        /// The (tied) primary axis
        axis: super::Axis,
    },

    /// The extent does not fit in an `f32` (coordinates near `f32::MAX`)
    #[error("mesh extent overflows along {axis}")]
    ExtentOverflow {
        /// The primary axis
        axis: super::Axis,
    },

    /// Height limit is not a positive finite number
    #[error("invalid height limit: {0}")]
    InvalidHeightLimit(f32),
}

/// Normalize a mesh onto the default 128-unit grid
pub fn normalize(mesh: &mut Mesh) -> Result<MeshMetrics, NormalizeError> {
    normalize_with_limit(mesh, HEIGHT_LIMIT)
}

/// Normalize a mesh so its primary axis spans `[0, height_limit]`
///
/// Every vertex becomes `((v - min) / range[primary]) * height_limit`.
/// Returns the metrics after rescaling. On error the mesh is untouched.
pub fn normalize_with_limit(
    mesh: &mut Mesh,
    height_limit: f32,
) -> Result<MeshMetrics, NormalizeError> {
    if !(height_limit.is_finite() && height_limit > 0.0) {
        return Err(NormalizeError::InvalidHeightLimit(height_limit));
    }

    info!("Generating metrics...");
    let before = MeshMetrics::from_positions(&mesh.positions, height_limit)
        .ok_or(NormalizeError::EmptyMesh)?;
    info!("  - Max: {}", before.max);
    info!("  - Min: {}", before.min);
    info!("  - Range: {}", before.range);

    let axis = before.primary_axis;
    if !before.range.is_finite() {
        return Err(NormalizeError::ExtentOverflow { axis });
    }
    let divisor = before.primary_range();
    if divisor <= 0.0 {
        return Err(NormalizeError::DegenerateExtent { axis });
    }
    let max = ((before.max - before.min) / divisor) * height_limit;
    if !max.is_finite() {
        return Err(NormalizeError::ExtentOverflow { axis });
    }

    info!(
        "Reparameterizing {} vertices along {}...",
        mesh.positions.len(),
        axis
    );
    // Divide before multiplying so the extreme vertex lands on the limit exactly
    for v in &mut mesh.positions {
        *v = ((*v - before.min) / divisor) * height_limit;
    }

    let after = MeshMetrics {
        min: glam::Vec3::ZERO,
        max,
        range: max,
        primary_axis: axis,
        height_limit,
    };
    info!("  - New Max: {}", after.max);
    info!("  - New Min: {}", after.min);
    info!("  - New Range: {}", after.range);

    Ok(after)
}
