//! Math utilities and types
//!
//! Provides the vector types used for normals, light directions and the
//! pseudo-3D world positions of sprites (screen x, screen y, depth).

pub use nalgebra::Vector3;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Vectors at or below this length are treated as degenerate directions
pub const DEGENERATE_LENGTH: f32 = 1e-8;

/// Direction a sprite faces when nothing else says otherwise (toward the viewer)
pub const VIEWER_FACING: [f32; 3] = [0.0, 0.0, 1.0];

/// Normalize raw components into a unit direction
///
/// Returns `default` when the input is degenerate (length ≤ 1e-8) or not finite.
pub fn normalize_or(components: [f32; 3], default: Vec3) -> Vec3 {
    let vector = Vec3::new(components[0], components[1], components[2]);
    let length = vector.norm();
    if !length.is_finite() || length <= DEGENERATE_LENGTH {
        return default;
    }
    vector / length
}

/// Math utility functions
pub mod utils {
    /// Clamp a value between min and max
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        if value < min { min } else if value > max { max } else { value }
    }

    /// Clamp a value into the unit interval
    pub fn saturate(value: f32) -> f32 {
        clamp(value, 0.0, 1.0)
    }
}
