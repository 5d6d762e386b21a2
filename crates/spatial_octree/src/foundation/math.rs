//! Math utilities and types
//!
//! Provides the vector types used for bounds and spatial queries.

pub use nalgebra::{Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type (used for RGBA debug colors)
pub type Vec4 = Vector4<f32>;

/// Math utility functions
pub mod utils {
    use super::Vec3;

    /// Clamp each component of `point` into the `[min, max]` range
    ///
    /// Unlike `f32::clamp` this never panics on inverted ranges.
    pub fn clamp_vec3(point: Vec3, min: Vec3, max: Vec3) -> Vec3 {
        Vec3::new(
            min.x.max(point.x.min(max.x)),
            min.y.max(point.y.min(max.y)),
            min.z.max(point.z.min(max.z)),
        )
    }

    /// Whether every component of the vector is finite
    pub fn is_finite(v: Vec3) -> bool {
        v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
    }
}
