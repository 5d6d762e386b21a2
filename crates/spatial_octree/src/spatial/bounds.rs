//! Axis-aligned bounding boxes stored as center + size

use crate::foundation::math::{utils, Vec3};
use crate::spatial::OctreeError;
use serde::{Deserialize, Serialize};

/// Axis-Aligned Bounding Box described by its center and full size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "BoundsRepr", into = "BoundsRepr")]
pub struct Bounds {
    /// Center of the box
    pub center: Vec3,
    /// Full extent of the box along each axis
    pub size: Vec3,
}

/// On-disk form: plain `[x, y, z]` arrays
#[derive(Serialize, Deserialize)]
struct BoundsRepr {
    center: [f32; 3],
    size: [f32; 3],
}

impl From<BoundsRepr> for Bounds {
    fn from(repr: BoundsRepr) -> Self {
        Self::new(Vec3::from(repr.center), Vec3::from(repr.size))
    }
}

impl From<Bounds> for BoundsRepr {
    fn from(bounds: Bounds) -> Self {
        Self {
            center: bounds.center.into(),
            size: bounds.size.into(),
        }
    }
}

impl Bounds {
    /// Create a box from its center and full size
    pub fn new(center: Vec3, size: Vec3) -> Self {
        Self { center, size }
    }

    /// Create a box from min and max corners
    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        Self {
            center: (min + max) * 0.5,
            size: max - min,
        }
    }

    /// Minimum corner
    pub fn min(&self) -> Vec3 {
        self.center - self.extents()
    }

    /// Maximum corner
    pub fn max(&self) -> Vec3 {
        self.center + self.extents()
    }

    /// Half-size of the box
    pub fn extents(&self) -> Vec3 {
        self.size * 0.5
    }

    /// Check if this box contains a point (faces inclusive)
    pub fn contains_point(&self, point: Vec3) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x >= min.x && point.x <= max.x &&
        point.y >= min.y && point.y <= max.y &&
        point.z >= min.z && point.z <= max.z
    }

    /// Check if this box intersects another box (touching faces count)
    pub fn intersects(&self, other: &Bounds) -> bool {
        let (min, max) = (self.min(), self.max());
        let (other_min, other_max) = (other.min(), other.max());
        min.x <= other_max.x && max.x >= other_min.x &&
        min.y <= other_max.y && max.y >= other_min.y &&
        min.z <= other_max.z && max.z >= other_min.z
    }

    /// Check if a sphere touches this box, using the closest point on the box
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        let closest_point = utils::clamp_vec3(center, self.min(), self.max());
        (closest_point - center).magnitude_squared() <= radius * radius
    }

    /// Test ray intersection with this box using the slab method
    ///
    /// Returns the distance to the entry point (0 when the origin is inside),
    /// or `None` if the ray misses.
    pub fn intersect_ray(&self, ray_origin: Vec3, ray_dir: Vec3) -> Option<f32> {
        let (min, max) = (self.min(), self.max());
        let mut tmin = f32::NEG_INFINITY;
        let mut tmax = f32::INFINITY;

        for axis in 0..3 {
            let origin = ray_origin[axis];
            if ray_dir[axis] == 0.0 {
                // Parallel to this slab: inside it or never
                if origin < min[axis] || origin > max[axis] {
                    return None;
                }
                continue;
            }

            let inv_dir = 1.0 / ray_dir[axis];
            let t1 = (min[axis] - origin) * inv_dir;
            let t2 = (max[axis] - origin) * inv_dir;
            tmin = tmin.max(t1.min(t2));
            tmax = tmax.min(t1.max(t2));
        }

        if tmax >= tmin && tmax >= 0.0 {
            Some(tmin.max(0.0))
        } else {
            None
        }
    }

    /// Box of the child octant at `index` (0..8)
    ///
    /// Index layout is `x + 2*y + 4*z`, where a set bit selects the positive
    /// half of that axis:
    /// 0: -X, -Y, -Z
    /// 1: +X, -Y, -Z
    /// 2: -X, +Y, -Z
    /// 3: +X, +Y, -Z
    /// 4: -X, -Y, +Z
    /// 5: +X, -Y, +Z
    /// 6: -X, +Y, +Z
    /// 7: +X, +Y, +Z
    pub fn octant(&self, index: usize) -> Bounds {
        debug_assert!(index < 8, "octant index out of range: {index}");
        let child_size = self.size * 0.5;
        let step = |bit: usize| if index & bit != 0 { 0.5 } else { -0.5 };

        let offset = Vec3::new(
            child_size.x * step(1),
            child_size.y * step(2),
            child_size.z * step(4),
        );

        Bounds::new(self.center + offset, child_size)
    }

    /// Reject non-finite centers and negative or non-finite sizes
    pub fn validate(&self) -> Result<(), OctreeError> {
        if !utils::is_finite(self.center) {
            return Err(OctreeError::InvalidBounds(format!(
                "center is not finite: {:?}", self.center
            )));
        }
        if !utils::is_finite(self.size) {
            return Err(OctreeError::InvalidBounds(format!(
                "size is not finite: {:?}", self.size
            )));
        }
        if self.size.x < 0.0 || self.size.y < 0.0 || self.size.z < 0.0 {
            return Err(OctreeError::InvalidBounds(format!(
                "size has a negative component: {:?}", self.size
            )));
        }
        Ok(())
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bounds_min_max() {
        let bounds = Bounds::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(2.0, 4.0, 6.0));
        assert_relative_eq!(bounds.min(), Vec3::new(0.0, 0.0, 0.0));
        assert_relative_eq!(bounds.max(), Vec3::new(2.0, 4.0, 6.0));

        let rebuilt = Bounds::from_min_max(bounds.min(), bounds.max());
        assert_relative_eq!(rebuilt.center, bounds.center);
        assert_relative_eq!(rebuilt.size, bounds.size);
    }

    #[test]
    fn test_bounds_contains_point() {
        let bounds = Bounds::new(Vec3::zeros(), Vec3::new(2.0, 2.0, 2.0));

        assert!(bounds.contains_point(Vec3::zeros()));
        assert!(bounds.contains_point(Vec3::new(0.5, 0.5, 0.5)));
        assert!(bounds.contains_point(Vec3::new(1.0, 1.0, 1.0)));
        assert!(!bounds.contains_point(Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_bounds_intersects() {
        let a = Bounds::from_min_max(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 2.0, 2.0));
        let b = Bounds::from_min_max(Vec3::new(1.0, 1.0, 1.0), Vec3::new(3.0, 3.0, 3.0));
        let c = Bounds::from_min_max(Vec3::new(5.0, 5.0, 5.0), Vec3::new(7.0, 7.0, 7.0));

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_bounds_intersects_sphere() {
        let bounds = Bounds::new(Vec3::zeros(), Vec3::new(2.0, 2.0, 2.0));

        assert!(bounds.intersects_sphere(Vec3::new(1.5, 0.0, 0.0), 0.6));
        assert!(!bounds.intersects_sphere(Vec3::new(3.0, 0.0, 0.0), 1.0));
    }

    #[test]
    fn test_bounds_intersect_ray() {
        let bounds = Bounds::new(Vec3::zeros(), Vec3::new(2.0, 2.0, 2.0));

        let hit = bounds.intersect_ray(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(hit.unwrap(), 4.0);

        let inside = bounds.intersect_ray(Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(inside, Some(0.0));

        let miss = bounds.intersect_ray(Vec3::new(-5.0, 5.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(miss.is_none());

        let behind = bounds.intersect_ray(Vec3::new(5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(behind.is_none());
    }

    #[test]
    fn test_bounds_ray_along_face() {
        let bounds = Bounds::new(Vec3::zeros(), Vec3::new(2.0, 2.0, 2.0));
        let dir = Vec3::new(1.0, 0.0, 0.0);

        let top_face = bounds.intersect_ray(Vec3::new(-5.0, 1.0, 0.0), dir);
        assert_relative_eq!(top_face.unwrap(), 4.0);

        let bottom_face = bounds.intersect_ray(Vec3::new(-5.0, -1.0, 0.0), dir);
        assert_relative_eq!(bottom_face.unwrap(), 4.0);

        let edge = bounds.intersect_ray(Vec3::new(-5.0, -1.0, 1.0), dir);
        assert_relative_eq!(edge.unwrap(), 4.0);

        let just_outside = bounds.intersect_ray(Vec3::new(-5.0, 1.5, 0.0), dir);
        assert!(just_outside.is_none());

        // Running along the face from inside the x range
        let on_face = bounds.intersect_ray(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(on_face, Some(0.0));
    }

    #[test]
    fn test_bounds_octant_layout() {
        let bounds = Bounds::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(8.0, 4.0, 2.0));

        let first = bounds.octant(0);
        assert_relative_eq!(first.center, Vec3::new(8.0, -1.0, -0.5));
        assert_relative_eq!(first.size, Vec3::new(4.0, 2.0, 1.0));

        let x_only = bounds.octant(1);
        assert_relative_eq!(x_only.center, Vec3::new(12.0, -1.0, -0.5));

        let y_only = bounds.octant(2);
        assert_relative_eq!(y_only.center, Vec3::new(8.0, 1.0, -0.5));

        let last = bounds.octant(7);
        assert_relative_eq!(last.center, Vec3::new(12.0, 1.0, 0.5));
    }

    #[test]
    fn test_bounds_validate() {
        assert!(Bounds::default().validate().is_ok());
        assert!(Bounds::new(Vec3::zeros(), Vec3::zeros()).validate().is_ok());

        let negative = Bounds::new(Vec3::zeros(), Vec3::new(1.0, -1.0, 1.0));
        assert!(matches!(negative.validate(), Err(OctreeError::InvalidBounds(_))));

        let nan = Bounds::new(Vec3::new(f32::NAN, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        assert!(nan.validate().is_err());
    }
}
