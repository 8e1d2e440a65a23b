//! Spatial helpers for the scene
//!
//! Axis-aligned bounds used for camera framing and pick tests.

use crate::foundation::math::Vec3;
use super::document::WireBounds;

/// Axis-Aligned Bounding Box for spatial queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given half extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Build from a set of points; `None` when empty
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::new(first, first), |acc, p| Self::new(acc.min.inf(&p), acc.max.sup(&p))))
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Radius of the bounding sphere around the box
    pub fn radius(&self) -> f32 {
        self.extents().norm()
    }

    /// Smallest box enclosing both
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self::new(self.min.inf(&other.min), self.max.sup(&other.max))
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Test ray intersection using the slab method
    ///
    /// Returns the distance along `ray_dir` to the entry point (0 when the
    /// origin is inside), or `None` if the ray misses.
    pub fn intersect_ray(&self, ray_origin: Vec3, ray_dir: Vec3) -> Option<f32> {
        let mut tmin = f32::NEG_INFINITY;
        let mut tmax = f32::INFINITY;

        for axis in 0..3 {
            let (origin, dir) = (ray_origin[axis], ray_dir[axis]);
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if dir == 0.0 {
                // Parallel to this slab
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / dir;
            let t1 = (lo - origin) * inv;
            let t2 = (hi - origin) * inv;
            tmin = tmin.max(t1.min(t2));
            tmax = tmax.min(t1.max(t2));
        }

        if tmax >= tmin && tmax >= 0.0 {
            Some(tmin.max(0.0))
        } else {
            None
        }
    }
}

impl From<WireBounds> for Aabb {
    fn from(bounds: WireBounds) -> Self {
        Self::new(bounds.min.to_vec3(), bounds.max.to_vec3())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ray_hits_box() {
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let t = aabb.intersect_ray(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(t.unwrap(), 4.0);
    }

    #[test]
    fn test_ray_misses_box() {
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        assert!(aabb.intersect_ray(Vec3::new(3.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0)).is_none());
        // Box behind the ray
        assert!(aabb.intersect_ray(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0)).is_none());
    }

    #[test]
    fn test_ray_from_inside() {
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let t = aabb.intersect_ray(Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(t.unwrap(), 0.0);
    }

    #[test]
    fn test_union_and_points() {
        let a = Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Vec3::new(-2.0, 0.5, 0.0), Vec3::new(0.5, 3.0, 0.5));
        let u = a.union(&b);
        assert_relative_eq!(u.min, Vec3::new(-2.0, 0.0, 0.0));
        assert_relative_eq!(u.max, Vec3::new(1.0, 3.0, 1.0));

        let from_points = Aabb::from_points([a.min, a.max, b.min, b.max]).unwrap();
        assert_eq!(from_points, u);
        assert!(Aabb::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_center_and_radius() {
        let aabb = Aabb::from_center_extents(Vec3::new(1.0, 2.0, 3.0), Vec3::new(3.0, 0.0, 4.0));
        assert_relative_eq!(aabb.center(), Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(aabb.radius(), 5.0);
        assert!(aabb.contains_point(Vec3::new(4.0, 2.0, 7.0)));
    }
}
