//! Nearest-hit resolution

use crate::foundation::math::Vec3;
use crate::scene::EntityRegistry;

/// A world-space ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin
    pub origin: Vec3,
    /// Normalized direction
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing the direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction: direction.normalize() }
    }
}

/// Entity id of the nearest visible renderable hit by `ray`
///
/// Hidden renderables are never eligible.
pub fn pick(ray: &Ray, registry: &EntityRegistry) -> Option<String> {
    registry
        .visible()
        .filter_map(|object| {
            object
                .intersect_ray(ray.origin, ray.direction)
                .map(|t| (t, object.entity_id.as_str()))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, id)| id.to_string())
}
