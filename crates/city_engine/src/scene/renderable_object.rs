//! Renderable object representation for the scene
//!
//! One renderable per recognised entity. Owned by the
//! [`super::EntityRegistry`] arena and looked up by entity identifier.

use crate::foundation::math::{Mat4, Point3, Transform, Vec3};
use crate::materials::MaterialHandle;
use super::entity_kind::{EntityKind, Primitive};
use super::scene_graph::Aabb;

/// Cached rendering data for an entity
#[derive(Debug, Clone)]
pub struct RenderableObject {
    /// Identifier of the backing entity, used for pick resolution
    pub entity_id: String,

    /// Entity kind
    pub kind: EntityKind,

    /// Primitive the mesh is built from
    pub primitive: Primitive,

    /// Center-origin world transform; scale is the entity's dimensions
    pub transform: Transform,

    /// Material currently assigned
    pub material: MaterialHandle,

    /// Whether this object is visible
    pub visible: bool,
}

impl RenderableObject {
    /// Create a new renderable object, initially visible
    pub fn new(
        entity_id: impl Into<String>,
        kind: EntityKind,
        transform: Transform,
        material: MaterialHandle,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            kind,
            primitive: kind.primitive(),
            transform,
            material,
            visible: true,
        }
    }

    /// Entity dimensions
    pub fn dimensions(&self) -> Vec3 {
        self.transform.scale
    }

    /// Model matrix for the unit primitive
    pub fn model_matrix(&self) -> Mat4 {
        self.transform.to_matrix()
    }

    /// Check if this object should be rendered
    pub fn should_render(&self) -> bool {
        self.visible
    }

    /// World-space bounds of the rotated box
    pub fn world_bounds(&self) -> Aabb {
        let matrix = self.model_matrix();
        let corners = [-0.5f32, 0.5].into_iter().flat_map(|x| {
            [-0.5f32, 0.5]
                .into_iter()
                .flat_map(move |y| [-0.5f32, 0.5].into_iter().map(move |z| Point3::new(x, y, z)))
        });
        let points = corners.map(|corner| matrix.transform_point(&corner).coords);
        Aabb::from_points(points)
            .unwrap_or_else(|| Aabb::from_center_extents(self.transform.position, Vec3::zeros()))
    }

    /// Distance along the ray to this object's oriented box, if hit
    ///
    /// The ray is moved into the object's local frame and tested against the
    /// box spanned by its dimensions. Cylinders use their bounding box.
    pub fn intersect_ray(&self, ray_origin: Vec3, ray_dir: Vec3) -> Option<f32> {
        let rotation = &self.transform.rotation;
        let local_origin = rotation.inverse_transform_vector(&(ray_origin - self.transform.position));
        let local_dir = rotation.inverse_transform_vector(&ray_dir);
        Aabb::from_center_extents(Vec3::zeros(), self.dimensions() * 0.5)
            .intersect_ray(local_origin, local_dir)
    }
}
