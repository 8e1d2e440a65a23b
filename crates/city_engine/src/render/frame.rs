//! Frame descriptions

use crate::camera::Camera;
use crate::foundation::math::Mat4;
use crate::materials::MaterialHandle;
use crate::scene::{EntityRegistry, Primitive};

/// One visible renderable
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    /// Entity the item belongs to
    pub entity_id: String,
    /// Unit primitive to draw
    pub primitive: Primitive,
    /// Model matrix scaling the unit primitive into place
    pub model: Mat4,
    /// Material to shade with
    pub material: MaterialHandle,
}

/// Everything a backend needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameDescriptor {
    /// Camera view-projection matrix
    pub view_projection: Mat4,
    /// Visible items, in registry order
    pub items: Vec<DrawItem>,
}

impl FrameDescriptor {
    /// Collect the visible renderables of a registry
    pub fn build(registry: &EntityRegistry, camera: &Camera) -> Self {
        let items = registry
            .visible()
            .map(|object| DrawItem {
                entity_id: object.entity_id.clone(),
                primitive: object.primitive,
                model: object.model_matrix(),
                material: object.material,
            })
            .collect();

        Self { view_projection: camera.view_projection_matrix(), items }
    }
}
