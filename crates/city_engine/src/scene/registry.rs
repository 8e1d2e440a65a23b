//! Entity registry
//!
//! Arena plus index: renderables live in a [`SlotMap`] and are addressed by
//! entity identifier through a side table. Metadata is stored separately so
//! entities without a renderable (unknown types) stay traversable.

use std::collections::HashMap;

use slotmap::SlotMap;

use super::document::EntityMetadata;
use super::renderable_object::RenderableObject;
use crate::materials::MaterialHandle;

slotmap::new_key_type! {
    /// Key of a renderable in the registry arena
    pub struct ObjectKey;
}

/// Identifier -> renderable and identifier -> metadata mappings for one scene
#[derive(Debug, Default)]
pub struct EntityRegistry {
    objects: SlotMap<ObjectKey, RenderableObject>,
    by_id: HashMap<String, ObjectKey>,
    metadata: HashMap<String, EntityMetadata>,
}

impl EntityRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a renderable under its entity identifier
    ///
    /// A previous renderable with the same identifier is dropped (last write wins).
    pub fn insert_object(&mut self, object: RenderableObject) -> ObjectKey {
        let id = object.entity_id.clone();
        let key = self.objects.insert(object);
        if let Some(previous) = self.by_id.insert(id, key) {
            self.objects.remove(previous);
        }
        key
    }

    /// Register metadata under an entity identifier (last write wins)
    pub fn insert_metadata(&mut self, id: impl Into<String>, metadata: EntityMetadata) {
        self.metadata.insert(id.into(), metadata);
    }

    /// Drop whatever is registered for `id`
    ///
    /// Used when a later duplicate replaces an earlier entry with a different shape.
    pub fn remove(&mut self, id: &str) {
        if let Some(key) = self.by_id.remove(id) {
            self.objects.remove(key);
        }
        self.metadata.remove(id);
    }

    /// Renderable for an identifier
    pub fn get(&self, id: &str) -> Option<&RenderableObject> {
        self.by_id.get(id).and_then(|&key| self.objects.get(key))
    }

    /// Mutable renderable for an identifier
    pub fn get_mut(&mut self, id: &str) -> Option<&mut RenderableObject> {
        let key = *self.by_id.get(id)?;
        self.objects.get_mut(key)
    }

    /// Metadata for an identifier
    pub fn metadata(&self, id: &str) -> Option<&EntityMetadata> {
        self.metadata.get(id)
    }

    /// Whether a renderable exists for `id`
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Current material of a renderable
    pub fn material_of(&self, id: &str) -> Option<MaterialHandle> {
        self.get(id).map(|object| object.material)
    }

    /// Swap the material of a renderable, returning the previous handle
    pub fn set_material(&mut self, id: &str, material: MaterialHandle) -> Option<MaterialHandle> {
        self.get_mut(id).map(|object| std::mem::replace(&mut object.material, material))
    }

    /// Iterate renderables
    pub fn iter(&self) -> impl Iterator<Item = &RenderableObject> {
        self.objects.values()
    }

    /// Iterate renderables mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut RenderableObject> {
        self.objects.values_mut()
    }

    /// Iterate visible renderables
    pub fn visible(&self) -> impl Iterator<Item = &RenderableObject> {
        self.objects.values().filter(|object| object.visible)
    }

    /// Entity identifiers with a renderable, sorted
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.by_id.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Number of renderables
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether no renderables are registered
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of metadata entries
    pub fn metadata_len(&self) -> usize {
        self.metadata.len()
    }

    /// Number of visible renderables
    pub fn visible_count(&self) -> usize {
        self.visible().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Transform;
    use crate::scene::EntityKind;
    use serde_json::json;

    fn handles(n: usize) -> Vec<MaterialHandle> {
        let mut arena: SlotMap<MaterialHandle, ()> = SlotMap::with_key();
        (0..n).map(|_| arena.insert(())).collect()
    }

    fn object(id: &str, material: MaterialHandle) -> RenderableObject {
        RenderableObject::new(id, EntityKind::Pipe, Transform::identity(), material)
    }

    fn metadata(value: serde_json::Value) -> EntityMetadata {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_insert_and_lookup() {
        let h = handles(1);
        let mut registry = EntityRegistry::new();
        registry.insert_object(object("a", h[0]));

        assert!(registry.contains("a"));
        assert_eq!(registry.material_of("a"), Some(h[0]));
        assert!(registry.get("b").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_id_last_write_wins() {
        let h = handles(2);
        let mut registry = EntityRegistry::new();
        registry.insert_object(object("a", h[0]));
        registry.insert_object(object("a", h[1]));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.material_of("a"), Some(h[1]));

        registry.insert_metadata("a", metadata(json!({"network": "water"})));
        registry.insert_metadata("a", metadata(json!({"network": "power"})));
        assert_eq!(registry.metadata("a").unwrap().network(), Some("power"));
        assert_eq!(registry.metadata_len(), 1);
    }

    #[test]
    fn test_set_material_returns_previous() {
        let h = handles(2);
        let mut registry = EntityRegistry::new();
        registry.insert_object(object("a", h[0]));

        assert_eq!(registry.set_material("a", h[1]), Some(h[0]));
        assert_eq!(registry.material_of("a"), Some(h[1]));
        assert_eq!(registry.set_material("missing", h[0]), None);
    }

    #[test]
    fn test_metadata_without_renderable() {
        let mut registry = EntityRegistry::new();
        registry.insert_metadata("ghost", metadata(json!({"connected_to": ["a"]})));
        assert!(!registry.contains("ghost"));
        assert!(registry.metadata("ghost").is_some());
    }

    #[test]
    fn test_remove_and_visible_count() {
        let h = handles(1);
        let mut registry = EntityRegistry::new();
        registry.insert_object(object("a", h[0]));
        registry.insert_object(object("b", h[0]));
        registry.get_mut("b").unwrap().visible = false;

        assert_eq!(registry.visible_count(), 1);
        assert_eq!(registry.ids(), vec!["a", "b"]);

        registry.remove("a");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.visible_count(), 0);
    }
}
