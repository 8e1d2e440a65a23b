//! Visibility engine
//!
//! Two independent toggle sets (layers, systems) and reverse indices built
//! once from the scene's groups. [`VisibilityEngine::recompute`] is the only
//! place visibility is written to renderables; it always walks the whole
//! registry.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::core::config::SURFACE_LAYER;
use crate::scene::{EntityRegistry, Groups};

/// Enabled layer and system names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityState {
    /// Layers currently shown
    pub enabled_layers: HashSet<String>,
    /// Systems currently shown
    pub enabled_systems: HashSet<String>,
}

/// Computes per-entity visibility from the toggle sets
#[derive(Debug, Clone)]
pub struct VisibilityEngine {
    state: VisibilityState,
    layer_of: HashMap<String, String>,
    system_of: HashMap<String, String>,
    known_layers: BTreeSet<String>,
    known_systems: BTreeSet<String>,
}

impl VisibilityEngine {
    /// Build the reverse indices and the default state
    ///
    /// `default_layers` start enabled; every known system starts enabled.
    pub fn new(groups: &Groups, default_layers: &[String]) -> Self {
        let layer_of = reverse_index(&groups.layers);
        let system_of = reverse_index(&groups.systems);

        let known_layers: BTreeSet<String> = groups.layers.keys().cloned().collect();
        let known_systems: BTreeSet<String> = groups.systems.keys().cloned().collect();

        let state = VisibilityState {
            enabled_layers: default_layers.iter().cloned().collect(),
            enabled_systems: known_systems.iter().cloned().collect(),
        };

        log::debug!(
            "Visibility engine: {} layers, {} systems, {} layer-tagged entities",
            known_layers.len(),
            known_systems.len(),
            layer_of.len()
        );

        Self { state, layer_of, system_of, known_layers, known_systems }
    }

    /// Current toggle sets
    pub fn state(&self) -> &VisibilityState {
        &self.state
    }

    /// Enable or disable a layer; takes effect on the next recompute
    pub fn set_layer_enabled(&mut self, layer: &str, enabled: bool) {
        toggle(&mut self.state.enabled_layers, layer, enabled);
    }

    /// Enable or disable a system; takes effect on the next recompute
    pub fn set_system_enabled(&mut self, system: &str, enabled: bool) {
        toggle(&mut self.state.enabled_systems, system, enabled);
    }

    /// Whether a layer is enabled
    pub fn is_layer_enabled(&self, layer: &str) -> bool {
        self.state.enabled_layers.contains(layer)
    }

    /// Whether a system is enabled
    pub fn is_system_enabled(&self, system: &str) -> bool {
        self.state.enabled_systems.contains(system)
    }

    /// Layer of an entity, `surface` when it has none in the index
    pub fn layer_of(&self, id: &str) -> &str {
        self.layer_of.get(id).map_or(SURFACE_LAYER, String::as_str)
    }

    /// System of an entity, if any
    pub fn system_of(&self, id: &str) -> Option<&str> {
        self.system_of.get(id).map(String::as_str)
    }

    /// Visibility of an entity under the current toggle sets
    pub fn is_visible(&self, id: &str) -> bool {
        self.is_layer_enabled(self.layer_of(id))
            && self.system_of(id).map_or(true, |system| self.is_system_enabled(system))
    }

    /// Write visibility to every renderable; returns the visible count
    pub fn recompute(&self, registry: &mut EntityRegistry) -> usize {
        let mut visible = 0;
        for object in registry.iter_mut() {
            object.visible = self.is_visible(&object.entity_id);
            visible += usize::from(object.visible);
        }
        log::trace!("Visibility recomputed: {} of {} visible", visible, registry.len());
        visible
    }

    /// Layers named by the groups, sorted
    pub fn known_layers(&self) -> impl Iterator<Item = &str> {
        self.known_layers.iter().map(String::as_str)
    }

    /// Systems named by the groups, sorted
    pub fn known_systems(&self) -> impl Iterator<Item = &str> {
        self.known_systems.iter().map(String::as_str)
    }
}

fn reverse_index(index: &crate::scene::document::GroupIndex) -> HashMap<String, String> {
    let mut reverse = HashMap::new();
    for (group, members) in index {
        for member in members {
            reverse.insert(member.clone(), group.clone());
        }
    }
    reverse
}

fn toggle(set: &mut HashSet<String>, name: &str, enabled: bool) {
    if enabled {
        set.insert(name.to_string());
    } else {
        set.remove(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Transform;
    use crate::materials::MaterialContext;
    use crate::scene::{EntityKind, RenderableObject};

    fn fixture() -> (Groups, EntityRegistry) {
        let mut groups = Groups::default();
        groups.layers.insert("surface".into(), vec!["road".into(), "bldg".into()]);
        groups.layers.insert("underground_1".into(), vec!["pipe".into(), "cable".into()]);
        groups.systems.insert("water".into(), vec!["pipe".into()]);
        groups.systems.insert("electrical".into(), vec!["cable".into()]);
        groups.systems.insert("vehicle".into(), vec!["road".into()]);

        let mut materials = MaterialContext::default();
        let handle = materials.resolve_flat("concrete");
        let mut registry = EntityRegistry::new();
        for id in ["road", "bldg", "pipe", "cable", "untagged"] {
            registry.insert_object(RenderableObject::new(id, EntityKind::Pipe, Transform::identity(), handle));
        }
        (groups, registry)
    }

    fn visible_ids(registry: &EntityRegistry) -> Vec<&str> {
        let mut ids: Vec<&str> = registry.visible().map(|o| o.entity_id.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn test_default_state_shows_surface_only() {
        let (groups, mut registry) = fixture();
        let engine = VisibilityEngine::new(&groups, &["surface".to_string()]);

        assert_eq!(engine.recompute(&mut registry), 3);
        assert_eq!(visible_ids(&registry), vec!["bldg", "road", "untagged"]);
        assert!(engine.is_system_enabled("water"));
        assert!(!engine.is_layer_enabled("underground_1"));
    }

    #[test]
    fn test_toggles_compose() {
        let (groups, mut registry) = fixture();
        let mut engine = VisibilityEngine::new(&groups, &["surface".to_string()]);

        engine.set_layer_enabled("underground_1", true);
        engine.set_system_enabled("water", false);
        engine.recompute(&mut registry);
        assert_eq!(visible_ids(&registry), vec!["bldg", "cable", "road", "untagged"]);

        engine.set_system_enabled("vehicle", false);
        engine.recompute(&mut registry);
        assert_eq!(visible_ids(&registry), vec!["bldg", "cable", "untagged"]);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let (groups, mut registry) = fixture();
        let mut engine = VisibilityEngine::new(&groups, &["surface".to_string()]);
        engine.set_layer_enabled("underground_1", true);
        engine.set_system_enabled("electrical", false);

        engine.recompute(&mut registry);
        let first: Vec<(String, bool)> =
            registry.iter().map(|o| (o.entity_id.clone(), o.visible)).collect();
        engine.recompute(&mut registry);
        let second: Vec<(String, bool)> =
            registry.iter().map(|o| (o.entity_id.clone(), o.visible)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_toggle_order_does_not_matter() {
        let (groups, mut a) = fixture();
        let (_, mut b) = fixture();

        let mut first = VisibilityEngine::new(&groups, &["surface".to_string()]);
        first.set_system_enabled("water", false);
        first.set_layer_enabled("underground_1", true);
        first.set_layer_enabled("surface", false);
        first.set_layer_enabled("surface", true);
        first.recompute(&mut a);

        let mut second = VisibilityEngine::new(&groups, &["surface".to_string()]);
        second.set_layer_enabled("underground_1", true);
        second.set_system_enabled("water", false);
        second.recompute(&mut b);

        assert_eq!(first.state(), second.state());
        assert_eq!(visible_ids(&a), visible_ids(&b));
    }

    #[test]
    fn test_composition_law_holds_for_every_entity() {
        let (groups, mut registry) = fixture();
        let mut engine = VisibilityEngine::new(&groups, &["surface".to_string()]);
        engine.set_layer_enabled("underground_1", true);
        engine.set_system_enabled("electrical", false);
        engine.recompute(&mut registry);

        for object in registry.iter() {
            let id = object.entity_id.as_str();
            let expected = engine.is_layer_enabled(engine.layer_of(id))
                && engine.system_of(id).map_or(true, |s| engine.is_system_enabled(s));
            assert_eq!(object.visible, expected, "entity {id}");
        }
    }

    #[test]
    fn test_known_names_are_sorted() {
        let (groups, _) = fixture();
        let engine = VisibilityEngine::new(&groups, &[]);
        assert_eq!(engine.known_systems().collect::<Vec<_>>(), vec!["electrical", "vehicle", "water"]);
        assert_eq!(engine.known_layers().collect::<Vec<_>>(), vec!["surface", "underground_1"]);
    }
}
