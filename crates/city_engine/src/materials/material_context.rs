//! Material context
//!
//! Owns every material created for a scene and hands out [`MaterialHandle`]s.
//! Flat materials are cached per name, graded materials per step, and the
//! highlight material is a singleton. Handles stay valid until
//! [`MaterialContext::dispose_all`].

use std::collections::HashMap;

use slotmap::SlotMap;

use super::material::{Material, MaterialHandle};
use super::palette;
use crate::foundation::math::Vec3;

/// Explicit-lifetime material cache for one scene
pub struct MaterialContext {
    /// Material storage
    materials: SlotMap<MaterialHandle, Material>,
    /// Name -> handle for flat materials
    flat: HashMap<String, MaterialHandle>,
    /// Step -> handle for graded materials
    graded: HashMap<u32, MaterialHandle>,
    /// Lazily created highlight material
    highlight: Option<MaterialHandle>,
    /// Number of graded steps
    graded_steps: u32,
}

impl MaterialContext {
    /// Create an empty context with the given number of graded steps (at least 1)
    pub fn new(graded_steps: u32) -> Self {
        Self {
            materials: SlotMap::with_key(),
            flat: HashMap::new(),
            graded: HashMap::new(),
            highlight: None,
            graded_steps: graded_steps.max(1),
        }
    }

    /// Number of discrete graded steps
    pub fn graded_steps(&self) -> u32 {
        self.graded_steps
    }

    /// Resolve a material by name
    ///
    /// Unknown names resolve to the magenta error material, cached under the
    /// requested name so repeated lookups return the same handle.
    pub fn resolve_flat(&mut self, name: &str) -> MaterialHandle {
        if let Some(&handle) = self.flat.get(name) {
            return handle;
        }

        let material = match palette::lookup(name) {
            Some(entry) => Material::new(
                name,
                palette::hex_to_rgb(entry.color),
                entry.metallic,
                entry.roughness,
            ),
            None => {
                log::debug!("Unknown material '{}', using error color", name);
                Material::new(
                    name,
                    palette::hex_to_rgb(palette::ERROR_COLOR),
                    Material::DEFAULT_METALLIC,
                    Material::DEFAULT_ROUGHNESS,
                )
            }
        };

        let handle = self.materials.insert(material);
        self.flat.insert(name.to_string(), handle);
        handle
    }

    /// Graded step for a height fraction
    pub fn graded_step(&self, t: f32) -> u32 {
        palette::graded_step(t, self.graded_steps)
    }

    /// Resolve a height-graded material for `t` in [0, 1]
    pub fn resolve_graded(&mut self, t: f32) -> MaterialHandle {
        let step = self.graded_step(t);
        if let Some(&handle) = self.graded.get(&step) {
            return handle;
        }

        let (color, metallic, roughness) = palette::graded_params(step, self.graded_steps);
        let handle = self
            .materials
            .insert(Material::new(format!("graded_{step}"), color, metallic, roughness));
        self.graded.insert(step, handle);
        handle
    }

    /// The singleton highlight material used for traced routes
    pub fn highlight(&mut self) -> MaterialHandle {
        if let Some(handle) = self.highlight {
            return handle;
        }

        let material = Material::new(
            "highlight",
            palette::hex_to_rgb(palette::HIGHLIGHT_COLOR),
            Material::DEFAULT_METALLIC,
            palette::HIGHLIGHT_ROUGHNESS,
        )
        .with_emission(
            palette::hex_to_rgb(palette::HIGHLIGHT_EMISSIVE),
            palette::HIGHLIGHT_EMISSIVE_INTENSITY,
        );
        let handle = self.materials.insert(material);
        self.highlight = Some(handle);
        handle
    }

    /// Whether `handle` is the highlight material
    pub fn is_highlight(&self, handle: MaterialHandle) -> bool {
        self.highlight == Some(handle)
    }

    /// Get material parameters by handle
    pub fn get(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(handle)
    }

    /// Base color of a material, if the handle is live
    pub fn base_color(&self, handle: MaterialHandle) -> Option<Vec3> {
        self.get(handle).map(|material| material.base_color)
    }

    /// Number of live materials
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Whether no materials are live
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Release every cached material
    ///
    /// All previously issued handles become stale. There is no per-material eviction.
    pub fn dispose_all(&mut self) {
        let released = self.materials.len();
        self.materials.clear();
        self.flat.clear();
        self.graded.clear();
        self.highlight = None;
        log::debug!("Disposed {} materials", released);
    }
}

impl Default for MaterialContext {
    fn default() -> Self {
        Self::new(8)
    }
}
