//! Material parameters
//!
//! A PBR-style parameter block. Backends translate it into whatever shading
//! model they implement.

use crate::foundation::math::Vec3;

slotmap::new_key_type! {
    /// Handle to a material owned by a [`super::MaterialContext`]
    pub struct MaterialHandle;
}

/// Surface parameters for one material
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Cache key this material was created under
    pub name: String,
    /// Base color (linear-ish RGB in [0, 1])
    pub base_color: Vec3,
    /// Metallic factor (0.0 = dielectric, 1.0 = metallic)
    pub metallic: f32,
    /// Roughness factor (0.0 = mirror, 1.0 = completely rough)
    pub roughness: f32,
    /// Emission color
    pub emission: Vec3,
    /// Emission strength multiplier
    pub emission_strength: f32,
}

impl Material {
    /// Default metallic factor for materials that don't specify one
    pub const DEFAULT_METALLIC: f32 = 0.0;

    /// Default roughness for materials that don't specify one
    pub const DEFAULT_ROUGHNESS: f32 = 0.5;

    /// Create a non-emissive material
    pub fn new(name: impl Into<String>, base_color: Vec3, metallic: f32, roughness: f32) -> Self {
        Self {
            name: name.into(),
            base_color,
            metallic,
            roughness,
            emission: Vec3::zeros(),
            emission_strength: 0.0,
        }
    }

    /// Set the emission color and strength
    pub fn with_emission(mut self, emission: Vec3, strength: f32) -> Self {
        self.emission = emission;
        self.emission_strength = strength;
        self
    }

    /// Whether this material emits light
    pub fn is_emissive(&self) -> bool {
        self.emission_strength > 0.0 && self.emission != Vec3::zeros()
    }
}
