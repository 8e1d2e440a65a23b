//! Scene loader
//!
//! Turns a [`SceneDocument`] into a populated [`EntityRegistry`]. Building
//! colors are graded against the tallest building of the current document,
//! so the maximum height is computed before any renderable is built.

use std::collections::HashSet;

use crate::core::config::MaterialConfig;
use crate::foundation::math::{Transform, Vec3};
use crate::materials::MaterialContext;
use super::document::{EntityRecord, Groups, SceneDocument};
use super::entity_kind::EntityKind;
use super::registry::EntityRegistry;
use super::renderable_object::RenderableObject;
use super::scene_graph::Aabb;

/// Material name that switches buildings onto the graded palette
pub const GRADED_MATERIAL: &str = "concrete";

/// Result of loading one document
#[derive(Debug)]
pub struct SceneState {
    /// Renderables and metadata by entity identifier
    pub registry: EntityRegistry,
    /// Group indices, passed through unmodified
    pub groups: Groups,
    /// Bounds declared by the document
    pub city_bounds: Option<Aabb>,
    /// Union of renderable world bounds
    pub derived_bounds: Option<Aabb>,
    /// Tallest building height used for grading
    pub max_height: f32,
    /// Entities skipped for an unrecognised type
    pub skipped: usize,
    /// Entity records seen, duplicates included
    pub entity_count: usize,
    /// Document format version
    pub spec_version: String,
}

impl SceneState {
    /// Bounds to frame: declared bounds first, derived bounds otherwise
    pub fn bounds(&self) -> Option<Aabb> {
        self.city_bounds.or(self.derived_bounds)
    }
}

/// Builds [`SceneState`] from documents
pub struct SceneLoader;

impl SceneLoader {
    /// Load a document into fresh state
    ///
    /// Unknown entity types are skipped and counted; unknown materials fall
    /// back to the error color. Nothing in here fails.
    pub fn load(
        document: &SceneDocument,
        materials: &mut MaterialContext,
        config: &MaterialConfig,
    ) -> SceneState {
        let max_height = Self::max_building_height(document, config.default_max_height);

        let mut registry = EntityRegistry::new();
        let mut seen = HashSet::new();
        let mut skipped = 0;

        for record in &document.entities {
            if !seen.insert(record.id.as_str()) {
                log::trace!("Duplicate entity id '{}', replacing earlier entry", record.id);
                registry.remove(&record.id);
            }

            if let Some(metadata) = &record.metadata {
                registry.insert_metadata(record.id.clone(), metadata.clone());
            }

            let Some(kind) = EntityKind::parse(&record.entity_type) else {
                log::debug!("Skipping entity '{}' with unknown type '{}'", record.id, record.entity_type);
                skipped += 1;
                continue;
            };

            let material = if kind.is_building() && record.material == GRADED_MATERIAL {
                materials.resolve_graded(record.dimensions.y / max_height)
            } else {
                materials.resolve_flat(&record.material)
            };

            registry.insert_object(RenderableObject::new(
                record.id.clone(),
                kind,
                Self::placement(record),
                material,
            ));
        }

        let derived_bounds = registry
            .iter()
            .map(RenderableObject::world_bounds)
            .reduce(|acc, bounds| acc.union(&bounds));
        let city_bounds = document.metadata.city_bounds.map(Aabb::from);

        log::info!(
            "Loaded scene v{}: {} renderables, {} skipped, max building height {:.1}, bounds {}",
            document.metadata.spec_version,
            registry.len(),
            skipped,
            max_height,
            match city_bounds.or(derived_bounds) {
                Some(bounds) => format!("{:?} .. {:?}", bounds.min.as_slice(), bounds.max.as_slice()),
                None => "none".to_string(),
            }
        );

        SceneState {
            registry,
            groups: document.groups.clone(),
            city_bounds,
            derived_bounds,
            max_height,
            skipped,
            entity_count: document.entities.len(),
            spec_version: document.metadata.spec_version.clone(),
        }
    }

    /// Tallest building in the document, or `default` when there is none
    pub fn max_building_height(document: &SceneDocument, default: f32) -> f32 {
        document
            .entities
            .iter()
            .filter(|record| record.entity_type == EntityKind::Building.as_str())
            .map(|record| record.dimensions.y)
            .filter(|height| height.is_finite() && *height > 0.0)
            .reduce(f32::max)
            .unwrap_or(default)
    }

    /// Center-origin transform for a record whose position is its base
    pub fn placement(record: &EntityRecord) -> Transform {
        let dimensions = record.dimensions.to_vec3();
        let position = record.position.to_vec3() + Vec3::new(0.0, dimensions.y / 2.0, 0.0);
        Transform::new(position, record.rotation_quat(), dimensions)
    }
}
