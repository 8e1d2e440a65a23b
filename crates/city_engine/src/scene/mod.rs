//! Scene ingestion
//!
//! Wire document types, the entity registry, and the loader that builds one
//! from the other.

pub mod document;
pub mod entity_kind;
pub mod scene_graph;
pub mod renderable_object;
pub mod registry;
pub mod loader;
pub mod validate;

pub use document::{EntityMetadata, EntityRecord, Groups, SceneDocument};
pub use entity_kind::{EntityKind, Primitive};
pub use scene_graph::Aabb;
pub use renderable_object::RenderableObject;
pub use registry::{EntityRegistry, ObjectKey};
pub use loader::{SceneLoader, SceneState};
pub use validate::{validate_document, ValidationReport};
