//! # City Engine
//!
//! Scene ingestion, visibility composition and connectivity tracing for an
//! interactive viewer of procedurally generated cities.
//!
//! ## Features
//!
//! - **Scene Loading**: wire-compatible scene documents into an entity registry
//! - **Materials**: named and height-graded palettes behind an explicit context
//! - **Visibility**: independent layer and system toggles
//! - **Route Tracing**: network-filtered breadth-first highlight of connected infrastructure
//! - **Transport**: background fetch from the generator API or a saved file
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use city_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ViewerConfig::default();
//!     let mut viewer = CityViewer::new(config.clone());
//!     viewer.begin_load(Box::new(HttpSceneSource::new(SceneClient::from_config(&config)?)));
//!
//!     let mut backend = HeadlessBackend::new();
//!     while !viewer.tick(0.016, &mut backend) {
//!         if viewer.failure().is_some() {
//!             break;
//!         }
//!         std::thread::sleep(std::time::Duration::from_millis(16));
//!     }
//!     viewer.set_layer("underground_1", true)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;

pub mod foundation;
pub mod config;
pub mod scene;
pub mod materials;
pub mod visibility;
pub mod routing;
pub mod picking;
pub mod camera;
pub mod client;
pub mod render;
pub mod viewer;

#[cfg(test)]
mod tests;

pub use viewer::{CityViewer, LoadedScene, ViewerError, ViewerPhase, ViewerStats};

/// Common imports for viewer users
pub mod prelude {
    pub use crate::{
        CityViewer, ViewerError, ViewerPhase, ViewerStats,
        camera::{Camera, CameraController, FramingCamera},
        client::{spawn_fetch, FileSceneSource, HttpSceneSource, LoadError, SceneClient, SceneSource},
        config::{Config, ConfigError},
        core::config::ViewerConfig,
        foundation::math::{Mat4, Quat, Transform, Vec3},
        materials::{Material, MaterialContext, MaterialHandle},
        picking::{PickEvent, PointerState, Ray},
        render::{FrameDescriptor, HeadlessBackend, RenderBackend},
        routing::{RouteInfo, RouteTracer, TraceOutcome},
        scene::{Aabb, EntityRegistry, SceneDocument, SceneLoader, SceneState},
        visibility::{VisibilityEngine, VisibilityState},
    };
}
