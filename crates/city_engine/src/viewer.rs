//! City viewer
//!
//! Owns the load lifecycle and routes operator input into the visibility
//! engine and route tracer. Nothing scene-related exists until a document
//! has arrived; every operation before then reports [`ViewerError::NotReady`].

use std::sync::mpsc::{Receiver, TryRecvError};

use thiserror::Error;

use crate::camera::{CameraController, FramingCamera};
use crate::client::{spawn_fetch, LoadError, SceneSource};
use crate::core::config::ViewerConfig;
use crate::materials::MaterialContext;
use crate::picking::{pick, PickEvent, PointerState};
use crate::render::{FrameDescriptor, RenderBackend};
use crate::routing::{RouteInfo, RouteTracer, TraceOutcome};
use crate::scene::{validate_document, SceneDocument, SceneLoader, SceneState, ValidationReport};
use crate::visibility::VisibilityEngine;

/// Viewer errors
#[derive(Debug, Error)]
pub enum ViewerError {
    /// The operation needs a loaded scene
    #[error("no scene loaded yet")]
    NotReady,

    /// The scene could not be loaded
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Everything that exists once a scene is loaded
pub struct LoadedScene {
    /// Registry, groups and bounds
    pub scene: SceneState,
    /// Layer and system toggles
    pub visibility: VisibilityEngine,
    /// Route highlight state
    pub tracer: RouteTracer,
    /// Materials for this scene
    pub materials: MaterialContext,
    /// Camera collaborator
    pub camera: FramingCamera,
    /// Structural diagnostics of the document
    pub validation: ValidationReport,
}

/// Load lifecycle
pub enum ViewerPhase {
    /// Waiting for a document
    Loading,
    /// Scene loaded
    Ready(Box<LoadedScene>),
    /// Load failed; terminal for this attempt
    Failed(String),
}

/// Summary numbers for the operator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerStats {
    /// Renderables in the registry
    pub renderables: usize,
    /// Renderables currently visible
    pub visible: usize,
    /// Entities skipped for unknown types
    pub skipped: usize,
    /// Live materials
    pub materials: usize,
    /// Tallest building height
    pub max_height: f32,
}

/// Interactive city viewer
pub struct CityViewer {
    config: ViewerConfig,
    phase: ViewerPhase,
    pending: Option<Receiver<Result<SceneDocument, LoadError>>>,
    pointer: PointerState,
}

impl CityViewer {
    /// Create a viewer in the loading phase
    pub fn new(config: ViewerConfig) -> Self {
        let pointer = PointerState::new(config.viewport);
        Self { config, phase: ViewerPhase::Loading, pending: None, pointer }
    }

    /// Configuration in use
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Current phase
    pub fn phase(&self) -> &ViewerPhase {
        &self.phase
    }

    /// Whether a scene is loaded
    pub fn is_ready(&self) -> bool {
        matches!(self.phase, ViewerPhase::Ready(_))
    }

    /// Failure message, if the load failed
    pub fn failure(&self) -> Option<&str> {
        match &self.phase {
            ViewerPhase::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Start fetching a document in the background
    pub fn begin_load(&mut self, source: Box<dyn SceneSource>) {
        self.phase = ViewerPhase::Loading;
        self.pending = Some(spawn_fetch(source));
    }

    /// Check for a finished fetch without blocking
    ///
    /// Returns `Ok(true)` on the call that made the scene ready.
    pub fn poll(&mut self) -> Result<bool, ViewerError> {
        let Some(rx) = &self.pending else {
            return Ok(false);
        };

        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return Ok(false),
            Err(TryRecvError::Disconnected) => Err(LoadError::WorkerGone),
        };
        self.pending = None;

        match result {
            Ok(document) => {
                self.on_loaded(&document);
                Ok(true)
            }
            Err(err) => {
                self.phase = ViewerPhase::Failed(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Build all scene state from a document
    pub fn on_loaded(&mut self, document: &SceneDocument) {
        if let ViewerPhase::Ready(previous) = &mut self.phase {
            previous.materials.dispose_all();
        }

        let validation = validate_document(document);
        validation.log_summary();

        let mut materials = MaterialContext::new(self.config.materials.graded_steps);
        let mut scene = SceneLoader::load(document, &mut materials, &self.config.materials);

        let visibility = VisibilityEngine::new(&scene.groups, &self.config.visibility.default_layers);
        let visible = visibility.recompute(&mut scene.registry);

        let mut camera = FramingCamera::new(&self.config.camera, self.config.viewport.aspect());
        if let Some(bounds) = scene.bounds() {
            camera.fit_to_bounds(&bounds);
        }

        log::info!("Scene ready: {} of {} renderables visible", visible, scene.registry.len());
        self.phase = ViewerPhase::Ready(Box::new(LoadedScene {
            scene,
            visibility,
            tracer: RouteTracer::new(),
            materials,
            camera,
            validation,
        }));
    }

    /// Loaded scene, if any
    pub fn loaded(&self) -> Option<&LoadedScene> {
        match &self.phase {
            ViewerPhase::Ready(loaded) => Some(&**loaded),
            _ => None,
        }
    }

    fn loaded_mut(&mut self) -> Result<&mut LoadedScene, ViewerError> {
        match &mut self.phase {
            ViewerPhase::Ready(loaded) => Ok(&mut **loaded),
            _ => Err(ViewerError::NotReady),
        }
    }

    /// Toggle a layer and recompute; returns the visible count
    pub fn set_layer(&mut self, layer: &str, enabled: bool) -> Result<usize, ViewerError> {
        let loaded = self.loaded_mut()?;
        loaded.visibility.set_layer_enabled(layer, enabled);
        Ok(loaded.visibility.recompute(&mut loaded.scene.registry))
    }

    /// Toggle a system and recompute; returns the visible count
    pub fn set_system(&mut self, system: &str, enabled: bool) -> Result<usize, ViewerError> {
        let loaded = self.loaded_mut()?;
        loaded.visibility.set_system_enabled(system, enabled);
        Ok(loaded.visibility.recompute(&mut loaded.scene.registry))
    }

    /// Pick at a pixel position
    pub fn click(&mut self, x: f32, y: f32, over_ui: bool) -> Result<Option<TraceOutcome>, ViewerError> {
        self.pointer.update_position(x, y);
        let event = self.pointer.pick_event(over_ui);
        self.handle_pick_event(event)
    }

    /// Resolve a pick event against the visible scene
    ///
    /// Events over UI chrome are ignored and yield `Ok(None)`.
    pub fn handle_pick_event(&mut self, event: PickEvent) -> Result<Option<TraceOutcome>, ViewerError> {
        let loaded = self.loaded_mut()?;
        if event.over_ui {
            log::trace!("Pick over UI ignored");
            return Ok(None);
        }

        let (x, y) = event.ndc;
        let picked = loaded
            .camera
            .camera()
            .screen_to_world_ray(x, y)
            .and_then(|ray| pick(&ray, &loaded.scene.registry));

        Ok(Some(loaded.tracer.handle_pick(
            picked.as_deref(),
            &mut loaded.scene.registry,
            &mut loaded.materials,
        )))
    }

    /// Pick an entity directly by identifier
    ///
    /// Entities without a renderable or currently hidden count as empty space.
    pub fn pick_entity(&mut self, id: &str) -> Result<TraceOutcome, ViewerError> {
        let loaded = self.loaded_mut()?;
        let eligible = loaded.scene.registry.get(id).is_some_and(|object| object.visible);
        let picked = eligible.then_some(id);
        Ok(loaded.tracer.handle_pick(picked, &mut loaded.scene.registry, &mut loaded.materials))
    }

    /// Clear any route highlight
    pub fn clear_route(&mut self) -> Result<(), ViewerError> {
        let loaded = self.loaded_mut()?;
        loaded.tracer.clear(&mut loaded.scene.registry);
        Ok(())
    }

    /// Active route, if any
    pub fn route_info(&self) -> Option<&RouteInfo> {
        self.loaded().and_then(|loaded| loaded.tracer.info())
    }

    /// Summary numbers
    pub fn stats(&self) -> Result<ViewerStats, ViewerError> {
        let loaded = self.loaded().ok_or(ViewerError::NotReady)?;
        Ok(ViewerStats {
            renderables: loaded.scene.registry.len(),
            visible: loaded.scene.registry.visible_count(),
            skipped: loaded.scene.skipped,
            materials: loaded.materials.len(),
            max_height: loaded.scene.max_height,
        })
    }

    /// Advance one frame; returns whether a frame was submitted
    ///
    /// Polls a pending fetch first. Nothing is drawn until a scene is ready.
    pub fn tick(&mut self, dt: f32, backend: &mut dyn RenderBackend) -> bool {
        if let Err(err) = self.poll() {
            log::error!("Scene load failed: {}", err);
        }

        let ViewerPhase::Ready(loaded) = &mut self.phase else {
            return false;
        };
        loaded.camera.update(dt);
        let frame = FrameDescriptor::build(&loaded.scene.registry, loaded.camera.camera());
        backend.submit(&frame);
        true
    }

    /// Release scene resources
    pub fn shutdown(&mut self) {
        if let ViewerPhase::Ready(loaded) = &mut self.phase {
            loaded.tracer.clear(&mut loaded.scene.registry);
            loaded.materials.dispose_all();
        }
        self.pending = None;
        log::info!("Viewer shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessBackend;
    use std::time::{Duration, Instant};

    const DOC: &str = r#"{
        "metadata": { "spec_version": "1", "generated_at": "now" },
        "entities": [
            { "id": "tower", "type": "building", "position": {"x":0,"y":0,"z":0},
              "dimensions": {"x":40,"y":60,"z":40}, "rotation": [0,0,0,1],
              "material": "concrete", "layer": "surface" },
            { "id": "main-1", "type": "pipe", "position": {"x":100,"y":-8,"z":0},
              "dimensions": {"x":1,"y":1,"z":30}, "rotation": [0,0,0,1],
              "material": "steel", "layer": "underground_1", "system": "water",
              "metadata": {"network": "water", "connected_to": ["main-2"]} },
            { "id": "main-2", "type": "pipe", "position": {"x":100,"y":-8,"z":30},
              "dimensions": {"x":1,"y":1,"z":30}, "rotation": [0,0,0,1],
              "material": "steel", "layer": "underground_1", "system": "water",
              "metadata": {"network": "water", "connected_to": []} }
        ],
        "groups": {
            "pods": {},
            "systems": {"water": ["main-1", "main-2"]},
            "layers": {"surface": ["tower"], "underground_1": ["main-1", "main-2"]},
            "entity_types": {"building": ["tower"], "pipe": ["main-1", "main-2"]}
        }
    }"#;

    fn ready_viewer() -> CityViewer {
        let mut viewer = CityViewer::new(ViewerConfig::default());
        viewer.on_loaded(&SceneDocument::from_json(DOC).unwrap());
        viewer
    }

    struct Failing;

    impl SceneSource for Failing {
        fn fetch(&self) -> Result<SceneDocument, LoadError> {
            Err(LoadError::Status(500))
        }

        fn describe(&self) -> String {
            "failing".to_string()
        }
    }

    #[test]
    fn test_operations_before_load_are_rejected() {
        let mut viewer = CityViewer::new(ViewerConfig::default());
        assert!(matches!(viewer.set_layer("surface", true), Err(ViewerError::NotReady)));
        assert!(matches!(viewer.pick_entity("tower"), Err(ViewerError::NotReady)));
        assert!(matches!(viewer.click(10.0, 10.0, false), Err(ViewerError::NotReady)));

        let mut backend = HeadlessBackend::new();
        assert!(!viewer.tick(0.016, &mut backend));
        assert_eq!(backend.stats().frames, 0);
    }

    #[test]
    fn test_failed_load_is_terminal() {
        let mut viewer = CityViewer::new(ViewerConfig::default());
        viewer.begin_load(Box::new(Failing));

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut result = viewer.poll();
        while matches!(result, Ok(false)) && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
            result = viewer.poll();
        }

        assert!(matches!(result, Err(ViewerError::Load(LoadError::Status(500)))));
        assert_eq!(viewer.failure(), Some("generator returned HTTP 500"));
        assert!(matches!(viewer.poll(), Ok(false)));
        assert!(!viewer.is_ready());
    }

    #[test]
    fn test_default_visibility_and_toggles() {
        let mut viewer = ready_viewer();
        assert_eq!(viewer.stats().unwrap().visible, 1);

        assert_eq!(viewer.set_layer("underground_1", true).unwrap(), 3);
        assert_eq!(viewer.set_system("water", false).unwrap(), 1);
    }

    #[test]
    fn test_hidden_entities_are_not_pickable() {
        let mut viewer = ready_viewer();
        assert_eq!(viewer.pick_entity("main-1").unwrap(), TraceOutcome::Cleared);

        viewer.set_layer("underground_1", true).unwrap();
        let TraceOutcome::Highlighted(info) = viewer.pick_entity("main-1").unwrap() else {
            panic!("expected a highlight");
        };
        assert_eq!(info.count, 2);
        assert_eq!(viewer.route_info().unwrap().display_text(), "water network: 2 segments");

        viewer.clear_route().unwrap();
        assert!(viewer.route_info().is_none());
    }

    #[test]
    fn test_click_through_camera() {
        let mut viewer = ready_viewer();
        let config = viewer.config().viewport;

        // Nothing with connectivity sits under the centre of the framed scene
        #[allow(clippy::cast_precision_loss)]
        let (cx, cy) = (config.width as f32 / 2.0, config.height as f32 / 2.0);
        assert_eq!(viewer.click(cx, cy, false).unwrap(), Some(TraceOutcome::Cleared));

        // Picks over UI never reach the tracer
        viewer.set_layer("underground_1", true).unwrap();
        viewer.pick_entity("main-1").unwrap();
        assert_eq!(viewer.click(cx, cy, true).unwrap(), None);
        assert!(viewer.route_info().is_some());

        // A click that misses the pipes clears the route
        assert_eq!(viewer.click(cx, 0.0, false).unwrap(), Some(TraceOutcome::Cleared));
        assert!(viewer.route_info().is_none());
    }

    #[test]
    fn test_tick_submits_when_ready_and_shutdown_disposes() {
        let mut viewer = ready_viewer();
        let mut backend = HeadlessBackend::new();
        assert!(viewer.tick(0.016, &mut backend));
        assert_eq!(backend.stats().draw_count, 1);

        viewer.shutdown();
        assert_eq!(viewer.stats().unwrap().materials, 0);
    }
}
