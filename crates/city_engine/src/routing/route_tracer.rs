//! Route tracer
//!
//! Breadth-first traversal over the `connected_to` edges in entity metadata,
//! restricted to the clicked entity's `network` tag, plus the idle/highlighted
//! state machine that swaps materials on the resulting component.
//!
//! Edges are directed as declared. Traversal runs over all metadata,
//! regardless of visibility.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use crate::materials::{MaterialContext, MaterialHandle};
use crate::scene::EntityRegistry;

/// Label shown when the root carries no network tag
pub const UNKNOWN_NETWORK: &str = "unknown";

/// Summary of the active highlight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    /// Root entity of the trace
    pub root: String,
    /// Network tag of the root, if any
    pub network: Option<String>,
    /// Number of entities in the filtered component
    pub count: usize,
}

impl RouteInfo {
    /// Text for the informational display
    pub fn display_text(&self) -> String {
        format!("{} network: {} segments", self.network.as_deref().unwrap_or(UNKNOWN_NETWORK), self.count)
    }
}

impl fmt::Display for RouteInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text())
    }
}

/// What a pick did to the tracer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceOutcome {
    /// No highlight is active after the pick
    Cleared,
    /// A new component is highlighted
    Highlighted(RouteInfo),
}

/// Connected component reachable from `root` within the root's network
///
/// Entities whose network differs from the root's are visited but neither
/// expanded nor reported. Identifiers without metadata are dead ends; they
/// are reported only when the root has no network tag.
pub fn trace_component(root: &str, registry: &EntityRegistry) -> Vec<String> {
    let root_network = registry.metadata(root).and_then(|m| m.network());

    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::from([root]);
    let mut component = Vec::new();

    while let Some(id) = queue.pop_front() {
        if !visited.insert(id) {
            continue;
        }

        let Some(metadata) = registry.metadata(id) else {
            if root_network.is_none() {
                component.push(id.to_string());
            } else {
                log::trace!("Route node '{}' has no metadata, excluded", id);
            }
            continue;
        };

        if root_network.is_some() && metadata.network() != root_network {
            continue;
        }
        component.push(id.to_string());

        for next in metadata.connected_to().unwrap_or_default() {
            if !visited.contains(next) {
                queue.push_back(next);
            }
        }
    }

    component
}

/// Idle/highlighted state machine over the registry's materials
#[derive(Debug, Default)]
pub struct RouteTracer {
    saved: HashMap<String, MaterialHandle>,
    info: Option<RouteInfo>,
}

impl RouteTracer {
    /// Create an idle tracer
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a highlight is active
    pub fn is_highlighted(&self) -> bool {
        self.info.is_some()
    }

    /// Active route summary
    pub fn info(&self) -> Option<&RouteInfo> {
        self.info.as_ref()
    }

    /// Entities currently carrying the highlight material
    pub fn highlighted_ids(&self) -> impl Iterator<Item = &str> {
        self.saved.keys().map(String::as_str)
    }

    /// Handle a resolved pick
    ///
    /// `picked` is the struck entity, or `None` for empty space. Any prior
    /// highlight is fully cleared first.
    pub fn handle_pick(
        &mut self,
        picked: Option<&str>,
        registry: &mut EntityRegistry,
        materials: &mut MaterialContext,
    ) -> TraceOutcome {
        self.clear(registry);

        let Some(root) = picked else {
            return TraceOutcome::Cleared;
        };
        let Some(metadata) = registry.metadata(root).filter(|m| m.has_connections()) else {
            log::debug!("Picked '{}' has no connectivity", root);
            return TraceOutcome::Cleared;
        };

        let network = metadata.network().map(str::to_string);
        let component = trace_component(root, registry);
        let highlight = materials.highlight();

        for id in &component {
            if let Some(original) = registry.set_material(id, highlight) {
                self.saved.insert(id.clone(), original);
            }
        }

        let info = RouteInfo { root: root.to_string(), network, count: component.len() };
        log::info!("Traced route from '{}': {}", root, info);
        self.info = Some(info.clone());
        TraceOutcome::Highlighted(info)
    }

    /// Restore every saved material exactly and return to idle
    pub fn clear(&mut self, registry: &mut EntityRegistry) {
        if self.saved.is_empty() && self.info.is_none() {
            return;
        }
        for (id, original) in self.saved.drain() {
            registry.set_material(&id, original);
        }
        self.info = None;
        log::debug!("Route highlight cleared");
    }
}
