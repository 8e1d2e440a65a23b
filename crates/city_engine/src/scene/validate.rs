//! Structural diagnostics for scene documents
//!
//! Reports problems a generator should not emit. The viewer logs the report
//! and loads the document anyway.

use std::collections::{HashMap, HashSet};
use std::fmt;

use super::document::{GroupIndex, SceneDocument};

/// Tolerance applied to the city bounds enclosure check
pub const BOUNDS_TOLERANCE: f32 = 1.0;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Structural inconsistency
    Error,
    /// Suspicious but renderable
    Warning,
}

/// One diagnostic
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    /// Severity
    pub severity: Severity,
    /// Location in the document, e.g. `groups.layers.surface`
    pub path: String,
    /// Human-readable description
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{label} at {}: {}", self.path, self.message)
    }
}

/// All diagnostics for one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    /// Errors and warnings in discovery order
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(Issue { severity: Severity::Error, path: path.into(), message: message.into() });
    }

    fn warning(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(Issue { severity: Severity::Warning, path: path.into(), message: message.into() });
    }

    /// Error diagnostics
    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|issue| issue.severity == Severity::Error)
    }

    /// Warning diagnostics
    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|issue| issue.severity == Severity::Warning)
    }

    /// True when there are no errors
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    /// Log a one-line summary plus each issue at debug level
    pub fn log_summary(&self) {
        let errors = self.errors().count();
        let warnings = self.warnings().count();
        if errors == 0 && warnings == 0 {
            log::info!("Scene document passed validation");
            return;
        }
        log::warn!("Scene document validation: {} errors, {} warnings", errors, warnings);
        for issue in &self.issues {
            log::debug!("{}", issue);
        }
    }
}

/// Check a document for structural problems
pub fn validate_document(document: &SceneDocument) -> ValidationReport {
    let mut report = ValidationReport::default();
    check_ids(document, &mut report);
    check_group_references(document, &mut report);
    check_group_membership(document, &mut report);
    check_bounds_enclosure(document, &mut report);
    check_dimensions(document, &mut report);
    report
}

fn check_ids(document: &SceneDocument, report: &mut ValidationReport) {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (index, entity) in document.entities.iter().enumerate() {
        if entity.id.is_empty() {
            report.error(format!("entities[{index}].id"), format!("entity at index {index} has empty id"));
            continue;
        }
        if let Some(previous) = seen.insert(&entity.id, index) {
            report.error(
                format!("entities[{index}].id"),
                format!("duplicate entity id '{}' at indices {previous} and {index}", entity.id),
            );
        }
    }
}

fn group_indices(document: &SceneDocument) -> [(&'static str, &GroupIndex); 4] {
    let groups = &document.groups;
    [
        ("pods", &groups.pods),
        ("systems", &groups.systems),
        ("layers", &groups.layers),
        ("entity_types", &groups.entity_types),
    ]
}

fn check_group_references(document: &SceneDocument, report: &mut ValidationReport) {
    let ids: HashSet<&str> = document.entities.iter().map(|e| e.id.as_str()).collect();
    for (kind, index) in group_indices(document) {
        for (name, members) in index {
            for member in members.iter().filter(|member| !ids.contains(member.as_str())) {
                report.error(
                    format!("groups.{kind}.{name}"),
                    format!("group references unknown entity '{member}'"),
                );
            }
        }
    }
}

fn check_group_membership(document: &SceneDocument, report: &mut ValidationReport) {
    let groups = &document.groups;
    let mut check = |kind: &str, index: &GroupIndex, id: &str, name: &str| match index.get(name) {
        Some(members) if members.iter().any(|member| member == id) => {}
        Some(_) => report.error(
            format!("groups.{kind}.{name}"),
            format!("entity '{id}' declares {kind} '{name}' but is not a member"),
        ),
        None => report.error(
            format!("groups.{kind}"),
            format!("entity '{id}' declares {kind} '{name}' but no such group exists"),
        ),
    };

    for entity in document.entities.iter().filter(|e| !e.id.is_empty()) {
        if !entity.layer.is_empty() {
            check("layers", &groups.layers, &entity.id, &entity.layer);
        }
        if !entity.entity_type.is_empty() {
            check("entity_types", &groups.entity_types, &entity.id, &entity.entity_type);
        }
        if let Some(system) = entity.system.as_deref().filter(|s| !s.is_empty()) {
            check("systems", &groups.systems, &entity.id, system);
        }
        if let Some(pod) = entity.pod.as_deref().filter(|p| !p.is_empty()) {
            check("pods", &groups.pods, &entity.id, pod);
        }
    }
}

fn check_bounds_enclosure(document: &SceneDocument, report: &mut ValidationReport) {
    let Some(bounds) = document.metadata.city_bounds else {
        return;
    };

    // Only the first offender is reported
    for entity in &document.entities {
        let half_x = entity.dimensions.x / 2.0;
        let half_z = entity.dimensions.z / 2.0;
        let (lo_x, hi_x) = (entity.position.x - half_x, entity.position.x + half_x);
        let (lo_z, hi_z) = (entity.position.z - half_z, entity.position.z + half_z);

        if lo_x < bounds.min.x - BOUNDS_TOLERANCE || hi_x > bounds.max.x + BOUNDS_TOLERANCE {
            report.warning(
                "metadata.city_bounds",
                format!(
                    "entity '{}' X extent [{lo_x:.1}, {hi_x:.1}] outside city bounds [{:.1}, {:.1}]",
                    entity.id, bounds.min.x, bounds.max.x
                ),
            );
            break;
        }
        if lo_z < bounds.min.z - BOUNDS_TOLERANCE || hi_z > bounds.max.z + BOUNDS_TOLERANCE {
            report.warning(
                "metadata.city_bounds",
                format!(
                    "entity '{}' Z extent [{lo_z:.1}, {hi_z:.1}] outside city bounds [{:.1}, {:.1}]",
                    entity.id, bounds.min.z, bounds.max.z
                ),
            );
            break;
        }
    }
}

fn check_dimensions(document: &SceneDocument, report: &mut ValidationReport) {
    for entity in &document.entities {
        let d = entity.dimensions;
        if d.x <= 0.0 || d.y <= 0.0 || d.z <= 0.0 {
            report.warning(
                format!("entities.{}.dimensions", entity.id),
                format!("entity '{}' has zero or negative dimension ({:.2}, {:.2}, {:.2})", entity.id, d.x, d.y, d.z),
            );
        }
    }
}
