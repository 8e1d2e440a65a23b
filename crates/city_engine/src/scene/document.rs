//! Scene document wire format
//!
//! Mirrors the JSON document served by the generator at `GET /scene`. Field
//! names are the wire names and must stay interoperable with existing
//! generators. Optional fields accept both absence and `null`.

use serde::{Serialize, Deserialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::foundation::math::{Quat, Vec3, quat_from_xyzw};

/// Metadata key holding outgoing connectivity edges
pub const CONNECTED_TO_KEY: &str = "connected_to";

/// Metadata key holding the connectivity network tag
pub const NETWORK_KEY: &str = "network";

/// Versioned scene graph produced by the generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Document-level information
    pub metadata: DocumentMetadata,
    /// Entities in document order
    #[serde(default)]
    pub entities: Vec<EntityRecord>,
    /// Membership indices by pod, system, layer and entity type
    #[serde(default)]
    pub groups: Groups,
}

impl SceneDocument {
    /// Parse a document from its JSON text
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Parse a document from JSON bytes
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// Document-level information
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Version of the document format
    #[serde(default)]
    pub spec_version: String,
    /// Generation timestamp as emitted by the generator
    #[serde(default)]
    pub generated_at: String,
    /// Optional axis-aligned city extent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_bounds: Option<WireBounds>,
}

/// Plain `{x, y, z}` wire vector
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WireVec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl WireVec3 {
    /// Create a wire vector
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Convert to the math vector type
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// Axis-aligned bounds as sent on the wire
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WireBounds {
    /// Minimum corner
    pub min: WireVec3,
    /// Maximum corner
    pub max: WireVec3,
}

/// One placed entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Identifier, unique within a document
    pub id: String,
    /// Type tag (open enum, see [`super::EntityKind`])
    #[serde(rename = "type")]
    pub entity_type: String,
    /// World-space position; `y` is the entity's base
    pub position: WireVec3,
    /// Extents along each axis
    pub dimensions: WireVec3,
    /// Rotation quaternion as `[x, y, z, w]`
    #[serde(default = "identity_rotation")]
    pub rotation: [f32; 4],
    /// Material name
    #[serde(default)]
    pub material: String,
    /// Infrastructure system tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Pod tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod: Option<String>,
    /// Vertical layer tag
    pub layer: String,
    /// Free-form metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<EntityMetadata>,
    /// Declared child identifiers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<String>>,
}

fn identity_rotation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

impl EntityRecord {
    /// Rotation as a quaternion, taken verbatim
    pub fn rotation_quat(&self) -> Quat {
        quat_from_xyzw(self.rotation)
    }
}

/// Open per-entity metadata
///
/// Only `connected_to` and `network` carry meaning for the viewer, and only
/// for route tracing. Everything else is kept as-is.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityMetadata(pub Map<String, Value>);

impl EntityMetadata {
    /// Outgoing connectivity edges, if a `connected_to` list is present
    ///
    /// `null` or a non-array value counts as absent. Non-string items are skipped.
    pub fn connected_to(&self) -> Option<Vec<&str>> {
        match self.0.get(CONNECTED_TO_KEY)? {
            Value::Array(items) => Some(items.iter().filter_map(Value::as_str).collect()),
            _ => None,
        }
    }

    /// Whether a `connected_to` list is present
    pub fn has_connections(&self) -> bool {
        matches!(self.0.get(CONNECTED_TO_KEY), Some(Value::Array(_)))
    }

    /// Network tag, if present and a string
    pub fn network(&self) -> Option<&str> {
        self.0.get(NETWORK_KEY).and_then(Value::as_str)
    }

    /// Look up an arbitrary metadata value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// Group name → member identifiers
pub type GroupIndex = BTreeMap<String, Vec<String>>;

/// Membership indices; membership, not ownership
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Groups {
    /// Pod name → members
    #[serde(default, deserialize_with = "nullable_index")]
    pub pods: GroupIndex,
    /// System name → members
    #[serde(default, deserialize_with = "nullable_index")]
    pub systems: GroupIndex,
    /// Layer name → members
    #[serde(default, deserialize_with = "nullable_index")]
    pub layers: GroupIndex,
    /// Entity type → members
    #[serde(default, deserialize_with = "nullable_index")]
    pub entity_types: GroupIndex,
}

fn nullable_index<'de, D>(deserializer: D) -> Result<GroupIndex, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Option<Vec<String>>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(name, members)| (name, members.unwrap_or_default()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "metadata": {
            "spec_version": "0.1.0",
            "generated_at": "2026-01-01T00:00:00Z",
            "city_bounds": { "min": {"x": -900, "y": -8, "z": -900}, "max": {"x": 900, "y": 120, "z": 900} }
        },
        "entities": [
            {
                "id": "seg-1", "type": "pipe",
                "position": {"x": 1, "y": -7, "z": 2},
                "dimensions": {"x": 0.5, "y": 0.5, "z": 10},
                "rotation": [0, 0, 0, 1],
                "material": "steel", "system": "water", "layer": "underground_1",
                "metadata": { "network": "water", "connected_to": ["seg-2"], "capacity": 12.5, "is_trunk": true }
            },
            {
                "id": "seg-2", "type": "pipe",
                "position": {"x": 1, "y": -7, "z": 12},
                "dimensions": {"x": 0.5, "y": 0.5, "z": 10},
                "rotation": [0, 0, 0, 1],
                "material": "steel", "system": "water", "layer": "underground_1",
                "metadata": { "network": "water", "connected_to": null }
            }
        ],
        "groups": {
            "pods": {},
            "systems": { "water": ["seg-1", "seg-2"] },
            "layers": { "underground_1": ["seg-1", "seg-2"] },
            "entity_types": { "pipe": ["seg-1", "seg-2"] }
        }
    }"#;

    #[test]
    fn test_parse_sample_document() {
        let doc = SceneDocument::from_json(SAMPLE).unwrap();
        assert_eq!(doc.metadata.spec_version, "0.1.0");
        assert_eq!(doc.entities.len(), 2);
        assert_eq!(doc.entities[0].entity_type, "pipe");
        assert_eq!(doc.entities[0].system.as_deref(), Some("water"));
        assert!(doc.entities[0].pod.is_none());
        assert_eq!(doc.groups.systems["water"].len(), 2);

        let bounds = doc.metadata.city_bounds.unwrap();
        assert!((bounds.max.y - 120.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_metadata_accessors() {
        let doc = SceneDocument::from_json(SAMPLE).unwrap();
        let first = doc.entities[0].metadata.as_ref().unwrap();
        assert_eq!(first.network(), Some("water"));
        assert_eq!(first.connected_to(), Some(vec!["seg-2"]));
        assert_eq!(first.get("capacity").and_then(Value::as_f64), Some(12.5));

        // A null list is treated as absent
        let second = doc.entities[1].metadata.as_ref().unwrap();
        assert!(second.connected_to().is_none());
        assert!(!second.has_connections());
    }

    #[test]
    fn test_optional_fields_and_null_groups() {
        let doc = SceneDocument::from_json(
            r#"{
                "metadata": { "spec_version": "1", "generated_at": "now" },
                "entities": [
                    { "id": "b", "type": "building", "position": {"x":0,"y":0,"z":0},
                      "dimensions": {"x":10,"y":30,"z":10}, "rotation": [0,0,0,1],
                      "material": "concrete", "layer": "surface", "pod": null }
                ],
                "groups": { "pods": null, "systems": {"water": null}, "layers": {"surface": ["b"]}, "entity_types": {} }
            }"#,
        )
        .unwrap();
        assert!(doc.metadata.city_bounds.is_none());
        assert!(doc.entities[0].metadata.is_none());
        assert!(doc.entities[0].children.is_none());
        assert!(doc.groups.pods.is_empty());
        assert!(doc.groups.systems["water"].is_empty());
    }

    #[test]
    fn test_malformed_document_is_rejected() {
        assert!(SceneDocument::from_json(r#"{"entities": []}"#).is_err());
        assert!(SceneDocument::from_json("not json").is_err());
    }

    #[test]
    fn test_serialize_keeps_wire_names() {
        let doc = SceneDocument::from_json(SAMPLE).unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["entities"][0]["type"], "pipe");
        assert_eq!(value["entities"][0]["rotation"].as_array().unwrap().len(), 4);
        assert!(value["groups"]["entity_types"].is_object());
    }
}
