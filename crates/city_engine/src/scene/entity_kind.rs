//! Recognised entity types and their render primitives

use std::fmt;

/// Unit-size shape a renderable is built from, scaled by the entity's dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Unit cube centred on the origin
    Box,
    /// Unit-diameter, unit-height cylinder along Y centred on the origin
    Cylinder,
}

/// Entity types the viewer knows how to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum EntityKind {
    Building,
    Pipe,
    Lane,
    Path,
    Panel,
    Park,
    Pedway,
    BikeTunnel,
    Battery,
    BikePath,
    ShuttleRoute,
    Station,
    SportsField,
    Plaza,
    Tree,
}

impl EntityKind {
    /// Every recognised kind
    pub const ALL: [Self; 15] = [
        Self::Building,
        Self::Pipe,
        Self::Lane,
        Self::Path,
        Self::Panel,
        Self::Park,
        Self::Pedway,
        Self::BikeTunnel,
        Self::Battery,
        Self::BikePath,
        Self::ShuttleRoute,
        Self::Station,
        Self::SportsField,
        Self::Plaza,
        Self::Tree,
    ];

    /// Parse a wire type tag; unrecognised tags yield `None`
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }

    /// Wire type tag
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Building => "building",
            Self::Pipe => "pipe",
            Self::Lane => "lane",
            Self::Path => "path",
            Self::Panel => "panel",
            Self::Park => "park",
            Self::Pedway => "pedway",
            Self::BikeTunnel => "bike_tunnel",
            Self::Battery => "battery",
            Self::BikePath => "bike_path",
            Self::ShuttleRoute => "shuttle_route",
            Self::Station => "station",
            Self::SportsField => "sports_field",
            Self::Plaza => "plaza",
            Self::Tree => "tree",
        }
    }

    /// Primitive used to render this kind
    pub const fn primitive(self) -> Primitive {
        match self {
            Self::Tree | Self::Battery => Primitive::Cylinder,
            _ => Primitive::Box,
        }
    }

    /// Whether this kind takes part in height grading
    pub const fn is_building(self) -> bool {
        matches!(self, Self::Building)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
