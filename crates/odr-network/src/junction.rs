//! Junctions, their connections, and the top-level controller and
//! junction-group records that reference them.

use odr_core::{ElementId, Extensions, LaneId};

use crate::link::ContactPoint;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum JunctionType {
    #[default]
    Default,
    /// Junction inside an otherwise continuous road (e.g. a driveway).
    Virtual,
    /// Roads connected without connecting roads (e.g. lane splits).
    Direct,
}

/// One `<laneLink>`: lane `from` of the incoming road continues into lane
/// `to` of the connecting road.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneLinkPair {
    pub from: LaneId,
    pub to:   LaneId,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Connection {
    pub id:              ElementId,
    pub incoming_road:   ElementId,
    /// Connecting road, or the linked road for a direct junction.
    pub connecting_road: ElementId,
    /// End of the connecting road that touches the incoming road.
    pub contact_point:   Option<ContactPoint>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub lane_links:      Vec<LaneLinkPair>,
}

impl Connection {
    pub fn new(
        id:              impl Into<ElementId>,
        incoming_road:   impl Into<ElementId>,
        connecting_road: impl Into<ElementId>,
        contact_point:   ContactPoint,
    ) -> Self {
        Self {
            id:              id.into(),
            incoming_road:   incoming_road.into(),
            connecting_road: connecting_road.into(),
            contact_point:   Some(contact_point),
            lane_links:      Vec::new(),
        }
    }

    pub fn with_lane_link(mut self, from: i32, to: i32) -> Self {
        self.lane_links.push(LaneLinkPair { from: LaneId(from), to: LaneId(to) });
        self
    }
}

/// Right of way between two incoming roads.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Priority {
    pub high: ElementId,
    pub low:  ElementId,
}

/// A junction's reference to a top-level [`Controller`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControllerRef {
    pub id:       ElementId,
    pub kind:     Option<String>,
    pub sequence: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Junction {
    pub id:          ElementId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name:        Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind:        JunctionType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub connections: Vec<Connection>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub priorities:  Vec<Priority>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub controllers: Vec<ControllerRef>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub extensions:  Extensions,
}

impl Junction {
    pub fn new(id: impl Into<ElementId>, connections: Vec<Connection>) -> Self {
        Self {
            id: id.into(),
            name: None,
            kind: JunctionType::Default,
            connections,
            priorities: Vec::new(),
            controllers: Vec::new(),
            extensions: Extensions::new(),
        }
    }

    /// Connections entered from `road`.
    pub fn connections_from<'a>(&'a self, road: &'a ElementId) -> impl Iterator<Item = &'a Connection> {
        self.connections.iter().filter(move |c| &c.incoming_road == road)
    }
}

// ── Controllers and junction groups ───────────────────────────────────────────

/// One controlled signal of a [`Controller`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Control {
    pub signal_id: ElementId,
    pub kind:      Option<String>,
}

/// Groups signals that switch together.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Controller {
    pub id:       ElementId,
    pub name:     Option<String>,
    pub sequence: Option<u32>,
    pub controls: Vec<Control>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum JunctionGroupType {
    Roundabout,
    #[default]
    Unknown,
}

/// Junctions forming one larger structure, e.g. a roundabout.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JunctionGroup {
    pub id:        ElementId,
    pub name:      Option<String>,
    pub kind:      JunctionGroupType,
    pub junctions: Vec<ElementId>,
}
