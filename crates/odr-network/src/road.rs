//! The road record: reference line, profiles, lanes, links and the
//! road-level record arrays that sit beside them.

use odr_core::{ElementId, Extensions, Positive, ValidationConfig, ValidationError};
use odr_geometry::{ElevationProfile, LateralProfile, PlanView};
use odr_lanes::RoadLanes;

use crate::link::RoadLinks;
use crate::object::RoadObject;

// ── Road-level records ────────────────────────────────────────────────────────

/// Driving side.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum TrafficRule {
    /// Right-hand traffic.
    #[default]
    Rht,
    /// Left-hand traffic.
    Lht,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum RoadKind {
    #[default]
    Unknown,
    Rural,
    Motorway,
    Town,
    LowSpeed,
    Pedestrian,
    Bicycle,
    TownExpressway,
    TownCollector,
    TownArterial,
    TownPrivate,
    TownLocal,
    TownPlayStreet,
}

/// `<type>` record: road classification from `s`, with an optional speed
/// limit already converted to m/s.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadType {
    pub s:         f64,
    pub kind:      RoadKind,
    pub country:   Option<String>,
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "odr_core::units::de::opt_speed"))]
    pub speed_mps: Option<f64>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SignalOrientation {
    /// Valid for traffic in +s direction.
    #[default]
    Plus,
    /// Valid for traffic in −s direction.
    Minus,
    Both,
}

/// Placement of a signal along a road.  Only its position is modelled; the
/// type strings are carried for consumers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Signal {
    pub id:          ElementId,
    pub name:        Option<String>,
    pub s:           f64,
    pub t:           f64,
    pub z_offset:    f64,
    /// Heading offset relative to the orientation direction, radians.
    pub h_offset:    f64,
    pub orientation: SignalOrientation,
    pub dynamic:     bool,
    pub kind:        String,
    pub subtype:     String,
    pub value:       Option<f64>,
}

impl Signal {
    pub fn new(id: impl Into<ElementId>, s: f64, t: f64) -> Self {
        Self {
            id: id.into(),
            name: None,
            s,
            t,
            z_offset: 0.0,
            h_offset: 0.0,
            orientation: SignalOrientation::Plus,
            dynamic: false,
            kind: String::new(),
            subtype: String::new(),
            value: None,
        }
    }
}

// ── Road ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Road {
    pub id:         ElementId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name:       Option<String>,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "odr_core::units::de::length"))]
    pub length:     f64,
    /// Junction this road belongs to; `None` or the `-1` sentinel for
    /// ordinary roads.
    #[cfg_attr(feature = "serde", serde(default))]
    pub junction:   Option<ElementId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rule:       TrafficRule,
    #[cfg_attr(feature = "serde", serde(default))]
    pub link:       RoadLinks,
    pub plan_view:  PlanView,
    #[cfg_attr(feature = "serde", serde(default))]
    pub elevation:  ElevationProfile,
    #[cfg_attr(feature = "serde", serde(default))]
    pub lateral:    LateralProfile,
    pub lanes:      RoadLanes,
    #[cfg_attr(feature = "serde", serde(default))]
    pub types:      Vec<RoadType>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub signals:    Vec<Signal>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub objects:    Vec<RoadObject>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub extensions: Extensions,
}

impl Road {
    pub fn new(id: impl Into<ElementId>, length: f64, plan_view: PlanView, lanes: RoadLanes) -> Self {
        Self {
            id: id.into(),
            name: None,
            length,
            junction: None,
            rule: TrafficRule::default(),
            link: RoadLinks::default(),
            plan_view,
            elevation: ElevationProfile::default(),
            lateral: LateralProfile::default(),
            lanes,
            types: Vec::new(),
            signals: Vec::new(),
            objects: Vec::new(),
            extensions: Extensions::new(),
        }
    }

    pub fn with_links(mut self, link: RoadLinks) -> Self {
        self.link = link;
        self
    }

    pub fn with_junction(mut self, junction: impl Into<ElementId>) -> Self {
        self.junction = Some(junction.into());
        self
    }

    /// The owning junction, with the sentinel treated as none.
    pub fn junction_id(&self) -> Option<&ElementId> {
        self.junction.as_ref().filter(|j| !j.is_none_sentinel())
    }

    pub fn signal(&self, id: &str) -> Option<&Signal> {
        self.signals.iter().find(|sig| sig.id.as_str() == id)
    }

    pub fn object(&self, id: &str) -> Option<&RoadObject> {
        self.objects.iter().find(|obj| obj.id.as_str() == id)
    }

    /// Road-type speed limit in m/s in effect at `s`.
    pub fn type_speed_at(&self, s: f64) -> Option<f64> {
        let idx = self.types.partition_point(|t| t.s <= s).checked_sub(1)?;
        self.types[idx].speed_mps
    }

    /// Every check that needs only this road.
    pub fn check(&self, cfg: &ValidationConfig) -> Vec<ValidationError> {
        let mut out = Vec::new();
        let id = &self.id;

        if Positive::new(self.length).is_err() {
            out.push(ValidationError::NonPositiveLength {
                entity: format!("road {id}"),
                what:   "length",
                value:  self.length,
            });
        }

        self.plan_view.check(id, self.length, cfg, &mut out);
        self.elevation.check(id, &mut out);
        self.lateral.check(id, &mut out);
        self.lanes.check(id, self.length, cfg, &mut out);

        if let Some(i) = self.types.windows(2).position(|w| w[1].s < w[0].s) {
            out.push(ValidationError::RecordOrder {
                entity: format!("road {id}"),
                what:   "type",
                index:  i + 1,
            });
        }

        let slack = cfg.length_tolerance(self.length);
        for signal in &self.signals {
            if !(signal.s >= -slack && signal.s <= self.length + slack) {
                out.push(ValidationError::OutsideRoad {
                    entity: format!("road {id} signal {}", signal.id),
                    what:   "signal",
                    s:      signal.s,
                    length: self.length,
                });
            }
        }
        for object in &self.objects {
            object.check(id, self.length, cfg, &mut out);
        }
        out
    }
}
