//! A single lane and its per-lane record arrays.
//!
//! Every record array on a [`Lane`] is keyed by `s_offset`, the distance
//! from the start of the owning lane section, and is kept in authored
//! order.  Validation reports arrays that are not ascending.

use std::fmt;
use std::str::FromStr;

use odr_core::poly::{eval_records, record_index};
use odr_core::{LaneId, PolyRecord};

// ── LaneType ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum LaneType {
    #[default]
    None,
    Driving,
    Stop,
    Shoulder,
    Biking,
    Sidewalk,
    Border,
    Restricted,
    Parking,
    Bidirectional,
    Median,
    Curb,
    Entry,
    Exit,
    OnRamp,
    OffRamp,
    ConnectingRamp,
    Tram,
    Rail,
}

impl LaneType {
    pub fn as_str(self) -> &'static str {
        match self {
            LaneType::None           => "none",
            LaneType::Driving        => "driving",
            LaneType::Stop           => "stop",
            LaneType::Shoulder       => "shoulder",
            LaneType::Biking         => "biking",
            LaneType::Sidewalk       => "sidewalk",
            LaneType::Border         => "border",
            LaneType::Restricted     => "restricted",
            LaneType::Parking        => "parking",
            LaneType::Bidirectional  => "bidirectional",
            LaneType::Median         => "median",
            LaneType::Curb           => "curb",
            LaneType::Entry          => "entry",
            LaneType::Exit           => "exit",
            LaneType::OnRamp         => "onRamp",
            LaneType::OffRamp        => "offRamp",
            LaneType::ConnectingRamp => "connectingRamp",
            LaneType::Tram           => "tram",
            LaneType::Rail           => "rail",
        }
    }

    /// `true` for lane types vehicles may drive in.
    pub fn is_drivable(self) -> bool {
        matches!(
            self,
            LaneType::Driving
                | LaneType::Bidirectional
                | LaneType::Entry
                | LaneType::Exit
                | LaneType::OnRamp
                | LaneType::OffRamp
                | LaneType::ConnectingRamp
        )
    }
}

impl fmt::Display for LaneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LaneType {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        const ALL: [LaneType; 19] = [
            LaneType::None,
            LaneType::Driving,
            LaneType::Stop,
            LaneType::Shoulder,
            LaneType::Biking,
            LaneType::Sidewalk,
            LaneType::Border,
            LaneType::Restricted,
            LaneType::Parking,
            LaneType::Bidirectional,
            LaneType::Median,
            LaneType::Curb,
            LaneType::Entry,
            LaneType::Exit,
            LaneType::OnRamp,
            LaneType::OffRamp,
            LaneType::ConnectingRamp,
            LaneType::Tram,
            LaneType::Rail,
        ];
        let raw = raw.trim();
        ALL.into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(raw))
            .ok_or_else(|| format!("unknown lane type {raw:?}"))
    }
}

// ── LaneOutline ───────────────────────────────────────────────────────────────

/// How a lane's lateral extent is described.
///
/// `Width` records give the lane width directly.  `Border` records give the
/// distance of the lane's outer boundary from the reference line (lane
/// offset excluded); the width is that distance minus the outer edge of the
/// inner neighbour.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum LaneOutline {
    /// No extent (the center lane, or a lane with no records).
    #[default]
    None,
    Width(Vec<PolyRecord>),
    Border(Vec<PolyRecord>),
}

impl LaneOutline {
    pub fn records(&self) -> &[PolyRecord] {
        match self {
            LaneOutline::None => &[],
            LaneOutline::Width(r) | LaneOutline::Border(r) => r,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            LaneOutline::None      => "none",
            LaneOutline::Width(_)  => "width",
            LaneOutline::Border(_) => "border",
        }
    }
}

// ── Road marks ────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RoadMarkType {
    #[default]
    None,
    Solid,
    Broken,
    SolidSolid,
    SolidBroken,
    BrokenSolid,
    BrokenBroken,
    BottsDots,
    Grass,
    Curb,
    Edge,
    Custom,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RoadMarkColor {
    #[default]
    Standard,
    White,
    Yellow,
    Blue,
    Green,
    Red,
    Orange,
}

/// Whether a lane change across the mark is permitted, and in which
/// direction (toward increasing or decreasing lane ids).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LaneChange {
    Increase,
    Decrease,
    #[default]
    Both,
    None,
}

/// One `<roadMark>` record on a lane's outer boundary.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadMark {
    pub s_offset:    f64,
    pub kind:        RoadMarkType,
    pub color:       RoadMarkColor,
    /// Mark width in metres, when given.
    pub width:       Option<f64>,
    pub lane_change: LaneChange,
}

// ── Speed / access / height / material / rule ─────────────────────────────────

/// Maximum speed from `s_offset`, already converted to m/s.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneSpeed {
    pub s_offset: f64,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "odr_core::units::de::speed"))]
    pub max_mps:  f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AccessRule {
    Allow,
    Deny,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneAccess {
    pub s_offset:    f64,
    pub rule:        AccessRule,
    /// Road-user class the rule applies to (e.g. `"bus"`, `"pedestrian"`).
    pub restriction: String,
}

/// Height of the lane surface above the road surface at its inner and outer
/// boundary, e.g. a raised sidewalk.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneHeight {
    pub s_offset: f64,
    pub inner:    f64,
    pub outer:    f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneMaterial {
    pub s_offset:  f64,
    pub surface:   Option<String>,
    pub friction:  f64,
    pub roughness: Option<f64>,
}

/// Free-text lane rule such as `"no stopping at any time"`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneRule {
    pub s_offset: f64,
    pub value:    String,
}

/// Index of the last item with `key <= s_offset`, or `None` if all start
/// later.
fn active<T>(items: &[T], s_offset: f64, key: impl Fn(&T) -> f64) -> Option<usize> {
    items.partition_point(|item| key(item) <= s_offset).checked_sub(1)
}

// ── Lane ──────────────────────────────────────────────────────────────────────

/// One lane of a lane section.
///
/// The outline is fixed by the constructor: when both width and border
/// records are supplied the width records win and the border records are
/// discarded.  The discard is remembered so validation can report it as an
/// advisory.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "LaneDef", into = "LaneDef"))]
pub struct Lane {
    pub id:          LaneId,
    pub lane_type:   LaneType,
    /// `true` keeps the lane horizontal: it ignores superelevation.
    pub level:       bool,
    outline:         LaneOutline,
    border_shadowed: bool,

    /// Lane id in the preceding section (or predecessor road).
    pub predecessor: Option<LaneId>,
    /// Lane id in the following section (or successor road).
    pub successor:   Option<LaneId>,

    pub road_marks: Vec<RoadMark>,
    pub speeds:     Vec<LaneSpeed>,
    pub access:     Vec<LaneAccess>,
    pub heights:    Vec<LaneHeight>,
    pub materials:  Vec<LaneMaterial>,
    pub rules:      Vec<LaneRule>,
}

impl Lane {
    pub fn new(id: impl Into<LaneId>, lane_type: LaneType) -> Self {
        Self {
            id: id.into(),
            lane_type,
            level: false,
            outline: LaneOutline::None,
            border_shadowed: false,
            predecessor: None,
            successor: None,
            road_marks: Vec::new(),
            speeds: Vec::new(),
            access: Vec::new(),
            heights: Vec::new(),
            materials: Vec::new(),
            rules: Vec::new(),
        }
    }

    /// The center lane (id 0, no extent).
    pub fn center() -> Self {
        Self::new(LaneId::CENTER, LaneType::None)
    }

    /// Set width records.  Replaces border records if any were set.
    pub fn with_width(mut self, records: Vec<PolyRecord>) -> Self {
        if records.is_empty() {
            return self;
        }
        if matches!(self.outline, LaneOutline::Border(_)) {
            self.border_shadowed = true;
        }
        self.outline = LaneOutline::Width(records);
        self
    }

    /// Set border records.  Ignored (and remembered) if width records are
    /// already set.
    pub fn with_border(mut self, records: Vec<PolyRecord>) -> Self {
        if records.is_empty() {
            return self;
        }
        if matches!(self.outline, LaneOutline::Width(_)) {
            self.border_shadowed = true;
        } else {
            self.outline = LaneOutline::Border(records);
        }
        self
    }

    pub fn with_links(mut self, predecessor: Option<LaneId>, successor: Option<LaneId>) -> Self {
        self.predecessor = predecessor;
        self.successor = successor;
        self
    }

    pub fn with_level(mut self, level: bool) -> Self {
        self.level = level;
        self
    }

    pub fn outline(&self) -> &LaneOutline {
        &self.outline
    }

    /// `true` if border records were supplied alongside width records and
    /// discarded.
    pub fn border_shadowed(&self) -> bool {
        self.border_shadowed
    }

    /// Forget the discarded-border note.  Used when a validated network
    /// hands its document back, so the advisory is reported once.
    pub fn acknowledge_border_shadowed(&mut self) {
        self.border_shadowed = false;
    }

    /// Width from width records at section-local `ds`.  `None` for border
    /// and empty outlines, whose width depends on neighbouring lanes.
    pub fn own_width(&self, ds: f64) -> Option<f64> {
        match &self.outline {
            LaneOutline::Width(records) => eval_records(records, ds),
            _ => None,
        }
    }

    /// Border distance at section-local `ds`, for border outlines.
    pub fn border(&self, ds: f64) -> Option<f64> {
        match &self.outline {
            LaneOutline::Border(records) => eval_records(records, ds),
            _ => None,
        }
    }

    /// Index into the outline records covering `ds`.
    pub fn outline_record(&self, ds: f64) -> Option<usize> {
        record_index(self.outline.records(), ds)
    }

    pub fn road_mark_at(&self, ds: f64) -> Option<&RoadMark> {
        active(&self.road_marks, ds, |m| m.s_offset).map(|i| &self.road_marks[i])
    }

    /// Speed limit in m/s at `ds`, if any record applies.
    pub fn speed_at(&self, ds: f64) -> Option<f64> {
        active(&self.speeds, ds, |r| r.s_offset).map(|i| self.speeds[i].max_mps)
    }

    /// Access records in effect at `ds`: the group sharing the greatest
    /// `s_offset <= ds`.
    pub fn access_at(&self, ds: f64) -> &[LaneAccess] {
        let Some(last) = active(&self.access, ds, |r| r.s_offset) else {
            return &[];
        };
        let at = self.access[last].s_offset;
        let first = self.access.partition_point(|r| r.s_offset < at);
        &self.access[first..=last]
    }

    /// `(inner, outer)` surface heights at `ds`; zero without records.
    pub fn height_at(&self, ds: f64) -> (f64, f64) {
        active(&self.heights, ds, |r| r.s_offset)
            .map_or((0.0, 0.0), |i| (self.heights[i].inner, self.heights[i].outer))
    }

    pub fn material_at(&self, ds: f64) -> Option<&LaneMaterial> {
        active(&self.materials, ds, |r| r.s_offset).map(|i| &self.materials[i])
    }

    /// `s_offset` sequences that must be ascending, with their names.
    pub(crate) fn offset_sequences(&self) -> [(&'static str, Vec<f64>); 6] {
        [
            ("roadMark", self.road_marks.iter().map(|r| r.s_offset).collect()),
            ("speed", self.speeds.iter().map(|r| r.s_offset).collect()),
            ("access", self.access.iter().map(|r| r.s_offset).collect()),
            ("height", self.heights.iter().map(|r| r.s_offset).collect()),
            ("material", self.materials.iter().map(|r| r.s_offset).collect()),
            ("rule", self.rules.iter().map(|r| r.s_offset).collect()),
        ]
    }
}

// ── Serialized form ───────────────────────────────────────────────────────────

/// Flat serialized form of a [`Lane`]: width and border records side by
/// side, as the source format carries them.  Converting into a `Lane`
/// applies the width-wins rule.
#[cfg(feature = "serde")]
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LaneDef {
    pub id:          LaneId,
    pub lane_type:   LaneType,
    pub level:       bool,
    pub width:       Vec<PolyRecord>,
    pub border:      Vec<PolyRecord>,
    pub predecessor: Option<LaneId>,
    pub successor:   Option<LaneId>,
    pub road_marks:  Vec<RoadMark>,
    pub speeds:      Vec<LaneSpeed>,
    pub access:      Vec<LaneAccess>,
    pub heights:     Vec<LaneHeight>,
    pub materials:   Vec<LaneMaterial>,
    pub rules:       Vec<LaneRule>,
}

#[cfg(feature = "serde")]
impl From<LaneDef> for Lane {
    fn from(def: LaneDef) -> Self {
        let mut lane = Lane::new(def.id, def.lane_type)
            .with_level(def.level)
            .with_width(def.width)
            .with_border(def.border)
            .with_links(def.predecessor, def.successor);
        lane.road_marks = def.road_marks;
        lane.speeds = def.speeds;
        lane.access = def.access;
        lane.heights = def.heights;
        lane.materials = def.materials;
        lane.rules = def.rules;
        lane
    }
}

#[cfg(feature = "serde")]
impl From<Lane> for LaneDef {
    fn from(lane: Lane) -> Self {
        let (width, border) = match lane.outline {
            LaneOutline::None => (Vec::new(), Vec::new()),
            LaneOutline::Width(r) => (r, Vec::new()),
            LaneOutline::Border(r) => (Vec::new(), r),
        };
        LaneDef {
            id: lane.id,
            lane_type: lane.lane_type,
            level: lane.level,
            width,
            border,
            predecessor: lane.predecessor,
            successor: lane.successor,
            road_marks: lane.road_marks,
            speeds: lane.speeds,
            access: lane.access,
            heights: lane.heights,
            materials: lane.materials,
            rules: lane.rules,
        }
    }
}
