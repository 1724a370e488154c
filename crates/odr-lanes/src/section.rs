//! Lane sections: the lanes valid over one s-interval of a road.
//!
//! # Lateral order
//!
//! Lanes are stored sorted by id, descending: the outermost left lane first,
//! then inward to the center lane (id 0), then outward through the right
//! lanes.  Iteration order is therefore the physical left-to-right order,
//! and a lane is found by binary search.
//!
//! # Edges
//!
//! Edge distances are magnitudes measured from the lane-offset-shifted
//! reference line.  Walking outward from the center, each lane adds its
//! width (width outline) or jumps to its border distance (border outline).

use odr_core::poly::{eval_records, is_sorted_by_start};
use odr_core::{ElementId, LaneId, Piecewise, ValidationError};

use crate::error::{LaneError, LaneResult};
use crate::lane::{Lane, LaneOutline};

/// Widths down to this far below zero are treated as rounding noise.
const NEGATIVE_WIDTH_EPS: f64 = 1e-9;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "SectionDef", into = "SectionDef"))]
pub struct LaneSection {
    /// Road s-coordinate at which the section starts.
    pub s:           f64,
    /// Lanes on only one side of the reference line.
    pub single_side: bool,
    lanes:           Vec<Lane>,
}

impl LaneSection {
    /// Build a section; lanes are sorted into lateral order.
    pub fn new(s: f64, mut lanes: Vec<Lane>) -> Self {
        lanes.sort_by(|a, b| b.id.cmp(&a.id));
        Self { s, single_side: false, lanes }
    }

    pub fn with_single_side(mut self, single_side: bool) -> Self {
        self.single_side = single_side;
        self
    }

    /// All lanes, left to right.
    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn lane(&self, id: LaneId) -> Option<&Lane> {
        self.lanes
            .binary_search_by(|l| id.cmp(&l.id))
            .ok()
            .map(|i| &self.lanes[i])
    }

    pub fn contains(&self, id: LaneId) -> bool {
        self.lane(id).is_some()
    }

    /// Left lanes from the center outward (1, 2, …).
    pub fn left(&self) -> impl Iterator<Item = &Lane> {
        self.lanes.iter().rev().filter(|l| l.id.is_left())
    }

    /// Right lanes from the center outward (−1, −2, …).
    pub fn right(&self) -> impl Iterator<Item = &Lane> {
        self.lanes.iter().filter(|l| l.id.is_right())
    }

    /// Clear per-lane load advisories; see [`Lane::acknowledge_border_shadowed`].
    pub fn acknowledge_advisories(&mut self) {
        for lane in &mut self.lanes {
            lane.acknowledge_border_shadowed();
        }
    }

    // ── Lateral evaluation ────────────────────────────────────────────────

    /// `(inner, outer)` edge magnitudes of lane `id` at section-local `ds`.
    pub fn edge_magnitudes(&self, id: LaneId, ds: f64) -> LaneResult<(f64, f64)> {
        if id.is_center() {
            return if self.contains(id) { Ok((0.0, 0.0)) } else { Err(LaneError::UnknownLane(id)) };
        }
        if !self.contains(id) {
            return Err(LaneError::UnknownLane(id));
        }
        let step = if id.is_left() { 1 } else { -1 };
        let (mut inner, mut outer) = (0.0, 0.0);
        let mut current = step;
        loop {
            let lane = self.lane(LaneId(current)).ok_or(LaneError::UnknownLane(LaneId(current)))?;
            inner = outer;
            outer = match lane.outline() {
                LaneOutline::Width(r) => inner + eval_records(r, ds).unwrap_or(0.0),
                LaneOutline::Border(r) => eval_records(r, ds).unwrap_or(inner),
                LaneOutline::None => inner,
            };
            if current == id.0 {
                return Ok((inner, outer));
            }
            current += step;
        }
    }

    /// Width of lane `id` at section-local `ds`.
    pub fn width(&self, id: LaneId, ds: f64) -> LaneResult<f64> {
        let (inner, outer) = self.edge_magnitudes(id, ds)?;
        Ok(outer - inner)
    }

    /// Signed `(inner, outer)` lateral t of lane `id`, relative to the
    /// lane-offset-shifted reference line (left positive).
    pub fn edges(&self, id: LaneId, ds: f64) -> LaneResult<(f64, f64)> {
        let (inner, outer) = self.edge_magnitudes(id, ds)?;
        let sign = if id.is_right() { -1.0 } else { 1.0 };
        Ok((sign * inner, sign * outer))
    }

    // ── Validation ────────────────────────────────────────────────────────

    /// Check lane ids, record order and widths of this section, which ends
    /// at road s `end_s`.
    pub fn check(
        &self,
        road:  &ElementId,
        index: usize,
        end_s: f64,
        out:   &mut Vec<ValidationError>,
    ) {
        let scope = || format!("road {road} section {index}");

        let mut reported: Option<LaneId> = None;
        for pair in self.lanes.windows(2) {
            if pair[0].id == pair[1].id && reported != Some(pair[0].id) {
                reported = Some(pair[0].id);
                out.push(ValidationError::DuplicateId {
                    scope: scope(),
                    kind:  "lane",
                    id:    pair[0].id.0.to_string(),
                });
            }
        }

        if !self.contains(LaneId::CENTER) {
            out.push(ValidationError::MissingCenterLane { road: road.clone(), section: index });
        }

        self.check_side(road, index, "left", self.left().map(|l| l.id), 1, out);
        self.check_side(road, index, "right", self.right().map(|l| l.id), -1, out);

        for lane in &self.lanes {
            let entity = || format!("road {road} section {index} {}", lane.id);
            if lane.border_shadowed() {
                out.push(ValidationError::BorderShadowed {
                    road:    road.clone(),
                    section: index,
                    lane:    lane.id,
                });
            }
            if !lane.id.is_center() && matches!(lane.outline(), LaneOutline::None) {
                out.push(ValidationError::MissingElement { entity: entity(), element: "width/border" });
            }
            let records = lane.outline().records();
            if !is_sorted_by_start(records) {
                let at = records.windows(2).position(|w| w[1].start < w[0].start).unwrap_or(0);
                out.push(ValidationError::RecordOrder {
                    entity: entity(),
                    what:   lane.outline().kind(),
                    index:  at + 1,
                });
            } else if records.first().is_some_and(|r| r.start != 0.0) {
                // The first record must start the section.
                out.push(ValidationError::RecordOrder {
                    entity: entity(),
                    what:   lane.outline().kind(),
                    index:  0,
                });
            }
            for (what, offsets) in lane.offset_sequences() {
                if let Some(at) = offsets.windows(2).position(|w| w[1] < w[0]) {
                    out.push(ValidationError::RecordOrder { entity: entity(), what, index: at + 1 });
                }
            }
        }

        let length = end_s - self.s;
        if length > 0.0 {
            self.check_widths(road, index, 1, length, out);
            self.check_widths(road, index, -1, length, out);
        }
    }

    /// Ids on one side must run 1, 2, … (or −1, −2, …) without gaps.
    fn check_side(
        &self,
        road:  &ElementId,
        index: usize,
        side:  &'static str,
        ids:   impl Iterator<Item = LaneId>,
        step:  i32,
        out:   &mut Vec<ValidationError>,
    ) {
        let mut expected = step;
        let mut last = None;
        for id in ids {
            if last == Some(id) {
                continue;
            }
            last = Some(id);
            if id.0 != expected {
                out.push(ValidationError::LaneIdGap {
                    road:    road.clone(),
                    section: index,
                    side,
                    missing: LaneId(expected),
                });
                return;
            }
            expected += step;
        }
    }

    /// Exact non-negative width check for one side: widths are piecewise
    /// cubic, so each piece's minimum is found analytically.
    fn check_widths(
        &self,
        road:   &ElementId,
        index:  usize,
        step:   i32,
        length: f64,
        out:    &mut Vec<ValidationError>,
    ) {
        let mut inner = Piecewise::zero(0.0, length);
        let mut current = step;
        while let Some(lane) = self.lane(LaneId(current)) {
            let (width, outer) = match lane.outline() {
                LaneOutline::Width(r) => {
                    let w = Piecewise::from_records(r, 0.0, length);
                    let o = inner.add(&w);
                    (w, o)
                }
                LaneOutline::Border(r) => {
                    let b = Piecewise::from_records(r, 0.0, length);
                    (b.sub(&inner), b)
                }
                LaneOutline::None => (Piecewise::zero(0.0, length), inner.clone()),
            };
            if let Some((x, w)) = width.min() {
                if w < -NEGATIVE_WIDTH_EPS {
                    out.push(ValidationError::NegativeWidth {
                        road:    road.clone(),
                        section: index,
                        lane:    lane.id,
                        s:       self.s + x,
                        width:   w,
                    });
                }
            }
            inner = outer;
            current += step;
        }
    }
}

// ── Serialized form ───────────────────────────────────────────────────────────

#[cfg(feature = "serde")]
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SectionDef {
    pub s:           f64,
    #[serde(default)]
    pub single_side: bool,
    pub lanes:       Vec<Lane>,
}

#[cfg(feature = "serde")]
impl From<SectionDef> for LaneSection {
    fn from(def: SectionDef) -> Self {
        LaneSection::new(def.s, def.lanes).with_single_side(def.single_side)
    }
}

#[cfg(feature = "serde")]
impl From<LaneSection> for SectionDef {
    fn from(section: LaneSection) -> Self {
        SectionDef { s: section.s, single_side: section.single_side, lanes: section.lanes }
    }
}
