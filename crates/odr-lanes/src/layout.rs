//! All lane data of one road: the lane offset plus the s-ordered lane
//! sections.

use odr_core::{ElementId, LaneId, ValidationConfig, ValidationError};

use crate::error::{LaneError, LaneResult};
use crate::offset::LaneOffset;
use crate::section::LaneSection;

/// Relative slack admitted around section bounds, matching the plan view.
const RANGE_EPS_REL: f64 = 1e-9;

/// Which physical end of a road.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RoadEnd {
    Start,
    End,
}

impl RoadEnd {
    pub fn as_str(self) -> &'static str {
        match self {
            RoadEnd::Start => "start",
            RoadEnd::End   => "end",
        }
    }

    /// The lane-link direction that leaves the road at this end.
    pub fn link_direction(self) -> &'static str {
        match self {
            RoadEnd::Start => "predecessor",
            RoadEnd::End   => "successor",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadLanes {
    #[cfg_attr(feature = "serde", serde(default))]
    pub offset:   LaneOffset,
    /// Sections in authored order; validation requires strictly ascending s.
    pub sections: Vec<LaneSection>,
}

impl RoadLanes {
    pub fn new(offset: LaneOffset, sections: Vec<LaneSection>) -> Self {
        Self { offset, sections }
    }

    /// Lanes with no offset.
    pub fn from_sections(sections: Vec<LaneSection>) -> Self {
        Self { offset: LaneOffset::default(), sections }
    }

    pub fn section(&self, index: usize) -> LaneResult<&LaneSection> {
        self.sections.get(index).ok_or(LaneError::SectionIndex {
            index,
            count: self.sections.len(),
        })
    }

    /// Index of the section covering road s.  Values before the first
    /// section map to it.
    pub fn section_index(&self, s: f64) -> LaneResult<usize> {
        if self.sections.is_empty() {
            return Err(LaneError::NoSections);
        }
        Ok(self.sections.partition_point(|sec| sec.s <= s).saturating_sub(1))
    }

    /// `[start, end]` road s of section `index`; the last section runs to
    /// `road_length`.
    pub fn section_range(&self, index: usize, road_length: f64) -> LaneResult<(f64, f64)> {
        let start = self.section(index)?.s;
        let end = self.sections.get(index + 1).map_or(road_length, |next| next.s);
        Ok((start, end))
    }

    /// The section touching a road end: the first for `Start`, the last for
    /// `End`.
    pub fn boundary_section(&self, end: RoadEnd) -> Option<&LaneSection> {
        match end {
            RoadEnd::Start => self.sections.first(),
            RoadEnd::End => self.sections.last(),
        }
    }

    pub fn acknowledge_advisories(&mut self) {
        for section in &mut self.sections {
            section.acknowledge_advisories();
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Width of lane `id` in section `index` at road `s`.  `s` must lie
    /// inside the section.
    pub fn lane_width(&self, index: usize, id: LaneId, s: f64, road_length: f64) -> LaneResult<f64> {
        let (start, end) = self.section_range(index, road_length)?;
        let slack = RANGE_EPS_REL * road_length.abs().max(1.0);
        if !s.is_finite() || s < start - slack || s > end + slack {
            return Err(LaneError::OutOfSection { s, start, end });
        }
        let section = &self.sections[index];
        section.width(id, s.clamp(start, end) - section.s)
    }

    /// Width of lane `id` in whichever section covers road `s`.
    pub fn lane_width_at(&self, id: LaneId, s: f64) -> LaneResult<f64> {
        let section = &self.sections[self.section_index(s)?];
        section.width(id, s - section.s)
    }

    /// Signed `(inner, outer)` t of lane `id` at road `s`, lane offset
    /// included.
    pub fn lane_edges(&self, id: LaneId, s: f64) -> LaneResult<(f64, f64)> {
        let section = &self.sections[self.section_index(s)?];
        let (inner, outer) = section.edges(id, s - section.s)?;
        let shift = self.offset.t(s);
        Ok((shift + inner, shift + outer))
    }

    // ── Validation ────────────────────────────────────────────────────────

    /// Section placement, per-section checks and lane links between
    /// sections of this road.  Links that leave the road are checked by the
    /// network layer.
    pub fn check(
        &self,
        road:        &ElementId,
        road_length: f64,
        cfg:         &ValidationConfig,
        out:         &mut Vec<ValidationError>,
    ) {
        self.offset.check(road, out);

        if self.sections.is_empty() {
            out.push(ValidationError::MissingElement {
                entity:  format!("road {road}"),
                element: "laneSection",
            });
            return;
        }

        let tol = cfg.length_tolerance(road_length);
        for (i, section) in self.sections.iter().enumerate() {
            let reason = if i == 0 && section.s.abs() > tol {
                Some("must start at s=0")
            } else if i > 0 && !(section.s > self.sections[i - 1].s) {
                Some("does not follow the previous section")
            } else if i > 0 && !(section.s < road_length) {
                Some("lies at or beyond the road end")
            } else {
                None
            };
            if let Some(reason) = reason {
                out.push(ValidationError::SectionOutOfOrder {
                    road: road.clone(),
                    section: i,
                    s: section.s,
                    reason,
                });
            }
            let end = self.sections.get(i + 1).map_or(road_length, |next| next.s);
            section.check(road, i, end, out);
        }

        self.check_internal_links(road, out);
    }

    fn check_internal_links(&self, road: &ElementId, out: &mut Vec<ValidationError>) {
        for (i, section) in self.sections.iter().enumerate() {
            for lane in section.lanes() {
                let prev = i.checked_sub(1).and_then(|p| self.sections.get(p));
                let next = self.sections.get(i + 1);
                let links = [("predecessor", lane.predecessor, prev), ("successor", lane.successor, next)];
                for (direction, target, neighbour) in links {
                    let (Some(target), Some(neighbour)) = (target, neighbour) else {
                        continue;
                    };
                    if !neighbour.contains(target) {
                        out.push(ValidationError::DanglingLaneLink {
                            road: road.clone(),
                            section: i,
                            lane: lane.id,
                            direction,
                            target_road: road.clone(),
                            target_lane: target,
                        });
                    }
                }
            }
        }
    }
}
