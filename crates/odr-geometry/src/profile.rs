//! Elevation and lateral profiles.
//!
//! Both are independent of the planar geometry: they share only the
//! s-coordinate.  An absent profile is the explicit default (flat, z = 0),
//! never an error.

use odr_core::poly::{eval_records, is_sorted_by_start, record_index};
use odr_core::{Cubic, ElementId, Pose2D, Pose3D, PolyRecord, ValidationError};

// ── ElevationProfile ──────────────────────────────────────────────────────────

/// `z(s)` as s-sorted cubic records.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ElevationProfile {
    pub records: Vec<PolyRecord>,
}

impl ElevationProfile {
    pub fn new(records: Vec<PolyRecord>) -> Self {
        Self { records }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Elevation at `s`; 0 without records.
    pub fn z(&self, s: f64) -> f64 {
        eval_records(&self.records, s).unwrap_or(0.0)
    }

    /// dz/ds at `s`; 0 without records.
    pub fn grade(&self, s: f64) -> f64 {
        record_index(&self.records, s).map_or(0.0, |i| self.records[i].slope(s))
    }

    pub fn check(&self, road: &ElementId, out: &mut Vec<ValidationError>) {
        check_sorted(road, "elevation", &self.records, out);
    }
}

// ── LateralProfile ────────────────────────────────────────────────────────────

/// One `<shape>` record: a cubic in `dt = t - self.t`, valid from `t`
/// outward within the shape group at `s`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShapeRecord {
    pub s:    f64,
    pub t:    f64,
    pub poly: Cubic,
}

/// Superelevation (bank angle) and cross-section shape.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LateralProfile {
    /// Bank angle records in radians, s-sorted.
    pub superelevation: Vec<PolyRecord>,
    /// Shape records sorted by `(s, t)`.
    pub shapes:         Vec<ShapeRecord>,
}

impl LateralProfile {
    pub fn is_empty(&self) -> bool {
        self.superelevation.is_empty() && self.shapes.is_empty()
    }

    /// Bank angle at `s`; 0 without records.
    pub fn superelevation(&self, s: f64) -> f64 {
        eval_records(&self.superelevation, s).unwrap_or(0.0)
    }

    /// Cross-section height offset at `(s, t)`; 0 without shape records.
    ///
    /// Within one shape group (records sharing an s) the record with the
    /// greatest `t <= query` applies; between consecutive groups the two
    /// heights are interpolated linearly in s.
    pub fn shape_height(&self, s: f64, t: f64) -> f64 {
        if self.shapes.is_empty() {
            return 0.0;
        }
        let idx = self.shapes.partition_point(|r| r.s <= s);
        let group_s = self.shapes[idx.saturating_sub(1)].s;
        let here = self.group_height(group_s, t);
        match self.shapes.get(idx) {
            Some(next) if idx > 0 && next.s > group_s => {
                let there = self.group_height(next.s, t);
                let frac = (s - group_s) / (next.s - group_s);
                here + (there - here) * frac
            }
            _ => here,
        }
    }

    fn group_height(&self, group_s: f64, t: f64) -> f64 {
        let lo = self.shapes.partition_point(|r| r.s < group_s);
        let hi = self.shapes.partition_point(|r| r.s <= group_s);
        let group = &self.shapes[lo..hi];
        let pick = group.partition_point(|r| r.t <= t).saturating_sub(1);
        group.get(pick).map_or(0.0, |r| r.poly.eval(t - r.t))
    }

    pub fn check(&self, road: &ElementId, out: &mut Vec<ValidationError>) {
        check_sorted(road, "superelevation", &self.superelevation, out);
        for (i, pair) in self.shapes.windows(2).enumerate() {
            let (a, b) = (&pair[0], &pair[1]);
            if b.s < a.s || (b.s == a.s && b.t < a.t) {
                out.push(ValidationError::RecordOrder {
                    entity: format!("road {road}"),
                    what:   "shape",
                    index:  i + 1,
                });
            }
        }
    }
}

fn check_sorted(
    road:    &ElementId,
    what:    &'static str,
    records: &[PolyRecord],
    out:     &mut Vec<ValidationError>,
) {
    if is_sorted_by_start(records) {
        return;
    }
    if let Some(i) = records.windows(2).position(|w| w[1].start < w[0].start) {
        out.push(ValidationError::RecordOrder {
            entity: format!("road {road}"),
            what,
            index: i + 1,
        });
    }
}

// ── 3D placement ──────────────────────────────────────────────────────────────

/// Lift a reference-line pose into 3D.
pub fn place(planar: &Pose2D, elevation: &ElevationProfile, lateral: &LateralProfile, s: f64) -> Pose3D {
    Pose3D {
        x:       planar.x,
        y:       planar.y,
        z:       elevation.z(s),
        heading: planar.heading,
        pitch:   elevation.grade(s).atan(),
        roll:    lateral.superelevation(s),
    }
}
