//! The plan view: a road's reference line as an s-ordered chain of
//! [`GeometrySegment`]s.
//!
//! # Lookup
//!
//! Segments are kept in authored order, which validation requires to be
//! ascending and contiguous.  [`PlanView::evaluate`] binary-searches the
//! segment starts; [`PlanViewCursor`] remembers the last segment so the
//! common sweep `s = 0, Δ, 2Δ, …` costs O(1) amortised per query without
//! any interior mutability in the shared plan view.

use odr_core::geo::heading_delta;
use odr_core::{ElementId, Pose2D, Positive, ValidationConfig, ValidationError};

use crate::error::{GeometryError, GeometryResult};
use crate::segment::GeometrySegment;

/// Relative slack admitted at either end of the reference line, to absorb
/// rounding in `s = Σ lengths` computed by callers.
const RANGE_EPS_REL: f64 = 1e-9;

#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PlanView {
    segments: Vec<GeometrySegment>,
}

impl PlanView {
    pub fn new(segments: Vec<GeometrySegment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[GeometrySegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Sum of segment lengths.
    pub fn total_length(&self) -> f64 {
        self.segments.iter().map(|g| g.length).sum()
    }

    /// `[first start s, last end s]`, or `None` when empty.
    pub fn extent(&self) -> Option<(f64, f64)> {
        let first = self.segments.first()?;
        let last = self.segments.last()?;
        Some((first.s, last.end_s()))
    }

    /// Index of the segment covering `s`.  Values before the first segment
    /// map to the first one.
    #[inline]
    pub fn locate(&self, s: f64) -> Option<usize> {
        if self.segments.is_empty() {
            return None;
        }
        Some(self.segments.partition_point(|g| g.s <= s).saturating_sub(1))
    }

    /// Clamp `s` into the reference line, rejecting values beyond the slack.
    fn checked_s(&self, s: f64) -> GeometryResult<f64> {
        let (start, end) = self.extent().ok_or(GeometryError::Empty)?;
        let slack = RANGE_EPS_REL * (end - start).abs().max(1.0);
        if !s.is_finite() || s < start - slack || s > end + slack {
            return Err(GeometryError::OutOfRange { s, start, end });
        }
        Ok(s.clamp(start, end))
    }

    /// Pose of the reference line at `s`.
    pub fn evaluate(&self, s: f64) -> GeometryResult<Pose2D> {
        let s = self.checked_s(s)?;
        let idx = self.locate(s).ok_or(GeometryError::Empty)?;
        let seg = &self.segments[idx];
        Ok(seg.evaluate_local(s - seg.s))
    }

    /// A cursor for monotone sweeps over this plan view.
    pub fn cursor(&self) -> PlanViewCursor<'_> {
        PlanViewCursor { plan_view: self, last: 0 }
    }

    // ── Validation ────────────────────────────────────────────────────────

    /// Check tiling against the declared road length, appending problems to
    /// `out`.
    pub fn check(
        &self,
        road:        &ElementId,
        road_length: f64,
        cfg:         &ValidationConfig,
        out:         &mut Vec<ValidationError>,
    ) {
        if self.segments.is_empty() {
            out.push(ValidationError::MissingElement {
                entity:  format!("road {road}"),
                element: "planView geometry",
            });
            return;
        }

        let tol = cfg.length_tolerance(road_length);
        let mut expected = 0.0;
        for (i, seg) in self.segments.iter().enumerate() {
            if Positive::new(seg.length).is_err() {
                out.push(ValidationError::NonPositiveLength {
                    entity: format!("road {road} geometry {i}"),
                    what:   "length",
                    value:  seg.length,
                });
            }
            if !seg.s.is_finite() || (seg.s - expected).abs() > tol {
                out.push(ValidationError::GeometryGap {
                    road:     road.clone(),
                    segment:  i,
                    expected,
                    actual:   seg.s,
                });
            }
            // Continue from the authored start so one gap reports once.
            expected = seg.end_s();
        }

        let actual = self.total_length();
        if !actual.is_finite() || (actual - road_length).abs() > tol {
            out.push(ValidationError::GeometryLengthMismatch {
                road:     road.clone(),
                declared: road_length,
                actual,
            });
        }

        if let Some(max_gap) = cfg.continuity_tolerance_m {
            for (i, pair) in self.segments.windows(2).enumerate() {
                let end = pair[0].evaluate_local(pair[0].length);
                let start = pair[1].start_pose();
                let gap_m = end.distance(&start);
                let heading_gap = heading_delta(end.heading, start.heading).abs();
                if gap_m > max_gap || heading_gap > cfg.heading_tolerance_rad {
                    out.push(ValidationError::GeometryDiscontinuity {
                        road: road.clone(),
                        segment: i + 1,
                        gap_m,
                        heading_gap,
                    });
                }
            }
        }
    }
}

// ── PlanViewCursor ────────────────────────────────────────────────────────────

/// Stateful evaluator that caches the last located segment.
///
/// Forward queries scan from the cached segment; a backward jump falls back
/// to binary search.  Each thread owns its own cursor.
#[derive(Clone, Debug)]
pub struct PlanViewCursor<'a> {
    plan_view: &'a PlanView,
    last:      usize,
}

impl<'a> PlanViewCursor<'a> {
    pub fn evaluate(&mut self, s: f64) -> GeometryResult<Pose2D> {
        let s = self.plan_view.checked_s(s)?;
        let segs = &self.plan_view.segments;
        let mut idx = self.last.min(segs.len() - 1);
        if segs[idx].s <= s {
            while idx + 1 < segs.len() && segs[idx + 1].s <= s {
                idx += 1;
            }
        } else {
            idx = self.plan_view.locate(s).ok_or(GeometryError::Empty)?;
        }
        self.last = idx;
        let seg = &segs[idx];
        Ok(seg.evaluate_local(s - seg.s))
    }

    /// Index of the segment used by the most recent query.
    pub fn segment_index(&self) -> usize {
        self.last
    }
}
