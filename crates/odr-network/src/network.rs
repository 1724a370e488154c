//! The validated, immutable road network and its query API.
//!
//! # Lifecycle
//!
//! ```text
//! Document ──validate──▶ RoadNetwork ──edit(f)──▶ RoadNetwork (new snapshot)
//!  (no queries)            (queries, Send + Sync)
//! ```
//!
//! A `RoadNetwork` can only be obtained from a document with no fatal
//! validation errors, so every query may rely on the checked invariants
//! (contiguous geometry, ordered sections, resolvable ids).  There is no
//! mutation path: [`RoadNetwork::edit`] copies the document (sharing every
//! untouched road and junction through `Arc`), re-validates it and returns a
//! new snapshot.  Readers of the old snapshot are unaffected.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) holds each road's reference line as short
//! chords sampled every `ValidationConfig::index_sample_step_m`.  It
//! answers "which road is nearest to (x, y)" and "which roads cross this
//! box".  Chord envelopes only pre-filter the box query; each candidate
//! chord is then clipped against the box exactly.

use std::fmt;
use std::sync::Arc;

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use tracing::{info, warn};

use odr_core::{ElementId, JunctionIdx, LaneId, Pose2D, Pose3D, RoadIdx, ValidationConfig, ValidationError};
use odr_geometry::PlanViewCursor;
use odr_geometry::profile::place;
use odr_lanes::{Lane, LaneError, LaneSection, RoadEnd, RoadMark};

use crate::document::Document;
use crate::error::{NetworkError, NetworkResult};
use crate::junction::Junction;
use crate::object::{Corner, RoadObject};
use crate::registry::Registry;
use crate::resolve::lane_link_targets;
use crate::road::{Road, SignalOrientation};
use crate::validate::validate_into_registry;

/// Relative slack admitted at either road end, matching the plan view.
const RANGE_EPS_REL: f64 = 1e-9;

// ── R-tree chord entry ────────────────────────────────────────────────────────

/// One straight chord of a sampled reference line.
#[derive(Clone, Debug)]
struct ChordEntry {
    a:    [f64; 2],
    b:    [f64; 2],
    road: RoadIdx,
}

impl RTreeObject for ChordEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.a, self.b)
    }
}

impl ChordEntry {
    /// `true` if the chord touches the box (Liang-Barsky clipping).
    fn crosses(&self, min: [f64; 2], max: [f64; 2]) -> bool {
        let d = [self.b[0] - self.a[0], self.b[1] - self.a[1]];
        let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
        for axis in 0..2 {
            if d[axis] == 0.0 {
                if self.a[axis] < min[axis] || self.a[axis] > max[axis] {
                    return false;
                }
                continue;
            }
            let t0 = (min[axis] - self.a[axis]) / d[axis];
            let t1 = (max[axis] - self.a[axis]) / d[axis];
            lo = lo.max(t0.min(t1));
            hi = hi.min(t0.max(t1));
            if lo > hi {
                return false;
            }
        }
        true
    }
}

impl PointDistance for ChordEntry {
    /// Squared distance from `point` to the chord.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let (dx, dy) = (self.b[0] - self.a[0], self.b[1] - self.a[1]);
        let (px, py) = (point[0] - self.a[0], point[1] - self.a[1]);
        let len_2 = dx * dx + dy * dy;
        let u = if len_2 > 0.0 { ((px * dx + py * dy) / len_2).clamp(0.0, 1.0) } else { 0.0 };
        let (ex, ey) = (px - u * dx, py - u * dy);
        ex * ex + ey * ey
    }
}

/// Sample a road's reference line into chords.
fn road_chords(road: &Road, idx: RoadIdx, step: f64) -> Vec<ChordEntry> {
    let Some((start, end)) = road.plan_view.extent() else {
        return Vec::new();
    };
    let length = end - start;
    if !(length > 0.0) {
        return Vec::new();
    }
    let n = (length / step.max(0.01)).ceil().max(1.0) as usize;
    let mut cursor = road.plan_view.cursor();
    let points: Vec<[f64; 2]> = (0..=n)
        .filter_map(|i| {
            let s = start + length * i as f64 / n as f64;
            cursor.evaluate(s).ok().map(|p| [p.x, p.y])
        })
        .collect();
    points
        .windows(2)
        .map(|w| ChordEntry { a: w[0], b: w[1], road: idx })
        .collect()
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// A validated road network.  Construct with [`RoadNetwork::from_document`]
/// or [`Document::into_network`].
#[derive(Clone)]
pub struct RoadNetwork {
    document:    Document,
    registry:    Registry,
    config:      ValidationConfig,
    /// Non-fatal findings from validation.
    advisories:  Vec<ValidationError>,
    spatial_idx: RTree<ChordEntry>,
}

impl fmt::Debug for RoadNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoadNetwork")
            .field("roads", &self.road_count())
            .field("junctions", &self.junction_count())
            .field("advisories", &self.advisories.len())
            .finish_non_exhaustive()
    }
}

impl RoadNetwork {
    /// Validate `doc` and freeze it.  Any fatal finding rejects the whole
    /// document with the complete finding list.
    pub fn from_document(mut doc: Document, config: ValidationConfig) -> NetworkResult<Self> {
        let (findings, registry) = validate_into_registry(&doc, &config);
        let fatal = findings.iter().filter(|e| e.is_fatal()).count();
        if fatal > 0 {
            warn!(fatal, findings = findings.len(), "road network rejected");
            return Err(NetworkError::Rejected(findings));
        }

        // Advisories are reported once; the frozen document no longer
        // carries them.
        doc.parse_errors.clear();
        for road in doc.roads.iter_mut() {
            if road.lanes.sections.iter().any(|s| s.lanes().iter().any(|l| l.border_shadowed())) {
                Arc::make_mut(road).lanes.acknowledge_advisories();
            }
        }

        let chords: Vec<ChordEntry> = doc
            .roads
            .iter()
            .enumerate()
            .filter_map(|(i, road)| RoadIdx::try_from(i).ok().map(|idx| (idx, road)))
            .flat_map(|(idx, road)| road_chords(road, idx, config.index_sample_step_m))
            .collect();

        info!(
            roads = doc.roads.len(),
            junctions = doc.junctions.len(),
            advisories = findings.len(),
            "road network accepted"
        );
        Ok(Self {
            document: doc,
            registry,
            config,
            advisories: findings,
            spatial_idx: RTree::bulk_load(chords),
        })
    }

    // ── Entities ──────────────────────────────────────────────────────────

    pub fn road_count(&self) -> usize {
        self.document.roads.len()
    }

    pub fn junction_count(&self) -> usize {
        self.document.junctions.len()
    }

    pub fn roads(&self) -> impl Iterator<Item = &Road> {
        self.document.roads.iter().map(|r| r.as_ref())
    }

    pub fn junctions(&self) -> impl Iterator<Item = &Junction> {
        self.document.junctions.iter().map(|j| j.as_ref())
    }

    pub fn road_idx(&self, id: &str) -> Option<RoadIdx> {
        self.registry.road(id)
    }

    pub fn junction_idx(&self, id: &str) -> Option<JunctionIdx> {
        self.registry.junction(id)
    }

    /// Road by arena index.  Panics on an index from another network.
    #[inline]
    pub fn road_at(&self, idx: RoadIdx) -> &Road {
        &self.document.roads[idx.index()]
    }

    pub fn road(&self, id: &str) -> NetworkResult<&Road> {
        self.registry
            .road(id)
            .map(|idx| self.road_at(idx))
            .ok_or_else(|| NetworkError::UnknownRoad(ElementId::from(id)))
    }

    pub fn junction(&self, id: &str) -> NetworkResult<&Junction> {
        self.registry
            .junction(id)
            .map(|idx| self.document.junctions[idx.index()].as_ref())
            .ok_or_else(|| NetworkError::UnknownJunction(ElementId::from(id)))
    }

    pub fn advisories(&self) -> &[ValidationError] {
        &self.advisories
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Road `id`, with `s` checked against its length and clamped into it.
    fn road_at_s(&self, id: &str, s: f64) -> NetworkResult<(&Road, f64)> {
        let road = self.road(id)?;
        let slack = RANGE_EPS_REL * road.length.abs().max(1.0);
        if !s.is_finite() || s < -slack || s > road.length + slack {
            return Err(NetworkError::OutOfRange { road: road.id.clone(), s, length: road.length });
        }
        Ok((road, s.clamp(0.0, road.length)))
    }

    /// Reference-line pose at an already range-checked `s`.  Validation
    /// bounds the gap between the geometry's extent and the road length,
    /// so `s` is clamped into the extent.
    fn planar(road: &Road, s: f64) -> NetworkResult<Pose2D> {
        let s = match road.plan_view.extent() {
            Some((start, end)) => s.clamp(start, end),
            None => s,
        };
        Ok(road.plan_view.evaluate(s)?)
    }

    // ── Reference line ────────────────────────────────────────────────────

    /// Planar pose of road `id`'s reference line at `s`.
    pub fn evaluate_geometry(&self, id: &str, s: f64) -> NetworkResult<Pose2D> {
        let (road, s) = self.road_at_s(id, s)?;
        Self::planar(road, s)
    }

    /// `(z, superelevation)` at `s`.
    pub fn evaluate_elevation(&self, id: &str, s: f64) -> NetworkResult<(f64, f64)> {
        let (road, s) = self.road_at_s(id, s)?;
        Ok((road.elevation.z(s), road.lateral.superelevation(s)))
    }

    /// Full 3D pose of the reference line at `s`.
    pub fn evaluate_pose(&self, id: &str, s: f64) -> NetworkResult<Pose3D> {
        let (road, s) = self.road_at_s(id, s)?;
        let planar = Self::planar(road, s)?;
        Ok(place(&planar, &road.elevation, &road.lateral, s))
    }

    /// Cursor for monotone sweeps along road `id`.
    pub fn plan_view_cursor(&self, id: &str) -> NetworkResult<PlanViewCursor<'_>> {
        Ok(self.road(id)?.plan_view.cursor())
    }

    // ── Lanes ─────────────────────────────────────────────────────────────

    /// The section covering `s` and its lane `lane`.
    fn lane_at(road: &Road, lane: LaneId, s: f64) -> NetworkResult<(&LaneSection, &Lane)> {
        let section = &road.lanes.sections[road.lanes.section_index(s)?];
        let record = section.lane(lane).ok_or_else(|| NetworkError::UnknownLane {
            road: road.id.clone(),
            lane,
            s,
        })?;
        Ok((section, record))
    }

    fn lane_error(road: &Road, s: f64, err: LaneError) -> NetworkError {
        match err {
            LaneError::UnknownLane(lane) => NetworkError::UnknownLane { road: road.id.clone(), lane, s },
            other => NetworkError::Lane(other),
        }
    }

    /// Width of `lane` in section `section` at road `s`.
    pub fn lane_width(&self, id: &str, section: usize, lane: LaneId, s: f64) -> NetworkResult<f64> {
        let (road, s) = self.road_at_s(id, s)?;
        road.lanes
            .lane_width(section, lane, s, road.length)
            .map_err(|e| Self::lane_error(road, s, e))
    }

    /// Width of `lane` in whichever section covers `s`.
    pub fn lane_width_at(&self, id: &str, lane: LaneId, s: f64) -> NetworkResult<f64> {
        let (road, s) = self.road_at_s(id, s)?;
        road.lanes.lane_width_at(lane, s).map_err(|e| Self::lane_error(road, s, e))
    }

    /// Signed `(inner, outer)` t of `lane` at `s`, lane offset included.
    pub fn lane_edges(&self, id: &str, lane: LaneId, s: f64) -> NetworkResult<(f64, f64)> {
        let (road, s) = self.road_at_s(id, s)?;
        road.lanes.lane_edges(lane, s).map_err(|e| Self::lane_error(road, s, e))
    }

    /// 3D pose at the middle of `lane` at `s`.
    ///
    /// The surface follows superelevation and lateral shape; a `level` lane
    /// stays horizontal at the height of its inner edge.  Lane height
    /// records raise the surface by the mean of their inner and outer value.
    pub fn lane_center(&self, id: &str, lane: LaneId, s: f64) -> NetworkResult<Pose3D> {
        let (road, s) = self.road_at_s(id, s)?;
        let (inner, outer) = road.lanes.lane_edges(lane, s).map_err(|e| Self::lane_error(road, s, e))?;
        let t = 0.5 * (inner + outer);

        let (section, record) = Self::lane_at(road, lane, s)?;

        let planar = Self::planar(road, s)?;
        let base = place(&planar, &road.elevation, &road.lateral, s);
        let (x, y) = planar.offset_lateral(t);
        let bank = base.roll.tan();
        let (surface_t, roll) = if record.level { (inner, 0.0) } else { (t, base.roll) };
        let (h_inner, h_outer) = record.height_at(s - section.s);

        Ok(Pose3D {
            x,
            y,
            z: base.z + surface_t * bank + road.lateral.shape_height(s, surface_t) + 0.5 * (h_inner + h_outer),
            heading: planar.heading,
            pitch: base.pitch,
            roll,
        })
    }

    /// Speed limit in m/s for `lane` at `s`: the lane's own record, else the
    /// road type's.
    pub fn speed_limit(&self, id: &str, lane: LaneId, s: f64) -> NetworkResult<Option<f64>> {
        let (road, s) = self.road_at_s(id, s)?;
        let (section, record) = Self::lane_at(road, lane, s)?;
        Ok(record.speed_at(s - section.s).or_else(|| road.type_speed_at(s)))
    }

    /// Road mark of `lane` in effect at `s`, if any.
    pub fn road_mark(&self, id: &str, lane: LaneId, s: f64) -> NetworkResult<Option<&RoadMark>> {
        let (road, s) = self.road_at_s(id, s)?;
        let (section, record) = Self::lane_at(road, lane, s)?;
        Ok(record.road_mark_at(s - section.s))
    }

    // ── Signals and objects ───────────────────────────────────────────────

    /// Reference-line pose at `s` (clamped to the road) and the road
    /// surface point `t` to its left.
    fn surface_point(road: &Road, s: f64, t: f64) -> NetworkResult<(Pose2D, [f64; 3])> {
        let s = s.clamp(0.0, road.length);
        let planar = Self::planar(road, s)?;
        let base = place(&planar, &road.elevation, &road.lateral, s);
        let (x, y) = planar.offset_lateral(t);
        Ok((planar, [x, y, base.z + t * base.roll.tan()]))
    }

    /// World pose of signal `signal` on road `id`.  The heading faces
    /// traffic in the signal's orientation direction, plus its heading
    /// offset.
    pub fn signal_pose(&self, id: &str, signal: &str) -> NetworkResult<Pose3D> {
        let road = self.road(id)?;
        let sig = road.signal(signal).ok_or_else(|| NetworkError::UnknownSignal {
            road:   road.id.clone(),
            signal: ElementId::from(signal),
        })?;
        let (planar, [x, y, z]) = Self::surface_point(road, sig.s, sig.t)?;
        let facing = match sig.orientation {
            SignalOrientation::Minus => std::f64::consts::PI,
            SignalOrientation::Plus | SignalOrientation::Both => 0.0,
        };
        Ok(Pose3D {
            x,
            y,
            z: z + sig.z_offset,
            heading: odr_core::geo::normalize_angle(planar.heading + facing + sig.h_offset),
            pitch: 0.0,
            roll: 0.0,
        })
    }

    /// Road `id` and its object `object`, looked up through the registry.
    fn road_object(&self, id: &str, object: &str) -> NetworkResult<(&Road, &RoadObject)> {
        let road = self.road(id)?;
        self.registry
            .object(object)
            .filter(|&(owner, _)| self.road_at(owner).id == road.id)
            .map(|(_, k)| (road, &road.objects[k]))
            .ok_or_else(|| NetworkError::UnknownObject {
                road:   road.id.clone(),
                object: ElementId::from(object),
            })
    }

    /// World pose of object `object` on road `id`: its `(s, t)` origin
    /// raised by `z_offset`, heading along the reference line plus `hdg`.
    pub fn object_pose(&self, id: &str, object: &str) -> NetworkResult<Pose3D> {
        let (road, obj) = self.road_object(id, object)?;
        let (planar, [x, y, z]) = Self::surface_point(road, obj.s, obj.t)?;
        Ok(Pose3D {
            x,
            y,
            z: z + obj.z_offset,
            heading: odr_core::geo::normalize_angle(planar.heading + obj.hdg),
            pitch: 0.0,
            roll: 0.0,
        })
    }

    /// World `[x, y, z]` of every corner of outline `outline` (by position)
    /// of object `object` on road `id`.  `z` is the corner's base; add
    /// [`Corner::height`] for its top.
    pub fn object_outline(&self, id: &str, object: &str, outline: usize) -> NetworkResult<Vec<[f64; 3]>> {
        let (road, obj) = self.road_object(id, object)?;
        let shape = obj.outlines.get(outline).ok_or_else(|| NetworkError::UnknownOutline {
            object: obj.id.clone(),
            index:  outline,
        })?;
        let origin = self.object_pose(id, object)?;
        let (sin, cos) = origin.heading.sin_cos();
        shape
            .corners
            .iter()
            .map(|corner| match *corner {
                Corner::Road { s, t, dz, .. } => {
                    let (_, [x, y, z]) = Self::surface_point(road, s, t)?;
                    Ok([x, y, z + dz])
                }
                Corner::Local { u, v, z, .. } => Ok([
                    origin.x + u * cos - v * sin,
                    origin.y + u * sin + v * cos,
                    origin.z + z,
                ]),
            })
            .collect()
    }

    // ── Linkage ───────────────────────────────────────────────────────────

    /// Every `(road, lane)` that `lane` of road `id` continues into, at the
    /// road's end (`at_end`) or start.  Multiple entries mean junction
    /// fan-out; an empty list means the lane ends there.
    pub fn resolve_lane_link(&self, id: &str, lane: LaneId, at_end: bool) -> NetworkResult<Vec<(ElementId, LaneId)>> {
        let road = self.road(id)?;
        let end = if at_end { RoadEnd::End } else { RoadEnd::Start };
        lane_link_targets(&self.document, &self.registry, road, lane, end)
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Road whose reference line passes closest to `(x, y)`.
    ///
    /// Returns `None` only if the network has no roads.
    pub fn nearest_road(&self, x: f64, y: f64) -> Option<&ElementId> {
        self.spatial_idx
            .nearest_neighbor(&[x, y])
            .map(|e| &self.road_at(e.road).id)
    }

    /// Roads whose sampled reference line crosses or lies inside the box,
    /// each listed once in road order.  Corners may be given in any order.
    pub fn roads_in_box(&self, min: [f64; 2], max: [f64; 2]) -> Vec<&ElementId> {
        let aabb = AABB::from_corners(min, max);
        let (lo, hi) = (aabb.lower(), aabb.upper());
        let mut hits: Vec<RoadIdx> = self
            .spatial_idx
            .locate_in_envelope_intersecting(&aabb)
            .filter(|e| e.crosses(lo, hi))
            .map(|e| e.road)
            .collect();
        hits.sort_unstable();
        hits.dedup();
        hits.into_iter().map(|idx| &self.road_at(idx).id).collect()
    }

    // ── Copy-on-write ─────────────────────────────────────────────────────

    /// A copy of the underlying document.  Cheap: roads and junctions are
    /// shared.
    pub fn to_document(&self) -> Document {
        self.document.clone()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Apply `f` to a copy of the document and validate the result into a
    /// new snapshot with the same configuration.  `self` is unchanged.
    pub fn edit(&self, f: impl FnOnce(&mut Document)) -> NetworkResult<RoadNetwork> {
        let mut doc = self.to_document();
        f(&mut doc);
        RoadNetwork::from_document(doc, self.config.clone())
    }
}
