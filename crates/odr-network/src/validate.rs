//! Whole-document validation.
//!
//! # Phases
//!
//! 1. **Per road**: geometry tiling, profiles, lane sections, lane widths,
//!    signal and object placement, links between sections of the same
//!    road.  Roads are independent, so with the `parallel` feature this
//!    phase runs on Rayon's pool.
//! 2. **Registry**: every id is registered (hard barrier: all roads must be
//!    present).  Duplicate ids are reported here.
//! 3. **Cross references**: road links, lane links across road ends,
//!    junction membership and lane links, priorities, controllers, junction
//!    groups.
//!
//! Every phase appends to the same list; nothing stops at the first error.
//! Output order is deterministic: front-end parse errors, then per-road
//! findings in road order, then registry and cross-reference findings.

use rustc_hash::FxHashSet;
use tracing::debug;

use odr_core::{ElementId, LaneId, ValidationConfig, ValidationError};
use odr_lanes::RoadEnd;

use crate::document::Document;
use crate::junction::{Junction, JunctionType};
use crate::link::{Attachment, ElementType};
use crate::registry::Registry;
use crate::resolve::attached_section;
use crate::road::Road;

/// Validate `doc` with default tolerances.
pub fn validate(doc: &Document) -> Vec<ValidationError> {
    validate_with(doc, &ValidationConfig::default())
}

pub fn validate_with(doc: &Document, cfg: &ValidationConfig) -> Vec<ValidationError> {
    validate_into_registry(doc, cfg).0
}

/// Validate and hand back the registry built on the way, so a network can
/// keep it.
pub(crate) fn validate_into_registry(
    doc: &Document,
    cfg: &ValidationConfig,
) -> (Vec<ValidationError>, Registry) {
    let mut out = doc.parse_errors.clone();

    out.extend(check_roads(doc, cfg));

    let reg = Registry::build(doc, &mut out);

    for road in &doc.roads {
        check_road_links(doc, &reg, cfg, road, &mut out);
    }
    for junction in &doc.junctions {
        check_junction(doc, &reg, junction, &mut out);
    }
    check_controllers(doc, &reg, &mut out);
    check_groups(doc, &reg, &mut out);

    debug!(
        roads = doc.roads.len(),
        junctions = doc.junctions.len(),
        findings = out.len(),
        fatal = out.iter().filter(|e| e.is_fatal()).count(),
        "document validated"
    );
    (out, reg)
}

// ── Phase 1: per road ─────────────────────────────────────────────────────────

fn check_road(road: &Road, cfg: &ValidationConfig) -> Vec<ValidationError> {
    let errs = road.check(cfg);
    debug!(road = %road.id, findings = errs.len(), "road checked");
    errs
}

fn check_roads(doc: &Document, cfg: &ValidationConfig) -> Vec<ValidationError> {
    #[cfg(not(feature = "parallel"))]
    {
        doc.roads.iter().flat_map(|road| check_road(road, cfg)).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        doc.roads
            .par_iter()
            .flat_map_iter(|road| check_road(road, cfg))
            .collect()
    }
}

// ── Phase 3: cross references ─────────────────────────────────────────────────

/// Lane id declared across `end`.
fn declared(lane: &odr_lanes::Lane, end: RoadEnd) -> Option<LaneId> {
    match end {
        RoadEnd::Start => lane.predecessor,
        RoadEnd::End => lane.successor,
    }
}

fn dangling(from: String, kind: &'static str, target: &ElementId) -> ValidationError {
    ValidationError::DanglingReference { from, kind, target: target.to_string() }
}

fn check_road_links(
    doc:  &Document,
    reg:  &Registry,
    cfg:  &ValidationConfig,
    road: &Road,
    out:  &mut Vec<ValidationError>,
) {
    if let Some(junction) = road.junction_id() {
        if reg.junction(junction.as_str()).is_none() {
            out.push(dangling(format!("road {}", road.id), "junction", junction));
        }
    }

    for end in [RoadEnd::Start, RoadEnd::End] {
        let direction = end.link_direction();
        let section_idx = match end {
            RoadEnd::Start => 0,
            RoadEnd::End => road.lanes.sections.len().saturating_sub(1),
        };
        let boundary = road.lanes.boundary_section(end);
        let boundary_lanes = boundary.map(|s| s.lanes()).unwrap_or_default();

        let Some(link) = road.link.at(end) else {
            for lane in boundary_lanes.iter().filter(|l| declared(l, end).is_some()) {
                out.push(ValidationError::LaneLinkAtOpenEnd {
                    road: road.id.clone(),
                    lane: lane.id,
                    direction,
                });
            }
            continue;
        };

        match link.element_type {
            ElementType::Junction => {
                if reg.junction(link.element_id.as_str()).is_none() {
                    out.push(dangling(format!("road {} {direction}", road.id), "junction", &link.element_id));
                }
            }
            ElementType::Road => {
                let Some(target_idx) = reg.road(link.element_id.as_str()) else {
                    out.push(dangling(format!("road {} {direction}", road.id), "road", &link.element_id));
                    continue;
                };
                let Some(attachment) = link.attachment else {
                    out.push(ValidationError::MissingContactPoint {
                        road:   road.id.clone(),
                        end:    end.as_str(),
                        target: link.element_id.clone(),
                    });
                    continue;
                };
                let target = &doc.roads[target_idx.index()];
                if let Attachment::Along { element_s, .. } = attachment {
                    let slack = cfg.length_tolerance(target.length);
                    if !(element_s >= -slack && element_s <= target.length + slack) {
                        out.push(ValidationError::OutsideRoad {
                            entity: format!("road {} {direction} link to road {}", road.id, target.id),
                            what:   "elementS",
                            s:      element_s,
                            length: target.length,
                        });
                        continue;
                    }
                }
                let target_section = attached_section(target, attachment);
                for lane in boundary_lanes {
                    let Some(target_lane) = declared(lane, end) else {
                        continue;
                    };
                    if !target_section.is_some_and(|s| s.contains(target_lane)) {
                        out.push(ValidationError::DanglingLaneLink {
                            road: road.id.clone(),
                            section: section_idx,
                            lane: lane.id,
                            direction,
                            target_road: target.id.clone(),
                            target_lane,
                        });
                    }
                }
            }
        }
    }
}

fn check_junction(doc: &Document, reg: &Registry, junction: &Junction, out: &mut Vec<ValidationError>) {
    let jid = &junction.id;
    let lookup = |id: &ElementId| reg.road(id.as_str()).map(|i| doc.roads[i.index()].as_ref());

    let mut seen: FxHashSet<&ElementId> = FxHashSet::default();
    for conn in &junction.connections {
        let from = || format!("junction {jid} connection {}", conn.id);
        if !seen.insert(&conn.id) {
            out.push(ValidationError::DuplicateId {
                scope: format!("junction {jid}"),
                kind:  "connection",
                id:    conn.id.to_string(),
            });
        }

        let incoming = lookup(&conn.incoming_road);
        if incoming.is_none() {
            out.push(dangling(from(), "incoming road", &conn.incoming_road));
        }
        let connecting = lookup(&conn.connecting_road);
        if connecting.is_none() {
            out.push(dangling(from(), "connecting road", &conn.connecting_road));
        }

        if let Some(road) = connecting {
            if junction.kind != JunctionType::Direct && road.junction_id() != Some(jid) {
                out.push(ValidationError::JunctionMembership {
                    junction:   jid.clone(),
                    connection: conn.id.clone(),
                    road:       road.id.clone(),
                    declared:   road.junction_id().cloned(),
                });
            }
            if conn.contact_point.is_none() {
                out.push(ValidationError::MissingContactPoint {
                    road:   road.id.clone(),
                    end:    "connection",
                    target: jid.clone(),
                });
            }
        }

        for pair in &conn.lane_links {
            if let Some(road) = incoming {
                // The end facing the junction; either end if the road does
                // not link to it.
                let ends: &[RoadEnd] = match road.link.end_into_junction(jid) {
                    Some(RoadEnd::Start) => &[RoadEnd::Start],
                    Some(RoadEnd::End) => &[RoadEnd::End],
                    None => &[RoadEnd::Start, RoadEnd::End],
                };
                let found = ends
                    .iter()
                    .any(|&end| road.lanes.boundary_section(end).is_some_and(|s| s.contains(pair.from)));
                if !found {
                    out.push(ValidationError::JunctionLaneLink {
                        junction:   jid.clone(),
                        connection: conn.id.clone(),
                        road:       road.id.clone(),
                        lane:       pair.from,
                        role:       "from",
                    });
                }
            }
            if let (Some(road), Some(contact)) = (connecting, conn.contact_point) {
                let section = road.lanes.boundary_section(contact.road_end());
                if !section.is_some_and(|s| s.contains(pair.to)) {
                    out.push(ValidationError::JunctionLaneLink {
                        junction:   jid.clone(),
                        connection: conn.id.clone(),
                        road:       road.id.clone(),
                        lane:       pair.to,
                        role:       "to",
                    });
                }
            }
        }
    }

    for priority in &junction.priorities {
        for id in [&priority.high, &priority.low] {
            if reg.road(id.as_str()).is_none() {
                out.push(dangling(format!("junction {jid} priority"), "road", id));
            }
        }
    }
    for controller in &junction.controllers {
        if reg.controller(controller.id.as_str()).is_none() {
            out.push(dangling(format!("junction {jid}"), "controller", &controller.id));
        }
    }
}

fn check_controllers(doc: &Document, reg: &Registry, out: &mut Vec<ValidationError>) {
    for controller in &doc.controllers {
        for control in &controller.controls {
            if reg.signal(control.signal_id.as_str()).is_none() {
                out.push(dangling(format!("controller {}", controller.id), "signal", &control.signal_id));
            }
        }
    }
}

fn check_groups(doc: &Document, reg: &Registry, out: &mut Vec<ValidationError>) {
    for group in &doc.junction_groups {
        for junction in &group.junctions {
            if reg.junction(junction.as_str()).is_none() {
                out.push(dangling(format!("junctionGroup {}", group.id), "junction", junction));
            }
        }
    }
}
