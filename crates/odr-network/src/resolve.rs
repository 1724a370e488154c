//! Lane-link resolution across road ends.
//!
//! | Link at the road end | Candidates                                                     |
//! |----------------------|----------------------------------------------------------------|
//! | none / `-1`          | none                                                           |
//! | road                 | the declared (or same-id) lane in the linked road's section the link attaches to |
//! | junction             | every `laneLink` of every connection entered from this road whose `from` is this lane |
//!
//! A road link attaches through a contact point (the first or last section
//! of the linked road) or, inside a virtual junction, at `elementS` (the
//! section covering that station).
//!
//! Junction fan-out is reported in full; choosing among candidates is left
//! to the caller.

use odr_core::{ElementId, LaneId};
use odr_lanes::{LaneSection, RoadEnd};

use crate::document::Document;
use crate::error::{NetworkError, NetworkResult};
use crate::link::{Attachment, ElementType};
use crate::registry::Registry;
use crate::road::Road;

/// Section of `target` that a road link with `attachment` lands in.
pub(crate) fn attached_section(target: &Road, attachment: Attachment) -> Option<&LaneSection> {
    match attachment {
        Attachment::Contact(contact) => target.lanes.boundary_section(contact.road_end()),
        Attachment::Along { element_s, .. } => target
            .lanes
            .section_index(element_s)
            .ok()
            .and_then(|i| target.lanes.sections.get(i)),
    }
}

/// Lane `lane` of `road`'s boundary section at `end`, and the lane id it
/// declares across that end.
fn declared_link(road: &Road, lane: LaneId, end: RoadEnd) -> NetworkResult<Option<LaneId>> {
    let section = road.lanes.boundary_section(end).ok_or_else(|| NetworkError::UnknownLane {
        road: road.id.clone(),
        lane,
        s: 0.0,
    })?;
    let found = section.lane(lane).ok_or_else(|| NetworkError::UnknownLane {
        road: road.id.clone(),
        lane,
        s: section.s,
    })?;
    Ok(match end {
        RoadEnd::Start => found.predecessor,
        RoadEnd::End => found.successor,
    })
}

/// Every `(road, lane)` that lane `lane` of `road` continues into across
/// `end`.
pub fn lane_link_targets(
    doc:  &Document,
    reg:  &Registry,
    road: &Road,
    lane: LaneId,
    end:  RoadEnd,
) -> NetworkResult<Vec<(ElementId, LaneId)>> {
    let declared = declared_link(road, lane, end)?;
    let Some(link) = road.link.at(end) else {
        return Ok(Vec::new());
    };

    match link.element_type {
        ElementType::Road => {
            let Some(target_idx) = reg.road(link.element_id.as_str()) else {
                return Ok(Vec::new());
            };
            let target = &doc.roads[target_idx.index()];
            let Some(attachment) = link.attachment else {
                return Ok(Vec::new());
            };
            let target_lane = declared.unwrap_or(lane);
            let hit = attached_section(target, attachment).is_some_and(|sec| sec.contains(target_lane));
            Ok(if hit { vec![(target.id.clone(), target_lane)] } else { Vec::new() })
        }
        ElementType::Junction => {
            let Some(junction_idx) = reg.junction(link.element_id.as_str()) else {
                return Ok(Vec::new());
            };
            let junction = &doc.junctions[junction_idx.index()];
            Ok(junction
                .connections_from(&road.id)
                .flat_map(|conn| {
                    conn.lane_links
                        .iter()
                        .filter(|ll| ll.from == lane)
                        .map(|ll| (conn.connecting_road.clone(), ll.to))
                })
                .collect())
        }
    }
}
