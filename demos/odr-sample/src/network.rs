//! Built-in sample network.
//!
//! A 200 m approach road ("main") runs into junction "J1", where it splits
//! into a left-turn connector and a straight connector.  The straight
//! connector continues into "exit".

use odr_core::{Cubic, LaneId, Pose2D, PolyRecord};
use odr_geometry::{ElevationProfile, GeometrySegment, PlanView};
use odr_lanes::{Lane, LaneSection, LaneType, RoadLanes, RoadMark, RoadMarkType};
use odr_network::{
    Connection, ContactPoint, Control, Controller, ControllerRef, Corner, Document, Junction, Outline,
    Road, RoadKind, RoadLink, RoadLinks, RoadObject, RoadType, Signal,
};

const LANE_WIDTH: f64 = 3.5;
const URBAN_SPEED_MPS: f64 = 50.0 / 3.6;

/// `(length, curvature at start, curvature at end)`.
type Shape = (f64, f64, f64);

/// Lay `shapes` end to end from `start`.  Returns the plan view, its total
/// length and the end pose.
fn chain(start: Pose2D, shapes: &[Shape]) -> (PlanView, f64, Pose2D) {
    let mut segments = Vec::with_capacity(shapes.len());
    let mut at = start;
    let mut s = 0.0;
    for &(length, k0, k1) in shapes {
        let seg = if k0 != k1 {
            GeometrySegment::spiral(s, at.x, at.y, at.heading, length, k0, k1)
        } else if k0 != 0.0 {
            GeometrySegment::arc(s, at.x, at.y, at.heading, length, k0)
        } else {
            GeometrySegment::line(s, at.x, at.y, at.heading, length)
        };
        at = seg.evaluate_local(length);
        s += length;
        segments.push(seg);
    }
    (PlanView::new(segments), s, at)
}

fn driving(id: i32) -> Lane {
    let mut lane = Lane::new(id, LaneType::Driving)
        .with_width(vec![PolyRecord::new(0.0, Cubic::constant(LANE_WIDTH))]);
    lane.road_marks.push(RoadMark { kind: RoadMarkType::Broken, ..RoadMark::default() });
    lane
}

/// Center lane, `left` lanes on the left and `right` on the right.
fn lanes(left: i32, right: i32) -> RoadLanes {
    let mut all = vec![Lane::center()];
    all.extend((1..=left).map(driving));
    all.extend((1..=right).map(|id| driving(-id)));
    RoadLanes::from_sections(vec![LaneSection::new(0.0, all)])
}

fn road(id: &str, start: Pose2D, shapes: &[Shape], lane_layout: RoadLanes) -> (Road, Pose2D) {
    let (plan_view, length, end) = chain(start, shapes);
    (Road::new(id, length, plan_view, lane_layout), end)
}

pub fn build_document() -> Document {
    // Approach: straight, easement into a gentle curve, straight again.
    let (mut main, main_end) = road(
        "main",
        Pose2D::default(),
        &[(80.0, 0.0, 0.0), (20.0, 0.0, 0.01), (60.0, 0.01, 0.01), (40.0, 0.0, 0.0)],
        lanes(1, 2),
    );
    main.elevation = ElevationProfile::new(vec![PolyRecord::new(0.0, Cubic::new(0.0, 0.01, 0.0, 0.0))]);
    main.types.push(RoadType {
        s:         0.0,
        kind:      RoadKind::Town,
        country:   None,
        speed_mps: Some(URBAN_SPEED_MPS),
    });
    let mut stop = Signal::new("sig-1", main.length - 5.0, -(2.0 * LANE_WIDTH + 1.0));
    stop.z_offset = 2.5;
    stop.dynamic = true;
    stop.kind = "1000001".to_owned();
    main.signals.push(stop);
    let mut shelter = RoadObject::new("obj-1", 30.0, -(2.0 * LANE_WIDTH + 2.0));
    shelter.kind = "busShelter".to_owned();
    shelter.height = Some(2.6);
    main.objects.push(shelter.with_outline(Outline::closed(vec![
        Corner::Local { u: -4.0, v: -1.0, z: 0.0, height: 2.6 },
        Corner::Local { u: 4.0, v: -1.0, z: 0.0, height: 2.6 },
        Corner::Local { u: 4.0, v: 1.0, z: 0.0, height: 2.6 },
        Corner::Local { u: -4.0, v: 1.0, z: 0.0, height: 2.6 },
    ])));
    main = main.with_links(RoadLinks { predecessor: None, successor: Some(RoadLink::junction("J1")) });

    let from_main = RoadLinks { predecessor: Some(RoadLink::road("main", ContactPoint::End)), successor: None };

    let (c_left, _) = road("c-left", main_end, &[(25.0, 0.06, 0.06)], lanes(0, 1));
    let c_left = c_left.with_junction("J1").with_links(from_main.clone());

    let (c_straight, straight_end) = road("c-straight", main_end, &[(20.0, 0.0, 0.0)], lanes(0, 2));
    let c_straight = c_straight.with_junction("J1").with_links(RoadLinks {
        successor: Some(RoadLink::road("exit", ContactPoint::Start)),
        ..from_main
    });

    let (exit, _) = road("exit", straight_end, &[(100.0, 0.0, 0.0)], lanes(1, 2));
    let exit = exit.with_links(RoadLinks {
        predecessor: Some(RoadLink::road("c-straight", ContactPoint::End)),
        successor:   None,
    });

    let mut junction = Junction::new("J1", vec![
        Connection::new("0", "main", "c-left", ContactPoint::Start).with_lane_link(-1, -1),
        Connection::new("1", "main", "c-straight", ContactPoint::Start)
            .with_lane_link(-1, -1)
            .with_lane_link(-2, -2),
    ]);
    junction.controllers.push(ControllerRef { id: "ctl-1".into(), kind: None, sequence: Some(1) });

    let mut doc = Document::new();
    doc.header.name = Some("odr-sample".to_owned());
    doc.push_road(main)
        .push_road(c_left)
        .push_road(c_straight)
        .push_road(exit)
        .push_junction(junction)
        .push_controller(Controller {
            id:       "ctl-1".into(),
            name:     Some("approach".to_owned()),
            sequence: None,
            controls: vec![Control { signal_id: "sig-1".into(), kind: None }],
        });
    doc
}

/// Object placed on the approach road.
pub const SHELTER_ID: &str = "obj-1";

/// Lanes worth following out of the sample's approach road.
pub fn approach_lanes() -> [LaneId; 2] {
    [LaneId(-1), LaneId(-2)]
}
