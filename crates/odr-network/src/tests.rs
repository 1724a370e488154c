//! Unit tests for odr-network.
//!
//! All documents are built in code; nothing touches the filesystem.

#[cfg(test)]
mod helpers {
    use odr_core::{Cubic, ElementId, PolyRecord, ValidationError};
    use odr_geometry::{GeometrySegment, PlanView};
    use odr_lanes::{Lane, LaneSection, LaneType, RoadLanes};

    use crate::{ContactPoint, Document, Junction, Road, RoadLink, RoadLinks, RoadNetwork};

    pub fn driving(id: i32, width: f64) -> Lane {
        Lane::new(id, LaneType::Driving).with_width(vec![PolyRecord::new(0.0, Cubic::constant(width))])
    }

    /// Center lane plus `right` driving lanes of width 3.5.
    pub fn section(s: f64, right: i32) -> LaneSection {
        let mut lanes = vec![Lane::center()];
        lanes.extend((1..=right).map(|id| driving(-id, 3.5)));
        LaneSection::new(s, lanes)
    }

    /// A straight road starting at `(x, y)` with `right` lanes.
    pub fn straight(id: &str, x: f64, y: f64, heading: f64, length: f64, right: i32) -> Road {
        Road::new(
            id,
            length,
            PlanView::new(vec![GeometrySegment::line(0.0, x, y, heading, length)]),
            RoadLanes::from_sections(vec![section(0.0, right)]),
        )
    }

    pub fn links(predecessor: Option<RoadLink>, successor: Option<RoadLink>) -> RoadLinks {
        RoadLinks { predecessor, successor }
    }

    pub fn document(roads: Vec<Road>, junctions: Vec<Junction>) -> Document {
        let mut doc = Document::new();
        for road in roads {
            doc.push_road(road);
        }
        for junction in junctions {
            doc.push_junction(junction);
        }
        doc
    }

    pub fn network(roads: Vec<Road>, junctions: Vec<Junction>) -> RoadNetwork {
        document(roads, junctions).into_network().unwrap()
    }

    /// R1 (50 m) → R2 (30 m), end to start, two right lanes each.
    pub fn scenario_b() -> Vec<Road> {
        vec![
            straight("R1", 0.0, 0.0, 0.0, 50.0, 2)
                .with_links(links(None, Some(RoadLink::road("R2", ContactPoint::Start)))),
            straight("R2", 50.0, 0.0, 0.0, 30.0, 2)
                .with_links(links(Some(RoadLink::road("R1", ContactPoint::End)), None)),
        ]
    }

    /// Road "A" runs into junction "J", which fans out into connecting
    /// roads "C1" and "C2".
    pub fn fan_out() -> (Vec<Road>, Junction) {
        use crate::Connection;

        let from_a = || links(Some(RoadLink::road("A", ContactPoint::End)), None);
        let roads = vec![
            straight("A", 0.0, 0.0, 0.0, 50.0, 1).with_links(links(None, Some(RoadLink::junction("J")))),
            straight("C1", 50.0, 0.0, 0.3, 10.0, 1).with_junction("J").with_links(from_a()),
            straight("C2", 50.0, 0.0, -0.3, 10.0, 1).with_junction("J").with_links(from_a()),
        ];
        let junction = Junction::new("J", vec![
            Connection::new("0", "A", "C1", ContactPoint::Start).with_lane_link(-1, -1),
            Connection::new("1", "A", "C2", ContactPoint::Start).with_lane_link(-1, -1),
        ]);
        (roads, junction)
    }

    pub fn has(errs: &[ValidationError], pred: impl Fn(&ValidationError) -> bool) -> bool {
        errs.iter().any(pred)
    }

    pub fn id(s: &str) -> ElementId {
        ElementId::from(s)
    }
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scenarios {
    use odr_core::{ErrorClass, LaneId, ValidationError};
    use odr_lanes::{Lane, LaneSection, LaneType, RoadLanes};

    use super::helpers::{driving, id, network, scenario_b, straight};
    use crate::{Document, NetworkError};

    #[test]
    fn scenario_a_line_road() {
        let net = network(vec![straight("1", 0.0, 0.0, 0.0, 100.0, 1)], vec![]);
        let pose = net.evaluate_geometry("1", 50.0).unwrap();
        assert_eq!((pose.x, pose.y, pose.heading), (50.0, 0.0, 0.0));
        assert_eq!(net.lane_width("1", 0, LaneId(-1), 50.0).unwrap(), 3.5);
    }

    #[test]
    fn scenario_b_end_to_start() {
        let net = network(scenario_b(), vec![]);
        assert_eq!(
            net.resolve_lane_link("R1", LaneId(-2), true).unwrap(),
            vec![(id("R2"), LaneId(-2))]
        );
        assert_eq!(
            net.resolve_lane_link("R2", LaneId(-1), false).unwrap(),
            vec![(id("R1"), LaneId(-1))]
        );
        // Open ends resolve to nothing.
        assert!(net.resolve_lane_link("R2", LaneId(-1), true).unwrap().is_empty());
    }

    #[test]
    fn scenario_b_declared_link_wins() {
        let mut roads = scenario_b();
        let crossing = driving(-2, 3.5).with_links(None, Some(LaneId(-1)));
        roads[0].lanes = RoadLanes::from_sections(vec![LaneSection::new(0.0, vec![
            Lane::center(),
            driving(-1, 3.5),
            crossing,
        ])]);
        let net = network(roads, vec![]);
        assert_eq!(
            net.resolve_lane_link("R1", LaneId(-2), true).unwrap(),
            vec![(id("R2"), LaneId(-1))]
        );
    }

    #[test]
    fn scenario_c_duplicate_lane_rejects() {
        let mut road = straight("1", 0.0, 0.0, 0.0, 100.0, 0);
        road.lanes = RoadLanes::from_sections(vec![LaneSection::new(0.0, vec![
            Lane::center(),
            driving(-1, 3.5),
            driving(-1, 3.0),
        ])]);
        let mut doc = Document::new();
        doc.push_road(road);

        let errs = doc.validate();
        assert!(errs.iter().any(|e| matches!(e, ValidationError::DuplicateId { kind: "lane", .. })
            && e.class() == ErrorClass::Structural));

        match doc.into_network() {
            Err(NetworkError::Rejected(all)) => assert_eq!(all, errs),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn lane_without_width_rejects() {
        let mut road = straight("R", 0.0, 0.0, 0.0, 50.0, 0);
        road.lanes = RoadLanes::from_sections(vec![LaneSection::new(0.0, vec![
            Lane::center(),
            Lane::new(-1, LaneType::Driving),
        ])]);
        let mut doc = Document::new();
        doc.push_road(road);
        assert!(matches!(
            doc.into_network(),
            Err(NetworkError::Rejected(errs))
                if matches!(&errs[..], [ValidationError::MissingElement { element: "width/border", .. }])
        ));
    }
}

// ── Road links ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod links {
    use std::f64::consts::FRAC_PI_2;

    use odr_core::{ElementId, ErrorClass, LaneId, ValidationError};
    use odr_lanes::{Lane, LaneSection, RoadLanes};

    use super::helpers::{document, driving, has, id, links, network, scenario_b, section, straight};
    use crate::{ContactPoint, ElementDir, ElementType, Road, RoadLink, validate};

    /// 100 m road "M" with one right lane up to s = 60 and three after.
    pub fn widening_main() -> Road {
        let mut main = straight("M", 0.0, 0.0, 0.0, 100.0, 1);
        main.lanes = RoadLanes::from_sections(vec![section(0.0, 1), section(60.0, 3)]);
        main
    }

    /// Side road "S" running north into the middle of "M" at `element_s`.
    pub fn side_road_into(element_s: f64) -> Road {
        straight("S", element_s, -30.0, FRAC_PI_2, 30.0, 1)
            .with_links(links(None, Some(RoadLink::road_along("M", element_s, ElementDir::Plus))))
    }

    #[test]
    fn sentinel_means_no_link() {
        let sentinel = RoadLink {
            element_type: ElementType::Road,
            element_id:   ElementId::from("-1"),
            attachment:   None,
        };
        let road = straight("1", 0.0, 0.0, 0.0, 10.0, 1)
            .with_links(links(Some(sentinel), None))
            .with_junction("-1");
        assert!(validate(&document(vec![road], vec![])).is_empty());
    }

    #[test]
    fn dangling_road_and_junction_links() {
        let road = straight("1", 0.0, 0.0, 0.0, 10.0, 1).with_links(links(
            Some(RoadLink::road("ghost", ContactPoint::End)),
            Some(RoadLink::junction("nowhere")),
        ));
        let errs = validate(&document(vec![road], vec![]));
        assert!(has(&errs, |e| matches!(e, ValidationError::DanglingReference { kind: "road", target, .. } if target == "ghost")));
        assert!(has(&errs, |e| matches!(e, ValidationError::DanglingReference { kind: "junction", target, .. } if target == "nowhere")));
    }

    #[test]
    fn road_to_road_link_needs_contact_point() {
        let mut roads = scenario_b();
        if let Some(link) = roads[0].link.successor.as_mut() {
            link.attachment = None;
        }
        let errs = validate(&document(roads, vec![]));
        assert!(has(&errs, |e| matches!(e, ValidationError::MissingContactPoint { end: "end", .. })));
    }

    #[test]
    fn lane_link_across_open_end() {
        let mut road = straight("1", 0.0, 0.0, 0.0, 10.0, 0);
        road.lanes = RoadLanes::from_sections(vec![LaneSection::new(0.0, vec![
            Lane::center(),
            driving(-1, 3.5).with_links(Some(LaneId(-1)), None),
        ])]);
        let errs = validate(&document(vec![road], vec![]));
        assert!(matches!(
            errs[..],
            [ValidationError::LaneLinkAtOpenEnd { lane: LaneId(-1), direction: "predecessor", .. }]
        ));
    }

    #[test]
    fn cross_road_lane_link_must_exist() {
        let mut roads = scenario_b();
        roads[0].lanes = RoadLanes::from_sections(vec![LaneSection::new(0.0, vec![
            Lane::center(),
            driving(-1, 3.5).with_links(None, Some(LaneId(-3))),
        ])]);
        let errs = validate(&document(roads, vec![]));
        assert!(has(&errs, |e| matches!(
            e,
            ValidationError::DanglingLaneLink { direction: "successor", target_lane: LaneId(-3), .. }
        )));
    }

    #[test]
    fn link_along_road_uses_covering_section() {
        let net = network(vec![side_road_into(40.0), widening_main()], vec![]);
        assert_eq!(net.resolve_lane_link("S", LaneId(-1), true).unwrap(), vec![(id("M"), LaneId(-1))]);

        // Lane -3 only exists past s = 60.
        let mut side = side_road_into(80.0);
        side.lanes = RoadLanes::from_sections(vec![LaneSection::new(0.0, vec![
            Lane::center(),
            driving(-1, 3.5).with_links(None, Some(LaneId(-3))),
        ])]);
        let net = network(vec![side.clone(), widening_main()], vec![]);
        assert_eq!(net.resolve_lane_link("S", LaneId(-1), true).unwrap(), vec![(id("M"), LaneId(-3))]);

        if let Some(link) = side.link.successor.as_mut() {
            link.attachment = Some(crate::Attachment::Along { element_s: 40.0, element_dir: ElementDir::Plus });
        }
        let errs = validate(&document(vec![side, widening_main()], vec![]));
        assert!(matches!(
            &errs[..],
            [ValidationError::DanglingLaneLink { target_lane: LaneId(-3), section: 0, .. }]
        ));
    }

    #[test]
    fn link_along_road_must_land_on_it() {
        let errs = validate(&document(vec![side_road_into(140.0), widening_main()], vec![]));
        match &errs[..] {
            [err @ ValidationError::OutsideRoad { what: "elementS", s, length, .. }] => {
                assert_eq!((*s, *length), (140.0, 100.0));
                assert_eq!(err.class(), ErrorClass::Geometric);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn end_contact_uses_last_section() {
        let next = |contact| {
            straight("N", 100.0, 0.0, 0.0, 20.0, 3)
                .with_links(links(Some(RoadLink::road("M", contact)), None))
        };
        let net = network(vec![widening_main(), next(ContactPoint::End)], vec![]);
        assert_eq!(net.resolve_lane_link("N", LaneId(-3), false).unwrap(), vec![(id("M"), LaneId(-3))]);

        // Through the start contact only lane -1 continues.
        let net = network(vec![widening_main(), next(ContactPoint::Start)], vec![]);
        assert!(net.resolve_lane_link("N", LaneId(-3), false).unwrap().is_empty());
        assert_eq!(net.resolve_lane_link("N", LaneId(-1), false).unwrap(), vec![(id("M"), LaneId(-1))]);
    }

    #[test]
    fn duplicate_road_ids_are_structural() {
        let roads = vec![
            straight("1", 0.0, 0.0, 0.0, 10.0, 1),
            straight("1", 0.0, 5.0, 0.0, 10.0, 1),
        ];
        let errs = validate(&document(roads, vec![]));
        assert!(matches!(
            &errs[..],
            [ValidationError::DuplicateId { kind: "road", scope, .. }] if scope == "document"
        ));
    }
}

// ── Junctions ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod junctions {
    use odr_core::{LaneId, ValidationError};

    use super::helpers::{document, fan_out, has, id, links, network, straight};
    use super::links::{side_road_into, widening_main};
    use crate::{
        Connection, ContactPoint, Control, Controller, ControllerRef, Junction, JunctionType, RoadLink,
        Signal, validate,
    };

    #[test]
    fn fan_out_returns_every_candidate() {
        let (roads, junction) = fan_out();
        let net = network(roads, vec![junction]);
        let targets = net.resolve_lane_link("A", LaneId(-1), true).unwrap();
        assert_eq!(targets, vec![(id("C1"), LaneId(-1)), (id("C2"), LaneId(-1))]);
        // No laneLink for the center lane.
        assert!(net.resolve_lane_link("A", LaneId(0), true).unwrap().is_empty());
        assert_eq!(net.junction("J").unwrap().connections.len(), 2);
    }

    #[test]
    fn connecting_road_must_declare_membership() {
        let (mut roads, junction) = fan_out();
        roads[2].junction = None;
        let errs = validate(&document(roads, vec![junction]));
        assert!(matches!(
            &errs[..],
            [ValidationError::JunctionMembership { road, declared: None, .. }] if road.as_str() == "C2"
        ));
    }

    #[test]
    fn direct_junction_needs_no_membership() {
        let roads = vec![
            straight("A", 0.0, 0.0, 0.0, 50.0, 2).with_links(links(None, Some(RoadLink::junction("D")))),
            straight("B", 50.0, 0.0, 0.0, 40.0, 1).with_links(links(Some(RoadLink::junction("D")), None)),
        ];
        let mut junction = Junction::new("D", vec![
            Connection::new("0", "A", "B", ContactPoint::Start).with_lane_link(-1, -1),
        ]);
        junction.kind = JunctionType::Direct;

        let net = network(roads.clone(), vec![junction.clone()]);
        assert_eq!(net.resolve_lane_link("A", LaneId(-1), true).unwrap(), vec![(id("B"), LaneId(-1))]);
        assert!(net.resolve_lane_link("A", LaneId(-2), true).unwrap().is_empty());

        junction.kind = JunctionType::Default;
        let errs = validate(&document(roads, vec![junction]));
        assert!(matches!(
            &errs[..],
            [ValidationError::JunctionMembership { road, declared: None, .. }] if road.as_str() == "B"
        ));
    }

    #[test]
    fn virtual_junction_joins_mid_road() {
        let side = side_road_into(40.0).with_junction("V");
        let mut junction = Junction::new("V", vec![
            Connection::new("0", "M", "S", ContactPoint::End).with_lane_link(-1, -1),
        ]);
        junction.kind = JunctionType::Virtual;

        let net = network(vec![widening_main(), side], vec![junction]);
        assert_eq!(net.junction("V").unwrap().kind, JunctionType::Virtual);
        assert_eq!(net.resolve_lane_link("S", LaneId(-1), true).unwrap(), vec![(id("M"), LaneId(-1))]);
    }

    #[test]
    fn lane_links_are_checked_at_both_ends() {
        let (roads, mut junction) = fan_out();
        junction.connections[0] = Connection::new("0", "A", "C1", ContactPoint::Start)
            .with_lane_link(-4, -1)
            .with_lane_link(-1, -7);
        let errs = validate(&document(roads, vec![junction]));
        assert!(has(&errs, |e| matches!(e, ValidationError::JunctionLaneLink { role: "from", lane: LaneId(-4), .. })));
        assert!(has(&errs, |e| matches!(e, ValidationError::JunctionLaneLink { role: "to", lane: LaneId(-7), .. })));
        assert_eq!(errs.len(), 2);
    }

    #[test]
    fn connection_ids_and_roads() {
        let (roads, mut junction) = fan_out();
        junction.connections.push(Connection::new("1", "A", "ghost", ContactPoint::Start));
        let errs = validate(&document(roads, vec![junction]));
        assert!(has(&errs, |e| matches!(e, ValidationError::DuplicateId { kind: "connection", .. })));
        assert!(has(&errs, |e| matches!(e, ValidationError::DanglingReference { kind: "connecting road", .. })));
    }

    #[test]
    fn controllers_and_groups_resolve() {
        let (mut roads, mut junction) = fan_out();
        roads[0].signals.push(Signal::new("sig", 45.0, -2.0));
        junction.controllers.push(ControllerRef { id: "ctl".into(), kind: None, sequence: Some(1) });
        let mut doc = document(roads, vec![junction]);
        doc.push_controller(Controller {
            id:       "ctl".into(),
            name:     None,
            sequence: None,
            controls: vec![Control { signal_id: "sig".into(), kind: None }],
        });
        assert!(validate(&doc).is_empty());

        doc.controllers[0].controls.push(Control { signal_id: "lost".into(), kind: None });
        doc.junction_groups.push(crate::JunctionGroup {
            id:        "g".into(),
            name:      None,
            kind:      crate::JunctionGroupType::Roundabout,
            junctions: vec!["J".into(), "K".into()],
        });
        let errs = validate(&doc);
        assert!(has(&errs, |e| matches!(e, ValidationError::DanglingReference { kind: "signal", .. })));
        assert!(has(&errs, |e| matches!(e, ValidationError::DanglingReference { kind: "junction", target, .. } if target == "K")));
        assert_eq!(errs.len(), 2);
    }
}

// ── Queries ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod queries {
    use odr_core::{Cubic, LaneId, PolyRecord};
    use odr_geometry::LateralProfile;
    use odr_lanes::{Lane, LaneSection, RoadLanes, RoadMark, RoadMarkType};

    use super::helpers::{driving, id, network, straight};
    use crate::{NetworkError, RoadKind, RoadType, Signal, SignalOrientation};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn out_of_range_and_unknown_road() {
        let net = network(vec![straight("1", 0.0, 0.0, 0.0, 100.0, 1)], vec![]);
        assert!(matches!(net.evaluate_geometry("1", 100.5), Err(NetworkError::OutOfRange { .. })));
        assert!(matches!(net.evaluate_geometry("1", -1.0), Err(NetworkError::OutOfRange { .. })));
        assert!(net.evaluate_geometry("1", 100.0).is_ok());
        assert_eq!(net.evaluate_geometry("2", 0.0), Err(NetworkError::UnknownRoad(id("2"))));
        assert!(matches!(
            net.lane_width_at("1", LaneId(-4), 10.0),
            Err(NetworkError::UnknownLane { lane: LaneId(-4), .. })
        ));
    }

    #[test]
    fn elevation_and_pose() {
        let mut road = straight("1", 0.0, 0.0, 0.0, 100.0, 1);
        road.elevation.records = vec![PolyRecord::new(0.0, Cubic::new(1.0, 0.02, 0.0, 0.0))];
        road.lateral.superelevation = vec![PolyRecord::new(0.0, Cubic::constant(0.05))];
        let net = network(vec![road], vec![]);

        let (z, bank) = net.evaluate_elevation("1", 50.0).unwrap();
        assert!(close(z, 2.0) && close(bank, 0.05));
        let pose = net.evaluate_pose("1", 50.0).unwrap();
        assert!(close(pose.pitch, 0.02f64.atan()) && close(pose.roll, 0.05));
    }

    #[test]
    fn lane_center_follows_bank_unless_level() {
        let mut road = straight("1", 0.0, 0.0, 0.0, 100.0, 0);
        road.lateral = LateralProfile {
            superelevation: vec![PolyRecord::new(0.0, Cubic::constant(0.1))],
            shapes:         vec![],
        };
        road.lanes = RoadLanes::from_sections(vec![LaneSection::new(0.0, vec![
            Lane::center(),
            driving(-1, 3.5),
            driving(-2, 3.5).with_level(true),
        ])]);
        let net = network(vec![road], vec![]);
        let bank = 0.1f64.tan();

        let banked = net.lane_center("1", LaneId(-1), 10.0).unwrap();
        assert!(close(banked.x, 10.0) && close(banked.y, -1.75));
        assert!(close(banked.z, -1.75 * bank) && close(banked.roll, 0.1));

        let level = net.lane_center("1", LaneId(-2), 10.0).unwrap();
        assert!(close(level.y, -5.25));
        assert!(close(level.z, -3.5 * bank) && level.roll == 0.0);

        assert_eq!(net.lane_edges("1", LaneId(-2), 10.0).unwrap(), (-3.5, -7.0));
    }

    #[test]
    fn signal_pose_and_speed_limit() {
        let mut road = straight("1", 0.0, 0.0, 0.0, 100.0, 1);
        let mut sig = Signal::new("s1", 20.0, -4.0);
        sig.z_offset = 2.0;
        sig.orientation = SignalOrientation::Minus;
        road.signals.push(sig);
        road.types.push(RoadType { s: 0.0, kind: RoadKind::Town, country: None, speed_mps: Some(13.9) });
        let net = network(vec![road], vec![]);

        let pose = net.signal_pose("1", "s1").unwrap();
        assert!(close(pose.x, 20.0) && close(pose.y, -4.0) && close(pose.z, 2.0));
        assert!(close(pose.heading, std::f64::consts::PI));
        assert!(matches!(net.signal_pose("1", "s9"), Err(NetworkError::UnknownSignal { .. })));

        assert_eq!(net.speed_limit("1", LaneId(-1), 50.0).unwrap(), Some(13.9));
    }

    #[test]
    fn road_mark_changes_along_the_lane() {
        let mut lane = driving(-1, 3.5);
        lane.road_marks = vec![
            RoadMark { kind: RoadMarkType::Solid, ..RoadMark::default() },
            RoadMark { s_offset: 30.0, kind: RoadMarkType::Broken, ..RoadMark::default() },
        ];
        let mut road = straight("1", 0.0, 0.0, 0.0, 100.0, 0);
        road.lanes = RoadLanes::from_sections(vec![LaneSection::new(0.0, vec![Lane::center(), lane])]);
        let net = network(vec![road], vec![]);

        let kind = |s| net.road_mark("1", LaneId(-1), s).unwrap().map(|m| m.kind);
        assert_eq!(kind(10.0), Some(RoadMarkType::Solid));
        assert_eq!(kind(30.0), Some(RoadMarkType::Broken));
        assert_eq!(net.road_mark("1", LaneId(0), 10.0).unwrap(), None);
    }

    #[test]
    fn spatial_queries() {
        let net = network(
            vec![
                straight("a", 0.0, 0.0, 0.0, 100.0, 1),
                straight("b", 0.0, 20.0, 0.0, 100.0, 1),
            ],
            vec![],
        );
        assert_eq!(net.nearest_road(30.0, 3.0), Some(&id("a")));
        assert_eq!(net.nearest_road(30.0, 15.0), Some(&id("b")));
        assert_eq!(net.roads_in_box([10.0, -1.0], [20.0, 1.0]), vec![&id("a")]);
        assert_eq!(net.roads_in_box([10.0, -1.0], [20.0, 30.0]), vec![&id("a"), &id("b")]);
        assert!(net.roads_in_box([200.0, 200.0], [300.0, 300.0]).is_empty());
    }

    #[test]
    fn box_beside_a_diagonal_chord_misses() {
        // Chords every 5 m: the first runs (0, 0) → (3.54, 3.54).
        let net = network(vec![straight("d", 0.0, 0.0, std::f64::consts::FRAC_PI_4, 10.0, 1)], vec![]);
        assert!(net.roads_in_box([2.5, 0.0], [3.4, 0.9]).is_empty());
        assert_eq!(net.roads_in_box([2.5, 2.5], [3.0, 3.0]), vec![&id("d")]);
        assert_eq!(net.roads_in_box([3.0, 3.0], [2.5, 2.5]), vec![&id("d")]);
    }

    #[test]
    fn cursor_matches_direct_evaluation() {
        let net = network(vec![straight("1", 3.0, 4.0, 0.7, 100.0, 1)], vec![]);
        let mut cursor = net.plan_view_cursor("1").unwrap();
        for i in 0..=10 {
            let s = f64::from(i) * 10.0;
            assert_eq!(cursor.evaluate(s).unwrap(), net.evaluate_geometry("1", s).unwrap());
        }
    }
}

// ── Objects ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod objects {
    use std::f64::consts::FRAC_PI_2;

    use odr_core::ValidationError;

    use super::helpers::{document, has, network, straight};
    use crate::{Corner, NetworkError, Outline, RoadObject, validate};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    /// Parking bay beside the road, turned across it, with one local and
    /// one road-relative outline.
    fn parking_bay() -> RoadObject {
        let mut bay = RoadObject::new("bay", 20.0, -6.0);
        bay.kind = "parkingSpace".to_owned();
        bay.hdg = FRAC_PI_2;
        bay.z_offset = 0.5;
        bay.with_outline(Outline::closed(vec![
            Corner::Local { u: 0.0, v: 0.0, z: 0.0, height: 0.0 },
            Corner::Local { u: 5.0, v: 0.0, z: 0.0, height: 0.0 },
            Corner::Local { u: 5.0, v: 2.5, z: 0.2, height: 0.0 },
        ]))
        .with_outline(Outline::closed(vec![
            Corner::Road { s: 18.0, t: -5.0, dz: 0.1, height: 1.0 },
            Corner::Road { s: 22.0, t: -7.0, dz: 0.1, height: 1.0 },
        ]))
    }

    #[test]
    fn pose_and_outlines() {
        let mut road = straight("1", 0.0, 0.0, 0.0, 100.0, 1);
        road.objects.push(parking_bay());
        let net = network(vec![road], vec![]);

        let pose = net.object_pose("1", "bay").unwrap();
        assert!(close(pose.x, 20.0) && close(pose.y, -6.0) && close(pose.z, 0.5));
        assert!(close(pose.heading, FRAC_PI_2));

        // Local u runs along the object heading, here +y.
        let local = net.object_outline("1", "bay", 0).unwrap();
        assert_eq!(local.len(), 3);
        assert!(close(local[1][0], 20.0) && close(local[1][1], -1.0) && close(local[1][2], 0.5));
        assert!(close(local[2][0], 17.5) && close(local[2][1], -1.0) && close(local[2][2], 0.7));

        let along = net.object_outline("1", "bay", 1).unwrap();
        assert!(close(along[0][0], 18.0) && close(along[0][1], -5.0) && close(along[0][2], 0.1));
        assert!(close(along[1][0], 22.0) && close(along[1][1], -7.0));

        assert!(matches!(net.object_outline("1", "bay", 2), Err(NetworkError::UnknownOutline { index: 2, .. })));
        assert!(matches!(net.object_pose("1", "kiosk"), Err(NetworkError::UnknownObject { .. })));
    }

    #[test]
    fn objects_belong_to_their_road() {
        let mut other = straight("2", 0.0, 20.0, 0.0, 100.0, 1);
        other.objects.push(parking_bay());
        let net = network(vec![straight("1", 0.0, 0.0, 0.0, 100.0, 1), other], vec![]);
        assert!(matches!(net.object_pose("1", "bay"), Err(NetworkError::UnknownObject { .. })));
        assert!(close(net.object_pose("2", "bay").unwrap().y, 14.0));
    }

    #[test]
    fn placement_dimensions_and_outlines_are_checked() {
        let mut bay = parking_bay();
        bay.s = 120.0;
        bay.height = Some(-1.0);
        bay.outlines.push(Outline::closed(vec![
            Corner::Road { s: 10.0, t: 0.0, dz: 0.0, height: 0.0 },
            Corner::Local { u: 1.0, v: 0.0, z: 0.0, height: 0.0 },
        ]));
        bay.outlines.push(Outline::default());
        let mut road = straight("1", 0.0, 0.0, 0.0, 100.0, 1);
        road.objects.push(bay);

        let errs = validate(&document(vec![road], vec![]));
        assert!(has(&errs, |e| matches!(e, ValidationError::OutsideRoad { what: "object", .. })));
        assert!(has(&errs, |e| matches!(e, ValidationError::NegativeValue { what: "height", .. })));
        assert!(has(&errs, |e| matches!(e, ValidationError::MixedCorners { outline: 2, .. })));
        assert!(has(&errs, |e| matches!(e, ValidationError::MissingElement { element: "corner", .. })));
        assert_eq!(errs.len(), 4);
        assert!(errs.iter().all(ValidationError::is_fatal));
    }

    #[test]
    fn object_ids_are_document_wide() {
        let roads: Vec<_> = ["1", "2"]
            .into_iter()
            .enumerate()
            .map(|(i, id)| {
                let mut road = straight(id, 0.0, 20.0 * i as f64, 0.0, 50.0, 1);
                road.objects.push(RoadObject::new("pole", 5.0, 3.0));
                road
            })
            .collect();
        let errs = validate(&document(roads, vec![]));
        assert!(matches!(
            &errs[..],
            [ValidationError::DuplicateId { kind: "object", scope, .. }] if scope == "document"
        ));
    }
}

// ── Serialized documents ──────────────────────────────────────────────────────

#[cfg(all(test, feature = "serde"))]
mod serialized {
    use odr_core::LaneId;

    use super::helpers::{document, straight};
    use crate::{Document, RoadKind, RoadType};

    /// A one-road document as JSON, with `edit` applied to the road.
    fn road_json(edit: impl FnOnce(&mut serde_json::Value)) -> serde_json::Value {
        let mut road = straight("1", 0.0, 0.0, 0.0, 100.0, 1);
        road.types.push(RoadType { s: 0.0, kind: RoadKind::Town, country: None, speed_mps: Some(10.0) });
        let mut value = serde_json::to_value(document(vec![road], vec![])).unwrap();
        edit(&mut value["roads"][0]);
        value
    }

    #[test]
    fn lengths_and_speeds_take_unit_suffixes() {
        let value = road_json(|road| {
            road["length"] = "0.1km".into();
            road["plan_view"][0]["length"] = "100 m".into();
            road["types"][0]["speed_mps"] = "36km/h".into();
        });
        let doc: Document = serde_json::from_value(value).unwrap();
        let net = doc.into_network().unwrap();

        let road = net.road("1").unwrap();
        assert!((road.length - 100.0).abs() < 1e-9);
        assert!((road.plan_view.total_length() - 100.0).abs() < 1e-9);
        let speed = net.speed_limit("1", LaneId(-1), 50.0).unwrap().unwrap();
        assert!((speed - 10.0).abs() < 1e-12);
    }

    #[test]
    fn plain_numbers_still_decode() {
        let doc: Document = serde_json::from_value(road_json(|_| {})).unwrap();
        assert_eq!(doc.road("1").map(|r| r.length), Some(100.0));
    }

    #[test]
    fn unknown_unit_fails_decoding() {
        let value = road_json(|road| road["length"] = "12 furlongs".into());
        let err = serde_json::from_value::<Document>(value).unwrap_err();
        assert!(err.to_string().contains("furlongs"), "{err}");
    }
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle {
    use std::sync::Arc;

    use odr_core::units::{decode_attr, parse_length};
    use odr_core::{Cubic, LaneId, PolyRecord, ValidationError};
    use odr_lanes::{Lane, LaneSection, LaneType, RoadLanes};

    use super::helpers::{document, fan_out, network, scenario_b, straight};
    use crate::{NetworkError, RoadNetwork, validate};

    #[test]
    fn network_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RoadNetwork>();
    }

    #[test]
    fn validation_is_idempotent() {
        let (mut roads, junction) = fan_out();
        roads.extend(scenario_b());
        let doc = document(roads, vec![junction]);
        let first = validate(&doc);
        assert!(first.is_empty());
        assert_eq!(validate(&doc), first);

        let net = doc.into_network().unwrap();
        assert!(validate(&net.to_document()).is_empty());
    }

    #[test]
    fn shadowed_border_is_reported_once() {
        let mut road = straight("1", 0.0, 0.0, 0.0, 50.0, 0);
        let lane = Lane::new(-1, LaneType::Driving)
            .with_border(vec![PolyRecord::new(0.0, Cubic::constant(9.0))])
            .with_width(vec![PolyRecord::new(0.0, Cubic::constant(3.5))]);
        road.lanes = RoadLanes::from_sections(vec![LaneSection::new(0.0, vec![Lane::center(), lane])]);

        let net = network(vec![road], vec![]);
        assert!(matches!(net.advisories(), [ValidationError::BorderShadowed { .. }]));
        assert_eq!(net.lane_width_at("1", LaneId(-1), 10.0).unwrap(), 3.5);
        assert!(validate(&net.to_document()).is_empty());
    }

    #[test]
    fn parse_errors_are_fatal_only_when_required() {
        let mut doc = document(vec![straight("1", 0.0, 0.0, 0.0, 50.0, 1)], vec![]);
        let width = decode_attr("road 1 lane -1", "width", "wide", false, parse_length, &mut doc.parse_errors);
        assert_eq!(width, None);
        let net = doc.clone().into_network().unwrap();
        assert_eq!(net.advisories().len(), 1);

        decode_attr("road 1", "length", "12 furlongs", true, parse_length, &mut doc.parse_errors);
        assert!(matches!(doc.into_network(), Err(NetworkError::Rejected(errs)) if errs.len() == 2));
    }

    #[test]
    fn edit_is_copy_on_write() {
        let net = network(scenario_b(), vec![]);
        let edited = net
            .edit(|doc| {
                if let Some(road) = doc.road_mut("R2") {
                    road.name = Some("renamed".to_owned());
                }
            })
            .unwrap();

        assert!(Arc::ptr_eq(&net.document().roads[0], &edited.document().roads[0]));
        assert!(!Arc::ptr_eq(&net.document().roads[1], &edited.document().roads[1]));
        assert_eq!(net.road("R2").unwrap().name, None);
        assert_eq!(edited.road("R2").unwrap().name.as_deref(), Some("renamed"));
    }

    #[test]
    fn failed_edit_leaves_snapshot_intact() {
        let net = network(scenario_b(), vec![]);
        let result = net.edit(|doc| {
            if let Some(road) = doc.road_mut("R1") {
                road.length = 80.0;
            }
        });
        assert!(matches!(
            result,
            Err(NetworkError::Rejected(errs))
                if errs.iter().any(|e| matches!(e, ValidationError::GeometryLengthMismatch { .. }))
        ));
        assert_eq!(net.road("R1").unwrap().length, 50.0);
        assert!(net.evaluate_geometry("R1", 50.0).is_ok());
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use odr_core::Pose2D;
    use odr_geometry::{GeometrySegment, PlanView};
    use odr_lanes::RoadLanes;

    use super::helpers::{document, section};
    use crate::Road;

    /// End pose of a clothoid by brute-force midpoint integration,
    /// independent of the library's evaluators.
    fn integrate(start: Pose2D, k0: f64, k1: f64, length: f64) -> Pose2D {
        const STEPS: usize = 20_000;
        let dk = (k1 - k0) / length;
        let h = length / STEPS as f64;
        let (mut x, mut y) = (start.x, start.y);
        for i in 0..STEPS {
            let p = (i as f64 + 0.5) * h;
            let theta = start.heading + k0 * p + 0.5 * dk * p * p;
            x += h * theta.cos();
            y += h * theta.sin();
        }
        Pose2D::new(x, y, start.heading + k0 * length + 0.5 * dk * length * length, k1)
    }

    fn segment_strategy() -> impl Strategy<Value = (f64, f64, f64)> {
        (1.0f64..80.0, -0.03f64..0.03, -0.03f64..0.03)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Authored waypoints (integrated independently) are reproduced at
        /// every segment boundary, poses are finite everywhere, and heading
        /// is continuous.
        #[test]
        fn chained_road_round_trips(shapes in prop::collection::vec(segment_strategy(), 1..6)) {
            let mut segments = Vec::new();
            let mut waypoints = Vec::new();
            let mut at = Pose2D::default();
            let mut s = 0.0;
            for &(length, k0, k1) in &shapes {
                segments.push(GeometrySegment::spiral(s, at.x, at.y, at.heading, length, k0, k1));
                waypoints.push((s, at));
                at = integrate(at, k0, k1, length);
                s += length;
            }
            waypoints.push((s, at));

            let road = Road::new("p", s, PlanView::new(segments), RoadLanes::from_sections(vec![section(0.0, 1)]));
            let net = document(vec![road], vec![]).into_network().unwrap();

            for &(sk, expected) in &waypoints[1..] {
                let before = net.evaluate_geometry("p", sk - 1e-9).unwrap();
                prop_assert!((before.x - expected.x).abs() < 1e-6);
                prop_assert!((before.y - expected.y).abs() < 1e-6);
                prop_assert!((before.heading - expected.heading).abs() < 1e-6);
            }
            for i in 0..=200 {
                let pose = net.evaluate_geometry("p", s * f64::from(i) / 200.0).unwrap();
                prop_assert!(pose.is_finite());
            }
        }
    }
}
