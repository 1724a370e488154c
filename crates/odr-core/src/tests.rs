//! Unit tests for odr-core primitives.

#[cfg(test)]
mod ids {
    use crate::{ElementId, LaneId, RoadIdx};

    #[test]
    fn index_roundtrip() {
        let id = RoadIdx(42);
        assert_eq!(id.index(), 42);
        assert_eq!(RoadIdx::try_from(42usize).unwrap(), id);
        if let Ok(past_end) = usize::try_from(u64::from(u32::MAX) + 1) {
            assert!(RoadIdx::try_from(past_end).is_err());
        }
    }

    #[test]
    fn none_sentinel() {
        assert!(ElementId::from("-1").is_none_sentinel());
        assert!(ElementId::from("  ").is_none_sentinel());
        assert!(!ElementId::from("17").is_none_sentinel());
    }

    #[test]
    fn lane_sides() {
        assert!(LaneId(2).is_left());
        assert!(LaneId(-1).is_right());
        assert!(LaneId::CENTER.is_center());
        assert_eq!(LaneId(-3).inward(), Some(LaneId(-2)));
        assert_eq!(LaneId(1).inward(), Some(LaneId::CENTER));
        assert_eq!(LaneId::CENTER.inward(), None);
        assert_eq!(LaneId(-3).rank(), 3);
    }

    #[test]
    fn display() {
        assert_eq!(RoadIdx(7).to_string(), "RoadIdx(7)");
        assert_eq!(LaneId(-2).to_string(), "lane -2");
    }
}

#[cfg(test)]
mod geo {
    use std::f64::consts::{FRAC_PI_2, PI};

    use crate::geo::{heading_delta, normalize_angle};
    use crate::Pose2D;

    #[test]
    fn normalize_wraps() {
        assert!((normalize_angle(2.5 * PI) - FRAC_PI_2).abs() < 1e-12);
        assert!((normalize_angle(-FRAC_PI_2) + FRAC_PI_2).abs() < 1e-12);
        assert!((heading_delta(PI - 0.1, -PI + 0.1) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn lateral_offset_is_left_of_heading() {
        let pose = Pose2D::new(0.0, 0.0, 0.0, 0.0);
        let (x, y) = pose.offset_lateral(2.0);
        assert!(x.abs() < 1e-12);
        assert!((y - 2.0).abs() < 1e-12);
    }
}

#[cfg(test)]
mod poly {
    use crate::poly::{eval_records, record_index};
    use crate::{Cubic, Piecewise, PolyRecord};

    #[test]
    fn horner_eval() {
        let p = Cubic::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(p.eval(2.0), 1.0 + 4.0 + 12.0 + 32.0);
        assert_eq!(p.slope(1.0), 2.0 + 6.0 + 12.0);
        assert_eq!(p.curvature(1.0), 6.0 + 24.0);
    }

    #[test]
    fn shifted_matches_local_evaluation() {
        let p = Cubic::new(0.5, -1.0, 0.25, 0.01);
        let q = p.shifted(3.0);
        for x in [3.0, 4.5, 10.0] {
            assert!((q.eval(x) - p.eval(x - 3.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn min_on_finds_interior_minimum() {
        // (x - 2)² - 1 → minimum -1 at x = 2
        let p = Cubic::new(3.0, -4.0, 1.0, 0.0);
        let (x, v) = p.min_on(0.0, 5.0);
        assert!((x - 2.0).abs() < 1e-12);
        assert!((v + 1.0).abs() < 1e-12);
        // Outside the interval the end point wins.
        let (x, _) = p.min_on(3.0, 5.0);
        assert_eq!(x, 3.0);
    }

    #[test]
    fn records_extrapolate_before_first() {
        let recs = [
            PolyRecord::new(10.0, Cubic::constant(1.0)),
            PolyRecord::new(20.0, Cubic::new(2.0, 1.0, 0.0, 0.0)),
        ];
        assert_eq!(record_index(&recs, 0.0), Some(0));
        assert_eq!(record_index(&recs, 20.0), Some(1));
        assert_eq!(eval_records(&recs, 25.0), Some(7.0));
        assert_eq!(eval_records(&[], 1.0), None);
    }

    #[test]
    fn piecewise_difference_min() {
        let outer = [PolyRecord::new(0.0, Cubic::new(3.0, 0.1, 0.0, 0.0))];
        let inner = [
            PolyRecord::new(0.0, Cubic::constant(1.0)),
            PolyRecord::new(5.0, Cubic::constant(4.0)),
        ];
        let diff = Piecewise::from_records(&outer, 0.0, 10.0)
            .sub(&Piecewise::from_records(&inner, 0.0, 10.0));
        let (x, v) = diff.min().unwrap();
        // After s=5 the difference is 3 + 0.1·s - 4, minimal at s=5 → -0.5
        assert!((x - 5.0).abs() < 1e-12);
        assert!((v + 0.5).abs() < 1e-12);
        assert!((diff.eval(2.0).unwrap() - 2.2).abs() < 1e-12);
    }
}

#[cfg(test)]
mod units {
    use crate::units::{parse_length, parse_speed, decode_attr};
    use crate::{NonNegative, Positive};
    use crate::{CoreError, ErrorClass};

    #[test]
    fn implicit_metres() {
        assert_eq!(parse_length("12.5").unwrap(), 12.5);
        assert_eq!(parse_length(" 12.5m ").unwrap(), 12.5);
        assert_eq!(parse_length("1e3").unwrap(), 1000.0);
    }

    #[test]
    fn unit_suffixes() {
        assert_eq!(parse_length("0.3 km").unwrap(), 300.0);
        assert!((parse_length("10ft").unwrap() - 3.048).abs() < 1e-12);
        assert!((parse_speed("36km/h").unwrap() - 10.0).abs() < 1e-12);
        assert!((parse_speed("10 mph").unwrap() - 4.4704).abs() < 1e-12);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(parse_length("abc"), Err(CoreError::Number(_))));
        assert!(matches!(parse_length("3 furlong"), Err(CoreError::Unit { .. })));
        assert!(matches!(parse_length("NaN"), Err(_)));
    }

    #[test]
    fn constrained_doubles() {
        assert!(Positive::new(0.0).is_err());
        assert!(Positive::new(f64::INFINITY).is_err());
        assert_eq!(parse_length("2m").and_then(Positive::new).unwrap().get(), 2.0);
        assert_eq!(NonNegative::new(0.0).unwrap().get(), 0.0);
        assert!(NonNegative::new(-1e-3).is_err());
    }

    #[test]
    fn decode_records_parse_errors() {
        let mut sink = Vec::new();
        let ok = decode_attr("road 1", "length", "100", true, parse_length, &mut sink);
        let bad = decode_attr("road 1", "sOffset", "x", false, parse_length, &mut sink);
        assert_eq!(ok, Some(100.0));
        assert_eq!(bad, None);
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].class(), ErrorClass::Parse);
        assert!(!sink[0].is_fatal(), "optional attribute failures are non-fatal");
    }
}

#[cfg(test)]
mod validation {
    use crate::validation::is_acceptable;
    use crate::{ErrorClass, LaneId, ValidationError};

    #[test]
    fn advisory_is_not_fatal() {
        let advisory = ValidationError::BorderShadowed {
            road:    "1".into(),
            section: 0,
            lane:    LaneId(-1),
        };
        assert_eq!(advisory.class(), ErrorClass::Advisory);
        assert!(is_acceptable(&[advisory.clone()]));

        let duplicate = ValidationError::DuplicateId {
            scope: "road 1 section 0".into(),
            kind:  "lane",
            id:    "-1".into(),
        };
        assert_eq!(duplicate.class(), ErrorClass::Structural);
        assert!(!is_acceptable(&[advisory, duplicate]));
    }
}
