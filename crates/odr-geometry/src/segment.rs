//! Geometry segments: one parametric curve primitive of a plan view.

use odr_core::{Cubic, Pose2D};

use crate::spiral;

/// Curvatures below this magnitude are evaluated as straight lines.
const STRAIGHT_EPS: f64 = 1e-12;

/// Parameter range of a [`GeometryKind::ParamPoly3`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParamRange {
    /// `p ∈ [0, length]`
    #[default]
    ArcLength,
    /// `p ∈ [0, 1]`
    Normalized,
}

/// The curve primitive of a segment.  Exactly one per segment.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GeometryKind {
    Line,
    Arc {
        curvature: f64,
    },
    /// Clothoid with curvature varying linearly over the segment.
    Spiral {
        curv_start: f64,
        curv_end:   f64,
    },
    /// Lateral offset `v(u)` from the initial tangent, `u` = local progress.
    Poly3 {
        poly: Cubic,
    },
    /// Independent cubics `u(p)`, `v(p)` in the segment's local frame.
    ParamPoly3 {
        u:     Cubic,
        v:     Cubic,
        range: ParamRange,
    },
}

impl GeometryKind {
    pub fn name(&self) -> &'static str {
        match self {
            GeometryKind::Line             => "line",
            GeometryKind::Arc { .. }       => "arc",
            GeometryKind::Spiral { .. }    => "spiral",
            GeometryKind::Poly3 { .. }     => "poly3",
            GeometryKind::ParamPoly3 { .. } => "paramPoly3",
        }
    }
}

/// One `<geometry>` record: start s, start pose, length and curve kind.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeometrySegment {
    /// Road s-coordinate at which the segment starts.
    pub s:       f64,
    pub x:       f64,
    pub y:       f64,
    /// Initial heading in radians.
    pub heading: f64,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "odr_core::units::de::length"))]
    pub length:  f64,
    pub kind:    GeometryKind,
}

impl GeometrySegment {
    pub fn new(s: f64, x: f64, y: f64, heading: f64, length: f64, kind: GeometryKind) -> Self {
        Self { s, x, y, heading, length, kind }
    }

    pub fn line(s: f64, x: f64, y: f64, heading: f64, length: f64) -> Self {
        Self::new(s, x, y, heading, length, GeometryKind::Line)
    }

    pub fn arc(s: f64, x: f64, y: f64, heading: f64, length: f64, curvature: f64) -> Self {
        Self::new(s, x, y, heading, length, GeometryKind::Arc { curvature })
    }

    pub fn spiral(
        s: f64,
        x: f64,
        y: f64,
        heading: f64,
        length: f64,
        curv_start: f64,
        curv_end: f64,
    ) -> Self {
        Self::new(s, x, y, heading, length, GeometryKind::Spiral { curv_start, curv_end })
    }

    /// Road s-coordinate at which the segment ends.
    #[inline]
    pub fn end_s(&self) -> f64 {
        self.s + self.length
    }

    /// The authored start pose (curvature taken from the curve at p = 0).
    pub fn start_pose(&self) -> Pose2D {
        self.evaluate_local(0.0)
    }

    /// Pose after local progress `p = s - self.s` (not range-checked).
    pub fn evaluate_local(&self, p: f64) -> Pose2D {
        let origin = Pose2D::new(self.x, self.y, self.heading, 0.0);
        match self.kind {
            GeometryKind::Line => line(&origin, p),
            GeometryKind::Arc { curvature } => arc(&origin, curvature, p),
            GeometryKind::Spiral { curv_start, curv_end } => {
                spiral::evaluate(&origin, curv_start, curv_end, self.length, p)
            }
            GeometryKind::Poly3 { poly } => poly3(&origin, &poly, p),
            GeometryKind::ParamPoly3 { u, v, range } => {
                let param = match range {
                    ParamRange::ArcLength => p,
                    ParamRange::Normalized if self.length > 0.0 => p / self.length,
                    ParamRange::Normalized => 0.0,
                };
                param_poly3(&origin, &u, &v, param)
            }
        }
    }
}

// ── Primitive evaluators ──────────────────────────────────────────────────────

/// Rotate local `(u, v)` by the origin heading and translate.
#[inline]
fn to_global(origin: &Pose2D, u: f64, v: f64) -> (f64, f64) {
    let (sin, cos) = origin.heading.sin_cos();
    (origin.x + u * cos - v * sin, origin.y + u * sin + v * cos)
}

fn line(origin: &Pose2D, p: f64) -> Pose2D {
    let (x, y) = to_global(origin, p, 0.0);
    Pose2D::new(x, y, origin.heading, 0.0)
}

fn arc(origin: &Pose2D, k: f64, p: f64) -> Pose2D {
    if k.abs() < STRAIGHT_EPS {
        return line(origin, p);
    }
    let h0 = origin.heading;
    let h1 = h0 + k * p;
    Pose2D {
        x:         origin.x + (h1.sin() - h0.sin()) / k,
        y:         origin.y - (h1.cos() - h0.cos()) / k,
        heading:   h1,
        curvature: k,
    }
}

fn poly3(origin: &Pose2D, poly: &Cubic, u: f64) -> Pose2D {
    let v = poly.eval(u);
    let dv = poly.slope(u);
    let ddv = poly.curvature(u);
    let (x, y) = to_global(origin, u, v);
    Pose2D {
        x,
        y,
        heading:   origin.heading + dv.atan(),
        curvature: ddv / (1.0 + dv * dv).powf(1.5),
    }
}

fn param_poly3(origin: &Pose2D, u: &Cubic, v: &Cubic, p: f64) -> Pose2D {
    let (du, dv) = (u.slope(p), v.slope(p));
    let (ddu, ddv) = (u.curvature(p), v.curvature(p));
    let (x, y) = to_global(origin, u.eval(p), v.eval(p));
    let speed_sq = du * du + dv * dv;
    let (heading, curvature) = if speed_sq > 0.0 {
        (
            origin.heading + dv.atan2(du),
            (du * ddv - dv * ddu) / speed_sq.powf(1.5),
        )
    } else {
        (origin.heading, 0.0)
    };
    Pose2D { x, y, heading, curvature }
}
