//! Planar and spatial pose types.
//!
//! All coordinates are in the document's inertial frame (metres, radians,
//! x east / y north / z up, heading counter-clockwise from +x).

use std::f64::consts::{PI, TAU};

/// Position, heading and curvature of a reference line at one s-coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose2D {
    pub x:         f64,
    pub y:         f64,
    /// Tangent direction in radians.
    pub heading:   f64,
    /// Signed curvature in 1/m (positive = turning left).
    pub curvature: f64,
}

impl Pose2D {
    #[inline]
    pub fn new(x: f64, y: f64, heading: f64, curvature: f64) -> Self {
        Self { x, y, heading, curvature }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.heading.is_finite()
            && self.curvature.is_finite()
    }

    /// The point `t` metres to the left of this pose (negative = right).
    #[inline]
    pub fn offset_lateral(&self, t: f64) -> (f64, f64) {
        let (sin, cos) = self.heading.sin_cos();
        (self.x - t * sin, self.y + t * cos)
    }

    /// Planar distance to another pose.
    #[inline]
    pub fn distance(&self, other: &Pose2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Full placement: planar pose lifted by the elevation profile and tilted by
/// superelevation.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose3D {
    pub x:       f64,
    pub y:       f64,
    pub z:       f64,
    pub heading: f64,
    /// Longitudinal slope angle, positive uphill.
    pub pitch:   f64,
    /// Bank angle (superelevation), positive = right side down.
    pub roll:    f64,
}

impl Pose3D {
    pub fn is_finite(&self) -> bool {
        [self.x, self.y, self.z, self.heading, self.pitch, self.roll]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// Wrap an angle to `(-π, π]`.
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

/// Smallest signed difference `b - a` between two headings.
#[inline]
pub fn heading_delta(a: f64, b: f64) -> f64 {
    normalize_angle(b - a)
}
