//! Clothoid (Euler spiral) evaluation.
//!
//! Along a spiral the curvature varies linearly, `κ(t) = κ₀ + κ'·t`, so the
//! heading is quadratic, `θ(t) = κ₀·t + κ'·t²/2`, and the position is
//!
//! ```text
//! x(p) = ∫₀ᵖ cos θ(t) dt        y(p) = ∫₀ᵖ sin θ(t) dt
//! ```
//!
//! These are (generalised) Fresnel integrals.  We integrate them with
//! composite 5-point Gauss–Legendre quadrature, splitting `[0, p]` so that
//! the heading turns by at most [`MAX_HEADING_STEP`] per sub-interval.
//!
//! # Accuracy
//!
//! With ≤ 0.05 rad of turn per sub-interval the quadrature error is far
//! below 1e-12 relative for any spiral; the documented contract is the
//! looser **1e-6 relative to the segment length**, which the test suite
//! checks against closed-form arcs and lines.

use odr_core::Pose2D;

/// Largest heading change covered by a single quadrature panel.
pub const MAX_HEADING_STEP: f64 = 0.05;

/// Upper bound on panels, reached only by pathological curvatures
/// (hundreds of full turns in one segment).
const MAX_PANELS: usize = 200_000;

/// Gauss–Legendre abscissae on `[-1, 1]`.
const GL_NODES: [f64; 5] = [
    0.0,
    -0.538_469_310_105_683_1,
    0.538_469_310_105_683_1,
    -0.906_179_845_938_664,
    0.906_179_845_938_664,
];

const GL_WEIGHTS: [f64; 5] = [
    0.568_888_888_888_888_9,
    0.478_628_670_499_366_5,
    0.478_628_670_499_366_5,
    0.236_926_885_056_189_1,
    0.236_926_885_056_189_1,
];

/// Local displacement `(dx, dy)` after arc length `p` along a spiral that
/// starts at the origin heading along +x with curvature `k0` and curvature
/// rate `dk` (1/m²).
pub fn clothoid_offset(k0: f64, dk: f64, p: f64) -> (f64, f64) {
    if p <= 0.0 {
        return (0.0, 0.0);
    }
    let max_rate = k0.abs().max((k0 + dk * p).abs());
    let panels = ((max_rate * p / MAX_HEADING_STEP).ceil() as usize).clamp(1, MAX_PANELS);
    let h = p / panels as f64;
    let half = 0.5 * h;

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    for panel in 0..panels {
        let mid = (panel as f64 + 0.5) * h;
        for (node, weight) in GL_NODES.iter().zip(GL_WEIGHTS.iter()) {
            let t = mid + half * node;
            let (sin, cos) = (k0 * t + 0.5 * dk * t * t).sin_cos();
            sum_x += weight * cos;
            sum_y += weight * sin;
        }
    }
    (sum_x * half, sum_y * half)
}

/// Pose after progress `p` along a spiral segment.
///
/// `start` supplies the segment origin and initial heading; its curvature
/// field is ignored in favour of `curv_start`.
pub fn evaluate(start: &Pose2D, curv_start: f64, curv_end: f64, length: f64, p: f64) -> Pose2D {
    let dk = if length > 0.0 { (curv_end - curv_start) / length } else { 0.0 };
    let (dx, dy) = clothoid_offset(curv_start, dk, p);
    let (sin, cos) = start.heading.sin_cos();
    Pose2D {
        x:         start.x + dx * cos - dy * sin,
        y:         start.y + dx * sin + dy * cos,
        heading:   start.heading + curv_start * p + 0.5 * dk * p * p,
        curvature: curv_start + dk * p,
    }
}
