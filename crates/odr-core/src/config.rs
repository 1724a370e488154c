//! Validation tolerances.

/// Knobs for the whole-document validation pass.
///
/// Typically left at [`Default`]; applications that import noisy data may
/// relax the tolerances or opt into the continuity checks.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ValidationConfig {
    /// Relative tolerance for "lengths add up" checks (segment tiling, road
    /// length, section placement).  Scaled by `max(road length, 1 m)`.
    pub length_rel_tolerance: f64,

    /// When set, each geometry segment's authored start must lie within this
    /// many metres of the previous segment's evaluated end.
    pub continuity_tolerance_m: Option<f64>,

    /// Heading counterpart of `continuity_tolerance_m`, in radians.  Only
    /// consulted when `continuity_tolerance_m` is set.
    pub heading_tolerance_rad: f64,

    /// Sampling step (metres) used to compute road bounding boxes for the
    /// spatial index.
    pub index_sample_step_m: f64,
}

impl ValidationConfig {
    /// Absolute tolerance for a road of the given length.
    #[inline]
    pub fn length_tolerance(&self, road_length: f64) -> f64 {
        self.length_rel_tolerance * road_length.abs().max(1.0)
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            length_rel_tolerance:   1e-6,
            continuity_tolerance_m: None,
            heading_tolerance_rad:  1e-3,
            index_sample_step_m:    5.0,
        }
    }
}
