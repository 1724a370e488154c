//! Road objects: static features placed beside or on a road (poles,
//! barriers, parking spaces, buildings), optionally described by outlines.
//!
//! An outline is a polygon of corners.  Corners come in two kinds, and one
//! outline uses one kind throughout:
//!
//! | Kind    | Coordinates                                             |
//! |---------|---------------------------------------------------------|
//! | `Road`  | road `(s, t)`, `dz` above the road surface at that point |
//! | `Local` | `(u, v, z)` in the object's frame: `u` along its heading |

use odr_core::{ElementId, NonNegative, ValidationConfig, ValidationError};

use crate::road::SignalOrientation;

/// One outline corner.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Corner {
    Road { s: f64, t: f64, dz: f64, height: f64 },
    Local { u: f64, v: f64, z: f64, height: f64 },
}

impl Corner {
    pub fn height(&self) -> f64 {
        match *self {
            Corner::Road { height, .. } | Corner::Local { height, .. } => height,
        }
    }

    pub fn is_road(&self) -> bool {
        matches!(self, Corner::Road { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Outline {
    pub id:      Option<u32>,
    /// Last corner connects back to the first.
    pub closed:  bool,
    pub corners: Vec<Corner>,
}

impl Outline {
    pub fn closed(corners: Vec<Corner>) -> Self {
        Self { id: None, closed: true, corners }
    }
}

/// `<object>` record.  Dimensions are optional; an object with outlines
/// takes its shape from them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadObject {
    pub id:          ElementId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name:        Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind:        String,
    pub s:           f64,
    pub t:           f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub z_offset:    f64,
    /// Heading relative to the reference line, radians.
    #[cfg_attr(feature = "serde", serde(default))]
    pub hdg:         f64,
    /// Traffic direction the object applies to.
    #[cfg_attr(feature = "serde", serde(default))]
    pub orientation: SignalOrientation,
    #[cfg_attr(feature = "serde", serde(default))]
    pub length:      Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub width:       Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub height:      Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub radius:      Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub outlines:    Vec<Outline>,
}

impl RoadObject {
    pub fn new(id: impl Into<ElementId>, s: f64, t: f64) -> Self {
        Self {
            id: id.into(),
            name: None,
            kind: String::new(),
            s,
            t,
            z_offset: 0.0,
            hdg: 0.0,
            orientation: SignalOrientation::Both,
            length: None,
            width: None,
            height: None,
            radius: None,
            outlines: Vec::new(),
        }
    }

    pub fn with_outline(mut self, outline: Outline) -> Self {
        self.outlines.push(outline);
        self
    }

    /// Placement, dimensions and outline checks against a road of length
    /// `road_length`.
    pub fn check(
        &self,
        road:        &ElementId,
        road_length: f64,
        cfg:         &ValidationConfig,
        out:         &mut Vec<ValidationError>,
    ) {
        let entity = || format!("road {road} object {}", self.id);
        let slack = cfg.length_tolerance(road_length);
        let on_road = |s: f64| s >= -slack && s <= road_length + slack;

        if !on_road(self.s) {
            out.push(ValidationError::OutsideRoad {
                entity: entity(),
                what:   "object",
                s:      self.s,
                length: road_length,
            });
        }

        let dims = [("length", self.length), ("width", self.width), ("height", self.height), ("radius", self.radius)];
        for (what, value) in dims {
            if let Some(value) = value.filter(|&v| NonNegative::new(v).is_err()) {
                out.push(ValidationError::NegativeValue { entity: entity(), what, value });
            }
        }

        for (i, outline) in self.outlines.iter().enumerate() {
            let scope = || format!("road {road} object {} outline {i}", self.id);
            let Some(first) = outline.corners.first() else {
                out.push(ValidationError::MissingElement { entity: scope(), element: "corner" });
                continue;
            };
            if outline.corners.iter().any(|c| c.is_road() != first.is_road()) {
                out.push(ValidationError::MixedCorners {
                    road:    road.clone(),
                    object:  self.id.clone(),
                    outline: i,
                });
            }
            for corner in &outline.corners {
                if NonNegative::new(corner.height()).is_err() {
                    out.push(ValidationError::NegativeValue {
                        entity: scope(),
                        what:   "corner height",
                        value:  corner.height(),
                    });
                }
                if let Corner::Road { s, .. } = *corner {
                    if !on_road(s) {
                        out.push(ValidationError::OutsideRoad {
                            entity: scope(),
                            what:   "cornerRoad",
                            s,
                            length: road_length,
                        });
                    }
                }
            }
        }
    }
}
