//! Validation error taxonomy.
//!
//! Validation is a single whole-document pass that accumulates every
//! problem instead of stopping at the first.  Each [`ValidationError`]
//! belongs to one [`ErrorClass`]; any fatal error rejects the document.
//!
//! | Class         | Meaning                                   | Fatal             |
//! |---------------|-------------------------------------------|-------------------|
//! | `Parse`       | malformed literal at the decoding boundary| only if required  |
//! | `Structural`  | missing/duplicated child or attribute     | yes               |
//! | `Referential` | id that does not resolve                  | yes               |
//! | `Geometric`   | segments/sections don't tile, width < 0   | yes               |
//! | `Advisory`    | tolerated oddity, normalised on load      | no                |

use std::fmt;

use thiserror::Error;

use crate::{ElementId, LaneId};

/// Coarse category of a [`ValidationError`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorClass {
    Parse,
    Structural,
    Referential,
    Geometric,
    Advisory,
}

impl ErrorClass {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorClass::Parse       => "parse",
            ErrorClass::Structural  => "structural",
            ErrorClass::Referential => "referential",
            ErrorClass::Geometric   => "geometric",
            ErrorClass::Advisory    => "advisory",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One problem found while validating a document.
#[derive(Clone, Debug, PartialEq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ValidationError {
    // ── Parse ─────────────────────────────────────────────────────────────
    #[error("{entity}: cannot decode {attribute} = {value:?}: {reason}")]
    Parse {
        entity:    String,
        attribute: &'static str,
        value:     String,
        reason:    String,
        required:  bool,
    },

    // ── Structural ────────────────────────────────────────────────────────
    #[error("{entity}: missing required {element}")]
    MissingElement {
        entity:  String,
        element: &'static str,
    },

    #[error("{scope}: duplicate {kind} id {id:?}")]
    DuplicateId {
        scope: String,
        kind:  &'static str,
        id:    String,
    },

    #[error("road {road} section {section}: no center lane")]
    MissingCenterLane { road: ElementId, section: usize },

    #[error("road {road} section {section}: {side} lanes skip {missing}")]
    LaneIdGap {
        road:    ElementId,
        section: usize,
        side:    &'static str,
        missing: LaneId,
    },

    #[error("road {road} object {object}: outline {outline} mixes road and local corners")]
    MixedCorners {
        road:    ElementId,
        object:  ElementId,
        outline: usize,
    },

    #[error("document: {count} {kind}s exceed the index range")]
    TooManyElements { kind: &'static str, count: usize },

    #[error("road {road}: {end} link to road {target} has no contact point")]
    MissingContactPoint {
        road:   ElementId,
        end:    &'static str,
        target: ElementId,
    },

    // ── Geometric ─────────────────────────────────────────────────────────
    #[error("{entity}: {what} must be > 0, got {value}")]
    NonPositiveLength {
        entity: String,
        what:   &'static str,
        value:  f64,
    },

    #[error("{entity}: {what} must be >= 0, got {value}")]
    NegativeValue {
        entity: String,
        what:   &'static str,
        value:  f64,
    },

    #[error("road {road}: geometry covers {actual} m but road length is {declared} m")]
    GeometryLengthMismatch {
        road:     ElementId,
        declared: f64,
        actual:   f64,
    },

    #[error("road {road}: geometry {segment} starts at s={actual}, expected s={expected}")]
    GeometryGap {
        road:     ElementId,
        segment:  usize,
        expected: f64,
        actual:   f64,
    },

    #[error("road {road}: geometry {segment} is {gap_m} m / {heading_gap} rad off the previous segment's end")]
    GeometryDiscontinuity {
        road:        ElementId,
        segment:     usize,
        gap_m:       f64,
        heading_gap: f64,
    },

    #[error("road {road}: lane section {section} at s={s} {reason}")]
    SectionOutOfOrder {
        road:    ElementId,
        section: usize,
        s:       f64,
        reason:  &'static str,
    },

    #[error("{entity}: {what} record {index} is out of order")]
    RecordOrder {
        entity: String,
        what:   &'static str,
        index:  usize,
    },

    #[error("road {road} section {section} {lane}: width {width} < 0 at s={s}")]
    NegativeWidth {
        road:    ElementId,
        section: usize,
        lane:    LaneId,
        s:       f64,
        width:   f64,
    },

    #[error("{entity}: {what} at s={s} lies outside [0, {length}]")]
    OutsideRoad {
        entity: String,
        what:   &'static str,
        s:      f64,
        length: f64,
    },

    // ── Referential ───────────────────────────────────────────────────────
    #[error("{from}: {kind} {target:?} does not exist")]
    DanglingReference {
        from:   String,
        kind:   &'static str,
        target: String,
    },

    #[error("road {road} section {section} {lane}: {direction} {target_lane} not found on road {target_road}")]
    DanglingLaneLink {
        road:        ElementId,
        section:     usize,
        lane:        LaneId,
        direction:   &'static str,
        target_road: ElementId,
        target_lane: LaneId,
    },

    #[error("road {road} {lane}: {direction} link declared at an unlinked road end")]
    LaneLinkAtOpenEnd {
        road:      ElementId,
        lane:      LaneId,
        direction: &'static str,
    },

    #[error("junction {junction} connection {connection}: road {road} declares junction {declared:?}")]
    JunctionMembership {
        junction:   ElementId,
        connection: ElementId,
        road:       ElementId,
        declared:   Option<ElementId>,
    },

    #[error("junction {junction} connection {connection}: laneLink {role} {lane} not found on road {road}")]
    JunctionLaneLink {
        junction:   ElementId,
        connection: ElementId,
        road:       ElementId,
        lane:       LaneId,
        role:       &'static str,
    },

    // ── Advisory ──────────────────────────────────────────────────────────
    #[error("road {road} section {section} {lane}: border records ignored, width takes precedence")]
    BorderShadowed {
        road:    ElementId,
        section: usize,
        lane:    LaneId,
    },
}

impl ValidationError {
    pub fn class(&self) -> ErrorClass {
        use ValidationError::*;
        match self {
            Parse { .. } => ErrorClass::Parse,
            MissingElement { .. }
            | DuplicateId { .. }
            | MissingCenterLane { .. }
            | LaneIdGap { .. }
            | TooManyElements { .. }
            | MixedCorners { .. }
            | MissingContactPoint { .. } => ErrorClass::Structural,
            NonPositiveLength { .. }
            | NegativeValue { .. }
            | GeometryLengthMismatch { .. }
            | GeometryGap { .. }
            | GeometryDiscontinuity { .. }
            | SectionOutOfOrder { .. }
            | RecordOrder { .. }
            | NegativeWidth { .. }
            | OutsideRoad { .. } => ErrorClass::Geometric,
            DanglingReference { .. }
            | DanglingLaneLink { .. }
            | LaneLinkAtOpenEnd { .. }
            | JunctionMembership { .. }
            | JunctionLaneLink { .. } => ErrorClass::Referential,
            BorderShadowed { .. } => ErrorClass::Advisory,
        }
    }

    /// `true` if this error alone makes the document unusable.
    pub fn is_fatal(&self) -> bool {
        match self {
            ValidationError::Parse { required, .. } => *required,
            other => other.class() != ErrorClass::Advisory,
        }
    }
}

/// `true` if none of `errors` is fatal.
pub fn is_acceptable(errors: &[ValidationError]) -> bool {
    !errors.iter().any(ValidationError::is_fatal)
}
