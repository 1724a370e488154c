//! Network-subsystem error type.

use thiserror::Error;

use odr_core::{CoreError, ElementId, LaneId, ValidationError};
use odr_geometry::GeometryError;
use odr_lanes::LaneError;

/// Errors produced by `odr-network` queries and snapshot construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetworkError {
    #[error("road {0} not found in network")]
    UnknownRoad(ElementId),

    #[error("junction {0} not found in network")]
    UnknownJunction(ElementId),

    #[error("signal {signal} not found on road {road}")]
    UnknownSignal { road: ElementId, signal: ElementId },

    #[error("object {object} not found on road {road}")]
    UnknownObject { road: ElementId, object: ElementId },

    #[error("object {object} has no outline {index}")]
    UnknownOutline { object: ElementId, index: usize },

    #[error("road {road}: {lane} not found at s={s}")]
    UnknownLane { road: ElementId, lane: LaneId, s: f64 },

    #[error("road {road}: s={s} outside [0, {length}]")]
    OutOfRange { road: ElementId, s: f64, length: f64 },

    /// The document has fatal validation errors; the full list is attached.
    #[error("document rejected with {} fatal validation error(s)", .0.iter().filter(|e| e.is_fatal()).count())]
    Rejected(Vec<ValidationError>),

    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("lane error: {0}")]
    Lane(#[from] LaneError),

    #[error("core error: {0}")]
    Core(#[from] CoreError),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
