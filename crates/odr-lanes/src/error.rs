//! Lane-subsystem error type.

use thiserror::Error;

use odr_core::LaneId;

/// Errors produced by lane queries in `odr-lanes`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LaneError {
    #[error("s={s} lies outside lane section [{start}, {end}]")]
    OutOfSection { s: f64, start: f64, end: f64 },

    #[error("{0} not found in lane section")]
    UnknownLane(LaneId),

    #[error("lane section index {index} out of range ({count} sections)")]
    SectionIndex { index: usize, count: usize },

    #[error("road has no lane sections")]
    NoSections,
}

pub type LaneResult<T> = Result<T, LaneError>;
