//! Geometry-subsystem error type.

use thiserror::Error;

/// Errors produced by `odr-geometry` evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("s={s} is outside the reference line [{start}, {end}]")]
    OutOfRange { s: f64, start: f64, end: f64 },

    #[error("reference line has no geometry segments")]
    Empty,
}

pub type GeometryResult<T> = Result<T, GeometryError>;
