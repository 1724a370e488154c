//! Core error type.
//!
//! Sub-crates define their own error enums (`GeometryError`, `LaneError`,
//! `NetworkError`) and wrap `CoreError` via `From` where a decoding-boundary
//! failure can surface through them.

use thiserror::Error;

/// Errors produced by the decoding-boundary helpers in `odr-core`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("malformed number {0:?}")]
    Number(String),

    #[error("unknown unit {unit:?} in {value:?}")]
    Unit { value: String, unit: String },

    #[error("value {value} must be {constraint}")]
    Constraint {
        value:      f64,
        constraint: &'static str,
    },
}

/// Shorthand result type for `odr-core`.
pub type CoreResult<T> = Result<T, CoreError>;
