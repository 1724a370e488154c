//! `odr-core` — foundational types for the OpenDRIVE road-network workspace.
//!
//! This crate is a dependency of every other `odr-*` crate.  It has no
//! `odr-*` dependencies and minimal external ones (`thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `ElementId`, `LaneId`, `RoadIdx`, `JunctionIdx`           |
//! | [`geo`]         | `Pose2D`, `Pose3D`, angle helpers                         |
//! | [`poly`]        | `Cubic`, `PolyRecord`, `Piecewise`                        |
//! | [`units`]       | length/speed parsing, `NonNegative`, `Positive`           |
//! | [`validation`]  | `ValidationError`, `ErrorClass`                           |
//! | [`config`]      | `ValidationConfig`                                        |
//! | [`extension`]   | `Extension` (include / userData / dataQuality)            |
//! | [`error`]       | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod extension;
pub mod geo;
pub mod ids;
pub mod poly;
pub mod units;
pub mod validation;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::ValidationConfig;
pub use error::{CoreError, CoreResult};
pub use extension::{Extension, Extensions};
pub use geo::{Pose2D, Pose3D};
pub use ids::{ElementId, JunctionIdx, LaneId, RoadIdx};
pub use poly::{Cubic, Piecewise, PolyRecord};
pub use units::{NonNegative, Positive};
pub use validation::{ErrorClass, ValidationError};
