//! `odr-network` — road linkage graph, junctions, validation and the
//! queryable road network.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`document`] | `Document` (unvalidated tree, `Arc`-shared roads/junctions)   |
//! | [`road`]     | `Road`, `RoadType`, `Signal`, `TrafficRule`                   |
//! | [`link`]     | `RoadLink`, `RoadLinks`, `ContactPoint`, `Attachment`         |
//! | [`object`]   | `RoadObject`, `Outline`, `Corner`                             |
//! | [`junction`] | `Junction`, `Connection`, `Controller`, `JunctionGroup`       |
//! | [`header`]   | `Header`, `Bounds`                                            |
//! | [`registry`] | `Registry` (FxHashMap id → arena index)                       |
//! | [`validate`] | `validate`, `validate_with` (whole-document pass)             |
//! | [`resolve`]  | lane-link resolution across road ends                         |
//! | [`network`]  | `RoadNetwork` (validated snapshot, R-tree, query API)         |
//! | [`error`]    | `NetworkError`, `NetworkResult<T>`                            |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                       |
//! |------------|--------------------------------------------------------------|
//! | `parallel` | Runs per-road validation on Rayon's thread pool.             |
//! | `serde`    | Derives `Serialize`/`Deserialize` on public types.           |

pub mod document;
pub mod error;
pub mod header;
pub mod junction;
pub mod link;
pub mod network;
pub mod object;
pub mod registry;
pub mod resolve;
pub mod road;
pub mod validate;

#[cfg(test)]
mod tests;

pub use document::Document;
pub use error::{NetworkError, NetworkResult};
pub use header::{Bounds, Header};
pub use junction::{
    Connection, Control, Controller, ControllerRef, Junction, JunctionGroup, JunctionGroupType,
    JunctionType, LaneLinkPair, Priority,
};
pub use link::{Attachment, ContactPoint, ElementDir, ElementType, RoadLink, RoadLinks};
pub use network::RoadNetwork;
pub use object::{Corner, Outline, RoadObject};
pub use registry::Registry;
pub use road::{Road, RoadKind, RoadType, Signal, SignalOrientation, TrafficRule};
pub use validate::{validate, validate_with};
