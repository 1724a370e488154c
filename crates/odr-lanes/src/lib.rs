//! `odr-lanes` — lane topology of a single road.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`lane`]    | `Lane`, `LaneOutline`, `LaneType`, road marks, speed/access/height |
//! | [`section`] | `LaneSection` (lateral order, edges, exact width check)         |
//! | [`offset`]  | `LaneOffset`                                                    |
//! | [`layout`]  | `RoadLanes` (offset + s-ordered sections), `RoadEnd`            |
//! | [`error`]   | `LaneError`, `LaneResult<T>`                                    |
//!
//! Links between sections of the same road are checked here; links that
//! leave the road are resolved by `odr-network`, which knows the other
//! roads.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize`; lanes use a flat form with |
//! |         | separate `width` and `border` arrays.                        |

pub mod error;
pub mod lane;
pub mod layout;
pub mod offset;
pub mod section;


pub use error::{LaneError, LaneResult};
pub use lane::{
    AccessRule, Lane, LaneAccess, LaneChange, LaneHeight, LaneMaterial, LaneOutline, LaneRule,
    LaneSpeed, LaneType, RoadMark, RoadMarkColor, RoadMarkType,
};
pub use layout::{RoadEnd, RoadLanes};
pub use offset::LaneOffset;
pub use section::LaneSection;
