//! `odr-geometry` — reference-line geometry and longitudinal profiles.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`segment`]   | `GeometrySegment`, `GeometryKind`, `ParamRange`            |
//! | [`spiral`]    | clothoid integration (Gauss–Legendre Fresnel integrals)    |
//! | [`plan_view`] | `PlanView` (sorted segment chain), `PlanViewCursor`        |
//! | [`profile`]   | `ElevationProfile`, `LateralProfile`, `place`              |
//! | [`error`]     | `GeometryError`, `GeometryResult<T>`                       |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod plan_view;
pub mod profile;
pub mod segment;
pub mod spiral;


pub use error::{GeometryError, GeometryResult};
pub use plan_view::{PlanView, PlanViewCursor};
pub use profile::{ElevationProfile, LateralProfile, ShapeRecord};
pub use segment::{GeometryKind, GeometrySegment, ParamRange};
