//! `tr-core`: foundational types for the `traffic_router` engine.
//!
//! This crate is a dependency of every other `tr-*` crate.  It has no `tr-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                |
//! |------------|---------------------------------------------------------|
//! | [`ids`]    | `NodeId`, `EdgeId`                                      |
//! | [`geo`]    | `GeoPoint`, haversine distance, coordinate parsing      |
//! | [`rng`]    | `SimRng` (seedable traffic RNG)                         |
//! | [`config`] | `PlannerConfig`                                         |
//! | [`error`]  | `CoreError`, `CoreResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::PlannerConfig;
pub use error::{CoreError, CoreResult};
pub use geo::{parse_waypoints, GeoPoint, EARTH_RADIUS_M};
pub use ids::{EdgeId, NodeId};
pub use rng::SimRng;
