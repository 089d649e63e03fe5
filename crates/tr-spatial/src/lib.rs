//! `tr-spatial`: road network, nearest-node indexing, and path search.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `RoadNetwork` (CSR), `RoadNetworkBuilder`, `TrafficState`  |
//! | [`index`]   | `GraphIndex` (R-tree + linear reference), `nearest_node`   |
//! | [`router`]  | `Router`, `SearchStrategy`, `SearchResult`, `search`       |
//! | [`cancel`]  | `Cancellation`                                             |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod cancel;
pub mod error;
pub mod index;
pub mod network;
pub mod router;


pub use cancel::Cancellation;
pub use error::{SpatialError, SpatialResult};
pub use index::{build_index, nearest_node, GraphIndex};
pub use network::{RoadNetwork, RoadNetworkBuilder, TrafficState};
pub use router::{search, AStarRouter, DijkstraRouter, Router, SearchResult, SearchStrategy};
