//! Shared Kennesaw, GA road network definition.
//!
//! A synthetic downtown grid centred on (34.0234, -84.6155).  Both `city`
//! (the planner) and `export_nodes` (the sidecar) call this.

use tr_core::{GeoPoint, NodeId};
use tr_spatial::{RoadNetwork, RoadNetworkBuilder, SpatialResult};

pub const CENTRE: GeoPoint = GeoPoint { lat: 34.0234, lon: -84.6155 };

/// Blocks per side.
const GRID: usize = 12;

/// Block spacing in degrees (~220 m north-south).
const STEP_DEG: f64 = 0.002;

/// Build the grid.
///
/// Every block edge is a two-way street with its straight-line length,
/// except row 3 (one-way eastbound) and column 8 (one-way southbound).
/// A diagonal arterial runs from the south-west corner to the centre.
///
/// Returns `(network, [south_west, north_east, centre])`.
pub fn build_network() -> SpatialResult<(RoadNetwork, [NodeId; 3])> {
    let mut b = RoadNetworkBuilder::with_capacity(GRID * GRID, 4 * GRID * GRID);
    let half = (GRID as f64 - 1.0) / 2.0;

    let mut ids = vec![[NodeId::INVALID; GRID]; GRID];
    for (i, row) in ids.iter_mut().enumerate() {
        for (j, id) in row.iter_mut().enumerate() {
            *id = b.add_node(GeoPoint::new(
                CENTRE.lat + (i as f64 - half) * STEP_DEG,
                CENTRE.lon + (j as f64 - half) * STEP_DEG,
            ));
        }
    }

    for i in 0..GRID {
        for j in 0..GRID {
            if j + 1 < GRID {
                let (a, c) = (ids[i][j], ids[i][j + 1]);
                if i == 3 {
                    let len = b.node_pos(a).distance_m(b.node_pos(c));
                    b.add_directed_edge(a, c, len);
                } else {
                    b.add_straight_road(a, c);
                }
            }
            if i + 1 < GRID {
                let (a, c) = (ids[i][j], ids[i + 1][j]);
                if j == 8 {
                    let len = b.node_pos(a).distance_m(b.node_pos(c));
                    b.add_directed_edge(c, a, len);
                } else {
                    b.add_straight_road(a, c);
                }
            }
        }
    }

    // Arterial: a straight diagonal along (k, k).
    let mid = GRID / 2;
    for k in 0..mid {
        b.add_straight_road(ids[k][k], ids[k + 1][k + 1]);
    }

    let net = b.build()?;
    Ok((net, [ids[0][0], ids[GRID - 1][GRID - 1], ids[mid][mid]]))
}
