//! Nearest-node spatial index.
//!
//! Positions are projected once, at build time, onto a local equirectangular
//! plane (metres) around the mean latitude of the network.  Both the R-tree
//! query and the linear reference scan measure squared distance in that
//! plane with the same function, so they agree exactly; ties go to the
//! lowest `NodeId`.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use tr_core::{GeoPoint, NodeId};

use crate::network::RoadNetwork;
use crate::{SpatialError, SpatialResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct NodeEntry {
    point: [f64; 2], // [north_m, east_m]
    id:    NodeId,
}

#[inline]
fn dist_2(a: &[f64; 2], b: &[f64; 2]) -> f64 {
    let dy = a[0] - b[0];
    let dx = a[1] - b[1];
    dy * dy + dx * dx
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        dist_2(&self.point, point)
    }
}

// ── GraphIndex ────────────────────────────────────────────────────────────────

/// Maps arbitrary positions to the nearest node of one [`RoadNetwork`].
///
/// Built once per network and immutable afterwards; it is `Send + Sync`
/// and can be shared by concurrent route requests.
#[derive(Debug)]
pub struct GraphIndex {
    ref_lat: f64,
    /// Projected node positions indexed by `NodeId` (linear scan).
    points:  Vec<[f64; 2]>,
    tree:    RTree<NodeEntry>,
}

/// Build the spatial index for `network`.  O(N log N) bulk load.
pub fn build_index(network: &RoadNetwork) -> GraphIndex {
    GraphIndex::new(network)
}

/// Free-function form of [`GraphIndex::nearest_node`].
pub fn nearest_node(index: &GraphIndex, pos: GeoPoint) -> SpatialResult<NodeId> {
    index.nearest_node(pos)
}

impl GraphIndex {
    pub fn new(network: &RoadNetwork) -> Self {
        let n = network.node_count();
        let ref_lat = if n == 0 {
            0.0
        } else {
            network.node_pos.iter().map(|p| p.lat).sum::<f64>() / n as f64
        };

        let points: Vec<[f64; 2]> =
            network.node_pos.iter().map(|p| p.project(ref_lat)).collect();

        let entries: Vec<NodeEntry> = points
            .iter()
            .enumerate()
            .map(|(i, &point)| NodeEntry { point, id: NodeId(i as u32) })
            .collect();

        GraphIndex { ref_lat, points, tree: RTree::bulk_load(entries) }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn query_point(&self, pos: GeoPoint) -> SpatialResult<[f64; 2]> {
        if !(pos.lat.is_finite() && pos.lon.is_finite()) {
            return Err(SpatialError::InvalidInput(format!("query position {pos} is not finite")));
        }
        if self.is_empty() {
            return Err(SpatialError::NotFound);
        }
        Ok(pos.project(self.ref_lat))
    }

    /// Return the node nearest to `pos` (R-tree query).
    ///
    /// # Errors
    ///
    /// [`SpatialError::NotFound`] on an empty index,
    /// [`SpatialError::InvalidInput`] for a non-finite position.
    pub fn nearest_node(&self, pos: GeoPoint) -> SpatialResult<NodeId> {
        let q = self.query_point(pos)?;

        // The iterator yields in non-decreasing distance; collect the run of
        // equal-distance entries and keep the smallest id.
        let mut iter = self.tree.nearest_neighbor_iter_with_distance_2(&q);
        let (first, best) = iter.next().ok_or(SpatialError::NotFound)?;
        let id = iter
            .take_while(|(_, d)| *d <= best)
            .map(|(e, _)| e.id)
            .fold(first.id, NodeId::min);
        Ok(id)
    }

    /// O(N) reference implementation of [`nearest_node`](Self::nearest_node).
    pub fn nearest_node_linear(&self, pos: GeoPoint) -> SpatialResult<NodeId> {
        let q = self.query_point(pos)?;

        let mut best: Option<(f64, usize)> = None;
        for (i, p) in self.points.iter().enumerate() {
            let d = dist_2(p, &q);
            // Strict `<` keeps the earlier (lower) id on ties.
            if best.is_none_or(|(bd, _)| d < bd) {
                best = Some((d, i));
            }
        }
        best.map(|(_, i)| NodeId(i as u32)).ok_or(SpatialError::NotFound)
    }
}
