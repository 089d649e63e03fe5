//! Road network representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_length_m`, `edge_traffic`,
//! `edge_cost`) are sorted by source node and indexed by `EdgeId`.
//!
//! # Costs
//!
//! `edge_length_m` is the physical length supplied by the raw graph.
//! `edge_cost` is the effective cost every search minimises.  The builder
//! initialises it to the length; the traffic model in `tr-traffic` is the
//! only code that raises it.

use tr_core::{EdgeId, GeoPoint, NodeId};

use crate::{SpatialError, SpatialResult};

// ── Traffic attributes ───────────────────────────────────────────────────────

/// Simulated traffic conditions on one directed edge.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrafficState {
    /// Sampled traversal speed in km/h.
    pub speed_kmh: f64,
    pub roadblock: bool,
    pub jam:       bool,
    pub accident:  bool,
}

impl TrafficState {
    /// `true` when none of the three conditions is present.
    #[inline]
    pub fn is_clear(&self) -> bool {
        !(self.roadblock || self.jam || self.accident)
    }
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Directed road graph in CSR format.
///
/// All fields are `pub` for direct indexed access on hot paths.  Do not
/// construct directly; use [`RoadNetworkBuilder`].
#[derive(Clone, Debug)]
pub struct RoadNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Geographic position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId = position in sorted order) ──────────
    /// Source node of each edge, used to walk predecessor edges back to the
    /// search root.
    pub edge_from: Vec<NodeId>,

    /// Destination node of each edge.
    pub edge_to: Vec<NodeId>,

    /// Physical length of each edge in metres.  Always finite and > 0.
    pub edge_length_m: Vec<f64>,

    /// Sampled traffic, `None` until the traffic model has run.
    pub edge_traffic: Vec<Option<TrafficState>>,

    /// Effective traversal cost.  `>= edge_length_m` for every edge.
    pub edge_cost: Vec<f64>,
}

impl RoadNetwork {
    /// Construct an empty network with no nodes or edges.
    ///
    /// Searches against it fail with [`SpatialError::InvalidInput`] and
    /// index lookups with [`SpatialError::NotFound`].
    pub fn empty() -> Self {
        RoadNetwork {
            node_pos:       Vec::new(),
            node_out_start: vec![0],
            edge_from:      Vec::new(),
            edge_to:        Vec::new(),
            edge_length_m:  Vec::new(),
            edge_traffic:   Vec::new(),
            edge_cost:      Vec::new(),
        }
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    /// Fail with `InvalidInput` unless `node` belongs to this network.
    pub fn check_node(&self, node: NodeId) -> SpatialResult<()> {
        if self.contains(node) {
            Ok(())
        } else {
            Err(SpatialError::InvalidInput(format!(
                "{node} not in network of {} nodes",
                self.node_count()
            )))
        }
    }

    #[inline]
    pub fn position(&self, node: NodeId) -> GeoPoint {
        self.node_pos[node.index()]
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// Cheapest edge (by effective cost) from `from` to `to`, if any.
    ///
    /// Parallel edges are legal in the raw graph; searches always take the
    /// cheapest one, so this is the edge a path between the two would use.
    pub fn find_edge(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        if !self.contains(from) {
            return None;
        }
        self.out_edges(from)
            .filter(|e| self.edge_to[e.index()] == to)
            .min_by(|a, b| self.edge_cost[a.index()].total_cmp(&self.edge_cost[b.index()]))
    }

    /// Iterator over all edges in `EdgeId` order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edge_count()).map(|i| EdgeId(i as u32))
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// This is the shape in which the raw graph arrives from the external
/// acquisition layer: positioned nodes and directed edges with a physical
/// length.  `build()` validates the edges, sorts them by source node and
/// constructs the CSR arrays.
///
/// # Example
///
/// ```
/// use tr_core::GeoPoint;
/// use tr_spatial::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// let a = b.add_node(GeoPoint::new(34.02, -84.61));
/// let c = b.add_node(GeoPoint::new(34.03, -84.60));
/// b.add_road(a, c, 1_200.0);
/// let net = b.build().unwrap();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2); // bidirectional
/// ```
#[derive(Default)]
pub struct RoadNetworkBuilder {
    nodes:     Vec<GeoPoint>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:     NodeId,
    to:       NodeId,
    length_m: f64,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for the expected number of nodes and edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a road node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Add a **directed** edge from `from` to `to` of `length_m` metres.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, length_m: f64) {
        self.raw_edges.push(RawEdge { from, to, length_m });
    }

    /// Add edges in **both directions** for an undirected road segment.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, length_m: f64) {
        self.add_directed_edge(a, b, length_m);
        self.add_directed_edge(b, a, length_m);
    }

    /// Add an undirected road whose length is the great-circle distance
    /// between its endpoints.
    pub fn add_straight_road(&mut self, a: NodeId, b: NodeId) {
        let length_m = self.nodes[a.index()].distance_m(self.nodes[b.index()]);
        self.add_road(a, b, length_m);
    }

    pub fn node_pos(&self, id: NodeId) -> GeoPoint {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`RoadNetwork`].
    ///
    /// # Errors
    ///
    /// [`SpatialError::InvalidInput`] if an edge references a node that was
    /// never added, or if a length is not finite and strictly positive.
    pub fn build(self) -> SpatialResult<RoadNetwork> {
        let node_count = self.nodes.len();

        for (i, e) in self.raw_edges.iter().enumerate() {
            if e.from.index() >= node_count || e.to.index() >= node_count {
                return Err(SpatialError::InvalidInput(format!(
                    "edge #{i} {} -> {} references a missing node ({node_count} nodes)",
                    e.from, e.to
                )));
            }
            if !(e.length_m.is_finite() && e.length_m > 0.0) {
                return Err(SpatialError::InvalidInput(format!(
                    "edge #{i} {} -> {} has invalid length {}",
                    e.from, e.to, e.length_m
                )));
            }
        }

        // Stable sort keeps insertion order among a node's out-edges, which
        // fixes the discovery order seen by the searches.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_count = raw.len();
        let edge_from:     Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to:       Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_length_m: Vec<f64>    = raw.iter().map(|e| e.length_m).collect();
        let edge_cost = edge_length_m.clone();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        tracing::debug!(nodes = node_count, edges = edge_count, "road network built");

        Ok(RoadNetwork {
            node_pos: self.nodes,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_m,
            edge_traffic: vec![None; edge_count],
            edge_cost,
        })
    }
}
