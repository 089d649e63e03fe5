//! Tests for tr-planner.

use tr_core::{GeoPoint, NodeId};
use tr_spatial::{build_index, RoadNetwork, RoadNetworkBuilder};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// A – B – C – D along the equator, 100 m per hop, no traffic.
fn line_network() -> (RoadNetwork, [NodeId; 4]) {
    let mut b = RoadNetworkBuilder::new();
    let a  = b.add_node(GeoPoint::new(0.0, 0.000));
    let bb = b.add_node(GeoPoint::new(0.0, 0.001));
    let c  = b.add_node(GeoPoint::new(0.0, 0.002));
    let d  = b.add_node(GeoPoint::new(0.0, 0.003));
    b.add_road(a, bb, 100.0);
    b.add_road(bb, c, 100.0);
    b.add_road(c, d, 100.0);
    (b.build().unwrap(), [a, bb, c, d])
}

/// `n` x `n` lattice of straight two-way roads, ~110 m spacing.
fn lattice(n: usize) -> RoadNetwork {
    let mut b = RoadNetworkBuilder::new();
    let mut ids = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            ids.push(b.add_node(GeoPoint::new(34.0 + i as f64 * 0.001, -84.6 + j as f64 * 0.001)));
        }
    }
    for i in 0..n {
        for j in 0..n {
            if i + 1 < n {
                b.add_straight_road(ids[i * n + j], ids[(i + 1) * n + j]);
            }
            if j + 1 < n {
                b.add_straight_road(ids[i * n + j], ids[i * n + j + 1]);
            }
        }
    }
    b.build().unwrap()
}

fn pos(net: &RoadNetwork, n: NodeId) -> GeoPoint {
    net.position(n)
}

// ── Waypoint ordering ─────────────────────────────────────────────────────────

#[cfg(test)]
mod ordering {
    use tr_core::GeoPoint;

    use crate::order_waypoints;

    #[test]
    fn ascending_distance_from_start() {
        let start = GeoPoint::new(0.0, 0.0);
        let wps = [GeoPoint::new(0.0, 10.0), GeoPoint::new(0.0, 2.0), GeoPoint::new(0.0, 5.0)];
        assert_eq!(
            order_waypoints(start, &wps),
            vec![GeoPoint::new(0.0, 2.0), GeoPoint::new(0.0, 5.0), GeoPoint::new(0.0, 10.0)]
        );
    }

    #[test]
    fn equal_distances_keep_input_order() {
        let start = GeoPoint::new(0.0, 0.0);
        let north = GeoPoint::new(1.0, 0.0);
        let east  = GeoPoint::new(0.0, 1.0);
        assert_eq!(order_waypoints(start, &[north, east]), vec![north, east]);
        assert_eq!(order_waypoints(start, &[east, north]), vec![east, north]);
    }

    #[test]
    fn empty_is_empty() {
        assert!(order_waypoints(GeoPoint::new(0.0, 0.0), &[]).is_empty());
    }
}

// ── find_route ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod find_route {
    use tr_core::{GeoPoint, NodeId, PlannerConfig};
    use tr_spatial::{build_index, search, Cancellation, RoadNetwork, RoadNetworkBuilder, SearchStrategy};

    use super::{line_network, pos};
    use crate::{find_route, PlanError, RoutePlanner};

    #[test]
    fn line_scenario() {
        let (net, [a, b, c, d]) = line_network();
        let idx = build_index(&net);
        let plan = find_route(&net, &idx, pos(&net, a), pos(&net, d), &[]).unwrap();
        for s in SearchStrategy::ALL {
            let r = plan.get(s);
            assert_eq!(r.strategy, s);
            assert_eq!(r.nodes, vec![a, b, c, d], "{s}");
            assert_eq!(r.total_cost, 300.0, "{s}");
            assert_eq!(r.positions, vec![pos(&net, a), pos(&net, b), pos(&net, c), pos(&net, d)]);
        }
        assert_eq!(plan.stops, vec![a, d]);
        assert!(plan.waypoints.is_empty());
    }

    #[test]
    fn no_waypoints_equals_direct_search() {
        let net = super::lattice(6);
        let idx = build_index(&net);
        let (from, to) = (NodeId(0), NodeId(35));
        let plan = find_route(&net, &idx, pos(&net, from), pos(&net, to), &[]).unwrap();
        for s in SearchStrategy::ALL {
            let direct = search(&net, s, from, to, &Cancellation::new()).unwrap();
            let r = plan.get(s);
            assert_eq!(r.segments, vec![direct.clone()]);
            assert_eq!(r.nodes, direct.nodes);
            assert_eq!(r.total_cost, direct.total_cost);
        }
    }

    #[test]
    fn waypoint_segments_are_stitched_once() {
        let (net, [a, b, c, d]) = line_network();
        let idx = build_index(&net);
        let plan = find_route(&net, &idx, pos(&net, a), pos(&net, d), &[pos(&net, c)]).unwrap();
        assert_eq!(plan.stops, vec![a, c, d]);
        for s in SearchStrategy::ALL {
            let r = plan.get(s);
            assert_eq!(r.segments.len(), 2);
            assert_eq!(r.nodes, vec![a, b, c, d]);
            assert_eq!(r.total_cost, 300.0);
            assert_eq!(r.total_length_m, 300.0);
        }
    }

    #[test]
    fn backtracking_waypoint() {
        // A → D → B: out to the end of the line and back.
        let (net, [a, b, c, d]) = line_network();
        let idx = build_index(&net);
        let plan = find_route(&net, &idx, pos(&net, a), pos(&net, b), &[pos(&net, d)]).unwrap();
        assert_eq!(plan.dijkstra.nodes, vec![a, b, c, d, c, b]);
        assert_eq!(plan.dijkstra.total_cost, 500.0);
        assert_eq!(plan.astar.nodes, plan.dijkstra.nodes);
    }

    #[test]
    fn waypoints_are_visited_nearest_first() {
        let (net, [a, b, c, d]) = line_network();
        let idx = build_index(&net);
        let plan = find_route(
            &net, &idx,
            pos(&net, a), pos(&net, d),
            &[pos(&net, c), pos(&net, b)],
        )
        .unwrap();
        assert_eq!(plan.waypoints, vec![pos(&net, b), pos(&net, c)]);
        assert_eq!(plan.stops, vec![a, b, c, d]);
        assert_eq!(plan.dijkstra.nodes, vec![a, b, c, d]);
    }

    #[test]
    fn stop_on_same_node_adds_nothing() {
        let (net, [a, b, c, d]) = line_network();
        let idx = build_index(&net);
        // Waypoint snaps to A itself.
        let near_a = GeoPoint::new(0.0, 0.0001);
        let plan = find_route(&net, &idx, pos(&net, a), pos(&net, d), &[near_a]).unwrap();
        assert_eq!(plan.stops, vec![a, a, d]);
        assert_eq!(plan.dijkstra.nodes, vec![a, b, c, d]);
        assert!(plan.dijkstra.segments[0].is_trivial());
    }

    #[test]
    fn unreachable_segment_names_endpoints() {
        // Two islands: {0, 1} and {2, 3}.
        let mut b = RoadNetworkBuilder::new();
        let n0 = b.add_node(GeoPoint::new(0.0, 0.000));
        let n1 = b.add_node(GeoPoint::new(0.0, 0.001));
        let n2 = b.add_node(GeoPoint::new(0.0, 0.010));
        let n3 = b.add_node(GeoPoint::new(0.0, 0.011));
        b.add_road(n0, n1, 100.0);
        b.add_road(n2, n3, 100.0);
        let net = b.build().unwrap();
        let idx = build_index(&net);

        // start → wp on the same island is fine; wp → end crosses over.
        let err = find_route(&net, &idx, pos(&net, n0), pos(&net, n3), &[pos(&net, n1)]).unwrap_err();
        assert_eq!(
            err,
            PlanError::NoPath { segment: 1, from: n1, to: n3, strategy: SearchStrategy::Dijkstra }
        );

        // The A* side fails on the same segment.
        let planner = RoutePlanner::new(&net, &idx).unwrap();
        let err = planner.route_segments(SearchStrategy::AStar, &[n0, n1, n3]).unwrap_err();
        assert_eq!(
            err,
            PlanError::NoPath { segment: 1, from: n1, to: n3, strategy: SearchStrategy::AStar }
        );
    }

    #[test]
    fn empty_network_not_found() {
        let net = RoadNetwork::empty();
        let idx = build_index(&net);
        let err = find_route(&net, &idx, GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0), &[]);
        assert_eq!(err, Err(PlanError::NotFound));
    }

    #[test]
    fn malformed_coordinates_rejected() {
        let (net, [a, ..]) = line_network();
        let idx = build_index(&net);
        for bad in [GeoPoint::new(f64::NAN, 0.0), GeoPoint::new(95.0, 0.0), GeoPoint::new(0.0, 200.0)] {
            assert!(matches!(
                find_route(&net, &idx, pos(&net, a), bad, &[]),
                Err(PlanError::InvalidInput(_))
            ));
            assert!(matches!(
                find_route(&net, &idx, pos(&net, a), pos(&net, a), &[bad]),
                Err(PlanError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn mismatched_index_rejected() {
        let (net, _) = line_network();
        let other = build_index(&super::lattice(3));
        assert!(matches!(RoutePlanner::new(&net, &other), Err(PlanError::InvalidInput(_))));
    }

    #[test]
    fn too_few_stops_rejected() {
        let (net, [a, ..]) = line_network();
        let idx = build_index(&net);
        let planner = RoutePlanner::new(&net, &idx).unwrap();
        assert!(matches!(
            planner.route_segments(SearchStrategy::Dijkstra, &[a]),
            Err(PlanError::InvalidInput(_))
        ));
    }

    #[test]
    fn cancellation_aborts_whole_request() {
        let (net, [a, _, _, d]) = line_network();
        let idx = build_index(&net);
        let cancel = Cancellation::new();
        cancel.cancel();
        let planner = RoutePlanner::new(&net, &idx).unwrap().with_cancellation(cancel);
        assert_eq!(planner.find_route(pos(&net, a), pos(&net, d), &[]), Err(PlanError::Cancelled));
    }

    #[test]
    fn zero_deadline_from_config_cancels() {
        let (net, [a, _, _, d]) = line_network();
        let idx = build_index(&net);
        let cfg = PlannerConfig { deadline_ms: Some(0), traffic_seed: None };
        let planner = RoutePlanner::new(&net, &idx).unwrap().with_config(&cfg);
        assert_eq!(planner.find_route(pos(&net, a), pos(&net, d), &[]), Err(PlanError::Cancelled));
    }

    #[test]
    fn deadline_restarts_per_call() {
        let net = super::lattice(4);
        let idx = build_index(&net);
        let cfg = PlannerConfig { deadline_ms: Some(200), traffic_seed: None };
        let planner = RoutePlanner::new(&net, &idx).unwrap().with_config(&cfg);
        let (s, e) = (pos(&net, NodeId(0)), pos(&net, NodeId(15)));

        assert!(planner.find_route(s, e, &[]).is_ok());
        std::thread::sleep(std::time::Duration::from_millis(250));

        // The planner outlived its first budget; later calls get a fresh one.
        assert!(planner.find_route(s, e, &[]).is_ok());
        let request = crate::RouteRequest { start: s, end: e, waypoints: vec![] };
        let batch = planner.find_routes(&[request.clone(), request.clone(), request]);
        assert!(batch.iter().all(Result::is_ok));
        assert!(planner.route_segments(SearchStrategy::AStar, &[NodeId(0), NodeId(15)]).is_ok());
    }

    #[test]
    fn explicit_cancel_still_applies_with_deadline() {
        let (net, [a, _, _, d]) = line_network();
        let idx = build_index(&net);
        let cfg = PlannerConfig { deadline_ms: Some(60_000), traffic_seed: None };
        let cancel = Cancellation::new();
        let planner = RoutePlanner::new(&net, &idx)
            .unwrap()
            .with_cancellation(cancel.clone())
            .with_config(&cfg);
        assert!(planner.find_route(pos(&net, a), pos(&net, d), &[]).is_ok());
        cancel.cancel();
        assert_eq!(planner.find_route(pos(&net, a), pos(&net, d), &[]), Err(PlanError::Cancelled));
    }

    #[test]
    fn offset_positions() {
        let (net, [a, _, _, d]) = line_network();
        let idx = build_index(&net);
        let plan = find_route(&net, &idx, pos(&net, a), pos(&net, d), &[]).unwrap();
        let shifted = plan.astar.offset(0.00001);
        assert_eq!(shifted.len(), plan.astar.positions.len());
        for (s, p) in shifted.iter().zip(&plan.astar.positions) {
            assert_eq!(*s, p.offset(0.00001));
        }
    }
}

// ── Traffic-weighted planning ─────────────────────────────────────────────────

#[cfg(test)]
mod with_traffic {
    use tr_core::{GeoPoint, NodeId};
    use tr_spatial::SearchStrategy;
    use tr_traffic::{EventLog, TrafficConfig, TrafficModel};

    use super::pos;
    use crate::{RouteRequest, Snapshot};

    fn snapshot(seed: u64) -> Snapshot {
        let model = TrafficModel::new(TrafficConfig::default()).unwrap();
        Snapshot::with_traffic(super::lattice(8), &model, Some(seed)).unwrap()
    }

    #[test]
    fn same_seed_same_plan() {
        let a = snapshot(17);
        let b = snapshot(17);
        let (s, e) = (pos(a.network(), NodeId(0)), pos(a.network(), NodeId(63)));
        let wps = [pos(a.network(), NodeId(20)), pos(a.network(), NodeId(45))];
        assert_eq!(a.find_route(s, e, &wps).unwrap(), b.find_route(s, e, &wps).unwrap());
    }

    #[test]
    fn paths_valid_and_costs_consistent() {
        for seed in 0..8 {
            let snap = snapshot(seed);
            let net = snap.network();
            let plan = snap
                .find_route(pos(net, NodeId(7)), pos(net, NodeId(56)), &[pos(net, NodeId(27))])
                .unwrap();

            for s in SearchStrategy::ALL {
                let r = plan.get(s);
                assert_eq!(r.nodes.first(), Some(&NodeId(7)));
                assert_eq!(r.nodes.last(), Some(&NodeId(56)));
                let mut cost = 0.0;
                for pair in r.nodes.windows(2) {
                    let e = net.find_edge(pair[0], pair[1]).expect("hop is not an edge");
                    cost += net.edge_cost[e.index()];
                }
                assert!((cost - r.total_cost).abs() < 1e-6);
                assert!(r.total_cost >= r.total_length_m);
            }

            // Straight roads keep the heuristic consistent, so A* matches.
            assert!(plan.dijkstra.total_cost <= plan.astar.total_cost + 1e-6);
            assert!((plan.dijkstra.total_cost - plan.astar.total_cost).abs() < 1e-6);
        }
    }

    #[test]
    fn observed_build_reports_incidents() {
        let model = TrafficModel::new(TrafficConfig::default()).unwrap();
        let mut log = EventLog::new();
        let snap = Snapshot::with_traffic_observed(super::lattice(4), &model, Some(3), &mut log).unwrap();
        let summary = log.summary.unwrap();
        assert_eq!(summary.edges, snap.network().edge_count());
        assert_eq!(summary.seed, 3);
    }

    #[test]
    fn batch_results_in_request_order() {
        let snap = snapshot(5);
        let net = snap.network();
        let requests = vec![
            RouteRequest { start: pos(net, NodeId(0)), end: pos(net, NodeId(9)), waypoints: vec![] },
            RouteRequest { start: pos(net, NodeId(63)), end: pos(net, NodeId(1)), waypoints: vec![] },
            RouteRequest {
                start:     GeoPoint::new(f64::NAN, 0.0),
                end:       pos(net, NodeId(1)),
                waypoints: vec![],
            },
        ];
        let out = snap.planner().find_routes(&requests);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].as_ref().unwrap().stops, vec![NodeId(0), NodeId(9)]);
        assert_eq!(out[1].as_ref().unwrap().stops, vec![NodeId(63), NodeId(1)]);
        assert!(out[2].is_err());
    }
}

// ── Snapshot swapping ─────────────────────────────────────────────────────────

#[cfg(test)]
mod snapshots {
    use std::sync::Arc;

    use tr_core::NodeId;
    use tr_traffic::{TrafficConfig, TrafficModel};

    use super::{line_network, pos};
    use crate::{Snapshot, SnapshotCell};

    #[test]
    fn replace_is_whole_and_old_readers_keep_theirs() {
        let (line, _) = line_network();
        let cell = SnapshotCell::new(Snapshot::new(line));
        let before = cell.load();
        assert_eq!(before.network().node_count(), 4);

        let old = cell.replace(Snapshot::new(super::lattice(5)));
        assert!(Arc::ptr_eq(&old, &before));

        let after = cell.load();
        assert_eq!(after.network().node_count(), 25);
        assert_eq!(after.index().len(), 25);
        // The old snapshot is still complete and usable.
        assert_eq!(before.index().len(), 4);
        let plan = before
            .find_route(pos(before.network(), NodeId(0)), pos(before.network(), NodeId(3)), &[])
            .unwrap();
        assert_eq!(plan.dijkstra.total_cost, 300.0);
    }

    #[test]
    fn concurrent_readers_see_consistent_snapshots() {
        let model = TrafficModel::new(TrafficConfig::default()).unwrap();
        let cell = SnapshotCell::new(Snapshot::with_traffic(super::lattice(6), &model, Some(1)).unwrap());

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..20 {
                        let snap = cell.load();
                        let net = snap.network();
                        let last = NodeId(net.node_count() as u32 - 1);
                        let plan = snap.find_route(pos(net, NodeId(0)), pos(net, last), &[]).unwrap();
                        assert_eq!(plan.dijkstra.nodes.last(), Some(&last));
                        assert_eq!(snap.index().len(), net.node_count());
                    }
                });
            }
            for seed in 2..12 {
                let size = 4 + (seed as usize % 4);
                cell.replace(Snapshot::with_traffic(super::lattice(size), &model, Some(seed)).unwrap());
            }
        });
    }
}

#[test]
fn free_function_matches_planner() {
    let (net, [a, _, _, d]) = line_network();
    let idx = build_index(&net);
    let via_fn = crate::find_route(&net, &idx, pos(&net, a), pos(&net, d), &[]).unwrap();
    let via_planner = crate::RoutePlanner::new(&net, &idx)
        .unwrap()
        .find_route(pos(&net, a), pos(&net, d), &[])
        .unwrap();
    assert_eq!(via_fn, via_planner);
}
