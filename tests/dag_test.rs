//! DAG Integration Tests
//!
//! Tests for DAG construction, validation, ordering and phase splitting
//! through the public API only.

mod common;

use common::{dag, ids, init_tracing, load_connections, positions, set};
use pretty_assertions::assert_eq;
use stagegraph::test_fixtures::{self, DIAMOND, JOIN_AND_BRANCH, PURE_CYCLE, TRIANGLE, TWO_ISLANDS};
use stagegraph::{Connection, Dag, DagError, FixSuggestion, NodeId, TieBreak};

// ═══════════════════════════════════════════════════════════════
// INTEGRATION TESTS: Construction
// ═══════════════════════════════════════════════════════════════

#[test]
fn test_triangle_sources_sinks_and_order() {
    init_tracing();
    let dag = dag(&[("A", "B"), ("B", "C"), ("A", "C")]);

    assert_eq!(dag.sources(), vec!["A"]);
    assert_eq!(dag.sinks(), vec!["C"]);
    assert_eq!(dag.linearize().unwrap(), vec!["A", "B", "C"]);
    assert_eq!(dag.reachable_from("A"), set(&["A", "B", "C"]));
}

#[test]
fn test_pure_cycle_reports_every_stage() {
    let err = Dag::from_connections([("A", "B"), ("B", "C"), ("C", "A")]).unwrap_err();

    assert!(err.is_cycle());
    assert_eq!(err.cycle_nodes(), Some(ids(&["A", "B", "C"]).as_slice()));
    assert_eq!(err.fix_suggestion(), Some("Remove cycles from the graph"));
}

#[test]
fn test_disjoint_edge_sets_are_islands() {
    let err = Dag::from_connections([("A", "B"), ("C", "D")]).unwrap_err();

    assert!(matches!(err, DagError::Island { .. }));
    assert_eq!(err.code(), "DAG-005");
    assert_eq!(err.island_nodes(), Some(ids(&["A", "B"]).as_slice()));
}

#[test]
fn test_empty_connection_list() {
    let err = Dag::from_connections(Vec::<Connection>::new()).unwrap_err();
    assert_eq!(err, DagError::Empty);
}

#[test]
fn test_fixture_tables() {
    for edges in [TRIANGLE, DIAMOND, JOIN_AND_BRANCH] {
        let dag = Dag::from_connections(test_fixtures::connections(edges)).unwrap();
        assert!(!dag.sources().is_empty());
        assert!(!dag.sinks().is_empty());
    }
    for edges in [PURE_CYCLE, TWO_ISLANDS] {
        assert!(Dag::from_connections(edges.iter().copied()).is_err());
    }
}

#[test]
fn test_etl_pipeline_from_yaml() {
    init_tracing();
    let dag = Dag::from_connections(load_connections("etl_pipeline.yaml")).unwrap();

    assert_eq!(dag.len(), 6);
    assert_eq!(dag.sources(), vec!["extract_customers", "extract_orders"]);
    assert_eq!(dag.sinks(), vec!["report"]);
    assert_eq!(
        dag.linearize().unwrap(),
        vec!["extract_customers", "extract_orders", "join", "validate", "store", "report"]
    );
}

#[test]
fn test_etl_pipeline_insertion_order() {
    let dag = Dag::from_connections_with(
        load_connections("etl_pipeline.yaml"),
        TieBreak::InsertionOrder,
    )
    .unwrap();

    assert_eq!(dag.sources(), vec!["extract_orders", "extract_customers"]);
    assert_eq!(
        dag.linearize().unwrap(),
        vec!["extract_orders", "extract_customers", "join", "validate", "store", "report"]
    );
}

#[test]
fn test_cyclic_pipeline_from_yaml() {
    let err = Dag::from_connections(load_connections("cyclic_pipeline.yaml")).unwrap_err();

    assert_eq!(
        err,
        DagError::CycleDetected {
            nodes: ids(&["enrich", "publish", "score"])
        }
    );
    assert_eq!(
        err.to_string(),
        "[DAG-004] Invalid DAG. Stages enrich,publish,score form a cycle."
    );
}

// ═══════════════════════════════════════════════════════════════
// INTEGRATION TESTS: Ordering
// ═══════════════════════════════════════════════════════════════

#[test]
fn test_linearize_respects_every_edge() {
    let dag = Dag::from_connections(test_fixtures::layered(4, 3)).unwrap();
    let order = dag.linearize().unwrap();
    let position = positions(&order);

    assert_eq!(order.len(), dag.len());
    for Connection { from, to } in dag.connections() {
        assert!(position[from.as_str()] < position[to.as_str()], "{from} before {to}");
    }
}

#[test]
fn test_linearize_is_reproducible() {
    let edges = test_fixtures::fan_out_in(20);
    let first = Dag::from_connections(edges.clone()).unwrap().linearize().unwrap();
    let mut reversed = edges;
    reversed.reverse();
    let second = Dag::from_connections(reversed).unwrap().linearize().unwrap();

    assert_eq!(first, second);
}

// ═══════════════════════════════════════════════════════════════
// INTEGRATION TESTS: Phase splitting
// ═══════════════════════════════════════════════════════════════

#[test]
fn test_subset_matches_reachable_and_induced_edges() {
    let dag = dag(JOIN_AND_BRANCH);
    let subset = dag.subset_from("join").unwrap();

    assert_eq!(subset.nodes(), &dag.reachable_from("join"));
    assert_eq!(
        subset.connections(),
        vec![
            Connection::new("agg", "sink2"),
            Connection::new("join", "agg"),
            Connection::new("join", "sink1"),
        ]
    );
    assert_eq!(subset.sources(), vec!["join"]);
}

#[test]
fn test_subset_until_stop_node() {
    let dag = dag(JOIN_AND_BRANCH);
    let subset = dag.subset_from_until("join", &set(&["agg"])).unwrap();

    assert_eq!(subset.nodes(), &set(&["join", "sink1", "agg"]));
    assert_eq!(subset.sinks(), vec!["agg", "sink1"]);
}

#[test]
fn test_insert_node_rewires() {
    let mut dag = dag(&[("A", "B")]);
    dag.insert_node("X", "B").unwrap();

    assert_eq!(
        dag.connections(),
        vec![Connection::new("A", "X"), Connection::new("X", "B")]
    );
    assert!(!dag.node_outputs("A").contains("B"));
    assert!(dag.validate().is_ok());
}

#[test]
fn test_insert_node_missing_target() {
    let mut dag = dag(&[("A", "B")]);
    let err = dag.insert_node("X", "nope").unwrap_err();

    assert_eq!(
        err,
        DagError::MissingNode {
            node: NodeId::new("nope")
        }
    );
    assert_eq!(err.code(), "DAG-010");
}

#[test]
fn test_bridge_between_phases() {
    // split at "validate", bridge the second phase behind a hand-off stage
    let dag = Dag::from_connections(load_connections("etl_pipeline.yaml")).unwrap();
    let mut second = dag.subset_from("validate").unwrap();
    second.insert_node("handoff", "validate").unwrap();

    assert_eq!(second.sources(), vec!["handoff"]);
    assert!(!second.is_source("validate"));
    assert!(second.validate().is_ok());
    assert_eq!(
        second.linearize().unwrap(),
        vec!["handoff", "validate", "store", "report"]
    );
}

#[test]
fn test_drain_sources_then_sinks() {
    let mut dag = dag(DIAMOND);

    assert_eq!(dag.remove_source(), Some(NodeId::new("a")));
    assert_eq!(dag.sources(), vec!["b", "c"]);
    assert_eq!(dag.remove_sink(), Some(NodeId::new("d")));
    // b and c are now isolated: both source and sink
    assert_eq!(dag.sinks(), vec!["b", "c"]);
    assert!(dag.remove_node("b"));
    assert!(dag.remove_node("c"));
    assert!(dag.is_empty());
}

// ═══════════════════════════════════════════════════════════════
// INTEGRATION TESTS: Structural equality
// ═══════════════════════════════════════════════════════════════

#[test]
fn test_round_trip_through_connections() {
    let dag = Dag::from_connections(load_connections("etl_pipeline.yaml")).unwrap();
    let rebuilt = Dag::from_connections(dag.connections()).unwrap();

    assert_eq!(dag, rebuilt);
}

#[test]
fn test_dags_as_hash_keys() {
    use std::collections::HashSet;

    let mut seen = HashSet::new();
    assert!(seen.insert(dag(DIAMOND)));
    assert!(!seen.insert(dag(&[("c", "d"), ("b", "d"), ("a", "c"), ("a", "b")])));
    assert!(seen.insert(dag(TRIANGLE)));
}
