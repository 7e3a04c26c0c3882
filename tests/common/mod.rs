//! Test fixtures and helpers

#![allow(dead_code)]

use std::path::PathBuf;

use stagegraph::{connections_from_yaml, Connection, Dag, NodeId, NodeSet};

/// Install a tracing subscriber honouring `RUST_LOG` (idempotent)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Get path to test fixtures directory
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Get path to a specific fixture file
pub fn fixture(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

/// Load a YAML connection list from the fixtures directory
pub fn load_connections(name: &str) -> Vec<Connection> {
    let yaml = std::fs::read_to_string(fixture(name)).expect("fixture readable");
    connections_from_yaml(&yaml).expect("fixture parses")
}

pub fn dag(edges: &[(&str, &str)]) -> Dag {
    Dag::from_connections(edges.iter().copied()).expect("valid dag")
}

pub fn set(names: &[&str]) -> NodeSet {
    names.iter().map(|n| NodeId::new(n)).collect()
}

pub fn ids(names: &[&str]) -> Vec<NodeId> {
    names.iter().map(|n| NodeId::new(n)).collect()
}

/// Position of every stage in a linearization
pub fn positions(order: &[NodeId]) -> std::collections::HashMap<&str, usize> {
    order
        .iter()
        .enumerate()
        .map(|(i, node)| (node.as_str(), i))
        .collect()
}
