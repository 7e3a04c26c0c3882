//! Test Fixtures for Stagegraph
//!
//! Canonical connection sets and graph generators shared by unit tests,
//! integration tests and benchmarks.
//!
//! # Usage
//!
//! ```rust,ignore
//! use stagegraph::test_fixtures::*;
//!
//! let dag = Dag::from_connections(DIAMOND.iter().copied())?;
//! ```

use crate::dag::Connection;

// ═══════════════════════════════════════════════════════════════════════════
// VALID TOPOLOGIES
// ═══════════════════════════════════════════════════════════════════════════

/// a → b → c
pub const LINEAR: &[(&str, &str)] = &[("a", "b"), ("b", "c")];

/// a → b → c plus the shortcut a → c
pub const TRIANGLE: &[(&str, &str)] = &[("a", "b"), ("b", "c"), ("a", "c")];

/// a → (b, c) → d
pub const DIAMOND: &[(&str, &str)] = &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")];

/// Two sources joining, then branching to two sinks
///
/// ```text
/// src1 ─┐          ┌─▶ sink1
///       ├─▶ join ──┤
/// src2 ─┘          └─▶ agg ─▶ sink2
/// ```
pub const JOIN_AND_BRANCH: &[(&str, &str)] = &[
    ("src1", "join"),
    ("src2", "join"),
    ("join", "sink1"),
    ("join", "agg"),
    ("agg", "sink2"),
];

// ═══════════════════════════════════════════════════════════════════════════
// INVALID TOPOLOGIES
// ═══════════════════════════════════════════════════════════════════════════

/// a → b → c → a (no sources at all)
pub const PURE_CYCLE: &[(&str, &str)] = &[("a", "b"), ("b", "c"), ("c", "a")];

/// a → b → c → d → b, d → e (cycle with a source and a sink)
pub const CYCLE_IN_MIDDLE: &[(&str, &str)] =
    &[("a", "b"), ("b", "c"), ("c", "d"), ("d", "b"), ("d", "e")];

/// a → b and c → d with nothing in between
pub const TWO_ISLANDS: &[(&str, &str)] = &[("a", "b"), ("c", "d")];

// ═══════════════════════════════════════════════════════════════════════════
// GENERATORS
// ═══════════════════════════════════════════════════════════════════════════

/// Owned connections from a fixture table
pub fn connections(edges: &[(&str, &str)]) -> Vec<Connection> {
    edges.iter().map(|&(from, to)| Connection::new(from, to)).collect()
}

/// stage_0 → stage_1 → … → stage_{len}
pub fn chain(len: usize) -> Vec<Connection> {
    (0..len)
        .map(|i| Connection::new(format!("stage_{i}"), format!("stage_{}", i + 1)))
        .collect()
}

/// source → middle_i → sink for every i in 0..width
pub fn fan_out_in(width: usize) -> Vec<Connection> {
    (0..width)
        .flat_map(|i| {
            let middle = format!("middle_{i}");
            [
                Connection::new("source", middle.as_str()),
                Connection::new(middle.as_str(), "sink"),
            ]
        })
        .collect()
}

/// `layers` layers of `width` stages, each stage feeding every stage of the
/// next layer
pub fn layered(layers: usize, width: usize) -> Vec<Connection> {
    let mut edges = Vec::with_capacity(layers.saturating_sub(1) * width * width);
    for layer in 1..layers {
        for from in 0..width {
            for to in 0..width {
                edges.push(Connection::new(
                    format!("l{}_{}", layer - 1, from),
                    format!("l{}_{}", layer, to),
                ));
            }
        }
    }
    edges
}
