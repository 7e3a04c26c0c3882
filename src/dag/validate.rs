//! DAG Validation - cycles and islands
//!
//! Validates:
//! - at least one source and one sink (DAG-002, DAG-003)
//! - no cycles (DAG-004)
//! - no islands: every stage belongs to one weakly connected piece (DAG-005)
//!
//! Island detection grows an island from the first source: any other source
//! that can reach a stage already on the island joins it, together with
//! everything it reaches. If a full pass over the remaining sources adds
//! nothing, those sources live on an island of their own.

use tracing::trace;

use super::graph::{sorted, Dag, NodeSet};
use super::NodeId;
use crate::error::{DagError, Result};

impl Dag {
    /// Check that this is a valid DAG without cycles and without islands
    ///
    /// Runs automatically on construction. Call it again after structural
    /// edits such as [`Dag::insert_node`] to re-check the invariants; it is
    /// not meaningful once sources or sinks have been removed.
    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(DagError::NoSources {
                cycle: self.locate_cycle(),
            });
        }
        if self.sinks.is_empty() {
            return Err(DagError::NoSinks {
                cycle: self.locate_cycle(),
            });
        }

        self.linearize()?;
        self.check_islands()
    }

    fn check_islands(&self) -> Result<()> {
        // source -> stages reachable from it, in tie-break order
        let mut reach = self
            .sources
            .iter()
            .map(|(_, source)| (source, self.reachable_from(source)));

        let Some((first, mut island)) = reach.next() else {
            return Ok(());
        };
        let mut candidates: Vec<(&NodeId, NodeSet)> = reach.collect();
        trace!(seed = %first, size = island.len(), "growing island");

        while !candidates.is_empty() {
            let before = candidates.len();
            candidates.retain(|(source, reachable)| {
                if reachable.iter().any(|node| island.contains(node)) {
                    trace!(source = %source, "source joins island");
                    island.extend(reachable.iter().cloned());
                    false
                } else {
                    true
                }
            });

            if candidates.len() == before {
                return Err(DagError::Island {
                    nodes: sorted(island),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn build(edges: &[(&str, &str)]) -> Result<Dag> {
        Dag::from_connections(edges.iter().copied())
    }

    fn ids(names: &[&str]) -> Vec<NodeId> {
        names.iter().map(|n| NodeId::new(n)).collect()
    }

    #[test]
    fn test_valid_diamond() {
        assert!(build(&[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")]).is_ok());
    }

    #[test]
    fn test_pure_cycle_has_no_sources() {
        let err = build(&[("a", "b"), ("b", "c"), ("c", "a")]).unwrap_err();
        assert_eq!(err, DagError::NoSources { cycle: ids(&["a", "b", "c"]) });
        assert!(err.is_cycle());
    }

    #[test]
    fn test_self_loop_is_cycle() {
        let err = build(&[("a", "a")]).unwrap_err();
        assert_eq!(err.cycle_nodes(), Some(ids(&["a"]).as_slice()));
    }

    #[test]
    fn test_self_loop_with_source_and_sink() {
        let err = build(&[("in", "loop"), ("loop", "loop"), ("loop", "out")]).unwrap_err();
        assert_eq!(err, DagError::CycleDetected { nodes: ids(&["loop", "out"]) });
    }

    #[test]
    fn test_cycle_without_sinks() {
        // a feeds a cycle that never drains
        let err = build(&[("a", "b"), ("b", "c"), ("c", "b")]).unwrap_err();
        assert_eq!(err, DagError::NoSinks { cycle: ids(&["b", "c"]) });
    }

    #[test]
    fn test_cycle_in_the_middle() {
        // a -> b -> c -> d -> b, d -> e: e hangs off the cycle
        let err = build(&[("a", "b"), ("b", "c"), ("c", "d"), ("d", "b"), ("d", "e")]).unwrap_err();
        assert_eq!(
            err,
            DagError::CycleDetected {
                nodes: ids(&["b", "c", "d", "e"])
            }
        );
    }

    #[test]
    fn test_cycle_reports_stages_it_feeds() {
        let err = build(&[("a", "b"), ("b", "c"), ("c", "b"), ("c", "d")]).unwrap_err();
        assert_eq!(
            err,
            DagError::CycleDetected {
                nodes: ids(&["b", "c", "d"])
            }
        );
    }

    #[test]
    fn test_island_detected() {
        let err = build(&[("a", "b"), ("c", "d")]).unwrap_err();
        assert_eq!(err, DagError::Island { nodes: ids(&["a", "b"]) });
    }

    #[test]
    fn test_sources_joined_late_are_not_islands() {
        // a -> y, b -> x, c -> x, c -> y
        // b shares nothing with the seed a; it only joins once c has
        assert!(build(&[("a", "y"), ("b", "x"), ("c", "x"), ("c", "y")]).is_ok());
        // chain of shared sinks: a -> x, b -> x, b -> y, c -> y
        assert!(build(&[("a", "x"), ("b", "x"), ("b", "y"), ("c", "y")]).is_ok());
    }

    #[test]
    fn test_island_reported_after_partial_growth() {
        // a and b share m; c -> d is alone
        let err = build(&[("a", "m"), ("b", "m"), ("c", "d")]).unwrap_err();
        assert_eq!(err, DagError::Island { nodes: ids(&["a", "b", "m"]) });
    }

    #[test]
    fn test_validate_after_insert_node() {
        let mut dag = build(&[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")]).unwrap();
        dag.insert_node("bridge", "d").unwrap();
        assert!(dag.validate().is_ok());
        assert_eq!(dag.sinks(), vec!["d"]);
    }
}
