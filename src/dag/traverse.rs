//! Reachability and linearization
//!
//! Reachability uses an explicit work stack (no recursion), so deep
//! pipelines cannot overflow the call stack. It tracks visited stages and is
//! safe on cyclic input, which matters because validation calls it before
//! acyclicity is established.
//!
//! Linearization strips sources off a working copy until none are left.
//! Edges that survive the stripping can only belong to a cycle.

use smallvec::{smallvec, SmallVec};

use super::graph::{sorted, Dag, NodeSet};
use super::NodeId;
use crate::error::{DagError, Result};

/// Work stack: most pipelines branch a handful of times, so 16 slots stay inline
type WorkStack = SmallVec<[NodeId; 16]>;

impl Dag {
    /// Every stage reachable from `stage`, including `stage` itself
    pub fn reachable_from(&self, stage: &str) -> NodeSet {
        self.reachable_from_until(stage, &NodeSet::default())
    }

    /// Every stage reachable from `stage` without going past any stop node
    ///
    /// A reached stop node is part of the result but its outputs are not
    /// followed. The start stage is always expanded, even if it is a stop
    /// node. An unknown stage reaches only itself.
    pub fn reachable_from_until(&self, stage: &str, stop_nodes: &NodeSet) -> NodeSet {
        let start = self
            .nodes
            .get(stage)
            .cloned()
            .unwrap_or_else(|| NodeId::transient(stage));

        let mut seen = NodeSet::default();
        seen.insert(start.clone());
        let mut stack: WorkStack = smallvec![start];

        while let Some(current) = stack.pop() {
            for output in self.node_outputs(&current) {
                if !seen.insert(output.clone()) {
                    continue;
                }
                if !stop_nodes.contains(output) {
                    stack.push(output.clone());
                }
            }
        }

        seen
    }

    /// Order the stages so that every stage comes after all of its inputs
    ///
    /// Works on a private copy; the DAG itself is left untouched. Among
    /// stages that are ready at the same time, the tie-break policy decides.
    ///
    /// # Errors
    ///
    /// `DagError::CycleDetected` with the stages reachable, in the full DAG,
    /// from the cyclic remainder left once all sources and sinks have been
    /// stripped.
    pub fn linearize(&self) -> Result<Vec<NodeId>> {
        let mut copy = self.clone();
        let linearized = copy.strip_sources();

        if copy.outgoing.is_empty() {
            return Ok(linearized);
        }
        Err(DagError::CycleDetected {
            nodes: copy.into_residual_cycle(self),
        })
    }

    /// Stages forming a cycle, located the same way `linearize` does
    ///
    /// Empty if the graph is acyclic.
    pub(super) fn locate_cycle(&self) -> Vec<NodeId> {
        let mut copy = self.clone();
        copy.strip_sources();
        copy.into_residual_cycle(self)
    }

    /// Remove sources until there are none; returns them in removal order
    fn strip_sources(&mut self) -> Vec<NodeId> {
        let mut removed = Vec::with_capacity(self.nodes.len());
        while let Some(source) = self.remove_source() {
            removed.push(source);
        }
        removed
    }

    /// Drain the sinks, then report everything reachable in `full` from the
    /// first stage that still has an output
    fn into_residual_cycle(mut self, full: &Dag) -> Vec<NodeId> {
        while self.remove_sink().is_some() {}

        let start = self
            .outgoing
            .keys()
            .map(|node| self.key(node))
            .min()
            .map(|(_, node)| node);

        match start {
            Some(start) => sorted(full.reachable_from(&start)),
            None => Vec::new(),
        }
    }
}
