//! Connection - a directed edge between two stages
//!
//! Connection lists usually arrive from an upstream pipeline parser, either
//! in memory or serialized. Both YAML and JSON lists are accepted:
//!
//! ```yaml
//! - from: ingest
//!   to: clean
//! - from: clean
//!   to: store
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::NodeId;
use crate::error::{DagError, Result};

/// A directed edge `from → to`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Connection {
    pub from: NodeId,
    pub to: NodeId,
}

impl Connection {
    pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}

impl<A: Into<NodeId>, B: Into<NodeId>> From<(A, B)> for Connection {
    fn from((from, to): (A, B)) -> Self {
        Self::new(from, to)
    }
}

/// Parse a YAML list of connections
pub fn connections_from_yaml(yaml: &str) -> Result<Vec<Connection>> {
    serde_yaml::from_str(yaml).map_err(|e| DagError::ParseError {
        details: e.to_string(),
    })
}

/// Parse a JSON array of connections
pub fn connections_from_json(json: &str) -> Result<Vec<Connection>> {
    serde_json::from_str(json).map_err(|e| DagError::ParseError {
        details: e.to_string(),
    })
}
