//! DAG Module - validated graph of pipeline stages
//!
//! Contains the DAG representation and its algorithms:
//! - `node`: NodeId, the interned stage identifier
//! - `connection`: Connection edges and connection list parsing
//! - `graph`: Dag structure, accessors, sub-graphs, mutations
//! - `traverse`: reachability and linearization
//! - `validate`: cycle and island detection
//!
//! A Dag is validated on construction; an invalid topology never yields a
//! value. Planners split it into phases through `subset_from` and
//! `insert_node`, and order it through `linearize`.

mod connection;
mod graph;
mod node;
mod traverse;
mod validate;

// Re-export public types
pub use connection::{connections_from_json, connections_from_yaml, Connection};
pub use graph::{Dag, NodeSet};
pub use node::NodeId;
