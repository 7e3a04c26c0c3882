//! Stagegraph - DAG planning primitive for pipeline stages
//!
//! Validates and orders a set of named, directionally connected pipeline
//! stages before anything is executed.
//!
//! ## Module Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        DOMAIN MODEL                          │
//! │  dag/       NodeId, Connection, Dag                          │
//! │             validate (cycles, islands)                       │
//! │             traverse (reachability, linearization)           │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        CROSS-CUTTING                         │
//! │  config/    Tie-break policy (TOML + env)                    │
//! │  error/     DagError with codes and fix suggestions          │
//! │  util/      String interner for stage ids                    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use stagegraph::{Dag, DagError};
//!
//! let dag = Dag::from_connections([("read", "parse"), ("parse", "write")])?;
//! assert_eq!(dag.linearize()?, vec!["read", "parse", "write"]);
//!
//! let err = Dag::from_connections([("a", "b"), ("c", "d")]).unwrap_err();
//! assert!(matches!(err, DagError::Island { .. }));
//! # Ok::<(), DagError>(())
//! ```

// ═══════════════════════════════════════════════════════════════
// DOMAIN MODEL
// ═══════════════════════════════════════════════════════════════
pub mod dag;

// ═══════════════════════════════════════════════════════════════
// CROSS-CUTTING - Error handling, configuration, utilities
// ═══════════════════════════════════════════════════════════════
pub mod config;
pub mod error;
pub mod util;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod test_fixtures;

// ═══════════════════════════════════════════════════════════════
// PUBLIC API RE-EXPORTS
// ═══════════════════════════════════════════════════════════════

pub use config::{DagConfig, TieBreak};
pub use dag::{connections_from_json, connections_from_yaml, Connection, Dag, NodeId, NodeSet};
pub use error::{DagError, FixSuggestion, Result};
