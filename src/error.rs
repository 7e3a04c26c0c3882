// The #[error] attribute from thiserror uses struct fields via string interpolation,
// but Rust's unused_assignments lint doesn't recognize this.
#![allow(unused_assignments)]

//! Stagegraph Error Types with Error Codes
//!
//! Error code ranges:
//! - DAG-000-009: Topology errors (empty, cycles, islands)
//! - DAG-010-019: Mutation errors (insert_node)
//! - DAG-020-029: Connection list parsing errors
//! - DAG-030-039: Configuration errors
//!
//! Every topology error is a hard stop: the pipeline definition that produced
//! the connections must be rejected as a whole.

use miette::Diagnostic;
use thiserror::Error;

use crate::dag::NodeId;

pub type Result<T> = std::result::Result<T, DagError>;

/// Render a node list for error messages
fn join_nodes(nodes: &[NodeId]) -> String {
    nodes
        .iter()
        .map(NodeId::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// All error variants are part of the public API.
///
/// Node lists carried by the variants are sorted by id so the rendered
/// messages are reproducible across runs.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum DagError {
    // ═══════════════════════════════════════════
    // TOPOLOGY ERRORS (000-009)
    // ═══════════════════════════════════════════
    #[error("[DAG-001] Cannot create a DAG without any connections")]
    #[diagnostic(
        code(stagegraph::empty),
        help("A DAG needs at least one connection between two stages")
    )]
    Empty,

    #[error(
        "[DAG-002] DAG does not have any sources. Stages {} form a cycle.",
        join_nodes(.cycle)
    )]
    #[diagnostic(
        code(stagegraph::no_sources),
        help("Remove cycles from the graph so that at least one stage has no inputs")
    )]
    NoSources { cycle: Vec<NodeId> },

    #[error(
        "[DAG-003] DAG does not have any sinks. Stages {} form a cycle.",
        join_nodes(.cycle)
    )]
    #[diagnostic(
        code(stagegraph::no_sinks),
        help("Remove cycles from the graph so that at least one stage has no outputs")
    )]
    NoSinks { cycle: Vec<NodeId> },

    #[error("[DAG-004] Invalid DAG. Stages {} form a cycle.", join_nodes(.nodes))]
    #[diagnostic(
        code(stagegraph::cycle_detected),
        help("Remove one of the connections between the listed stages")
    )]
    CycleDetected { nodes: Vec<NodeId> },

    #[error(
        "[DAG-005] Invalid DAG. There is an island made up of stages {} (no other stages connect to them).",
        join_nodes(.nodes)
    )]
    #[diagnostic(
        code(stagegraph::island),
        help("Connect the listed stages to the rest of the pipeline or remove them")
    )]
    Island { nodes: Vec<NodeId> },

    // ═══════════════════════════════════════════
    // MUTATION ERRORS (010-019)
    // ═══════════════════════════════════════════
    #[error("[DAG-010] Cannot insert in front of node '{node}' because it does not exist")]
    #[diagnostic(code(stagegraph::missing_node))]
    MissingNode { node: NodeId },

    #[error("[DAG-011] Cannot insert node '{node}' because it already exists")]
    #[diagnostic(code(stagegraph::duplicate_node))]
    DuplicateNode { node: NodeId },

    // ═══════════════════════════════════════════
    // PARSE ERRORS (020-029)
    // ═══════════════════════════════════════════
    #[error("[DAG-020] Failed to parse connection list: {details}")]
    #[diagnostic(
        code(stagegraph::parse_error),
        help("Connections are a list of {{ from: <stage>, to: <stage> }} entries")
    )]
    ParseError { details: String },

    // ═══════════════════════════════════════════
    // CONFIG ERRORS (030-039)
    // ═══════════════════════════════════════════
    #[error("[DAG-030] Configuration error: {reason}")]
    #[diagnostic(code(stagegraph::config_error))]
    ConfigError { reason: String },
}

impl DagError {
    /// Get the error code (e.g., "DAG-004")
    pub fn code(&self) -> &'static str {
        match self {
            Self::Empty => "DAG-001",
            Self::NoSources { .. } => "DAG-002",
            Self::NoSinks { .. } => "DAG-003",
            Self::CycleDetected { .. } => "DAG-004",
            Self::Island { .. } => "DAG-005",
            Self::MissingNode { .. } => "DAG-010",
            Self::DuplicateNode { .. } => "DAG-011",
            Self::ParseError { .. } => "DAG-020",
            Self::ConfigError { .. } => "DAG-030",
        }
    }

    /// True for every error caused by a cycle in the connections
    ///
    /// A graph without sources or sinks always contains a cycle, so
    /// `NoSources` and `NoSinks` count as cycle errors too.
    pub fn is_cycle(&self) -> bool {
        matches!(
            self,
            Self::NoSources { .. } | Self::NoSinks { .. } | Self::CycleDetected { .. }
        )
    }

    /// Stages involved in the cycle, if this is a cycle error
    pub fn cycle_nodes(&self) -> Option<&[NodeId]> {
        match self {
            Self::NoSources { cycle } | Self::NoSinks { cycle } => Some(cycle),
            Self::CycleDetected { nodes } => Some(nodes),
            _ => None,
        }
    }

    /// Stages of the disconnected fragment, if this is an island error
    pub fn island_nodes(&self) -> Option<&[NodeId]> {
        match self {
            Self::Island { nodes } => Some(nodes),
            _ => None,
        }
    }
}

impl FixSuggestion for DagError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            DagError::Empty => Some("Add at least one connection between two stages"),
            DagError::NoSources { .. } | DagError::NoSinks { .. } => {
                Some("Remove cycles from the graph")
            }
            DagError::CycleDetected { .. } => {
                Some("Remove one of the connections between the listed stages")
            }
            DagError::Island { .. } => {
                Some("Connect the listed stages to the rest of the pipeline")
            }
            DagError::MissingNode { .. } => Some("Insert in front of an existing stage"),
            DagError::DuplicateNode { .. } => Some("Use a stage name not already in the DAG"),
            DagError::ParseError { .. } => Some("Check YAML/JSON syntax of the connection list"),
            DagError::ConfigError { .. } => Some("Check the configuration file and env vars"),
        }
    }
}
