//! Stagegraph Configuration Module
//!
//! Selects the tie-break policy used whenever several stages are equally
//! eligible (linearization, `remove_source`, `remove_sink`).
//!
//! ## Priority Order (highest to lowest)
//!
//! 1. Environment variable (`STAGEGRAPH_TIE_BREAK`)
//! 2. Config file (TOML, path chosen by the embedding planner)
//! 3. Defaults
//!
//! ```toml
//! tie_break = "insertion_order"
//! ```

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dag::{Connection, Dag};
use crate::error::{DagError, Result};

/// Environment variable overriding the tie-break policy
pub const TIE_BREAK_ENV: &str = "STAGEGRAPH_TIE_BREAK";

/// Rule for picking one stage among several equally eligible ones
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Smallest stage id first
    #[default]
    Lexicographic,
    /// Stage seen first in the connection list first
    InsertionOrder,
}

impl FromStr for TieBreak {
    type Err = DagError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lexicographic" => Ok(Self::Lexicographic),
            "insertion_order" | "insertion-order" => Ok(Self::InsertionOrder),
            other => Err(DagError::ConfigError {
                reason: format!(
                    "unknown tie-break '{}' (expected 'lexicographic' or 'insertion_order')",
                    other
                ),
            }),
        }
    }
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexicographic => f.write_str("lexicographic"),
            Self::InsertionOrder => f.write_str("insertion_order"),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DagConfig {
    pub tie_break: TieBreak,
}

impl DagConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| DagError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
        })
    }

    /// Load configuration from file
    ///
    /// Returns default config if file doesn't exist.
    /// Returns error if file exists but is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| DagError::ConfigError {
            reason: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        Self::from_toml_str(&content)
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| DagError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
        })
    }

    /// Merge with environment variables, rejecting invalid values
    pub fn try_with_env(mut self) -> Result<Self> {
        if let Ok(value) = std::env::var(TIE_BREAK_ENV) {
            if !value.is_empty() {
                self.tie_break = value.parse()?;
            }
        }
        Ok(self)
    }

    /// Merge with environment variables
    ///
    /// Environment variables take precedence over config file values.
    /// Invalid values are ignored with a warning.
    pub fn with_env(self) -> Self {
        let fallback = self.clone();
        self.try_with_env().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "ignoring {}", TIE_BREAK_ENV);
            fallback
        })
    }

    /// Build and validate a DAG with this configuration
    pub fn build<I, C>(&self, connections: I) -> Result<Dag>
    where
        I: IntoIterator<Item = C>,
        C: Into<Connection>,
    {
        Dag::from_connections_with(connections, self.tie_break)
    }
}
