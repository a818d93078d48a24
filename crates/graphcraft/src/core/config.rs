//! Build configuration
//!
//! A [`BuildConfig`] selects the layout backend, the node box handed to it,
//! the validation policies and the edge routing. It deserializes from JSON so
//! the CLI can load it from a file and then apply flag overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use super::{Direction, EdgeRouting, GraphError, DISPLAY_LABEL_WIDTH};

/// Built-in layout backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// Hierarchical layout, top to bottom unless a direction is given
    #[default]
    Layered,
    /// Hierarchical layout, left to right
    LayeredLr,
    /// Breadth-first levels from the roots
    Levels,
    /// External process speaking the ELK JSON format
    Command,
}

impl BackendKind {
    /// Get all valid backend names
    pub fn variants() -> &'static [&'static str] {
        &["layered", "layered-lr", "levels", "command"]
    }

    /// Direction used when the config does not name one
    pub fn default_direction(&self) -> Direction {
        match self {
            BackendKind::LayeredLr => Direction::LeftRight,
            _ => Direction::TopDown,
        }
    }
}

impl FromStr for BackendKind {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "layered" => Ok(BackendKind::Layered),
            "layered-lr" => Ok(BackendKind::LayeredLr),
            "levels" => Ok(BackendKind::Levels),
            "command" => Ok(BackendKind::Command),
            _ => Err(GraphError::UnknownBackend {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Layered => write!(f, "layered"),
            BackendKind::LayeredLr => write!(f, "layered-lr"),
            BackendKind::Levels => write!(f, "levels"),
            BackendKind::Command => write!(f, "command"),
        }
    }
}

/// What to do with an edge whose source or target was never declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DanglingEdgePolicy {
    /// Keep the edge; the render surface decides what to draw
    #[default]
    PassThrough,
    /// Remove the edge and log a warning
    Drop,
    /// Fail the build
    Reject,
}

/// What to do with a node id declared more than once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateNodePolicy {
    /// Collapse onto the first occurrence
    #[default]
    Merge,
    /// Keep every occurrence in the render output
    Keep,
    /// Fail the build
    Reject,
}

/// Settings for the external command backend
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    /// Program to run
    pub program: String,
    /// Arguments passed to the program
    pub args: Vec<String>,
    /// Deadline for one layout call, in milliseconds
    pub timeout_ms: Option<u64>,
}

impl CommandConfig {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Default::default()
        }
    }
}

/// Configuration for one build pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub backend: BackendKind,
    /// Flow direction; `None` uses the backend's default
    pub direction: Option<Direction>,
    /// Width of the fixed box every node is laid out with
    pub node_width: f64,
    /// Height of the fixed box every node is laid out with
    pub node_height: f64,
    /// Gap between nodes in the same layer
    pub node_spacing: f64,
    /// Gap between consecutive layers
    pub layer_spacing: f64,
    /// Characters kept in each node's display label
    pub label_width: usize,
    /// Edge routing; `None` uses the backend's preference
    pub routing: Option<EdgeRouting>,
    pub dangling_edges: DanglingEdgePolicy,
    pub duplicate_nodes: DuplicateNodePolicy,
    pub command: Option<CommandConfig>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            direction: None,
            node_width: 80.0,
            node_height: 80.0,
            node_spacing: 20.0,
            layer_spacing: 40.0,
            label_width: DISPLAY_LABEL_WIDTH,
            routing: None,
            dangling_edges: DanglingEdgePolicy::default(),
            duplicate_nodes: DuplicateNodePolicy::default(),
            command: None,
        }
    }
}

impl BuildConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a JSON file; missing keys keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&text)
    }

    /// Parse a config from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(GraphError::from)
            .context("Invalid build config")
    }

    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_node_size(mut self, width: f64, height: f64) -> Self {
        self.node_width = width;
        self.node_height = height;
        self
    }

    pub fn with_routing(mut self, routing: EdgeRouting) -> Self {
        self.routing = Some(routing);
        self
    }

    pub fn with_dangling_edges(mut self, policy: DanglingEdgePolicy) -> Self {
        self.dangling_edges = policy;
        self
    }

    pub fn with_duplicate_nodes(mut self, policy: DuplicateNodePolicy) -> Self {
        self.duplicate_nodes = policy;
        self
    }

    pub fn with_command(mut self, command: CommandConfig) -> Self {
        self.command = Some(command);
        self
    }

    /// Reject dangling edges and duplicate node ids
    pub fn strict(self) -> Self {
        self.with_dangling_edges(DanglingEdgePolicy::Reject)
            .with_duplicate_nodes(DuplicateNodePolicy::Reject)
    }

    /// The direction this config lays out in
    pub fn effective_direction(&self) -> Direction {
        self.direction
            .unwrap_or_else(|| self.backend.default_direction())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BuildConfig::default();
        assert_eq!(config.backend, BackendKind::Layered);
        assert_eq!(config.node_width, 80.0);
        assert_eq!(config.node_height, 80.0);
        assert_eq!(config.label_width, 7);
        assert_eq!(config.dangling_edges, DanglingEdgePolicy::PassThrough);
        assert_eq!(config.duplicate_nodes, DuplicateNodePolicy::Merge);
        assert_eq!(config.effective_direction(), Direction::TopDown);
    }

    #[test]
    fn test_layered_lr_defaults_to_left_right() {
        let config = BuildConfig::new().with_backend(BackendKind::LayeredLr);
        assert_eq!(config.effective_direction(), Direction::LeftRight);

        let config = config.with_direction(Direction::BottomUp);
        assert_eq!(config.effective_direction(), Direction::BottomUp);
    }

    #[test]
    fn test_backend_kind_round_trip() {
        for name in BackendKind::variants() {
            let kind: BackendKind = name.parse().unwrap();
            assert_eq!(kind.to_string(), *name);
        }
        assert!("elk".parse::<BackendKind>().is_err());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = BuildConfig::from_json(
            r#"{"backend": "levels", "dangling_edges": "reject", "node_width": 50}"#,
        )
        .unwrap();
        assert_eq!(config.backend, BackendKind::Levels);
        assert_eq!(config.dangling_edges, DanglingEdgePolicy::Reject);
        assert_eq!(config.node_width, 50.0);
        assert_eq!(config.node_height, 80.0);
    }

    #[test]
    fn test_command_config_from_json() {
        let config = BuildConfig::from_json(
            r#"{"backend": "command", "command": {"program": "node", "args": ["elk.js"], "timeout_ms": 500}}"#,
        )
        .unwrap();
        let command = config.command.unwrap();
        assert_eq!(command.program, "node");
        assert_eq!(command.args, vec!["elk.js".to_string()]);
        assert_eq!(command.timeout_ms, Some(500));
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(BuildConfig::from_json("{\"backend\": \"dagre\"}").is_err());
    }

    #[test]
    fn test_strict() {
        let config = BuildConfig::new().strict();
        assert_eq!(config.dangling_edges, DanglingEdgePolicy::Reject);
        assert_eq!(config.duplicate_nodes, DuplicateNodePolicy::Reject);
    }
}
