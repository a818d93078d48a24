//! Core error types for graph building
//!
//! This module defines the error types raised across the build pipeline.
//! Malformed DSL fragments are not errors: they are skipped and recorded as
//! warnings on the database.

use thiserror::Error;

/// Core error types for graph building
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Parse error: {message} at line {line}")]
    ParseError { message: String, line: usize },

    #[error("Input error: slot {index} is out of range for a sequence of {len}")]
    SlotOutOfRange { index: usize, len: usize },

    #[error("Validation error: edge '{edge_id}' references undeclared node '{node_id}'")]
    DanglingEdge { edge_id: String, node_id: String },

    #[error("Validation error: node '{id}' is declared more than once")]
    DuplicateNode { id: String },

    #[error("Layout error: {message}")]
    LayoutError { message: String },

    #[error("Layout error: backend '{backend}' did not answer within {millis} ms")]
    LayoutTimeout { backend: String, millis: u64 },

    #[error("Unknown layout backend: {name}")]
    UnknownBackend { name: String },

    #[error("Unknown input format: {format}")]
    UnknownInputFormat { format: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },
}

impl GraphError {
    /// Create a new parse error
    pub fn parse_error(message: impl Into<String>, line: usize) -> Self {
        Self::ParseError {
            message: message.into(),
            line,
        }
    }

    /// Create a new layout error
    pub fn layout_error(message: impl Into<String>) -> Self {
        Self::LayoutError {
            message: message.into(),
        }
    }

    /// Create a new dangling edge error
    pub fn dangling_edge(edge_id: impl Into<String>, node_id: impl Into<String>) -> Self {
        Self::DanglingEdge {
            edge_id: edge_id.into(),
            node_id: node_id.into(),
        }
    }

    /// Create a new duplicate node error
    pub fn duplicate_node(id: impl Into<String>) -> Self {
        Self::DuplicateNode { id: id.into() }
    }

    /// Returns true for errors raised by the validator
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            GraphError::DanglingEdge { .. } | GraphError::DuplicateNode { .. }
        )
    }

    /// Returns true for errors raised while computing a layout
    pub fn is_layout(&self) -> bool {
        matches!(
            self,
            GraphError::LayoutError { .. } | GraphError::LayoutTimeout { .. }
        )
    }
}
