//! Graphcraft - Turn lightweight graph descriptions into laid-out graphs
//!
//! A library for reading node/edge descriptions (a two-line DSL, adjacency
//! rows or source/target pairs), laying them out, and producing a render
//! graph of positioned, styled nodes and edges.
//!
//! # Quick Start
//!
//! ```rust
//! use graphcraft::build_graph_blocking;
//!
//! let graph = build_graph_blocking("Nodes: A, B, C\nEdges: A-B, B-C", Default::default()).unwrap();
//! assert_eq!(graph.nodes.len(), 3);
//! assert_eq!(graph.edges[0].source, "A");
//! ```
//!
//! # Advanced Usage
//!
//! For more control, use the individual stages:
//!
//! ```rust
//! use graphcraft::prelude::*;
//! use futures::executor::block_on;
//!
//! // Parse into a database
//! let parser = DslParser::new();
//! let mut database = GraphDatabase::new();
//! parser.parse("Nodes: A, B\nEdges: A-B", &mut database).unwrap();
//! assert_eq!(database.node_count(), 2);
//!
//! // Lay out and assemble
//! let adapter = LayoutAdapter::from_config(&BuildConfig::default()).unwrap();
//! let positions = block_on(adapter.layout(database.node_specs(), database.edge_specs())).unwrap();
//! let graph = Assembler::new().assemble(
//!     database.node_specs(),
//!     database.edge_specs(),
//!     &positions,
//!     EdgeRouting::Curved,
//! );
//! assert_eq!(graph.nodes.len(), 2);
//! ```

pub mod assembler;
pub mod core;
pub mod graph;
pub mod input;
pub mod layout;
pub mod parsers;
pub mod pipeline;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use core::*;

use assembler::RenderGraph;
use graph::GraphDatabase;
use input::{InputFormat, InputModel};
use pipeline::Pipeline;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::assembler::{Assembler, RenderEdge, RenderGraph, RenderNode};
    pub use crate::core::{
        BackendKind, BuildConfig, Database, Detector, Direction, EdgeRouting, EdgeSpec,
        GraphError, NodeSpec, Parser, Position,
    };
    pub use crate::graph::{GraphDatabase, Validator};
    pub use crate::input::{AdjacencyForm, DslInput, InputFormat, InputModel, PairForm};
    pub use crate::layout::{LayoutAdapter, LayoutBackend, LayoutRequest, LayoutResponse};
    pub use crate::parsers::{AdjacencyParser, DslParser, GraphParser, PairParser};
    pub use crate::pipeline::{GraphSession, Pipeline};
}

/// Read raw text as an input model
///
/// With no explicit format the text is sniffed: JSON objects with `targets`
/// or `edges` become structured forms, anything else is DSL text.
///
/// # Example
/// ```rust
/// use graphcraft::read_input;
/// use graphcraft::input::InputFormat;
///
/// let model = read_input(r#"{"nodes": ["A", "B"], "edges": [["A", "B"]]}"#, None).unwrap();
/// assert_eq!(model.format(), InputFormat::Pairs);
/// ```
pub fn read_input(text: &str, format: Option<InputFormat>) -> Result<InputModel, GraphError> {
    let format = format.unwrap_or_else(|| parsers::detect_format(text));
    InputModel::from_text(text, format)
}

/// Parse a graph description without laying it out
///
/// # Example
/// ```rust
/// use graphcraft::parse;
/// use graphcraft::prelude::Database;
///
/// let db = parse("Nodes: A, B, C\nEdges: A-B, B-C").unwrap();
/// assert_eq!(db.node_count(), 3);
/// assert_eq!(db.edge_count(), 2);
/// ```
pub fn parse(text: &str) -> anyhow::Result<GraphDatabase> {
    let model = read_input(text, None)?;
    parsers::GraphParser::new().parse_model(&model)
}

/// Build a render graph from a graph description
pub async fn build_graph(text: &str, config: BuildConfig) -> anyhow::Result<RenderGraph> {
    let model = read_input(text, None)?;
    Pipeline::new(config)?.build(&model).await
}

/// Blocking form of [`build_graph`] for callers without an executor
///
/// # Example
/// ```rust
/// use graphcraft::{build_graph_blocking, BackendKind, BuildConfig};
///
/// let config = BuildConfig::default().with_backend(BackendKind::Levels);
/// let graph = build_graph_blocking("Nodes: A, B\nEdges: A-B", config).unwrap();
/// assert_eq!(graph.edges[0].edge_type, "straight");
/// ```
pub fn build_graph_blocking(text: &str, config: BuildConfig) -> anyhow::Result<RenderGraph> {
    futures::executor::block_on(build_graph(text, config))
}
