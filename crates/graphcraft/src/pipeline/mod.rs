//! Build pipeline
//!
//! The pipeline wires the stages together:
//! Parser → Validator → Layout Adapter → Assembler.
//! [`GraphSession`] adds the stateful side: one input model, one current
//! render graph, and latest-build-wins commits.

mod session;

pub use session::*;

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info, span, Instrument, Level};

use crate::assembler::{Assembler, RenderGraph};
use crate::core::{BuildConfig, Database, EdgeRouting};
use crate::graph::{GraphDatabase, ParseWarning, Validator};
use crate::input::InputModel;
use crate::layout::{LayoutAdapter, LayoutBackend, LayoutOptions, LayoutRequest};
use crate::parsers::GraphParser;

/// A finished build together with the input fragments that were skipped
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildReport {
    pub graph: RenderGraph,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ParseWarning>,
}

/// End-to-end graph builder
#[derive(Debug)]
pub struct Pipeline {
    config: BuildConfig,
    parser: GraphParser,
    validator: Validator,
    adapter: LayoutAdapter,
    assembler: Assembler,
}

impl Pipeline {
    /// Pipeline for the backend the config names
    pub fn new(config: BuildConfig) -> Result<Self> {
        let adapter = LayoutAdapter::from_config(&config)?;
        Ok(Self::with_adapter(config, adapter))
    }

    /// Pipeline around a caller-supplied backend
    pub fn with_backend(config: BuildConfig, backend: Box<dyn LayoutBackend>) -> Self {
        let adapter = LayoutAdapter::new(backend, LayoutOptions::from_config(&config));
        Self::with_adapter(config, adapter)
    }

    fn with_adapter(config: BuildConfig, adapter: LayoutAdapter) -> Self {
        Self {
            parser: GraphParser::with_label_width(config.label_width),
            validator: Validator::new(config.duplicate_nodes, config.dangling_edges),
            adapter,
            assembler: Assembler::new(),
            config,
        }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn adapter(&self) -> &LayoutAdapter {
        &self.adapter
    }

    /// Configured routing, else the backend's preference
    pub fn routing(&self) -> EdgeRouting {
        self.config
            .routing
            .unwrap_or_else(|| self.adapter.backend().preferred_routing())
    }

    /// Parse without validating
    pub fn parse(&self, input: &InputModel) -> Result<GraphDatabase> {
        self.parser.parse_model(input)
    }

    /// Parse and apply the validation policies
    pub fn prepare(&self, input: &InputModel) -> Result<GraphDatabase> {
        let mut database = self.parse(input)?;
        self.validator.apply(&mut database)?;
        Ok(database)
    }

    /// The request the layout backend would receive for this input
    pub fn layout_request(&self, input: &InputModel) -> Result<LayoutRequest> {
        let database = self.prepare(input)?;
        Ok(self.adapter.request(database.node_specs(), database.edge_specs()))
    }

    /// Build a render graph
    pub async fn build(&self, input: &InputModel) -> Result<RenderGraph> {
        Ok(self.build_report(input).await?.graph)
    }

    /// Build a render graph, keeping the parse warnings
    pub async fn build_report(&self, input: &InputModel) -> Result<BuildReport> {
        let build_span = span!(
            Level::INFO,
            "build_graph",
            format = %input.format(),
            backend = self.adapter.backend().name()
        );
        self.run(input).instrument(build_span).await
    }

    async fn run(&self, input: &InputModel) -> Result<BuildReport> {
        let mut database = self.prepare(input)?;
        let warnings = database.take_warnings();
        debug!(
            node_count = database.node_count(),
            edge_count = database.edge_count(),
            warning_count = warnings.len(),
            "Graph prepared"
        );

        let positions = self
            .adapter
            .layout(database.node_specs(), database.edge_specs())
            .await?;

        let graph = self.assembler.assemble(
            database.node_specs(),
            database.edge_specs(),
            &positions,
            self.routing(),
        );
        info!(nodes = graph.nodes.len(), edges = graph.edges.len(), "Build completed");
        Ok(BuildReport { graph, warnings })
    }
}
