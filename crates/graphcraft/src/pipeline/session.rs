//! Stateful build session
//!
//! A session owns the input model being edited and the render graph last
//! built from it. Builds are numbered; only the most recent one may replace
//! the graph, and a failed build leaves it untouched.

use anyhow::Result;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::Pipeline;
use crate::assembler::RenderGraph;
use crate::input::InputModel;

/// A snapshot of the input taken when a build starts
#[derive(Debug, Clone)]
pub struct BuildTicket {
    generation: u64,
    input: InputModel,
}

impl BuildTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The input as it was when the build started
    pub fn input(&self) -> &InputModel {
        &self.input
    }

    /// Run this ticket's build, pairing the result with its generation
    pub async fn run(self, pipeline: &Pipeline) -> (u64, Result<RenderGraph>) {
        let result = pipeline.build(&self.input).await;
        (self.generation, result)
    }
}

/// What happened when a build result was handed back
pub enum BuildOutcome {
    /// The graph was replaced
    Applied { generation: u64 },
    /// A newer build was started meanwhile; the result was discarded
    Superseded { generation: u64, latest: u64 },
    /// The build failed; the previous graph is kept
    Failed { generation: u64, error: anyhow::Error },
}

impl BuildOutcome {
    pub fn generation(&self) -> u64 {
        match self {
            Self::Applied { generation }
            | Self::Superseded { generation, .. }
            | Self::Failed { generation, .. } => *generation,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    /// Turn a failure into an error, anything else into `Ok`
    pub fn into_result(self) -> Result<()> {
        match self {
            Self::Failed { error, .. } => Err(error),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for BuildOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Applied { generation } => write!(f, "Applied({})", generation),
            Self::Superseded { generation, latest } => {
                write!(f, "Superseded({} < {})", generation, latest)
            }
            Self::Failed { generation, error } => write!(f, "Failed({}: {:#})", generation, error),
        }
    }
}

/// One editing session: one input model, one current graph
pub struct GraphSession {
    pipeline: Arc<Pipeline>,
    input: InputModel,
    graph: RenderGraph,
    latest: u64,
    applied: Option<u64>,
}

impl GraphSession {
    pub fn new(pipeline: Pipeline) -> Self {
        Self::with_input(pipeline, InputModel::default())
    }

    pub fn with_input(pipeline: Pipeline, input: InputModel) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            input,
            graph: RenderGraph::default(),
            latest: 0,
            applied: None,
        }
    }

    /// Shared handle to the pipeline, for running tickets elsewhere
    pub fn pipeline(&self) -> Arc<Pipeline> {
        Arc::clone(&self.pipeline)
    }

    pub fn input(&self) -> &InputModel {
        &self.input
    }

    /// Edit the input in place; the graph is unaffected until the next build
    pub fn input_mut(&mut self) -> &mut InputModel {
        &mut self.input
    }

    pub fn set_input(&mut self, input: InputModel) {
        self.input = input;
    }

    /// The current render graph, empty before the first successful build
    pub fn graph(&self) -> &RenderGraph {
        &self.graph
    }

    /// Generation of the graph currently shown, if any build has applied
    pub fn applied_generation(&self) -> Option<u64> {
        self.applied
    }

    /// Generation of the most recently started build
    pub fn latest_generation(&self) -> u64 {
        self.latest
    }

    /// Snapshot the input and issue the next ticket
    pub fn begin_build(&mut self) -> BuildTicket {
        self.latest += 1;
        debug!(generation = self.latest, "Build started");
        BuildTicket {
            generation: self.latest,
            input: self.input.clone(),
        }
    }

    /// Hand back a build result; only the latest ticket may commit
    pub fn finish_build(&mut self, generation: u64, result: Result<RenderGraph>) -> BuildOutcome {
        if generation != self.latest {
            debug!(generation, latest = self.latest, "Discarding superseded build");
            return BuildOutcome::Superseded {
                generation,
                latest: self.latest,
            };
        }

        match result {
            Ok(graph) => {
                info!(generation, nodes = graph.nodes.len(), edges = graph.edges.len(), "Build applied");
                self.graph = graph;
                self.applied = Some(generation);
                BuildOutcome::Applied { generation }
            }
            Err(error) => {
                warn!(generation, error = %error, "Build failed, keeping previous graph");
                BuildOutcome::Failed { generation, error }
            }
        }
    }

    /// Start, run and commit one build
    pub async fn build(&mut self) -> BuildOutcome {
        let ticket = self.begin_build();
        let pipeline = self.pipeline();
        let (generation, result) = ticket.run(&pipeline).await;
        self.finish_build(generation, result)
    }
}

impl fmt::Debug for GraphSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphSession")
            .field("input_format", &self.input.format())
            .field("nodes", &self.graph.nodes.len())
            .field("latest", &self.latest)
            .field("applied", &self.applied)
            .finish()
    }
}
