//! Parsers for every input shape
//!
//! [`GraphParser`] dispatches an [`InputModel`] to the parser for its shape.

mod detector;
mod dsl;
mod dsl_grammar;
mod structured;

pub use detector::*;
pub use dsl::*;
pub use structured::*;

use anyhow::Result;
use tracing::{debug, span, Level};

use crate::core::{Parser, DISPLAY_LABEL_WIDTH};
use crate::graph::GraphDatabase;
use crate::input::InputModel;

/// Parser for any [`InputModel`]
#[derive(Debug, Clone, Copy)]
pub struct GraphParser {
    dsl: DslParser,
    adjacency: AdjacencyParser,
    pairs: PairParser,
}

impl GraphParser {
    pub fn new() -> Self {
        Self::with_label_width(DISPLAY_LABEL_WIDTH)
    }

    pub fn with_label_width(label_width: usize) -> Self {
        Self {
            dsl: DslParser::with_label_width(label_width),
            adjacency: AdjacencyParser::with_label_width(label_width),
            pairs: PairParser::with_label_width(label_width),
        }
    }

    /// Parse into a fresh database
    pub fn parse_model(&self, input: &InputModel) -> Result<GraphDatabase> {
        let mut database = GraphDatabase::new();
        self.parse(input, &mut database)?;
        Ok(database)
    }
}

impl Default for GraphParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser<GraphDatabase> for GraphParser {
    type Input = InputModel;

    fn parse(&self, input: &InputModel, database: &mut GraphDatabase) -> Result<()> {
        let parse_span = span!(Level::INFO, "parse_graph", format = %input.format());
        let _enter = parse_span.enter();

        match input {
            InputModel::Dsl(dsl) => self.dsl.parse(dsl.text(), database)?,
            InputModel::Adjacency(form) => self.adjacency.parse(form, database)?,
            InputModel::Pairs(form) => self.pairs.parse(form, database)?,
        }
        debug!(parser = self.name(), "Input parsed");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "graph"
    }

    fn version(&self) -> &'static str {
        "0.2.0"
    }

    fn can_parse(&self, input: &InputModel) -> bool {
        match input {
            InputModel::Dsl(dsl) => self.dsl.can_parse(dsl.text()),
            InputModel::Adjacency(form) => self.adjacency.can_parse(form),
            InputModel::Pairs(form) => self.pairs.can_parse(form),
        }
    }
}
