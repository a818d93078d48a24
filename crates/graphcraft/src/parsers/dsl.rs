//! DSL parser implementation
//!
//! Reads `Nodes:` and `Edges:` lines into a [`GraphDatabase`]. The last line
//! of each kind wins; everything else is ignored.

use anyhow::Result;
use tracing::{debug, span, trace, warn, Level};

use super::dsl_grammar::{parse_line, DslLine, EdgeItem};
use crate::core::{Database, EdgeSpec, NodeSpec, Parser, DISPLAY_LABEL_WIDTH};
use crate::graph::{GraphDatabase, ParseWarning};

/// Parser for the line-oriented `Nodes:` / `Edges:` format
#[derive(Debug, Clone, Copy)]
pub struct DslParser {
    label_width: usize,
}

impl DslParser {
    pub fn new() -> Self {
        Self {
            label_width: DISPLAY_LABEL_WIDTH,
        }
    }

    /// Use a different display label width
    pub fn with_label_width(label_width: usize) -> Self {
        Self { label_width }
    }
}

impl Default for DslParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser<GraphDatabase> for DslParser {
    type Input = str;

    fn parse(&self, input: &str, database: &mut GraphDatabase) -> Result<()> {
        let parse_span = span!(Level::INFO, "parse_dsl", input_len = input.len());
        let _enter = parse_span.enter();

        let mut nodes: Vec<String> = Vec::new();
        let mut edges: Vec<EdgeSpec> = Vec::new();
        let mut edge_warnings: Vec<ParseWarning> = Vec::new();

        for (index, line) in input.lines().enumerate() {
            let line_number = index + 1;
            match parse_line(line)? {
                DslLine::Nodes(ids) => {
                    if !nodes.is_empty() {
                        debug!(line = line_number, "Later Nodes: line replaces earlier one");
                    }
                    nodes = ids;
                }
                DslLine::Edges(items) => {
                    if !edges.is_empty() || !edge_warnings.is_empty() {
                        debug!(line = line_number, "Later Edges: line replaces earlier one");
                    }
                    edges.clear();
                    edge_warnings.clear();
                    for (position, item) in items.into_iter().enumerate() {
                        match item {
                            EdgeItem::Pair { source, target } => {
                                edges.push(EdgeSpec::new(format!("e{}", position), source, target));
                            }
                            EdgeItem::Blank => {
                                trace!(line = line_number, position, "Skipping blank edge fragment");
                            }
                            EdgeItem::Malformed(fragment) => {
                                warn!(line = line_number, position, fragment = %fragment, "Skipping malformed edge pair");
                                edge_warnings.push(ParseWarning::new(
                                    line_number,
                                    fragment,
                                    "edge pair needs a non-empty source and target around '-'",
                                ));
                            }
                        }
                    }
                }
                DslLine::Other => {
                    if !line.trim().is_empty() {
                        trace!(line = line_number, "Ignoring line without Nodes:/Edges: prefix");
                    }
                }
            }
        }

        for id in &nodes {
            database.add_node(NodeSpec::with_label_width(id, self.label_width))?;
        }
        for edge in edges {
            database.add_edge(edge)?;
        }
        for warning in edge_warnings {
            database.add_warning(warning);
        }

        debug!(
            node_count = database.node_count(),
            edge_count = database.edge_count(),
            warning_count = database.warnings().len(),
            "DSL parsed"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "dsl"
    }

    fn version(&self) -> &'static str {
        "0.2.0"
    }

    fn can_parse(&self, input: &str) -> bool {
        input.lines().map(str::trim).any(|line| {
            line.starts_with("Nodes:") || line.starts_with("Edges:")
        })
    }
}
