//! Parsers for the form-based input shapes

use anyhow::Result;
use tracing::{debug, span, trace, warn, Level};

use crate::core::{Database, EdgeSpec, NodeSpec, Parser, DISPLAY_LABEL_WIDTH};
use crate::graph::{GraphDatabase, ParseWarning};
use crate::input::{AdjacencyForm, PairForm, SlotList};

fn add_nodes(nodes: &SlotList, label_width: usize, database: &mut GraphDatabase) -> Result<()> {
    for (_, id) in nodes.filled() {
        database.add_node(NodeSpec::with_label_width(id, label_width))?;
    }
    Ok(())
}

/// Parser for adjacency rows
///
/// The `j`-th non-blank target of row `i` becomes edge `e<i>-<j>`.
#[derive(Debug, Clone, Copy)]
pub struct AdjacencyParser {
    label_width: usize,
}

impl AdjacencyParser {
    pub fn new() -> Self {
        Self {
            label_width: DISPLAY_LABEL_WIDTH,
        }
    }

    pub fn with_label_width(label_width: usize) -> Self {
        Self { label_width }
    }
}

impl Default for AdjacencyParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser<GraphDatabase> for AdjacencyParser {
    type Input = AdjacencyForm;

    fn parse(&self, input: &AdjacencyForm, database: &mut GraphDatabase) -> Result<()> {
        let parse_span = span!(Level::INFO, "parse_adjacency", rows = input.row_count());
        let _enter = parse_span.enter();

        add_nodes(input.nodes(), self.label_width, database)?;

        for (row, node, targets) in input.rows() {
            let source = node.trim();
            if source.is_empty() {
                if let Some((_, orphan)) = targets.filled().next() {
                    warn!(row, target = %orphan, "Skipping targets under a blank node row");
                    database.add_warning(ParseWarning::new(
                        row + 1,
                        orphan,
                        "targets under a blank node row are ignored",
                    ));
                }
                continue;
            }
            // Blank target cells do not take a number
            for (slot, (_, target)) in targets.filled().enumerate() {
                trace!(row, slot, source, target, "Adjacency edge");
                database.add_edge(EdgeSpec::new(format!("e{}-{}", row, slot), source, target))?;
            }
        }

        debug!(
            node_count = database.node_count(),
            edge_count = database.edge_count(),
            "Adjacency rows parsed"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "adjacency"
    }

    fn version(&self) -> &'static str {
        "0.2.0"
    }

    fn can_parse(&self, input: &AdjacencyForm) -> bool {
        input.nodes().filled().next().is_some()
    }
}

/// Parser for explicit source/target pair rows
///
/// Pair row `i` becomes edge `e<i>` once both sides are filled.
#[derive(Debug, Clone, Copy)]
pub struct PairParser {
    label_width: usize,
}

impl PairParser {
    pub fn new() -> Self {
        Self {
            label_width: DISPLAY_LABEL_WIDTH,
        }
    }

    pub fn with_label_width(label_width: usize) -> Self {
        Self { label_width }
    }
}

impl Default for PairParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser<GraphDatabase> for PairParser {
    type Input = PairForm;

    fn parse(&self, input: &PairForm, database: &mut GraphDatabase) -> Result<()> {
        let parse_span = span!(Level::INFO, "parse_pairs", pairs = input.pairs().len());
        let _enter = parse_span.enter();

        add_nodes(input.nodes(), self.label_width, database)?;

        for (row, pair) in input.pairs().iter().enumerate() {
            match pair.endpoints() {
                Some((source, target)) => {
                    database.add_edge(EdgeSpec::new(format!("e{}", row), source, target))?;
                }
                None => {
                    let (source, target) = (pair.source.trim(), pair.target.trim());
                    if source.is_empty() && target.is_empty() {
                        continue;
                    }
                    warn!(row, source, target, "Skipping half-filled pair");
                    database.add_warning(ParseWarning::new(
                        row + 1,
                        format!("{}-{}", source, target),
                        "pair needs both a source and a target",
                    ));
                }
            }
        }

        debug!(
            node_count = database.node_count(),
            edge_count = database.edge_count(),
            "Pair rows parsed"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "pairs"
    }

    fn version(&self) -> &'static str {
        "0.2.0"
    }

    fn can_parse(&self, input: &PairForm) -> bool {
        input.nodes().filled().next().is_some() || input.pairs().iter().any(|p| p.endpoints().is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PairSide;

    #[test]
    fn test_adjacency_edges() {
        let form = AdjacencyForm::from_rows(vec![
            ("  A ", vec!["B", "", " C "]),
            ("B", vec!["A"]),
        ]);
        let mut db = GraphDatabase::new();
        AdjacencyParser::new().parse(&form, &mut db).unwrap();

        let ids: Vec<&str> = db.nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
        let edges: Vec<(&str, &str, &str)> = db
            .edges()
            .map(|e| (e.id.as_str(), e.source.as_str(), e.target.as_str()))
            .collect();
        assert_eq!(
            edges,
            vec![("e0-0", "A", "B"), ("e0-1", "A", "C"), ("e1-0", "B", "A")]
        );
    }

    #[test]
    fn test_adjacency_blank_row_contributes_no_edges() {
        let form = AdjacencyForm::from_rows(vec![("", vec!["B"]), ("B", vec![])]);
        let mut db = GraphDatabase::new();
        AdjacencyParser::new().parse(&form, &mut db).unwrap();
        assert_eq!(db.node_count(), 1);
        assert_eq!(db.edge_count(), 0);
        assert_eq!(db.warnings().len(), 1);
    }

    #[test]
    fn test_adjacency_undeclared_target_passes_through() {
        let form = AdjacencyForm::from_rows(vec![("A", vec!["Z"])]);
        let mut db = GraphDatabase::new();
        AdjacencyParser::new().parse(&form, &mut db).unwrap();
        assert_eq!(db.edge_specs()[0].target, "Z");
    }

    #[test]
    fn test_pair_edges() {
        let mut form = PairForm::new();
        form.update_node(0, "A").unwrap();
        form.update_node(1, "B").unwrap();
        form.update_pair(0, PairSide::Source, "A").unwrap();
        form.update_pair(0, PairSide::Target, "B").unwrap();
        form.update_pair(1, PairSide::Source, "B").unwrap();

        let mut db = GraphDatabase::new();
        PairParser::new().parse(&form, &mut db).unwrap();

        assert_eq!(db.node_count(), 2);
        assert_eq!(db.edge_count(), 1);
        assert_eq!(db.edge_specs()[0].id, "e0");
        assert_eq!(db.warnings().len(), 1);
        assert_eq!(db.warnings()[0].line, 2);
    }

    #[test]
    fn test_pair_ids_follow_row_index() {
        let form = PairForm::from_parts(["A", "B"], [("", ""), ("A", "B")]);
        let mut db = GraphDatabase::new();
        PairParser::new().parse(&form, &mut db).unwrap();
        assert_eq!(db.edge_specs()[0].id, "e1");
        assert!(db.warnings().is_empty());
    }
}
