//! Graph database implementation
//!
//! Stores the node and edge specs produced by a parser, in input order, along
//! with the warnings raised for input fragments that were skipped.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, trace};

use crate::core::{Database, EdgeSpec, NodeSpec};

/// An input fragment a parser skipped instead of failing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseWarning {
    /// 1-based line (DSL) or row (structured input) the fragment came from
    pub line: usize,
    /// The offending fragment, as written
    pub fragment: String,
    pub reason: String,
}

impl ParseWarning {
    pub fn new(line: usize, fragment: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            line,
            fragment: fragment.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} ({:?})", self.line, self.reason, self.fragment)
    }
}

/// Parsed graph: node specs, edge specs and skipped-input warnings
///
/// Unlike a set, the database keeps every node spec it is given, including
/// repeated ids. Collapsing duplicates is the validator's job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDatabase {
    nodes: Vec<NodeSpec>,
    edges: Vec<EdgeSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<ParseWarning>,
}

impl GraphDatabase {
    /// Create a new empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a database directly from specs
    pub fn from_parts(nodes: Vec<NodeSpec>, edges: Vec<EdgeSpec>) -> Self {
        Self {
            nodes,
            edges,
            warnings: Vec::new(),
        }
    }

    /// Split into node and edge specs
    pub fn into_parts(self) -> (Vec<NodeSpec>, Vec<EdgeSpec>) {
        (self.nodes, self.edges)
    }

    /// Node specs as a slice, in input order
    pub fn node_specs(&self) -> &[NodeSpec] {
        &self.nodes
    }

    /// Edge specs as a slice, in input order
    pub fn edge_specs(&self) -> &[EdgeSpec] {
        &self.edges
    }

    /// Check if a node exists
    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    /// Record a skipped fragment
    pub fn add_warning(&mut self, warning: ParseWarning) {
        trace!(line = warning.line, fragment = %warning.fragment, reason = %warning.reason, "Recording parse warning");
        self.warnings.push(warning);
    }

    /// Warnings raised while parsing
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    /// Drain the recorded warnings
    pub fn take_warnings(&mut self) -> Vec<ParseWarning> {
        std::mem::take(&mut self.warnings)
    }

    /// Node ids in first-occurrence order, without repeats
    pub fn distinct_node_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.nodes
            .iter()
            .map(|n| n.id.as_str())
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Ids declared more than once, each reported once in first-repeat order
    pub fn duplicate_node_ids(&self) -> Vec<&str> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut duplicates = Vec::new();
        for node in &self.nodes {
            let count = counts.entry(node.id.as_str()).or_insert(0);
            *count += 1;
            if *count == 2 {
                duplicates.push(node.id.as_str());
            }
        }
        duplicates
    }

    /// Edge endpoints that name no declared node, as `(edge, missing id)`
    ///
    /// An edge whose source and target are both missing is reported twice.
    pub fn dangling_references(&self) -> Vec<(&EdgeSpec, &str)> {
        let declared: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        let mut dangling = Vec::new();
        for edge in &self.edges {
            if !declared.contains(edge.source.as_str()) {
                dangling.push((edge, edge.source.as_str()));
            }
            if edge.target != edge.source && !declared.contains(edge.target.as_str()) {
                dangling.push((edge, edge.target.as_str()));
            }
        }
        dangling
    }

    /// Get IDs of nodes that this node points to
    pub fn successors(&self, node_id: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|e| e.source == node_id)
            .map(|e| e.target.as_str())
            .collect()
    }

    /// Get IDs of nodes that point to this node
    pub fn predecessors(&self, node_id: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|e| e.target == node_id)
            .map(|e| e.source.as_str())
            .collect()
    }

    /// Keep only the first spec for every node id
    pub fn merge_duplicate_nodes(&mut self) -> usize {
        let before = self.nodes.len();
        let mut seen = HashSet::new();
        self.nodes.retain(|n| seen.insert(n.id.clone()));
        let merged = before - self.nodes.len();
        if merged > 0 {
            debug!(merged, node_count = self.nodes.len(), "Merged duplicate nodes");
        }
        merged
    }

    /// Keep only the edges matching `keep`, returning how many were removed
    pub fn retain_edges(&mut self, keep: impl FnMut(&EdgeSpec) -> bool) -> usize {
        let before = self.edges.len();
        self.edges.retain(keep);
        before - self.edges.len()
    }
}

impl Database for GraphDatabase {
    type Node = NodeSpec;
    type Edge = EdgeSpec;

    fn add_node(&mut self, node: NodeSpec) -> Result<()> {
        trace!(node_id = %node.id, display_label = %node.display_label, "Adding node to database");
        self.nodes.push(node);
        debug!(node_count = self.node_count(), "Node added");
        Ok(())
    }

    fn add_edge(&mut self, edge: EdgeSpec) -> Result<()> {
        trace!(
            edge_id = %edge.id,
            edge_source = %edge.source,
            edge_target = %edge.target,
            "Adding edge to database"
        );
        self.edges.push(edge);
        debug!(edge_count = self.edge_count(), "Edge added");
        Ok(())
    }

    fn get_node(&self, id: &str) -> Option<&NodeSpec> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn nodes(&self) -> impl Iterator<Item = &NodeSpec> {
        self.nodes.iter()
    }

    fn edges(&self) -> impl Iterator<Item = &EdgeSpec> {
        self.edges.iter()
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.warnings.clear();
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GraphDatabase {
        let mut db = GraphDatabase::new();
        for id in ["A", "B", "A", "C"] {
            db.add_node(NodeSpec::new(id)).unwrap();
        }
        db.add_edge(EdgeSpec::new("e0", "A", "B")).unwrap();
        db.add_edge(EdgeSpec::new("e1", "B", "Z")).unwrap();
        db.add_edge(EdgeSpec::new("e2", "Y", "Y")).unwrap();
        db
    }

    #[test]
    fn test_database_basic_operations() {
        let db = sample();
        assert_eq!(db.node_count(), 4);
        assert_eq!(db.edge_count(), 3);
        assert!(db.has_node("A"));
        assert!(!db.has_node("Z"));
        assert_eq!(db.get_node("C").unwrap().display_label, "C");
    }

    #[test]
    fn test_duplicates_are_kept_until_merged() {
        let mut db = sample();
        assert_eq!(db.distinct_node_ids(), vec!["A", "B", "C"]);
        assert_eq!(db.duplicate_node_ids(), vec!["A"]);

        assert_eq!(db.merge_duplicate_nodes(), 1);
        assert_eq!(db.node_count(), 3);
        assert!(db.duplicate_node_ids().is_empty());
    }

    #[test]
    fn test_dangling_references() {
        let db = sample();
        let dangling: Vec<(&str, &str)> = db
            .dangling_references()
            .into_iter()
            .map(|(e, id)| (e.id.as_str(), id))
            .collect();
        // A self-loop on an undeclared node is reported once
        assert_eq!(dangling, vec![("e1", "Z"), ("e2", "Y")]);
    }

    #[test]
    fn test_graph_analysis() {
        let db = sample();
        assert_eq!(db.successors("A"), vec!["B"]);
        assert_eq!(db.predecessors("B"), vec!["A"]);
        assert!(db.predecessors("A").is_empty());
    }

    #[test]
    fn test_warnings_are_drained() {
        let mut db = GraphDatabase::new();
        db.add_warning(ParseWarning::new(2, "AB", "edge pair is missing '-'"));
        assert_eq!(db.warnings().len(), 1);
        assert!(db.warnings()[0].to_string().contains("line 2"));

        let taken = db.take_warnings();
        assert_eq!(taken.len(), 1);
        assert!(db.warnings().is_empty());
    }

    #[test]
    fn test_clear() {
        let mut db = sample();
        db.clear();
        assert_eq!(db.node_count(), 0);
        assert_eq!(db.edge_count(), 0);
    }
}
